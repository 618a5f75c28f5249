use crate::boundary;
use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("cell ({row}, {col}) is outside the {size}x{size} grid")]
    OutOfBounds { row: i64, col: i64, size: usize },
    #[error("region rows {rows:?} cols {cols:?} does not fit in the {size}x{size} grid")]
    RegionOutOfBounds {
        rows: Range<usize>,
        cols: Range<usize>,
        size: usize,
    },
    #[error("seed quantity must be finite and non-negative")]
    InvalidQuantity,
    #[error("field size must be positive")]
    InvalidSize,
}

/// Square toroidal grid of resource quantities.
/// Each cell holds a non-negative amount of food, stored row-major.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialField {
    size: usize,
    cells: Vec<f64>,
}

impl SpatialField {
    /// Create an empty `size` x `size` field.
    pub fn new(size: usize) -> Result<Self, FieldError> {
        let cell_count = size
            .checked_mul(size)
            .filter(|n| *n > 0)
            .ok_or(FieldError::InvalidSize)?;
        Ok(Self {
            size,
            cells: vec![0.0; cell_count],
        })
    }

    /// Set every cell in the rectangle `rows` x `cols` to `quantity`.
    /// Overlapping calls overwrite earlier ones.
    pub fn seed(
        &mut self,
        rows: Range<usize>,
        cols: Range<usize>,
        quantity: f64,
    ) -> Result<(), FieldError> {
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(FieldError::InvalidQuantity);
        }
        if !Self::region_fits(&rows, &cols, self.size) {
            return Err(FieldError::RegionOutOfBounds {
                rows,
                cols,
                size: self.size,
            });
        }
        for row in rows {
            let start = row * self.size;
            self.cells[start + cols.start..start + cols.end].fill(quantity);
        }
        Ok(())
    }

    pub(crate) fn region_fits(rows: &Range<usize>, cols: &Range<usize>, size: usize) -> bool {
        rows.start < rows.end && cols.start < cols.end && rows.end <= size && cols.end <= size
    }

    pub fn quantity_at(&self, row: usize, col: usize) -> Result<f64, FieldError> {
        let idx = self.index(row, col)?;
        Ok(self.cells[idx])
    }

    /// Remove up to `amount` from the cell and return the amount actually withdrawn.
    /// The cell never drops below zero.
    pub fn deplete(&mut self, row: usize, col: usize, amount: f64) -> Result<f64, FieldError> {
        let idx = self.index(row, col)?;
        let removed = self.cells[idx].min(amount.max(0.0));
        self.cells[idx] = (self.cells[idx] - removed).max(0.0);
        Ok(removed)
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cells(&self) -> &[f64] {
        &self.cells
    }

    pub fn total(&self) -> f64 {
        self.cells.iter().sum()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize, FieldError> {
        let [row, col] = boundary::check_index(row as i64, col as i64, self.size)?;
        Ok(row * self.size + col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn seed_fills_rectangle_only() {
        let mut field = SpatialField::new(10).unwrap();
        field.seed(2..4, 5..7, 20.0).unwrap();
        assert_eq!(field.quantity_at(2, 5), Ok(20.0));
        assert_eq!(field.quantity_at(3, 6), Ok(20.0));
        assert_eq!(field.quantity_at(4, 6), Ok(0.0));
        assert_eq!(field.quantity_at(3, 7), Ok(0.0));
        assert!((field.total() - 80.0).abs() < 1e-12);
    }

    #[test]
    fn overlapping_seeds_last_write_wins() {
        let mut field = SpatialField::new(10).unwrap();
        field.seed(0..5, 0..5, 20.0).unwrap();
        field.seed(3..6, 3..6, 7.0).unwrap();
        assert_eq!(field.quantity_at(4, 4), Ok(7.0));
        assert_eq!(field.quantity_at(2, 2), Ok(20.0));
    }

    #[test]
    fn seed_rejects_regions_outside_grid() {
        let mut field = SpatialField::new(10).unwrap();
        assert!(matches!(
            field.seed(8..11, 0..2, 1.0),
            Err(FieldError::RegionOutOfBounds { size: 10, .. })
        ));
        assert!(field.seed(3..3, 0..2, 1.0).is_err());
        assert_eq!(field.seed(0..2, 0..2, -1.0), Err(FieldError::InvalidQuantity));
        assert!((field.total()).abs() < 1e-12);
    }

    #[test]
    fn new_rejects_empty_grid() {
        assert_eq!(SpatialField::new(0), Err(FieldError::InvalidSize));
        assert_eq!(SpatialField::new(usize::MAX), Err(FieldError::InvalidSize));
        assert_eq!(SpatialField::new(3).map(|f| f.cells().len()), Ok(9));
    }

    #[test]
    fn quantity_at_fails_outside_grid() {
        let field = SpatialField::new(10).unwrap();
        assert_eq!(
            field.quantity_at(10, 3),
            Err(FieldError::OutOfBounds {
                row: 10,
                col: 3,
                size: 10
            })
        );
    }

    #[test]
    fn deplete_withdraws_and_clamps_to_available() {
        let mut field = SpatialField::new(10).unwrap();
        field.seed(5..6, 5..6, 3.0).unwrap();
        assert_eq!(field.deplete(5, 5, 2.0), Ok(2.0));
        assert_eq!(field.quantity_at(5, 5), Ok(1.0));
        assert_eq!(field.deplete(5, 5, 2.0), Ok(1.0));
        assert_eq!(field.quantity_at(5, 5), Ok(0.0));
        assert_eq!(field.deplete(5, 5, 2.0), Ok(0.0));
        assert_eq!(field.deplete(5, 5, -4.0), Ok(0.0));
        assert_eq!(field.quantity_at(5, 5), Ok(0.0));
    }

    proptest! {
        #[test]
        fn depletion_never_goes_negative(
            start in 0.0f64..50.0,
            amounts in prop::collection::vec(-5.0f64..10.0, 0..40),
        ) {
            let mut field = SpatialField::new(4).unwrap();
            field.seed(1..2, 1..2, start).unwrap();
            for amount in amounts {
                field.deplete(1, 1, amount).unwrap();
                let q = field.quantity_at(1, 1).unwrap();
                prop_assert!(q >= 0.0, "quantity {q} went negative");
            }
        }
    }
}
