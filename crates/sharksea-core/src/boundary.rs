//! Toroidal boundary handling for grid coordinates.

use crate::field::FieldError;

/// Wrap an integer coordinate onto a toroidal axis of length `size`.
///
/// The result lies in `[0, size)` for any input, including negatives and
/// values several laps away from the grid.
pub fn wrap(coordinate: i64, size: usize) -> usize {
    debug_assert!(size > 0, "grid size must be positive");
    coordinate.rem_euclid(size as i64) as usize
}

/// Apply a signed `(d_row, d_col)` offset to a cell and wrap both axes.
pub fn offset_wrapped(position: [usize; 2], offset: [i64; 2], size: usize) -> [usize; 2] {
    [
        wrap(position[0] as i64 + offset[0], size),
        wrap(position[1] as i64 + offset[1], size),
    ]
}

/// Validate that a cell index lies inside a `size` x `size` grid.
pub fn check_index(row: i64, col: i64, size: usize) -> Result<[usize; 2], FieldError> {
    let limit = size as i64;
    if (0..limit).contains(&row) && (0..limit).contains(&col) {
        Ok([row as usize, col as usize])
    } else {
        Err(FieldError::OutOfBounds { row, col, size })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn wrap_moves_negative_coordinates_to_far_edge() {
        assert_eq!(wrap(-1, 10), 9);
        assert_eq!(wrap(-10, 10), 0);
        assert_eq!(wrap(-11, 10), 9);
    }

    #[test]
    fn wrap_moves_overflowing_coordinates_to_near_edge() {
        assert_eq!(wrap(10, 10), 0);
        assert_eq!(wrap(25, 10), 5);
    }

    #[test]
    fn corner_offset_wraps_to_opposite_corner() {
        assert_eq!(offset_wrapped([0, 0], [-1, -1], 10), [9, 9]);
        assert_eq!(offset_wrapped([9, 9], [1, 1], 10), [0, 0]);
    }

    #[test]
    fn check_index_rejects_cells_outside_grid() {
        assert_eq!(check_index(3, 4, 10), Ok([3, 4]));
        assert_eq!(
            check_index(10, 0, 10),
            Err(FieldError::OutOfBounds {
                row: 10,
                col: 0,
                size: 10
            })
        );
        assert!(check_index(0, -1, 10).is_err());
    }

    proptest! {
        #[test]
        fn wrap_stays_in_range(c in -1_000_000i64..1_000_000, size in 1usize..500) {
            let w = wrap(c, size);
            prop_assert!(w < size, "wrap({c}, {size}) = {w}");
        }

        #[test]
        fn wrap_is_periodic(c in -100_000i64..100_000, size in 1usize..500, k in -50i64..50) {
            prop_assert_eq!(wrap(c, size), wrap(c + k * size as i64, size));
        }
    }
}
