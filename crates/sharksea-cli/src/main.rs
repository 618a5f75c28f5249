use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use sharksea_core::development::ArrheniusParams;
use sharksea_core::ensemble::{run_replicates, seed_range};
use sharksea_core::{SimConfig, World};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::info;

#[derive(Parser)]
#[command(name = "sharksea", version, about = "Toroidal grid foraging simulation")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run the simulation and print a JSON summary (or stream snapshots).
    Run(RunArgs),
    /// Print days-to-development for a list of temperatures (Kelvin).
    Develop {
        #[arg(
            long,
            value_delimiter = ',',
            default_values_t = vec![290.0, 295.0, 300.0, 305.0, 310.0]
        )]
        temperatures: Vec<f64>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Preset {
    Sharks,
    Ants,
}

#[derive(clap::Args)]
struct RunArgs {
    #[arg(long, value_enum, default_value_t = Preset::Sharks)]
    preset: Preset,
    /// JSON config file; missing fields fall back to the shark preset.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the configured step count.
    #[arg(long)]
    steps: Option<usize>,
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 10)]
    sample_every: usize,
    /// Emit one JSON snapshot per line instead of a summary.
    #[arg(long)]
    snapshots: bool,
    /// Number of independent seeds to run in parallel.
    #[arg(
        long,
        default_value_t = 1,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    replicates: usize,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Command::Run(args) => run(args),
        Command::Develop { temperatures } => develop(&temperatures),
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .try_init();
}

fn load_config(args: &RunArgs) -> Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => read_config(path)?,
        None => match args.preset {
            Preset::Sharks => SimConfig::sharks(),
            Preset::Ants => SimConfig::ant_walk(),
        },
    };
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    if let Some(steps) = args.steps {
        config.step_count = steps;
    }
    config.validate().context("invalid simulation config")?;
    Ok(config)
}

fn read_config(path: &Path) -> Result<SimConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("failed to parse config {}", path.display()))
}

fn run(args: RunArgs) -> Result<()> {
    let config = load_config(&args)?;
    let steps = config.step_count;
    let start = Instant::now();

    if args.replicates > 1 {
        if args.snapshots {
            bail!("--snapshots cannot be combined with --replicates");
        }
        let seeds = seed_range(config.seed, args.replicates);
        let summaries = run_replicates(&config, &seeds, steps, args.sample_every)?;
        info!(
            replicates = summaries.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "ensemble finished"
        );
        return print_json(&summaries);
    }

    let mut world = World::new(config).context("failed to build world")?;
    if args.snapshots {
        let stdout = io::stdout();
        let mut out = BufWriter::new(stdout.lock());
        let mut write_err: Option<io::Error> = None;
        world.run(steps, |snapshot| {
            if write_err.is_some() {
                return;
            }
            let line = serde_json::to_writer(&mut out, &snapshot)
                .map_err(io::Error::from)
                .and_then(|()| out.write_all(b"\n"));
            if let Err(e) = line {
                write_err = Some(e);
            }
        })?;
        if let Some(e) = write_err {
            return Err(e).context("failed to write snapshot");
        }
        out.flush()?;
    } else {
        let summary = world.try_run_experiment(steps, args.sample_every)?;
        print_json(&summary)?;
    }
    info!(
        steps,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "simulation finished"
    );
    Ok(())
}

fn develop(temperatures: &[f64]) -> Result<()> {
    #[derive(Serialize)]
    struct Row {
        temperature: f64,
        days: u32,
    }

    let rows: Vec<Row> = ArrheniusParams::default()
        .development_table(temperatures)?
        .into_iter()
        .map(|(temperature, days)| Row { temperature, days })
        .collect();
    print_json(&rows)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer_pretty(&mut out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn replicates_must_be_positive() {
        assert!(Cli::try_parse_from(["sharksea", "run", "--replicates", "0"]).is_err());
        let cli = Cli::try_parse_from(["sharksea", "run", "--replicates", "3"]).unwrap();
        match cli.command {
            Command::Run(args) => assert_eq!(args.replicates, 3),
            Command::Develop { .. } => panic!("expected run subcommand"),
        }
    }

    #[test]
    fn replicates_default_to_one() {
        let cli = Cli::try_parse_from(["sharksea", "run"]).unwrap();
        match cli.command {
            Command::Run(args) => assert_eq!(args.replicates, 1),
            Command::Develop { .. } => panic!("expected run subcommand"),
        }
    }
}
