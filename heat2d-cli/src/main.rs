mod report;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use heat2d_core::{Schedule, Simulation, SimulationConfig, StabilityPolicy, config};
use std::io::{self, Write};
use std::num::NonZeroUsize;
use std::path::PathBuf;
use tracing::{Level, debug, warn};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Grid size N (NxN)
    #[arg(long, default_value_t = config::DEFAULT_GRID_SIZE)]
    grid_size: usize,

    /// Number of time steps
    #[arg(long, default_value_t = config::DEFAULT_ITERATIONS)]
    iterations: usize,

    /// Thermal diffusivity alpha
    #[arg(long, default_value_t = config::DEFAULT_DIFFUSIVITY)]
    alpha: f64,

    /// Time step dt (stable when dt <= h^2 / (4 alpha))
    #[arg(long, default_value_t = config::DEFAULT_TIME_STEP)]
    dt: f64,

    /// Spatial step h (dx = dy = h)
    #[arg(long, default_value_t = config::DEFAULT_SPATIAL_STEP)]
    h: f64,

    /// How each sweep is executed
    #[arg(long, value_enum, default_value_t = ScheduleArg::Rayon)]
    schedule: ScheduleArg,

    /// Worker threads (rayon pool size, or band count for --schedule threads)
    #[arg(long)]
    threads: Option<NonZeroUsize>,

    /// Run even if dt violates the stability limit (logs a warning)
    #[arg(long)]
    allow_unstable: bool,

    /// Print the initial grid
    #[arg(long)]
    print_initial: bool,

    /// Print the final grid
    #[arg(long)]
    print_final: bool,

    /// Print the grid every K iterations
    #[arg(long)]
    print_every: Option<usize>,

    /// Write the final field and run metadata to this JSON file
    #[arg(long)]
    json: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum ScheduleArg {
    Sequential,
    Rayon,
    Threads,
}

impl Args {
    fn to_config(&self) -> Result<SimulationConfig> {
        let schedule = match self.schedule {
            ScheduleArg::Sequential => Schedule::Sequential,
            ScheduleArg::Rayon => Schedule::Rayon,
            ScheduleArg::Threads => {
                let k = match self.threads {
                    Some(k) => k,
                    None => std::thread::available_parallelism()
                        .context("querying available parallelism")?,
                };
                Schedule::Threads(k.get())
            }
        };

        Ok(SimulationConfig {
            grid_size: self.grid_size,
            iterations: self.iterations,
            diffusivity: self.alpha,
            time_step: self.dt,
            spatial_step: self.h,
            schedule,
            stability: if self.allow_unstable {
                StabilityPolicy::Warn
            } else {
                StabilityPolicy::Reject
            },
        })
    }
}

fn parse_level(s: &str) -> Level {
    match s.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(parse_level(&args.log_level))
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match (args.schedule, args.threads) {
        (ScheduleArg::Rayon, Some(k)) => {
            rayon::ThreadPoolBuilder::new()
                .num_threads(k.get())
                .build_global()
                .context("building rayon thread pool")?;
        }
        (ScheduleArg::Sequential, Some(k)) => {
            warn!(threads = k.get(), "--threads has no effect with --schedule sequential");
        }
        _ => {}
    }

    let config = args.to_config()?;
    let mut sim = Simulation::new(config.clone()).context("invalid simulation parameters")?;

    let stdout = io::stdout();
    if args.print_initial {
        let mut out = stdout.lock();
        writeln!(out, "Initial Grid:")?;
        report::write_grid(&mut out, sim.field())?;
    }

    // The observer cannot return errors; keep the first one and report it after the run.
    let mut print_err: Option<io::Error> = None;
    let report = match args.print_every.filter(|&k| k > 0) {
        Some(every) => sim.run_with(|iter, field| {
            if iter % every != 0 || print_err.is_some() {
                return;
            }
            debug!(iteration = iter, "printing snapshot");
            let mut out = stdout.lock();
            let res = writeln!(out, "Grid at iteration {iter}:")
                .and_then(|_| report::write_grid(&mut out, field));
            if let Err(e) = res {
                print_err = Some(e);
            }
        })?,
        None => sim.run()?,
    };
    if let Some(e) = print_err {
        return Err(e.into());
    }

    {
        let mut out = stdout.lock();
        report::write_summary(&mut out, report.elapsed)?;
        if args.print_final {
            writeln!(out, "Final Grid:")?;
            report::write_grid(&mut out, sim.field())?;
        }
    }

    if let Some(path) = &args.json {
        report::write_json(path, &config, sim.iteration(), report.elapsed, sim.field())?;
        println!("Wrote final field to: {}", path.display());
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_arguments_is_the_reference_run() {
        let args = Args::try_parse_from(["heat2d"]).unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config, SimulationConfig::default());
    }

    #[test]
    fn threads_schedule_uses_requested_count() {
        let args =
            Args::try_parse_from(["heat2d", "--schedule", "threads", "--threads", "3"]).unwrap();
        assert_eq!(args.to_config().unwrap().schedule, Schedule::Threads(3));
    }

    #[test]
    fn zero_threads_rejected_at_parse_time() {
        for schedule in ["rayon", "threads", "sequential"] {
            let res = Args::try_parse_from(["heat2d", "--schedule", schedule, "--threads", "0"]);
            assert!(res.is_err(), "{schedule}");
        }
    }

    #[test]
    fn allow_unstable_switches_policy() {
        let args = Args::try_parse_from(["heat2d", "--dt", "5", "--allow-unstable"]).unwrap();
        let config = args.to_config().unwrap();
        assert_eq!(config.stability, StabilityPolicy::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_log_level_falls_back_to_warn() {
        assert_eq!(parse_level("DEBUG"), Level::DEBUG);
        assert_eq!(parse_level("loud"), Level::WARN);
    }
}
