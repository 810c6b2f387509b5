use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::config::SimulationConfig;
use crate::error::{Error, Result};
use crate::field::Field;
use crate::init::initialize;
use crate::stencil::{self, StencilCoefficients};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunState {
    Running,
    Done,
}

/// Outcome of [`Simulation::run`].
#[derive(Clone, Copy, Debug)]
pub struct RunReport {
    /// Iterations executed by this call.
    pub iterations: usize,
    /// Wall-clock time of the iteration loop only.
    pub elapsed: Duration,
}

/// Owns the two field buffers and advances them for `config.iterations` steps.
pub struct Simulation {
    config: SimulationConfig,
    coeffs: StencilCoefficients,
    current: Field,
    next: Field,
    iteration: usize,
}

impl Simulation {
    /// Validates `config`, allocates both buffers and initializes the hot block.
    pub fn new(config: SimulationConfig) -> Result<Simulation> {
        config.validate()?;
        let mut field = Field::zeros(config.grid_size);
        initialize(&mut field);
        Simulation::from_validated(config, field)
    }

    /// Starts from a caller-supplied field instead of the hot block.
    /// `field` must be `config.grid_size` on a side with every cell finite.
    pub fn with_field(config: SimulationConfig, field: Field) -> Result<Simulation> {
        config.validate()?;
        Simulation::from_validated(config, field)
    }

    fn from_validated(config: SimulationConfig, field: Field) -> Result<Simulation> {
        if field.n() != config.grid_size {
            return Err(Error::DimensionMismatch {
                expected: config.grid_size,
                found: field.n(),
            });
        }
        if !field.is_finite() {
            return Err(Error::NonFiniteField);
        }
        let next = Field::zeros(config.grid_size);

        Ok(Simulation {
            coeffs: config.coefficients(),
            config,
            current: field,
            next,
            iteration: 0,
        })
    }

    // ---- Accessors ----

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Completed iterations.
    pub fn iteration(&self) -> usize {
        self.iteration
    }

    pub fn state(&self) -> RunState {
        if self.iteration < self.config.iterations {
            RunState::Running
        } else {
            RunState::Done
        }
    }

    /// The field after the last completed iteration.
    pub fn field(&self) -> &Field {
        &self.current
    }

    pub fn into_field(self) -> Field {
        self.current
    }

    // ---- Stepping ----

    /// Advances one iteration. Returns `false` without doing anything once done.
    pub fn step(&mut self) -> Result<bool> {
        if self.state() == RunState::Done {
            return Ok(false);
        }
        let schedule = self.config.schedule;

        // Full copy first: the stencil writes only the interior, so this is
        // what keeps the boundary frozen.
        stencil::copy_field(&self.current, &mut self.next, schedule)?;
        stencil::step(&self.current, &mut self.next, self.coeffs, schedule)?;
        std::mem::swap(&mut self.current, &mut self.next);

        self.iteration += 1;
        Ok(true)
    }

    /// Runs all remaining iterations.
    pub fn run(&mut self) -> Result<RunReport> {
        self.run_with(|_, _| {})
    }

    /// Runs all remaining iterations, calling `observer(iteration, field)`
    /// after every buffer swap. Observer time is included in `elapsed`.
    pub fn run_with<F>(&mut self, mut observer: F) -> Result<RunReport>
    where
        F: FnMut(usize, &Field),
    {
        info!(
            n = self.config.grid_size,
            iterations = self.config.iterations,
            alpha = self.config.diffusivity,
            dt = self.config.time_step,
            h = self.config.spatial_step,
            schedule = ?self.config.schedule,
            "starting simulation"
        );

        let start_iter = self.iteration;
        let t0 = Instant::now();
        while self.step()? {
            observer(self.iteration, &self.current);
        }
        let elapsed = t0.elapsed();

        let iterations = self.iteration - start_iter;
        info!(iterations, elapsed_secs = elapsed.as_secs_f64(), "simulation finished");
        if !self.current.is_finite() {
            warn!("final field contains non-finite values");
        }

        Ok(RunReport {
            iterations,
            elapsed,
        })
    }
}
