use serde::Serialize;
use tracing::warn;

use crate::error::{Error, Result};
use crate::stencil::StencilCoefficients;

// Reference run parameters.
pub const DEFAULT_GRID_SIZE: usize = 100;
pub const DEFAULT_ITERATIONS: usize = 1000;
pub const DEFAULT_DIFFUSIVITY: f64 = 0.1;
pub const DEFAULT_TIME_STEP: f64 = 0.01;
pub const DEFAULT_SPATIAL_STEP: f64 = 1.0;

/// How a single sweep over the grid is executed.
///
/// Every variant produces bit-identical output; they differ only in how the
/// destination rows are handed out to workers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Schedule {
    /// Single-threaded reference sweep.
    Sequential,
    /// One task per destination row on the global rayon pool.
    #[default]
    Rayon,
    /// Rows split into `k` contiguous bands, one scoped thread per band.
    Threads(usize),
}

/// What to do when `dt > h^2 / (4 alpha)`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StabilityPolicy {
    #[default]
    Reject,
    Warn,
}

/// Parameters of one simulation run.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SimulationConfig {
    /// Cells per side (the grid is N x N).
    pub grid_size: usize,
    /// Number of time steps T.
    pub iterations: usize,
    /// Thermal diffusivity alpha, in length^2 / time.
    pub diffusivity: f64,
    /// Time step dt, in time units.
    pub time_step: f64,
    /// Grid spacing h (dx = dy = h), in length units.
    pub spatial_step: f64,
    pub schedule: Schedule,
    pub stability: StabilityPolicy,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        SimulationConfig {
            grid_size: DEFAULT_GRID_SIZE,
            iterations: DEFAULT_ITERATIONS,
            diffusivity: DEFAULT_DIFFUSIVITY,
            time_step: DEFAULT_TIME_STEP,
            spatial_step: DEFAULT_SPATIAL_STEP,
            schedule: Schedule::default(),
            stability: StabilityPolicy::default(),
        }
    }
}

impl SimulationConfig {
    /// Largest stable time step for the explicit scheme: h^2 / (4 alpha).
    pub fn stability_limit(&self) -> f64 {
        (self.spatial_step * self.spatial_step) / (4.0 * self.diffusivity)
    }

    pub fn is_stable(&self) -> bool {
        self.time_step <= self.stability_limit()
    }

    pub fn coefficients(&self) -> StencilCoefficients {
        StencilCoefficients::new(self.diffusivity, self.time_step, self.spatial_step)
    }

    /// Checks parameter ranges and the stability precondition.
    ///
    /// With [`StabilityPolicy::Warn`] an unstable time step is logged and
    /// accepted; the run will diverge.
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 || self.grid_size.checked_mul(self.grid_size).is_none() {
            return Err(Error::InvalidGridSize(self.grid_size));
        }
        for (name, value) in [
            ("diffusivity", self.diffusivity),
            ("time_step", self.time_step),
            ("spatial_step", self.spatial_step),
        ] {
            if !value.is_finite() {
                return Err(Error::NonFiniteParameter { name });
            }
            if value <= 0.0 {
                return Err(Error::NonPositiveParameter { name, value });
            }
        }
        if let Schedule::Threads(0) = self.schedule {
            return Err(Error::InvalidThreadCount);
        }

        if !self.is_stable() {
            let limit = self.stability_limit();
            match self.stability {
                StabilityPolicy::Reject => {
                    return Err(Error::Unstable {
                        time_step: self.time_step,
                        limit,
                    });
                }
                StabilityPolicy::Warn => {
                    warn!(
                        time_step = self.time_step,
                        limit, "time step exceeds stability limit, results will diverge"
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_reference_run() {
        let c = SimulationConfig::default();
        assert_eq!(c.grid_size, 100);
        assert_eq!(c.iterations, 1000);
        assert_eq!(c.diffusivity, 0.1);
        assert_eq!(c.time_step, 0.01);
        assert_eq!(c.spatial_step, 1.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn stability_limit_formula() {
        let c = SimulationConfig {
            diffusivity: 0.5,
            spatial_step: 2.0,
            ..SimulationConfig::default()
        };
        assert_eq!(c.stability_limit(), 2.0);
    }

    #[test]
    fn unstable_time_step_rejected() {
        let c = SimulationConfig {
            time_step: 3.0,
            ..SimulationConfig::default()
        };
        assert_eq!(
            c.validate(),
            Err(Error::Unstable {
                time_step: 3.0,
                limit: 2.5
            })
        );
    }

    #[test]
    fn unstable_time_step_allowed_with_warn_policy() {
        let c = SimulationConfig {
            time_step: 3.0,
            stability: StabilityPolicy::Warn,
            ..SimulationConfig::default()
        };
        assert!(c.validate().is_ok());
    }

    #[test]
    fn limit_itself_is_stable() {
        let c = SimulationConfig {
            time_step: 2.5,
            ..SimulationConfig::default()
        };
        assert!(c.is_stable());
    }

    #[test]
    fn rejects_bad_parameters() {
        let zero_grid = SimulationConfig {
            grid_size: 0,
            ..SimulationConfig::default()
        };
        assert_eq!(zero_grid.validate(), Err(Error::InvalidGridSize(0)));

        let overflowing = SimulationConfig {
            grid_size: 1 << 33,
            ..SimulationConfig::default()
        };
        assert_eq!(overflowing.validate(), Err(Error::InvalidGridSize(1 << 33)));

        let neg_alpha = SimulationConfig {
            diffusivity: -1.0,
            ..SimulationConfig::default()
        };
        assert_eq!(
            neg_alpha.validate(),
            Err(Error::NonPositiveParameter {
                name: "diffusivity",
                value: -1.0
            })
        );

        let nan_h = SimulationConfig {
            spatial_step: f64::NAN,
            ..SimulationConfig::default()
        };
        assert_eq!(
            nan_h.validate(),
            Err(Error::NonFiniteParameter {
                name: "spatial_step"
            })
        );

        let no_threads = SimulationConfig {
            schedule: Schedule::Threads(0),
            ..SimulationConfig::default()
        };
        assert_eq!(no_threads.validate(), Err(Error::InvalidThreadCount));
    }
}
