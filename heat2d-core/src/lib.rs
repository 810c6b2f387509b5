//! Explicit (FTCS) solver for the 2D heat equation on a square grid.
//!
//! The whole run is a pipeline: [`init::initialize`] builds the starting
//! field, [`Simulation`] owns two buffers and repeatedly applies
//! [`stencil::step`] with a buffer swap between iterations.
//!
//! Boundary cells are copied forward unchanged every iteration, so they keep
//! their initial values for the entire run.

pub mod config;
pub mod error;
pub mod field;
pub mod init;
pub mod simulation;
pub mod stencil;

pub use config::{Schedule, SimulationConfig, StabilityPolicy};
pub use error::{Error, Result};
pub use field::Field;
pub use simulation::{RunReport, RunState, Simulation};
pub use stencil::StencilCoefficients;
