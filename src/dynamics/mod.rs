//! Simulation dynamics: gravity, spring constraints, integration, and the fork-join helpers they share.

pub mod constraint_solver;
pub mod gravity;
pub mod integrator;
pub mod parallel;

pub use constraint_solver::{spring_force, ConstraintSolver};
pub use gravity::{GravityModel, GravitySolver};
pub use integrator::{IntegrationMethod, Integrator};
