//! Particle Dynamics – a data-parallel particle simulation pipeline for Rust.
//!
//! Point masses stored as structure-of-arrays are pushed around by uniform or
//! inverse-square gravity and by spring-damper constraints, then advanced by an
//! Euler integrator. Every tick runs gravity, constraint solve, force
//! accumulation, and integration as strictly ordered phases; the data-parallel
//! phases fan out over `rayon` when the `parallel` feature is enabled.

pub mod config;
pub mod core;
pub mod dynamics;
pub mod error;
pub mod pipeline;
pub mod utils;
pub mod world;

pub use glam::Vec3;

pub use config::SimulationConfig;
pub use crate::core::{
    constraints::{Constraint, ConstraintSet},
    gravity::GravityConfig,
    particles::{Particle, ParticleMut, ParticleSet},
};
pub use dynamics::{
    constraint_solver::ConstraintSolver,
    gravity::{GravityModel, GravitySolver},
    integrator::{IntegrationMethod, Integrator},
};
pub use error::{Result, SimulationError};
pub use pipeline::{Phase, PhaseHandle, SimulationPipeline};
pub use world::ParticleWorld;
