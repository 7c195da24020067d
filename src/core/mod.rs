//! Structure-of-arrays stores for particles, constraints, and gravity setup.

pub mod constraints;
pub mod gravity;
pub mod particles;

pub use constraints::{Constraint, ConstraintSet};
pub use gravity::GravityConfig;
pub use particles::{Particle, ParticleMut, ParticleSet, ParticleViews};
