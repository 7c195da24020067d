//! Error types for the simulation pipeline.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    #[error("{list} slot {slot} references particle {index}, but only {count} particles exist")]
    ParticleIndexOutOfRange {
        list: &'static str,
        slot: usize,
        index: usize,
        count: usize,
    },

    #[error("constraint {constraint} connects particle {particle} to itself")]
    SelfConstraint { constraint: usize, particle: usize },

    #[error("particle {particle} has invalid mass {mass}")]
    InvalidMass { particle: usize, mass: f32 },

    #[error("constraint {constraint} has invalid {parameter} {value}")]
    InvalidConstraintParameter {
        constraint: usize,
        parameter: &'static str,
        value: f32,
    },

    #[error("{store} was initialized with zero elements")]
    EmptyStore { store: &'static str },

    #[error("timestep must be positive and finite, got {0}")]
    InvalidTimeStep(f32),
}

pub type Result<T> = std::result::Result<T, SimulationError>;
