use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::core::particles::ParticleSet;
use crate::error::{Result, SimulationError};

/// Spring-damper link between two particles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Constraint {
    pub particle_a: usize,
    pub particle_b: usize,
    pub stiffness: f32,
    pub damping: f32,
    pub rest_length: f32,
}

impl Constraint {
    pub fn new(particle_a: usize, particle_b: usize, stiffness: f32, damping: f32) -> Self {
        Self {
            particle_a,
            particle_b,
            stiffness,
            damping,
            rest_length: 0.0,
        }
    }

    pub fn with_rest_length(mut self, rest_length: f32) -> Self {
        self.rest_length = rest_length;
        self
    }
}

/// Structure-of-Arrays storage for spring constraints.
///
/// `solved_forces_a`/`solved_forces_b` are scratch slots: the parallel solve
/// writes them and the sequential accumulation reads them in the same tick.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    particle_ids: Vec<[usize; 2]>,
    stiffness: Vec<f32>,
    damping: Vec<f32>,
    rest_lengths: Vec<f32>,
    solved_forces_a: Vec<Vec3>,
    solved_forces_b: Vec<Vec3>,
}

impl ConstraintSet {
    /// Allocates `count` constraints. Every slot must be filled before the first tick.
    pub fn initialize(count: usize) -> Self {
        log::debug!("allocating constraint set with {count} constraints");
        Self {
            particle_ids: vec![[0, 0]; count],
            stiffness: vec![0.0; count],
            damping: vec![0.0; count],
            rest_lengths: vec![0.0; count],
            solved_forces_a: vec![Vec3::ZERO; count],
            solved_forces_b: vec![Vec3::ZERO; count],
        }
    }

    pub fn from_constraints(constraints: Vec<Constraint>) -> Self {
        let mut set = Self::initialize(constraints.len());
        for (index, constraint) in constraints.into_iter().enumerate() {
            set.set_constraint(index, constraint);
        }
        set
    }

    pub fn release(self) {
        log::debug!("releasing constraint set with {} constraints", self.len());
    }

    pub fn len(&self) -> usize {
        self.particle_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particle_ids.is_empty()
    }

    /// Panics if `index` is not a constraint slot.
    pub fn set_constraint(&mut self, index: usize, constraint: Constraint) {
        self.particle_ids[index] = [constraint.particle_a, constraint.particle_b];
        self.stiffness[index] = constraint.stiffness;
        self.damping[index] = constraint.damping;
        self.rest_lengths[index] = constraint.rest_length;
    }

    /// Links `a` and `b` with a spring that is at rest at their current distance.
    pub fn connect(
        &mut self,
        index: usize,
        a: usize,
        b: usize,
        stiffness: f32,
        damping: f32,
        particles: &ParticleSet,
    ) -> Result<()> {
        let count = particles.len();
        for particle in [a, b] {
            if particle >= count {
                return Err(SimulationError::ParticleIndexOutOfRange {
                    list: "constraint endpoints",
                    slot: index,
                    index: particle,
                    count,
                });
            }
        }
        let rest_length = particles.positions()[a].distance(particles.positions()[b]);
        self.set_constraint(
            index,
            Constraint::new(a, b, stiffness, damping).with_rest_length(rest_length),
        );
        Ok(())
    }

    pub fn constraint(&self, index: usize) -> Option<Constraint> {
        let [particle_a, particle_b] = *self.particle_ids.get(index)?;
        Some(Constraint {
            particle_a,
            particle_b,
            stiffness: self.stiffness[index],
            damping: self.damping[index],
            rest_length: self.rest_lengths[index],
        })
    }

    pub fn endpoints(&self, index: usize) -> (usize, usize) {
        let [a, b] = self.particle_ids[index];
        (a, b)
    }

    /// Flat endpoint list, `2 * len()` entries: `[a0, b0, a1, b1, ...]`.
    pub fn particle_ids(&self) -> &[usize] {
        self.particle_ids.as_flattened()
    }

    pub fn pairs(&self) -> &[[usize; 2]] {
        &self.particle_ids
    }

    pub fn stiffness(&self) -> &[f32] {
        &self.stiffness
    }

    pub fn damping(&self) -> &[f32] {
        &self.damping
    }

    pub fn rest_lengths(&self) -> &[f32] {
        &self.rest_lengths
    }

    pub fn solved_forces_a(&self) -> &[Vec3] {
        &self.solved_forces_a
    }

    pub fn solved_forces_b(&self) -> &[Vec3] {
        &self.solved_forces_b
    }

    pub fn current_length(&self, index: usize, particles: &ParticleSet) -> f32 {
        let (a, b) = self.endpoints(index);
        particles.positions()[a].distance(particles.positions()[b])
    }

    /// Elastic energy stored in all springs, `0.5 * k * (d - L)^2` summed.
    pub fn potential_energy(&self, particles: &ParticleSet) -> f32 {
        (0..self.len())
            .map(|index| {
                let stretch = self.current_length(index, particles) - self.rest_lengths[index];
                0.5 * self.stiffness[index] * stretch * stretch
            })
            .sum()
    }

    pub fn validate(&self, particle_count: usize) -> Result<()> {
        for (index, &[a, b]) in self.particle_ids.iter().enumerate() {
            for particle in [a, b] {
                if particle >= particle_count {
                    return Err(SimulationError::ParticleIndexOutOfRange {
                        list: "constraint endpoints",
                        slot: index,
                        index: particle,
                        count: particle_count,
                    });
                }
            }
            if a == b {
                return Err(SimulationError::SelfConstraint {
                    constraint: index,
                    particle: a,
                });
            }
            for (parameter, value) in [
                ("stiffness", self.stiffness[index]),
                ("damping", self.damping[index]),
                ("rest length", self.rest_lengths[index]),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(SimulationError::InvalidConstraintParameter {
                        constraint: index,
                        parameter,
                        value,
                    });
                }
            }
        }
        Ok(())
    }

    /// Read-only inputs and scratch outputs of the solve phase.
    pub(crate) fn split_solve(&mut self) -> ConstraintSolveViews<'_> {
        ConstraintSolveViews {
            particle_ids: &self.particle_ids,
            stiffness: &self.stiffness,
            damping: &self.damping,
            rest_lengths: &self.rest_lengths,
            solved_forces_a: &mut self.solved_forces_a,
            solved_forces_b: &mut self.solved_forces_b,
        }
    }
}

pub(crate) struct ConstraintSolveViews<'a> {
    pub particle_ids: &'a [[usize; 2]],
    pub stiffness: &'a [f32],
    pub damping: &'a [f32],
    pub rest_lengths: &'a [f32],
    pub solved_forces_a: &'a mut [Vec3],
    pub solved_forces_b: &'a mut [Vec3],
}
