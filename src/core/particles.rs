use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::error::{Result, SimulationError};

/// One conceptual row of a [`ParticleSet`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Particle {
    pub position: Vec3,
    pub velocity: Vec3,
    /// Zero pins the particle in place.
    pub mass: f32,
    /// Only used for drawing.
    pub radius: f32,
}

impl Default for Particle {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            mass: 1.0,
            radius: 0.1,
        }
    }
}

impl Particle {
    pub fn new(position: Vec3, mass: f32) -> Self {
        Self {
            position,
            mass,
            ..Self::default()
        }
    }

    pub fn pinned(position: Vec3) -> Self {
        Self::new(position, 0.0)
    }

    pub fn with_velocity(mut self, velocity: Vec3) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }
}

/// Structure-of-Arrays storage for particles.
///
/// Every array has the same fixed length, chosen at [`ParticleSet::initialize`].
/// Masses are only written through [`ParticleSet::set_mass`] so that
/// `inverse_mass == 1 / mass` (or zero for pinned particles) always holds.
#[derive(Debug, Clone, Default)]
pub struct ParticleSet {
    positions: Vec<Vec3>,
    velocities: Vec<Vec3>,
    masses: Vec<f32>,
    inverse_masses: Vec<f32>,
    radii: Vec<f32>,
    accumulated_forces: Vec<Vec3>,
}

impl ParticleSet {
    /// Allocates `count` particles at the origin. All of them start pinned (zero mass).
    pub fn initialize(count: usize) -> Self {
        log::debug!("allocating particle set with {count} particles");
        Self {
            positions: vec![Vec3::ZERO; count],
            velocities: vec![Vec3::ZERO; count],
            masses: vec![0.0; count],
            inverse_masses: vec![0.0; count],
            radii: vec![0.0; count],
            accumulated_forces: vec![Vec3::ZERO; count],
        }
    }

    pub fn from_particles(particles: Vec<Particle>) -> Result<Self> {
        let mut set = Self::initialize(particles.len());
        for (index, particle) in particles.into_iter().enumerate() {
            set.set_particle(index, particle)?;
        }
        Ok(set)
    }

    /// Frees every array. Consuming `self` makes a second release impossible.
    pub fn release(self) {
        log::debug!("releasing particle set with {} particles", self.len());
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn positions_mut(&mut self) -> &mut [Vec3] {
        &mut self.positions
    }

    pub fn velocities(&self) -> &[Vec3] {
        &self.velocities
    }

    pub fn velocities_mut(&mut self) -> &mut [Vec3] {
        &mut self.velocities
    }

    pub fn masses(&self) -> &[f32] {
        &self.masses
    }

    pub fn inverse_masses(&self) -> &[f32] {
        &self.inverse_masses
    }

    pub fn radii(&self) -> &[f32] {
        &self.radii
    }

    pub fn radii_mut(&mut self) -> &mut [f32] {
        &mut self.radii
    }

    pub fn accumulated_forces(&self) -> &[Vec3] {
        &self.accumulated_forces
    }

    pub fn accumulated_forces_mut(&mut self) -> &mut [Vec3] {
        &mut self.accumulated_forces
    }

    /// Sets the mass of one particle and derives its inverse mass.
    /// Zero pins the particle; negative and non-finite masses are rejected.
    pub fn set_mass(&mut self, index: usize, mass: f32) -> Result<()> {
        self.check_index(index)?;
        if !mass.is_finite() || mass < 0.0 {
            return Err(SimulationError::InvalidMass {
                particle: index,
                mass,
            });
        }
        self.masses[index] = mass;
        self.inverse_masses[index] = if mass == 0.0 { 0.0 } else { 1.0 / mass };
        Ok(())
    }

    pub fn pin(&mut self, index: usize) -> Result<()> {
        self.set_mass(index, 0.0)
    }

    pub fn is_pinned(&self, index: usize) -> bool {
        self.inverse_masses[index] == 0.0
    }

    pub fn set_particle(&mut self, index: usize, particle: Particle) -> Result<()> {
        self.set_mass(index, particle.mass)?;
        self.positions[index] = particle.position;
        self.velocities[index] = particle.velocity;
        self.radii[index] = particle.radius;
        Ok(())
    }

    pub fn particle(&self, index: usize) -> Option<Particle> {
        if index >= self.len() {
            return None;
        }
        Some(Particle {
            position: self.positions[index],
            velocity: self.velocities[index],
            mass: self.masses[index],
            radius: self.radii[index],
        })
    }

    /// Adds a force that will be consumed by the next integration.
    pub fn apply_force(&mut self, index: usize, force: Vec3) -> Result<()> {
        self.check_index(index)?;
        self.accumulated_forces[index] += force;
        Ok(())
    }

    pub fn kinetic_energy(&self) -> f32 {
        self.masses
            .iter()
            .zip(&self.velocities)
            .map(|(mass, velocity)| 0.5 * mass * velocity.length_squared())
            .sum()
    }

    pub fn validate(&self) -> Result<()> {
        for (index, (&mass, &inverse_mass)) in
            self.masses.iter().zip(&self.inverse_masses).enumerate()
        {
            let expected = if mass == 0.0 { 0.0 } else { 1.0 / mass };
            if !mass.is_finite() || mass < 0.0 || inverse_mass != expected {
                return Err(SimulationError::InvalidMass {
                    particle: index,
                    mass,
                });
            }
        }
        Ok(())
    }

    /// Splits the set into per-particle mutable views for the integrator.
    pub fn split_mut(&mut self) -> ParticleViews<'_> {
        ParticleViews {
            positions: &mut self.positions,
            velocities: &mut self.velocities,
            inverse_masses: &self.inverse_masses,
            accumulated_forces: &mut self.accumulated_forces,
        }
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.len() {
            return Err(SimulationError::ParticleIndexOutOfRange {
                list: "particle set",
                slot: index,
                index,
                count: self.len(),
            });
        }
        Ok(())
    }
}

/// Disjoint borrows of the arrays the integrator touches.
pub struct ParticleViews<'a> {
    pub positions: &'a mut [Vec3],
    pub velocities: &'a mut [Vec3],
    pub inverse_masses: &'a [f32],
    pub accumulated_forces: &'a mut [Vec3],
}

/// Mutable proxy for a single particle row, handed out by the parallel kernels.
pub struct ParticleMut<'a> {
    pub position: &'a mut Vec3,
    pub velocity: &'a mut Vec3,
    pub accumulated_force: &'a mut Vec3,
    pub inverse_mass: f32,
}

impl ParticleMut<'_> {
    pub fn is_pinned(&self) -> bool {
        self.inverse_mass == 0.0
    }
}
