use glam::Vec3;

use crate::config::{DEFAULT_GRAVITY_CONSTANT, DEFAULT_LINEAR_GRAVITY};
use crate::error::{Result, SimulationError};

/// Gravity parameters and the particle lists they act on.
///
/// `linear_gravity` and `gravity_constant` may be changed between ticks.
/// The index lists keep the length chosen at [`GravityConfig::initialize`].
#[derive(Debug, Clone)]
pub struct GravityConfig {
    pub linear_gravity: Vec3,
    pub gravity_constant: f32,
    linear_subjects: Vec<usize>,
    spherical_emitters: Vec<usize>,
    spherical_receivers: Vec<usize>,
    // Staged per-entry forces, merged into the accumulator in list order.
    solved_linear: Vec<Vec3>,
    solved_spherical: Vec<Vec3>,
}

impl Default for GravityConfig {
    fn default() -> Self {
        Self::initialize(0, 0, 0)
    }
}

impl GravityConfig {
    pub fn initialize(linear_count: usize, emitter_count: usize, receiver_count: usize) -> Self {
        log::debug!(
            "allocating gravity lists: {linear_count} linear, {emitter_count} emitters, {receiver_count} receivers"
        );
        Self {
            linear_gravity: Vec3::from_array(DEFAULT_LINEAR_GRAVITY),
            gravity_constant: DEFAULT_GRAVITY_CONSTANT,
            linear_subjects: vec![0; linear_count],
            spherical_emitters: vec![0; emitter_count],
            spherical_receivers: vec![0; receiver_count],
            solved_linear: vec![Vec3::ZERO; linear_count],
            solved_spherical: vec![Vec3::ZERO; receiver_count],
        }
    }

    /// Uniform gravity acting on the listed particles.
    pub fn uniform(linear_gravity: Vec3, subjects: Vec<usize>) -> Self {
        let mut config = Self::initialize(subjects.len(), 0, 0);
        config.linear_gravity = linear_gravity;
        config.linear_subjects = subjects;
        config
    }

    /// Inverse-square attraction from `emitters` onto `receivers`.
    pub fn spherical(gravity_constant: f32, emitters: Vec<usize>, receivers: Vec<usize>) -> Self {
        let mut config = Self::initialize(0, emitters.len(), receivers.len());
        config.gravity_constant = gravity_constant;
        config.spherical_emitters = emitters;
        config.spherical_receivers = receivers;
        config
    }

    /// Convenience list covering every particle in a set of `count`.
    pub fn subject_all(count: usize) -> Vec<usize> {
        (0..count).collect()
    }

    pub fn release(self) {
        log::debug!(
            "releasing gravity lists ({} linear, {} emitters, {} receivers)",
            self.linear_subjects.len(),
            self.spherical_emitters.len(),
            self.spherical_receivers.len()
        );
    }

    pub fn linear_subjects(&self) -> &[usize] {
        &self.linear_subjects
    }

    pub fn linear_subjects_mut(&mut self) -> &mut [usize] {
        &mut self.linear_subjects
    }

    pub fn spherical_emitters(&self) -> &[usize] {
        &self.spherical_emitters
    }

    pub fn spherical_emitters_mut(&mut self) -> &mut [usize] {
        &mut self.spherical_emitters
    }

    pub fn spherical_receivers(&self) -> &[usize] {
        &self.spherical_receivers
    }

    pub fn spherical_receivers_mut(&mut self) -> &mut [usize] {
        &mut self.spherical_receivers
    }

    pub fn validate(&self, particle_count: usize) -> Result<()> {
        for (list, indices) in [
            ("linear gravity subjects", &self.linear_subjects),
            ("spherical emitters", &self.spherical_emitters),
            ("spherical receivers", &self.spherical_receivers),
        ] {
            if let Some((slot, &index)) = indices
                .iter()
                .enumerate()
                .find(|(_, index)| **index >= particle_count)
            {
                return Err(SimulationError::ParticleIndexOutOfRange {
                    list,
                    slot,
                    index,
                    count: particle_count,
                });
            }
        }
        Ok(())
    }

    pub(crate) fn split_linear(&mut self) -> (&[usize], &mut [Vec3]) {
        (&self.linear_subjects, &mut self.solved_linear)
    }

    pub(crate) fn split_spherical(&mut self) -> (&[usize], &[usize], &mut [Vec3]) {
        (
            &self.spherical_emitters,
            &self.spherical_receivers,
            &mut self.solved_spherical,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initialize_sizes_every_list() {
        let config = GravityConfig::initialize(3, 1, 2);
        assert_eq!(config.linear_subjects().len(), 3);
        assert_eq!(config.spherical_emitters().len(), 1);
        assert_eq!(config.spherical_receivers().len(), 2);
        assert_eq!(config.linear_gravity, Vec3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn validation_names_the_offending_list() {
        let config = GravityConfig::spherical(1.0, vec![0, 1], vec![1, 4]);
        let err = config.validate(2).unwrap_err();
        assert_eq!(
            err,
            SimulationError::ParticleIndexOutOfRange {
                list: "spherical receivers",
                slot: 1,
                index: 4,
                count: 2,
            }
        );
        assert!(GravityConfig::uniform(Vec3::NEG_Y, GravityConfig::subject_all(5))
            .validate(5)
            .is_ok());
    }
}
