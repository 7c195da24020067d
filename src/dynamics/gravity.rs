use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{
    core::{gravity::GravityConfig, particles::ParticleSet},
    dynamics::parallel::{fill_indexed, scatter_add},
    pipeline::{Phase, PhaseHandle},
    utils::{logging::ScopedTimer, math::separation},
};

/// Which gravity law the pipeline applies each tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GravityModel {
    /// No gravity; the phase is a pass-through.
    None,
    /// `mass * linear_gravity` on every listed subject.
    #[default]
    Linear,
    /// Inverse-square attraction from emitters onto receivers.
    Spherical,
}

impl GravityModel {
    pub fn label(&self) -> &'static str {
        match self {
            GravityModel::None => "gravity::none",
            GravityModel::Linear => "gravity::linear",
            GravityModel::Spherical => "gravity::spherical",
        }
    }
}

/// Adds gravitational forces to the particle accumulators.
///
/// Per-entry forces are computed concurrently into the staging slots of the
/// [`GravityConfig`], then merged into the accumulator in list order. Only the
/// accumulator is written; positions and masses are read-only here.
#[derive(Debug, Clone)]
pub struct GravitySolver {
    model: GravityModel,
    parallel: bool,
}

impl GravitySolver {
    pub fn new(model: GravityModel) -> Self {
        Self {
            model,
            parallel: true,
        }
    }

    pub fn model(&self) -> GravityModel {
        self.model
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn apply(
        &self,
        particles: &mut ParticleSet,
        gravity: &mut GravityConfig,
        after: PhaseHandle,
    ) -> PhaseHandle {
        match self.model {
            GravityModel::None => return after,
            GravityModel::Linear => {
                let _timer = ScopedTimer::new(self.model.label());
                self.apply_linear(particles, gravity);
            }
            GravityModel::Spherical => {
                let _timer = ScopedTimer::new(self.model.label());
                self.apply_spherical(particles, gravity);
            }
        }
        after.finish(Phase::Gravity)
    }

    fn apply_linear(&self, particles: &mut ParticleSet, gravity: &mut GravityConfig) {
        let linear_gravity = gravity.linear_gravity;
        let (subjects, staged) = gravity.split_linear();

        let masses = particles.masses();
        fill_indexed(staged, self.parallel, |slot| {
            masses[subjects[slot]] * linear_gravity
        });

        scatter_add(particles.accumulated_forces_mut(), subjects, staged);
    }

    fn apply_spherical(&self, particles: &mut ParticleSet, gravity: &mut GravityConfig) {
        let gravity_constant = gravity.gravity_constant;
        let (emitters, receivers, staged) = gravity.split_spherical();

        let positions = particles.positions();
        let masses = particles.masses();
        fill_indexed(staged, self.parallel, |slot| {
            let receiver = receivers[slot];
            emitters
                .iter()
                .filter(|&&emitter| emitter != receiver)
                .fold(Vec3::ZERO, |force, &emitter| {
                    let (direction, distance) =
                        separation(positions[receiver], positions[emitter]);
                    force
                        + gravity_constant * masses[receiver] * masses[emitter]
                            / (distance * distance)
                            * direction
                })
        });

        scatter_add(particles.accumulated_forces_mut(), receivers, staged);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::particles::Particle;

    fn pair(distance: f32, mass_a: f32, mass_b: f32) -> ParticleSet {
        ParticleSet::from_particles(vec![
            Particle::new(Vec3::ZERO, mass_a),
            Particle::new(Vec3::new(distance, 0.0, 0.0), mass_b),
        ])
        .unwrap()
    }

    #[test]
    fn linear_gravity_only_touches_subjects() {
        let mut particles = pair(1.0, 2.0, 3.0);
        let mut gravity = GravityConfig::uniform(Vec3::new(0.0, -10.0, 0.0), vec![1]);

        let handle = GravitySolver::new(GravityModel::Linear).apply(
            &mut particles,
            &mut gravity,
            PhaseHandle::new(),
        );

        assert_eq!(handle.completed(), Phase::Gravity);
        assert_eq!(particles.accumulated_forces()[0], Vec3::ZERO);
        assert_eq!(particles.accumulated_forces()[1], Vec3::new(0.0, -30.0, 0.0));
    }

    #[test]
    fn spherical_gravity_follows_inverse_square() {
        let mut particles = pair(2.0, 3.0, 5.0);
        let mut gravity = GravityConfig::spherical(2.0, vec![0], vec![1]);

        let _handle = GravitySolver::new(GravityModel::Spherical).apply(
            &mut particles,
            &mut gravity,
            PhaseHandle::new(),
        );

        // Receiver 1 is pulled toward emitter 0 along -X with G*m1*m2/d^2 = 7.5.
        let force = particles.accumulated_forces()[1];
        assert!((force.x + 7.5).abs() < 1e-4, "force = {force}");
        assert!(force.y.abs() < 1e-6 && force.z.abs() < 1e-6);
        assert_eq!(particles.accumulated_forces()[0], Vec3::ZERO);
    }

    #[test]
    fn self_interaction_is_skipped_without_dropping_other_emitters() {
        let mut particles = pair(1.0, 4.0, 1.0);
        // Receiver 1 is also the first emitter; emitter 0 must still act on it.
        let mut gravity = GravityConfig::spherical(1.0, vec![1, 0], vec![1]);

        let _handle = GravitySolver::new(GravityModel::Spherical).apply(
            &mut particles,
            &mut gravity,
            PhaseHandle::new(),
        );

        let force = particles.accumulated_forces()[1];
        assert!((force.x + 4.0).abs() < 1e-4, "force = {force}");
    }

    #[test]
    fn none_model_passes_the_handle_through() {
        let mut particles = pair(1.0, 1.0, 1.0);
        let mut gravity = GravityConfig::uniform(Vec3::NEG_Y, vec![0, 1]);

        let handle = GravitySolver::new(GravityModel::None).apply(
            &mut particles,
            &mut gravity,
            PhaseHandle::new(),
        );

        assert_eq!(handle.completed(), Phase::Idle);
        assert!(particles.accumulated_forces().iter().all(|f| *f == Vec3::ZERO));
    }
}
