use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::{
    core::particles::{ParticleMut, ParticleSet},
    dynamics::parallel::for_each_particle,
    pipeline::{Phase, PhaseHandle},
    utils::logging::ScopedTimer,
};

/// Time-stepping scheme used to advance particles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum IntegrationMethod {
    /// Position from the previous velocity, then velocity from the force.
    ExplicitEuler,
    /// Velocity from the force, then position from the new velocity.
    #[default]
    SemiImplicitEuler,
}

impl IntegrationMethod {
    pub fn label(&self) -> &'static str {
        match self {
            IntegrationMethod::ExplicitEuler => "integrator::explicit_euler",
            IntegrationMethod::SemiImplicitEuler => "integrator::semi_implicit_euler",
        }
    }
}

/// Integrator responsible for stepping particles forward in time.
#[derive(Debug, Clone)]
pub struct Integrator {
    method: IntegrationMethod,
    parallel: bool,
}

impl Integrator {
    pub fn new(method: IntegrationMethod) -> Self {
        Self {
            method,
            parallel: true,
        }
    }

    pub fn method(&self) -> IntegrationMethod {
        self.method
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    /// Advances every particle by `dt` and clears its accumulator.
    ///
    /// Pinned particles keep their position and velocity; any force they
    /// received this tick is discarded.
    pub fn advance(&self, particles: &mut ParticleSet, dt: f32, after: PhaseHandle) -> PhaseHandle {
        let _timer = ScopedTimer::new(self.method.label());
        let method = self.method;
        for_each_particle(particles.split_mut(), self.parallel, |mut particle| {
            Self::integrate(method, &mut particle, dt);
        });
        after.finish(Phase::Integrate)
    }

    pub fn integrate(method: IntegrationMethod, particle: &mut ParticleMut<'_>, dt: f32) {
        if !particle.is_pinned() {
            let acceleration = *particle.accumulated_force * particle.inverse_mass;
            match method {
                IntegrationMethod::SemiImplicitEuler => {
                    *particle.velocity += acceleration * dt;
                    *particle.position += *particle.velocity * dt;
                }
                IntegrationMethod::ExplicitEuler => {
                    *particle.position += *particle.velocity * dt;
                    *particle.velocity += acceleration * dt;
                }
            }
        }
        *particle.accumulated_force = Vec3::ZERO;
    }
}
