use std::time::Instant;

use glam::Vec3;

use crate::{
    config::SimulationConfig,
    core::{constraints::ConstraintSet, gravity::GravityConfig, particles::ParticleSet},
    error::{Result, SimulationError},
    pipeline::{PhaseHandle, SimulationPipeline},
    utils::logging::warn_if_tick_budget_exceeded,
};

/// Owns the particle, constraint, and gravity stores for one simulation run.
///
/// The stores are validated once on construction. Afterwards only positions,
/// velocities, radii, and the live gravity parameters can be edited, so the
/// index lists stay consistent for the lifetime of the world.
#[derive(Debug)]
pub struct ParticleWorld {
    particles: ParticleSet,
    constraints: ConstraintSet,
    gravity: GravityConfig,
    pipeline: SimulationPipeline,
    time_step: f32,
    time_accumulated: f32,
    tick_budget_ms: Option<f32>,
    ticks: u64,
}

impl ParticleWorld {
    pub fn new(
        config: SimulationConfig,
        particles: ParticleSet,
        constraints: ConstraintSet,
        mut gravity: GravityConfig,
    ) -> Result<Self> {
        if let Err(err) = Self::check_setup(&config, &particles, &constraints, &gravity) {
            log::warn!("rejecting simulation setup: {err}");
            return Err(err);
        }

        gravity.linear_gravity = config.linear_gravity;
        gravity.gravity_constant = config.gravity_constant;

        log::debug!(
            "particle world ready: {} particles, {} constraints, {:?} gravity, {:?}, dt = {}",
            particles.len(),
            constraints.len(),
            config.gravity_model,
            config.integration_method,
            config.fixed_time_step
        );

        Ok(Self {
            particles,
            constraints,
            gravity,
            pipeline: SimulationPipeline::from_config(&config),
            time_step: config.fixed_time_step,
            time_accumulated: 0.0,
            tick_budget_ms: config.tick_budget_ms,
            ticks: 0,
        })
    }

    fn check_setup(
        config: &SimulationConfig,
        particles: &ParticleSet,
        constraints: &ConstraintSet,
        gravity: &GravityConfig,
    ) -> Result<()> {
        if !config.fixed_time_step.is_finite() || config.fixed_time_step <= 0.0 {
            return Err(SimulationError::InvalidTimeStep(config.fixed_time_step));
        }
        if particles.is_empty() {
            return Err(SimulationError::EmptyStore {
                store: "particle set",
            });
        }
        SimulationPipeline::validate(particles, constraints, gravity)
    }

    /// Runs exactly one fixed tick.
    pub fn tick(&mut self) -> Result<PhaseHandle> {
        let start = Instant::now();
        let handle = self.pipeline.tick(
            &mut self.particles,
            &mut self.constraints,
            &mut self.gravity,
            self.time_step,
        )?;
        self.ticks += 1;
        if let Some(budget_ms) = self.tick_budget_ms {
            warn_if_tick_budget_exceeded(start.elapsed(), budget_ms);
        }
        Ok(handle)
    }

    /// Advances by `elapsed` seconds using a fixed timestep accumulator.
    /// Returns how many ticks ran; the remainder carries into the next call.
    pub fn step(&mut self, elapsed: f32) -> Result<usize> {
        self.time_accumulated += elapsed.max(0.0);

        let mut ticks = 0;
        while self.time_accumulated >= self.time_step {
            self.time_accumulated -= self.time_step;
            let _ = self.tick()?;
            ticks += 1;
        }
        Ok(ticks)
    }

    pub fn set_linear_gravity(&mut self, gravity: Vec3) {
        self.gravity.linear_gravity = gravity;
    }

    pub fn set_gravity_constant(&mut self, gravity_constant: f32) {
        self.gravity.gravity_constant = gravity_constant;
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.pipeline.set_parallel_enabled(enabled);
    }

    pub fn particles(&self) -> &ParticleSet {
        &self.particles
    }

    /// Mutable access for caller edits between ticks. The particle count is fixed.
    pub fn particles_mut(&mut self) -> &mut ParticleSet {
        &mut self.particles
    }

    pub fn constraints(&self) -> &ConstraintSet {
        &self.constraints
    }

    pub fn gravity(&self) -> &GravityConfig {
        &self.gravity
    }

    pub fn pipeline(&self) -> &SimulationPipeline {
        &self.pipeline
    }

    pub fn time_step(&self) -> f32 {
        self.time_step
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Total energy currently held as motion and spring stretch.
    pub fn mechanical_energy(&self) -> f32 {
        self.particles.kinetic_energy() + self.constraints.potential_energy(&self.particles)
    }

    /// Tears the world down and hands the stores back to the caller.
    pub fn into_parts(self) -> (ParticleSet, ConstraintSet, GravityConfig) {
        if let Some(profiler) = self.pipeline.profiler() {
            profiler.report();
        }
        (self.particles, self.constraints, self.gravity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{constraints::Constraint, particles::Particle};

    fn single_particle_world(config: SimulationConfig) -> ParticleWorld {
        let particles =
            ParticleSet::from_particles(vec![Particle::new(Vec3::ZERO, 1.0)]).unwrap();
        ParticleWorld::new(
            config,
            particles,
            ConstraintSet::initialize(0),
            GravityConfig::uniform(Vec3::ZERO, vec![0]),
        )
        .unwrap()
    }

    #[test]
    fn step_runs_whole_ticks_and_carries_the_rest() {
        let mut world = single_particle_world(SimulationConfig {
            fixed_time_step: 0.01,
            ..SimulationConfig::default()
        });

        assert_eq!(world.step(0.025).unwrap(), 2);
        assert_eq!(world.step(0.004).unwrap(), 0);
        assert_eq!(world.step(0.002).unwrap(), 1);
        assert_eq!(world.ticks(), 3);
    }

    #[test]
    fn config_gravity_overrides_the_store() {
        let world = single_particle_world(SimulationConfig {
            linear_gravity: Vec3::new(0.0, -1.62, 0.0),
            ..SimulationConfig::default()
        });
        assert_eq!(world.gravity().linear_gravity, Vec3::new(0.0, -1.62, 0.0));
    }

    #[test]
    fn rejects_bad_setups() {
        let empty = ParticleWorld::new(
            SimulationConfig::default(),
            ParticleSet::initialize(0),
            ConstraintSet::initialize(0),
            GravityConfig::default(),
        );
        assert!(matches!(empty, Err(SimulationError::EmptyStore { .. })));

        let dangling = ParticleWorld::new(
            SimulationConfig::default(),
            ParticleSet::initialize(2),
            ConstraintSet::from_constraints(vec![Constraint::new(0, 2, 1.0, 0.0)]),
            GravityConfig::default(),
        );
        assert!(matches!(
            dangling,
            Err(SimulationError::ParticleIndexOutOfRange { index: 2, .. })
        ));

        let zero_step = ParticleWorld::new(
            SimulationConfig {
                fixed_time_step: 0.0,
                ..SimulationConfig::default()
            },
            ParticleSet::initialize(1),
            ConstraintSet::initialize(0),
            GravityConfig::default(),
        );
        assert!(matches!(zero_step, Err(SimulationError::InvalidTimeStep(_))));
    }
}
