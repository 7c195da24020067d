//! Per-tick orchestration: gravity, then constraints, then integration.

use std::time::Instant;

use crate::{
    config::SimulationConfig,
    core::{constraints::ConstraintSet, gravity::GravityConfig, particles::ParticleSet},
    dynamics::{
        constraint_solver::ConstraintSolver,
        gravity::{GravityModel, GravitySolver},
        integrator::{IntegrationMethod, Integrator},
    },
    error::{Result, SimulationError},
    utils::profiling::{PipelineProfiler, ScopedTimer},
};

/// Steps of a tick, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Phase {
    #[default]
    Idle,
    Gravity,
    ConstraintSolve,
    Accumulate,
    Integrate,
}

/// Completion token threaded from one phase into the next.
///
/// Every phase runs to completion before returning its handle, so holding a
/// handle means all writes of the phases up to [`PhaseHandle::completed`] are
/// visible. Phases only ever move forward within a tick.
#[must_use = "pass the handle to the next phase"]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhaseHandle {
    completed: Phase,
}

impl PhaseHandle {
    /// Handle for a tick that has not run any phase yet.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn completed(&self) -> Phase {
        self.completed
    }

    pub(crate) fn finish(self, phase: Phase) -> Self {
        debug_assert!(
            phase > self.completed,
            "phase {phase:?} scheduled after {:?}",
            self.completed
        );
        Self { completed: phase }
    }
}

/// Runs the three solver stages once per fixed tick.
#[derive(Debug, Clone)]
pub struct SimulationPipeline {
    gravity: GravitySolver,
    constraints: ConstraintSolver,
    integrator: Integrator,
    parallel_enabled: bool,
    profiler: Option<PipelineProfiler>,
}

impl Default for SimulationPipeline {
    fn default() -> Self {
        Self::new(GravityModel::default(), IntegrationMethod::default())
    }
}

impl SimulationPipeline {
    pub fn new(gravity_model: GravityModel, integration_method: IntegrationMethod) -> Self {
        Self {
            gravity: GravitySolver::new(gravity_model),
            constraints: ConstraintSolver::new(),
            integrator: Integrator::new(integration_method),
            parallel_enabled: true,
            profiler: None,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        let mut pipeline = Self::new(config.gravity_model, config.integration_method);
        pipeline.set_parallel_enabled(config.parallel);
        pipeline.set_profiling_enabled(config.profiling);
        pipeline
    }

    pub fn set_parallel_enabled(&mut self, enabled: bool) {
        self.parallel_enabled = enabled;
        self.gravity.set_parallel(enabled);
        self.constraints.set_parallel(enabled);
        self.integrator.set_parallel(enabled);
    }

    pub fn parallel_enabled(&self) -> bool {
        self.parallel_enabled
    }

    pub fn set_profiling_enabled(&mut self, enabled: bool) {
        self.profiler = enabled.then(PipelineProfiler::default);
    }

    pub fn profiler(&self) -> Option<&PipelineProfiler> {
        self.profiler.as_ref()
    }

    pub fn gravity_model(&self) -> GravityModel {
        self.gravity.model()
    }

    pub fn integration_method(&self) -> IntegrationMethod {
        self.integrator.method()
    }

    /// Checks that every store agrees with the particle count.
    pub fn validate(
        particles: &ParticleSet,
        constraints: &ConstraintSet,
        gravity: &GravityConfig,
    ) -> Result<()> {
        particles.validate()?;
        constraints.validate(particles.len())?;
        gravity.validate(particles.len())?;
        Ok(())
    }

    /// Runs one fixed step. Returns once every phase has completed.
    pub fn tick(
        &mut self,
        particles: &mut ParticleSet,
        constraints: &mut ConstraintSet,
        gravity: &mut GravityConfig,
        dt: f32,
    ) -> Result<PhaseHandle> {
        if !dt.is_finite() || dt <= 0.0 {
            return Err(SimulationError::InvalidTimeStep(dt));
        }

        let Some(profiler) = self.profiler.as_mut() else {
            let handle = self.gravity.apply(particles, gravity, PhaseHandle::new());
            let handle = self.constraints.apply(particles, constraints, handle);
            return Ok(self.integrator.advance(particles, dt, handle));
        };

        let start = Instant::now();
        let handle = {
            let _timer = ScopedTimer::new(profiler.phase_time_mut(Phase::Gravity));
            self.gravity.apply(particles, gravity, PhaseHandle::new())
        };
        let handle = {
            let _timer = ScopedTimer::new(profiler.phase_time_mut(Phase::ConstraintSolve));
            self.constraints.solve(particles, constraints, handle)
        };
        let handle = {
            let _timer = ScopedTimer::new(profiler.phase_time_mut(Phase::Accumulate));
            ConstraintSolver::accumulate(particles, constraints, handle)
        };
        let handle = {
            let _timer = ScopedTimer::new(profiler.phase_time_mut(Phase::Integrate));
            self.integrator.advance(particles, dt, handle)
        };
        profiler.total_tick_time += start.elapsed();
        profiler.tick_count += 1;
        profiler.particle_count = particles.len();
        profiler.constraint_count = constraints.len();
        Ok(handle)
    }
}
