use glam::Vec3;

use crate::{
    core::{
        constraints::{ConstraintSet, ConstraintSolveViews},
        particles::ParticleSet,
    },
    dynamics::parallel::fill_indexed_pairs,
    pipeline::{Phase, PhaseHandle},
    utils::{logging::ScopedTimer, math::separation},
};

/// Spring-damper solver for a [`ConstraintSet`].
///
/// Runs in two steps. The solve step computes each constraint's force pair
/// concurrently into the constraint scratch slots. The accumulate step then
/// adds those pairs to the particle accumulators one constraint at a time,
/// in index order, because several constraints may share an endpoint.
#[derive(Debug, Clone)]
pub struct ConstraintSolver {
    parallel: bool,
}

impl Default for ConstraintSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ConstraintSolver {
    pub fn new() -> Self {
        Self { parallel: true }
    }

    pub fn set_parallel(&mut self, enabled: bool) {
        self.parallel = enabled;
    }

    pub fn apply(
        &self,
        particles: &mut ParticleSet,
        constraints: &mut ConstraintSet,
        after: PhaseHandle,
    ) -> PhaseHandle {
        let solved = self.solve(particles, constraints, after);
        Self::accumulate(particles, constraints, solved)
    }

    /// Writes `F` and `-F` for every constraint. Reads positions and velocities only.
    pub fn solve(
        &self,
        particles: &ParticleSet,
        constraints: &mut ConstraintSet,
        after: PhaseHandle,
    ) -> PhaseHandle {
        let _timer = ScopedTimer::new("constraints::solve");
        let positions = particles.positions();
        let velocities = particles.velocities();
        let ConstraintSolveViews {
            particle_ids,
            stiffness,
            damping,
            rest_lengths,
            solved_forces_a,
            solved_forces_b,
        } = constraints.split_solve();

        fill_indexed_pairs(solved_forces_a, solved_forces_b, self.parallel, |index| {
            let [a, b] = particle_ids[index];
            let force = spring_force(
                positions[a],
                positions[b],
                velocities[a] - velocities[b],
                stiffness[index],
                damping[index],
                rest_lengths[index],
            );
            (force, -force)
        });

        after.finish(Phase::ConstraintSolve)
    }

    /// Sequential scatter-add of the solved pairs into the particle accumulators.
    pub fn accumulate(
        particles: &mut ParticleSet,
        constraints: &ConstraintSet,
        after: PhaseHandle,
    ) -> PhaseHandle {
        let _timer = ScopedTimer::new("constraints::accumulate");
        let accumulated_forces = particles.accumulated_forces_mut();
        for ((&[a, b], &force_a), &force_b) in constraints
            .pairs()
            .iter()
            .zip(constraints.solved_forces_a())
            .zip(constraints.solved_forces_b())
        {
            accumulated_forces[a] += force_a;
            accumulated_forces[b] += force_b;
        }
        after.finish(Phase::Accumulate)
    }
}

/// Force on endpoint A of a spring-damper; endpoint B receives the negation.
///
/// Positive when the spring is compressed (pushes A away from B), negative
/// when stretched. Damping opposes the relative velocity along the current axis.
#[inline]
pub fn spring_force(
    position_a: Vec3,
    position_b: Vec3,
    relative_velocity: Vec3,
    stiffness: f32,
    damping: f32,
    rest_length: f32,
) -> Vec3 {
    let (direction, distance) = separation(position_b, position_a);
    let spring = stiffness * (rest_length - distance);
    let damper = -damping * relative_velocity.dot(direction);
    (spring + damper) * direction
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{constraints::Constraint, particles::Particle};

    fn stretched_pair() -> (ParticleSet, ConstraintSet) {
        let particles = ParticleSet::from_particles(vec![
            Particle::new(Vec3::ZERO, 1.0),
            Particle::new(Vec3::new(2.0, 0.0, 0.0), 1.0),
        ])
        .unwrap();
        let constraints = ConstraintSet::from_constraints(vec![
            Constraint::new(0, 1, 1000.0, 0.0).with_rest_length(1.0),
        ]);
        (particles, constraints)
    }

    #[test]
    fn stretched_spring_pulls_endpoints_together() {
        let (mut particles, mut constraints) = stretched_pair();

        let handle = ConstraintSolver::new().apply(
            &mut particles,
            &mut constraints,
            PhaseHandle::new(),
        );
        assert_eq!(handle.completed(), Phase::Accumulate);

        // A sits at the origin, B at +X: A is pulled toward +X with magnitude 1000.
        let on_a = constraints.solved_forces_a()[0];
        assert!((on_a - Vec3::new(1000.0, 0.0, 0.0)).length() < 1e-2, "{on_a}");
        assert_eq!(constraints.solved_forces_b()[0], -on_a);
        assert_eq!(particles.accumulated_forces()[0], on_a);
        assert_eq!(particles.accumulated_forces()[1], -on_a);
    }

    #[test]
    fn damping_opposes_separation_speed() {
        let force = spring_force(
            Vec3::ZERO,
            Vec3::X,
            Vec3::new(-2.0, 0.0, 0.0),
            0.0,
            5.0,
            1.0,
        );
        // A moves away from B (toward -X), so damping drags A back toward +X.
        assert!((force - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4, "{force}");
    }

    #[test]
    fn coincident_endpoints_give_finite_force() {
        let force = spring_force(Vec3::ONE, Vec3::ONE, Vec3::X, 100.0, 1.0, 1.0);
        assert!(force.is_finite());
    }

    #[test]
    fn shared_endpoints_accumulate_every_contribution() {
        // Particle 1 hangs between two springs, both stretched by one unit.
        let mut particles = ParticleSet::from_particles(vec![
            Particle::new(Vec3::new(-2.0, 0.0, 0.0), 1.0),
            Particle::new(Vec3::ZERO, 1.0),
            Particle::new(Vec3::new(2.0, 0.0, 0.0), 1.0),
        ])
        .unwrap();
        let mut constraints = ConstraintSet::from_constraints(vec![
            Constraint::new(0, 1, 10.0, 0.0).with_rest_length(1.0),
            Constraint::new(1, 2, 10.0, 0.0).with_rest_length(1.0),
        ]);

        let _handle =
            ConstraintSolver::new().apply(&mut particles, &mut constraints, PhaseHandle::new());

        let forces = particles.accumulated_forces();
        assert!(forces[1].length() < 1e-4, "balanced middle particle: {}", forces[1]);
        assert!((forces[0].x - 10.0).abs() < 1e-3);
        assert!((forces[2].x + 10.0).abs() < 1e-3);
    }
}
