//! Eight particles on the corners of a unit cube, braced by 24 springs and
//! hanging from one pinned corner under uniform gravity.

use particle_dynamics::*;

const CORNERS: [[f32; 3]; 8] = [
    [-0.5, 0.5, 0.5],
    [0.5, 0.5, 0.5],
    [-0.5, 0.5, -0.5],
    [0.5, 0.5, -0.5],
    [-0.5, -0.5, 0.5],
    [0.5, -0.5, 0.5],
    [-0.5, -0.5, -0.5],
    [0.5, -0.5, -0.5],
];

/// Cube edges followed by one diagonal pair per face.
#[rustfmt::skip]
const LINKS: [(usize, usize); 24] = [
    (0, 4), (1, 5), (2, 6), (3, 7),
    (0, 1), (2, 3), (0, 2), (1, 3),
    (4, 5), (6, 7), (4, 6), (5, 7),
    (0, 5), (1, 4), (0, 6), (2, 4), (0, 3), (1, 2),
    (2, 7), (3, 6), (1, 7), (3, 5), (4, 7), (5, 6),
];

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut particles = ParticleSet::from_particles(
        CORNERS
            .iter()
            .map(|&corner| Particle::new(Vec3::from(corner), 5.0).with_radius(0.1))
            .collect(),
    )?;
    particles.pin(0)?;

    let mut constraints = ConstraintSet::initialize(LINKS.len());
    for (slot, &(a, b)) in LINKS.iter().enumerate() {
        constraints.connect(slot, a, b, 1000.0, 10.0, &particles)?;
    }

    let config = SimulationConfig {
        profiling: true,
        ..SimulationConfig::default()
    };
    let subjects = GravityConfig::subject_all(particles.len());
    let mut world = ParticleWorld::new(
        config,
        particles,
        constraints,
        GravityConfig::uniform(config.linear_gravity, subjects),
    )?;

    for frame in 0..=180 {
        world.step(1.0 / 60.0)?;
        if frame % 30 == 0 {
            let lowest = world.particles().positions()[7];
            println!(
                "t = {:5.2}s  far corner = ({:6.3}, {:6.3}, {:6.3})  energy = {:8.3}",
                world.ticks() as f32 * world.time_step(),
                lowest.x,
                lowest.y,
                lowest.z,
                world.mechanical_energy()
            );
        }
    }

    let (particles, constraints, gravity) = world.into_parts();
    constraints.release();
    gravity.release();
    particles.release();
    Ok(())
}
