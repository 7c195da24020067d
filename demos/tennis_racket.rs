//! Intermediate axis demo: a stiff spring box with an off-axis weight is
//! spun up by an initial force couple and left to tumble in free space.

use particle_dynamics::*;

const POSITIONS: [[f32; 3]; 9] = [
    [-0.5, 1.0, 0.5],
    [0.5, 1.0, 0.5],
    [-0.5, 1.0, -0.5],
    [0.5, 1.0, -0.5],
    [-0.5, -1.0, 0.5],
    [0.5, -1.0, 0.5],
    [-0.5, -1.0, -0.5],
    [0.5, -1.0, -0.5],
    [2.0, 0.0, 0.0],
];

#[rustfmt::skip]
const BOX_LINKS: [(usize, usize); 24] = [
    (0, 4), (1, 5), (2, 6), (3, 7),
    (0, 1), (2, 3), (0, 2), (1, 3),
    (4, 5), (6, 7), (4, 6), (5, 7),
    (0, 5), (1, 4), (0, 6), (2, 4), (0, 3), (1, 2),
    (2, 7), (3, 6), (1, 7), (3, 5), (4, 7), (5, 6),
];

const WEIGHT: usize = 8;
const SPIN_FORCE: f32 = 100_000.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut particles = ParticleSet::from_particles(
        POSITIONS
            .iter()
            .map(|&position| Particle::new(Vec3::from(position), 5.0).with_radius(0.1))
            .collect(),
    )?;
    particles.set_mass(WEIGHT, 2.5)?;

    // The top face is pushed one way and the bottom face the other.
    for (particle, sign) in [(2, 1.0), (3, 1.0), (4, -1.0), (5, -1.0)] {
        particles.apply_force(particle, Vec3::new(0.0, 0.0, sign * SPIN_FORCE))?;
    }

    let links: Vec<(usize, usize)> = BOX_LINKS
        .iter()
        .copied()
        .chain((0..WEIGHT).map(|corner| (corner, WEIGHT)))
        .collect();
    let mut constraints = ConstraintSet::initialize(links.len());
    for (slot, &(a, b)) in links.iter().enumerate() {
        constraints.connect(slot, a, b, 50_000.0, 10.0, &particles)?;
    }

    let subjects = GravityConfig::subject_all(particles.len());
    let mut world = ParticleWorld::new(
        SimulationConfig {
            linear_gravity: Vec3::ZERO,
            ..SimulationConfig::default()
        },
        particles,
        constraints,
        GravityConfig::uniform(Vec3::ZERO, subjects),
    )?;

    for frame in 0..=600 {
        world.step(1.0 / 60.0)?;
        if frame % 60 == 0 {
            let positions = world.particles().positions();
            let centre = positions.iter().copied().sum::<Vec3>() / positions.len() as f32;
            let arm = (positions[WEIGHT] - centre).normalize_or_zero();
            println!(
                "t = {:5.2}s  weight axis = ({:6.3}, {:6.3}, {:6.3})",
                world.ticks() as f32 * world.time_step(),
                arm.x,
                arm.y,
                arm.z
            );
        }
    }
    Ok(())
}
