//! A light body in a circular orbit around a heavy one.

use particle_dynamics::*;

const CENTRAL_MASS: f32 = 100_000.0;
const ORBIT_RADIUS: f32 = 20.0;
const ORBIT_SPEED: f32 = 10.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Circular when G * M / r == v^2.
    let gravity_constant = ORBIT_SPEED * ORBIT_SPEED * ORBIT_RADIUS / CENTRAL_MASS;

    let particles = ParticleSet::from_particles(vec![
        Particle::new(Vec3::ZERO, CENTRAL_MASS).with_radius(CENTRAL_MASS / 10_000.0),
        Particle::new(Vec3::new(ORBIT_RADIUS, 0.0, 0.0), 1.0)
            .with_velocity(Vec3::new(0.0, 0.0, ORBIT_SPEED)),
    ])?;

    let mut world = ParticleWorld::new(
        SimulationConfig {
            gravity_model: GravityModel::Spherical,
            gravity_constant,
            ..SimulationConfig::default()
        },
        particles,
        ConstraintSet::initialize(0),
        GravityConfig::spherical(gravity_constant, vec![0], vec![1]),
    )?;

    let period = std::f32::consts::TAU * ORBIT_RADIUS / ORBIT_SPEED;
    let frames = (period * 60.0).ceil() as usize;
    for frame in 0..=frames {
        world.step(1.0 / 60.0)?;
        if frame % 60 == 0 {
            let position = world.particles().positions()[1];
            println!(
                "t = {:5.2}s  r = {:7.3}  position = ({:7.3}, {:7.3}, {:7.3})",
                world.ticks() as f32 * world.time_step(),
                position.length(),
                position.x,
                position.y,
                position.z
            );
        }
    }
    Ok(())
}
