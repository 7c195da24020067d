use particle_dynamics::*;
use std::sync::{Arc, Mutex};
use std::thread;

fn lattice(side: usize) -> (ParticleSet, ConstraintSet) {
    let index = |x: usize, y: usize, z: usize| (x * side + y) * side + z;
    let mut particles = ParticleSet::initialize(side * side * side);
    for x in 0..side {
        for y in 0..side {
            for z in 0..side {
                let i = index(x, y, z);
                particles.positions_mut()[i] = Vec3::new(x as f32, y as f32, z as f32) * 0.5;
                particles.set_mass(i, 1.0).unwrap();
            }
        }
    }
    particles.pin(0).unwrap();

    let mut links = Vec::new();
    for x in 0..side {
        for y in 0..side {
            for z in 0..side {
                if x + 1 < side {
                    links.push((index(x, y, z), index(x + 1, y, z)));
                }
                if y + 1 < side {
                    links.push((index(x, y, z), index(x, y + 1, z)));
                }
                if z + 1 < side {
                    links.push((index(x, y, z), index(x, y, z + 1)));
                }
            }
        }
    }
    let mut constraints = ConstraintSet::initialize(links.len());
    for (slot, &(a, b)) in links.iter().enumerate() {
        constraints.connect(slot, a, b, 800.0, 4.0, &particles).unwrap();
    }
    (particles, constraints)
}

fn lattice_world(parallel: bool) -> ParticleWorld {
    let (particles, constraints) = lattice(6);
    let count = particles.len();
    ParticleWorld::new(
        SimulationConfig {
            parallel,
            ..SimulationConfig::default()
        },
        particles,
        constraints,
        GravityConfig::uniform(Vec3::new(0.0, -9.81, 0.0), GravityConfig::subject_all(count)),
    )
    .unwrap()
}

#[test]
fn test_particle_world_is_sync_and_send() {
    fn assert_sync_send<T: Sync + Send>() {}
    assert_sync_send::<ParticleWorld>();
    assert_sync_send::<SimulationPipeline>();
}

#[test]
fn parallel_and_sequential_ticks_agree() {
    let mut sequential = lattice_world(false);
    let mut parallel = lattice_world(true);
    assert!(sequential.constraints().len() >= 64, "lattice must be big enough to fan out");

    for _ in 0..100 {
        let _ = sequential.tick().unwrap();
        let _ = parallel.tick().unwrap();
    }

    assert_eq!(
        sequential.particles().positions(),
        parallel.particles().positions()
    );
    assert_eq!(
        sequential.particles().velocities(),
        parallel.particles().velocities()
    );
}

#[test]
fn spherical_gravity_agrees_across_modes() {
    let build = |parallel: bool| {
        let count = 96;
        let mut particles = ParticleSet::initialize(count);
        for i in 0..count {
            let angle = i as f32 * 0.37;
            particles.positions_mut()[i] =
                Vec3::new(angle.cos(), angle.sin(), i as f32 * 0.01) * (1.0 + i as f32 * 0.1);
            particles.set_mass(i, 1.0 + (i % 5) as f32).unwrap();
        }
        let all = GravityConfig::subject_all(count);
        ParticleWorld::new(
            SimulationConfig {
                gravity_model: GravityModel::Spherical,
                gravity_constant: 0.01,
                parallel,
                ..SimulationConfig::default()
            },
            particles,
            ConstraintSet::initialize(0),
            GravityConfig::spherical(0.01, all.clone(), all),
        )
        .unwrap()
    };

    let mut sequential = build(false);
    let mut parallel = build(true);
    for _ in 0..20 {
        let _ = sequential.tick().unwrap();
        let _ = parallel.tick().unwrap();
    }
    assert_eq!(
        sequential.particles().positions(),
        parallel.particles().positions()
    );
}

#[test]
fn test_shared_particle_world_across_threads() {
    let world = Arc::new(Mutex::new(lattice_world(true)));

    let mut handles = vec![];
    for _ in 0..4 {
        let world_clone = Arc::clone(&world);
        let handle = thread::spawn(move || {
            let mut world = world_clone.lock().unwrap();
            world.step(0.0101).unwrap();
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(world.lock().unwrap().ticks(), 16);
}
