//! Fork-join helpers shared by the solver kernels.
//!
//! Each helper returns only once every item has been processed, which is the
//! barrier the pipeline relies on between phases. Without the `parallel`
//! feature, or for short work lists, items run in order on the calling thread.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use glam::Vec3;

use crate::config::PARALLEL_MIN_ITEMS;
use crate::core::particles::{ParticleMut, ParticleViews};

/// Whether a work list of `len` items should be spread across the thread pool.
#[inline]
pub fn should_fan_out(parallel: bool, len: usize) -> bool {
    cfg!(feature = "parallel") && parallel && len >= PARALLEL_MIN_ITEMS
}

/// Writes `kernel(i)` into `out[i]` for every slot.
pub fn fill_indexed<T, F>(out: &mut [T], parallel: bool, kernel: F)
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    #[cfg(feature = "parallel")]
    if should_fan_out(parallel, out.len()) {
        out.par_iter_mut()
            .enumerate()
            .for_each(|(i, slot)| *slot = kernel(i));
        return;
    }

    let _ = parallel;
    for (i, slot) in out.iter_mut().enumerate() {
        *slot = kernel(i);
    }
}

/// Like [`fill_indexed`], but the kernel produces one value for each of two parallel slices.
pub fn fill_indexed_pairs<F>(out_a: &mut [Vec3], out_b: &mut [Vec3], parallel: bool, kernel: F)
where
    F: Fn(usize) -> (Vec3, Vec3) + Sync + Send,
{
    debug_assert_eq!(out_a.len(), out_b.len());

    #[cfg(feature = "parallel")]
    if should_fan_out(parallel, out_a.len()) {
        out_a
            .par_iter_mut()
            .zip(out_b.par_iter_mut())
            .enumerate()
            .for_each(|(i, (a, b))| (*a, *b) = kernel(i));
        return;
    }

    let _ = parallel;
    for (i, (a, b)) in out_a.iter_mut().zip(out_b.iter_mut()).enumerate() {
        (*a, *b) = kernel(i);
    }
}

/// Runs `kernel` once per particle row.
pub fn for_each_particle<F>(views: ParticleViews<'_>, parallel: bool, kernel: F)
where
    F: Fn(ParticleMut<'_>) + Sync + Send,
{
    let ParticleViews {
        positions,
        velocities,
        inverse_masses,
        accumulated_forces,
    } = views;

    #[cfg(feature = "parallel")]
    if should_fan_out(parallel, positions.len()) {
        positions
            .par_iter_mut()
            .zip(velocities.par_iter_mut())
            .zip(accumulated_forces.par_iter_mut())
            .zip(inverse_masses.par_iter())
            .for_each(|(((position, velocity), accumulated_force), &inverse_mass)| {
                kernel(ParticleMut {
                    position,
                    velocity,
                    accumulated_force,
                    inverse_mass,
                })
            });
        return;
    }

    let _ = parallel;
    for (((position, velocity), accumulated_force), &inverse_mass) in positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .zip(accumulated_forces.iter_mut())
        .zip(inverse_masses.iter())
    {
        kernel(ParticleMut {
            position,
            velocity,
            accumulated_force,
            inverse_mass,
        });
    }
}

/// Sequentially adds `staged[k]` to `accumulator[targets[k]]`, in list order.
///
/// Targets may repeat, so this step never fans out.
pub fn scatter_add(accumulator: &mut [Vec3], targets: &[usize], staged: &[Vec3]) {
    debug_assert_eq!(targets.len(), staged.len());
    for (&target, &force) in targets.iter().zip(staged) {
        accumulator[target] += force;
    }
}
