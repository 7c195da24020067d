//! Vector helpers layered on top of `glam`.

use glam::Vec3;

/// Guard added to every distance used as a denominator.
pub const DISTANCE_EPSILON: f32 = f32::EPSILON;

/// Returns the unit direction from `from` to `to` and the guarded distance.
///
/// The distance is `|to - from| + DISTANCE_EPSILON`, so coincident points give a
/// zero direction and a finite distance instead of NaN.
#[inline]
pub fn separation(from: Vec3, to: Vec3) -> (Vec3, f32) {
    let direction = to - from;
    let distance = direction.length() + DISTANCE_EPSILON;
    (direction / distance, distance)
}
