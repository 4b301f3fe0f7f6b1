use crate::constants::{mod360, Degree};
use crate::horizons::space_point::SpacePoint;

#[inline]
fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Interpolate an ecliptic angle along the shorter arc.
///
/// The difference is wrapped into `[-180, 180)` before scaling, so 350° → 10° passes
/// through 0°, not 180°. The result is in `[0, 360)`.
pub fn lerp_angle(a: Degree, b: Degree, t: f64) -> Degree {
    let delta = (b - a + 540.0).rem_euclid(360.0) - 180.0;
    mod360(a + delta * t)
}

/// Point between two consecutive samples of one body, `t ∈ [0, 1]`.
///
/// Numeric fields are interpolated linearly and the angle along the shorter arc.
/// The date and the `HH:MM:SS` light time are taken from `a`, the sample at the floor of the
/// day index.
pub fn interpolate_point(a: &SpacePoint, b: &SpacePoint, t: f64) -> SpacePoint {
    SpacePoint {
        date: a.date.clone(),
        x: lerp(a.x, b.x, t),
        y: lerp(a.y, b.y, t),
        z: lerp(a.z, b.z, t),
        distance: lerp(a.distance, b.distance, t),
        angle: lerp_angle(a.angle, b.angle, t),
        distance_km: lerp(a.distance_km, b.distance_km, t),
        speed_kms: lerp(a.speed_kms, b.speed_kms, t),
        signal_minutes: lerp(a.signal_minutes, b.signal_minutes, t),
        signal_hms: a.signal_hms.clone(),
    }
}
