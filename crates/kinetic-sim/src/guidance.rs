//! Guidance laws for interceptors.
//!
//! Provides proportional navigation (PN), its g-limited variant, and the
//! closing-velocity and time-to-go estimates reported in snapshots.
//! All vectors are inertial and relative: target minus interceptor.

use glam::DVec3;

use kinetic_core::constants::GUIDANCE_MIN_RANGE;

/// True 3-D proportional navigation.
///
/// Line-of-sight rate `ω = (r × v) / |r|²`, command `a = N (v × ω)`.
/// Inside [`GUIDANCE_MIN_RANGE`] the line of sight is undefined and the
/// command is zero.
pub fn proportional_navigation(rel_pos: DVec3, rel_vel: DVec3, gain: f64) -> DVec3 {
    let range_sq = rel_pos.length_squared();
    if range_sq < GUIDANCE_MIN_RANGE * GUIDANCE_MIN_RANGE {
        return DVec3::ZERO;
    }
    let los_rate = rel_pos.cross(rel_vel) / range_sq;
    gain * rel_vel.cross(los_rate)
}

/// Scale `acc` down to `max_g · g0` if it exceeds it. Direction is kept.
pub fn limit_g_load(acc: DVec3, max_g: f64, g0: f64) -> DVec3 {
    let limit = max_g * g0;
    let magnitude = acc.length();
    if magnitude > limit && magnitude > 0.0 {
        acc * (limit / magnitude)
    } else {
        acc
    }
}

/// Proportional navigation with a structural g-limit.
pub fn augmented_proportional_navigation(
    rel_pos: DVec3,
    rel_vel: DVec3,
    gain: f64,
    max_g: f64,
    g0: f64,
) -> DVec3 {
    limit_g_load(proportional_navigation(rel_pos, rel_vel, gain), max_g, g0)
}

/// Rate at which range is shrinking (m/s). Positive when closing.
pub fn closing_velocity(rel_pos: DVec3, rel_vel: DVec3) -> f64 {
    match rel_pos.try_normalize() {
        Some(los) => -rel_vel.dot(los),
        None => 0.0,
    }
}

/// Time until closest approach assuming both keep their velocity.
///
/// `None` when there is no relative motion or the closest approach is
/// already behind.
pub fn estimate_time_to_go(rel_pos: DVec3, rel_vel: DVec3) -> Option<f64> {
    let speed_sq = rel_vel.length_squared();
    if speed_sq < 1e-12 {
        return None;
    }
    let t = -rel_pos.dot(rel_vel) / speed_sq;
    (t >= 0.0).then_some(t)
}
