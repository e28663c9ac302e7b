//! Applied-force models for point-mass threats.
//!
//! A model returns the total non-inertial force on the threat at one
//! instant. The simulation divides by [`ForceModel::mass`] and integrates;
//! it adds nothing of its own, so gravity and drag belong to the model.

use std::fmt::Debug;

use glam::DVec3;
use kinetic_core::constants::DRAG_MIN_SPEED;
use kinetic_core::types::AirData;

/// Everything a force model may observe at one integration stage.
#[derive(Debug, Clone, Copy)]
pub struct ForceContext {
    /// Absolute simulation time (s).
    pub time: f64,
    pub position: DVec3,
    pub velocity: DVec3,
    /// Air at `position`.
    pub air: AirData,
    /// Gravitational acceleration magnitude (m/s²).
    pub gravity: f64,
}

/// Force capability shared by every threat archetype.
pub trait ForceModel: Debug + Send + Sync {
    /// Total applied force (N).
    fn applied_force(&self, ctx: &ForceContext) -> DVec3;

    /// Mass the force acts on (kg).
    fn mass(&self) -> f64;
}

/// Drag coefficient with a transonic rise.
///
/// Flat below Mach 0.8, rising linearly to twice `base` at Mach 1.2,
/// then falling off as 1.2 / Mach.
pub fn mach_drag_coefficient(mach: f64, base: f64) -> f64 {
    if mach < 0.8 {
        base
    } else if mach < 1.2 {
        base * (1.0 + 2.5 * (mach - 0.8))
    } else {
        base * 2.0 * (1.2 / mach)
    }
}

/// Mass and drag properties of a point-mass airframe.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointMassBody {
    pub mass: f64,
    pub drag_coefficient: f64,
    pub reference_area: f64,
}

impl PointMassBody {
    pub fn weight(&self, gravity: f64) -> DVec3 {
        DVec3::new(0.0, 0.0, -self.mass * gravity)
    }

    /// Mach-corrected drag opposing the velocity.
    pub fn drag(&self, velocity: DVec3, air: &AirData) -> DVec3 {
        let speed = velocity.length();
        if speed <= DRAG_MIN_SPEED {
            return DVec3::ZERO;
        }
        let mach = speed / air.speed_of_sound;
        let cd = mach_drag_coefficient(mach, self.drag_coefficient);
        let magnitude = 0.5 * air.density * speed * speed * cd * self.reference_area;
        -velocity / speed * magnitude
    }
}

/// No applied force: the threat holds its initial velocity.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertialMotion;

impl ForceModel for InertialMotion {
    fn applied_force(&self, _ctx: &ForceContext) -> DVec3 {
        DVec3::ZERO
    }

    fn mass(&self) -> f64 {
        1.0
    }
}

/// Unpowered projectile under gravity and drag.
#[derive(Debug, Clone, Copy)]
pub struct BallisticMotion {
    pub body: PointMassBody,
}

impl ForceModel for BallisticMotion {
    fn applied_force(&self, ctx: &ForceContext) -> DVec3 {
        self.body.weight(ctx.gravity) + self.body.drag(ctx.velocity, &ctx.air)
    }

    fn mass(&self) -> f64 {
        self.body.mass
    }
}

/// Powered drone flying a weave around its velocity vector.
///
/// The motor holds altitude and airspeed by cancelling weight and the
/// subsonic drag estimate. On top of that, sinusoidal forces of
/// `g_load` push along the right and up axes of the flight path.
#[derive(Debug, Clone, Copy)]
pub struct EvasiveManeuver {
    pub body: PointMassBody,
    /// Peak lateral force in multiples of weight.
    pub g_load: f64,
    /// Angular frequencies of the right and up components (rad/s).
    pub frequency: (f64, f64),
    /// Phase offsets of the right and up components (rad).
    pub phase: (f64, f64),
}

impl EvasiveManeuver {
    /// Right and up unit vectors of the flight path.
    fn path_axes(velocity: DVec3) -> (DVec3, DVec3) {
        let forward = velocity.try_normalize().unwrap_or(DVec3::X);
        let mut right = forward.cross(DVec3::Z);
        if right.length() < 0.1 {
            right = DVec3::Y;
        }
        let right = right.normalize();
        (right, right.cross(forward))
    }

    fn weave(&self, ctx: &ForceContext) -> DVec3 {
        let (right, up) = Self::path_axes(ctx.velocity);
        let amplitude = self.g_load * ctx.gravity * self.body.mass;
        let (wx, wy) = self.frequency;
        let (px, py) = self.phase;
        right * amplitude * (wx * ctx.time + px).sin()
            + up * amplitude * (wy * ctx.time + py).cos()
    }

    fn sustainer(&self, ctx: &ForceContext) -> DVec3 {
        let lift = DVec3::new(0.0, 0.0, self.body.mass * ctx.gravity);
        let speed = ctx.velocity.length();
        if speed <= 0.0 {
            return lift;
        }
        let drag_estimate = 0.5
            * ctx.air.density
            * speed
            * speed
            * self.body.drag_coefficient
            * self.body.reference_area;
        lift + ctx.velocity / speed * drag_estimate
    }
}

impl ForceModel for EvasiveManeuver {
    fn applied_force(&self, ctx: &ForceContext) -> DVec3 {
        self.body.weight(ctx.gravity)
            + self.body.drag(ctx.velocity, &ctx.air)
            + self.sustainer(ctx)
            + self.weave(ctx)
    }

    fn mass(&self) -> f64 {
        self.body.mass
    }
}
