//! Fundamental state vectors and simulation types.
//!
//! Inertial frame: x = East, y = North, z = Up (altitude), meters.
//! Body frame: x = nose, y = left wing, z = up at zero attitude (right-handed).

use std::fmt;

use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Unique identifier of a threat or interceptor, fixed at spawn.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Simulation time tracking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SimTime {
    /// Number of completed ticks.
    pub tick: u64,
    /// Elapsed simulation time in seconds.
    pub elapsed_secs: f64,
}

impl SimTime {
    /// Record a completed tick ending at absolute time `t_end`.
    pub fn advance_to(&mut self, t_end: f64) {
        self.tick += 1;
        self.elapsed_secs = t_end;
    }
}

/// Point-mass kinematic state `[x, y, z, vx, vy, vz]`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointMassState {
    pub position: DVec3,
    pub velocity: DVec3,
}

impl PointMassState {
    pub const LEN: usize = 6;

    pub fn new(position: DVec3, velocity: DVec3) -> Self {
        Self { position, velocity }
    }

    pub fn to_array(&self) -> [f64; 6] {
        let p = self.position;
        let v = self.velocity;
        [p.x, p.y, p.z, v.x, v.y, v.z]
    }

    pub fn from_array(a: &[f64; 6]) -> Self {
        Self {
            position: DVec3::new(a[0], a[1], a[2]),
            velocity: DVec3::new(a[3], a[4], a[5]),
        }
    }
}

/// Rigid-body state `[x,y,z, u,v,w, phi,theta,psi, p,q,r]`.
///
/// Position is inertial; velocity and angular rates are body-frame;
/// attitude is the 3-2-1 (yaw, pitch, roll) Euler sequence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct RigidBodyState {
    pub position: DVec3,
    pub body_velocity: DVec3,
    /// Roll, pitch, yaw (rad).
    pub euler: DVec3,
    /// Body rates p, q, r (rad/s).
    pub body_rates: DVec3,
}

impl RigidBodyState {
    pub const LEN: usize = 12;

    pub fn to_array(&self) -> [f64; 12] {
        let mut out = [0.0; 12];
        for (i, v) in [
            self.position,
            self.body_velocity,
            self.euler,
            self.body_rates,
        ]
        .iter()
        .enumerate()
        {
            out[3 * i..3 * i + 3].copy_from_slice(&v.to_array());
        }
        out
    }

    pub fn from_array(a: &[f64; 12]) -> Self {
        let v = |i: usize| DVec3::new(a[i], a[i + 1], a[i + 2]);
        Self {
            position: v(0),
            body_velocity: v(3),
            euler: v(6),
            body_rates: v(9),
        }
    }
}

/// Local air properties needed by point-mass force models.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AirData {
    /// Density (kg/m³).
    pub density: f64,
    /// Speed of sound (m/s).
    pub speed_of_sound: f64,
}
