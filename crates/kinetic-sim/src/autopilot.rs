//! Acceleration autopilot with second-order fin actuators.
//!
//! Each body channel runs a PI loop on normalized acceleration error to
//! form a rate command, closes a proportional loop on the body rate to
//! form a saturated deflection command, and drives the fin through
//! `δ̈ = ωn²(u − δ) − 2ζωn δ̇`. The fin position sets the achieved
//! acceleration, so commands reach the airframe with actuator lag.

use glam::DVec3;
use serde::{Deserialize, Serialize};

use kinetic_core::constants::*;
use kinetic_core::error::{require_non_negative, require_positive, require_time_step, ConfigError};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AutopilotConfig {
    /// Actuator natural frequency (rad/s).
    pub natural_frequency: f64,
    pub damping_ratio: f64,
    /// Fin deflection saturation (rad).
    pub deflection_limit: f64,
    pub kp: f64,
    pub ki: f64,
    pub kq: f64,
    /// Acceleration produced at full deflection (m/s²).
    pub max_acceleration: f64,
    /// Longest actuator integration sub-step (s).
    pub max_substep: f64,
}

impl Default for AutopilotConfig {
    fn default() -> Self {
        Self {
            natural_frequency: ACTUATOR_NATURAL_FREQUENCY,
            damping_ratio: ACTUATOR_DAMPING_RATIO,
            deflection_limit: FIN_DEFLECTION_LIMIT,
            kp: AUTOPILOT_KP,
            ki: AUTOPILOT_KI,
            kq: AUTOPILOT_KQ,
            max_acceleration: DEFAULT_MAX_G * PhysicsConstants::STANDARD.gravity,
            max_substep: ACTUATOR_MAX_SUBSTEP,
        }
    }
}

/// Per-interceptor autopilot and actuator state.
///
/// Channels: x is roll (fed back against p), y lateral (against r),
/// z normal (against −q).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Autopilot {
    config: AutopilotConfig,
    dt: f64,
    substeps: u32,
    error_integral: DVec3,
    deflection: DVec3,
    deflection_rate: DVec3,
}

impl Autopilot {
    pub fn new(config: AutopilotConfig, dt: f64) -> Result<Self, ConfigError> {
        let dt = require_time_step(dt)?;
        require_positive("actuator natural frequency", config.natural_frequency)?;
        require_non_negative("actuator damping ratio", config.damping_ratio)?;
        require_positive("fin deflection limit", config.deflection_limit)?;
        require_positive("max acceleration", config.max_acceleration)?;
        require_positive("actuator sub-step", config.max_substep)?;
        for (what, gain) in [("kp", config.kp), ("ki", config.ki), ("kq", config.kq)] {
            require_non_negative(what, gain)?;
        }

        let substeps = (dt / config.max_substep).ceil().max(1.0) as u32;
        Ok(Self {
            config,
            dt,
            substeps,
            error_integral: DVec3::ZERO,
            deflection: DVec3::ZERO,
            deflection_rate: DVec3::ZERO,
        })
    }

    /// Advance one control step and return the fin deflections (rad).
    ///
    /// `commanded` and `current` are body-frame accelerations (m/s²),
    /// `body_rates` is `(p, q, r)`.
    pub fn update(&mut self, commanded: DVec3, current: DVec3, body_rates: DVec3) -> DVec3 {
        let cfg = &self.config;
        let error = (commanded - current) / cfg.max_acceleration;
        self.error_integral += error * self.dt;
        let rate_command = cfg.kp * error + cfg.ki * self.error_integral;

        let channel_rates = DVec3::new(body_rates.x, body_rates.z, -body_rates.y);
        let limit = DVec3::splat(cfg.deflection_limit);
        let u = (cfg.kq * (rate_command - channel_rates)).clamp(-limit, limit);

        let wn = cfg.natural_frequency;
        let h = self.dt / self.substeps as f64;
        for _ in 0..self.substeps {
            let accel = wn * wn * (u - self.deflection)
                - 2.0 * cfg.damping_ratio * wn * self.deflection_rate;
            self.deflection_rate += accel * h;
            self.deflection += self.deflection_rate * h;
        }
        self.deflection
    }

    /// Body-frame acceleration produced by the current fin positions.
    pub fn realized_acceleration(&self) -> DVec3 {
        self.deflection / self.config.deflection_limit * self.config.max_acceleration
    }

    pub fn deflection(&self) -> DVec3 {
        self.deflection
    }
}
