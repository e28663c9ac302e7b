//! Sensor and filter chains that feed interceptor guidance.
//!
//! An interceptor guided by truth carries no tracker. Radar guidance runs
//! the constant-velocity filter over absolute measurements of the target;
//! seeker guidance runs the extended filter over relative polar
//! measurements, with the interceptor's own acceleration as the filter's
//! control input. Either way the tracker hands guidance a relative
//! position and velocity (target minus interceptor).

use glam::DVec3;

use kinetic_core::enums::GuidanceSource;
use kinetic_core::error::ConfigError;
use kinetic_core::types::PointMassState;

use crate::estimation::{
    ExtendedFilterConfig, ExtendedKalmanFilter, LinearFilterConfig, LinearKalmanFilter,
    StateEstimator,
};
use crate::sensors::{Radar, RadarConfig, Seeker, SeekerConfig};

#[derive(Debug, Clone)]
pub enum TargetTracker {
    Radar {
        radar: Radar,
        filter: LinearKalmanFilter,
        /// Unseeded filter restored on retarget.
        blank: LinearKalmanFilter,
    },
    Seeker {
        seeker: Seeker,
        filter: ExtendedKalmanFilter,
        blank: ExtendedKalmanFilter,
        dt: f64,
        /// Own inertial velocity at the previous observation.
        last_own_velocity: Option<DVec3>,
    },
}

impl TargetTracker {
    /// Build the chain for `source`, or `None` for truth guidance.
    ///
    /// Filters are discretized at `dt` and their measurement noise
    /// matches the sensor's.
    pub fn new(
        source: GuidanceSource,
        dt: f64,
        radar: RadarConfig,
        seeker: SeekerConfig,
        seed: u64,
    ) -> Result<Option<Self>, ConfigError> {
        let tracker = match source {
            GuidanceSource::Truth => None,
            GuidanceSource::Radar => {
                let filter = LinearKalmanFilter::new(LinearFilterConfig {
                    dt,
                    position_noise: radar.position_noise,
                    velocity_noise: radar.velocity_noise,
                    ..Default::default()
                })?;
                Some(Self::Radar {
                    radar: Radar::new(radar, seed)?,
                    blank: filter.clone(),
                    filter,
                })
            }
            GuidanceSource::Seeker => {
                let filter = ExtendedKalmanFilter::new(ExtendedFilterConfig {
                    dt,
                    range_noise: seeker.range_noise,
                    angle_noise: seeker.angle_noise,
                    ..Default::default()
                })?;
                Some(Self::Seeker {
                    seeker: Seeker::new(seeker, seed)?,
                    blank: filter.clone(),
                    filter,
                    dt,
                    last_own_velocity: None,
                })
            }
        };
        Ok(tracker)
    }

    /// Forget the previous target. The next measurement seeds the filter.
    pub fn retarget(&mut self) {
        match self {
            Self::Radar { filter, blank, .. } => *filter = blank.clone(),
            Self::Seeker {
                filter,
                blank,
                last_own_velocity,
                ..
            } => {
                *filter = blank.clone();
                *last_own_velocity = None;
            }
        }
    }

    /// Measure `target`, run one predict/update cycle and return the
    /// estimated relative position and velocity.
    pub fn observe(
        &mut self,
        own_position: DVec3,
        own_velocity: DVec3,
        target: &PointMassState,
    ) -> (DVec3, DVec3) {
        match self {
            Self::Radar { radar, filter, .. } => {
                let measurement = radar.measure(target.position, target.velocity);
                filter.predict();
                filter.update(&measurement);
                (
                    filter.position() - own_position,
                    filter.velocity() - own_velocity,
                )
            }
            Self::Seeker {
                seeker,
                filter,
                dt,
                last_own_velocity,
                ..
            } => {
                let measurement = seeker.measure(target.position - own_position);
                // Mean own acceleration since the previous observation.
                let own_acceleration = last_own_velocity
                    .replace(own_velocity)
                    .map_or(DVec3::ZERO, |last| (own_velocity - last) / *dt);
                filter.predict_with_input(own_acceleration);
                filter.update(&measurement);
                (filter.position(), filter.velocity())
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        match self {
            Self::Radar { filter, .. } => filter.is_initialized(),
            Self::Seeker { filter, .. } => filter.is_initialized(),
        }
    }
}
