//! International Standard Atmosphere and a seeded near-surface wind model.

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use kinetic_core::constants::*;
use kinetic_core::error::{require_non_negative, require_positive, ConfigError};
use kinetic_core::types::AirData;

/// Air properties at one altitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AtmosphereProperties {
    /// kg/m³
    pub density: f64,
    /// Pa
    pub pressure: f64,
    /// K
    pub temperature: f64,
    /// m/s
    pub speed_of_sound: f64,
}

impl AtmosphereProperties {
    pub fn air_data(&self) -> AirData {
        AirData {
            density: self.density,
            speed_of_sound: self.speed_of_sound,
        }
    }
}

/// ISA properties at `altitude` (m), clamped to be non-negative.
///
/// Below the tropopause temperature falls at the lapse rate and pressure
/// follows the barometric formula. Above it temperature is constant and
/// pressure decays exponentially from the tropopause value.
pub fn properties(constants: &PhysicsConstants, altitude: f64) -> AtmosphereProperties {
    let h = altitude.max(0.0);
    let (temperature, pressure) = if h <= constants.tropopause_altitude {
        let temperature = constants.sea_level_temperature - constants.lapse_rate * h;
        let ratio = temperature / constants.sea_level_temperature;
        (
            temperature,
            constants.sea_level_pressure * ratio.powf(constants.barometric_exponent()),
        )
    } else {
        let temperature = constants.tropopause_temperature();
        let scale_height = constants.gas_constant * temperature / constants.gravity;
        let decay = (-(h - constants.tropopause_altitude) / scale_height).exp();
        (temperature, constants.tropopause_pressure() * decay)
    };

    AtmosphereProperties {
        density: pressure / (constants.gas_constant * temperature),
        pressure,
        temperature,
        speed_of_sound: (constants.heat_capacity_ratio * constants.gas_constant * temperature)
            .sqrt(),
    }
}

/// Wind model parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindConfig {
    /// Each base wind component is drawn uniformly from ±this (m/s).
    pub base_limit: f64,
    /// Standard deviation of per-call turbulence per component (m/s).
    pub turbulence_std: f64,
    /// Surface roughness length of the log profile (m).
    pub roughness_length: f64,
    /// Height at which the shear factor is 1 (m).
    pub reference_height: f64,
    /// Cap on the shear factor.
    pub max_shear_factor: f64,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            base_limit: WIND_BASE_LIMIT,
            turbulence_std: WIND_TURBULENCE_STD,
            roughness_length: WIND_ROUGHNESS_LENGTH,
            reference_height: WIND_REFERENCE_HEIGHT,
            max_shear_factor: WIND_MAX_SHEAR_FACTOR,
        }
    }
}

/// Logarithmic-shear base wind plus white turbulence.
///
/// Owns its generator. Two models built from the same config and seed
/// return the same sequence for the same sequence of calls.
#[derive(Debug, Clone)]
pub struct WindModel {
    config: WindConfig,
    base: DVec3,
    turbulence: Option<Normal<f64>>,
    rng: ChaCha8Rng,
}

impl WindModel {
    pub fn new(config: WindConfig, seed: u64) -> Result<Self, ConfigError> {
        require_non_negative("wind base limit", config.base_limit)?;
        require_non_negative("turbulence std", config.turbulence_std)?;
        require_positive("roughness length", config.roughness_length)?;
        require_positive("max shear factor", config.max_shear_factor)?;
        if config.reference_height.is_nan() || config.reference_height <= config.roughness_length {
            return Err(ConfigError::NonPositive {
                what: "reference height above roughness length",
                value: config.reference_height - config.roughness_length,
            });
        }

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let limit = config.base_limit;
        let base = if limit > 0.0 {
            DVec3::new(
                rng.gen_range(-limit..=limit),
                rng.gen_range(-limit..=limit),
                rng.gen_range(-limit..=limit),
            )
        } else {
            DVec3::ZERO
        };
        let turbulence = if config.turbulence_std > 0.0 {
            Normal::new(0.0, config.turbulence_std).ok()
        } else {
            None
        };

        Ok(Self {
            config,
            base,
            turbulence,
            rng,
        })
    }

    /// Still air at every altitude.
    pub fn calm() -> Self {
        Self {
            config: WindConfig {
                base_limit: 0.0,
                turbulence_std: 0.0,
                ..WindConfig::default()
            },
            base: DVec3::ZERO,
            turbulence: None,
            rng: ChaCha8Rng::seed_from_u64(0),
        }
    }

    /// Base wind drawn at construction (m/s).
    pub fn base(&self) -> DVec3 {
        self.base
    }

    /// Log-profile multiplier at `altitude`, capped.
    pub fn shear_factor(&self, altitude: f64) -> f64 {
        let z0 = self.config.roughness_length;
        let h = altitude.max(1.0);
        let factor = (h / z0).ln() / (self.config.reference_height / z0).ln();
        factor.min(self.config.max_shear_factor)
    }

    /// Wind vector at `altitude` (m/s). Draws fresh turbulence on every call.
    pub fn wind(&mut self, altitude: f64) -> DVec3 {
        let steady = self.base * self.shear_factor(altitude);
        match &self.turbulence {
            Some(normal) => {
                let gust = DVec3::new(
                    normal.sample(&mut self.rng),
                    normal.sample(&mut self.rng),
                    normal.sample(&mut self.rng),
                );
                steady + gust
            }
            None => steady,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    use super::*;

    const ISA: PhysicsConstants = PhysicsConstants::STANDARD;

    #[test]
    fn test_sea_level_values() {
        let air = properties(&ISA, 0.0);
        assert_relative_eq!(air.temperature, 288.15);
        assert_relative_eq!(air.pressure, 101_325.0);
        assert_relative_eq!(air.density, 1.225, max_relative = 1e-3);
        assert_relative_eq!(air.speed_of_sound, 340.3, max_relative = 1e-3);
    }

    #[test]
    fn test_negative_altitude_clamped_to_ground() {
        assert_eq!(properties(&ISA, -250.0), properties(&ISA, 0.0));
    }

    #[test]
    fn test_branches_meet_at_tropopause() {
        let below = properties(&ISA, 11_000.0 - 1e-6);
        let above = properties(&ISA, 11_000.0 + 1e-6);
        assert_relative_eq!(below.pressure, above.pressure, max_relative = 1e-8);
        assert_relative_eq!(below.temperature, above.temperature, max_relative = 1e-8);
        assert_relative_eq!(below.density, above.density, max_relative = 1e-8);
    }

    #[test]
    fn test_shear_factor_profile() {
        let wind = WindModel::new(WindConfig::default(), 1).unwrap();
        assert_relative_eq!(wind.shear_factor(10.0), 1.0);
        // Clamped below 1 m.
        assert_relative_eq!(wind.shear_factor(0.0), 0.5);
        assert_relative_eq!(wind.shear_factor(1.0e6), WIND_MAX_SHEAR_FACTOR);
    }

    #[test]
    fn test_wind_reproducible_for_seed() {
        let mut a = WindModel::new(WindConfig::default(), 99).unwrap();
        let mut b = WindModel::new(WindConfig::default(), 99).unwrap();
        for h in [0.0, 50.0, 3_000.0, 3_000.0] {
            assert_eq!(a.wind(h), b.wind(h));
        }
        let base = a.base();
        assert!(base.abs().max_element() <= WIND_BASE_LIMIT);
    }

    #[test]
    fn test_turbulence_differs_between_calls() {
        let mut wind = WindModel::new(WindConfig::default(), 5).unwrap();
        assert_ne!(wind.wind(1_000.0), wind.wind(1_000.0));
    }

    #[test]
    fn test_calm_air_is_still() {
        let mut wind = WindModel::calm();
        assert_eq!(wind.wind(0.0), DVec3::ZERO);
        assert_eq!(wind.wind(9_000.0), DVec3::ZERO);
    }

    #[test]
    fn test_rejects_negative_turbulence() {
        let config = WindConfig {
            turbulence_std: -0.1,
            ..WindConfig::default()
        };
        assert!(WindModel::new(config, 0).is_err());
    }

    proptest! {
        #[test]
        fn prop_density_and_pressure_positive(h in -1_000.0f64..60_000.0) {
            let air = properties(&ISA, h);
            prop_assert!(air.density > 0.0);
            prop_assert!(air.pressure > 0.0);
            prop_assert!(air.speed_of_sound > 0.0);
        }

        #[test]
        fn prop_troposphere_monotone(h in 0.0f64..10_999.0, dh in 0.0f64..1_000.0) {
            let upper = (h + dh).min(11_000.0);
            let low = properties(&ISA, h);
            let high = properties(&ISA, upper);
            prop_assert!(high.pressure <= low.pressure);
            prop_assert!(high.temperature <= low.temperature);
        }
    }
}
