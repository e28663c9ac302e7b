//! Scenario definitions: the reference engagement and seeded random ones.
//!
//! A scenario is plain data (battle config plus spawn requests) and is
//! turned into a ready-to-run `BattleManager` by [`Scenario::build`].

use std::f64::consts::TAU;

use glam::DVec3;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use kinetic_core::constants::PhysicsConstants;
use kinetic_core::enums::{GuidanceSource, ScenarioKind, ThreatArchetype};
use kinetic_core::error::ConfigError;
use kinetic_core::spawn::{InterceptorSpec, ThreatSpec};

use crate::battle::{BattleConfig, BattleManager};

/// Navigation gain used by the generated scenarios.
const GENERATED_NAVIGATION_GAIN: f64 = 5.0;

/// Time limit of the generated scenarios (s).
const GENERATED_MAX_TIME: f64 = 90.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub kind: ScenarioKind,
    pub config: BattleConfig,
    pub threats: Vec<ThreatSpec>,
    pub interceptors: Vec<InterceptorSpec>,
}

impl Scenario {
    /// Create the manager and spawn every threat, then every interceptor.
    pub fn build(&self) -> Result<BattleManager, ConfigError> {
        let mut manager = BattleManager::new(self.config)?;
        for threat in &self.threats {
            manager.spawn_threat(*threat)?;
        }
        for interceptor in &self.interceptors {
            manager.spawn_interceptor(*interceptor)?;
        }
        Ok(manager)
    }
}

/// The reference engagement: a vertical launch from the origin against a
/// constant-velocity threat crossing at 5 km altitude.
pub fn baseline() -> Scenario {
    let threat = ThreatSpec::inertial(
        DVec3::new(10_000.0, 5_000.0, 5_000.0),
        DVec3::new(-300.0, 0.0, 0.0),
    );
    let interceptor =
        InterceptorSpec::launched_toward(DVec3::ZERO, DVec3::new(0.0, 0.0, 100.0), threat.position);
    Scenario {
        kind: ScenarioKind::Baseline,
        config: BattleConfig::default(),
        threats: vec![threat],
        interceptors: vec![interceptor],
    }
}

/// Build a scenario of `kind`. Random draws come from `seed` alone.
pub fn generate(kind: ScenarioKind, seed: u64) -> Scenario {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let threat = match kind {
        ScenarioKind::Baseline => {
            let mut scenario = baseline();
            scenario.config.seed = seed;
            return scenario;
        }
        ScenarioKind::Dogfight => dogfight_threat(&mut rng),
        ScenarioKind::Ballistic => {
            ballistic_threat(&mut rng, PhysicsConstants::STANDARD.gravity)
        }
    };

    let interceptor = InterceptorSpec::launched_toward(
        DVec3::ZERO,
        DVec3::new(0.01, 0.01, 100.0),
        threat.position,
    )
    .with_source(GuidanceSource::Radar)
    .with_gain(GENERATED_NAVIGATION_GAIN);

    Scenario {
        kind,
        config: BattleConfig {
            seed,
            max_time: GENERATED_MAX_TIME,
            ..BattleConfig::default()
        },
        threats: vec![threat],
        interceptors: vec![interceptor],
    }
}

/// Evasive drone 12 to 25 km out at 2 to 8 km altitude, flying at 270 to 680 m/s
/// toward a point within 3 km of the origin.
fn dogfight_threat(rng: &mut ChaCha8Rng) -> ThreatSpec {
    let distance: f64 = rng.gen_range(12_000.0..25_000.0);
    let altitude: f64 = rng.gen_range(2_000.0..8_000.0);
    let azimuth: f64 = rng.gen_range(0.0..TAU);
    let position = DVec3::new(distance * azimuth.cos(), distance * azimuth.sin(), altitude);

    let speed: f64 = rng.gen_range(270.0..680.0);
    let aim = DVec3::new(
        rng.gen_range(-3_000.0..3_000.0),
        rng.gen_range(-3_000.0..3_000.0),
        0.0,
    );
    let velocity = (aim - position).normalize_or_zero() * speed;

    ThreatSpec {
        position,
        velocity,
        archetype: ThreatArchetype::EvasiveDrone,
    }
}

/// Ballistic round fired from the ground 20 to 35 km out at 40 to 60° elevation,
/// 10 to 30% faster than the vacuum range equation needs to reach the origin.
fn ballistic_threat(rng: &mut ChaCha8Rng, g: f64) -> ThreatSpec {
    let distance: f64 = rng.gen_range(20_000.0..35_000.0);
    let elevation: f64 = rng.gen_range(40.0f64..60.0).to_radians();
    let speed = (distance * g / (2.0 * elevation).sin()).sqrt() * rng.gen_range(1.1..1.3);
    let azimuth: f64 = rng.gen_range(0.0..TAU);

    let position = DVec3::new(distance * azimuth.cos(), distance * azimuth.sin(), 0.0);
    let radial = -speed * elevation.cos();
    let velocity = DVec3::new(
        radial * azimuth.cos(),
        radial * azimuth.sin(),
        speed * elevation.sin(),
    );

    ThreatSpec {
        position,
        velocity,
        archetype: ThreatArchetype::Ballistic,
    }
}
