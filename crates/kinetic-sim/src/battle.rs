//! Battle manager: the core of the simulation.
//!
//! `BattleManager` owns the hecs ECS world, the assignment table and the
//! wind model, runs all systems once per tick and produces
//! `BattleSnapshot`s. Completely headless, enabling deterministic testing.

use std::collections::BTreeMap;

use glam::DVec3;
use hecs::World;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use kinetic_core::components::{Lifecycle, PositionHistory};
use kinetic_core::constants::*;
use kinetic_core::enums::{EngagementStatus, EntityKind};
use kinetic_core::error::{require_positive, require_time_step, ConfigError};
use kinetic_core::events::EngagementEvent;
use kinetic_core::spawn::{InterceptorSpec, ThreatSpec};
use kinetic_core::state::{BattleSnapshot, EntityView, TallyView};
use kinetic_core::types::{EntityId, SimTime};

use crate::atmosphere::{WindConfig, WindModel};
use crate::engagement::{AssignmentTable, EngagementTally};
use crate::sensors::{RadarConfig, SeekerConfig};
use crate::systems;
use crate::world_setup::{self, Roster, SpawnContext};

const WIND_SALT: u64 = 0x7769_6e64_6d6f_6465;

/// Tolerance when comparing accumulated time against `max_time`.
const TIME_EPSILON: f64 = 1e-9;

/// Relative tolerance between a tick step and `BattleConfig::dt`.
const STEP_TOLERANCE: f64 = 1e-9;

/// Configuration for a new battle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BattleConfig {
    /// RNG seed. Same seed and same spawns = same battle.
    pub seed: u64,
    /// Interceptor-threat separation that counts as a kill (m).
    pub kill_radius: f64,
    /// Simulation time after which the run stops (s).
    pub max_time: f64,
    /// Step the autopilots and filters are built for (s).
    pub dt: f64,
    /// `None` for still air.
    pub wind: Option<WindConfig>,
    pub radar: RadarConfig,
    pub seeker: SeekerConfig,
    pub constants: PhysicsConstants,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            kill_radius: DEFAULT_KILL_RADIUS,
            max_time: DEFAULT_MAX_TIME,
            dt: DEFAULT_DT,
            wind: Some(WindConfig::default()),
            radar: RadarConfig::default(),
            seeker: SeekerConfig::default(),
            constants: PhysicsConstants::STANDARD,
        }
    }
}

impl BattleConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("kill radius", self.kill_radius)?;
        require_positive("max time", self.max_time)?;
        require_time_step(self.dt)?;
        require_positive("gravity", self.constants.gravity)?;
        Ok(())
    }
}

/// How a completed run ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementOutcome {
    pub status: EngagementStatus,
    pub time: SimTime,
    pub tally: TallyView,
}

/// The battle manager. Owns the ECS world and all battle state.
pub struct BattleManager {
    config: BattleConfig,
    world: World,
    roster: Roster,
    time: SimTime,
    wind: WindModel,
    assignments: AssignmentTable,
    tally: EngagementTally,
    events: Vec<EngagementEvent>,
}

impl BattleManager {
    /// Create an empty battle. Fails fast on an invalid configuration.
    pub fn new(config: BattleConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let wind = match config.wind {
            Some(wind) => WindModel::new(wind, config.seed ^ WIND_SALT)?,
            None => WindModel::calm(),
        };
        Ok(Self {
            config,
            world: World::new(),
            roster: Roster::default(),
            time: SimTime::default(),
            wind,
            assignments: AssignmentTable::default(),
            tally: EngagementTally::default(),
            events: Vec::new(),
        })
    }

    pub fn config(&self) -> &BattleConfig {
        &self.config
    }

    pub fn spawn_threat(&mut self, spec: ThreatSpec) -> Result<EntityId, ConfigError> {
        let id =
            world_setup::spawn_threat(&mut self.world, &mut self.roster, self.config.seed, &spec)?;
        self.tally.threats_total += 1;
        info!(threat = %id, archetype = ?spec.archetype, "threat spawned");
        Ok(id)
    }

    pub fn spawn_interceptor(&mut self, spec: InterceptorSpec) -> Result<EntityId, ConfigError> {
        let ctx = SpawnContext {
            seed: self.config.seed,
            dt: self.config.dt,
            constants: &self.config.constants,
            radar: self.config.radar,
            seeker: self.config.seeker,
        };
        let id = world_setup::spawn_interceptor(&mut self.world, &mut self.roster, &ctx, &spec)?;
        self.tally.interceptors_total += 1;
        info!(interceptor = %id, source = ?spec.navigation.source, "interceptor spawned");
        Ok(id)
    }

    /// Advance the battle by one tick starting at absolute time `t`.
    ///
    /// Order: assignment, threats, interceptors, termination. Autopilots
    /// and filters are discretized at `BattleConfig::dt`; a tick whose `dt`
    /// is invalid or differs from it leaves the battle untouched.
    pub fn update(&mut self, t: f64, dt: f64) {
        if let Err(err) = self.check_step(dt) {
            warn!(dt, %err, "ignoring tick");
            return;
        }

        systems::assignment::run(
            &mut self.world,
            &self.roster,
            &mut self.assignments,
            &mut self.tally,
            &mut self.events,
            t,
        );
        let start = systems::termination::record_positions(&self.world, &self.roster);
        systems::threat_kinematics::run(&mut self.world, &self.config.constants, t, dt);
        systems::interceptor_flight::run(
            &mut self.world,
            &self.roster,
            &mut self.assignments,
            &mut self.wind,
            &self.config.constants,
            t,
            dt,
        );
        systems::termination::run(
            &mut self.world,
            &self.roster,
            &mut self.assignments,
            &mut self.tally,
            &mut self.events,
            &start,
            self.config.kill_radius,
            t + dt,
        );
        self.time.advance_to(t + dt);
    }

    /// Tick from the current time until every threat is inactive or
    /// `max_time` is reached.
    pub fn run(&mut self, dt: f64) -> Result<EngagementOutcome, ConfigError> {
        self.check_step(dt)?;
        while !self.is_finished(self.time.elapsed_secs) {
            self.update(self.time.elapsed_secs, dt);
        }
        let outcome = EngagementOutcome {
            status: self.status(),
            time: self.time,
            tally: self.tally.view(),
        };
        info!(
            status = ?outcome.status,
            time = outcome.time.elapsed_secs,
            intercepted = outcome.tally.threats_intercepted,
            "battle finished"
        );
        Ok(outcome)
    }

    fn check_step(&self, dt: f64) -> Result<(), ConfigError> {
        require_time_step(dt)?;
        let expected = self.config.dt;
        if (dt - expected).abs() > STEP_TOLERANCE * expected {
            return Err(ConfigError::StepMismatch { expected, got: dt });
        }
        Ok(())
    }

    /// Whether a run should stop at time `t`.
    ///
    /// A battle with no threats has nothing left to engage and is finished
    /// at once.
    pub fn is_finished(&self, t: f64) -> bool {
        self.all_threats_inactive() || t >= self.config.max_time - TIME_EPSILON
    }

    /// `ThreatsNeutralized` once no threat is active, which includes a
    /// battle that never had any.
    pub fn status(&self) -> EngagementStatus {
        if self.all_threats_inactive() {
            EngagementStatus::ThreatsNeutralized
        } else if self.time.elapsed_secs >= self.config.max_time - TIME_EPSILON {
            EngagementStatus::TimeExpired
        } else {
            EngagementStatus::Running
        }
    }

    fn all_threats_inactive(&self) -> bool {
        self.roster
            .threats
            .values()
            .all(|e| !systems::is_active(&self.world, *e))
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    /// Threat currently paired with `interceptor`.
    pub fn assignment_of(&self, interceptor: EntityId) -> Option<EntityId> {
        self.assignments.get(interceptor).map(|a| a.threat)
    }

    pub fn entity(&self, id: EntityId) -> Option<EntityView> {
        let (entity, kind) = self.roster.lookup(id)?;
        systems::snapshot::entity_view(&self.world, id, entity, kind)
    }

    /// Positions after each completed step, oldest first.
    pub fn history(&self, id: EntityId) -> Option<Vec<DVec3>> {
        let (entity, _) = self.roster.lookup(id)?;
        let history = self.world.get::<&PositionHistory>(entity).ok()?;
        Some(history.positions.clone())
    }

    /// `None` for an unknown id.
    pub fn is_active(&self, id: EntityId) -> Option<bool> {
        let (entity, _) = self.roster.lookup(id)?;
        let lifecycle = self.world.get::<&Lifecycle>(entity).ok()?;
        Some(lifecycle.active)
    }

    /// Ids of all entities of one kind, ascending.
    pub fn ids(&self, kind: EntityKind) -> Vec<EntityId> {
        match kind {
            EntityKind::Threat => self.roster.threats.keys().copied().collect(),
            EntityKind::Interceptor => self.roster.interceptors.keys().copied().collect(),
        }
    }

    pub fn snapshot(&self) -> BattleSnapshot {
        systems::snapshot::build_snapshot(
            &self.world,
            &self.roster,
            &self.assignments,
            &self.tally,
            self.time,
            self.status(),
        )
    }

    /// Drain the events accumulated since the last call.
    pub fn take_events(&mut self) -> Vec<EngagementEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn tally(&self) -> TallyView {
        self.tally.view()
    }

    /// Live pairings, ascending interceptor id.
    pub fn assignments(&self) -> BTreeMap<EntityId, EntityId> {
        self.assignments.iter().map(|(i, a)| (i, a.threat)).collect()
    }

    /// Get a read-only reference to the ECS world.
    pub fn world(&self) -> &World {
        &self.world
    }
}
