//! Simulation runner: advances the clock and runs the per-tick schedule.
//!
//! One tick is one schedule run with a fixed phase order: dial intake,
//! aging/eviction, demand admission, taxi movement, shuttle movement,
//! snapshot capture. [`apply_deferred`] sits between phases so entities
//! spawned by one phase are visible to the next within the same tick.

use std::fmt;
use std::sync::mpsc::Receiver;
use std::time::Duration;

use bevy_ecs::prelude::{Schedule, World};
use bevy_ecs::schedule::{apply_deferred, IntoSystemConfigs};

use crate::clock::SimulationClock;
use crate::scenario::ScenarioParams;
use crate::systems::{
    age_evict::age_and_evict_system, demand::demand_system, dial_intake::dial_intake_system,
    movement::{shuttle_movement_system, taxi_movement_system},
    snapshot::capture_snapshot_system,
};

/// Configuration handshake failures.
#[derive(Debug)]
pub enum ConfigError {
    /// The configuration side went away before sending parameters.
    ChannelClosed,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ChannelClosed => {
                write!(f, "configuration channel closed before parameters arrived")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Block until the configuration collaborator delivers scenario parameters.
/// The clock must not tick before this returns.
pub fn await_configuration(config: &Receiver<ScenarioParams>) -> Result<ScenarioParams, ConfigError> {
    config.recv().map_err(|_| ConfigError::ChannelClosed)
}

/// Builds the per-tick schedule. The phases are chained: their order is the
/// model's contract, not an optimization.
pub fn simulation_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            dial_intake_system,
            apply_deferred,
            age_and_evict_system,
            apply_deferred,
            demand_system,
            apply_deferred,
            taxi_movement_system,
            apply_deferred,
            shuttle_movement_system,
            apply_deferred,
            capture_snapshot_system,
        )
            .chain(),
    );
    schedule
}

/// Advance the clock by one tick and run the schedule once. Returns the tick
/// number just executed.
pub fn run_tick(world: &mut World, schedule: &mut Schedule) -> u64 {
    let tick = world.resource_mut::<SimulationClock>().advance();
    schedule.run(world);
    tick
}

/// Run `ticks` ticks back to back. Returns the last tick number executed.
pub fn run(world: &mut World, schedule: &mut Schedule, ticks: u64) -> u64 {
    let mut last = world.resource::<SimulationClock>().now();
    for _ in 0..ticks {
        last = run_tick(world, schedule);
    }
    last
}

/// Run `ticks` ticks, invoking `hook` after each one. Used by observers that
/// want a consistent view at every tick boundary.
pub fn run_with_hook<F>(world: &mut World, schedule: &mut Schedule, ticks: u64, mut hook: F) -> u64
where
    F: FnMut(&World, u64),
{
    let mut last = world.resource::<SimulationClock>().now();
    for _ in 0..ticks {
        last = run_tick(world, schedule);
        hook(world, last);
    }
    last
}

/// Run `ticks` ticks with a fixed inter-tick delay, so external consumers
/// (a UI polling snapshots, a dial surface) can keep up.
pub fn run_paced(world: &mut World, schedule: &mut Schedule, ticks: u64, delay: Duration) -> u64 {
    let mut last = world.resource::<SimulationClock>().now();
    for _ in 0..ticks {
        last = run_tick(world, schedule);
        std::thread::sleep(delay);
    }
    last
}
