//! End-of-tick snapshot capture for external observers.

use bevy_ecs::prelude::{Entity, Query, Res, ResMut, With};

use crate::capacity::CapacityTracker;
use crate::clock::SimulationClock;
use crate::ecs::{AwaitingPickup, Position, Request, Shuttle, Taxi, Vehicle, VehicleId};
use crate::spawner::DemandConfig;
use crate::telemetry::{
    ItemSnapshot, ItemTag, SimSnapshot, SimSnapshotConfig, SimSnapshots, VehicleCounters,
};

pub fn capture_snapshot_system(
    clock: Res<SimulationClock>,
    tracker: Res<CapacityTracker>,
    config: Res<DemandConfig>,
    snapshot_config: Res<SimSnapshotConfig>,
    mut snapshots: ResMut<SimSnapshots>,
    taxis: Query<(Entity, &VehicleId, &Vehicle, &Position, &Taxi)>,
    shuttles: Query<(Entity, &VehicleId, &Vehicle, &Position, &Shuttle)>,
    waiting: Query<&Request, With<AwaitingPickup>>,
) {
    let mut items = Vec::new();
    let mut vehicles = Vec::new();

    for (entity, id, vehicle, position, taxi) in taxis.iter() {
        let tag = if taxi.passenger.is_some() {
            ItemTag::TaxiCarrying
        } else {
            ItemTag::TaxiEmpty
        };
        items.push(ItemSnapshot {
            location: position.0,
            tag,
        });
        vehicles.push(VehicleCounters {
            entity,
            id: id.0.clone(),
            idle_ticks: vehicle.idle_ticks,
            deliveries: vehicle.deliveries,
        });
    }

    for (entity, id, vehicle, position, shuttle) in shuttles.iter() {
        let tag = if shuttle.onboard.is_empty() {
            ItemTag::ShuttleEmpty
        } else {
            ItemTag::ShuttleCarrying
        };
        items.push(ItemSnapshot {
            location: position.0,
            tag,
        });
        vehicles.push(VehicleCounters {
            entity,
            id: id.0.clone(),
            idle_ticks: vehicle.idle_ticks,
            deliveries: vehicle.deliveries,
        });
    }

    // Boarded passengers are invisible; only requests still waiting at
    // their pickup cell show up.
    for request in waiting.iter() {
        let tag = match (request.is_group(), request.is_agitated(config.agitated_limit)) {
            (true, true) => ItemTag::GroupAgitated,
            (true, false) => ItemTag::GroupWaiting,
            (false, true) => ItemTag::RequestAgitated,
            (false, false) => ItemTag::RequestWaiting,
        };
        items.push(ItemSnapshot {
            location: request.pickup,
            tag,
        });
    }

    let snapshot = SimSnapshot {
        tick: clock.now(),
        items,
        on_map: tracker.on_map(),
        in_vehicles: tracker.in_vehicles(),
        missed_pickups: tracker.missed_pickups(),
        cap: tracker.cap(),
        vehicles,
    };
    snapshots.push(snapshot, snapshot_config.max_snapshots);
}
