//! Shared test setup: a minimal ready-to-tick world plus fleet and draft
//! helpers, so integration tests do not repeat resource wiring.

use bevy_ecs::prelude::{Entity, World};

use crate::capacity::CapacityTracker;
use crate::clock::SimulationClock;
use crate::dial::{dial_channel, DialEndpoint};
use crate::dispatch::{Dispatcher, Dispatchers};
use crate::ecs::{Position, ServiceMode, Shuttle, Taxi, Vehicle, VehicleId};
use crate::grid::{GridSize, Location};
use crate::spawner::{DemandConfig, DemandQueue, RequestDraft, SimRng};
use crate::telemetry::{SimSnapshotConfig, SimSnapshots};

/// A minimal world with every resource the per-tick schedule reads, a single
/// dispatcher named `test`, an empty fleet, and demand generation disabled
/// so only injected drafts create requests.
pub fn create_test_world(width: u32, height: u32) -> World {
    let mut world = World::new();
    world.insert_resource(GridSize::new(width, height));
    world.insert_resource(SimulationClock::default());
    world.insert_resource(CapacityTracker::default());
    world.insert_resource(Dispatchers(vec![Dispatcher::new("test")]));
    world.insert_resource(DemandConfig {
        creation_probability: 0.0,
        ..Default::default()
    });
    world.insert_resource(DemandQueue::default());
    world.insert_resource(SimRng::seeded(1));
    world.insert_resource(SimSnapshotConfig::default());
    world.insert_resource(SimSnapshots::default());
    let (_, queue) = dial_channel();
    world.insert_resource(queue);
    world
}

/// Replace the dial queue and hand back a live endpoint for it.
pub fn install_dial(world: &mut World) -> DialEndpoint {
    let (endpoint, queue) = dial_channel();
    world.insert_resource(queue);
    endpoint
}

/// Spawn an idle taxi, append it to the first dispatcher's roster and raise
/// the cap by one.
pub fn spawn_taxi(world: &mut World, id: &str, at: Location) -> Entity {
    let entity = world
        .spawn((
            VehicleId(id.to_string()),
            Position(at),
            Vehicle::idle(),
            Taxi::default(),
        ))
        .id();
    world.resource_mut::<Dispatchers>().0[0].roster.push(entity);
    world.resource_mut::<CapacityTracker>().register_capacity(1);
    entity
}

/// Spawn an idle shuttle, append it to the first dispatcher's roster and
/// raise the cap by its capacity.
pub fn spawn_shuttle(world: &mut World, id: &str, at: Location, capacity: u32) -> Entity {
    let entity = world
        .spawn((
            VehicleId(id.to_string()),
            Position(at),
            Vehicle::idle(),
            Shuttle::with_capacity(capacity),
        ))
        .id();
    world.resource_mut::<Dispatchers>().0[0].roster.push(entity);
    world
        .resource_mut::<CapacityTracker>()
        .register_capacity(capacity);
    entity
}

/// A draft routed to the first dispatcher.
pub fn draft(
    pickup: Location,
    destination: Location,
    party_size: u32,
    mode: ServiceMode,
) -> RequestDraft {
    RequestDraft {
        pickup,
        destination,
        party_size,
        mode,
        dispatcher: Some(0),
    }
}

/// Queue a draft for admission on the next tick.
pub fn inject_draft(world: &mut World, draft: RequestDraft) {
    world.resource_mut::<DemandQueue>().push(draft);
}
