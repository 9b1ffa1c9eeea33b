//! Aging and eviction: patience limits, the grace rule, and the counter
//! bookkeeping eviction must keep straight.

use bevy_ecs::prelude::Entity;

use fleet_core::capacity::CapacityTracker;
use fleet_core::dispatch::Dispatchers;
use fleet_core::ecs::{AwaitingPickup, Request, ServiceMode, Shuttle, ShuttleStop, Vehicle};
use fleet_core::grid::Location;
use fleet_core::runner::{run_tick, simulation_schedule};
use fleet_core::spawner::DemandConfig;
use fleet_core::test_helpers::{create_test_world, draft, inject_draft, spawn_shuttle};

fn patience(world: &bevy_ecs::prelude::World) -> u32 {
    world.resource::<DemandConfig>().patience_limit
}

/// Admit one pooled draft and return its request entity.
fn admit_one(world: &mut bevy_ecs::prelude::World, schedule: &mut bevy_ecs::prelude::Schedule, d: fleet_core::spawner::RequestDraft) -> Entity {
    inject_draft(world, d);
    run_tick(world, schedule);
    let mut query = world.query::<(Entity, &Request)>();
    let (entity, _) = query.iter(world).next().expect("request admitted");
    entity
}

#[test]
fn stale_pickup_is_evicted_when_the_shuttle_is_headed_elsewhere() {
    let mut world = create_test_world(10, 10);
    let shuttle = spawn_shuttle(&mut world, "S-1", Location::at(9, 9), 10);
    let mut schedule = simulation_schedule();
    let request = admit_one(
        &mut world,
        &mut schedule,
        draft(Location::at(0, 0), Location::at(5, 5), 3, ServiceMode::Pooled),
    );

    // Point the shuttle somewhere other than the pickup and age the waiter
    // to one short of the limit: the next aging pass pushes it over.
    world.get_mut::<Vehicle>(shuttle).unwrap().target = Some(Location::at(9, 0));
    world.get_mut::<Request>(request).unwrap().age = patience(&world) - 1;
    let on_map_before = world.resource::<CapacityTracker>().on_map();

    run_tick(&mut world, &mut schedule);

    assert!(world.get_entity(request).is_none());
    assert_eq!(
        world.resource::<CapacityTracker>().on_map(),
        on_map_before - 3
    );
    assert!(world.get::<Shuttle>(shuttle).unwrap().outstanding.is_empty());
    assert!(world.resource::<Dispatchers>().0[0]
        .pickup_assignments
        .is_empty());
}

#[test]
fn pickup_is_spared_while_the_shuttle_is_on_its_way() {
    let mut world = create_test_world(10, 10);
    let shuttle = spawn_shuttle(&mut world, "S-1", Location::at(9, 9), 10);
    let mut schedule = simulation_schedule();
    let request = admit_one(
        &mut world,
        &mut schedule,
        draft(Location::at(0, 0), Location::at(5, 5), 3, ServiceMode::Pooled),
    );

    // The shuttle targets the pickup (it is its only stop). Age the waiter
    // past the limit: the grace rule keeps it alive.
    assert_eq!(
        world.get::<Vehicle>(shuttle).unwrap().target,
        Some(Location::at(0, 0))
    );
    world.get_mut::<Request>(request).unwrap().age = patience(&world) - 1;

    run_tick(&mut world, &mut schedule);

    assert!(world.get_entity(request).is_some());
    assert_eq!(world.get::<Shuttle>(shuttle).unwrap().outstanding.len(), 1);
    assert!(
        world.get::<Request>(request).unwrap().age >= patience(&world),
        "the spared request keeps aging"
    );
}

#[test]
fn stale_onboard_passenger_is_put_out_when_headed_elsewhere() {
    let mut world = create_test_world(10, 10);
    let shuttle = spawn_shuttle(&mut world, "S-1", Location::at(0, 0), 10);
    // Construct an onboard passenger directly: boarded long ago, shuttle
    // now headed away from its destination.
    let request = world
        .spawn(Request {
            pickup: Location::at(1, 1),
            destination: Location::at(5, 5),
            party_size: 2,
            mode: ServiceMode::Pooled,
            age: patience(&world),
        })
        .id();
    world.get_mut::<Shuttle>(shuttle).unwrap().onboard.push(ShuttleStop {
        request,
        location: Location::at(5, 5),
        party_size: 2,
    });
    world.get_mut::<Vehicle>(shuttle).unwrap().target = Some(Location::at(9, 9));
    {
        let mut tracker = world.resource_mut::<CapacityTracker>();
        tracker.add_to_map(2);
        tracker.board(2);
    }

    let mut schedule = simulation_schedule();
    run_tick(&mut world, &mut schedule);

    assert!(world.get_entity(request).is_none());
    assert_eq!(world.resource::<CapacityTracker>().in_vehicles(), 0);
    assert!(world.get::<Shuttle>(shuttle).unwrap().onboard.is_empty());
}

#[test]
fn onboard_passenger_is_spared_when_its_destination_is_the_target() {
    let mut world = create_test_world(10, 10);
    let shuttle = spawn_shuttle(&mut world, "S-1", Location::at(0, 0), 10);
    let request = world
        .spawn(Request {
            pickup: Location::at(1, 1),
            destination: Location::at(5, 5),
            party_size: 2,
            mode: ServiceMode::Pooled,
            age: patience(&world),
        })
        .id();
    world.get_mut::<Shuttle>(shuttle).unwrap().onboard.push(ShuttleStop {
        request,
        location: Location::at(5, 5),
        party_size: 2,
    });
    world.get_mut::<Vehicle>(shuttle).unwrap().target = Some(Location::at(5, 5));
    {
        let mut tracker = world.resource_mut::<CapacityTracker>();
        tracker.add_to_map(2);
        tracker.board(2);
    }

    let mut schedule = simulation_schedule();
    run_tick(&mut world, &mut schedule);

    assert!(world.get_entity(request).is_some());
    assert_eq!(world.resource::<CapacityTracker>().in_vehicles(), 2);
}

#[test]
fn waiting_requests_age_once_per_tick() {
    let mut world = create_test_world(10, 10);
    spawn_shuttle(&mut world, "S-1", Location::at(9, 9), 10);
    let mut schedule = simulation_schedule();
    let request = admit_one(
        &mut world,
        &mut schedule,
        draft(Location::at(0, 0), Location::at(5, 5), 1, ServiceMode::Pooled),
    );
    assert_eq!(world.get::<Request>(request).unwrap().age, 0);

    run_tick(&mut world, &mut schedule);
    run_tick(&mut world, &mut schedule);
    assert_eq!(world.get::<Request>(request).unwrap().age, 2);
    assert!(world.get::<AwaitingPickup>(request).is_some());
}
