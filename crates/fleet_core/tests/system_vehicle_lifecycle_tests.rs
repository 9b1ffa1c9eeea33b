//! Vehicle state machines tick by tick: pickup, boarding, delivery, and the
//! counters that must move in lockstep with them.

use fleet_core::capacity::CapacityTracker;
use fleet_core::ecs::{Position, Request, ServiceMode, Shuttle, Taxi, Vehicle};
use fleet_core::grid::Location;
use fleet_core::runner::{run_tick, simulation_schedule};
use fleet_core::spawner::DemandConfig;
use fleet_core::test_helpers::{create_test_world, draft, inject_draft, spawn_shuttle, spawn_taxi};

#[test]
fn taxi_boards_at_pickup_and_delivers_on_schedule() {
    let mut world = create_test_world(10, 10);
    let taxi = spawn_taxi(&mut world, "T-1", Location::at(0, 0));
    inject_draft(
        &mut world,
        draft(Location::at(0, 0), Location::at(5, 5), 1, ServiceMode::Direct),
    );
    let mut schedule = simulation_schedule();

    // Tick 1: admitted, bound, and the taxi is already standing on the
    // pickup cell, so it boards immediately and retargets the destination.
    run_tick(&mut world, &mut schedule);
    assert!(world.get::<Taxi>(taxi).unwrap().passenger.is_some());
    assert_eq!(
        world.get::<Vehicle>(taxi).unwrap().target,
        Some(Location::at(5, 5))
    );
    assert_eq!(world.resource::<CapacityTracker>().on_map(), 0);

    // Ticks 2..=5: one diagonal step each.
    for expected in 1..=4u32 {
        run_tick(&mut world, &mut schedule);
        assert_eq!(
            world.get::<Position>(taxi).unwrap().0,
            Location::at(expected, expected)
        );
    }

    // Tick 6: arrival and delivery.
    run_tick(&mut world, &mut schedule);
    assert_eq!(world.get::<Position>(taxi).unwrap().0, Location::at(5, 5));
    let vehicle = world.get::<Vehicle>(taxi).unwrap();
    assert_eq!(vehicle.deliveries, 1);
    assert!(vehicle.target.is_none());
    assert!(world.get::<Taxi>(taxi).unwrap().passenger.is_none());
    let mut requests = world.query::<&Request>();
    assert_eq!(requests.iter(&world).count(), 0);
}

#[test]
fn shuttle_picks_up_then_delivers_along_the_row() {
    let mut world = create_test_world(10, 10);
    let shuttle = spawn_shuttle(&mut world, "S-1", Location::at(0, 0), 10);
    inject_draft(
        &mut world,
        draft(Location::at(2, 0), Location::at(5, 0), 3, ServiceMode::Pooled),
    );
    let mut schedule = simulation_schedule();

    // Tick 1: accepted as an outstanding pickup, shuttle starts moving.
    run_tick(&mut world, &mut schedule);
    assert_eq!(world.get::<Position>(shuttle).unwrap().0, Location::at(1, 0));
    assert_eq!(world.resource::<CapacityTracker>().on_map(), 3);

    // Tick 2: arrival at the pickup, the whole party boards.
    run_tick(&mut world, &mut schedule);
    {
        let tracker = world.resource::<CapacityTracker>();
        assert_eq!(tracker.on_map(), 0);
        assert_eq!(tracker.in_vehicles(), 3);
    }
    let state = world.get::<Shuttle>(shuttle).unwrap();
    assert!(state.outstanding.is_empty());
    assert_eq!(state.onboard.len(), 1);
    assert_eq!(
        world.get::<Vehicle>(shuttle).unwrap().target,
        Some(Location::at(5, 0))
    );

    // Ticks 3..=5: ride to the destination and deliver.
    run_tick(&mut world, &mut schedule);
    run_tick(&mut world, &mut schedule);
    run_tick(&mut world, &mut schedule);
    assert_eq!(world.get::<Position>(shuttle).unwrap().0, Location::at(5, 0));
    let tracker = world.resource::<CapacityTracker>();
    assert_eq!(tracker.in_vehicles(), 0);
    assert_eq!(world.get::<Vehicle>(shuttle).unwrap().deliveries, 1);
    assert!(world.get::<Shuttle>(shuttle).unwrap().is_empty());
}

#[test]
fn boarding_resets_the_request_age() {
    let mut world = create_test_world(10, 10);
    let shuttle = spawn_shuttle(&mut world, "S-1", Location::at(0, 0), 10);
    // Generous patience so the waiter is never evicted on the way.
    world.insert_resource(DemandConfig {
        creation_probability: 0.0,
        patience_limit: 1_000,
        agitated_limit: 900,
        ..Default::default()
    });
    inject_draft(
        &mut world,
        draft(Location::at(7, 0), Location::at(2, 0), 1, ServiceMode::Pooled),
    );
    let mut schedule = simulation_schedule();

    // Seven ticks to reach the pickup; the request ages while waiting.
    for _ in 0..7 {
        run_tick(&mut world, &mut schedule);
    }
    let entity = world.get::<Shuttle>(shuttle).unwrap().onboard[0].request;
    assert_eq!(world.get::<Request>(entity).unwrap().age, 0);
}

#[test]
fn carrying_taxi_keeps_its_passenger_past_the_patience_limit() {
    let mut world = create_test_world(60, 60);
    let taxi = spawn_taxi(&mut world, "T-1", Location::at(0, 0));
    // Destination 59 cells away: the ride itself is longer than patience.
    inject_draft(
        &mut world,
        draft(Location::at(0, 0), Location::at(59, 59), 1, ServiceMode::Direct),
    );
    let mut schedule = simulation_schedule();

    let patience = world.resource::<DemandConfig>().patience_limit as u64;
    for _ in 0..patience + 5 {
        run_tick(&mut world, &mut schedule);
    }
    // Still carrying, well past the limit.
    assert!(world.get::<Taxi>(taxi).unwrap().passenger.is_some());
    assert_eq!(world.get::<Vehicle>(taxi).unwrap().deliveries, 0);

    for _ in 0..20 {
        run_tick(&mut world, &mut schedule);
    }
    assert_eq!(world.get::<Vehicle>(taxi).unwrap().deliveries, 1);
}

#[test]
fn idle_vehicles_accumulate_idle_ticks() {
    let mut world = create_test_world(10, 10);
    let taxi = spawn_taxi(&mut world, "T-1", Location::at(4, 4));
    let shuttle = spawn_shuttle(&mut world, "S-1", Location::at(5, 5), 10);
    let mut schedule = simulation_schedule();
    for _ in 0..6 {
        run_tick(&mut world, &mut schedule);
    }
    assert_eq!(world.get::<Vehicle>(taxi).unwrap().idle_ticks, 6);
    assert_eq!(world.get::<Vehicle>(shuttle).unwrap().idle_ticks, 6);
}
