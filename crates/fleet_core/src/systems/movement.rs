//! Vehicle movement: one grid step per vehicle per tick, plus the arrival
//! handling that drives pickups and dropoffs.
//!
//! Taxis are a three-state machine (idle, en route to pickup, carrying).
//! Shuttles route greedily over the union of their onboard destinations and
//! outstanding pickups, handling every coincident event on arrival.

use bevy_ecs::prelude::{Commands, Entity, Query, ResMut};

use crate::capacity::CapacityTracker;
use crate::dispatch::Dispatchers;
use crate::ecs::{AwaitingPickup, Position, Request, Shuttle, ShuttleStop, Taxi, Vehicle};

pub fn taxi_movement_system(
    mut commands: Commands,
    mut tracker: ResMut<CapacityTracker>,
    mut dispatchers: ResMut<Dispatchers>,
    mut taxis: Query<(Entity, &mut Vehicle, &mut Position, &mut Taxi)>,
    requests: Query<&Request>,
) {
    for (entity, mut vehicle, mut position, mut taxi) in taxis.iter_mut() {
        let Some(target) = vehicle.target else {
            vehicle.idle_ticks += 1;
            continue;
        };
        let next = position.0.step_toward(target);
        position.0 = next;
        if next != target {
            continue;
        }

        if let Some(passenger) = taxi.passenger {
            // Arrived at the destination. A boarded taxi passenger is
            // always delivered, never evicted.
            vehicle.deliveries += 1;
            vehicle.target = None;
            taxi.passenger = None;
            commands.entity(passenger).despawn();
        } else {
            // Arrived at the pickup: board and head for the destination.
            let request = dispatchers.remove_taxi_assignment(entity).unwrap_or_else(|| {
                panic!("taxi {entity:?} arrived at a pickup without an assignment")
            });
            let info = requests.get(request).unwrap_or_else(|_| {
                panic!("assigned request {request:?} despawned while still bound")
            });
            tracker.remove_from_map(info.party_size);
            taxi.passenger = Some(request);
            vehicle.target = Some(info.destination);
            commands.entity(request).remove::<AwaitingPickup>();
        }
    }
}

pub fn shuttle_movement_system(
    mut commands: Commands,
    mut tracker: ResMut<CapacityTracker>,
    mut dispatchers: ResMut<Dispatchers>,
    mut shuttles: Query<(Entity, &mut Vehicle, &mut Position, &mut Shuttle)>,
    mut requests: Query<&mut Request>,
) {
    for (entity, mut vehicle, mut position, mut shuttle) in shuttles.iter_mut() {
        let target = match vehicle.target {
            Some(target) => target,
            None => {
                let Some(next_stop) = shuttle.nearest_stop(position.0) else {
                    vehicle.idle_ticks += 1;
                    continue;
                };
                vehicle.target = Some(next_stop);
                next_stop
            }
        };

        let next = position.0.step_toward(target);
        position.0 = next;
        if next != target {
            continue;
        }

        // Deliver every onboard passenger whose destination is this cell.
        for stop in shuttle.take_onboard_at(target) {
            tracker.remove_from_vehicles(stop.party_size);
            vehicle.deliveries += 1;
            commands.entity(stop.request).despawn();
        }

        // Board everyone waiting at this cell and tell the dispatcher the
        // pickup entries for this shuttle here are done.
        let boarded = shuttle.take_outstanding_at(target);
        if !boarded.is_empty() {
            dispatchers.remove_pickup_assignments(entity, target);
        }
        for stop in boarded {
            let Ok(mut request) = requests.get_mut(stop.request) else {
                continue;
            };
            tracker.board(stop.party_size);
            request.age = 0;
            shuttle.onboard.push(ShuttleStop {
                request: stop.request,
                location: request.destination,
                party_size: stop.party_size,
            });
            commands.entity(stop.request).remove::<AwaitingPickup>();
        }

        // Re-route to the nearest remaining stop, or go idle.
        vehicle.target = shuttle.nearest_stop(position.0);
    }
}
