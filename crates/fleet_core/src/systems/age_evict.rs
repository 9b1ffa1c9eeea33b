//! Aging and eviction: the first model pass of every tick.
//!
//! Every active request ages exactly once per tick — the age lives on the
//! [`Request`] alone, never duplicated in a table. Eviction then applies the
//! grace rule: a request whose vehicle is currently headed to it (pickup for
//! waiting requests, destination for onboard ones) is never evicted, however
//! old it is. Taxi passengers and taxi-bound waiters are never evicted.

use bevy_ecs::prelude::{Commands, Query, Res, ResMut};

use crate::capacity::CapacityTracker;
use crate::dispatch::Dispatchers;
use crate::ecs::{Request, Shuttle, Vehicle};
use crate::spawner::DemandConfig;

pub fn age_and_evict_system(
    mut commands: Commands,
    config: Res<DemandConfig>,
    mut tracker: ResMut<CapacityTracker>,
    mut dispatchers: ResMut<Dispatchers>,
    mut shuttles: Query<(&Vehicle, &mut Shuttle)>,
    mut requests: Query<&mut Request>,
) {
    // Aging pass. Taxi assignments cover waiting-for-taxi requests only;
    // once boarded, the assignment is gone and the age no longer matters.
    for dispatcher in &dispatchers.0 {
        for &request in dispatcher.taxi_assignments.values() {
            if let Ok(mut request) = requests.get_mut(request) {
                request.age += 1;
            }
        }
        for assignment in &dispatcher.pickup_assignments {
            if let Ok(mut request) = requests.get_mut(assignment.request) {
                request.age += 1;
            }
        }
    }
    for (_, shuttle) in shuttles.iter() {
        for stop in &shuttle.onboard {
            if let Ok(mut request) = requests.get_mut(stop.request) {
                request.age += 1;
            }
        }
    }

    // Evict stale shuttle pickups, unless the shuttle is already headed to
    // that pickup cell.
    for dispatcher in &mut dispatchers.0 {
        let mut index = 0;
        while index < dispatcher.pickup_assignments.len() {
            let assignment = dispatcher.pickup_assignments[index];
            let Ok(request) = requests.get(assignment.request) else {
                index += 1;
                continue;
            };
            if !request.out_of_patience(config.patience_limit) {
                index += 1;
                continue;
            }
            let party_size = request.party_size;
            let Ok((vehicle, mut shuttle)) = shuttles.get_mut(assignment.shuttle) else {
                index += 1;
                continue;
            };
            if vehicle.target == Some(assignment.pickup) {
                // Grace: the shuttle is on its way.
                index += 1;
                continue;
            }
            shuttle.remove_outstanding(assignment.request);
            tracker.remove_from_map(party_size);
            commands.entity(assignment.request).despawn();
            dispatcher.pickup_assignments.remove(index);
        }
    }

    // Evict stale onboard passengers, unless the shuttle is already headed
    // to their destination.
    for (vehicle, mut shuttle) in shuttles.iter_mut() {
        let mut kept = Vec::with_capacity(shuttle.onboard.len());
        for stop in std::mem::take(&mut shuttle.onboard) {
            let out_of_patience = requests
                .get(stop.request)
                .map(|r| r.out_of_patience(config.patience_limit))
                .unwrap_or(false);
            if out_of_patience && vehicle.target != Some(stop.location) {
                tracker.remove_from_vehicles(stop.party_size);
                commands.entity(stop.request).despawn();
            } else {
                kept.push(stop);
            }
        }
        shuttle.onboard = kept;
    }
}
