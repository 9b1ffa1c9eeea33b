//! Dial intake: drains the dial queue at the start of every tick, before
//! aging and new demand, so callers get an answer one tick after dialing at
//! the latest while the model stays single-writer.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};

use crate::capacity::CapacityTracker;
use crate::dial::{DialOutcome, DialQueue};
use crate::dispatch::Dispatchers;
use crate::ecs::{AwaitingPickup, Position, Taxi, Vehicle, VehicleId};
use crate::grid::{GridSize, Location};
use crate::spawner::{dial_draft, SimRng};

pub fn dial_intake_system(
    mut commands: Commands,
    queue: Res<DialQueue>,
    grid: Res<GridSize>,
    mut rng: ResMut<SimRng>,
    mut tracker: ResMut<CapacityTracker>,
    mut dispatchers: ResMut<Dispatchers>,
    mut taxis: Query<(&VehicleId, &mut Vehicle, &Position, &Taxi)>,
) {
    for command in queue.drain() {
        let outcome = apply_dial(
            &mut commands,
            &command.vehicle_id,
            Location::at(command.x, command.y),
            &grid,
            &mut rng,
            &mut tracker,
            &mut dispatchers,
            &mut taxis,
        );
        // The caller may have given up waiting; that is fine.
        let _ = command.reply.send(outcome);
    }
}

/// Resolve one dial against the fleet: find the named taxi across all
/// dispatchers and bind a fresh single-party direct request to it if idle.
#[allow(clippy::too_many_arguments)]
fn apply_dial(
    commands: &mut Commands,
    vehicle_id: &str,
    pickup: Location,
    grid: &GridSize,
    rng: &mut SimRng,
    tracker: &mut CapacityTracker,
    dispatchers: &mut Dispatchers,
    taxis: &mut Query<(&VehicleId, &mut Vehicle, &Position, &Taxi)>,
) -> DialOutcome {
    if tracker.cannot_admit(1) {
        return DialOutcome::Saturated;
    }

    // Find first, bind after: scanning the roster must not hold the
    // dispatcher mutably while we mutate it.
    let mut found: Option<(usize, Entity)> = None;
    'scan: for (index, dispatcher) in dispatchers.0.iter().enumerate() {
        for &entity in &dispatcher.roster {
            let Ok((id, vehicle, _, taxi)) = taxis.get(entity) else {
                continue;
            };
            if id.0 != vehicle_id {
                continue;
            }
            if !taxi.is_free(vehicle) {
                return DialOutcome::Busy;
            }
            found = Some((index, entity));
            break 'scan;
        }
    }
    let Some((index, entity)) = found else {
        tracker.record_missed(1);
        return DialOutcome::UnknownId;
    };

    let draft = dial_draft(&mut rng.0, grid, pickup);
    if let Ok((_, mut vehicle, _, _)) = taxis.get_mut(entity) {
        vehicle.target = Some(pickup);
    }
    let request = commands.spawn((draft.into_request(), AwaitingPickup)).id();
    dispatchers.0[index].bind_taxi(entity, request);
    tracker.add_to_map(1);
    DialOutcome::Success
}
