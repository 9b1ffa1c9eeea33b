//! Demand admission: turn drafts into live requests, gated by the global
//! capacity tracker and routed through one dispatcher's selection policy.
//!
//! Runs after aging/eviction and before any vehicle moves. Injected drafts
//! (see [`DemandQueue`]) are drained first, then the random generator gets
//! one draw per tick.

use bevy_ecs::prelude::{Commands, Entity, Query, Res, ResMut};
use rand::Rng;

use crate::capacity::CapacityTracker;
use crate::dispatch::{
    select_shuttle_group, select_shuttle_single, select_taxi, Dispatcher, Dispatchers,
    ShuttleCandidate,
};
use crate::ecs::{AwaitingPickup, Position, ServiceMode, Shuttle, ShuttleStop, Taxi, Vehicle};
use crate::grid::{GridSize, Location};
use crate::spawner::{synthesize_draft, DemandConfig, DemandQueue, RequestDraft, SimRng};

pub fn demand_system(
    mut commands: Commands,
    grid: Res<GridSize>,
    config: Res<DemandConfig>,
    mut rng: ResMut<SimRng>,
    mut queue: ResMut<DemandQueue>,
    mut tracker: ResMut<CapacityTracker>,
    mut dispatchers: ResMut<Dispatchers>,
    mut taxis: Query<(&mut Vehicle, &Position, &Taxi)>,
    mut shuttles: Query<&mut Shuttle>,
) {
    let mut drafts: Vec<RequestDraft> = queue.drafts.drain(..).collect();
    if rng.0.gen_bool(config.creation_probability) {
        drafts.push(synthesize_draft(&mut rng.0, &grid, &config));
    }

    for draft in drafts {
        if tracker.cannot_admit(draft.party_size) {
            // The request never appeared; not a missed pickup.
            continue;
        }
        let index = draft
            .dispatcher
            .unwrap_or_else(|| rng.0.gen_range(0..dispatchers.0.len()));
        let admitted = dispatch_draft(
            &mut commands,
            &mut dispatchers.0[index],
            draft,
            &mut taxis,
            &mut shuttles,
        );
        if admitted {
            tracker.add_to_map(draft.party_size);
        } else {
            tracker.record_missed(draft.party_size);
        }
    }
}

/// Apply the scheduling policy for one draft against one dispatcher's
/// roster. On success the request entity is spawned and bound; on rejection
/// nothing materializes.
pub fn dispatch_draft(
    commands: &mut Commands,
    dispatcher: &mut Dispatcher,
    draft: RequestDraft,
    taxis: &mut Query<(&mut Vehicle, &Position, &Taxi)>,
    shuttles: &mut Query<&mut Shuttle>,
) -> bool {
    match draft.mode {
        ServiceMode::Direct => {
            let idle: Vec<(Entity, Location)> = dispatcher
                .roster
                .iter()
                .filter_map(|&entity| {
                    let (vehicle, position, taxi) = taxis.get(entity).ok()?;
                    taxi.is_free(vehicle).then_some((entity, position.0))
                })
                .collect();
            let Some(chosen) = select_taxi(draft.pickup, &idle) else {
                return false;
            };
            let Ok((mut vehicle, _, _)) = taxis.get_mut(chosen) else {
                return false;
            };
            vehicle.target = Some(draft.pickup);
            let request = commands.spawn((draft.into_request(), AwaitingPickup)).id();
            dispatcher.bind_taxi(chosen, request);
            true
        }
        ServiceMode::Pooled => {
            let candidates: Vec<ShuttleCandidate> = dispatcher
                .roster
                .iter()
                .filter_map(|&entity| {
                    let shuttle = shuttles.get(entity).ok()?;
                    Some(ShuttleCandidate {
                        shuttle: entity,
                        load: shuttle.load(),
                        capacity: shuttle.capacity,
                    })
                })
                .collect();
            let chosen = if draft.party_size > 1 {
                select_shuttle_group(draft.party_size, &candidates)
            } else {
                select_shuttle_single(&candidates)
            };
            let Some(chosen) = chosen else {
                return false;
            };
            let Ok(mut shuttle) = shuttles.get_mut(chosen) else {
                return false;
            };
            let request = commands.spawn((draft.into_request(), AwaitingPickup)).id();
            shuttle.outstanding.push(ShuttleStop {
                request,
                location: draft.pickup,
                party_size: draft.party_size,
            });
            dispatcher.bind_shuttle_pickup(chosen, request, draft.pickup);
            true
        }
    }
}
