//! World construction from [`ScenarioParams`].

use bevy_ecs::prelude::{Entity, World};
use rand::Rng;

use crate::capacity::CapacityTracker;
use crate::clock::SimulationClock;
use crate::dial::{dial_channel, DialEndpoint};
use crate::dispatch::{Dispatcher, Dispatchers};
use crate::ecs::{Position, Shuttle, Taxi, Vehicle, VehicleId};
use crate::grid::{GridSize, Location};
use crate::scenario::params::{ScenarioError, ScenarioParams};
use crate::spawner::{DemandQueue, SimRng};
use crate::telemetry::{SimSnapshotConfig, SimSnapshots};

/// Random placement retries before accepting a cell another vehicle already
/// occupies. Overlap is legal, just visually noisy.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// Handles the builder returns to the embedding program.
pub struct ScenarioHandle {
    /// Caller-side end of the dial-in surface.
    pub dial: DialEndpoint,
}

fn place_vehicle<R: Rng>(rng: &mut R, grid: &GridSize, occupied: &[Location]) -> Location {
    let mut candidate = grid.random_location(rng);
    for _ in 0..MAX_PLACEMENT_ATTEMPTS {
        if !occupied.contains(&candidate) {
            break;
        }
        candidate = grid.random_location(rng);
    }
    candidate
}

/// Build a ready-to-tick world: resources, one dispatcher per operator, and
/// the fleets spawned at random positions. Vehicle ids are `T-n` / `S-n`,
/// numbered globally across operators.
pub fn build_scenario(
    world: &mut World,
    params: &ScenarioParams,
) -> Result<ScenarioHandle, ScenarioError> {
    params.validate()?;

    let grid = GridSize::new(params.grid_width, params.grid_height);
    let mut rng = SimRng::seeded(params.seed);
    let mut tracker = CapacityTracker::default();
    let mut dispatchers = Vec::with_capacity(params.operators.len());
    let mut occupied: Vec<Location> = Vec::new();

    let mut taxi_counter = 0u32;
    let mut shuttle_counter = 0u32;
    for operator in &params.operators {
        let mut dispatcher = Dispatcher::new(operator.name.clone());
        for _ in 0..operator.num_taxis {
            taxi_counter += 1;
            let location = place_vehicle(&mut rng.0, &grid, &occupied);
            occupied.push(location);
            let entity: Entity = world
                .spawn((
                    VehicleId(format!("T-{taxi_counter}")),
                    Position(location),
                    Vehicle::idle(),
                    Taxi::default(),
                ))
                .id();
            dispatcher.roster.push(entity);
            tracker.register_capacity(1);
        }
        for _ in 0..operator.num_shuttles {
            shuttle_counter += 1;
            let capacity = rng
                .0
                .gen_range(params.shuttle_capacity_min..=params.shuttle_capacity_max);
            let location = place_vehicle(&mut rng.0, &grid, &occupied);
            occupied.push(location);
            let entity: Entity = world
                .spawn((
                    VehicleId(format!("S-{shuttle_counter}")),
                    Position(location),
                    Vehicle::idle(),
                    Shuttle::with_capacity(capacity),
                ))
                .id();
            dispatcher.roster.push(entity);
            tracker.register_capacity(capacity);
        }
        dispatchers.push(dispatcher);
    }

    let (dial, dial_queue) = dial_channel();

    world.insert_resource(grid);
    world.insert_resource(SimulationClock::default());
    world.insert_resource(tracker);
    world.insert_resource(Dispatchers(dispatchers));
    world.insert_resource(params.demand_config());
    world.insert_resource(DemandQueue::default());
    world.insert_resource(rng);
    world.insert_resource(dial_queue);
    world.insert_resource(SimSnapshotConfig::default());
    world.insert_resource(SimSnapshots::default());

    Ok(ScenarioHandle { dial })
}
