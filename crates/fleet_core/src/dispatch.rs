//! Dispatchers and the vehicle-selection policy.
//!
//! One [`Dispatcher`] per operator owns an ordered roster of vehicles and two
//! assignment tables: taxi -> request, and pending shuttle pickups. The
//! selection policy is deliberately greedy (nearest idle taxi, first free
//! shuttle, best-fit shuttle for groups) — it is a heuristic simulator, not
//! an optimizer.
//!
//! Selection is expressed as pure functions over candidate tuples extracted
//! from the ECS in roster order, so the tie-break rules are unit-testable
//! without a world.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::grid::Location;

/// A pending shuttle pickup: which request, waiting where, bound to which
/// shuttle. Kept as a scanned list rather than a map keyed by coordinates so
/// that distinct requests sharing a pickup cell stay distinct.
#[derive(Debug, Clone, Copy)]
pub struct PickupAssignment {
    pub pickup: Location,
    pub request: Entity,
    pub shuttle: Entity,
}

/// One operator's dispatch state.
#[derive(Debug, Default)]
pub struct Dispatcher {
    pub name: String,
    /// Vehicles in registration order; all tie-breaks scan this order.
    pub roster: Vec<Entity>,
    /// Taxi -> the request it is assigned to (en route or carrying).
    pub taxi_assignments: HashMap<Entity, Entity>,
    /// Pending shuttle pickups, in acceptance order.
    pub pickup_assignments: Vec<PickupAssignment>,
}

impl Dispatcher {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn bind_taxi(&mut self, taxi: Entity, request: Entity) {
        self.taxi_assignments.insert(taxi, request);
    }

    pub fn bind_shuttle_pickup(&mut self, shuttle: Entity, request: Entity, pickup: Location) {
        self.pickup_assignments.push(PickupAssignment {
            pickup,
            request,
            shuttle,
        });
    }
}

/// All dispatchers of the simulation, in operator order.
#[derive(Debug, Default, Resource)]
pub struct Dispatchers(pub Vec<Dispatcher>);

impl Dispatchers {
    /// Remove and return the request assigned to `taxi`, whichever
    /// dispatcher holds it.
    pub fn remove_taxi_assignment(&mut self, taxi: Entity) -> Option<Entity> {
        self.0
            .iter_mut()
            .find_map(|dispatcher| dispatcher.taxi_assignments.remove(&taxi))
    }

    /// Drop every pending pickup bound to `shuttle` at `pickup`. Matching is
    /// on the (shuttle, location) pair, never on the coordinate alone.
    pub fn remove_pickup_assignments(&mut self, shuttle: Entity, pickup: Location) {
        for dispatcher in &mut self.0 {
            dispatcher
                .pickup_assignments
                .retain(|a| !(a.shuttle == shuttle && a.pickup == pickup));
        }
    }
}

/// Pick the idle taxi nearest to `pickup`. Ties keep the first candidate,
/// i.e. roster order.
pub fn select_taxi(pickup: Location, idle_taxis: &[(Entity, Location)]) -> Option<Entity> {
    let mut best: Option<(u32, Entity)> = None;
    for &(taxi, location) in idle_taxis {
        let d = pickup.distance(location);
        if best.map_or(true, |(min, _)| d < min) {
            best = Some((d, taxi));
        }
    }
    best.map(|(_, taxi)| taxi)
}

/// Load/capacity view of one shuttle candidate, extracted in roster order.
#[derive(Debug, Clone, Copy)]
pub struct ShuttleCandidate {
    pub shuttle: Entity,
    pub load: u32,
    pub capacity: u32,
}

impl ShuttleCandidate {
    fn has_free_slot(&self) -> bool {
        self.load < self.capacity
    }

    fn can_fit_group(&self, size: u32) -> bool {
        self.load + size <= self.capacity
    }

    fn remaining_capacity_fraction(&self) -> f64 {
        1.0 - self.load as f64 / self.capacity as f64
    }
}

/// Single-party pooled request: first shuttle in roster order with a free
/// slot. No distance ranking.
pub fn select_shuttle_single(candidates: &[ShuttleCandidate]) -> Option<Entity> {
    candidates
        .iter()
        .find(|c| c.has_free_slot())
        .map(|c| c.shuttle)
}

/// Group request: among shuttles that fit the whole group, the one with the
/// greatest remaining capacity fraction. Ties keep the first found.
pub fn select_shuttle_group(size: u32, candidates: &[ShuttleCandidate]) -> Option<Entity> {
    let mut best: Option<(f64, Entity)> = None;
    for candidate in candidates {
        if !candidate.can_fit_group(size) {
            continue;
        }
        let fraction = candidate.remaining_capacity_fraction();
        if best.map_or(true, |(max, _)| fraction > max) {
            best = Some((fraction, candidate.shuttle));
        }
    }
    best.map(|(_, shuttle)| shuttle)
}
