//! Components: transport requests, vehicles and their loads.
//!
//! Requests and vehicles are entities. A request's identity is its `Entity`
//! id, so two requests sharing a pickup coordinate never collapse into one.

use bevy_ecs::prelude::{Component, Entity};

use crate::grid::Location;

/// How a request wants to travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceMode {
    /// Exclusive single-passenger vehicle (taxi).
    Direct,
    /// Capacity-bounded shared vehicle (shuttle).
    Pooled,
}

/// A transport request: one passenger or one group travelling together.
///
/// A group differs from a plain request only by `party_size` (> 1) and by
/// always being [`ServiceMode::Pooled`]; there is no separate group type.
#[derive(Debug, Clone, Copy, Component)]
pub struct Request {
    pub pickup: Location,
    /// Never equal to `pickup`.
    pub destination: Location,
    /// Persons travelling together; 1 for a plain request, 2+ for a group.
    pub party_size: u32,
    pub mode: ServiceMode,
    /// Ticks since creation. Reset to 0 only when boarded by a shuttle.
    pub age: u32,
}

impl Request {
    pub fn is_group(&self) -> bool {
        self.party_size > 1
    }

    /// Past the display threshold: shown as angry, not yet evictable.
    pub fn is_agitated(&self, agitated_limit: u32) -> bool {
        self.age >= agitated_limit
    }

    /// Past the patience limit: eviction is considered (subject to the
    /// grace rule in the aging pass).
    pub fn out_of_patience(&self, patience_limit: u32) -> bool {
        self.age >= patience_limit
    }
}

/// Marker for requests standing on the map waiting for a pickup. Removed
/// when the request boards a vehicle; delivered or evicted requests are
/// despawned outright.
#[derive(Debug, Clone, Copy, Component)]
pub struct AwaitingPickup;

/// Grid cell a vehicle currently occupies.
#[derive(Debug, Clone, Copy, Component)]
pub struct Position(pub Location);

/// Dial-in identifier of a vehicle, e.g. `"T-3"` or `"S-1"`.
#[derive(Debug, Clone, Component)]
pub struct VehicleId(pub String);

/// State shared by both vehicle kinds.
#[derive(Debug, Clone, Copy, Component)]
pub struct Vehicle {
    /// Where the vehicle is headed; `None` means it has nothing to do.
    pub target: Option<Location>,
    /// Ticks spent with nothing to do.
    pub idle_ticks: u64,
    /// Completed deliveries (per request, not per person).
    pub deliveries: u32,
}

impl Vehicle {
    pub fn idle() -> Self {
        Self {
            target: None,
            idle_ticks: 0,
            deliveries: 0,
        }
    }
}

/// A taxi: carries at most one request, exclusively.
#[derive(Debug, Clone, Copy, Default, Component)]
pub struct Taxi {
    pub passenger: Option<Entity>,
}

impl Taxi {
    /// Free to accept an assignment: no target and nobody on board.
    pub fn is_free(&self, vehicle: &Vehicle) -> bool {
        vehicle.target.is_none() && self.passenger.is_none()
    }
}

/// One pending stop of a shuttle: a request together with the location the
/// shuttle must reach for it (pickup while outstanding, destination once
/// on board) and its party size in persons.
#[derive(Debug, Clone, Copy)]
pub struct ShuttleStop {
    pub request: Entity,
    pub location: Location,
    pub party_size: u32,
}

/// A shuttle: holds outstanding pickups and onboard passengers at once,
/// bounded by a per-vehicle capacity counted in persons.
#[derive(Debug, Clone, Component)]
pub struct Shuttle {
    pub capacity: u32,
    /// Accepted requests not yet boarded; `location` is the pickup cell.
    pub outstanding: Vec<ShuttleStop>,
    /// Boarded requests; `location` is the destination cell.
    pub onboard: Vec<ShuttleStop>,
}

impl Shuttle {
    pub fn with_capacity(capacity: u32) -> Self {
        Self {
            capacity,
            outstanding: Vec::new(),
            onboard: Vec::new(),
        }
    }

    /// Persons committed to this shuttle, outstanding and onboard together.
    pub fn load(&self) -> u32 {
        let outstanding: u32 = self.outstanding.iter().map(|s| s.party_size).sum();
        let onboard: u32 = self.onboard.iter().map(|s| s.party_size).sum();
        outstanding + onboard
    }

    pub fn is_empty(&self) -> bool {
        self.outstanding.is_empty() && self.onboard.is_empty()
    }

    /// Room for one more person (single-party pooled requests).
    pub fn has_free_slot(&self) -> bool {
        self.load() < self.capacity
    }

    /// Room for a whole group.
    pub fn can_fit_group(&self, size: u32) -> bool {
        self.load() + size <= self.capacity
    }

    /// Best-fit ranking key for group dispatch: share of capacity still free.
    pub fn remaining_capacity_fraction(&self) -> f64 {
        1.0 - self.load() as f64 / self.capacity as f64
    }

    /// Nearest stop among onboard destinations and outstanding pickups.
    /// Onboard entries are scanned first and only a strictly smaller
    /// distance replaces the running minimum, so the first minimum found
    /// wins. Returns `None` when the shuttle has nothing to do.
    pub fn nearest_stop(&self, from: Location) -> Option<Location> {
        let mut best: Option<(u32, Location)> = None;
        for stop in self.onboard.iter().chain(self.outstanding.iter()) {
            let d = from.distance(stop.location);
            if best.map_or(true, |(min, _)| d < min) {
                best = Some((d, stop.location));
            }
        }
        best.map(|(_, location)| location)
    }

    /// Remove and return every onboard entry whose destination is `at`.
    pub fn take_onboard_at(&mut self, at: Location) -> Vec<ShuttleStop> {
        let (arrived, remaining) = self.onboard.drain(..).partition(|s| s.location == at);
        self.onboard = remaining;
        arrived
    }

    /// Remove and return every outstanding entry whose pickup is `at`.
    pub fn take_outstanding_at(&mut self, at: Location) -> Vec<ShuttleStop> {
        let (arrived, remaining) = self.outstanding.drain(..).partition(|s| s.location == at);
        self.outstanding = remaining;
        arrived
    }

    /// Remove one outstanding entry by request identity (pickup eviction).
    /// Returns the removed entry, if present.
    pub fn remove_outstanding(&mut self, request: Entity) -> Option<ShuttleStop> {
        let index = self.outstanding.iter().position(|s| s.request == request)?;
        Some(self.outstanding.remove(index))
    }
}
