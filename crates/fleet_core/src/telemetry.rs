//! View snapshots: the read-only state an external observer consumes at
//! tick boundaries. The core never formats or renders them.

use std::collections::VecDeque;

use bevy_ecs::prelude::{Entity, Resource};

use crate::grid::Location;

/// Display state of one visible item on the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemTag {
    TaxiEmpty,
    TaxiCarrying,
    ShuttleEmpty,
    ShuttleCarrying,
    RequestWaiting,
    GroupWaiting,
    RequestAgitated,
    GroupAgitated,
}

/// One drawable item: a vehicle at its position or a waiting request at its
/// pickup cell. Boarded passengers are not items.
#[derive(Debug, Clone, Copy)]
pub struct ItemSnapshot {
    pub location: Location,
    pub tag: ItemTag,
}

/// Per-vehicle counters exposed to the observer.
#[derive(Debug, Clone)]
pub struct VehicleCounters {
    pub entity: Entity,
    pub id: String,
    pub idle_ticks: u64,
    pub deliveries: u32,
}

/// Everything visible at the end of one tick.
#[derive(Debug, Clone)]
pub struct SimSnapshot {
    pub tick: u64,
    pub items: Vec<ItemSnapshot>,
    pub on_map: u32,
    pub in_vehicles: u32,
    pub missed_pickups: u32,
    pub cap: u32,
    pub vehicles: Vec<VehicleCounters>,
}

/// Snapshot capture configuration.
#[derive(Debug, Clone, Copy, Resource)]
pub struct SimSnapshotConfig {
    /// Oldest snapshots are dropped past this count.
    pub max_snapshots: usize,
}

impl Default for SimSnapshotConfig {
    fn default() -> Self {
        Self {
            max_snapshots: 10_000,
        }
    }
}

/// Rolling buffer of per-tick snapshots.
#[derive(Debug, Default, Resource)]
pub struct SimSnapshots {
    pub snapshots: VecDeque<SimSnapshot>,
}

impl SimSnapshots {
    pub fn push(&mut self, snapshot: SimSnapshot, max: usize) {
        if self.snapshots.len() >= max {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn latest(&self) -> Option<&SimSnapshot> {
        self.snapshots.back()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(tick: u64) -> SimSnapshot {
        SimSnapshot {
            tick,
            items: Vec::new(),
            on_map: 0,
            in_vehicles: 0,
            missed_pickups: 0,
            cap: 0,
            vehicles: Vec::new(),
        }
    }

    #[test]
    fn buffer_drops_oldest_past_max() {
        let mut snapshots = SimSnapshots::default();
        for tick in 0..5 {
            snapshots.push(snapshot(tick), 3);
        }
        assert_eq!(snapshots.snapshots.len(), 3);
        assert_eq!(snapshots.snapshots.front().map(|s| s.tick), Some(2));
        assert_eq!(snapshots.latest().map(|s| s.tick), Some(4));
    }
}
