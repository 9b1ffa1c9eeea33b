//! Global admission bookkeeping: persons on the map, persons riding
//! shuttles, and the fleet-derived cap that gates new demand.
//!
//! Counters are person-counts, not request-counts. Decrementing a counter
//! below zero can only come from an aging/eviction bookkeeping bug, so it
//! panics instead of being papered over.

use bevy_ecs::prelude::Resource;

/// Tracks the global admission cap and the person counters it bounds.
///
/// Invariant: `on_map + in_vehicles <= cap` at every tick boundary.
#[derive(Debug, Default, Resource)]
pub struct CapacityTracker {
    cap: u32,
    on_map: u32,
    in_vehicles: u32,
    missed_pickups: u32,
}

impl CapacityTracker {
    /// Raise the cap by a newly registered vehicle's capacity.
    pub fn register_capacity(&mut self, capacity: u32) {
        self.cap += capacity;
    }

    /// Admission gate: would admitting `party_size` more persons exceed the
    /// cap? Checked *before* a request materializes; a closed gate is a
    /// silent discard, not a missed pickup.
    pub fn cannot_admit(&self, party_size: u32) -> bool {
        self.on_map + self.in_vehicles + party_size > self.cap
    }

    /// A request was admitted and is now waiting on the map.
    pub fn add_to_map(&mut self, party_size: u32) {
        self.on_map += party_size;
    }

    /// Persons left the map without boarding a shuttle: taxi pickup or
    /// pickup eviction.
    pub fn remove_from_map(&mut self, party_size: u32) {
        assert!(
            self.on_map >= party_size,
            "on-map counter underflow: {} - {}",
            self.on_map,
            party_size
        );
        self.on_map -= party_size;
    }

    /// Persons boarded a shuttle: moved from the map into a vehicle.
    pub fn board(&mut self, party_size: u32) {
        self.remove_from_map(party_size);
        self.in_vehicles += party_size;
    }

    /// Persons left a shuttle: delivery or onboard eviction.
    pub fn remove_from_vehicles(&mut self, party_size: u32) {
        assert!(
            self.in_vehicles >= party_size,
            "in-vehicle counter underflow: {} - {}",
            self.in_vehicles,
            party_size
        );
        self.in_vehicles -= party_size;
    }

    /// A request appeared but no vehicle could take it.
    pub fn record_missed(&mut self, party_size: u32) {
        self.missed_pickups += party_size;
    }

    pub fn cap(&self) -> u32 {
        self.cap
    }

    pub fn on_map(&self) -> u32 {
        self.on_map
    }

    pub fn in_vehicles(&self) -> u32 {
        self.in_vehicles
    }

    pub fn missed_pickups(&self) -> u32 {
        self.missed_pickups
    }

    /// Invariant check used by tests and debug hooks.
    pub fn within_cap(&self) -> bool {
        self.on_map + self.in_vehicles <= self.cap
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gate_closes_exactly_at_cap() {
        let mut tracker = CapacityTracker::default();
        tracker.register_capacity(3);
        assert!(!tracker.cannot_admit(3));
        assert!(tracker.cannot_admit(4));

        tracker.add_to_map(2);
        assert!(!tracker.cannot_admit(1));
        assert!(tracker.cannot_admit(2));

        tracker.board(2);
        assert!(tracker.cannot_admit(2));
        assert_eq!(tracker.on_map(), 0);
        assert_eq!(tracker.in_vehicles(), 2);
        assert!(tracker.within_cap());
    }

    #[test]
    fn missed_pickups_accumulate_party_sizes() {
        let mut tracker = CapacityTracker::default();
        tracker.record_missed(1);
        tracker.record_missed(4);
        assert_eq!(tracker.missed_pickups(), 5);
    }

    #[test]
    #[should_panic(expected = "on-map counter underflow")]
    fn on_map_underflow_panics() {
        let mut tracker = CapacityTracker::default();
        tracker.register_capacity(5);
        tracker.add_to_map(1);
        tracker.remove_from_map(2);
    }

    #[test]
    #[should_panic(expected = "in-vehicle counter underflow")]
    fn in_vehicle_underflow_panics() {
        let mut tracker = CapacityTracker::default();
        tracker.remove_from_vehicles(1);
    }
}
