//! Simulation clock: a monotone tick counter.
//!
//! One tick runs every per-tick system exactly once in a fixed order (see
//! [`crate::runner::simulation_schedule`]). The clock carries no event queue;
//! everything the model does happens on the tick it is scheduled in.

use bevy_ecs::prelude::Resource;

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Advance to the next tick and return it.
    pub fn advance(&mut self) -> u64 {
        self.now += 1;
        self.now
    }
}
