//! Demand synthesis: drafts for new transport requests and the knobs that
//! shape them.
//!
//! The per-tick admission flow itself lives in [`crate::systems::demand`];
//! this module holds the configuration, the seeded RNG resource and the
//! draft type shared by the random generator, the dial-in path and tests.

use bevy_ecs::prelude::Resource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::ecs::{Request, ServiceMode};
use crate::grid::{GridSize, Location};

/// Seeded RNG driving every random draw of the simulation, so a run is
/// reproducible from a single seed.
#[derive(Debug, Resource)]
pub struct SimRng(pub StdRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

/// Demand-shaping knobs, fixed for a run.
#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct DemandConfig {
    /// Chance of synthesizing one request per tick.
    pub creation_probability: f64,
    /// Chance the synthesized request is a group rather than a single party.
    pub group_probability: f64,
    /// Group party size is drawn uniformly from this inclusive range.
    pub group_size_min: u32,
    pub group_size_max: u32,
    /// Age at which a waiting request is displayed as angry.
    pub agitated_limit: u32,
    /// Age at which an unprotected request is evicted.
    pub patience_limit: u32,
}

impl Default for DemandConfig {
    fn default() -> Self {
        Self {
            creation_probability: 0.35,
            group_probability: 0.5,
            group_size_min: 2,
            group_size_max: 10,
            agitated_limit: 30,
            patience_limit: 40,
        }
    }
}

/// A request that has not been admitted yet. Drafts are what the demand
/// system dispatches; only successfully bound drafts become entities.
#[derive(Debug, Clone, Copy)]
pub struct RequestDraft {
    pub pickup: Location,
    pub destination: Location,
    pub party_size: u32,
    pub mode: ServiceMode,
    /// Route to this dispatcher (index) instead of a random one. Used by
    /// tests and targeted injection.
    pub dispatcher: Option<usize>,
}

impl RequestDraft {
    /// Materialize the draft as a request component with age zero.
    pub fn into_request(self) -> Request {
        Request {
            pickup: self.pickup,
            destination: self.destination,
            party_size: self.party_size,
            mode: self.mode,
            age: 0,
        }
    }
}

/// Synthesize one random draft: uniform pickup, uniform destination distinct
/// from it; 50/50 plain-vs-group by default, a plain request picking its
/// mode uniformly and a group always pooled.
pub fn synthesize_draft<R: Rng>(rng: &mut R, grid: &GridSize, config: &DemandConfig) -> RequestDraft {
    let pickup = grid.random_location(rng);
    let destination = grid.random_location_excluding(rng, pickup);

    if rng.gen_bool(config.group_probability) {
        let party_size = rng.gen_range(config.group_size_min..=config.group_size_max);
        RequestDraft {
            pickup,
            destination,
            party_size,
            mode: ServiceMode::Pooled,
            dispatcher: None,
        }
    } else {
        let mode = if rng.gen_bool(0.5) {
            ServiceMode::Direct
        } else {
            ServiceMode::Pooled
        };
        RequestDraft {
            pickup,
            destination,
            party_size: 1,
            mode,
            dispatcher: None,
        }
    }
}

/// Synthesize the draft behind a dial-in call: direct mode, single party,
/// pickup fixed by the caller, random destination.
pub fn dial_draft<R: Rng>(rng: &mut R, grid: &GridSize, pickup: Location) -> RequestDraft {
    let destination = grid.random_location_excluding(rng, pickup);
    RequestDraft {
        pickup,
        destination,
        party_size: 1,
        mode: ServiceMode::Direct,
        dispatcher: None,
    }
}

/// Drafts injected ahead of the random generator; drained first every tick.
/// Tests and control surfaces use this to feed deterministic demand.
#[derive(Debug, Default, Resource)]
pub struct DemandQueue {
    pub drafts: std::collections::VecDeque<RequestDraft>,
}

impl DemandQueue {
    pub fn push(&mut self, draft: RequestDraft) {
        self.drafts.push_back(draft);
    }
}
