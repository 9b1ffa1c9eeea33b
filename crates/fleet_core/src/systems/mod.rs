pub mod age_evict;
pub mod demand;
pub mod dial_intake;
pub mod movement;
pub mod snapshot;
