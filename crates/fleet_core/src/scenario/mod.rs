//! Scenario setup: parameters, validation and world construction.

mod build;
mod params;

pub use build::{build_scenario, ScenarioHandle, MAX_PLACEMENT_ATTEMPTS};
pub use params::{OperatorParams, ScenarioError, ScenarioParams};
