//! Parameters for building a simulation scenario.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::spawner::DemandConfig;

/// One operator's fleet sizes. Each operator gets its own dispatcher.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperatorParams {
    pub name: String,
    pub num_taxis: u32,
    pub num_shuttles: u32,
}

/// Everything a run needs, supplied by the configuration collaborator before
/// the clock starts ticking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScenarioParams {
    pub grid_width: u32,
    pub grid_height: u32,
    pub operators: Vec<OperatorParams>,
    /// Chance of one synthesized request per tick.
    pub creation_probability: f64,
    /// Chance the synthesized request is a group.
    pub group_probability: f64,
    pub group_size_min: u32,
    pub group_size_max: u32,
    /// Each shuttle's capacity is drawn uniformly from this inclusive range.
    pub shuttle_capacity_min: u32,
    pub shuttle_capacity_max: u32,
    pub agitated_limit: u32,
    pub patience_limit: u32,
    pub total_ticks: u64,
    /// Inter-tick delay for paced runs; external consumers poll at this rate.
    pub tick_delay_ms: u64,
    pub seed: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            grid_width: 35,
            grid_height: 35,
            operators: vec![
                OperatorParams {
                    name: "north".to_string(),
                    num_taxis: 3,
                    num_shuttles: 2,
                },
                OperatorParams {
                    name: "south".to_string(),
                    num_taxis: 3,
                    num_shuttles: 2,
                },
            ],
            creation_probability: 0.35,
            group_probability: 0.5,
            group_size_min: 2,
            group_size_max: 10,
            shuttle_capacity_min: 10,
            shuttle_capacity_max: 20,
            agitated_limit: 30,
            patience_limit: 40,
            total_ticks: 300,
            tick_delay_ms: 400,
            seed: 0,
        }
    }
}

impl ScenarioParams {
    pub fn with_grid(mut self, width: u32, height: u32) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_operators(mut self, operators: Vec<OperatorParams>) -> Self {
        self.operators = operators;
        self
    }

    /// The demand-shaping subset, as the resource the systems read.
    pub fn demand_config(&self) -> DemandConfig {
        DemandConfig {
            creation_probability: self.creation_probability,
            group_probability: self.group_probability,
            group_size_min: self.group_size_min,
            group_size_max: self.group_size_max,
            agitated_limit: self.agitated_limit,
            patience_limit: self.patience_limit,
        }
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(ScenarioError::EmptyGrid);
        }
        if self.grid_width * self.grid_height < 2 {
            // Destinations must differ from pickups.
            return Err(ScenarioError::EmptyGrid);
        }
        if self.operators.is_empty() {
            return Err(ScenarioError::NoOperators);
        }
        if self
            .operators
            .iter()
            .all(|op| op.num_taxis == 0 && op.num_shuttles == 0)
        {
            return Err(ScenarioError::EmptyFleet);
        }
        if !(0.0..=1.0).contains(&self.creation_probability)
            || !(0.0..=1.0).contains(&self.group_probability)
        {
            return Err(ScenarioError::ProbabilityOutOfRange);
        }
        if self.group_size_min < 2 || self.group_size_min > self.group_size_max {
            return Err(ScenarioError::BadGroupSizeRange {
                min: self.group_size_min,
                max: self.group_size_max,
            });
        }
        if self.shuttle_capacity_min == 0 || self.shuttle_capacity_min > self.shuttle_capacity_max
        {
            return Err(ScenarioError::BadCapacityRange {
                min: self.shuttle_capacity_min,
                max: self.shuttle_capacity_max,
            });
        }
        if self.agitated_limit > self.patience_limit {
            return Err(ScenarioError::AgitatedPastPatience {
                agitated: self.agitated_limit,
                patience: self.patience_limit,
            });
        }
        Ok(())
    }
}

/// Rejected scenario parameters. Construction-time only; a built world never
/// sees these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioError {
    EmptyGrid,
    NoOperators,
    EmptyFleet,
    ProbabilityOutOfRange,
    BadGroupSizeRange { min: u32, max: u32 },
    BadCapacityRange { min: u32, max: u32 },
    AgitatedPastPatience { agitated: u32, patience: u32 },
}

impl fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScenarioError::EmptyGrid => write!(f, "grid must contain at least two cells"),
            ScenarioError::NoOperators => write!(f, "at least one operator is required"),
            ScenarioError::EmptyFleet => write!(f, "every operator has an empty fleet"),
            ScenarioError::ProbabilityOutOfRange => {
                write!(f, "probabilities must lie in [0, 1]")
            }
            ScenarioError::BadGroupSizeRange { min, max } => {
                write!(f, "invalid group size range: {min}..={max} (min must be 2+)")
            }
            ScenarioError::BadCapacityRange { min, max } => {
                write!(f, "invalid shuttle capacity range: {min}..={max}")
            }
            ScenarioError::AgitatedPastPatience { agitated, patience } => {
                write!(
                    f,
                    "agitated limit {agitated} exceeds patience limit {patience}"
                )
            }
        }
    }
}

impl std::error::Error for ScenarioError {}
