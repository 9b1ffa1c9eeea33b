//! Grid geometry: locations, Chebyshev distance, single-step movement.
//!
//! The city is a plain rectangular grid with no obstacles or cost field.
//! Coordinate equality is *value* equality and is used only for geometric
//! checks (arrival, distance). Identity of the individuals standing on a
//! coordinate is carried by their [`bevy_ecs::entity::Entity`], never by the
//! coordinate itself: two requests at the same location are distinct.

use std::fmt;

use bevy_ecs::prelude::Resource;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Errors raised when constructing grid geometry from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    /// A coordinate was negative. Carries the axis name and the bad value.
    InvalidCoordinate { axis: &'static str, value: i64 },
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::InvalidCoordinate { axis, value } => {
                write!(f, "negative {axis}-coordinate: {value}")
            }
        }
    }
}

impl std::error::Error for GridError {}

/// A cell on the city grid. `(0, 0)` is the top-left corner; `x` grows with
/// width and `y` with height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    x: u32,
    y: u32,
}

impl Location {
    /// Validating constructor for coordinates coming from a boundary
    /// (configuration, dial-in surface). Fails on negative input.
    pub fn new(x: i64, y: i64) -> Result<Self, GridError> {
        if x < 0 {
            return Err(GridError::InvalidCoordinate { axis: "x", value: x });
        }
        if y < 0 {
            return Err(GridError::InvalidCoordinate { axis: "y", value: y });
        }
        Ok(Self {
            x: x as u32,
            y: y as u32,
        })
    }

    /// Infallible constructor for known-good coordinates.
    pub fn at(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    /// Chebyshev distance: the number of single-step moves (diagonals
    /// allowed) needed to reach `other`.
    pub fn distance(&self, other: Location) -> u32 {
        let dx = self.x.abs_diff(other.x);
        let dy = self.y.abs_diff(other.y);
        dx.max(dy)
    }

    /// One movement step toward `destination`: at most one unit on each axis,
    /// independently. Returns `destination` itself when already there.
    pub fn step_toward(&self, destination: Location) -> Location {
        let step = |from: u32, to: u32| -> u32 {
            match from.cmp(&to) {
                std::cmp::Ordering::Greater => from - 1,
                std::cmp::Ordering::Less => from + 1,
                std::cmp::Ordering::Equal => from,
            }
        };
        let next = Location {
            x: step(self.x, destination.x),
            y: step(self.y, destination.y),
        };
        if next == *self {
            destination
        } else {
            next
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Dimensions of the city grid. Inserted as a resource at scenario build.
#[derive(Debug, Clone, Copy, Resource, Serialize, Deserialize)]
pub struct GridSize {
    pub width: u32,
    pub height: u32,
}

impl GridSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cells on the grid.
    pub fn cells(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn contains(&self, location: Location) -> bool {
        location.x < self.width && location.y < self.height
    }

    /// Uniformly random cell.
    pub fn random_location<R: Rng>(&self, rng: &mut R) -> Location {
        Location {
            x: rng.gen_range(0..self.width),
            y: rng.gen_range(0..self.height),
        }
    }

    /// Uniformly random cell different from `exclude`. Requires a grid with
    /// at least two cells; scenario validation guarantees this.
    pub fn random_location_excluding<R: Rng>(&self, rng: &mut R, exclude: Location) -> Location {
        loop {
            let candidate = self.random_location(rng);
            if candidate != exclude {
                return candidate;
            }
        }
    }
}
