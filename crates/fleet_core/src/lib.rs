pub mod capacity;
pub mod clock;
pub mod dial;
pub mod dispatch;
pub mod ecs;
pub mod grid;
pub mod runner;
pub mod scenario;
pub mod spawner;
pub mod systems;
pub mod telemetry;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
