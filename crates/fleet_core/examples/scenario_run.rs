//! Run the default two-operator scenario for 300 ticks and print the final
//! counters.
//!
//! Run with: cargo run -p fleet_core --example scenario_run

use bevy_ecs::prelude::World;

use fleet_core::capacity::CapacityTracker;
use fleet_core::runner::{run, simulation_schedule};
use fleet_core::scenario::{build_scenario, ScenarioParams};
use fleet_core::telemetry::SimSnapshots;

fn main() {
    let params = ScenarioParams::default().with_seed(123);
    let ticks = params.total_ticks;

    let mut world = World::new();
    let _handle = match build_scenario(&mut world, &params) {
        Ok(handle) => handle,
        Err(err) => {
            eprintln!("invalid scenario: {err}");
            std::process::exit(1);
        }
    };

    let mut schedule = simulation_schedule();
    let last = run(&mut world, &mut schedule, ticks);

    let tracker = world.resource::<CapacityTracker>();
    println!(
        "--- Scenario run ({} operators, {}x{} grid, seed {}) ---",
        params.operators.len(),
        params.grid_width,
        params.grid_height,
        params.seed
    );
    println!("Ticks executed: {last}");
    println!("Admission cap:  {}", tracker.cap());
    println!("On map:         {}", tracker.on_map());
    println!("In vehicles:    {}", tracker.in_vehicles());
    println!("Missed pickups: {}", tracker.missed_pickups());

    let snapshots = world.resource::<SimSnapshots>();
    if let Some(latest) = snapshots.latest() {
        println!("\nPer-vehicle counters at tick {}:", latest.tick);
        for vehicle in &latest.vehicles {
            println!(
                "  {:>5}  idle={:>4}  deliveries={:>3}",
                vehicle.id, vehicle.idle_ticks, vehicle.deliveries
            );
        }
    }
}
