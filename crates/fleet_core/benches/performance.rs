//! Performance benchmarks for fleet_core using Criterion.rs.

use bevy_ecs::prelude::World;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use fleet_core::runner::{run, simulation_schedule};
use fleet_core::scenario::{build_scenario, OperatorParams, ScenarioParams};

fn fleet(operators: usize, taxis: u32, shuttles: u32) -> Vec<OperatorParams> {
    (0..operators)
        .map(|i| OperatorParams {
            name: format!("operator-{i}"),
            num_taxis: taxis,
            num_shuttles: shuttles,
        })
        .collect()
}

fn bench_simulation_run(c: &mut Criterion) {
    let scenarios = vec![
        ("small", fleet(2, 3, 2), 300u64),
        ("medium", fleet(4, 10, 5), 300),
        ("large", fleet(8, 25, 10), 300),
    ];

    let mut group = c.benchmark_group("simulation_run");
    for (name, operators, ticks) in scenarios {
        group.bench_with_input(
            BenchmarkId::from_parameter(name),
            &(operators, ticks),
            |b, (operators, ticks)| {
                b.iter(|| {
                    let mut world = World::new();
                    let params = ScenarioParams::default()
                        .with_grid(50, 50)
                        .with_seed(42)
                        .with_operators(operators.clone());
                    build_scenario(&mut world, &params).expect("valid params");
                    let mut schedule = simulation_schedule();
                    black_box(run(&mut world, &mut schedule, *ticks));
                });
            },
        );
    }
    group.finish();
}

fn bench_dispatch_policy(c: &mut Criterion) {
    use bevy_ecs::prelude::Entity;
    use fleet_core::dispatch::{select_shuttle_group, select_taxi, ShuttleCandidate};
    use fleet_core::grid::Location;

    let pickup = Location::at(25, 25);
    let taxis: Vec<(Entity, Location)> = (0..200u32)
        .map(|i| (Entity::from_raw(i + 1), Location::at(i % 50, i / 50)))
        .collect();
    let shuttles: Vec<ShuttleCandidate> = (0..200u32)
        .map(|i| ShuttleCandidate {
            shuttle: Entity::from_raw(i + 1),
            load: i % 15,
            capacity: 15,
        })
        .collect();

    let mut group = c.benchmark_group("dispatch_policy");
    group.bench_function("select_taxi_200_candidates", |b| {
        b.iter(|| black_box(select_taxi(pickup, &taxis)));
    });
    group.bench_function("select_shuttle_group_200_candidates", |b| {
        b.iter(|| black_box(select_shuttle_group(5, &shuttles)));
    });
    group.finish();
}

criterion_group!(benches, bench_simulation_run, bench_dispatch_policy);
criterion_main!(benches);
