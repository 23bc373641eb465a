use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sylva_core::config::AppConfig;
use sylva_core::environment::Environment;
use sylva_core::network::propagation_order;
use sylva_core::world::World;

fn seeded_world(organisms: usize) -> (World, Environment) {
    let mut config = AppConfig::default();
    config.world.seed = Some(42);
    config.world.deterministic = true;
    let env = Environment::with_seed(&config.environment, 42);
    let world = World::new(organisms, config).expect("benchmark world");
    (world, env)
}

fn bench_world_update(c: &mut Criterion) {
    let (mut world, mut env) = seeded_world(200);

    c.bench_function("world_update_200_organisms", |b| {
        b.iter(|| black_box(world.update(&mut env).expect("tick")))
    });
}

fn bench_propagation_order(c: &mut Criterion) {
    let (world, _) = seeded_world(500);

    c.bench_function("propagation_order_500_organisms", |b| {
        b.iter(|| black_box(propagation_order(&world.cells).expect("acyclic")))
    });
}

criterion_group!(benches, bench_world_update, bench_propagation_order);
criterion_main!(benches);
