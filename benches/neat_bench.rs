//! Benchmarks for neat-genotype.

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use neat_genotype::{to_json, Genome, InnovationRegistry, NeatConfig};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

fn structural_config() -> NeatConfig {
    NeatConfig {
        start_enabled: true,
        add_connection_rate: 0.3,
        add_node_rate: 0.1,
        ..NeatConfig::minimal(4, 2)
    }
}

fn evolved(config: &NeatConfig, registry: &mut InnovationRegistry, rng: &mut ChaCha8Rng) -> Genome {
    let mut genome = Genome::from_config(config, registry, rng);
    for _ in 0..50 {
        genome = genome.mutate(config, registry, rng);
    }
    genome
}

fn bench_genome_creation(c: &mut Criterion) {
    let config = structural_config();

    c.bench_function("genome_create_default", |b| {
        let mut registry = InnovationRegistry::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        b.iter(|| {
            black_box(Genome::from_config(&config, &mut registry, &mut rng));
        });
    });
}

fn bench_mutation(c: &mut Criterion) {
    let config = structural_config();
    let mut registry = InnovationRegistry::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let genome = evolved(&config, &mut registry, &mut rng);

    c.bench_function("genome_mutation", |b| {
        b.iter(|| {
            black_box(genome.mutate(&config, &mut registry, &mut rng));
        });
    });
}

fn bench_crossover(c: &mut Criterion) {
    let config = structural_config();
    let mut registry = InnovationRegistry::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);

    let base = Genome::from_config(&config, &mut registry, &mut rng);
    let mut parent1 = base.clone();
    let mut parent2 = base;
    for _ in 0..50 {
        parent1 = parent1.mutate(&config, &mut registry, &mut rng);
        parent2 = parent2.mutate(&config, &mut registry, &mut rng);
    }

    c.bench_function("genome_crossover", |b| {
        b.iter(|| {
            black_box(parent1.crossover(&parent2, &mut rng));
        });
    });

    c.bench_function("genome_similarity", |b| {
        b.iter(|| {
            black_box(parent1.similarity(&parent2));
        });
    });
}

fn bench_codec(c: &mut Criterion) {
    let config = structural_config();
    let mut registry = InnovationRegistry::new();
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    let genome = evolved(&config, &mut registry, &mut rng);

    c.bench_function("genome_to_json", |b| {
        b.iter(|| {
            black_box(to_json(&genome).ok());
        });
    });
}

criterion_group!(
    benches,
    bench_genome_creation,
    bench_mutation,
    bench_crossover,
    bench_codec,
);
criterion_main!(benches);
