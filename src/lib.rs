//! # NEAT Genotype
//!
//! Genetic encoding and evolutionary operators for NeuroEvolution of
//! Augmenting Topologies (NEAT).
//!
//! ## Features
//!
//! - **Linear Genomes**: a [`Genome`] is two ordered gene lists that serialize
//!   to a plain tuple contract (see [`codec`])
//! - **Historical Markings**: an explicit [`InnovationRegistry`] issues node ids
//!   and innovation ids, so identical edges share one innovation across a run
//! - **Pure Operators**: mutation and crossover return new genomes and never
//!   modify their inputs; every random choice uses an injected RNG
//! - **Parallel Mutation**: [`SharedRegistry`] serializes id allocation across
//!   threads
//!
//! ## Quick Start
//!
//! ```rust
//! use neat_genotype::{Genome, InnovationRegistry, NeatConfig};
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let config = NeatConfig {
//!     start_enabled: true,
//!     ..NeatConfig::minimal(2, 1)
//! };
//! let mut registry = InnovationRegistry::new();
//! let mut rng = ChaCha8Rng::seed_from_u64(42);
//!
//! let parent = Genome::from_config(&config, &mut registry, &mut rng);
//! let child = parent.mutate(&config, &mut registry, &mut rng);
//! let offspring = parent.crossover(&child, &mut rng);
//!
//! assert!(parent.similarity(&offspring) > 0.0);
//! ```
//!
//! ## Architecture
//!
//! ### Innovation Registry
//!
//! The registry is owned by the run, not by any genome:
//!
//! - **Nodes**: `next_node_id()` hands out strictly increasing ids
//! - **Connections**: `record_or_reuse_innovation(source, target)` returns the
//!   innovation first assigned to that directed edge, or records a fresh one
//!
//! ### Mutation
//!
//! One of four strategies is picked by weighted choice: add connection, add
//! node, perturb weight, toggle enabled. Strategies that cannot apply leave the
//! copy unchanged.
//!
//! ### Recombination
//!
//! Crossover aligns connection genes by innovation and node genes by id.
//! [`Genome::similarity`] scores compatibility from the first genome's point of
//! view and is not symmetric.

pub mod activation;
pub mod codec;
pub mod config;
pub mod gene;
pub mod genome;
pub mod innovation;
pub mod mutation;
pub mod recombination;
pub mod session;

// Re-exports for convenience
pub use activation::{Activation, ActivationError, ActivationFn, ActivationRegistry};
pub use codec::{from_json, to_json, CodecError, GenomeRecord};
pub use config::{ConfigError, NeatConfig, WeightInit};
pub use gene::{ConnectionGene, Innovation, NodeGene, NodeId, NodeKind};
pub use genome::Genome;
pub use innovation::{InnovationRegistry, InnovationTracker, SharedRegistry};
pub use mutation::MutationKind;
pub use recombination::DEFAULT_DISJOINT_CREDIT;
pub use session::{Session, SessionError};

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_operator_cycle() {
        let config = NeatConfig {
            start_enabled: true,
            add_connection_rate: 0.2,
            add_node_rate: 0.2,
            ..NeatConfig::minimal(2, 1)
        };
        let mut registry = InnovationRegistry::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);

        let genome = Genome::from_config(&config, &mut registry, &mut rng);

        // Test mutation
        let mut other = genome.clone();
        for _ in 0..10 {
            other = other.mutate(&config, &mut registry, &mut rng);
        }

        // Test crossover
        let child = genome.crossover(&other, &mut rng);
        assert_eq!(child.input_ids().len(), 2);
        assert_eq!(child.output_ids().len(), 1);
        assert!(child.dangling_connections().is_empty());
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut registry = InnovationRegistry::new();
        let mut genome = Genome::create_default(3, 2, &mut registry, || 0.1, true);

        // Add some structure
        let innovation = genome.connections[0].innovation;
        genome.split_connection(innovation, &mut registry);

        let json = to_json(&genome).expect("Serialization failed");
        let restored = from_json(&json).expect("Deserialization failed");

        assert_eq!(genome, restored);
    }

    #[test]
    fn test_activation_lookup_by_name() {
        let table = ActivationRegistry::with_builtins();
        for activation in Activation::ALL {
            let resolved = table.lookup(activation.name()).expect("builtin present");
            assert_eq!(resolved.apply(0.3), activation.apply(0.3));
        }
    }

    #[test]
    fn test_innovation_reuse() {
        // Same edge should produce same innovation
        let mut registry = InnovationRegistry::new();
        let inn1 = registry.record_or_reuse_innovation(1, 2);
        let inn2 = registry.record_or_reuse_innovation(1, 2);
        assert_eq!(inn1, inn2);
    }
}
