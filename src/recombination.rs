//! Crossover and compatibility scoring.
//!
//! Both operators align genes by identity rather than position: connection
//! genes by innovation id, node genes by node id. Because innovation ids are
//! issued by one registry per run, genomes with different topologies can still
//! be lined up gene by gene.

use std::collections::{HashMap, HashSet};

use log::warn;
use rand::Rng;

use crate::gene::NodeId;
use crate::genome::Genome;

/// Credit given to a gene with no counterpart in the other genome.
pub const DEFAULT_DISJOINT_CREDIT: f64 = 0.5;

impl Genome {
    /// Combine two genomes into a new offspring.
    ///
    /// Genes present in both parents are inherited whole (weight and enabled
    /// flag together) from a uniformly chosen parent. Genes present in only one
    /// parent always pass through. Node genes follow the same rule by node id.
    ///
    /// The offspring lists `self`'s genes in `self`'s order followed by genes
    /// unique to `other` in `other`'s order, so `g.crossover(&g, rng) == g`.
    ///
    /// Connections whose endpoints exist in neither parent cannot be repaired
    /// and are dropped, so the offspring has no dangling references.
    #[must_use]
    pub fn crossover<R: Rng>(&self, other: &Self, rng: &mut R) -> Self {
        let nodes = align_genes(&self.nodes, &other.nodes, |n| n.id, rng);
        let mut connections =
            align_genes(&self.connections, &other.connections, |c| c.innovation, rng);

        let node_ids: HashSet<NodeId> = nodes.iter().map(|n| n.id).collect();
        connections.retain(|c| {
            let closed = node_ids.contains(&c.source) && node_ids.contains(&c.target);
            if !closed {
                warn!(
                    "dropping innovation {} ({} -> {}): endpoint missing from both parents",
                    c.innovation, c.source, c.target
                );
            }
            closed
        });

        Self { nodes, connections }
    }

    /// Compatibility score in `[0, 100]` using [`DEFAULT_DISJOINT_CREDIT`].
    ///
    /// See [`Genome::similarity_with_credit`].
    #[must_use]
    pub fn similarity(&self, other: &Self) -> f64 {
        self.similarity_with_credit(other, DEFAULT_DISJOINT_CREDIT)
    }

    /// Compatibility score in `[0, 100]`, the mean of three terms:
    ///
    /// - size: smaller/larger count ratio, averaged over nodes and connections
    /// - nodes: for each node of `self`, 1 if `other` has that id, else `disjoint_credit`
    /// - connections: for each connection of `self`, 1 if `other` has that
    ///   innovation, else `disjoint_credit`
    ///
    /// Only `self`'s genes are enumerated, so the score is not symmetric. It is
    /// meant for comparing a species representative (`self`) against a
    /// candidate. Use [`Genome::symmetric_similarity`] when order must not matter.
    #[must_use]
    pub fn similarity_with_credit(&self, other: &Self, disjoint_credit: f64) -> f64 {
        let size = (count_ratio(self.nodes.len(), other.nodes.len())
            + count_ratio(self.connections.len(), other.connections.len()))
            / 2.0;

        let other_nodes = other.node_ids();
        let node_term = credit_term(
            self.nodes.iter().map(|n| other_nodes.contains(&n.id)),
            other_nodes.is_empty(),
            disjoint_credit,
        );

        let other_innovations = other.innovations();
        let connection_term = credit_term(
            self.connections
                .iter()
                .map(|c| other_innovations.contains(&c.innovation)),
            other_innovations.is_empty(),
            disjoint_credit,
        );

        (size + node_term + connection_term) / 3.0
    }

    /// Mean of the similarity in both directions.
    #[must_use]
    pub fn symmetric_similarity(&self, other: &Self) -> f64 {
        (self.similarity(other) + other.similarity(self)) / 2.0
    }
}

/// Union of two gene lists keyed by `key`, picking a random parent for shared keys.
fn align_genes<G, K, F, R>(ours: &[G], theirs: &[G], key: F, rng: &mut R) -> Vec<G>
where
    G: Copy,
    K: Eq + std::hash::Hash,
    F: Fn(&G) -> K,
    R: Rng,
{
    let their_genes: HashMap<K, &G> = theirs.iter().map(|g| (key(g), g)).collect();
    let our_keys: HashSet<K> = ours.iter().map(&key).collect();

    let mut child = Vec::with_capacity(ours.len().max(theirs.len()));
    for gene in ours {
        let inherited = match their_genes.get(&key(gene)) {
            Some(&other) if !rng.random::<bool>() => *other,
            _ => *gene,
        };
        child.push(inherited);
    }
    child.extend(theirs.iter().filter(|g| !our_keys.contains(&key(*g))).copied());
    child
}

fn count_ratio(a: usize, b: usize) -> f64 {
    let larger = a.max(b);
    if larger == 0 {
        return 100.0;
    }
    a.min(b) as f64 / larger as f64 * 100.0
}

/// Percentage credit over one genome's genes, given which of them are matched.
fn credit_term<I>(matches: I, other_empty: bool, disjoint_credit: f64) -> f64
where
    I: Iterator<Item = bool>,
{
    let (total, matched) = matches.fold((0usize, 0usize), |(total, matched), hit| {
        (total + 1, matched + usize::from(hit))
    });
    if total == 0 {
        // Nothing to enumerate: two empty lists agree, otherwise nothing is shared.
        return if other_empty { 100.0 } else { 0.0 };
    }
    let credit = matched as f64 + disjoint_credit * (total - matched) as f64;
    credit / total as f64 * 100.0
}
