//! Innovation tracking for NEAT.
//!
//! Historical markings are issued by an explicit [`InnovationRegistry`] that is
//! threaded through every factory and mutation call. The registry owns two
//! monotonic counters (node ids and innovation ids) and the history mapping a
//! directed edge `(source, target)` to the innovation id first assigned to it.
//!
//! A registry belongs to one evolutionary run. Independent runs use independent
//! registries, and tests can start from a fresh one for deterministic ids.
//!
//! For parallel mutation, [`SharedRegistry`] wraps a registry behind a lock so
//! every allocation is serialized: two threads discovering the same new edge
//! converge on one innovation id.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::gene::{Innovation, NodeId};
use crate::genome::Genome;

/// Source of node ids and historical markings.
///
/// Every operator that creates structure is generic over this trait, so the
/// same mutation code runs against a plain registry or a shared handle.
pub trait InnovationTracker {
    /// Return a fresh, strictly increasing node id.
    fn next_node_id(&mut self) -> NodeId;

    /// Return a fresh, strictly increasing innovation id that is not present
    /// anywhere in the history.
    fn next_innovation_id(&mut self) -> Innovation;

    /// Innovation id recorded for `(source, target)`, if any.
    fn innovation_for(&self, source: NodeId, target: NodeId) -> Option<Innovation>;

    /// Return the recorded innovation for `(source, target)`, allocating and
    /// recording a fresh one if the edge has never been seen.
    fn record_or_reuse_innovation(&mut self, source: NodeId, target: NodeId) -> Innovation;
}

/// Registry issuing node ids and innovation ids for one evolutionary run.
#[derive(Debug, Clone, Default)]
pub struct InnovationRegistry {
    next_node: NodeId,
    next_innovation: Innovation,
    history: HashMap<(NodeId, NodeId), Innovation>,
    issued: HashSet<Innovation>,
}

impl InnovationRegistry {
    /// Create an empty registry. The first node id and innovation id are 0.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a registry from previously produced genomes.
    ///
    /// Every connection's edge is recorded under its innovation id (the first
    /// occurrence wins), and both counters are advanced past the largest id
    /// seen, so new allocations never collide with loaded genes.
    #[must_use]
    pub fn from_genomes<'a, I>(genomes: I) -> Self
    where
        I: IntoIterator<Item = &'a Genome>,
    {
        let mut registry = Self::new();
        for genome in genomes {
            for node in &genome.nodes {
                registry.next_node = registry.next_node.max(node.id.saturating_add(1));
            }
            for conn in &genome.connections {
                registry.history.entry(conn.edge()).or_insert(conn.innovation);
                registry.issued.insert(conn.innovation);
                registry.next_innovation = registry
                    .next_innovation
                    .max(conn.innovation.saturating_add(1));
                // Endpoints may be missing from the node list of a damaged genome.
                registry.next_node = registry
                    .next_node
                    .max(conn.source.saturating_add(1))
                    .max(conn.target.saturating_add(1));
            }
        }
        registry
    }

    /// Number of distinct edges recorded in the history.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.len()
    }

    /// Whether no edge has been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    /// Whether `(source, target)` has a recorded innovation.
    #[must_use]
    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.history.contains_key(&(source, target))
    }

    /// The node id the next allocation will return.
    #[must_use]
    pub fn peek_node_id(&self) -> NodeId {
        self.next_node
    }

    /// Lower bound for the innovation id the next allocation will return.
    #[must_use]
    pub fn peek_innovation_id(&self) -> Innovation {
        self.next_innovation
    }

    /// Iterate over the recorded `((source, target), innovation)` history.
    pub fn history(&self) -> impl Iterator<Item = ((NodeId, NodeId), Innovation)> + '_ {
        self.history.iter().map(|(&edge, &innovation)| (edge, innovation))
    }

    /// Wrap this registry in a handle that can be shared across threads.
    #[must_use]
    pub fn into_shared(self) -> SharedRegistry {
        SharedRegistry {
            inner: Arc::new(Mutex::new(self)),
        }
    }
}

impl InnovationTracker for InnovationRegistry {
    fn next_node_id(&mut self) -> NodeId {
        let id = self.next_node;
        self.next_node += 1;
        id
    }

    fn next_innovation_id(&mut self) -> Innovation {
        let mut id = self.next_innovation;
        while self.issued.contains(&id) {
            id += 1;
        }
        self.next_innovation = id + 1;
        self.issued.insert(id);
        id
    }

    fn innovation_for(&self, source: NodeId, target: NodeId) -> Option<Innovation> {
        self.history.get(&(source, target)).copied()
    }

    fn record_or_reuse_innovation(&mut self, source: NodeId, target: NodeId) -> Innovation {
        if let Some(&existing) = self.history.get(&(source, target)) {
            return existing;
        }
        let id = self.next_innovation_id();
        self.history.insert((source, target), id);
        id
    }
}

/// Cloneable, thread-safe handle to one [`InnovationRegistry`].
///
/// Each tracker call takes the lock for its whole duration, so allocations from
/// different threads are totally ordered.
#[derive(Debug, Clone, Default)]
pub struct SharedRegistry {
    inner: Arc<Mutex<InnovationRegistry>>,
}

impl SharedRegistry {
    /// Create a handle to a fresh, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the registry state at this instant.
    #[must_use]
    pub fn snapshot(&self) -> InnovationRegistry {
        self.inner.lock().clone()
    }

    /// Run `f` with exclusive access to the registry.
    pub fn with<T>(&self, f: impl FnOnce(&mut InnovationRegistry) -> T) -> T {
        f(&mut self.inner.lock())
    }
}

impl InnovationTracker for SharedRegistry {
    fn next_node_id(&mut self) -> NodeId {
        self.inner.lock().next_node_id()
    }

    fn next_innovation_id(&mut self) -> Innovation {
        self.inner.lock().next_innovation_id()
    }

    fn innovation_for(&self, source: NodeId, target: NodeId) -> Option<Innovation> {
        self.inner.lock().innovation_for(source, target)
    }

    fn record_or_reuse_innovation(&mut self, source: NodeId, target: NodeId) -> Innovation {
        self.inner.lock().record_or_reuse_innovation(source, target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gene::{ConnectionGene, NodeGene};

    #[test]
    fn test_node_ids_strictly_increase() {
        let mut registry = InnovationRegistry::new();
        let ids: Vec<NodeId> = (0..5).map(|_| registry.next_node_id()).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_record_or_reuse_is_stable() {
        let mut registry = InnovationRegistry::new();
        let first = registry.record_or_reuse_innovation(1, 2);
        let second = registry.record_or_reuse_innovation(1, 2);
        assert_eq!(first, second, "Same edge should reuse its innovation");
        assert_eq!(registry.len(), 1);

        // Reuse does not consume the counter.
        assert_eq!(registry.peek_innovation_id(), first + 1);
    }

    #[test]
    fn test_edge_direction_matters() {
        let mut registry = InnovationRegistry::new();
        let forward = registry.record_or_reuse_innovation(1, 2);
        let backward = registry.record_or_reuse_innovation(2, 1);
        assert_ne!(forward, backward);
    }

    #[test]
    fn test_fresh_innovation_distinct_from_all_issued() {
        let mut registry = InnovationRegistry::new();
        let mut seen = HashSet::new();
        for i in 0..20 {
            assert!(seen.insert(registry.record_or_reuse_innovation(i, i + 1)));
            assert!(seen.insert(registry.next_innovation_id()));
        }
    }

    #[test]
    fn test_from_genomes_skips_loaded_ids() {
        let genome = Genome {
            nodes: vec![NodeGene::input(0), NodeGene::output(5)],
            connections: vec![ConnectionGene::new(0, 5, 0.25, true, 9)],
        };
        let mut registry = InnovationRegistry::from_genomes([&genome]);

        assert_eq!(registry.innovation_for(0, 5), Some(9));
        assert_eq!(registry.record_or_reuse_innovation(0, 5), 9);
        assert_eq!(registry.next_node_id(), 6);
        assert_eq!(registry.record_or_reuse_innovation(5, 0), 10);
    }

    #[test]
    fn test_next_innovation_skips_values_in_history() {
        let genome = Genome {
            nodes: vec![NodeGene::input(0), NodeGene::output(1)],
            connections: vec![
                ConnectionGene::new(0, 1, 0.0, true, 3),
                ConnectionGene::new(1, 0, 0.0, true, 1),
            ],
        };
        let mut registry = InnovationRegistry::from_genomes([&genome]);
        // Counter is past 3; nothing at or below it may be handed out again.
        let id = registry.next_innovation_id();
        assert!(id > 3);
    }

    #[test]
    fn test_shared_registry_converges_on_one_innovation() {
        let shared = InnovationRegistry::new().into_shared();

        let ids: Vec<Innovation> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let mut handle = shared.clone();
                    scope.spawn(move || handle.record_or_reuse_innovation(3, 4))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().expect("worker panicked"))
                .collect()
        });

        assert!(ids.windows(2).all(|w| w[0] == w[1]));
        assert_eq!(shared.snapshot().len(), 1);
    }

    #[test]
    fn test_shared_registry_node_ids_unique_across_threads() {
        let shared = SharedRegistry::new();

        let mut ids: Vec<NodeId> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let mut handle = shared.clone();
                    scope.spawn(move || (0..50).map(|_| handle.next_node_id()).collect::<Vec<_>>())
                })
                .collect();
            handles
                .into_iter()
                .flat_map(|h| h.join().expect("worker panicked"))
                .collect()
        });

        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 200);
    }
}
