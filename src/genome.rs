//! NEAT genome: a linear, serializable encoding of a variable-topology network.
//!
//! A [`Genome`] is a plain value made of two ordered gene lists. It holds no
//! reference to the [`InnovationTracker`] that issued its ids; the tracker is
//! passed explicitly to every operator that creates structure.

use std::collections::HashSet;

use rand::Rng;
use serde::Deserialize;

use crate::codec::GenomeRecord;
use crate::config::NeatConfig;
use crate::gene::{ConnectionGene, Innovation, NodeGene, NodeId, NodeKind};
use crate::innovation::InnovationTracker;

/// A NEAT genome representing a neural network topology.
///
/// Serializes through [`GenomeRecord`], the tuple-list data contract shared
/// with persistence collaborators. Serialization fails on a non-finite weight.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(try_from = "GenomeRecord")]
pub struct Genome {
    /// Node genes, in creation order.
    pub nodes: Vec<NodeGene>,
    /// Connection genes, in creation order.
    pub connections: Vec<ConnectionGene>,
}

impl Genome {
    /// Create the canonical starting genome: `input_count` input nodes, then
    /// `output_count` output nodes, and one connection for every
    /// (input, output) pair.
    ///
    /// Node ids come from `tracker`, so they form one contiguous block per call.
    /// Each connection's innovation is recorded (or reused) for its edge, its
    /// weight comes from `weight_policy` and its enabled flag is `start_enabled`.
    #[must_use]
    pub fn create_default<T, W>(
        input_count: usize,
        output_count: usize,
        tracker: &mut T,
        mut weight_policy: W,
        start_enabled: bool,
    ) -> Self
    where
        T: InnovationTracker + ?Sized,
        W: FnMut() -> f64,
    {
        let mut nodes = Vec::with_capacity(input_count + output_count);
        nodes.extend((0..input_count).map(|_| NodeGene::input(tracker.next_node_id())));
        nodes.extend((0..output_count).map(|_| NodeGene::output(tracker.next_node_id())));

        let (inputs, outputs) = nodes.split_at(input_count);
        let mut connections = Vec::with_capacity(input_count * output_count);
        for input in inputs {
            for output in outputs {
                let innovation = tracker.record_or_reuse_innovation(input.id, output.id);
                connections.push(ConnectionGene::new(
                    input.id,
                    output.id,
                    weight_policy(),
                    start_enabled,
                    innovation,
                ));
            }
        }

        Self { nodes, connections }
    }

    /// Create the starting genome described by `config`, drawing weights from
    /// `config.weight_init` with `rng`.
    #[must_use]
    pub fn from_config<T, R>(config: &NeatConfig, tracker: &mut T, rng: &mut R) -> Self
    where
        T: InnovationTracker + ?Sized,
        R: Rng,
    {
        Self::create_default(
            config.num_inputs,
            config.num_outputs,
            tracker,
            || config.weight_init.sample(&mut *rng),
            config.start_enabled,
        )
    }

    /// Iterate over the nodes with the given role.
    pub fn nodes_of_kind(&self, kind: NodeKind) -> impl Iterator<Item = &NodeGene> + '_ {
        self.nodes.iter().filter(move |n| n.kind == kind)
    }

    /// Ids of input nodes, in order.
    #[must_use]
    pub fn input_ids(&self) -> Vec<NodeId> {
        self.nodes_of_kind(NodeKind::Input).map(|n| n.id).collect()
    }

    /// Ids of output nodes, in order.
    #[must_use]
    pub fn output_ids(&self) -> Vec<NodeId> {
        self.nodes_of_kind(NodeKind::Output).map(|n| n.id).collect()
    }

    /// Ids of hidden nodes, in order.
    #[must_use]
    pub fn hidden_ids(&self) -> Vec<NodeId> {
        self.nodes_of_kind(NodeKind::Hidden).map(|n| n.id).collect()
    }

    /// Get the number of enabled connections.
    #[must_use]
    pub fn num_enabled_connections(&self) -> usize {
        self.connections.iter().filter(|c| c.enabled).count()
    }

    /// Find a node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<&NodeGene> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Find a connection by its innovation number.
    #[must_use]
    pub fn find_connection_by_innovation(&self, innovation: Innovation) -> Option<&ConnectionGene> {
        self.connections.iter().find(|c| c.innovation == innovation)
    }

    /// Whether this genome carries a connection for `(source, target)`.
    #[must_use]
    pub fn contains_edge(&self, source: NodeId, target: NodeId) -> bool {
        self.connections.iter().any(|c| c.edge() == (source, target))
    }

    /// Set of node ids.
    #[must_use]
    pub fn node_ids(&self) -> HashSet<NodeId> {
        self.nodes.iter().map(|n| n.id).collect()
    }

    /// Set of connection innovation ids.
    #[must_use]
    pub fn innovations(&self) -> HashSet<Innovation> {
        self.connections.iter().map(|c| c.innovation).collect()
    }

    /// Connections referencing a node that is not in this genome.
    #[must_use]
    pub fn dangling_connections(&self) -> Vec<&ConnectionGene> {
        let ids = self.node_ids();
        self.connections
            .iter()
            .filter(|c| !ids.contains(&c.source) || !ids.contains(&c.target))
            .collect()
    }
}
