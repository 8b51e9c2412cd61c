//! Structural and parametric mutation of genomes.
//!
//! [`Genome::mutate`] picks one of four strategies by weighted random choice
//! and applies it to a copy of the genome. The input genome is never touched.
//!
//! Strategies that cannot apply (an already-recorded edge, a disabled or
//! missing connection) are silent no-ops: the copy comes back unchanged and no
//! gene or id is created.

use log::{debug, trace, warn};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::NeatConfig;
use crate::gene::{ConnectionGene, Innovation, NodeGene, NodeId};
use crate::genome::Genome;
use crate::innovation::InnovationTracker;

/// The four mutation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MutationKind {
    /// Connect two randomly chosen nodes.
    AddConnection,
    /// Split a random enabled connection with a new hidden node.
    AddNode,
    /// Nudge the weight of a random enabled connection.
    PerturbWeight,
    /// Flip the enabled flag of a random connection.
    ToggleEnabled,
}

impl MutationKind {
    /// All strategies, in the order of [`NeatConfig::strategy_rates`].
    pub const ALL: [Self; 4] = [
        Self::AddConnection,
        Self::AddNode,
        Self::PerturbWeight,
        Self::ToggleEnabled,
    ];

    /// Pick a strategy with probability proportional to its configured rate.
    ///
    /// Returns `None` when the rates cannot form a distribution (all zero,
    /// negative or non-finite).
    pub fn choose<R: Rng>(config: &NeatConfig, rng: &mut R) -> Option<Self> {
        let dist = WeightedIndex::new(config.strategy_rates()).ok()?;
        Some(Self::ALL[dist.sample(rng)])
    }
}

impl Genome {
    /// Return a mutated copy of this genome.
    ///
    /// One strategy is chosen with [`MutationKind::choose`]. New node ids and
    /// innovations are drawn from `tracker`, so the same edge discovered in
    /// different genomes shares one innovation.
    #[must_use]
    pub fn mutate<T, R>(&self, config: &NeatConfig, tracker: &mut T, rng: &mut R) -> Self
    where
        T: InnovationTracker + ?Sized,
        R: Rng,
    {
        match MutationKind::choose(config, rng) {
            Some(kind) => self.apply_mutation(kind, config, tracker, rng),
            None => {
                warn!(
                    "strategy rates {:?} are unusable, genome left unchanged",
                    config.strategy_rates()
                );
                self.clone()
            }
        }
    }

    /// Return a copy of this genome with the given strategy applied.
    #[must_use]
    pub fn apply_mutation<T, R>(
        &self,
        kind: MutationKind,
        config: &NeatConfig,
        tracker: &mut T,
        rng: &mut R,
    ) -> Self
    where
        T: InnovationTracker + ?Sized,
        R: Rng,
    {
        let mut child = self.clone();
        let changed = match kind {
            MutationKind::AddConnection => child.mutate_add_connection(config, tracker, rng),
            MutationKind::AddNode => child.mutate_add_node(tracker, rng),
            MutationKind::PerturbWeight => child.mutate_perturb_weight(config, rng),
            MutationKind::ToggleEnabled => child.mutate_toggle_enabled(rng),
        };
        if !changed {
            trace!("{:?} skipped", kind);
        }
        child
    }

    /// Add a new enabled connection from `source` to `target`.
    ///
    /// The innovation is the one recorded for this edge in `tracker`, or a
    /// fresh one if the edge is new to the run.
    ///
    /// Returns `None` if this genome already carries the edge.
    pub fn connect<T>(
        &mut self,
        source: NodeId,
        target: NodeId,
        weight: f64,
        tracker: &mut T,
    ) -> Option<Innovation>
    where
        T: InnovationTracker + ?Sized,
    {
        if self.contains_edge(source, target) {
            return None;
        }
        let innovation = tracker.record_or_reuse_innovation(source, target);
        self.connections
            .push(ConnectionGene::new(source, target, weight, true, innovation));
        debug!("connected {} -> {} as innovation {}", source, target, innovation);
        Some(innovation)
    }

    /// Add a new node by splitting the connection with the given innovation.
    ///
    /// The original connection is disabled, and two new connections are created:
    /// source -> new_node (weight 1.0) and new_node -> target (original weight).
    ///
    /// Returns `None` if the connection doesn't exist or is disabled.
    pub fn split_connection<T>(&mut self, innovation: Innovation, tracker: &mut T) -> Option<NodeId>
    where
        T: InnovationTracker + ?Sized,
    {
        let index = self
            .connections
            .iter()
            .position(|c| c.innovation == innovation)?;
        self.split_at(index, tracker)
    }

    fn split_at<T>(&mut self, index: usize, tracker: &mut T) -> Option<NodeId>
    where
        T: InnovationTracker + ?Sized,
    {
        let original = *self.connections.get(index)?;
        if !original.enabled {
            return None;
        }
        self.connections[index] = original.with_enabled(false);

        let new_node = tracker.next_node_id();
        self.nodes.push(NodeGene::hidden(new_node));

        let first = tracker.record_or_reuse_innovation(original.source, new_node);
        self.connections
            .push(ConnectionGene::new(original.source, new_node, 1.0, true, first));

        let second = tracker.record_or_reuse_innovation(new_node, original.target);
        self.connections.push(ConnectionGene::new(
            new_node,
            original.target,
            original.weight,
            true,
            second,
        ));

        debug!(
            "split innovation {} with node {} ({} / {})",
            original.innovation, new_node, first, second
        );
        Some(new_node)
    }

    /// Pick two nodes with replacement; skip if the run has already seen the edge.
    fn mutate_add_connection<T, R>(
        &mut self,
        config: &NeatConfig,
        tracker: &mut T,
        rng: &mut R,
    ) -> bool
    where
        T: InnovationTracker + ?Sized,
        R: Rng,
    {
        if self.nodes.is_empty() {
            return false;
        }
        let source = self.nodes[rng.random_range(0..self.nodes.len())].id;
        let target = self.nodes[rng.random_range(0..self.nodes.len())].id;

        if tracker.innovation_for(source, target).is_some() {
            return false;
        }

        let Some(weight) = symmetric_sample(config.new_connection_weight_range, rng) else {
            warn!(
                "new connection weight range {} is unusable, connection not added",
                config.new_connection_weight_range
            );
            return false;
        };
        self.connect(source, target, weight, tracker).is_some()
    }

    fn mutate_add_node<T, R>(&mut self, tracker: &mut T, rng: &mut R) -> bool
    where
        T: InnovationTracker + ?Sized,
        R: Rng,
    {
        if self.connections.is_empty() {
            return false;
        }
        let index = rng.random_range(0..self.connections.len());
        self.split_at(index, tracker).is_some()
    }

    /// Unbounded: no clamping after the perturbation.
    fn mutate_perturb_weight<R: Rng>(&mut self, config: &NeatConfig, rng: &mut R) -> bool {
        if self.connections.is_empty() {
            return false;
        }
        let index = rng.random_range(0..self.connections.len());
        let conn = &mut self.connections[index];
        if !conn.enabled {
            return false;
        }
        let Some(offset) = symmetric_sample(config.weight_perturbation_power, rng) else {
            warn!(
                "perturbation power {} is unusable, weight left unchanged",
                config.weight_perturbation_power
            );
            return false;
        };
        conn.weight += offset;
        true
    }

    /// Disabled connections are eligible.
    fn mutate_toggle_enabled<R: Rng>(&mut self, rng: &mut R) -> bool {
        if self.connections.is_empty() {
            return false;
        }
        let index = rng.random_range(0..self.connections.len());
        let conn = &mut self.connections[index];
        conn.enabled = !conn.enabled;
        true
    }
}

/// Uniform sample from `[-bound, bound]`, or `None` if `bound` is negative or
/// not finite.
fn symmetric_sample<R: Rng>(bound: f64, rng: &mut R) -> Option<f64> {
    if !bound.is_finite() || bound < 0.0 {
        return None;
    }
    Some(rng.random_range(-bound..=bound))
}
