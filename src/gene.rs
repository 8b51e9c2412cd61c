//! Gene types for NEAT genomes.
//!
//! This module defines the fundamental building blocks of a genome:
//! - [`NodeGene`]: a neuron identified by a registry-issued node id
//! - [`ConnectionGene`]: a weighted edge carrying its historical marking

use serde::{Deserialize, Serialize};

/// Identifier issued by the innovation registry for a node.
pub type NodeId = u64;

/// Historical marking issued by the innovation registry for a connection.
pub type Innovation = u64;

/// The role of a node in the network.
///
/// The role is fixed at creation; mutation never changes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Input node - receives external values.
    Input,
    /// Hidden node - added by splitting a connection.
    Hidden,
    /// Output node - produces final network output.
    Output,
}

impl NodeKind {
    /// Numeric code used by the plain data contract.
    #[inline]
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Input => 0,
            Self::Hidden => 1,
            Self::Output => 2,
        }
    }

    /// Inverse of [`NodeKind::code`]. Returns `None` for unknown codes.
    #[inline]
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Input),
            1 => Some(Self::Hidden),
            2 => Some(Self::Output),
            _ => None,
        }
    }
}

/// A node gene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeGene {
    /// Globally unique id within the registry that issued it.
    pub id: NodeId,
    /// The role of this node in the network.
    pub kind: NodeKind,
}

impl NodeGene {
    /// Create a new input node.
    #[must_use]
    pub const fn input(id: NodeId) -> Self {
        Self {
            id,
            kind: NodeKind::Input,
        }
    }

    /// Create a new hidden node.
    #[must_use]
    pub const fn hidden(id: NodeId) -> Self {
        Self {
            id,
            kind: NodeKind::Hidden,
        }
    }

    /// Create a new output node.
    #[must_use]
    pub const fn output(id: NodeId) -> Self {
        Self {
            id,
            kind: NodeKind::Output,
        }
    }
}

/// A connection gene representing a weighted link between two nodes.
///
/// Two connection genes created under the same registry for the same
/// `(source, target)` pair always carry the same `innovation`, which is what
/// lets crossover align genes of genomes with different topologies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGene {
    /// The source node of this connection.
    pub source: NodeId,
    /// The target node of this connection.
    pub target: NodeId,
    /// The connection weight.
    pub weight: f64,
    /// Whether this connection is active.
    /// Disabled connections are preserved for crossover.
    pub enabled: bool,
    /// The historical marking of the `(source, target)` edge.
    pub innovation: Innovation,
}

impl ConnectionGene {
    /// Create a new connection.
    #[must_use]
    pub const fn new(
        source: NodeId,
        target: NodeId,
        weight: f64,
        enabled: bool,
        innovation: Innovation,
    ) -> Self {
        Self {
            source,
            target,
            weight,
            enabled,
            innovation,
        }
    }

    /// The `(source, target)` edge this gene encodes.
    #[inline]
    #[must_use]
    pub const fn edge(&self) -> (NodeId, NodeId) {
        (self.source, self.target)
    }

    /// Copy of this gene with the `enabled` flag replaced.
    #[inline]
    #[must_use]
    pub const fn with_enabled(self, enabled: bool) -> Self {
        Self { enabled, ..self }
    }
}
