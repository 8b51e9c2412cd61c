//! Plain data contract for persisting genomes.
//!
//! A genome externalizes as two ordered lists:
//!
//! - nodes as `(id, role_code)` with `role_code` 0 = input, 1 = hidden, 2 = output
//! - connections as `(source, target, weight, enabled, innovation)` with
//!   `enabled` encoded as 0 or 1
//!
//! In JSON this reads `[[[0,0],[1,2]],[[0,1,0.5,1,0]]]`. Weights round-trip
//! bit-for-bit; non-finite weights have no JSON form and are rejected.

use serde::ser::Error as _;
use serde::{Deserialize, Serialize, Serializer};

use crate::gene::{ConnectionGene, Innovation, NodeGene, NodeId, NodeKind};
use crate::genome::Genome;

/// Node tuple: `(id, role_code)`.
pub type NodeRecord = (NodeId, u8);

/// Connection tuple: `(source, target, weight, enabled, innovation)`.
pub type ConnectionRecord = (NodeId, NodeId, f64, u8, Innovation);

/// The externalized form of a [`Genome`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GenomeRecord(pub Vec<NodeRecord>, pub Vec<ConnectionRecord>);

/// Errors raised while decoding or encoding the data contract.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("Malformed genome JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Node {node} has unknown role code {code}")]
    UnknownRoleCode { node: NodeId, code: u8 },
    #[error("Connection {innovation} has enabled flag {flag}, expected 0 or 1")]
    InvalidEnabledFlag { innovation: Innovation, flag: u8 },
    #[error("Connection {innovation} has non-finite weight {weight}")]
    NonFiniteWeight { innovation: Innovation, weight: f64 },
}

impl From<&Genome> for GenomeRecord {
    fn from(genome: &Genome) -> Self {
        let nodes = genome.nodes.iter().map(|n| (n.id, n.kind.code())).collect();
        let connections = genome
            .connections
            .iter()
            .map(|c| {
                (
                    c.source,
                    c.target,
                    c.weight,
                    u8::from(c.enabled),
                    c.innovation,
                )
            })
            .collect();
        Self(nodes, connections)
    }
}

impl TryFrom<GenomeRecord> for Genome {
    type Error = CodecError;

    fn try_from(record: GenomeRecord) -> Result<Self, Self::Error> {
        let GenomeRecord(node_records, connection_records) = record;

        let nodes = node_records
            .into_iter()
            .map(|(id, code)| {
                NodeKind::from_code(code)
                    .map(|kind| NodeGene { id, kind })
                    .ok_or(CodecError::UnknownRoleCode { node: id, code })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let connections = connection_records
            .into_iter()
            .map(|(source, target, weight, flag, innovation)| {
                if !weight.is_finite() {
                    return Err(CodecError::NonFiniteWeight { innovation, weight });
                }
                let enabled = match flag {
                    0 => false,
                    1 => true,
                    _ => return Err(CodecError::InvalidEnabledFlag { innovation, flag }),
                };
                Ok(ConnectionGene::new(source, target, weight, enabled, innovation))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { nodes, connections })
    }
}

impl Serialize for Genome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if let Some(err) = non_finite_weight(self) {
            return Err(S::Error::custom(err));
        }
        GenomeRecord::from(self).serialize(serializer)
    }
}

fn non_finite_weight(genome: &Genome) -> Option<CodecError> {
    genome
        .connections
        .iter()
        .find(|c| !c.weight.is_finite())
        .map(|c| CodecError::NonFiniteWeight {
            innovation: c.innovation,
            weight: c.weight,
        })
}

/// Encode a genome as JSON text.
///
/// # Errors
///
/// Returns [`CodecError::NonFiniteWeight`] if any weight is NaN or infinite.
pub fn to_json(genome: &Genome) -> Result<String, CodecError> {
    if let Some(err) = non_finite_weight(genome) {
        return Err(err);
    }
    Ok(serde_json::to_string(genome)?)
}

/// Decode a genome from JSON text.
///
/// # Errors
///
/// Returns [`CodecError::Json`] for malformed input, or the role/flag error
/// for the first tuple that does not fit the contract.
pub fn from_json(json: &str) -> Result<Genome, CodecError> {
    let record: GenomeRecord = serde_json::from_str(json)?;
    Genome::try_from(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::innovation::InnovationRegistry;

    fn sample_genome() -> Genome {
        Genome {
            nodes: vec![NodeGene::input(0), NodeGene::hidden(4), NodeGene::output(1)],
            connections: vec![
                ConnectionGene::new(0, 1, 0.1 + 0.2, false, 0),
                ConnectionGene::new(0, 4, 1.0, true, 5),
                ConnectionGene::new(4, 1, -1.234_567_890_123_456_7e-7, true, 6),
                ConnectionGene::new(1, 1, -0.0, true, 9),
            ],
        }
    }

    #[test]
    fn test_json_layout() {
        let genome = Genome {
            nodes: vec![NodeGene::input(0), NodeGene::output(1)],
            connections: vec![ConnectionGene::new(0, 1, 0.5, true, 0)],
        };
        let json = to_json(&genome).expect("Encoding failed");
        assert_eq!(json, "[[[0,0],[1,2]],[[0,1,0.5,1,0]]]");
    }

    #[test]
    fn test_roundtrip_is_exact() {
        let genome = sample_genome();
        let restored = from_json(&to_json(&genome).expect("Encoding failed"))
            .expect("Decoding failed");

        assert_eq!(genome.nodes, restored.nodes);
        assert_eq!(genome.connections.len(), restored.connections.len());
        for (a, b) in genome.connections.iter().zip(&restored.connections) {
            assert_eq!(a.weight.to_bits(), b.weight.to_bits());
            assert_eq!(a.edge(), b.edge());
            assert_eq!(a.enabled, b.enabled);
            assert_eq!(a.innovation, b.innovation);
        }
    }

    #[test]
    fn test_serde_impl_uses_record() {
        let mut registry = InnovationRegistry::new();
        let genome = Genome::create_default(2, 1, &mut registry, || 0.25, true);

        let via_serde = serde_json::to_string(&genome).expect("Serialization failed");
        assert_eq!(via_serde, to_json(&genome).expect("Encoding failed"));

        let restored: Genome = serde_json::from_str(&via_serde).expect("Deserialization failed");
        assert_eq!(genome, restored);
    }

    #[test]
    fn test_rejects_unknown_role_code() {
        let err = from_json("[[[0,3]],[]]").unwrap_err();
        assert!(matches!(
            err,
            CodecError::UnknownRoleCode { node: 0, code: 3 }
        ));
    }

    #[test]
    fn test_rejects_bad_enabled_flag() {
        let err = from_json("[[[0,0],[1,2]],[[0,1,0.5,2,7]]]").unwrap_err();
        assert!(matches!(
            err,
            CodecError::InvalidEnabledFlag {
                innovation: 7,
                flag: 2
            }
        ));
    }

    #[test]
    fn test_rejects_malformed_json() {
        assert!(matches!(from_json("{"), Err(CodecError::Json(_))));
    }

    #[test]
    fn test_rejects_non_finite_weight() {
        let genome = Genome {
            nodes: vec![NodeGene::input(0), NodeGene::output(1)],
            connections: vec![ConnectionGene::new(0, 1, f64::NAN, true, 3)],
        };
        assert!(matches!(
            to_json(&genome),
            Err(CodecError::NonFiniteWeight { innovation: 3, .. })
        ));
    }

    #[test]
    fn test_serde_impl_rejects_non_finite_weight() {
        for weight in [f64::INFINITY, f64::NEG_INFINITY, f64::NAN] {
            let genome = Genome {
                nodes: vec![NodeGene::input(0), NodeGene::output(1)],
                connections: vec![ConnectionGene::new(0, 1, weight, true, 0)],
            };
            let err = serde_json::to_string(&genome).unwrap_err();
            assert!(err.to_string().contains("non-finite weight"));
        }
    }

    #[test]
    fn test_record_with_non_finite_weight_is_rejected() {
        let record = GenomeRecord(vec![(0, 0), (1, 2)], vec![(0, 1, f64::INFINITY, 1, 4)]);
        assert!(matches!(
            Genome::try_from(record),
            Err(CodecError::NonFiniteWeight { innovation: 4, .. })
        ));
    }

    #[test]
    fn test_empty_genome_roundtrip() {
        let genome = Genome::default();
        let json = to_json(&genome).expect("Encoding failed");
        assert_eq!(json, "[[],[]]");
        assert_eq!(from_json(&json).expect("Decoding failed"), genome);
    }
}
