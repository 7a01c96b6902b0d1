//! Fault model configuration.
//!
//! The taxonomy follows the hybrid fault models of the fault-tolerant
//! distributed systems literature: a node is non-faulty, manifest
//! faulty (detectably wrong), symmetric faulty (wrong the same way to
//! everyone), or Byzantine (arbitrarily wrong).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a node may misbehave.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FaultClass {
    NonFaulty,
    ManifestFaulty,
    SymmetricFaulty,
    ByzantineFaulty,
}

impl FaultClass {
    pub const ALL: [FaultClass; 4] = [
        FaultClass::NonFaulty,
        FaultClass::ManifestFaulty,
        FaultClass::SymmetricFaulty,
        FaultClass::ByzantineFaulty,
    ];

    /// Stable integer encoding used by the emitted fault-class inputs.
    pub fn encoding(&self) -> i64 {
        match self {
            FaultClass::NonFaulty => 0,
            FaultClass::ManifestFaulty => 1,
            FaultClass::SymmetricFaulty => 2,
            FaultClass::ByzantineFaulty => 3,
        }
    }
}

/// The fault instrumentation policy for a translated system.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum FaultConfig {
    /// No fault instrumentation beyond the baseline inputs; the
    /// assumption formula is `true`.
    #[default]
    NoFaults,

    /// Every node gets a nondeterministic fault class; the weighted
    /// count of faulty nodes is bounded by the configured threshold.
    HybridFaults {
        /// Weight per fault class; classes absent from the map weigh 0.
        weights: BTreeMap<FaultClass, u32>,
        /// Upper bound on the weighted count, passed through to the
        /// assumption formula.
        bound: i64,
    },

    /// A fixed class per node, keyed by the node's dotted path. Nodes
    /// not in the map are non-faulty.
    FixedFaults {
        map: BTreeMap<String, FaultClass>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encoding_is_dense_and_stable() {
        let codes: Vec<i64> = FaultClass::ALL.iter().map(|c| c.encoding()).collect();
        assert_eq!(codes, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_default_is_no_faults() {
        assert_eq!(FaultConfig::default(), FaultConfig::NoFaults);
    }

    #[test]
    fn test_config_round_trips_through_json() {
        let config = FaultConfig::HybridFaults {
            weights: [(FaultClass::ByzantineFaulty, 3), (FaultClass::ManifestFaulty, 1)]
                .into_iter()
                .collect(),
            bound: 2,
        };
        let json = serde_json::to_string(&config).expect("serialize");
        let back: FaultConfig = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(config, back);
    }

    #[test]
    fn test_fixed_faults_from_json() {
        let json = r#"{
            "policy": "fixed_faults",
            "map": { "sys.alice": "NonFaulty", "sys.bob": "ByzantineFaulty" }
        }"#;
        let config: FaultConfig = serde_json::from_str(json).expect("deserialize");
        match config {
            FaultConfig::FixedFaults { map } => {
                assert_eq!(map.get("sys.bob"), Some(&FaultClass::ByzantineFaulty));
            }
            other => panic!("expected fixed faults, got {:?}", other),
        }
    }
}
