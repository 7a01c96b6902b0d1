//! Translator configuration.

use relay_model::FaultConfig;
use serde::{Deserialize, Serialize};

/// Knobs of one translation run.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TranslateConfig {
    /// Emit explanatory comments when rendering. Never changes the
    /// semantic output.
    pub debug: bool,
    /// Fault instrumentation policy.
    pub fault_model: FaultConfig,
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_model::FaultClass;

    #[test]
    fn test_default_config() {
        let config = TranslateConfig::default();
        assert!(!config.debug);
        assert_eq!(config.fault_model, FaultConfig::NoFaults);
    }

    #[test]
    fn test_config_from_json() {
        let json = r#"{
            "debug": true,
            "fault_model": {
                "policy": "fixed_faults",
                "map": { "sys.alice": "ByzantineFaulty" }
            }
        }"#;
        let config: TranslateConfig = serde_json::from_str(json).expect("deserialize");
        assert!(config.debug);
        match config.fault_model {
            FaultConfig::FixedFaults { map } => {
                assert_eq!(map.get("sys.alice"), Some(&FaultClass::ByzantineFaulty));
            }
            other => panic!("expected fixed faults, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_fields_fall_back_to_default() {
        let config: TranslateConfig = serde_json::from_str("{}").expect("deserialize");
        assert_eq!(config, TranslateConfig::default());
    }
}
