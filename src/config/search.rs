use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::error::RebalanceError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchConfig {
    pub population_size: usize,
    /// Stop once this many consecutive generations share the same best fitness.
    pub stop_after_generations_without_improvement: usize,
    /// Fixed seed for reproducible runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            population_size: 500,
            stop_after_generations_without_improvement: 30,
            seed: None,
        }
    }
}

impl ConfigSection for SearchConfig {
    fn section_name() -> &'static str {
        "search"
    }

    fn validate(&self) -> Result<(), RebalanceError> {
        if self.population_size < 1 {
            return Err(RebalanceError::Configuration(
                "Population size must be at least 1".to_string(),
            ));
        }
        if self.stop_after_generations_without_improvement < 1 {
            return Err(RebalanceError::Configuration(
                "Stop-after generation count must be at least 1".to_string(),
            ));
        }
        if self.population_size < 10 {
            log::warn!(
                "Population size {} is below 10, no elites will be carried between generations",
                self.population_size
            );
        }
        Ok(())
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Search".to_string(),
            fields: vec![
                FieldManifest {
                    name: "population_size".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(500),
                    min: Some("1".to_string()),
                    max: None,
                    description: "Number of strategies in every generation".to_string(),
                },
                FieldManifest {
                    name: "stop_after_generations_without_improvement".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::json!(30),
                    min: Some("1".to_string()),
                    max: None,
                    description: "Stop after this many generations without a better result"
                        .to_string(),
                },
                FieldManifest {
                    name: "seed".to_string(),
                    field_type: "integer".to_string(),
                    default: serde_json::Value::Null,
                    min: Some("0".to_string()),
                    max: None,
                    description: "Random seed; leave unset for a fresh run every time".to_string(),
                },
            ],
        }
    }
}
