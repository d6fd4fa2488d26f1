use super::traits::{ConfigManifest, ConfigSection, FieldManifest};
use crate::data::validator::{InputValidator, MAX_ASSETS, MIN_SHARE_PRICE};
use crate::error::RebalanceError;
use crate::types::Asset;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioConfig {
    /// Money available for today's purchases.
    #[serde(with = "exact_decimal")]
    pub investment_limit: Decimal,
    pub assets: Vec<AssetConfig>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetConfig {
    pub name: String,
    #[serde(with = "exact_decimal")]
    pub target_percentage: Decimal,
    #[serde(with = "exact_decimal")]
    pub current_total_value: Decimal,
    #[serde(with = "exact_decimal")]
    pub current_share_price: Decimal,
}

impl AssetConfig {
    pub fn new(
        name: &str,
        target_percentage: Decimal,
        current_total_value: Decimal,
        current_share_price: Decimal,
    ) -> Self {
        Self {
            name: name.to_string(),
            target_percentage,
            current_total_value,
            current_share_price,
        }
    }
}

impl From<&AssetConfig> for Asset {
    fn from(config: &AssetConfig) -> Self {
        Asset::new(
            config.name.clone(),
            config.target_percentage,
            config.current_total_value,
            config.current_share_price,
        )
    }
}

impl PortfolioConfig {
    pub fn to_assets(&self) -> Vec<Asset> {
        self.assets.iter().map(Asset::from).collect()
    }
}

impl Default for PortfolioConfig {
    fn default() -> Self {
        Self {
            investment_limit: dec!(1800),
            assets: vec![
                AssetConfig::new("Weyland-Yutani", dec!(15), dec!(1589.23), dec!(102.32)),
                AssetConfig::new("Krusty Krab", dec!(45), dec!(5408.84), dec!(63.89)),
                AssetConfig::new("Majima Construction", dec!(10), dec!(825.52), dec!(93.11)),
                AssetConfig::new("Speedwagon Foundation", dec!(30), dec!(3013.15), dec!(85.66)),
            ],
        }
    }
}

impl ConfigSection for PortfolioConfig {
    fn section_name() -> &'static str {
        "portfolio"
    }

    fn validate(&self) -> Result<(), RebalanceError> {
        InputValidator::validate(&self.to_assets(), self.investment_limit)
            .map_err(|e| RebalanceError::Configuration(e.to_string()))
    }

    fn to_manifest(&self) -> ConfigManifest {
        ConfigManifest {
            section: "Portfolio".to_string(),
            fields: vec![
                FieldManifest {
                    name: "investment_limit".to_string(),
                    field_type: "decimal".to_string(),
                    default: serde_json::json!("1800"),
                    min: Some(MIN_SHARE_PRICE.to_string()),
                    max: None,
                    description: "Money available for purchases".to_string(),
                },
                FieldManifest {
                    name: "assets".to_string(),
                    field_type: "list".to_string(),
                    default: serde_json::json!(self.assets.len()),
                    min: Some("1".to_string()),
                    max: Some(MAX_ASSETS.to_string()),
                    description: "Assets with target percentage, current value and share price; targets sum to 100".to_string(),
                },
            ],
        }
    }
}

/// Decimal settings must be written as strings (or whole numbers). Fractional
/// numbers reach us as `f64` from the file and environment sources and have
/// already lost digits, so they are rejected.
mod exact_decimal {
    use rust_decimal::Decimal;
    use serde::de::{self, Deserializer, Visitor};
    use serde::Serializer;
    use std::fmt;
    use std::str::FromStr;

    pub fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
        rust_decimal::serde::str::serialize(value, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Decimal, D::Error> {
        deserializer.deserialize_any(ExactDecimalVisitor)
    }

    struct ExactDecimalVisitor;

    impl<'de> Visitor<'de> for ExactDecimalVisitor {
        type Value = Decimal;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a decimal written as a quoted string, e.g. \"1800.50\"")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Decimal, E> {
            Decimal::from_str(v.trim())
                .or_else(|_| Decimal::from_scientific(v.trim()))
                .map_err(E::custom)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<Decimal, E> {
            Ok(Decimal::from(v))
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<Decimal, E> {
            Err(E::custom(format!(
                "decimal {} must be quoted to keep its exact value",
                v
            )))
        }
    }
}
