//! The one place where search requests and progress messages cross the
//! process boundary.
//!
//! Every decimal travels as a base-10 string so no precision is lost in
//! transit. The over-budget fitness travels as the string `"overBudget"`.

use crate::data::{AssetCatalog, InputValidator};
use crate::engines::generation::progress::ProgressMessage;
use crate::error::{RebalanceError, Result};
use crate::types::{Asset, Fitness, Individual, Strategy, StrategyStats};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

/// Everything a caller sends to start one search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub population_size: usize,
    #[serde(rename = "stopAfterNGenerationsWithoutBetterResult")]
    pub stop_after_generations_without_improvement: usize,
    #[serde(with = "rust_decimal::serde::str")]
    pub investment_limit: Decimal,
    pub asset_data: Vec<Asset>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

impl SearchRequest {
    pub fn validate(&self) -> Result<()> {
        if self.population_size < 1 {
            return Err(RebalanceError::Validation(
                "Population size must be at least 1".to_string(),
            ));
        }
        if self.stop_after_generations_without_improvement < 1 {
            return Err(RebalanceError::Validation(
                "Stop-after generation count must be at least 1".to_string(),
            ));
        }
        InputValidator::validate(&self.asset_data, self.investment_limit)
    }

    pub fn catalog(&self) -> Result<AssetCatalog> {
        AssetCatalog::new(self.asset_data.clone())
    }
}

/// Parse and validate a JSON search request.
pub fn decode_request(json: &str) -> Result<SearchRequest> {
    let request: SearchRequest = serde_json::from_str(json)?;
    request.validate()?;
    Ok(request)
}

/// Render a progress message as JSON.
///
/// Intermediate messages carry `generation` and `result`; the final message
/// adds `strategyStats` and `investmentLimit`.
pub fn encode_message(message: &ProgressMessage, catalog: &AssetCatalog) -> Result<String> {
    let wire = match message {
        ProgressMessage::Generation { generation, best } => WireMessage {
            generation: *generation,
            result: WireIndividual::new(best, catalog),
            strategy_stats: None,
            investment_limit: None,
        },
        ProgressMessage::Finished(outcome) => WireMessage {
            generation: outcome.generation,
            result: WireIndividual::new(&outcome.best, catalog),
            strategy_stats: Some(&outcome.stats),
            investment_limit: Some(outcome.investment_limit.to_string()),
        },
    };
    Ok(serde_json::to_string(&wire)?)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WireMessage<'a> {
    generation: usize,
    result: WireIndividual<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strategy_stats: Option<&'a StrategyStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    investment_limit: Option<String>,
}

#[derive(Serialize)]
struct WireIndividual<'a> {
    strategy: StrategyView<'a>,
    fitness: Fitness,
}

impl<'a> WireIndividual<'a> {
    fn new(individual: &'a Individual, catalog: &'a AssetCatalog) -> Self {
        Self {
            strategy: StrategyView {
                strategy: individual.strategy(),
                catalog,
            },
            fitness: individual.fitness(),
        }
    }
}

/// Serializes a strategy as `{asset name: shares}` in catalog order.
struct StrategyView<'a> {
    strategy: &'a Strategy,
    catalog: &'a AssetCatalog,
}

impl Serialize for StrategyView<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.strategy.len()))?;
        for (name, shares) in self.catalog.names().zip(self.strategy.shares()) {
            map.serialize_entry(name, shares)?;
        }
        map.end()
    }
}
