use rust_decimal::Decimal;
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::data::AssetCatalog;
use crate::engines::evaluation::fitness::evaluate_strategy;

/// One holding the search may buy shares of.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub target_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_total_value: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_share_price: Decimal,
}

impl Asset {
    pub fn new(
        name: impl Into<String>,
        target_percentage: Decimal,
        current_total_value: Decimal,
        current_share_price: Decimal,
    ) -> Self {
        Self {
            name: name.into(),
            target_percentage,
            current_total_value,
            current_share_price,
        }
    }
}

/// Share counts to buy, indexed by catalog position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Strategy {
    shares: Vec<u64>,
}

impl Strategy {
    pub fn new(shares: Vec<u64>) -> Self {
        Self { shares }
    }

    pub fn shares(&self) -> &[u64] {
        &self.shares
    }

    /// Gene for the asset at `index`.
    pub fn gene(&self, index: usize) -> u64 {
        self.shares[index]
    }

    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }
}

impl FromIterator<u64> for Strategy {
    fn from_iter<I: IntoIterator<Item = u64>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Score of a strategy. Lower is better, and any over-budget strategy ranks
/// after every feasible one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fitness {
    Feasible(Decimal),
    OverBudget,
}

const OVER_BUDGET_TAG: &str = "overBudget";

impl Fitness {
    /// Perfect match of every target while spending the whole budget.
    pub fn is_ideal(&self) -> bool {
        matches!(self, Fitness::Feasible(value) if value.is_zero())
    }

    pub fn is_feasible(&self) -> bool {
        matches!(self, Fitness::Feasible(_))
    }

    pub fn value(&self) -> Option<Decimal> {
        match self {
            Fitness::Feasible(value) => Some(*value),
            Fitness::OverBudget => None,
        }
    }
}

impl Ord for Fitness {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Fitness::Feasible(a), Fitness::Feasible(b)) => a.cmp(b),
            (Fitness::Feasible(_), Fitness::OverBudget) => Ordering::Less,
            (Fitness::OverBudget, Fitness::Feasible(_)) => Ordering::Greater,
            (Fitness::OverBudget, Fitness::OverBudget) => Ordering::Equal,
        }
    }
}

impl PartialOrd for Fitness {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Fitness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fitness::Feasible(value) => write!(f, "{}", value),
            Fitness::OverBudget => f.write_str(OVER_BUDGET_TAG),
        }
    }
}

impl FromStr for Fitness {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == OVER_BUDGET_TAG {
            Ok(Fitness::OverBudget)
        } else {
            Decimal::from_str(s).map(Fitness::Feasible)
        }
    }
}

impl Serialize for Fitness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Fitness {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FitnessVisitor;

        impl<'de> Visitor<'de> for FitnessVisitor {
            type Value = Fitness;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                write!(f, "a decimal string or \"{}\"", OVER_BUDGET_TAG)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Fitness, E> {
                Fitness::from_str(v).map_err(E::custom)
            }
        }

        deserializer.deserialize_str(FitnessVisitor)
    }
}

/// A scored strategy. The fitness is computed once, when the individual is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Individual {
    strategy: Strategy,
    fitness: Fitness,
}

impl Individual {
    pub fn evaluated(strategy: Strategy, catalog: &AssetCatalog, budget: Decimal) -> Self {
        let fitness = evaluate_strategy(&strategy, catalog, budget);
        Self { strategy, fitness }
    }

    pub fn strategy(&self) -> &Strategy {
        &self.strategy
    }

    pub fn fitness(&self) -> Fitness {
        self.fitness
    }
}

/// Per-asset row of the final breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyData {
    pub asset_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub target_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_total_value: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_share_price: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub current_percentage: Decimal,
    pub shares_count: u64,
    #[serde(with = "rust_decimal::serde::str")]
    pub rebalanced_percentage: Decimal,
    #[serde(with = "rust_decimal::serde::str")]
    pub projected_investment: Decimal,
}

/// Breakdown of a winning strategy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StrategyStats {
    pub stats: Vec<StrategyData>,
    #[serde(with = "rust_decimal::serde::str")]
    pub total_projected_investment: Decimal,
}
