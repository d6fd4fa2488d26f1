use crate::error::{RebalanceError, Result};
use crate::types::{Asset, Strategy};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Fixed, ordered set of assets for one search run.
///
/// The position of an asset in the catalog is the index of its gene in every
/// [`Strategy`] built for the run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCatalog {
    assets: Vec<Asset>,
    total_current_value: Decimal,
}

impl AssetCatalog {
    /// Build a catalog, failing fast on input the search cannot run with.
    pub fn new(assets: Vec<Asset>) -> Result<Self> {
        if assets.is_empty() {
            return Err(RebalanceError::Validation(
                "Asset catalog cannot be empty".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for asset in &assets {
            if !seen.insert(asset.name.as_str()) {
                return Err(RebalanceError::Validation(format!(
                    "Duplicate asset name '{}'",
                    asset.name
                )));
            }
            if asset.current_share_price <= Decimal::ZERO {
                return Err(RebalanceError::Validation(format!(
                    "Share price of '{}' must be positive, found {}",
                    asset.name, asset.current_share_price
                )));
            }
        }

        let total_current_value = assets
            .iter()
            .try_fold(Decimal::ZERO, |sum, a| sum.checked_add(a.current_total_value))
            .ok_or_else(|| {
                RebalanceError::Validation("Total current value is too large".to_string())
            })?;

        Ok(Self {
            assets,
            total_current_value,
        })
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn get(&self, index: usize) -> Option<&Asset> {
        self.assets.get(index)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Asset> {
        self.assets.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.assets.iter().map(|a| a.name.as_str())
    }

    /// Sum of the current holdings across all assets.
    pub fn total_current_value(&self) -> Decimal {
        self.total_current_value
    }

    /// Money spent on each asset if `strategy` is followed, in catalog order.
    pub fn projected_investments(&self, strategy: &Strategy) -> Vec<Decimal> {
        self.assets
            .iter()
            .zip(strategy.shares())
            .map(|(asset, &shares)| asset.current_share_price * Decimal::from(shares))
            .collect()
    }

    /// Whole number of shares of the asset at `index` that `budget` pays for.
    ///
    /// Engines check [`AssetCatalog::check_budget`] first, so the bound always fits.
    pub fn max_affordable_shares(&self, index: usize, budget: Decimal) -> u64 {
        self.checked_max_affordable_shares(index, budget)
            .unwrap_or(u64::MAX)
    }

    /// `floor(budget / price)`, or `None` when it overflows or exceeds `u64::MAX`.
    pub fn checked_max_affordable_shares(&self, index: usize, budget: Decimal) -> Option<u64> {
        let price = self.assets[index].current_share_price;
        // remainder is exact, so the quotient below has no fractional part to round
        let whole = budget
            .checked_rem(price)
            .and_then(|rem| budget.checked_sub(rem))
            .and_then(|spendable| spendable.checked_div(price))?;
        if whole <= Decimal::ZERO {
            Some(0)
        } else {
            whole.to_u64()
        }
    }

    /// Reject budgets the search arithmetic cannot represent: every gene bound
    /// must fit in a `u64`, and the holdings plus the budget spent on every
    /// asset must fit in a `Decimal`.
    pub fn check_budget(&self, budget: Decimal) -> Result<()> {
        for (index, asset) in self.assets.iter().enumerate() {
            if self.checked_max_affordable_shares(index, budget).is_none() {
                return Err(RebalanceError::Validation(format!(
                    "Investment limit {} buys too many shares of '{}' at {}",
                    budget, asset.name, asset.current_share_price
                )));
            }
        }

        let headroom = Decimal::from(self.assets.len())
            .checked_mul(budget)
            .and_then(|spent| spent.checked_add(self.total_current_value));
        if headroom.is_none() {
            return Err(RebalanceError::Validation(format!(
                "Investment limit {} is too large for this portfolio",
                budget
            )));
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a AssetCatalog {
    type Item = &'a Asset;
    type IntoIter = std::slice::Iter<'a, Asset>;

    fn into_iter(self) -> Self::IntoIter {
        self.assets.iter()
    }
}
