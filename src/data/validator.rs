use crate::error::{RebalanceError, Result};
use crate::types::Asset;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Largest number of assets a single search accepts.
pub const MAX_ASSETS: usize = 10;

/// Smallest share price accepted from user input.
pub const MIN_SHARE_PRICE: Decimal = dec!(0.01);

/// Smallest target percentage accepted from user input.
pub const MIN_TARGET_PERCENTAGE: Decimal = dec!(0.01);

const FULL_ALLOCATION: Decimal = dec!(100);

pub struct InputValidator;

impl InputValidator {
    /// Validate asset rows and the investment limit before a search starts
    pub fn validate(assets: &[Asset], investment_limit: Decimal) -> Result<()> {
        Self::validate_assets(assets)?;
        Self::validate_investment_limit(assets, investment_limit)
    }

    pub fn validate_assets(assets: &[Asset]) -> Result<()> {
        if assets.is_empty() {
            return Err(RebalanceError::Validation(
                "At least one asset is required".to_string(),
            ));
        }
        if assets.len() > MAX_ASSETS {
            return Err(RebalanceError::Validation(format!(
                "At most {} assets are supported, found {}",
                MAX_ASSETS,
                assets.len()
            )));
        }

        for asset in assets {
            Self::validate_asset(asset)?;
        }

        let dupes = Self::duplicate_names(assets);
        if !dupes.is_empty() {
            let quoted: Vec<String> = dupes.iter().map(|n| format!("'{}'", n)).collect();
            return Err(RebalanceError::Validation(format!(
                "Asset names must be unique, found duplicates: [{}]",
                quoted.join(", ")
            )));
        }

        let sum: Decimal = assets.iter().map(|a| a.target_percentage).sum();
        if sum != FULL_ALLOCATION {
            return Err(RebalanceError::Validation(format!(
                "Sum of target percentages must be {}%, found {}%",
                FULL_ALLOCATION, sum
            )));
        }

        Ok(())
    }

    fn validate_asset(asset: &Asset) -> Result<()> {
        if asset.name.trim().is_empty() {
            return Err(RebalanceError::Validation(
                "Asset name is required".to_string(),
            ));
        }
        if asset.target_percentage < MIN_TARGET_PERCENTAGE
            || asset.target_percentage > FULL_ALLOCATION
        {
            return Err(RebalanceError::Validation(format!(
                "Target percentage of '{}' must be between {} and {}, found {}",
                asset.name, MIN_TARGET_PERCENTAGE, FULL_ALLOCATION, asset.target_percentage
            )));
        }
        if asset.current_total_value < Decimal::ZERO {
            return Err(RebalanceError::Validation(format!(
                "Current total value of '{}' cannot be negative, found {}",
                asset.name, asset.current_total_value
            )));
        }
        if asset.current_share_price < MIN_SHARE_PRICE {
            return Err(RebalanceError::Validation(format!(
                "Current share price of '{}' must be at least {}, found {}",
                asset.name, MIN_SHARE_PRICE, asset.current_share_price
            )));
        }
        Ok(())
    }

    /// The limit must be positive, buy at least one share of the cheapest asset,
    /// and leave every share count representable.
    fn validate_investment_limit(assets: &[Asset], investment_limit: Decimal) -> Result<()> {
        if investment_limit <= Decimal::ZERO {
            return Err(RebalanceError::Validation(format!(
                "Investment limit must be positive, found {}",
                investment_limit
            )));
        }

        if let Some(min_price) = assets.iter().map(|a| a.current_share_price).min() {
            if min_price > investment_limit {
                return Err(RebalanceError::Validation(format!(
                    "Investment limit {} is below the cheapest share price {}",
                    investment_limit, min_price
                )));
            }

            let max_shares = investment_limit
                .checked_div(min_price)
                .and_then(|shares| shares.floor().to_u64());
            if max_shares.is_none() {
                return Err(RebalanceError::Validation(format!(
                    "Investment limit {} buys more than {} shares at {}",
                    investment_limit,
                    u64::MAX,
                    min_price
                )));
            }
        }

        let total_current_value = assets
            .iter()
            .try_fold(Decimal::ZERO, |sum, a| sum.checked_add(a.current_total_value));
        let headroom = total_current_value.and_then(|total| {
            Decimal::from(assets.len())
                .checked_mul(investment_limit)
                .and_then(|spent| spent.checked_add(total))
        });
        if headroom.is_none() {
            return Err(RebalanceError::Validation(format!(
                "Investment limit {} is too large for this portfolio",
                investment_limit
            )));
        }
        Ok(())
    }

    fn duplicate_names(assets: &[Asset]) -> Vec<&str> {
        let mut names: Vec<&str> = assets.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        let mut dupes: Vec<&str> = names
            .windows(2)
            .filter(|pair| pair[0] == pair[1])
            .map(|pair| pair[0])
            .collect();
        dupes.dedup();
        dupes
    }
}
