use crate::data::AssetCatalog;
use crate::engines::evaluation::fitness::percentage_of;
use crate::types::{Strategy, StrategyData, StrategyStats};
use rust_decimal::Decimal;

/// Build the per-asset breakdown of a strategy: current and rebalanced
/// percentages and the money each purchase costs.
pub fn build_report(strategy: &Strategy, catalog: &AssetCatalog) -> StrategyStats {
    let current_total = catalog.total_current_value();
    let projected = catalog.projected_investments(strategy);
    let total_projected_investment: Decimal = projected.iter().copied().sum();
    let rebalanced_total = current_total + total_projected_investment;

    let stats = catalog
        .iter()
        .zip(strategy.shares())
        .zip(projected)
        .map(|((asset, &shares_count), projected_investment)| StrategyData {
            asset_name: asset.name.clone(),
            target_percentage: asset.target_percentage,
            current_total_value: asset.current_total_value,
            current_share_price: asset.current_share_price,
            current_percentage: percentage_of(asset.current_total_value, current_total),
            shares_count,
            rebalanced_percentage: percentage_of(
                asset.current_total_value + projected_investment,
                rebalanced_total,
            ),
            projected_investment,
        })
        .collect();

    StrategyStats {
        stats,
        total_projected_investment,
    }
}
