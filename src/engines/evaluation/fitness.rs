use crate::data::AssetCatalog;
use crate::types::{Fitness, Strategy};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

const HUNDRED: Decimal = dec!(100);

/// Score a strategy against the target weights. Lower is better.
///
/// The score is the sum over assets of `|target % - post-purchase %|` plus the
/// percentage of the budget left unspent. Any strategy costing more than
/// `budget` is [`Fitness::OverBudget`]. `budget` must be positive.
pub fn evaluate_strategy(strategy: &Strategy, catalog: &AssetCatalog, budget: Decimal) -> Fitness {
    let projected = catalog.projected_investments(strategy);
    let total_projected: Decimal = projected.iter().copied().sum();

    if total_projected > budget {
        return Fitness::OverBudget;
    }

    let projected_total_value = catalog.total_current_value() + total_projected;

    let total_diff: Decimal = catalog
        .iter()
        .zip(&projected)
        .map(|(asset, investment)| {
            let new_percentage = percentage_of(
                asset.current_total_value + investment,
                projected_total_value,
            );
            (asset.target_percentage - new_percentage).abs()
        })
        .sum();

    let unspent_penalty = HUNDRED - total_projected / budget * HUNDRED;

    Fitness::Feasible(total_diff + unspent_penalty)
}

/// `part` as a percentage of `whole`, or zero when `whole` is zero.
pub(crate) fn percentage_of(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        Decimal::ZERO
    } else {
        part / whole * HUNDRED
    }
}
