use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sharebalance::data::AssetCatalog;
use sharebalance::engines::evaluation::evaluate_strategy;
use sharebalance::types::{Asset, Fitness, Strategy};

/// Two assets at 50% each, no current holdings, $10 per share
fn even_catalog() -> AssetCatalog {
    AssetCatalog::new(vec![
        Asset::new("A", dec!(50), dec!(0), dec!(10)),
        Asset::new("B", dec!(50), dec!(0), dec!(10)),
    ])
    .unwrap()
}

fn fitness_of(shares: &[u64], catalog: &AssetCatalog, budget: Decimal) -> Fitness {
    evaluate_strategy(&Strategy::new(shares.to_vec()), catalog, budget)
}

#[test]
fn test_exact_spend_on_target_is_ideal() {
    let fitness = fitness_of(&[5, 5], &even_catalog(), dec!(100));

    // 5 * $10 + 5 * $10 = $100, both assets at 50%
    assert_eq!(fitness, Fitness::Feasible(dec!(0)));
    assert!(fitness.is_ideal());
}

#[test]
fn test_over_budget_strategy() {
    // 11 * $10 = $110 > $100
    let fitness = fitness_of(&[11, 0], &even_catalog(), dec!(100));
    assert_eq!(fitness, Fitness::OverBudget);
}

#[test]
fn test_over_budget_ignores_other_attributes() {
    let lopsided = AssetCatalog::new(vec![
        Asset::new("A", dec!(90), dec!(5000), dec!(1)),
        Asset::new("B", dec!(10), dec!(0), dec!(1000)),
    ])
    .unwrap();

    assert_eq!(fitness_of(&[101, 0], &lopsided, dec!(100)), Fitness::OverBudget);
    assert_eq!(fitness_of(&[0, 1], &lopsided, dec!(999.99)), Fitness::OverBudget);
    assert_eq!(fitness_of(&[1, 1], &even_catalog(), dec!(19.99)), Fitness::OverBudget);
}

#[test]
fn test_unspent_budget_is_penalized() {
    // $80 spent evenly: percentages match, 20% of the budget unspent
    let fitness = fitness_of(&[4, 4], &even_catalog(), dec!(100));
    assert_eq!(fitness, Fitness::Feasible(dec!(20)));
}

#[test]
fn test_percentage_mismatch_and_penalty_add_up() {
    // $80 spent: A at 75%, B at 25% -> 25 + 25 off target, plus 20 unspent
    let fitness = fitness_of(&[6, 2], &even_catalog(), dec!(100));
    assert_eq!(fitness, Fitness::Feasible(dec!(70)));
}

#[test]
fn test_empty_purchase_with_no_holdings() {
    // nothing owned and nothing bought: every new percentage counts as 0
    let fitness = fitness_of(&[0, 0], &even_catalog(), dec!(100));
    assert_eq!(fitness, Fitness::Feasible(dec!(200)));
}

#[test]
fn test_existing_holdings_shift_percentages() {
    let catalog = AssetCatalog::new(vec![
        Asset::new("A", dec!(60), dec!(100), dec!(20)),
        Asset::new("B", dec!(40), dec!(100), dec!(50)),
    ])
    .unwrap();

    // A: (100 + 100) / 300 = 66.67%, B: 33.33%, whole budget spent
    let fitness = fitness_of(&[5, 0], &catalog, dec!(100));
    let value = fitness.value().expect("strategy is within budget");
    assert!((value - dec!(13.3333)).abs() < dec!(0.0001), "got {}", value);

    // one share of B: A at 40%, B at 60% -> 20 + 20 off target, plus 50 unspent
    let fitness = fitness_of(&[0, 1], &catalog, dec!(100));
    assert_eq!(fitness, Fitness::Feasible(dec!(90)));
}

#[test]
fn test_repeated_evaluation_is_exact() {
    let catalog = AssetCatalog::new(vec![
        Asset::new("A", dec!(33.3), dec!(10.01), dec!(0.07)),
        Asset::new("B", dec!(33.3), dec!(20.02), dec!(0.13)),
        Asset::new("C", dec!(33.4), dec!(30.03), dec!(0.29)),
    ])
    .unwrap();
    let strategy = Strategy::new(vec![100, 50, 20]);

    let first = evaluate_strategy(&strategy, &catalog, dec!(25));
    for _ in 0..1000 {
        assert_eq!(evaluate_strategy(&strategy, &catalog, dec!(25)), first);
    }
}
