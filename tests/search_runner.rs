use rust_decimal_macros::dec;
use sharebalance::data::SearchRequest;
use sharebalance::engines::generation::ProgressMessage;
use sharebalance::services::{SearchRunner, SolutionHistory};
use sharebalance::types::Asset;
use sharebalance::RebalanceError;

fn request(seed: u64) -> SearchRequest {
    SearchRequest {
        population_size: 60,
        stop_after_generations_without_improvement: 10,
        investment_limit: dec!(1800),
        asset_data: vec![
            Asset::new("Weyland-Yutani", dec!(15), dec!(1589.23), dec!(102.32)),
            Asset::new("Krusty Krab", dec!(45), dec!(5408.84), dec!(63.89)),
            Asset::new("Majima Construction", dec!(10), dec!(825.52), dec!(93.11)),
            Asset::new("Speedwagon Foundation", dec!(30), dec!(3013.15), dec!(85.66)),
        ],
        seed: Some(seed),
    }
}

#[test]
fn test_runner_streams_progress_then_result() {
    let runner = SearchRunner::start(request(17)).unwrap();

    let mut messages = Vec::new();
    while let Some(message) = runner.wait_progress() {
        messages.push(message);
    }
    let outcome = runner.join().unwrap();

    let last = messages.last().expect("at least the final message");
    assert!(last.is_final());
    assert_eq!(last, &ProgressMessage::Finished(outcome.clone()));
    assert_eq!(messages.iter().filter(|m| m.is_final()).count(), 1);

    for (index, message) in messages.iter().enumerate() {
        assert_eq!(message.generation(), index + 1);
    }
}

#[test]
fn test_runner_rejects_invalid_request_before_starting() {
    let mut bad = request(1);
    bad.investment_limit = dec!(0);
    assert!(matches!(SearchRunner::start(bad), Err(RebalanceError::Validation(_))));
}

#[test]
fn test_runner_rejects_limit_beyond_share_range() {
    let mut huge = request(1);
    huge.investment_limit = dec!(1000000000000000000000000000);
    huge.asset_data = vec![
        Asset::new("A", dec!(50), dec!(0), dec!(0.01)),
        Asset::new("B", dec!(50), dec!(0), dec!(10)),
    ];
    assert!(matches!(SearchRunner::start(huge), Err(RebalanceError::Validation(_))));
}

#[test]
fn test_runner_cancel() {
    // no purchase splits $10 evenly, and the stagnation window never fills
    let request = SearchRequest {
        population_size: 20,
        stop_after_generations_without_improvement: 1_000_000,
        investment_limit: dec!(10),
        asset_data: vec![
            Asset::new("A", dec!(50), dec!(0), dec!(3)),
            Asset::new("B", dec!(50), dec!(0), dec!(7)),
        ],
        seed: Some(5),
    };
    let runner = SearchRunner::start(request).unwrap();

    let first = runner.wait_progress().expect("first generation");
    assert_eq!(first.generation(), 1);
    runner.cancel();

    assert!(matches!(runner.join(), Err(RebalanceError::Cancelled(_))));
}

#[test]
fn test_seeded_runs_repeat_and_history_deduplicates() {
    let first = SearchRunner::start(request(23)).unwrap().join().unwrap();
    let second = SearchRunner::start(request(23)).unwrap().join().unwrap();
    assert_eq!(first, second);

    let mut history = SolutionHistory::new(2);
    assert!(history.try_add(first.clone()));
    assert!(!history.try_add(second));
    assert_eq!(history.len(), 1);

    let recorded = history.latest().unwrap();
    let counts = recorded.share_counts();
    let names: Vec<&str> = counts.iter().map(|(name, _)| *name).collect();
    assert_eq!(
        names,
        vec!["Weyland-Yutani", "Krusty Krab", "Majima Construction", "Speedwagon Foundation"]
    );
    for ((_, count), row) in counts.iter().zip(&first.stats.stats) {
        assert_eq!(*count, row.shares_count);
    }
    assert_eq!(
        recorded.left_over(),
        dec!(1800) - first.stats.total_projected_investment
    );
    assert!(recorded.left_over() >= dec!(0));
}

#[test]
fn test_history_keeps_most_recent() {
    let mut history = SolutionHistory::new(2);
    let mut added = Vec::new();

    for seed in 0..20 {
        let outcome = SearchRunner::start(request(seed)).unwrap().join().unwrap();
        if history.try_add(outcome.clone()) {
            added.push(outcome);
        }
        assert!(history.len() <= 2);
    }

    if let Some(newest) = added.last() {
        assert_eq!(&history.latest().unwrap().outcome, newest);
    }
}
