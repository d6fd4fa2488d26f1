use crate::engines::generation::SearchOutcome;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::collections::VecDeque;

/// How many distinct final solutions are remembered by default.
pub const DEFAULT_HISTORY_SIZE: usize = 5;

#[derive(Debug, Clone)]
pub struct RecordedSolution {
    pub outcome: SearchOutcome,
    pub recorded_at: DateTime<Utc>,
    signature: String,
}

impl RecordedSolution {
    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// Shares bought of each asset, in catalog order.
    pub fn share_counts(&self) -> Vec<(&str, u64)> {
        self.outcome
            .stats
            .stats
            .iter()
            .map(|row| (row.asset_name.as_str(), row.shares_count))
            .collect()
    }

    /// Part of the investment limit the solution leaves unspent.
    pub fn left_over(&self) -> Decimal {
        self.outcome.investment_limit - self.outcome.stats.total_projected_investment
    }
}

/// The most recent distinct solutions found by separate runs, oldest first.
///
/// Two solutions are the same when they buy the same shares of every asset
/// and cost the same in total.
pub struct SolutionHistory {
    solutions: VecDeque<RecordedSolution>,
    max_size: usize,
}

impl Default for SolutionHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_SIZE)
    }
}

impl SolutionHistory {
    pub fn new(max_size: usize) -> Self {
        Self {
            solutions: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    /// Record a finished run. Returns `false` for a duplicate of a stored solution.
    pub fn try_add(&mut self, outcome: SearchOutcome) -> bool {
        let signature = solution_signature(&outcome);
        if self.solutions.iter().any(|s| s.signature == signature) {
            return false;
        }

        self.solutions.push_back(RecordedSolution {
            outcome,
            recorded_at: Utc::now(),
            signature,
        });
        while self.solutions.len() > self.max_size {
            self.solutions.pop_front();
        }
        true
    }

    pub fn latest(&self) -> Option<&RecordedSolution> {
        self.solutions.back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &RecordedSolution> {
        self.solutions.iter()
    }

    pub fn len(&self) -> usize {
        self.solutions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.solutions.is_empty()
    }
}

/// Shares per asset plus the normalized total cost.
pub fn solution_signature(outcome: &SearchOutcome) -> String {
    let shares: Vec<String> = outcome
        .stats
        .stats
        .iter()
        .map(|row| format!("{}={}", row.asset_name, row.shares_count))
        .collect();
    format!(
        "{}|{}",
        shares.join(","),
        outcome.stats.total_projected_investment.normalize()
    )
}
