pub mod fitness;
pub mod report;

pub use fitness::evaluate_strategy;
pub use report::build_report;
