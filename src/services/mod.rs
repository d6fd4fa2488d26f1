pub mod config_bridge;
pub mod request_loader;
pub mod search_runner;
pub mod solution_history;

pub use config_bridge::ConfigBridge;
pub use request_loader::RequestLoader;
pub use search_runner::SearchRunner;
pub use solution_history::{RecordedSolution, SolutionHistory};
