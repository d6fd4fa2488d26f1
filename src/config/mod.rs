pub mod manager;
pub mod portfolio;
pub mod search;
pub mod traits;

pub use manager::{AppConfig, ConfigManager};
pub use portfolio::{AssetConfig, PortfolioConfig};
pub use search::SearchConfig;
pub use traits::{ConfigManifest, ConfigSection};
