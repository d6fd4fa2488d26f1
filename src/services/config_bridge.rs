use crate::config::AppConfig;
use crate::data::SearchRequest;

pub struct ConfigBridge;

impl ConfigBridge {
    /// Convert loaded settings into the request the search runner accepts
    pub fn to_search_request(config: &AppConfig) -> SearchRequest {
        SearchRequest {
            population_size: config.search.population_size,
            stop_after_generations_without_improvement: config
                .search
                .stop_after_generations_without_improvement,
            investment_limit: config.portfolio.investment_limit,
            asset_data: config.portfolio.to_assets(),
            seed: config.search.seed,
        }
    }
}
