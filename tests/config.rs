use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sharebalance::config::{AppConfig, AssetConfig, ConfigManager, ConfigSection, SearchConfig};
use sharebalance::services::ConfigBridge;
use sharebalance::RebalanceError;
use std::path::PathBuf;
use std::str::FromStr;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sharebalance-{}-{}", std::process::id(), name))
}

#[test]
fn test_default_config_is_valid() {
    let config = AppConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.search.population_size, 500);
    assert_eq!(config.search.stop_after_generations_without_improvement, 30);
    assert_eq!(config.portfolio.investment_limit, dec!(1800));
    assert_eq!(config.portfolio.assets.len(), 4);
}

#[test]
fn test_save_and_load_toml() {
    let path = temp_path("roundtrip.toml");
    let manager = ConfigManager::new();
    manager
        .update(|config| {
            config.search.population_size = 120;
            config.search.seed = Some(77);
            config.portfolio.investment_limit = dec!(2500.50);
        })
        .unwrap();
    manager.save_to_file(&path).unwrap();

    let loaded = ConfigManager::new();
    loaded.load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(loaded.get(), manager.get());
    assert_eq!(loaded.get().search.seed, Some(77));
}

#[test]
fn test_load_json_settings() {
    let path = temp_path("settings.json");
    std::fs::write(
        &path,
        r#"{
            "search": { "population_size": 40, "stop_after_generations_without_improvement": 5 },
            "portfolio": {
                "investment_limit": "250",
                "assets": [
                    { "name": "Bonds", "target_percentage": "70", "current_total_value": "700", "current_share_price": "25" },
                    { "name": "Stocks", "target_percentage": "30", "current_total_value": "450.5", "current_share_price": "12.75" }
                ]
            }
        }"#,
    )
    .unwrap();

    let manager = ConfigManager::new();
    manager.load_from_file(&path).unwrap();
    std::fs::remove_file(&path).ok();

    let config = manager.get();
    assert_eq!(config.search.population_size, 40);
    assert_eq!(config.search.seed, None);
    assert_eq!(config.portfolio.assets[1].current_share_price, dec!(12.75));

    let request = ConfigBridge::to_search_request(&config);
    assert_eq!(request.population_size, 40);
    assert_eq!(request.stop_after_generations_without_improvement, 5);
    assert_eq!(request.investment_limit, dec!(250));
    assert_eq!(request.asset_data[0].name, "Bonds");
    assert!(request.validate().is_ok());
}

#[test]
fn test_invalid_file_is_rejected() {
    let path = temp_path("bad.toml");
    let mut config = AppConfig::default();
    config.portfolio.assets.push(AssetConfig::new("Extra", dec!(5), dec!(0), dec!(1)));
    std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();

    let manager = ConfigManager::new();
    let result = manager.load_from_file(&path);
    std::fs::remove_file(&path).ok();

    assert!(matches!(result, Err(RebalanceError::Configuration(_))));
    assert_eq!(manager.get(), AppConfig::default());
}

#[test]
fn test_missing_file() {
    let manager = ConfigManager::new();
    let result = manager.load_from_file(temp_path("does-not-exist.toml"));
    assert!(matches!(result, Err(RebalanceError::Configuration(_))));
}

#[test]
fn test_failed_update_keeps_previous_settings() {
    let manager = ConfigManager::new();
    let result = manager.update(|config| config.search.population_size = 0);

    assert!(result.is_err());
    assert_eq!(manager.get().search.population_size, 500);
}

#[test]
fn test_manifest_lists_sections() {
    let manifest = AppConfig::default().manifest();
    let sections: Vec<&str> = manifest.iter().map(|m| m.section.as_str()).collect();
    assert_eq!(sections, vec!["Search", "Portfolio"]);
    assert_eq!(SearchConfig::section_name(), "search");
    assert!(manifest[0].fields.iter().any(|f| f.name == "population_size"));
}

#[test]
fn test_env_override_keeps_every_digit() {
    let path = temp_path("env-override.toml");
    ConfigManager::new().save_to_file(&path).unwrap();
    std::env::set_var("SBEXACT_PORTFOLIO__INVESTMENT_LIMIT", "1800.1234567890123456789");
    std::env::set_var("SBEXACT_SEARCH__POPULATION_SIZE", "64");

    let manager = ConfigManager::with_env_prefix("SBEXACT");
    let result = manager.load_from_file(&path);
    std::env::remove_var("SBEXACT_PORTFOLIO__INVESTMENT_LIMIT");
    std::env::remove_var("SBEXACT_SEARCH__POPULATION_SIZE");
    std::fs::remove_file(&path).ok();

    result.unwrap();
    let config = manager.get();
    assert_eq!(
        config.portfolio.investment_limit,
        Decimal::from_str("1800.1234567890123456789").unwrap()
    );
    assert_eq!(config.portfolio.investment_limit.to_string(), "1800.1234567890123456789");
    assert_eq!(config.search.population_size, 64);
}

#[test]
fn test_unquoted_fractional_decimal_is_rejected() {
    let text = toml::to_string_pretty(&AppConfig::default())
        .unwrap()
        .replace("investment_limit = \"1800\"", "investment_limit = 1800.1234567890123456789");
    assert!(text.contains("investment_limit = 1800.1234567890123456789"));

    let path = temp_path("unquoted.toml");
    std::fs::write(&path, text).unwrap();
    let manager = ConfigManager::new();
    let result = manager.load_from_file(&path);
    std::fs::remove_file(&path).ok();

    assert!(result.is_err());
    assert_eq!(manager.get(), AppConfig::default());
}

#[test]
fn test_whole_number_decimal_is_accepted() {
    let text = toml::to_string_pretty(&AppConfig::default())
        .unwrap()
        .replace("investment_limit = \"1800\"", "investment_limit = 2400");

    let path = temp_path("whole.toml");
    std::fs::write(&path, text).unwrap();
    let manager = ConfigManager::new();
    let result = manager.load_from_file(&path);
    std::fs::remove_file(&path).ok();

    result.unwrap();
    assert_eq!(manager.get().portfolio.investment_limit, dec!(2400));
}
