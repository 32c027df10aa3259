// Routes file loading

use std::fs;
use std::path::Path;

use crate::config::yml_settings::RouterConfig;
use crate::error::ConfigError;
use crate::validation::validate_config;

/// Load and validate a routes file. `.json` files are read as JSON, anything
/// else as YAML.
pub fn load_config(path: &Path) -> Result<RouterConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let config = if is_json {
        parse_json(&content)?
    } else {
        parse_yaml(&content)?
    };

    tracing::debug!(path = %path.display(), routes = config.routes.len(), "routes file loaded");
    Ok(config)
}

pub fn parse_yaml(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = serde_yaml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

pub fn parse_json(content: &str) -> Result<RouterConfig, ConfigError> {
    let config: RouterConfig = serde_json::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}
