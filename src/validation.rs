// Validation functions for pathway
// Semantic checks on a parsed routes file, run before anything is registered

use url::Url;

use crate::config::{RouteSettings, RouterConfig};

/// Check every route in `config`, collecting all problems rather than the first
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    if config.default_protocol.trim().is_empty() {
        errors.push("default_protocol must not be empty".to_string());
    }

    let policy = config.host_policy();
    for (name, settings) in config.routes.entries() {
        validate_route(&name, settings, &mut errors);

        if let Some(host) = settings.defaults.host() {
            if !policy.is_local(Some(host)) {
                if let Err(e) = validate_external_host(host, &config.default_protocol) {
                    errors.push(format!("route '{}': {}", name, e));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(name: &str, settings: &RouteSettings, errors: &mut Vec<String>) {
    if name.trim().is_empty() {
        errors.push("route name must not be empty".to_string());
    }

    let mut keys: Vec<&String> = settings.regex.keys().collect();
    keys.sort();
    for key in keys {
        if !is_valid_key_name(key) {
            errors.push(format!(
                "route '{}': invalid key name '{}' in regex: must contain only letters, numbers, and underscores",
                name, key
            ));
        }
        if settings.regex[key].is_empty() {
            errors.push(format!("route '{}': empty regex for key '{}'", name, key));
        }
    }

    for filter in &settings.filters {
        if filter.trim().is_empty() {
            errors.push(format!("route '{}': empty filter name", name));
        }
    }
}

/// Check if a key name is valid (ASCII alphanumeric + underscore, not starting with a digit)
pub fn is_valid_key_name(name: &str) -> bool {
    !name.is_empty()
        && !name.starts_with(|c: char| c.is_ascii_digit())
        && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Validate that an external host, once given a scheme, is a usable http(s) URL
pub fn validate_external_host(host: &str, default_protocol: &str) -> Result<(), String> {
    let absolute = if host.contains("://") {
        host.to_string()
    } else {
        format!("{}{}", default_protocol, host)
    };

    let url = Url::parse(&absolute).map_err(|e| format!("invalid host '{}': {}", host, e))?;
    match url.scheme() {
        "http" | "https" => {}
        scheme => return Err(format!("host '{}' uses unsupported scheme '{}'", host, scheme)),
    }
    if url.host_str().is_none() {
        return Err(format!("host '{}' has no host name", host));
    }
    Ok(())
}
