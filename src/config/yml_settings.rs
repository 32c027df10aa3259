use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::{Defaults, HostPolicy};

/// Root of a routes file
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RouterConfig {
    /// Prefixed to external hosts written without a scheme
    pub default_protocol: String,
    /// `host` defaults that refer to this site
    pub local_hosts: Vec<String>,
    pub site: SiteConfig,
    pub routes: RouteTable,
}

impl RouterConfig {
    pub fn host_policy(&self) -> HostPolicy {
        HostPolicy {
            default_protocol: self.default_protocol.clone(),
            local_hosts: self.local_hosts.clone(),
        }
    }
}

impl Default for RouterConfig {
    fn default() -> Self {
        let policy = HostPolicy::default();
        Self {
            default_protocol: policy.default_protocol,
            local_hosts: policy.local_hosts,
            site: SiteConfig::default(),
            routes: RouteTable::default(),
        }
    }
}

/// Where local routes live
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: String,
    pub index_file: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: "/".to_string(),
            index_file: String::new(),
            host: None,
        }
    }
}

/// Routes keyed by name, or a list whose entries may carry a `name`
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum RouteTable {
    Named(IndexMap<String, RouteSettings>),
    Listed(Vec<RouteSettings>),
}

impl Default for RouteTable {
    fn default() -> Self {
        RouteTable::Named(IndexMap::new())
    }
}

impl RouteTable {
    /// `(name, settings)` in file order. Unnamed list entries get `route-<uuid>`.
    pub fn entries(&self) -> Vec<(String, &RouteSettings)> {
        match self {
            RouteTable::Named(routes) => routes
                .iter()
                .map(|(name, settings)| (name.clone(), settings))
                .collect(),
            RouteTable::Listed(routes) => routes
                .iter()
                .map(|settings| {
                    let name = settings
                        .name
                        .clone()
                        .unwrap_or_else(|| format!("route-{}", uuid::Uuid::new_v4()));
                    (name, settings)
                })
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            RouteTable::Named(routes) => routes.len(),
            RouteTable::Listed(routes) => routes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One route record
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct RouteSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub uri: String,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub regex: HashMap<String, String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub force: bool,
    #[serde(default, skip_serializing_if = "Defaults::is_empty")]
    pub defaults: Defaults,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub filters: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde() {
        let settings = RouteSettings {
            name: None,
            uri: "(<controller>(/<action>(/<id>)))".to_string(),
            regex: HashMap::from([("id".to_string(), r"\d+".to_string())]),
            force: false,
            defaults: Defaults::new().with("controller", "Site").with("action", "index"),
            filters: vec!["trim".to_string()],
        };

        let yml = serde_yaml::to_string(&settings).unwrap();
        let deserde: RouteSettings = serde_yaml::from_str(&yml).unwrap();
        assert_eq!(settings, deserde);
    }

    #[test]
    fn test_skip_empty_fields_in_yaml() {
        let settings = RouteSettings {
            uri: "about".to_string(),
            ..Default::default()
        };

        let yml = serde_yaml::to_string(&settings).unwrap();

        assert!(!yml.contains("name:"));
        assert!(!yml.contains("regex:"));
        assert!(!yml.contains("force:"));
        assert!(!yml.contains("defaults:"));
        assert!(!yml.contains("filters:"));
        assert!(yml.contains("uri:"));
    }

    #[test]
    fn test_named_table_keeps_file_order() {
        let yml = r#"
routes:
  zeta:
    uri: z
  alpha:
    uri: a
"#;
        let config: RouterConfig = serde_yaml::from_str(yml).unwrap();
        let names: Vec<String> = config.routes.entries().into_iter().map(|(n, _)| n).collect();
        assert_eq!(names, ["zeta", "alpha"]);
    }

    #[test]
    fn test_listed_table_generates_missing_names() {
        let yml = r#"
routes:
  - name: home
    uri: ""
  - uri: about
"#;
        let config: RouterConfig = serde_yaml::from_str(yml).unwrap();
        let entries = config.routes.entries();
        assert_eq!(entries[0].0, "home");
        assert!(entries[1].0.starts_with("route-"));
        assert_eq!(entries[1].1.uri, "about");
    }

    #[test]
    fn test_defaults_when_fields_absent() {
        let config: RouterConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, RouterConfig::default());
        assert_eq!(config.default_protocol, "http://");
        assert_eq!(config.site.base_url, "/");
        assert!(config.routes.is_empty());
    }

    #[test]
    fn test_json_config() {
        let json = r#"{"routes": {"test": {"uri": "route-test/<id>", "regex": {"id": "\\w+"}}}}"#;
        let config: RouterConfig = serde_json::from_str(json).unwrap();
        let entries = config.routes.entries();
        assert_eq!(entries[0].1.regex["id"], r"\w+");
    }
}
