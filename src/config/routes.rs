use crate::{
    config::yml_settings::{RouteSettings, RouterConfig},
    domain::{FilterRegistry, RouteSpec},
    error::ConfigError,
    registry::Registry,
    site::SiteUrl,
};

impl From<&RouteSettings> for RouteSpec {
    fn from(settings: &RouteSettings) -> Self {
        settings.filters.iter().fold(
            RouteSpec::new(settings.uri.clone())
                .regexes(settings.regex.clone())
                .defaults(settings.defaults.clone()),
            |spec, filter| spec.named_filter(filter.clone()),
        )
    }
}

impl Registry {
    /// Build a registry from a routes file, using the built-in filters
    pub fn from_config(config: &RouterConfig) -> Result<Self, ConfigError> {
        Self::from_config_with_filters(config, FilterRegistry::new())
    }

    /// Build a registry from a routes file. Routes are registered in file
    /// order; the first route that fails to register aborts the load.
    pub fn from_config_with_filters(config: &RouterConfig, filters: FilterRegistry) -> Result<Self, ConfigError> {
        let registry = Registry::new()
            .with_filters(filters)
            .with_host_policy(config.host_policy())
            .with_url_composer(SiteUrl::new(&config.site));

        for (name, settings) in config.routes.entries() {
            registry.register(&name, RouteSpec::from(settings), settings.force)?;
        }

        tracing::info!(routes = registry.len(), "routes registered");
        Ok(registry)
    }
}
