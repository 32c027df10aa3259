// Route entries: a compiled template plus defaults and filters

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::RouteError;

use super::defaults::{DefaultValue, Defaults};
use super::filter::{FilterOutcome, FilterRegistry, RouteFilter};
use super::template::{compile_template, CompiledMatcher, MissingParam, Template, TemplateParser, TemplateResolver};
use super::Params;

/// Keys whose values are title-cased on match and lower-cased on generation
const NAME_KEYS: [&str; 2] = ["controller", "directory"];

/// Decides which `host` defaults are local and how external hosts are written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostPolicy {
    /// Prefixed to external hosts that carry no scheme
    pub default_protocol: String,
    /// `host` values that mean "this site"; an absent host is always local
    pub local_hosts: Vec<String>,
}

impl HostPolicy {
    pub fn is_local(&self, host: Option<&str>) -> bool {
        match host {
            None => true,
            Some(host) => self.local_hosts.iter().any(|local| local == host),
        }
    }
}

impl Default for HostPolicy {
    fn default() -> Self {
        Self {
            default_protocol: "http://".to_string(),
            local_hosts: vec![String::new(), "local".to_string(), "localhost".to_string()],
        }
    }
}

enum FilterRef {
    Inline(Arc<dyn RouteFilter>),
    Named(String),
}

/// Everything needed to build a [`RouteEntry`]: template, key overrides,
/// defaults and filters.
///
/// ```
/// use pathway::RouteSpec;
///
/// let spec = RouteSpec::new("<controller>(/<action>(/<id>))")
///     .regex("id", r"\d+")
///     .default("controller", "welcome")
///     .default("action", "index")
///     .named_filter("trim");
/// assert_eq!(spec.uri(), "<controller>(/<action>(/<id>))");
/// ```
pub struct RouteSpec {
    uri: String,
    regex: HashMap<String, String>,
    defaults: Defaults,
    filters: Vec<FilterRef>,
}

impl RouteSpec {
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            regex: HashMap::new(),
            defaults: Defaults::new(),
            filters: Vec::new(),
        }
    }

    /// Match `key` with `expression` instead of the default segment pattern
    pub fn regex(mut self, key: impl Into<String>, expression: impl Into<String>) -> Self {
        self.regex.insert(key.into(), expression.into());
        self
    }

    pub fn regexes(mut self, overrides: HashMap<String, String>) -> Self {
        self.regex.extend(overrides);
        self
    }

    /// Replace all defaults
    pub fn defaults(mut self, defaults: Defaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn default(mut self, key: impl Into<String>, value: impl Into<DefaultValue>) -> Self {
        self.defaults.insert(key, value);
        self
    }

    /// Only match requests made with one of these methods
    pub fn methods<I, S>(mut self, methods: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.defaults = self.defaults.with_methods(methods);
        self
    }

    pub fn filter(mut self, filter: impl RouteFilter + 'static) -> Self {
        self.filters.push(FilterRef::Inline(Arc::new(filter)));
        self
    }

    /// Add a filter by the name it has in the registry's [`FilterRegistry`]
    pub fn named_filter(mut self, name: impl Into<String>) -> Self {
        self.filters.push(FilterRef::Named(name.into()));
        self
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }
}

/// A named, compiled route.
///
/// The matcher is compiled when the entry is built and never changes; an
/// entry is replaced as a whole rather than modified.
pub struct RouteEntry {
    name: String,
    template: Template,
    regex: HashMap<String, String>,
    defaults: Defaults,
    filters: Vec<Arc<dyn RouteFilter>>,
    matcher: CompiledMatcher,
    policy: Arc<HostPolicy>,
}

impl RouteEntry {
    /// Compile `spec` into an entry, resolving named filters against `named`.
    pub fn build(
        name: &str,
        spec: RouteSpec,
        named: &FilterRegistry,
        policy: Arc<HostPolicy>,
    ) -> Result<Self, RouteError> {
        let template = TemplateParser::parse(&spec.uri).map_err(|e| RouteError::compile(name, e))?;
        let matcher = compile_template(&template, &spec.regex).map_err(|e| RouteError::compile(name, e))?;

        let filters = spec
            .filters
            .into_iter()
            .map(|filter| match filter {
                FilterRef::Inline(filter) => Ok(filter),
                FilterRef::Named(filter_name) => named
                    .get(&filter_name)
                    .ok_or(RouteError::FilterInvalid { name: filter_name }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            name: name.to_string(),
            template,
            regex: spec.regex,
            defaults: spec.defaults,
            filters,
            matcher,
            policy,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn uri(&self) -> &str {
        self.template.source()
    }

    pub fn template(&self) -> &Template {
        &self.template
    }

    pub fn regex(&self) -> &HashMap<String, String> {
        &self.regex
    }

    pub fn defaults(&self) -> &Defaults {
        &self.defaults
    }

    pub fn matcher(&self) -> &CompiledMatcher {
        &self.matcher
    }

    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// Whether the `host` default points to another site
    pub fn is_external(&self) -> bool {
        !self.policy.is_local(self.defaults.host())
    }

    /// Match `path` (surrounding `/` ignored) made with `method`.
    ///
    /// Returns `None` when the pattern does not match, the method is not
    /// accepted, or a filter vetoes the match.
    pub fn matches(&self, path: &str, method: Option<&str>) -> Option<Params> {
        let uri = path.trim_matches('/');
        tracing::debug!(route = %self.name, uri, "begin to match uri");

        let Some(mut params) = self.matcher.try_match(uri) else {
            tracing::debug!(
                route = %self.name,
                regex = self.matcher.as_str(),
                uri,
                method,
                "route did not match"
            );
            return None;
        };

        // Empty captures count as missing
        let mut allowed_methods = None;
        for (key, value) in self.defaults.iter() {
            if params.get(key).is_some_and(|v| !v.is_empty()) {
                continue;
            }
            match value {
                DefaultValue::One(value) => {
                    params.insert(key.clone(), value.clone());
                }
                DefaultValue::Many(_) if key == "method" => {
                    params.remove(key);
                    allowed_methods = Some(value);
                }
                DefaultValue::Many(values) => {
                    params.insert(key.clone(), values.join(","));
                }
            }
        }

        tracing::debug!(route = %self.name, uri, params = ?params, "set route params");

        let constraint = match params.get("method") {
            Some(captured) if !captured.is_empty() => Some(Cow::Owned(DefaultValue::One(captured.clone()))),
            _ => allowed_methods.filter(|v| !v.is_empty()).map(Cow::Borrowed),
        };
        if let Some(constraint) = constraint {
            match method {
                Some(method) if constraint.accepts(method) => {
                    params.insert("method".to_string(), method.to_string());
                }
                _ => {
                    tracing::warn!(
                        route = %self.name,
                        uri,
                        param_method = ?constraint,
                        request_method = method,
                        "requested http method did not match"
                    );
                    return None;
                }
            }
        }

        for key in NAME_KEYS {
            if let Some(value) = params.get_mut(key) {
                if !value.is_empty() {
                    *value = title_case(value);
                }
            }
        }

        for filter in &self.filters {
            match filter.filter(self, &params, uri) {
                FilterOutcome::Pass => {}
                FilterOutcome::Replace(replacement) => params = replacement,
                FilterOutcome::Veto => {
                    tracing::debug!(route = %self.name, uri, "match vetoed by filter");
                    return None;
                }
            }
        }

        tracing::debug!(route = %self.name, uri, method, params = ?params, "final matched route params");
        Some(params)
    }

    /// Build this route's path from `params`.
    ///
    /// Optional groups are written only when they hold a value that differs
    /// from its default. External routes come back as absolute URLs.
    pub fn generate(&self, params: &Params) -> Result<String, RouteError> {
        let params = lower_name_keys(params);
        let path = TemplateResolver::new(&self.defaults)
            .resolve(&self.template, &params)
            .map_err(|MissingParam(param)| RouteError::Generation {
                route: self.name.clone(),
                param,
            })?;

        tracing::debug!(route = %self.name, path = %path, "generated route path");

        if self.is_external() {
            let host = self.defaults.host().unwrap_or_default();
            let host = if host.contains("://") {
                host.to_string()
            } else {
                format!("{}{}", self.policy.default_protocol, host)
            };
            return Ok(format!("{}/{}", host.trim_end_matches('/'), path));
        }

        Ok(path)
    }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("name", &self.name)
            .field("uri", &self.template.source())
            .field("regex", &self.regex)
            .field("defaults", &self.defaults)
            .field("filters", &self.filters.len())
            .field("matcher", &self.matcher.as_str())
            .finish()
    }
}

/// `foo_bar` and `foo bar` both become `Foo_Bar`
fn title_case(value: &str) -> String {
    value
        .split(|c| c == '_' || c == ' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join("_")
}

fn lower_name_keys(params: &Params) -> Cow<'_, Params> {
    if !NAME_KEYS.iter().any(|key| params.contains_key(*key)) {
        return Cow::Borrowed(params);
    }
    let mut params = params.clone();
    for key in NAME_KEYS {
        if let Some(value) = params.get_mut(key) {
            *value = value.to_lowercase();
        }
    }
    Cow::Owned(params)
}
