// Route filter trait and implementations

use std::collections::HashMap;
use std::sync::Arc;

use super::entry::RouteEntry;
use super::Params;

/// What a filter decided about a match
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterOutcome {
    /// Leave the parameters as they are
    Pass,
    /// Use these parameters from now on
    Replace(Params),
    /// Reject the match
    Veto,
}

/// Hook run after a route matched and defaults were applied.
///
/// Filters run in the order they were added to the route. The first
/// [`FilterOutcome::Veto`] turns the match into a miss; a
/// [`FilterOutcome::Replace`] is what later filters (and the caller) see.
pub trait RouteFilter: Send + Sync {
    fn filter(&self, entry: &RouteEntry, params: &Params, path: &str) -> FilterOutcome;
}

impl<F> RouteFilter for F
where
    F: Fn(&RouteEntry, &Params, &str) -> FilterOutcome + Send + Sync,
{
    fn filter(&self, entry: &RouteEntry, params: &Params, path: &str) -> FilterOutcome {
        self(entry, params, path)
    }
}

/// Trim surrounding whitespace from every value
pub struct TrimFilter;

impl RouteFilter for TrimFilter {
    fn filter(&self, _entry: &RouteEntry, params: &Params, _path: &str) -> FilterOutcome {
        if params.values().all(|v| v.trim() == v) {
            return FilterOutcome::Pass;
        }
        let trimmed = params
            .iter()
            .map(|(k, v)| (k.clone(), v.trim().to_string()))
            .collect();
        FilterOutcome::Replace(trimmed)
    }
}

/// Percent-decode every value; a value that does not decode to UTF-8 vetoes
pub struct DecodeFilter;

impl RouteFilter for DecodeFilter {
    fn filter(&self, _entry: &RouteEntry, params: &Params, _path: &str) -> FilterOutcome {
        if !params.values().any(|v| v.contains('%')) {
            return FilterOutcome::Pass;
        }
        let mut decoded = Params::with_capacity(params.len());
        for (key, value) in params {
            match urlencoding::decode(value) {
                Ok(value) => {
                    decoded.insert(key.clone(), value.into_owned());
                }
                Err(_) => return FilterOutcome::Veto,
            }
        }
        FilterOutcome::Replace(decoded)
    }
}

/// Named filters that routes loaded from configuration can refer to
#[derive(Clone)]
pub struct FilterRegistry {
    filters: HashMap<String, Arc<dyn RouteFilter>>,
}

impl FilterRegistry {
    /// A registry holding the built-in `trim` and `decode` filters
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("trim", TrimFilter);
        registry.register("decode", DecodeFilter);
        registry
    }

    pub fn empty() -> Self {
        Self {
            filters: HashMap::new(),
        }
    }

    pub fn register(&mut self, name: impl Into<String>, filter: impl RouteFilter + 'static) {
        self.filters.insert(name.into(), Arc::new(filter));
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn RouteFilter>> {
        self.filters.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.filters.contains_key(name)
    }
}

impl Default for FilterRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut names: Vec<&String> = self.filters.keys().collect();
        names.sort();
        f.debug_struct("FilterRegistry").field("filters", &names).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::RouteSpec;

    fn entry() -> RouteEntry {
        RouteEntry::build("test", RouteSpec::new("<id>"), &FilterRegistry::empty(), Arc::default()).unwrap()
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_trim_filter() {
        let entry = entry();
        let outcome = TrimFilter.filter(&entry, &params(&[("id", "  7 ")]), "7");
        assert_eq!(outcome, FilterOutcome::Replace(params(&[("id", "7")])));
        assert_eq!(TrimFilter.filter(&entry, &params(&[("id", "7")]), "7"), FilterOutcome::Pass);
    }

    #[test]
    fn test_decode_filter() {
        let entry = entry();
        let outcome = DecodeFilter.filter(&entry, &params(&[("q", "hello%20world")]), "");
        assert_eq!(outcome, FilterOutcome::Replace(params(&[("q", "hello world")])));
        assert_eq!(DecodeFilter.filter(&entry, &params(&[("q", "plain")]), ""), FilterOutcome::Pass);
    }

    #[test]
    fn test_decode_filter_vetoes_invalid_utf8() {
        let entry = entry();
        let outcome = DecodeFilter.filter(&entry, &params(&[("q", "%FF%FE")]), "");
        assert_eq!(outcome, FilterOutcome::Veto);
    }

    #[test]
    fn test_closure_is_a_filter() {
        let entry = entry();
        let veto_all = |_: &RouteEntry, _: &Params, _: &str| FilterOutcome::Veto;
        assert_eq!(veto_all.filter(&entry, &Params::new(), ""), FilterOutcome::Veto);
    }

    #[test]
    fn test_registry() {
        let registry = FilterRegistry::new();
        assert!(registry.get("trim").is_some());
        assert!(registry.get("decode").is_some());
        assert!(registry.get("unknown").is_none());
        assert!(!FilterRegistry::empty().contains("trim"));
    }
}
