// Named collection of route entries

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use parking_lot::Mutex;
use std::fmt;
use std::sync::Arc;

use crate::domain::{FilterRegistry, HostPolicy, Params, RouteEntry, RouteSpec};
use crate::error::RouteError;
use crate::site::{SiteUrl, UrlComposer};

type RouteMap = IndexMap<String, Arc<RouteEntry>>;

/// The first route that accepted a path
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub name: String,
    pub entry: Arc<RouteEntry>,
    pub params: Params,
}

/// Insertion-ordered mapping from route name to [`RouteEntry`].
///
/// Readers work on an immutable snapshot and never block. Registration
/// builds the new entry first and then publishes a new snapshot, so a lookup
/// racing with registration sees either the old table or the new one.
pub struct Registry {
    routes: ArcSwap<RouteMap>,
    write_lock: Mutex<()>,
    filters: FilterRegistry,
    policy: Arc<HostPolicy>,
    composer: Arc<dyn UrlComposer>,
}

impl Registry {
    pub fn new() -> Self {
        Self {
            routes: ArcSwap::from_pointee(RouteMap::new()),
            write_lock: Mutex::new(()),
            filters: FilterRegistry::new(),
            policy: Arc::new(HostPolicy::default()),
            composer: Arc::new(SiteUrl::default()),
        }
    }

    /// Named filters available to routes registered from now on
    pub fn with_filters(mut self, filters: FilterRegistry) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_host_policy(mut self, policy: HostPolicy) -> Self {
        self.policy = Arc::new(policy);
        self
    }

    /// Composer used by [`Registry::url`] for local routes
    pub fn with_url_composer(mut self, composer: impl UrlComposer + 'static) -> Self {
        self.composer = Arc::new(composer);
        self
    }

    /// Register `spec` under `name`.
    ///
    /// If `name` is taken and `force` is false the existing entry is returned
    /// untouched. Otherwise a new entry is compiled and stored, replacing any
    /// previous one in place.
    pub fn register(&self, name: &str, spec: RouteSpec, force: bool) -> Result<Arc<RouteEntry>, RouteError> {
        let _guard = self.write_lock.lock();
        let current = self.routes.load_full();

        if !force {
            if let Some(existing) = current.get(name) {
                tracing::debug!(name, uri = spec.uri(), "route already registered, keeping existing entry");
                return Ok(Arc::clone(existing));
            }
        }

        tracing::debug!(name, uri = spec.uri(), force, "registering route");
        let entry = Arc::new(RouteEntry::build(name, spec, &self.filters, Arc::clone(&self.policy))?);

        let mut next = RouteMap::clone(&current);
        next.insert(name.to_string(), Arc::clone(&entry));
        self.routes.store(Arc::new(next));

        Ok(entry)
    }

    /// Register `spec` under `name`, replacing any existing entry
    pub fn replace(&self, name: &str, spec: RouteSpec) -> Result<Arc<RouteEntry>, RouteError> {
        self.register(name, spec, true)
    }

    pub fn get(&self, name: &str) -> Result<Arc<RouteEntry>, RouteError> {
        let routes = self.routes.load();
        match routes.get(name) {
            Some(entry) => Ok(Arc::clone(entry)),
            None => {
                tracing::error!(
                    name,
                    exists = ?routes.keys().collect::<Vec<_>>(),
                    "getting unknown route"
                );
                Err(RouteError::NotFound {
                    name: name.to_string(),
                })
            }
        }
    }

    pub fn exists(&self, name: &str) -> bool {
        self.routes.load().contains_key(name)
    }

    /// Snapshot of every route in registration order
    pub fn all(&self) -> Arc<IndexMap<String, Arc<RouteEntry>>> {
        self.routes.load_full()
    }

    pub fn len(&self) -> usize {
        self.routes.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.load().is_empty()
    }

    /// Generate the URL of route `name`.
    ///
    /// External routes already produce absolute URLs; local ones are passed
    /// through the site composer together with `protocol`.
    pub fn url(&self, name: &str, params: &Params, protocol: Option<&str>) -> Result<String, RouteError> {
        let entry = self.get(name)?;
        let path = entry.generate(params)?;
        if entry.is_external() {
            return Ok(path);
        }
        Ok(self.composer.site(&path, protocol))
    }

    /// Try every route in registration order and return the first match
    pub fn find(&self, path: &str, method: Option<&str>) -> Option<RouteMatch> {
        let routes = self.routes.load();
        routes.iter().find_map(|(name, entry)| {
            entry.matches(path, method).map(|params| RouteMatch {
                name: name.clone(),
                entry: Arc::clone(entry),
                params,
            })
        })
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("routes", &self.routes.load().keys().collect::<Vec<_>>())
            .field("filters", &self.filters)
            .field("policy", &self.policy)
            .finish()
    }
}
