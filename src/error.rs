// Error handling for pathway
//
// Matching never produces an error: a path that does not satisfy a route is
// reported as `None`. Everything here is a configuration or programmer error.

use thiserror::Error;

/// A template that cannot be turned into a matcher.
#[derive(Debug, Error)]
pub enum CompileError {
    #[error("unbalanced ')' at position {position}")]
    UnbalancedGroup { position: usize },

    #[error("group opened at position {position} is never closed")]
    UnclosedGroup { position: usize },

    #[error("invalid key at position {position}: {reason}")]
    InvalidKey { position: usize, reason: String },

    #[error("key <{key}> appears more than once")]
    DuplicateKey { key: String },

    #[error("invalid matching expression: {0}")]
    Pattern(#[from] regex::Error),
}

/// Errors raised by route registration, lookup and URL generation.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route '{route}' has an invalid template: {source}")]
    Compile {
        route: String,
        #[source]
        source: CompileError,
    },

    #[error("invalid route filter specified: {name}")]
    FilterInvalid { name: String },

    #[error("the requested route does not exist: {name}")]
    NotFound { name: String },

    #[error("required route parameter not passed: {param}")]
    Generation { route: String, param: String },
}

impl RouteError {
    pub(crate) fn compile(route: &str, source: CompileError) -> Self {
        RouteError::Compile {
            route: route.to_string(),
            source,
        }
    }
}

/// Errors raised while loading a routes file or registering its contents.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),

    #[error(transparent)]
    Route(#[from] RouteError),
}
