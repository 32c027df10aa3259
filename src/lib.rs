// pathway: named URI routes with optional segments
//
// Templates such as `<controller>(/<action>(/<id>))` are compiled into
// anchored matchers and kept in a named registry. The same template drives
// matching (path -> parameters) and generation (parameters -> URL).

pub mod config;
pub mod domain;
pub mod error;
pub mod registry;
pub mod site;
pub mod validation;

pub use config::{load_config, RouteSettings, RouteTable, RouterConfig, SiteConfig};
pub use domain::template::{compile, CompiledMatcher, Template, TemplateNode, TemplateParser};
pub use domain::{
    DecodeFilter, DefaultValue, Defaults, FilterOutcome, FilterRegistry, HostPolicy, Params, RouteEntry, RouteFilter,
    RouteSpec, TrimFilter,
};
pub use error::{CompileError, ConfigError, RouteError};
pub use registry::{Registry, RouteMatch};
pub use site::{SiteUrl, UrlComposer};
