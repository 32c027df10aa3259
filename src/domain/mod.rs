// Domain model for routes
//
// Route entries own a compiled template, their defaults and their filters.
// Nothing in here knows about the registry or about configuration files.

use std::collections::HashMap;

pub mod defaults;
pub mod entry;
pub mod filter;
pub mod template;

pub use defaults::{DefaultValue, Defaults};
pub use entry::{HostPolicy, RouteEntry, RouteSpec};
pub use filter::{DecodeFilter, FilterOutcome, FilterRegistry, RouteFilter, TrimFilter};

/// Parameters extracted by a match, or supplied to URL generation
pub type Params = HashMap<String, String>;
