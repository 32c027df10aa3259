// Configuration: routes files and bulk registration
//
// routes.yml / routes.json
//     -> loader.rs (parse & deserialize)
//     -> validation.rs (semantic checks)
//     -> routes.rs (register every record, in file order)

pub mod loader;
pub mod routes;
pub mod yml_settings;

pub use loader::{load_config, parse_json, parse_yaml};
pub use yml_settings::{RouteSettings, RouteTable, RouterConfig, SiteConfig};
