//! Configuration for turnkey
//!
//! Two layers, both optional:
//! - Global: `$XDG_CONFIG_HOME/turnkey/turnkey.toml`
//! - Project: `<workspace root>/turnkey.toml`
//!
//! The project layer wins. Missing files leave the built-in defaults in place.

pub mod merge;
pub mod parser;
pub mod paths;
pub mod schema;
pub mod store;

pub use merge::merge_layers;
pub use parser::{parse_turnkey_toml, parse_turnkey_toml_str};
pub use paths::{CONFIG_FILE, global_config_path, project_config_path};
pub use schema::{ConfigLayer, FamilyConfig, PathsConfig, PathsLayer, TurnkeyConfig};
pub use store::ConfigStore;
