//! Turnkey Core Library
//!
//! Locates deployment targets on disk, scaffolds their missing settings
//! files, and drives the external tool that deploys them (docker compose,
//! helm, ansible-playbook, terraform).

pub mod commands;
pub mod config;
pub mod context;
pub mod deploy;
pub mod doctor;
pub mod scaffold;
pub mod status;
pub mod targets;
pub mod tools;
pub mod types;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigStore, FamilyConfig, TurnkeyConfig};
    pub use crate::context::AppContext;

    // Targets
    pub use crate::targets::{Target, TargetCatalog};
    pub use crate::types::TargetKind;

    // Scaffolding
    pub use crate::scaffold::{
        Classifier, GeneratedSettingsFile, PlaceholderFamily, ScaffoldError, ScaffoldOutcome,
        SettingsFormat, SkipReason,
    };

    // Tools and actions
    pub use crate::deploy::{Action, AssumeNo, AssumeYes, Confirm};
    pub use crate::tools::{CommandRunner, SystemRunner, Tool, ToolError, ToolInvocation, ToolOutput};
}
