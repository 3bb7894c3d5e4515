//! High-level commands for turnkey operations.
//!
//! These are the public API used by the CLI frontend.

pub mod action;
pub mod scaffold;
pub mod stop_all;

pub use action::{ActionCommand, ActionOptions, ActionReport};
pub use scaffold::{
    ScaffoldCommand, ScaffoldOptions, ScaffoldReport, ScaffoldSelection, TargetScaffold,
    scaffold_target,
};
pub use stop_all::{StopAllCommand, StopAllOptions, StopAllReport};

pub use crate::status::{StatusCommand, StatusOptions, StatusReport};
