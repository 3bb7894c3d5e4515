//! Scaffold command: materialize missing settings files for targets.

use anyhow::Context;
use serde::Serialize;

use crate::context::AppContext;
use crate::scaffold::{self, ScaffoldOutcome, SkipReason, scaffold_inventory};
use crate::targets::Target;
use crate::types::TargetKind;

/// Which targets to scaffold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScaffoldSelection {
    One { kind: TargetKind, name: String },
    Kind(TargetKind),
    All,
}

#[derive(Debug, Clone)]
pub struct ScaffoldOptions {
    pub selection: ScaffoldSelection,
}

impl ScaffoldOptions {
    pub fn target(kind: TargetKind, name: impl Into<String>) -> Self {
        Self {
            selection: ScaffoldSelection::One {
                kind,
                name: name.into(),
            },
        }
    }

    pub fn kind(kind: TargetKind) -> Self {
        Self {
            selection: ScaffoldSelection::Kind(kind),
        }
    }

    pub fn all() -> Self {
        Self {
            selection: ScaffoldSelection::All,
        }
    }
}

/// Outcomes for a single target.
#[derive(Debug, Clone, Serialize)]
pub struct TargetScaffold {
    pub target: Target,
    pub outcomes: Vec<ScaffoldOutcome>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScaffoldReport {
    pub targets: Vec<TargetScaffold>,
}

impl ScaffoldReport {
    /// Number of files written across all targets.
    pub fn written_count(&self) -> usize {
        self.targets
            .iter()
            .flat_map(|t| &t.outcomes)
            .filter(|o| o.written().is_some())
            .count()
    }
}

#[derive(Debug)]
pub struct ScaffoldCommand<'a> {
    ctx: &'a AppContext,
}

impl<'a> ScaffoldCommand<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        Self { ctx }
    }

    pub fn execute(&self, options: &ScaffoldOptions) -> anyhow::Result<ScaffoldReport> {
        let catalog = self.ctx.catalog();
        let targets = match &options.selection {
            ScaffoldSelection::One { kind, name } => vec![catalog.resolve(*kind, name)?],
            ScaffoldSelection::Kind(kind) => catalog.list(*kind)?,
            ScaffoldSelection::All => catalog.list_all()?,
        };

        let mut report = ScaffoldReport {
            targets: Vec::with_capacity(targets.len()),
        };
        for target in targets {
            let outcomes = scaffold_target(self.ctx, &target).with_context(|| {
                format!("Failed to scaffold {} target '{}'", target.kind, target.name)
            })?;
            report.targets.push(TargetScaffold { target, outcomes });
        }
        Ok(report)
    }
}

/// Scaffold every missing artifact for `target`: its settings file and, for
/// Ansible playbooks, a default inventory.
pub fn scaffold_target(ctx: &AppContext, target: &Target) -> anyhow::Result<Vec<ScaffoldOutcome>> {
    let mut outcomes = Vec::new();

    match ctx.family_for(target.kind)? {
        Some(family) => {
            let sources = target.sources()?;
            outcomes.push(scaffold::generate_for_sources(
                &target.name,
                &sources,
                &target.dir,
                &family,
            )?);
        }
        None => outcomes.push(ScaffoldOutcome::Skipped {
            reason: SkipReason::NoFamily(target.kind),
        }),
    }

    if target.kind == TargetKind::Ansible {
        outcomes.push(scaffold_inventory(&target.config_path)?);
    }

    Ok(outcomes)
}
