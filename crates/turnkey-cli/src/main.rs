//! Turnkey - deployment target dispatcher
//!
//! Usage:
//!   turnkey list [KIND]            # Discover targets
//!   turnkey scaffold KIND NAME     # Generate missing settings files
//!   turnkey deploy KIND NAME       # Scaffold, then run the target's tool
//!   turnkey stop-all               # Stop every running docker container
//!   turnkey status                 # Show target state
//!   turnkey doctor                 # Check external tools are installed

mod prompt;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use console::style;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use turnkey_core::commands::{
    ActionCommand, ActionOptions, ActionReport, ScaffoldCommand, ScaffoldOptions, ScaffoldReport,
    StatusCommand, StatusOptions, StopAllCommand, StopAllOptions, StopAllReport,
};
use turnkey_core::context::AppContext;
use turnkey_core::deploy::{Action, AssumeYes, Confirm, ExecutionStatus};
use turnkey_core::doctor::{DependencyStatus, check_dependencies};
use turnkey_core::scaffold::ScaffoldOutcome;
use turnkey_core::status::{SettingsState, StatusReport, TargetState};
use turnkey_core::targets::Target;
use turnkey_core::tools::SystemRunner;
use turnkey_core::types::TargetKind;

use crate::prompt::TerminalConfirm;

#[derive(Parser)]
#[command(name = "turnkey")]
#[command(about = "Deploy docker, kubernetes, ansible and terraform targets", long_about = None)]
struct Cli {
    /// Workspace root (defaults to $TURNKEY_ROOT, then the current directory)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List discovered targets
    #[command(alias = "ls")]
    List {
        /// Only list targets of this kind (docker, kubernetes, ansible, terraform)
        kind: Option<TargetKind>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Generate missing settings files with placeholder values
    ///
    /// Existing files are never overwritten.
    Scaffold(ScaffoldArgs),

    /// Scaffold missing settings, then deploy a target
    Deploy {
        #[command(flatten)]
        target: TargetArgs,

        /// Skip all confirmation prompts (for CI/CD)
        #[arg(short = 'y', long)]
        yes: bool,

        /// Do not stop to review newly generated settings files
        #[arg(long)]
        no_review: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Stop or tear down a deployed target
    Stop {
        #[command(flatten)]
        target: TargetArgs,

        /// Skip all confirmation prompts
        #[arg(short = 'y', long)]
        yes: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Stop every running docker container, not only turnkey targets
    StopAll {
        /// Skip the confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Validate a target's configuration with its tool
    Check {
        #[command(flatten)]
        target: TargetArgs,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Show target status
    Status {
        /// Only show targets of this kind
        kind: Option<TargetKind>,

        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },

    /// Check that the external tools are installed
    Doctor {
        /// Output format
        #[arg(short, long, default_value = "table")]
        format: OutputFormat,
    },
}

#[derive(Args)]
struct TargetArgs {
    /// Target kind (docker, kubernetes, ansible, terraform)
    kind: TargetKind,
    /// Target name
    name: String,
}

#[derive(Args)]
struct ScaffoldArgs {
    /// Target kind; with --all, limits scaffolding to this kind
    kind: Option<TargetKind>,
    /// Target name
    name: Option<String>,
    /// Scaffold every discovered target
    #[arg(long, short, conflicts_with = "name")]
    all: bool,
    /// Output format
    #[arg(short, long, default_value = "table")]
    format: OutputFormat,
}

#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// Machine-readable JSON
    Json,
    /// Only show issues (non-zero exit if problems)
    Quiet,
}

fn main() -> Result<()> {
    // Logs go to stderr so JSON output on stdout stays parseable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "turnkey_core=info,turnkey=info,warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::with_defaults(cli.root)?;
    tracing::debug!(root = %ctx.root().display(), "Loaded workspace configuration");

    match cli.command {
        Commands::List { kind, format } => run_list(&ctx, kind, format),
        Commands::Scaffold(args) => run_scaffold(&ctx, args),
        Commands::Deploy {
            target,
            yes,
            no_review,
            format,
        } => {
            let options = ActionOptions::deploy(target.kind, target.name)
                .with_assume_yes(yes)
                .with_review(!no_review);
            run_action(&ctx, options, format)
        }
        Commands::Stop {
            target,
            yes,
            format,
        } => {
            let options = ActionOptions::stop(target.kind, target.name).with_assume_yes(yes);
            run_action(&ctx, options, format)
        }
        Commands::StopAll { yes, format } => {
            run_stop_all(StopAllOptions::new().with_assume_yes(yes), format)
        }
        Commands::Check { target, format } => {
            let options = ActionOptions::check(target.kind, target.name);
            run_action(&ctx, options, format)
        }
        Commands::Status { kind, format } => run_status(&ctx, kind, format),
        Commands::Doctor { format } => run_doctor(format),
    }
}

fn run_list(ctx: &AppContext, kind: Option<TargetKind>, format: OutputFormat) -> Result<()> {
    let catalog = ctx.catalog();
    let targets = match kind {
        Some(kind) => catalog.list(kind)?,
        None => catalog.list_all()?,
    };

    match format {
        OutputFormat::Table => print_targets(ctx, &targets),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": 1,
                "root": ctx.root(),
                "targets": targets,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn run_scaffold(ctx: &AppContext, args: ScaffoldArgs) -> Result<()> {
    let options = match (args.all, args.kind, args.name) {
        (true, Some(kind), _) => ScaffoldOptions::kind(kind),
        (true, None, _) => ScaffoldOptions::all(),
        (false, Some(kind), Some(name)) => ScaffoldOptions::target(kind, name),
        (false, _, _) => {
            anyhow::bail!("Specify a target (turnkey scaffold <kind> <name>) or use --all")
        }
    };

    let report = ScaffoldCommand::new(ctx).execute(&options)?;

    match args.format {
        OutputFormat::Table => print_scaffold(&report),
        OutputFormat::Json => {
            let output = serde_json::json!({
                "schema_version": 1,
                "written": report.written_count(),
                "targets": report.targets,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Quiet => {}
    }
    Ok(())
}

fn run_action(ctx: &AppContext, options: ActionOptions, format: OutputFormat) -> Result<()> {
    let runner = SystemRunner;
    let terminal = TerminalConfirm::new();
    let confirm: &dyn Confirm = if options.assume_yes {
        &AssumeYes
    } else {
        &terminal
    };

    let report = ActionCommand::new(ctx, &runner).execute(&options, confirm)?;

    match format {
        OutputFormat::Table => print_action(&report),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Quiet => {}
    }

    if !report.completed() {
        std::process::exit(2);
    }
    Ok(())
}

fn run_stop_all(options: StopAllOptions, format: OutputFormat) -> Result<()> {
    let runner = SystemRunner;
    let terminal = TerminalConfirm::new();
    let confirm: &dyn Confirm = if options.assume_yes {
        &AssumeYes
    } else {
        &terminal
    };

    let report = StopAllCommand::new(&runner).execute(&options, confirm)?;

    match format {
        OutputFormat::Table => print_stop_all(&report),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Quiet => {}
    }

    if !report.completed() {
        std::process::exit(2);
    }
    Ok(())
}

fn run_status(ctx: &AppContext, kind: Option<TargetKind>, format: OutputFormat) -> Result<()> {
    let runner = SystemRunner;
    let mut options = StatusOptions::new();
    if let Some(kind) = kind {
        options = options.with_kind(kind);
    }

    let report = StatusCommand::new(ctx, &runner).execute(&options)?;

    match format {
        OutputFormat::Table => print_status(&report),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        OutputFormat::Quiet => {
            if report.summary.missing_settings > 0 {
                println!(
                    "{} targets missing settings files",
                    report.summary.missing_settings
                );
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

fn run_doctor(format: OutputFormat) -> Result<()> {
    let deps = check_dependencies(&SystemRunner);
    let missing = deps.iter().filter(|d| !d.is_available()).count();

    match format {
        OutputFormat::Table => print_doctor(&deps),
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&deps)?);
        }
        OutputFormat::Quiet => {
            if missing > 0 {
                println!("{} tools missing", missing);
                std::process::exit(1);
            }
        }
    }
    Ok(())
}

// =============================================================================
// Output
// =============================================================================

fn print_targets(ctx: &AppContext, targets: &[Target]) {
    if targets.is_empty() {
        println!("No targets found under {}", ctx.root().display());
        return;
    }

    println!("  {:<12} {:<20} Config", "Kind", "Name");
    println!("  {}", "-".repeat(70));
    for target in targets {
        let config = target
            .config_path
            .strip_prefix(ctx.root())
            .unwrap_or(&target.config_path);
        println!(
            "  {:<12} {:<20} {}",
            target.kind.as_str(),
            truncate(&target.name, 20),
            config.display()
        );
    }
}

fn print_scaffold(report: &ScaffoldReport) {
    if report.targets.is_empty() {
        println!("No targets found.");
        return;
    }

    for entry in &report.targets {
        for outcome in &entry.outcomes {
            match outcome {
                ScaffoldOutcome::Written(file) => println!(
                    "{} {} '{}': wrote {} ({} variables)",
                    style("✓").green(),
                    entry.target.kind,
                    entry.target.name,
                    file.path.display(),
                    file.variable_count
                ),
                ScaffoldOutcome::Skipped { reason } => println!(
                    "- {} '{}': skipped, {}",
                    entry.target.kind, entry.target.name, reason
                ),
            }
        }
    }
    println!();
    println!("Summary: {} files written", report.written_count());
}

fn print_action(report: &ActionReport) {
    print_scaffold_outcomes(report);

    for step in &report.steps {
        println!("{} {}", style("✓").green(), step.command);
        let stdout = step.stdout.trim();
        if !stdout.is_empty() {
            for line in stdout.lines() {
                println!("    {}", line);
            }
        }
    }

    match &report.status {
        ExecutionStatus::Completed => println!(
            "{} {} {} '{}'",
            style("✓").green(),
            action_past_tense(report.action),
            report.target.kind,
            report.target.name
        ),
        ExecutionStatus::Aborted { declined } => println!(
            "{} {} of '{}' stopped before: {}",
            style("⚠").yellow(),
            report.action,
            report.target.name,
            declined
        ),
    }
}

fn print_scaffold_outcomes(report: &ActionReport) {
    for outcome in &report.scaffolded {
        if let ScaffoldOutcome::Written(file) = outcome {
            println!(
                "{} Generated {} ({} variables), review before production use",
                style("✓").green(),
                file.path.display(),
                file.variable_count
            );
        }
    }
}

fn action_past_tense(action: Action) -> &'static str {
    match action {
        Action::Deploy => "Deployed",
        Action::Stop => "Stopped",
        Action::Check => "Checked",
    }
}

fn print_stop_all(report: &StopAllReport) {
    match &report.status {
        ExecutionStatus::Completed if report.containers.is_empty() => {
            println!("No running containers.")
        }
        ExecutionStatus::Completed => println!(
            "{} Stopped {} containers",
            style("✓").green(),
            report.containers.len()
        ),
        ExecutionStatus::Aborted { .. } => println!(
            "{} Left {} containers running",
            style("⚠").yellow(),
            report.containers.len()
        ),
    }
}

fn print_status(report: &StatusReport) {
    println!("Root: {}", report.root.display());
    println!();

    if report.targets.is_empty() {
        println!("No targets found.");
        return;
    }

    println!(
        "  {:<12} {:<20} {:<14} Settings",
        "Kind", "Name", "State"
    );
    println!("  {}", "-".repeat(60));
    for target in &report.targets {
        println!(
            "  {:<12} {:<20} {:<14} {}",
            target.kind.as_str(),
            truncate(&target.name, 20),
            state_label(target.state),
            settings_label(target.settings)
        );
    }

    println!();
    if report.summary.missing_settings > 0 {
        println!(
            "Summary: {} targets, {} running, {} missing settings (run 'turnkey scaffold --all')",
            report.summary.total, report.summary.running, report.summary.missing_settings
        );
    } else {
        println!(
            "Summary: {} targets, {} running",
            report.summary.total, report.summary.running
        );
    }
}

fn print_doctor(deps: &[DependencyStatus]) {
    for dep in deps {
        match &dep.path {
            Some(path) => println!(
                "{} {:<18} {}",
                style("✓").green(),
                dep.binary,
                path.display()
            ),
            None => println!(
                "{} {:<18} missing ({})",
                style("✗").red(),
                dep.binary,
                dep.description
            ),
        }
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn state_label(state: TargetState) -> &'static str {
    match state {
        TargetState::Running => "running",
        TargetState::Stopped => "stopped",
        TargetState::Deployed => "deployed",
        TargetState::NotDeployed => "not deployed",
        TargetState::Unknown => "unknown",
    }
}

fn settings_label(settings: SettingsState) -> &'static str {
    match settings {
        SettingsState::Present => "[OK]",
        SettingsState::Missing => "[Missing]",
        SettingsState::NotApplicable => "-",
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len - 3).collect();
        format!("{}...", kept)
    }
}
