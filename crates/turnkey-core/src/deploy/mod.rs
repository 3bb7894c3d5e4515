//! Deploy coordination: action planning, confirmation and execution.

pub mod confirm;
pub mod executor;
pub mod plan;

pub use confirm::{AssumeNo, AssumeYes, Confirm};
pub use executor::{ExecutionReport, ExecutionStatus, StepReport, execute_plan, execute_steps};
pub use plan::{Action, ActionPlan, PlanStep, plan_action};
