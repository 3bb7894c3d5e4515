//! Confirmation callbacks.
//!
//! Prompts are injected rather than read from the terminal, so the deploy
//! flow runs unattended under [`AssumeYes`] and in tests.

/// Asks the operator a yes/no question.
pub trait Confirm {
    fn confirm(&self, prompt: &str) -> anyhow::Result<bool>;
}

/// Answers yes to everything (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _prompt: &str) -> anyhow::Result<bool> {
        Ok(true)
    }
}

/// Answers no to everything; used where no terminal is attached.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeNo;

impl Confirm for AssumeNo {
    fn confirm(&self, _prompt: &str) -> anyhow::Result<bool> {
        Ok(false)
    }
}
