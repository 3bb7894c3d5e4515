//! Terminal confirmation for deploy steps.
//!
//! Uses dialoguer for the prompt; falls back to "no" when stdin is not a
//! terminal so unattended runs never block.

use anyhow::Result;
use console::{Term, style};
use dialoguer::{Confirm as ConfirmPrompt, theme::ColorfulTheme};

use turnkey_core::deploy::Confirm;

/// Asks on the attached terminal.
#[derive(Default)]
pub struct TerminalConfirm {
    theme: ColorfulTheme,
}

impl TerminalConfirm {
    pub fn new() -> Self {
        Self {
            theme: ColorfulTheme::default(),
        }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> Result<bool> {
        if !Term::stderr().is_term() {
            eprintln!(
                "{} {} (no terminal attached, pass --yes to proceed)",
                style("?").yellow(),
                prompt
            );
            return Ok(false);
        }

        let answer = ConfirmPrompt::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(false)
            .interact_on(&Term::stderr())?;
        Ok(answer)
    }
}
