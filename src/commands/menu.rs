//! Interactive menu shown when no subcommand is given.

use std::fmt;

use anyhow::Result;
use inquire::Select;

use super::RunContext;
use crate::exec::Executor;
use crate::logging::Log;

/// Yes/no gate for destructive steps.
///
/// `TerminalConfirm` asks on the terminal; `AssumeYes` backs the `--yes`
/// flag and non-interactive runs.
pub trait Confirm {
    /// Ask the question; `false` on decline or any prompt error.
    fn confirm(&self, prompt: &str) -> bool;
}

/// Prompts the user on the terminal, defaulting to "no".
#[derive(Debug, Clone, Copy, Default)]
pub struct TerminalConfirm;

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        inquire::Confirm::new(prompt)
            .with_default(false)
            .prompt()
            .unwrap_or(false)
    }
}

/// Answers yes to everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AssumeYes;

impl Confirm for AssumeYes {
    fn confirm(&self, _: &str) -> bool {
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuChoice {
    Deploy,
    Backup,
    Capture,
    Full,
    Clear,
    Exit,
}

impl MenuChoice {
    const ALL: [Self; 6] = [
        Self::Deploy,
        Self::Backup,
        Self::Capture,
        Self::Full,
        Self::Clear,
        Self::Exit,
    ];
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Deploy => "Deploy dotfiles (recommended)",
            Self::Backup => "Backup current dotfiles",
            Self::Capture => "Capture customizations back into the repository",
            Self::Full => "Full setup (backup, install, deploy)",
            Self::Clear => "Clear all backups",
            Self::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// Show the menu and run the selected operation.
///
/// # Errors
///
/// Returns an error when the prompt cannot be shown (no terminal) or the
/// selected operation fails.
pub fn run(
    ctx: &RunContext,
    executor: &dyn Executor,
    log: &dyn Log,
    confirm: &dyn Confirm,
) -> Result<()> {
    let choice = Select::new("What would you like to do?", MenuChoice::ALL.to_vec()).prompt()?;

    match choice {
        MenuChoice::Deploy => super::deploy::run(ctx, log),
        MenuChoice::Backup => super::backup::run(ctx, log),
        MenuChoice::Capture => super::capture::run(ctx, log, &[]),
        MenuChoice::Full => super::full::run(ctx, executor, log, confirm),
        MenuChoice::Clear => super::clear::run(ctx, log, confirm),
        MenuChoice::Exit => Ok(()),
    }
}
