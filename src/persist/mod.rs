//! Durable environment variables across platforms
//!
//! # Module Organization
//!
//! - `profile` - idempotent `export` lines in a POSIX shell profile
//! - `windows` - user environment through `setx`
//!
//! # Error Handling Strategy
//!
//! [`EnvWriter::persist`] never fails. File and subprocess errors are
//! captured in [`PersistOutcome::Failed`] so the caller decides whether a
//! failed write is fatal (the API key) or not (routing variables).

mod profile;
mod windows;

pub use profile::{ProfileWrite, ShellProfile};
pub use windows::set_user_variable;

use crate::platform::PersistTarget;
use crate::plan::{EnvAssignment, EnvVar};

/// What happened to one assignment
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// Export line appended to the profile
    Added,
    /// Profile already had the exact line
    AlreadyConfigured,
    /// Written to the Windows user environment
    Set,
    /// Dry run: nothing written
    DryRun,
    /// Write failed with the given reason
    Failed(String),
}

/// Outcome plus the instruction the user needs to pick the value up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistReport {
    pub var: EnvVar,
    pub outcome: PersistOutcome,
    pub follow_up: String,
}

impl PersistReport {
    #[must_use]
    pub fn is_success(&self) -> bool {
        !matches!(self.outcome, PersistOutcome::Failed(_))
    }
}

/// Writes assignments to the detected persistence target.
#[derive(Debug, Clone)]
pub struct EnvWriter {
    target: PersistTarget,
    dry_run: bool,
}

impl EnvWriter {
    pub fn new(target: PersistTarget) -> Self {
        Self {
            target,
            dry_run: false,
        }
    }

    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    #[must_use]
    pub fn target(&self) -> &PersistTarget {
        &self.target
    }

    /// How new values become visible
    #[must_use]
    pub fn follow_up(&self) -> String {
        match &self.target {
            PersistTarget::ShellProfile(path) => {
                format!("Run 'source {}' or restart your terminal", path.display())
            }
            PersistTarget::WindowsEnvironment => {
                "Open a new terminal to pick up the change".to_string()
            }
        }
    }

    /// Durably set one variable so new shell sessions see it
    pub async fn persist(&self, assignment: &EnvAssignment) -> PersistReport {
        let outcome = if self.dry_run {
            PersistOutcome::DryRun
        } else {
            match &self.target {
                PersistTarget::ShellProfile(path) => {
                    match ShellProfile::new(path).append_export(assignment).await {
                        Ok(ProfileWrite::Added) => PersistOutcome::Added,
                        Ok(ProfileWrite::AlreadyConfigured) => PersistOutcome::AlreadyConfigured,
                        Err(e) => PersistOutcome::Failed(format!(
                            "Failed to modify {}: {e}",
                            path.display()
                        )),
                    }
                }
                PersistTarget::WindowsEnvironment => match set_user_variable(assignment).await {
                    Ok(()) => PersistOutcome::Set,
                    Err(e) => PersistOutcome::Failed(e.to_string()),
                },
            }
        };

        tracing::debug!(var = %assignment.var, ?outcome, "persisted variable");

        PersistReport {
            var: assignment.var,
            outcome,
            follow_up: self.follow_up(),
        }
    }
}
