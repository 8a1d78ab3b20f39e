//! Interactive setup of Unbound API credentials and model routing for Claude Code
//!
//! The API key is verified against the Unbound models endpoint, then
//! persisted as environment variables: `export` lines in the user's shell
//! profile on macOS and Linux, the user environment (`setx`) on Windows.

#[macro_use]
pub mod prompts;

pub mod config;
pub mod error;
pub mod persist;
pub mod plan;
pub mod platform;
pub mod setup;
pub mod verify;

// Re-export common types
pub use config::SetupConfig;
pub use error::SetupError;
pub use persist::{EnvWriter, PersistOutcome, PersistReport};
pub use plan::{EnvAssignment, EnvVar, RoutingChoice};
pub use platform::PersistTarget;
pub use setup::{interactive_setup, run_setup, show_config, AbortReason, SetupOutcome};
pub use verify::{ApiKeyVerifier, ResponseShape, Verification};
