//! Setup workflows
//!
//! - `interactive` - prompt, verify, persist, print instructions
//! - `show` - display current configuration status

mod interactive;
mod show;

pub use interactive::{interactive_setup, run_setup, AbortReason, SetupOutcome};
pub use show::{collect_status, show_config, VarStatus};
