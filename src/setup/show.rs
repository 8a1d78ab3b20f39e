//! Display where configuration goes and which variables are already set

use crate::config::SetupConfig;
use crate::error::Result;
use crate::persist::ShellProfile;
use crate::plan::{mask_secret, EnvVar};
use crate::platform::{self, PersistTarget};
use std::io::Write;
use termcolor::{BufferWriter, Color, ColorChoice, ColorSpec, WriteColor};

/// Status of one managed variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VarStatus {
    pub var: EnvVar,
    /// Whether the profile has an export line; `None` when there is no profile
    pub in_profile: Option<bool>,
    /// Value visible to this process, masked when secret
    pub current_value: Option<String>,
}

/// Build the status table from what the profile and environment report
pub fn collect_status<F>(target: &PersistTarget, configured: &[EnvVar], lookup: F) -> Vec<VarStatus>
where
    F: Fn(&str) -> Option<String>,
{
    EnvVar::ALL
        .into_iter()
        .map(|var| {
            let in_profile = match target {
                PersistTarget::ShellProfile(_) => Some(configured.contains(&var)),
                PersistTarget::WindowsEnvironment => None,
            };
            let current_value = lookup(var.name())
                .filter(|value| !value.is_empty())
                .map(|value| if var.is_secret() { mask_secret(&value) } else { value });

            VarStatus {
                var,
                in_profile,
                current_value,
            }
        })
        .collect()
}

/// Display current configuration status
pub async fn show_config(config: &SetupConfig) -> Result<()> {
    let target = platform::detect(config.profile_override.as_deref())?;

    let configured = match &target {
        PersistTarget::ShellProfile(path) => ShellProfile::new(path).configured_vars().await?,
        PersistTarget::WindowsEnvironment => Vec::new(),
    };

    let statuses = collect_status(&target, &configured, |name| std::env::var(name).ok());

    let bufwtr = BufferWriter::stdout(ColorChoice::Auto);
    let mut buffer = bufwtr.buffer();

    // Colored status output - errors ignored (see prompts module docs)
    let _ = writeln!(&mut buffer, "Persistence target: {}\n", target.describe());

    for status in &statuses {
        match status.in_profile {
            Some(true) => {
                let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Green)));
                let _ = write!(&mut buffer, "✅ {}", status.var);
                let _ = buffer.reset();
                let _ = writeln!(&mut buffer, ": configured in profile");
            }
            Some(false) => {
                let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Red)));
                let _ = write!(&mut buffer, "❌ {}", status.var);
                let _ = buffer.reset();
                let _ = writeln!(&mut buffer, ": not in profile");
            }
            None => {
                let _ = writeln!(&mut buffer, "•  {}", status.var);
            }
        }

        match &status.current_value {
            Some(value) => {
                let _ = writeln!(&mut buffer, "   Current session: {value}");
            }
            None => {
                let _ = buffer.set_color(ColorSpec::new().set_fg(Some(Color::Yellow)));
                let _ = writeln!(&mut buffer, "   Current session: not set");
                let _ = buffer.reset();
            }
        }
    }

    let _ = bufwtr.print(&buffer);
    Ok(())
}
