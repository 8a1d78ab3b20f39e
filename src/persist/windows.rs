//! Windows persistence - permanent user variables through `setx`

use crate::error::{Result, SetupError};
use crate::plan::EnvAssignment;

/// Binary that writes permanent user environment variables
const SETX_BINARY: &str = "setx";

/// Find setx on PATH
fn find_setx(var_name: &str) -> Result<String> {
    which::which(SETX_BINARY)
        .map(|p| p.to_string_lossy().to_string())
        .map_err(|_| {
            SetupError::MissingDependency(format!(
                "'setx' command not found. Please set {var_name} manually:\n\
                 \n\
                 System Properties > Environment Variables > New (User variables)"
            ))
        })
}

/// Set a variable in the Windows user environment
///
/// New terminals see the value; the current one does not.
/// The value is never echoed in error messages since it may be the API key.
pub async fn set_user_variable(assignment: &EnvAssignment) -> Result<()> {
    let name = assignment.var.name();
    let setx = find_setx(name)?;

    let output = tokio::process::Command::new(&setx)
        .arg(name)
        .arg(&assignment.value)
        .output()
        .await
        .map_err(|e| SetupError::CommandExecution(format!("Failed to execute setx: {e}")))?;

    if !output.status.success() {
        let stderr = std::str::from_utf8(&output.stderr).unwrap_or("(non-UTF-8 error message)");
        return Err(SetupError::CommandExecution(format!(
            "setx {name} exited with {}: {}",
            output.status,
            stderr.trim()
        )));
    }

    Ok(())
}
