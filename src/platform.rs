//! Platform detection - picks where environment variables are persisted

use crate::error::{Result, SetupError};
use std::path::{Path, PathBuf};

/// Where persisted variables end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistTarget {
    /// Startup file sourced by the user's shell
    ShellProfile(PathBuf),

    /// Windows per-user environment, written through `setx`
    WindowsEnvironment,
}

impl PersistTarget {
    /// Human-readable description for status output
    #[must_use]
    pub fn describe(&self) -> String {
        match self {
            Self::ShellProfile(path) => path.display().to_string(),
            Self::WindowsEnvironment => "Windows user environment".to_string(),
        }
    }
}

/// Resolve the persistence target from an OS identifier and `$SHELL`.
///
/// Policy:
/// - macOS: `~/.zprofile` for zsh, `~/.bash_profile` otherwise
/// - Linux: `~/.zshrc` for zsh, `~/.bashrc` otherwise
/// - Windows: the OS environment store
///
/// `os` accepts both `std::env::consts::OS` values and uname-style names
/// (`darwin`). Both inputs are matched case-insensitively.
pub fn resolve_target(os: &str, shell: &str, home: &Path) -> Result<PersistTarget> {
    let os = os.to_lowercase();
    let zsh = shell.to_lowercase().contains("zsh");

    let file = match os.as_str() {
        "macos" | "darwin" => {
            if zsh {
                ".zprofile"
            } else {
                ".bash_profile"
            }
        }
        "linux" => {
            if zsh {
                ".zshrc"
            } else {
                ".bashrc"
            }
        }
        "windows" => return Ok(PersistTarget::WindowsEnvironment),
        _ => return Err(SetupError::UnsupportedPlatform(os)),
    };

    Ok(PersistTarget::ShellProfile(home.join(file)))
}

/// Detect the persistence target for the running process.
///
/// An explicit profile path wins over detection on every platform.
pub fn detect(profile_override: Option<&Path>) -> Result<PersistTarget> {
    if let Some(path) = profile_override {
        tracing::debug!(path = %path.display(), "using profile override");
        return Ok(PersistTarget::ShellProfile(path.to_path_buf()));
    }

    let os = std::env::consts::OS;
    if os == "windows" {
        return Ok(PersistTarget::WindowsEnvironment);
    }

    let shell = std::env::var("SHELL").unwrap_or_default();
    let home = dirs::home_dir()
        .ok_or_else(|| SetupError::MissingConfig("HOME not set".to_string()))?;

    let target = resolve_target(os, &shell, &home)?;
    tracing::debug!(os, shell = %shell, target = %target.describe(), "detected persistence target");
    Ok(target)
}

/// Expand `~` in a user-supplied path, returning error if HOME is not set
///
/// When HOME is unset, `shellexpand` leaves `~` unchanged, so a leading
/// tilde that survives expansion is reported instead of silently used.
pub fn expand_tilde_path(path: &str) -> Result<PathBuf> {
    let expanded = shellexpand::tilde(path).to_string();

    if path.starts_with('~') && expanded.starts_with('~') {
        return Err(SetupError::InvalidConfig(format!(
            "Could not expand ~ in '{path}' (HOME environment variable not set).\n\
             Please use an absolute path instead."
        )));
    }

    Ok(PathBuf::from(expanded))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn home() -> PathBuf {
        PathBuf::from("/home/dev")
    }

    fn profile(name: &str) -> PersistTarget {
        PersistTarget::ShellProfile(home().join(name))
    }

    #[test]
    fn macos_picks_login_profiles() {
        assert_eq!(resolve_target("macos", "/bin/zsh", &home()).unwrap(), profile(".zprofile"));
        assert_eq!(resolve_target("darwin", "/bin/bash", &home()).unwrap(), profile(".bash_profile"));
        assert_eq!(resolve_target("Darwin", "", &home()).unwrap(), profile(".bash_profile"));
    }

    #[test]
    fn linux_picks_rc_files() {
        assert_eq!(resolve_target("linux", "/usr/bin/zsh", &home()).unwrap(), profile(".zshrc"));
        assert_eq!(resolve_target("linux", "/bin/bash", &home()).unwrap(), profile(".bashrc"));
        assert_eq!(resolve_target("linux", "/usr/bin/fish", &home()).unwrap(), profile(".bashrc"));
        assert_eq!(resolve_target("LINUX", "/BIN/ZSH", &home()).unwrap(), profile(".zshrc"));
    }

    #[test]
    fn windows_uses_environment_store() {
        assert_eq!(
            resolve_target("windows", "", &home()).unwrap(),
            PersistTarget::WindowsEnvironment
        );
        assert_eq!(
            resolve_target("Windows", "/usr/bin/zsh", &home()).unwrap(),
            PersistTarget::WindowsEnvironment
        );
    }

    #[test]
    fn other_systems_are_unsupported() {
        for os in ["freebsd", "openbsd", "solaris", ""] {
            let err = resolve_target(os, "/bin/zsh", &home()).unwrap_err();
            assert!(matches!(err, SetupError::UnsupportedPlatform(_)), "{os}: {err}");
        }
    }

    #[test]
    fn override_wins_over_detection() {
        let path = PathBuf::from("/tmp/custom_profile");
        assert_eq!(
            detect(Some(path.as_path())).unwrap(),
            PersistTarget::ShellProfile(path.clone())
        );
    }

    #[test]
    fn absolute_paths_pass_through_expansion() {
        assert_eq!(
            expand_tilde_path("/etc/profile.d/unbound.sh").unwrap(),
            PathBuf::from("/etc/profile.d/unbound.sh")
        );
    }

    #[test]
    fn tilde_expands_under_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        assert_eq!(expand_tilde_path("~/.zshrc").unwrap(), home.join(".zshrc"));
        assert_eq!(expand_tilde_path("~").unwrap(), home);
    }
}
