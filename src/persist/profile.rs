//! POSIX persistence - idempotent `export` lines in a shell startup file

use crate::config::PROFILE_HEADER;
use crate::error::Result;
use crate::plan::{EnvAssignment, EnvVar};
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;

/// Result of appending to a profile
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileWrite {
    Added,
    AlreadyConfigured,
}

/// A shell startup file such as `~/.zshrc`.
#[derive(Debug, Clone)]
pub struct ShellProfile {
    path: PathBuf,
}

impl ShellProfile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append the export line for `assignment` unless the file already has it.
    ///
    /// The file is created if missing. The header comment is written before
    /// the appended line only when the file does not contain it yet, so it
    /// appears at most once no matter how many variables follow.
    pub async fn append_export(&self, assignment: &EnvAssignment) -> Result<ProfileWrite> {
        let line = assignment.export_line();

        // Touch: create without truncating
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        let content = tokio::fs::read_to_string(&self.path).await?;
        if content.contains(&line) {
            return Ok(ProfileWrite::AlreadyConfigured);
        }

        let mut chunk = String::new();
        if !content.is_empty() && !content.ends_with('\n') {
            chunk.push('\n');
        }
        if !content.contains(PROFILE_HEADER) {
            chunk.push('\n');
            chunk.push_str(PROFILE_HEADER);
            chunk.push('\n');
        }
        chunk.push_str(&line);
        chunk.push('\n');

        let mut file = tokio::fs::OpenOptions::new()
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(chunk.as_bytes()).await?;
        file.flush().await?;

        Ok(ProfileWrite::Added)
    }

    /// Managed variables that already have an `export NAME=` line.
    ///
    /// A missing file has no configured variables.
    pub async fn configured_vars(&self) -> Result<Vec<EnvVar>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        Ok(EnvVar::ALL
            .into_iter()
            .filter(|var| {
                let prefix = format!("export {}=", var.name());
                content.lines().any(|line| line.trim_start().starts_with(&prefix))
            })
            .collect())
    }
}
