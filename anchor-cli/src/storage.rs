//! Storage backends for the data directory.
//!
//! The core only ever sees a path; the backend decides how that directory is
//! created and kept in sync.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use anyhow::{Context, Result};

use crate::config::{Config, StorageKind};

/// Backend selected from `storage.kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    Local { dir: PathBuf },
    Git { dir: PathBuf, remote: Option<String> },
}

impl Storage {
    pub fn from_config(config: &Config) -> Result<Self> {
        let dir = config.data_dir()?;

        Ok(match config.storage.kind {
            StorageKind::Local => Self::Local { dir },
            StorageKind::Git => Self::Git {
                dir,
                remote: config.storage.remote.clone(),
            },
        })
    }

    pub fn data_dir(&self) -> &Path {
        match self {
            Self::Local { dir } | Self::Git { dir, .. } => dir,
        }
    }

    /// Create the data directory, and the repository for the git backend.
    pub fn init(&self) -> Result<()> {
        let dir = self.data_dir();
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create data directory: {}", dir.display()))?;

        if let Self::Git { remote, .. } = self {
            if dir.join(".git").exists() {
                tracing::info!("git repository already present in {}", dir.display());
                return Ok(());
            }

            self.git(&["init"])?;
            if let Some(remote) = remote {
                self.git(&["remote", "add", "origin", remote.as_str()])?;
            }
        }

        Ok(())
    }

    /// Bring the data directory up to date with the remote.
    pub fn update(&self) -> Result<()> {
        match self {
            Self::Git {
                remote: Some(_), ..
            } => self.git(&["pull", "--ff-only"]),
            _ => Ok(()),
        }
    }

    /// Record the current state of the data directory.
    pub fn store(&self, message: &str) -> Result<()> {
        let Self::Git { remote, .. } = self else {
            return Ok(());
        };

        self.git(&["add", "--all"])?;
        if self.git_output(&["status", "--porcelain"])?.trim().is_empty() {
            tracing::debug!("nothing to commit");
            return Ok(());
        }

        self.git(&["commit", "--quiet", "-m", message])?;
        if remote.is_some() {
            self.git(&["push", "--quiet", "--set-upstream", "origin", "HEAD"])?;
        }

        Ok(())
    }

    fn git(&self, args: &[&str]) -> Result<()> {
        self.git_output(args).map(drop)
    }

    fn git_output(&self, args: &[&str]) -> Result<String> {
        let dir = self.data_dir();
        tracing::debug!(dir = %dir.display(), ?args, "running git");

        let output = Command::new("git")
            .arg("-C")
            .arg(dir)
            .args(args)
            .output()
            .context("Failed to run git; is it installed?")?;

        if !output.status.success() {
            anyhow::bail!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}
