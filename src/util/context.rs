//! Global context for pacc operations.
//!
//! Provides centralized access to configuration, paths, and environment.
//!
//! Packages are looked up in an ordered list of candidate directories:
//! the project's `pacc_packages/`, the directory holding the project
//! itself, the global package directory, then any extra directories named
//! in configuration. First match wins.

use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use anyhow::{Context, Result};
use directories::ProjectDirs;

use crate::core::manifest::{ManifestError, MANIFEST_NAME};
use crate::util::config::Config;
use crate::util::fs::normalize_path;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "PACC_HOME";

/// Directory, relative to a project, holding its local packages.
pub const LOCAL_PACKAGES_DIR: &str = "pacc_packages";

/// Project directories for pacc
static PROJECT_DIRS: LazyLock<Option<ProjectDirs>> =
    LazyLock::new(|| ProjectDirs::from("com", "pacc", "pacc"));

/// Global context containing configuration and paths.
#[derive(Debug, Clone)]
pub struct GlobalContext {
    /// Current working directory
    cwd: PathBuf,

    /// Home directory for global pacc data
    home: PathBuf,

    /// Whether to use verbose output
    verbose: bool,

    /// Whether to use colors in output
    color: bool,
}

impl GlobalContext {
    /// Create a new GlobalContext with defaults.
    pub fn new() -> Result<Self> {
        let cwd = std::env::current_dir().context("failed to get current directory")?;

        Ok(GlobalContext {
            cwd,
            home: default_home(),
            verbose: false,
            color: true,
        })
    }

    /// Create a GlobalContext with a specific working directory. A relative
    /// `cwd` is taken from the process working directory.
    pub fn with_cwd(cwd: PathBuf) -> Result<Self> {
        let mut ctx = Self::new()?;
        ctx.cwd = normalize_path(&ctx.cwd.join(cwd));
        Ok(ctx)
    }

    /// Replace the data directory.
    pub fn with_home(mut self, home: PathBuf) -> Self {
        self.home = home;
        self
    }

    /// Set verbose mode.
    pub fn set_verbose(&mut self, verbose: bool) {
        self.verbose = verbose;
    }

    /// Set color output.
    pub fn set_color(&mut self, color: bool) {
        self.color = color;
    }

    /// Get the current working directory.
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Get the pacc data directory.
    pub fn home(&self) -> &Path {
        &self.home
    }

    /// Get the global package directory.
    pub fn packages_dir(&self) -> PathBuf {
        self.home.join("packages")
    }

    /// Get the global configuration file path.
    pub fn config_path(&self) -> PathBuf {
        self.home.join("config.toml")
    }

    /// Get the project configuration file path.
    pub fn project_config_path(&self) -> PathBuf {
        self.cwd.join(".pacc").join("config.toml")
    }

    /// Check if verbose mode is enabled.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Check if color output is enabled.
    pub fn color(&self) -> bool {
        self.color
    }

    /// Directories searched for dependency packages, in priority order.
    pub fn candidate_dirs(&self, config: &Config) -> Vec<PathBuf> {
        let mut dirs = vec![self.cwd.join(LOCAL_PACKAGES_DIR)];
        dirs.push(self.cwd.join(".."));
        dirs.push(self.packages_dir());
        dirs.extend(
            config
                .packages
                .extra_package_dirs
                .iter()
                .map(|dir| self.cwd.join(dir)),
        );
        dirs
    }

    /// Find the package manifest starting from cwd and searching upward.
    pub fn find_manifest(&self) -> Result<PathBuf, ManifestError> {
        let mut current = self.cwd.clone();
        loop {
            let candidate = current.join(MANIFEST_NAME);
            if candidate.is_file() {
                return Ok(candidate);
            }
            if !current.pop() {
                return Err(ManifestError::NotFound {
                    dir: self.cwd.clone(),
                });
            }
        }
    }

    /// Find the package root (directory containing cpackage.json).
    pub fn find_package_root(&self) -> Result<PathBuf, ManifestError> {
        let manifest = self.find_manifest()?;
        Ok(manifest
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.cwd.clone()))
    }
}

fn default_home() -> PathBuf {
    if let Some(home) = std::env::var_os(HOME_ENV) {
        return PathBuf::from(home);
    }

    if let Some(dirs) = PROJECT_DIRS.as_ref() {
        dirs.data_dir().to_path_buf()
    } else {
        // Fallback to ~/.pacc
        directories::BaseDirs::new()
            .map(|b| b.home_dir().join(".pacc"))
            .unwrap_or_else(|| PathBuf::from(".pacc"))
    }
}
