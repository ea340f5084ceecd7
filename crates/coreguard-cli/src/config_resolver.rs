//! Locates the configuration for a run and derives the project root from it.
//!
//! The search starts at the checked path and walks up through its ancestors,
//! so `coreguard check tests/foo.ts` finds the same `coreguard.toml` as a run
//! from the project directory. The directory holding that file becomes the
//! project root: exemption patterns, exclude globs and `[analyzer] root` are
//! all relative to it.
//!
//! Order: `--config` / `COREGUARD_CONFIG`, the nearest `coreguard.toml` or
//! `.coreguard.toml`, `$COREGUARD_CONFIG_DIR/config.toml` or
//! `~/.coreguard/config.toml`, then built-in defaults. Without a project file
//! the project root is the current directory.

use anyhow::{Context, Result};
use coreguard_core::utils::normalize;
use coreguard_core::Config;
use coreguard_rules::builtin_registry;
use std::path::{Path, PathBuf};

/// Project config file names, in preference order within one directory.
const CONFIG_NAMES: &[&str] = &["coreguard.toml", ".coreguard.toml"];

/// Config file name within the global config directory.
const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Where the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Named by `--config` or `COREGUARD_CONFIG`.
    Explicit(PathBuf),
    /// Nearest project file at or above the checked path.
    Project(PathBuf),
    /// The user-wide fallback file.
    Global(PathBuf),
    /// Nothing found.
    Default,
}

impl ConfigSource {
    /// Returns the config file path, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }
}

/// A configuration that parsed and whose rule tables validated.
#[derive(Debug)]
pub struct ResolvedConfig {
    /// The configuration itself.
    pub config: Config,
    /// Where it came from.
    pub source: ConfigSource,
    /// Directory reported paths and exemptions are relative to.
    pub project_root: PathBuf,
}

/// Resolves configuration against a working directory and an optional
/// global config directory.
#[derive(Debug, Clone)]
pub struct Resolver {
    cwd: PathBuf,
    global_dir: Option<PathBuf>,
}

impl Resolver {
    /// Builds a resolver from the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be determined.
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir().context("Cannot determine the current directory")?;
        let global_dir = std::env::var_os("COREGUARD_CONFIG_DIR")
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|h| h.join(".coreguard")));
        Ok(Self::new(cwd, global_dir))
    }

    /// Builds a resolver with explicit inputs.
    #[must_use]
    pub fn new(cwd: impl Into<PathBuf>, global_dir: Option<PathBuf>) -> Self {
        Self {
            cwd: normalize(&cwd.into()),
            global_dir,
        }
    }

    /// The working directory relative paths are resolved against.
    #[must_use]
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Absolute, normalized form of a path given on the command line.
    #[must_use]
    pub fn absolute(&self, path: &Path) -> PathBuf {
        normalize(&self.cwd.join(path))
    }

    /// Finds the config file for a run starting at `start`.
    #[must_use]
    pub fn locate(&self, start: &Path, explicit: Option<&Path>) -> ConfigSource {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(self.absolute(path));
        }

        let start = self.absolute(start);
        let first_dir = if start.is_file() {
            start.parent()
        } else {
            Some(start.as_path())
        };
        for dir in first_dir.into_iter().flat_map(Path::ancestors) {
            if let Some(found) = CONFIG_NAMES
                .iter()
                .map(|name| dir.join(name))
                .find(|candidate| candidate.is_file())
            {
                tracing::debug!("Found project config: {}", found.display());
                return ConfigSource::Project(found);
            }
        }

        self.global_dir
            .as_ref()
            .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
            .filter(|candidate| candidate.is_file())
            .map_or(ConfigSource::Default, ConfigSource::Global)
    }

    /// Locates, parses and validates the configuration.
    ///
    /// Every `[rules.*]` table is checked against the built-in registry here,
    /// so a bad option fails the run before any file is read.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid TOML, names
    /// an unknown rule, or carries an invalid option.
    pub fn load(&self, start: &Path, explicit: Option<&Path>) -> Result<ResolvedConfig> {
        let source = self.locate(start, explicit);

        let config = match source.path() {
            Some(path) => Config::from_file(path)
                .with_context(|| format!("Failed to load config: {}", path.display()))?,
            None => Config::default(),
        };
        builtin_registry()
            .instantiate_enabled(&config, None)
            .with_context(|| match source.path() {
                Some(path) => format!("Invalid rule configuration in {}", path.display()),
                None => "Invalid rule configuration".to_string(),
            })?;

        let project_root = match &source {
            ConfigSource::Explicit(p) | ConfigSource::Project(p) => p
                .parent()
                .map_or_else(|| self.cwd.clone(), Path::to_path_buf),
            ConfigSource::Global(p) => {
                tracing::info!("Using global config: {}", p.display());
                self.cwd.clone()
            }
            ConfigSource::Default => self.cwd.clone(),
        };

        Ok(ResolvedConfig {
            config,
            source,
            project_root,
        })
    }
}
