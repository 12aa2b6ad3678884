//! Compiler configuration.
//!
//! Values are layered with figment, lowest priority first:
//!
//! 1. built-in defaults
//! 2. a TOML file (`sheaf.toml` in the working directory unless a path is given)
//! 3. `SHEAF_`-prefixed environment variables (`SHEAF_DEBUG`, `SHEAF_MERGED_DIR`, ...)

use std::path::{Path, PathBuf};

use figment::Figment;
use figment::providers::{Env, Format as _, Serialized, Toml};
use serde::{Deserialize, Serialize};
use sheaf_graph::DEFAULT_RESOLUTION_LIMIT;

use crate::{Error, Result};

/// Default configuration file name.
pub const CONFIG_FILE: &str = "sheaf.toml";

/// Prefix of the environment variables read by [`CompilerConfig::load`].
pub const ENV_PREFIX: &str = "SHEAF_";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompilerConfig {
    /// Directory merged files are written to
    pub merged_dir: PathBuf,
    /// Directory bundle kinds write their own compiled files to
    pub output_dir: PathBuf,
    /// Public URI prefix of both directories
    pub public_path: String,
    /// Mode used for bundles that don't set their own debug flag
    pub debug: bool,
    /// Maximum number of resolver passes
    pub resolution_limit: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            merged_dir: PathBuf::from("build"),
            output_dir: PathBuf::from("build"),
            public_path: "/build".to_string(),
            debug: false,
            resolution_limit: DEFAULT_RESOLUTION_LIMIT,
        }
    }
}

impl CompilerConfig {
    /// Defaults with both output directories set to `dir`.
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            merged_dir: dir.clone(),
            output_dir: dir,
            ..Self::default()
        }
    }

    /// Load configuration from defaults, a TOML file and the environment.
    ///
    /// With `config_path` unset, `sheaf.toml` is read if it exists.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Self::default()));

        let config_file = config_path.map(Path::to_path_buf).or_else(|| {
            let default_path = Path::new(CONFIG_FILE);
            default_path.exists().then(|| default_path.to_path_buf())
        });

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(Error::InvalidConfig(format!(
                    "configuration file '{}' does not exist",
                    path.display()
                )));
            }
            figment = figment.merge(Toml::file(path));
        }

        figment = figment.merge(Env::prefixed(ENV_PREFIX));

        let config: Self = figment
            .extract()
            .map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values no compile could succeed with.
    pub fn validate(&self) -> Result<()> {
        if self.resolution_limit == 0 {
            return Err(Error::InvalidConfig(
                "resolution_limit must be at least 1".to_string(),
            ));
        }
        if self.public_path.is_empty() {
            return Err(Error::InvalidConfig("public_path must not be empty".to_string()));
        }
        Ok(())
    }
}
