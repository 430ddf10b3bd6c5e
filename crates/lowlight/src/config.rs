//! Runner configuration with layered loading
//!
//! Configuration is loaded from multiple sources (lowest to highest priority):
//! 1. Compiled defaults
//! 2. `lowlight.ron` in the working directory (if exists), or the file given
//!    with `--config`
//! 3. Environment variables prefixed with `LOWLIGHT_`
//! 4. Command-line flags, applied by the caller
//!
//! Example environment variable: `LOWLIGHT_LIFE__WORLD__WIDTH=80`

use std::path::Path;

use anyhow::{Context, Result};
use config::{Config, Environment, File, FileFormat};
use lowlight_core::LifeConfig;
use serde::{Deserialize, Serialize};

/// Base name of the optional config file
pub const DEFAULT_FILE: &str = "lowlight";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub life: LifeConfig,

    #[serde(default)]
    pub run: RunConfig,
}

/// How long to run and how often to report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Ticks to simulate; 0 only generates and reports
    pub ticks: u64,
    /// Log a census every this many ticks; 0 disables
    pub report_every: u64,
    /// Print the map before the first and after the last tick
    pub map: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            ticks: 1000,
            report_every: 100,
            map: true,
        }
    }
}

impl AppConfig {
    /// Load configuration with layered priority
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let builder = Config::builder()
            // Layer 1: Compiled defaults
            .set_default("life.seed", 0_i64)?
            .set_default("run.ticks", 1000_i64)?
            .set_default("run.report_every", 100_i64)?
            .set_default("run.map", true)?;

        // Layer 2: Config file
        let builder = match path {
            Some(path) => builder.add_source(File::from(path).format(FileFormat::Ron).required(true)),
            None => builder.add_source(
                File::with_name(DEFAULT_FILE)
                    .format(FileFormat::Ron)
                    .required(false),
            ),
        };

        // Layer 3: Environment variables (LOWLIGHT_RUN__TICKS, etc.)
        let builder = builder.add_source(
            Environment::with_prefix("LOWLIGHT")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        config
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }

    /// Effective configuration, pretty-printed as RON
    pub fn to_ron(&self) -> Result<String> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .context("Failed to serialize configuration")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.run.ticks, 1000);
        assert_eq!(config.run.report_every, 100);
        assert!(config.run.map);
        assert_eq!(config.life.seed, 0);
        assert_eq!(config.life.world.width, 50);
    }

    #[test]
    fn test_load_config_with_defaults() {
        // Should load defaults when no config file exists
        let config = AppConfig::load(None).expect("Failed to load config");
        assert_eq!(config.run.report_every, 100);
        assert_eq!(config.life.world.height, 50);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let path = std::env::temp_dir().join(format!("lowlight-test-{}.ron", std::process::id()));
        std::fs::write(&path, "(run: (ticks: 5), life: (seed: 9))").unwrap();

        let config = AppConfig::load(Some(&path));
        std::fs::remove_file(&path).ok();
        let config = config.expect("Failed to load config file");
        assert_eq!(config.run.ticks, 5);
        assert_eq!(config.run.report_every, 100, "Untouched keys keep their default");
        assert_eq!(config.life.seed, 9);
        assert_eq!(config.life.population.evoli, 8);
    }

    #[test]
    fn test_missing_explicit_file_is_an_error() {
        let path = std::env::temp_dir().join("lowlight-does-not-exist.ron");
        assert!(AppConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_dump_round_trips_through_ron() {
        let config = AppConfig::default();
        let text = config.to_ron().unwrap();
        let back: AppConfig = ron::from_str(&text).unwrap();
        assert_eq!(back.life, config.life);
        assert_eq!(back.run.ticks, config.run.ticks);
    }
}
