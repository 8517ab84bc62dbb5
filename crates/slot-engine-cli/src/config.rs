//! Configuration for the `slots` CLI.
//!
//! Layered with figment: built-in defaults, then an optional TOML file, then
//! `SLOTS_`-prefixed environment variables (`SLOTS_DEFAULTS__MAX_RESULTS=20`).

use anyhow::{Context, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use slot_engine::{Horizon, RequestDefaults};
use std::path::Path;

/// Page settings for requests that leave them out.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub max_results: usize,
    /// `"14d"`, `"3m"`, `"3 months"`, ...
    pub horizon: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        let defaults = RequestDefaults::default();
        Self {
            max_results: defaults.max_results,
            horizon: defaults.horizon.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Filter used when `RUST_LOG` is not set.
    pub default_level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default_level: "warn".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    pub defaults: DefaultsConfig,
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration. `path` takes precedence over `SLOTS_CONFIG`; a missing
    /// file is an error only when passed explicitly.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        match path {
            Some(path) => {
                anyhow::ensure!(path.exists(), "Config file not found: {}", path.display());
                figment = figment.merge(Toml::file(path));
            }
            None => {
                if let Some(env_path) = std::env::var_os("SLOTS_CONFIG") {
                    let env_path = Path::new(&env_path);
                    if env_path.exists() {
                        figment = figment.merge(Toml::file(env_path));
                    }
                }
            }
        }

        let config: Config = figment
            .merge(Env::prefixed("SLOTS_").split("__"))
            .extract()
            .context("Failed to load configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        anyhow::ensure!(
            self.defaults.max_results > 0,
            "defaults.max_results must be at least 1"
        );
        self.request_defaults()?;
        Ok(())
    }

    pub fn request_defaults(&self) -> Result<RequestDefaults> {
        let horizon: Horizon = self
            .defaults
            .horizon
            .parse()
            .with_context(|| format!("Invalid defaults.horizon: {}", self.defaults.horizon))?;
        Ok(RequestDefaults {
            max_results: self.defaults.max_results,
            horizon,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_engine_defaults() {
        let config = Config::default();
        assert_eq!(config.request_defaults().unwrap(), RequestDefaults::default());
    }

    #[test]
    fn bad_horizon_fails_validation() {
        let mut config = Config::default();
        config.defaults.horizon = "soon".to_string();
        assert!(config.validate().is_err());
    }
}
