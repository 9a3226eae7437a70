use std::str::FromStr;

use log::warn;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{VpError, VpResult};

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Config {
    pub predict_api: String,
    pub timeout_secs: u64,
}

#[derive(Clone, Copy, Debug, PartialEq, strum::Display, strum::EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConfigKey {
    PredictApi,
    TimeoutSecs,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            predict_api: "http://127.0.0.1:5000".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    pub fn set(&mut self, key: &str, value: &str) -> VpResult<()> {
        let value = value.trim();

        match ConfigKey::from_str(key.trim())? {
            ConfigKey::PredictApi => {
                Url::parse(value)?;
                self.predict_api = value.to_string();
            }
            ConfigKey::TimeoutSecs => {
                let secs: u64 = value.parse()?;
                if secs == 0 {
                    return Err(VpError::Invalid {
                        code: "INVALID_TIMEOUT",
                        message: "Timeout must be at least 1 second".to_string(),
                    });
                }

                self.timeout_secs = secs;
            }
        }

        Ok(())
    }

    /// Replaces hand-edited values that `set` would have rejected with their defaults.
    fn sanitized(mut self) -> Self {
        if self.timeout_secs == 0 {
            warn!("Config timeout_secs must be at least 1, using default");
            self.timeout_secs = Self::default().timeout_secs;
        }

        self
    }
}

pub fn load() -> Config {
    match confy::load::<Config>(env!("CARGO_PKG_NAME"), None) {
        Ok(config) => config.sanitized(),
        Err(err) => {
            warn!("Unable to load config, using defaults: {err}");
            Config::default()
        }
    }
}

pub fn store(config: &Config) -> VpResult<()> {
    confy::store(env!("CARGO_PKG_NAME"), None, config)?;

    Ok(())
}
