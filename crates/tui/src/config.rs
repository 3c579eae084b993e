use std::{env, fs::File};

use anyhow::{anyhow, Context, Result};
use camino::Utf8PathBuf;
use coursedir_client::{Credentials, Secret};
use log::debug;
use serde::{Deserialize, Serialize};
use simplelog::LevelFilter;
use xdg::BaseDirectories;

use crate::auth_cache::AuthCache;

/// Directory name used under the XDG config and cache dirs
pub const XDG_PREFIX: &str = "coursedir-admin";

/// Overrides the configured id token. Remembered for later runs.
const TOKEN_VAR: &str = "COURSEDIR_ID_TOKEN";

/// Overrides the configured log level
const LOG_VAR: &str = "COURSEDIR_LOG";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// GraphQL endpoint
    pub endpoint: String,
    pub api_key: Secret,

    /// Base URL of the storage gateway
    pub storage_endpoint: String,

    /// Needed for anything that changes data
    #[serde(default)]
    pub id_token: Option<Secret>,

    /// Where exported sheets go. Defaults to the current directory.
    #[serde(default)]
    pub export_dir: Option<Utf8PathBuf>,

    #[serde(default)]
    pub log_level: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = BaseDirectories::with_prefix(XDG_PREFIX)?
            .find_config_file("config.json")
            .ok_or_else(|| anyhow!("config does not exist"))?;

        let file = File::open(&path).context("error opening config file")?;
        let config = serde_json::from_reader(&file).context("error deserialising config file")?;

        Ok(config)
    }

    /// Credentials to use, from the environment, the config, or the token cache, in that order
    pub fn credentials(&self) -> Credentials {
        let id_token = match env::var(TOKEN_VAR) {
            Ok(t) if !t.is_empty() => {
                let token = Secret::from(t);
                if let Err(e) = AuthCache::new(token.clone()).save() {
                    debug!("error saving auth cache: {:?}", e);
                }
                Some(token)
            }
            _ => self.id_token.clone().or_else(|| match AuthCache::load() {
                Ok(c) => Some(c.into_token()),
                Err(e) => {
                    debug!("no cached token: {:?}", e);
                    None
                }
            }),
        };

        Credentials {
            api_key: self.api_key.clone(),
            id_token,
        }
    }

    pub fn export_dir(&self) -> Utf8PathBuf {
        self.export_dir
            .clone()
            .unwrap_or_else(|| Utf8PathBuf::from("."))
    }

    pub fn log_level(&self) -> LevelFilter {
        env::var(LOG_VAR)
            .ok()
            .or_else(|| self.log_level.clone())
            .and_then(|l| l.parse().ok())
            .unwrap_or(LevelFilter::Info)
    }
}
