use std::fs::File;

use anyhow::{anyhow, Context, Result};
use coursedir_client::Secret;
use serde::{Deserialize, Serialize};
use xdg::BaseDirectories;

use crate::config::XDG_PREFIX;

/// Remembers an id token given through the environment, so later runs don't need it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCache {
    id_token: Secret,
}

impl AuthCache {
    pub fn new(id_token: Secret) -> Self {
        Self { id_token }
    }

    pub fn into_token(self) -> Secret {
        self.id_token
    }

    pub fn load() -> Result<Self> {
        let path = BaseDirectories::with_prefix(XDG_PREFIX)?
            .find_cache_file("auth_cache.json")
            .ok_or_else(|| anyhow!("auth cache does not exist"))?;

        let file = File::open(path).context("error opening auth cache")?;
        let cache = serde_json::from_reader(&file).context("error deserialising auth cache")?;

        Ok(cache)
    }

    pub fn save(&self) -> Result<()> {
        let path = BaseDirectories::with_prefix(XDG_PREFIX)?.place_cache_file("auth_cache.json")?;

        let mut file = File::create(path).context("error opening auth cache")?;
        serde_json::to_writer(&mut file, &self).context("error serialising auth cache")?;

        Ok(())
    }
}
