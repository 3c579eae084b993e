//! Object storage for school logos, reached through the storage gateway.
use log::debug;
use serde::Deserialize;

use crate::{AuthMode, Client, Error, Result};

/// How long signed URLs stay valid, in seconds
const SIGNED_URL_EXPIRY: u32 = 900;

/// Somewhere we can keep files by key
pub trait ObjectStore {
    fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()>;

    /// A temporary URL anyone can fetch the object from
    fn signed_url(&self, key: &str) -> Result<String>;

    fn remove(&self, key: &str) -> Result<()>;
}

/// The storage gateway, sharing a [`Client`]'s connection and credentials
#[derive(Clone)]
pub struct Storage {
    client: Client,
    base: String,
}

#[derive(Deserialize)]
struct SignedUrlResp {
    url: String,
}

impl Storage {
    pub fn new(client: Client, base: impl Into<String>) -> Self {
        let mut base = base.into();
        while base.ends_with('/') {
            base.pop();
        }
        Self { client, base }
    }

    fn object_url(&self, key: &str) -> String {
        format!("{}/objects/{}", self.base, key)
    }

    fn auth_header(&self, mode: AuthMode) -> Result<(&'static str, &str)> {
        self.client.creds.header(mode).ok_or(Error::MissingToken)
    }

    fn check(resp: reqwest::blocking::Response) -> Result<reqwest::blocking::Response> {
        let status = resp.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN
        {
            return Err(Error::Unauthorized);
        }
        if !status.is_success() {
            return Err(Error::Status(status));
        }
        Ok(resp)
    }
}

impl ObjectStore for Storage {
    fn upload(&self, key: &str, bytes: Vec<u8>, content_type: &str) -> Result<()> {
        let (header, value) = self.auth_header(AuthMode::UserPool)?;
        debug!("uploading {} ({} bytes, {})", key, bytes.len(), content_type);
        Self::check(
            self.client
                .http()
                .put(self.object_url(key))
                .header(header, value)
                .header(reqwest::header::CONTENT_TYPE, content_type)
                .body(bytes)
                .send()?,
        )?;
        Ok(())
    }

    fn signed_url(&self, key: &str) -> Result<String> {
        let (header, value) = self.auth_header(AuthMode::ApiKey)?;
        let expires = SIGNED_URL_EXPIRY.to_string();
        let resp: SignedUrlResp = Self::check(
            self.client
                .http()
                .get(format!("{}/sign", self.base))
                .query(&[("key", key), ("expires", expires.as_str())])
                .header(header, value)
                .send()?,
        )?
        .json()?;
        Ok(resp.url)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let (header, value) = self.auth_header(AuthMode::UserPool)?;
        debug!("removing {}", key);
        Self::check(
            self.client
                .http()
                .delete(self.object_url(key))
                .header(header, value)
                .send()?,
        )?;
        Ok(())
    }
}

/// Guess a content type from a file name's extension
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}
