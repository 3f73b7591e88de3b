//! # sideload-client
//!
//! HTTP client for the remote data-management service.
//!
//! One [`SideloadClient`] holds the authenticated session (cookie store) and
//! exposes:
//! - the login handshake (`/login_csrf` + `/login`)
//! - entity collections (`GET`/`PUT /api/{endpoint}`) via [`EntityApi`]
//! - dataset uploads (`PUT /api/sideload`) via [`SideloadApi`]
//! - seeding of entity collections from a JSON file

pub mod entities;
pub mod login;
pub mod seed;
pub mod upload;

mod error;
mod http;

pub use entities::Entity;
pub use error::{ClientError, UploadError};
pub use upload::UploadReceipt;

use std::future::Future;
use std::path::Path;
use std::time::Duration;

use reqwest::Url;
use sideload_config::ServerConfig;
use sideload_core::PayloadMap;

/// Named entity collections on the service.
///
/// The identifier resolver only needs these two calls, so it is written
/// against this trait rather than the concrete client.
pub trait EntityApi {
    /// Fetch every entity at `endpoint`.
    fn list_entities(
        &self,
        endpoint: &str,
    ) -> impl Future<Output = Result<Vec<Entity>, ClientError>> + Send;

    /// Create an entity called `name` at `endpoint`.
    fn create_entity(
        &self,
        endpoint: &str,
        name: &str,
    ) -> impl Future<Output = Result<Entity, ClientError>> + Send;
}

/// Dataset upload endpoint.
pub trait SideloadApi {
    /// Upload `payload` together with the zip archive at `archive`.
    fn sideload(
        &self,
        payload: &PayloadMap,
        archive: &Path,
    ) -> impl Future<Output = Result<UploadReceipt, UploadError>> + Send;
}

/// Session-holding HTTP client.
#[derive(Debug, Clone)]
pub struct SideloadClient {
    http: reqwest::Client,
    base: Url,
    upload_timeout: Duration,
}

impl SideloadClient {
    /// Build a client for the service described by `config`.
    ///
    /// Redirects are not followed so the login response can be inspected
    /// directly; session cookies are kept for every later request.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidUrl`] if `config.url` does not parse, or
    /// [`ClientError::Http`] if the underlying client cannot be built.
    pub fn new(config: &ServerConfig) -> Result<Self, ClientError> {
        let http = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .cookie_store(true)
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            http,
            base: parse_base_url(&config.url)?,
            upload_timeout: Duration::from_secs(config.upload_timeout_secs),
        })
    }

    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base
    }

    /// Resolve a path relative to the base URL.
    fn url(&self, path: &str) -> Result<Url, ClientError> {
        self.base.join(path).map_err(|e| ClientError::InvalidUrl {
            url: format!("{}{path}", self.base),
            reason: e.to_string(),
        })
    }

    /// URL of `/api/{endpoint}` with the endpoint percent-encoded.
    fn api_url(&self, endpoint: &str) -> Result<Url, ClientError> {
        self.url(&format!("api/{}", urlencoding::encode(endpoint)))
    }
}

/// Parse the base URL, forcing a trailing slash so relative joins keep any
/// path prefix the service is mounted under.
fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
    let trimmed = raw.trim();
    let with_slash = if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{trimmed}/")
    };

    let url = Url::parse(&with_slash).map_err(|e| ClientError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;

    if url.cannot_be_a_base() {
        return Err(ClientError::InvalidUrl {
            url: raw.to_string(),
            reason: String::from("not a base URL"),
        });
    }

    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str) -> ServerConfig {
        ServerConfig {
            url: url.into(),
            email: "lab@example.org".into(),
            ..Default::default()
        }
    }

    #[test]
    fn api_url_keeps_mount_prefix() {
        let client = SideloadClient::new(&config("https://example.org/cravattdb")).unwrap();
        assert_eq!(
            client.api_url("organism").unwrap().as_str(),
            "https://example.org/cravattdb/api/organism"
        );
    }

    #[test]
    fn api_url_encodes_endpoint() {
        let client = SideloadClient::new(&config("http://localhost:5000/")).unwrap();
        assert_eq!(
            client.api_url("cell type").unwrap().as_str(),
            "http://localhost:5000/api/cell%20type"
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let err = SideloadClient::new(&config("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }
}
