//! Remote data-management service connection settings.

use serde::{Deserialize, Serialize};

const fn default_timeout_secs() -> u64 {
    30
}

const fn default_upload_timeout_secs() -> u64 {
    600
}

fn default_user_agent() -> String {
    String::from("sideload/0.1")
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Base URL of the service (e.g. `https://db.example.org`).
    #[serde(default)]
    pub url: String,

    /// Account used to log in.
    #[serde(default)]
    pub email: String,

    /// Account password. Prompted for when empty.
    #[serde(default)]
    pub password: String,

    /// Timeout for login, entity lookup/creation, and seeding requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Timeout for a single archive upload.
    #[serde(default = "default_upload_timeout_secs")]
    pub upload_timeout_secs: u64,

    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            email: String::new(),
            password: String::new(),
            timeout_secs: default_timeout_secs(),
            upload_timeout_secs: default_upload_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl ServerConfig {
    /// URL and email are the minimum needed to start a session.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.url.is_empty() && !self.email.is_empty()
    }

    #[must_use]
    pub fn has_password(&self) -> bool {
        !self.password.is_empty()
    }
}
