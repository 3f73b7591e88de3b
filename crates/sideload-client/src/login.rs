//! Session login handshake.
//!
//! The service issues a CSRF token from `/login_csrf`, then accepts a form
//! post to `/login`. Both responses set cookies; the client's cookie store
//! keeps them for every later request.

use serde::Deserialize;

use crate::{ClientError, SideloadClient, http::check_response};

#[derive(Deserialize)]
struct CsrfResponse {
    csrf_token: String,
}

impl SideloadClient {
    /// Log in as `email` and keep the session cookie.
    ///
    /// A redirect answer counts as success; any 4xx/5xx status does not.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Login`] if the service refuses the credentials,
    /// or another [`ClientError`] if the CSRF request fails.
    pub async fn login(&self, email: &str, password: &str) -> Result<(), ClientError> {
        let resp = check_response(self.http.get(self.url("login_csrf")?).send().await?).await?;
        let CsrfResponse { csrf_token } = resp
            .json()
            .await
            .map_err(|e| ClientError::Parse(format!("csrf response: {e}")))?;

        let resp = self
            .http
            .post(self.url("login")?)
            .form(&[
                ("email", email),
                ("password", password),
                ("csrf_token", csrf_token.as_str()),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status.is_client_error() || status.is_server_error() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ClientError::Login(format!("{} {body}", status.as_u16())));
        }

        tracing::info!(email, url = %self.base, "logged in");
        Ok(())
    }
}
