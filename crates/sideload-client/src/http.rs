//! Response helpers shared by every request module.
//!
//! The service answers errors either with a JSON object carrying an `error`
//! or `message` string, or with an HTML error page. [`error_message`] reduces
//! both to one short line for reports.

use serde_json::Value;

use crate::error::ClientError;

/// Longest error message kept from a non-JSON body.
const MAX_MESSAGE_CHARS: usize = 200;

/// Pass a successful response through; turn any other status into
/// [`ClientError::Api`] with the service's message.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(&body),
    })
}

/// Human-readable message from an error body.
///
/// JSON bodies yield their `error` or `message` field; anything else yields
/// its first non-blank line, cut to [`MAX_MESSAGE_CHARS`].
pub fn error_message(body: &str) -> String {
    let from_json = serde_json::from_str::<Value>(body).ok().and_then(|value| {
        ["error", "message"]
            .iter()
            .find_map(|key| value.get(key).and_then(Value::as_str).map(str::to_string))
    });
    if let Some(message) = from_json {
        return message;
    }

    let line = body
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .unwrap_or("empty response body");
    if line.chars().count() > MAX_MESSAGE_CHARS {
        let cut: String = line.chars().take(MAX_MESSAGE_CHARS).collect();
        format!("{cut}...")
    } else {
        line.to_string()
    }
}

/// Pull an integer `id` out of a JSON response body, if there is one.
pub fn extract_id(body: &str) -> Option<i64> {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| value.get("id").and_then(Value::as_i64))
}
