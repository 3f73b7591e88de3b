//! Seeding entity collections from a JSON file.
//!
//! The file maps plural collection names to item lists:
//!
//! ```json
//! {"organisms": [{"name": "human", "tax_id": 9606}], "probes": [{"name": "DBIA"}]}
//! ```
//!
//! Each item is sent as a form to `PUT /api/{singular}`, where the singular
//! endpoint is the collection name minus its final character.

use std::path::Path;

use serde::Serialize;
use serde_json::Value;

use crate::{ClientError, SideloadClient, http::check_response};

/// Result of seeding one item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SeedOutcome {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Parsed seed file: `(endpoint, item)` pairs in file order.
#[derive(Debug, Clone, PartialEq)]
pub struct SeedPlan {
    pub items: Vec<(String, Value)>,
}

impl SeedPlan {
    /// Read and parse a seed file.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Parse`] when the file cannot be read or does
    /// not have the `{collection: [item, ...]}` shape.
    pub fn from_path(path: &Path) -> Result<Self, ClientError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| ClientError::Parse(format!("{}: {e}", path.display())))?;
        Self::parse(&raw)
    }

    /// Parse seed JSON.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Parse`] on invalid JSON or shape.
    pub fn parse(raw: &str) -> Result<Self, ClientError> {
        let value: Value =
            serde_json::from_str(raw).map_err(|e| ClientError::Parse(format!("seed file: {e}")))?;

        let Value::Object(collections) = value else {
            return Err(ClientError::Parse("seed file must be a JSON object".into()));
        };

        let mut items = Vec::new();
        for (collection, list) in collections {
            let endpoint = singular_endpoint(&collection).ok_or_else(|| {
                ClientError::Parse(format!("collection name '{collection}' is too short"))
            })?;
            let Value::Array(list) = list else {
                return Err(ClientError::Parse(format!(
                    "collection '{collection}' must be an array"
                )));
            };
            items.extend(list.into_iter().map(|item| (endpoint.clone(), item)));
        }

        Ok(Self { items })
    }
}

/// `organisms` → `organism`.
#[must_use]
pub fn singular_endpoint(collection: &str) -> Option<String> {
    let mut chars = collection.chars();
    chars.next_back()?;
    let endpoint = chars.as_str();
    (!endpoint.is_empty()).then(|| endpoint.to_string())
}

/// Flatten a seed item into form fields. Strings are sent verbatim, other
/// scalars via their JSON text, nested values as JSON; nulls are skipped.
fn form_fields(item: &Value) -> Result<Vec<(String, String)>, ClientError> {
    let Value::Object(map) = item else {
        return Err(ClientError::Parse(format!("seed item must be an object: {item}")));
    };

    Ok(map
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let text = match value {
                Value::String(text) => text.clone(),
                other => other.to_string(),
            };
            (key.clone(), text)
        })
        .collect())
}

impl SideloadClient {
    /// Create one seed item at `endpoint`, returning the new id.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] if the item is malformed or the request fails.
    pub async fn seed_item(&self, endpoint: &str, item: &Value) -> Result<i64, ClientError> {
        let fields = form_fields(item)?;
        let url = self.api_url(endpoint)?;
        let resp = check_response(self.http.put(url).form(&fields).send().await?).await?;
        let body: Value = resp.json().await?;

        body.get("id")
            .and_then(Value::as_i64)
            .ok_or_else(|| ClientError::Parse(format!("seed {endpoint}: response missing 'id'")))
    }

    /// Seed every item of `plan`, continuing past individual failures.
    pub async fn seed(&self, plan: &SeedPlan) -> Vec<SeedOutcome> {
        let mut outcomes = Vec::with_capacity(plan.items.len());

        for (endpoint, item) in &plan.items {
            let outcome = match self.seed_item(endpoint, item).await {
                Ok(id) => SeedOutcome {
                    endpoint: endpoint.clone(),
                    id: Some(id),
                    error: None,
                },
                Err(error) => {
                    tracing::warn!(%endpoint, %error, "seed item failed");
                    SeedOutcome {
                        endpoint: endpoint.clone(),
                        id: None,
                        error: Some(error.to_string()),
                    }
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }
}
