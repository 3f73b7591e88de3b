//! Named entity collections (`/api/{endpoint}`).

use serde::{Deserialize, Serialize};

use crate::{ClientError, EntityApi, SideloadClient, http::check_response};

/// A named entity as returned by a collection endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

impl EntityApi for SideloadClient {
    async fn list_entities(&self, endpoint: &str) -> Result<Vec<Entity>, ClientError> {
        let url = self.api_url(endpoint)?;
        let resp = check_response(self.http.get(url).send().await?).await?;
        let body: serde_json::Value = resp.json().await?;

        let entities = unwrap_collection(body)?;
        tracing::debug!(endpoint, count = entities.len(), "fetched entity collection");
        Ok(entities)
    }

    async fn create_entity(&self, endpoint: &str, name: &str) -> Result<Entity, ClientError> {
        let url = self.api_url(endpoint)?;
        let resp = check_response(self.http.put(url).form(&[("name", name)]).send().await?).await?;
        let body: serde_json::Value = resp.json().await?;

        let id = body
            .get("id")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| ClientError::Parse(format!("create {endpoint}: response missing 'id'")))?;

        tracing::info!(endpoint, name, id, "created entity");
        Ok(Entity {
            id,
            name: name.to_string(),
        })
    }
}

/// Collection responses wrap the entity list in a single pluralised key
/// (`{"organisms": [...]}`); take whatever that one value is. A bare array
/// is accepted as well.
fn unwrap_collection(body: serde_json::Value) -> Result<Vec<Entity>, ClientError> {
    let list = match body {
        serde_json::Value::Array(items) => serde_json::Value::Array(items),
        serde_json::Value::Object(map) => map
            .into_iter()
            .next()
            .map(|(_, value)| value)
            .ok_or_else(|| ClientError::Parse("empty collection response".into()))?,
        other => {
            return Err(ClientError::Parse(format!(
                "unexpected collection response: {other}"
            )));
        }
    };

    serde_json::from_value(list).map_err(|e| ClientError::Parse(format!("entity list: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn unwraps_pluralised_key() {
        let body = json!({"organisms": [
            {"id": 1, "name": "human", "tax_id": 9606},
            {"id": 2, "name": "mouse"}
        ]});

        let entities = unwrap_collection(body).unwrap();
        assert_eq!(
            entities,
            vec![
                Entity { id: 1, name: "human".into() },
                Entity { id: 2, name: "mouse".into() },
            ]
        );
    }

    #[test]
    fn accepts_bare_array() {
        let entities = unwrap_collection(json!([{"id": 5, "name": "DBIA"}])).unwrap();
        assert_eq!(entities.len(), 1);
        assert_eq!(entities[0].id, 5);
    }

    #[test]
    fn rejects_empty_object() {
        assert!(matches!(
            unwrap_collection(json!({})),
            Err(ClientError::Parse(_))
        ));
    }

    #[test]
    fn rejects_wrong_shape() {
        assert!(unwrap_collection(json!({"organisms": "nope"})).is_err());
        assert!(unwrap_collection(json!("nope")).is_err());
    }
}
