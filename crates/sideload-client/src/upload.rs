//! Dataset upload (`PUT /api/sideload`).

use std::path::Path;

use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};
use sideload_core::PayloadMap;

use crate::http::{error_message, extract_id};
use crate::{SideloadApi, SideloadClient, UploadError};

/// Multipart field carrying the JSON-encoded payload.
pub const DATA_FIELD: &str = "data";
/// Multipart part carrying the zip archive.
pub const FILE_FIELD: &str = "file";

/// Accepted upload, as reported by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    pub id: i64,
}

impl SideloadApi for SideloadClient {
    async fn sideload(
        &self,
        payload: &PayloadMap,
        archive: &Path,
    ) -> Result<UploadReceipt, UploadError> {
        let data = serde_json::to_string(payload)?;
        let bytes = tokio::fs::read(archive).await?;
        let file_name = archive
            .file_name()
            .map_or_else(|| String::from("dataset.zip"), |n| n.to_string_lossy().into_owned());

        let form = Form::new().text(DATA_FIELD, data).part(
            FILE_FIELD,
            Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("application/octet-stream")?,
        );

        let resp = self
            .http
            .put(self.url("api/sideload")?)
            .multipart(form)
            .timeout(self.upload_timeout)
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            return Err(UploadError::Rejected {
                status: status.as_u16(),
                id: extract_id(&body),
                message: error_message(&body),
            });
        }

        let id = extract_id(&body)
            .ok_or_else(|| UploadError::MalformedResponse(format!("missing 'id' in {body}")))?;

        tracing::debug!(id, archive = %archive.display(), "sideload accepted");
        Ok(UploadReceipt { id })
    }
}
