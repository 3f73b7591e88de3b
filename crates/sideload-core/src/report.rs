//! Per-path upload results and the run report printed by `sideload upload`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploaded,
    Failed,
}

/// Outcome of uploading one folder of one dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadResult {
    pub dataset: String,
    pub folder: String,
    pub status: UploadStatus,
    /// Identifier assigned by the server, when the upload succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Identifier of the upload this one was linked to as a replicate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replicate_of: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadResult {
    #[must_use]
    pub fn uploaded(dataset: &str, folder: &str, id: i64, replicate_of: Option<i64>) -> Self {
        Self {
            dataset: dataset.to_string(),
            folder: folder.to_string(),
            status: UploadStatus::Uploaded,
            id: Some(id),
            replicate_of,
            error: None,
        }
    }

    #[must_use]
    pub fn failed(dataset: &str, folder: &str, replicate_of: Option<i64>, error: String) -> Self {
        Self {
            dataset: dataset.to_string(),
            folder: folder.to_string(),
            status: UploadStatus::Failed,
            id: None,
            replicate_of,
            error: Some(error),
        }
    }

    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status == UploadStatus::Uploaded
    }
}

/// Summary of a whole upload run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub succeeded: u32,
    pub failed: u32,
    pub results: Vec<UploadResult>,
}

impl RunReport {
    #[must_use]
    pub fn new(started_at: DateTime<Utc>, results: Vec<UploadResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.is_success()).count();
        let failed = results.len() - succeeded;

        Self {
            started_at,
            finished_at: Utc::now(),
            succeeded: u32::try_from(succeeded).unwrap_or(u32::MAX),
            failed: u32::try_from(failed).unwrap_or(u32::MAX),
            results,
        }
    }
}
