//! Per-dataset, per-folder upload loop.
//!
//! Folders of one dataset are uploaded in order. The first identifier the
//! anchor policy accepts becomes `replicate_of` for every later folder of
//! that dataset. A failing folder is reported and skipped; it never stops
//! the run. Records rejected during resolution are reported as failed for
//! each of their folders without any upload attempt.

use std::path::Path;

use anyhow::Context;
use chrono::Utc;
use sideload_canon::{prepare_archive, target_dta_name};
use sideload_client::{SideloadApi, UploadError, UploadReceipt};
use sideload_config::{CanonicalConfig, ReplicateAnchor};
use sideload_core::NormalizedDataset;
use sideload_core::report::{RunReport, UploadResult};
use sideload_ingest::RecordError;

use crate::progress::Progress;
use crate::ui;

pub struct UploadOrchestrator<'a, A> {
    api: &'a A,
    canonical: &'a CanonicalConfig,
    anchor: ReplicateAnchor,
}

impl<'a, A: SideloadApi> UploadOrchestrator<'a, A> {
    pub const fn new(api: &'a A, canonical: &'a CanonicalConfig, anchor: ReplicateAnchor) -> Self {
        Self {
            api,
            canonical,
            anchor,
        }
    }

    /// Upload every folder of every resolved record.
    pub async fn process(&self, records: &[Result<NormalizedDataset, RecordError>]) -> RunReport {
        let started_at = Utc::now();
        let total: usize = records
            .iter()
            .map(|record| match record {
                Ok(dataset) => dataset.paths.len(),
                Err(rejected) => rejected.paths.len(),
            })
            .sum();
        let progress = Progress::folders(total);

        let mut results = Vec::with_capacity(total);
        for record in records {
            match record {
                Ok(dataset) => self.process_dataset(dataset, &progress, &mut results).await,
                Err(rejected) => report_rejected(rejected, &progress, &mut results),
            }
        }

        progress.clear();
        let report = RunReport::new(started_at, results);
        tracing::info!(
            succeeded = report.succeeded,
            failed = report.failed,
            "upload run finished"
        );
        report
    }

    async fn process_dataset(
        &self,
        dataset: &NormalizedDataset,
        progress: &Progress,
        results: &mut Vec<UploadResult>,
    ) {
        let name = dataset.name().unwrap_or_default();
        let mut replicate_of: Option<i64> = None;

        for folder in &dataset.paths {
            let shown = folder.display().to_string();
            progress.start_folder(name, &shown);

            let result = match self.upload_folder(dataset, folder, replicate_of).await {
                Ok(receipt) => {
                    let result = UploadResult::uploaded(name, &shown, receipt.id, replicate_of);
                    replicate_of.get_or_insert(receipt.id);
                    result
                }
                Err(error) => {
                    tracing::warn!(
                        dataset = name,
                        folder = %shown,
                        error = %format!("{error:#}"),
                        "upload failed"
                    );
                    let result =
                        UploadResult::failed(name, &shown, replicate_of, format!("{error:#}"));
                    if replicate_of.is_none()
                        && let Some(id) = self.anchor_from_failure(&error)
                    {
                        replicate_of = Some(id);
                    }
                    result
                }
            };

            let line = ui::prefs().path_lines.then(|| path_line(&result));
            progress.finish_folder(line.as_deref());
            results.push(result);
        }
    }

    /// Identifier a failed upload may contribute as anchor.
    fn anchor_from_failure(&self, error: &anyhow::Error) -> Option<i64> {
        match self.anchor {
            ReplicateAnchor::FirstSuccess => None,
            ReplicateAnchor::FirstResponse => error
                .downcast_ref::<UploadError>()
                .and_then(UploadError::rejected_id),
        }
    }

    async fn upload_folder(
        &self,
        dataset: &NormalizedDataset,
        folder: &Path,
        replicate_of: Option<i64>,
    ) -> anyhow::Result<UploadReceipt> {
        let name = dataset.require_name()?;
        let target = target_dta_name(self.canonical, dataset)?;

        let work_dir = tempfile::Builder::new()
            .prefix("sideload-")
            .tempdir()
            .context("failed to create scratch directory")?;
        let archive = prepare_archive(folder, work_dir.path(), name, target)?;

        let payload = match replicate_of {
            Some(anchor) => dataset.payload_with_replicate_of(anchor),
            None => dataset.data.clone(),
        };
        let receipt = self.api.sideload(&payload, &archive).await?;

        tracing::debug!(dataset = name, id = receipt.id, ?replicate_of, "uploaded folder");
        Ok(receipt)
    }
}

fn report_rejected(rejected: &RecordError, progress: &Progress, results: &mut Vec<UploadResult>) {
    let name = rejected.name.as_deref().unwrap_or_default();
    let error = rejected.source.to_string();
    for folder in &rejected.paths {
        let shown = folder.display().to_string();
        progress.start_folder(name, &shown);
        let result = UploadResult::failed(name, &shown, None, error.clone());
        let line = ui::prefs().path_lines.then(|| path_line(&result));
        progress.finish_folder(line.as_deref());
        results.push(result);
    }
}

fn path_line(result: &UploadResult) -> String {
    match (&result.id, &result.error) {
        (Some(id), _) => format!("ok      {} {} (id {id})", result.dataset, result.folder),
        (None, Some(error)) => format!("failed  {} {}: {error}", result.dataset, result.folder),
        (None, None) => format!("failed  {} {}", result.dataset, result.folder),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::fs;
    use std::path::PathBuf;
    use std::sync::Mutex;

    use pretty_assertions::assert_eq;
    use sideload_core::payload::PayloadMap;
    use sideload_core::report::UploadStatus;
    use sideload_core::{CellValue, PayloadNode, flatten};
    use sideload_ingest::ResolutionError;

    use super::*;

    /// Records every payload and answers from a queue.
    struct FakeService {
        answers: Mutex<VecDeque<Result<UploadReceipt, UploadError>>>,
        payloads: Mutex<Vec<PayloadMap>>,
        archives: Mutex<Vec<String>>,
    }

    impl FakeService {
        fn answering(answers: Vec<Result<UploadReceipt, UploadError>>) -> Self {
            Self {
                answers: Mutex::new(answers.into()),
                payloads: Mutex::new(Vec::new()),
                archives: Mutex::new(Vec::new()),
            }
        }

        fn replicate_of(&self) -> Vec<Option<i64>> {
            self.payloads
                .lock()
                .unwrap()
                .iter()
                .map(|payload| {
                    payload
                        .get("replicate_of")
                        .and_then(PayloadNode::as_leaf)
                        .and_then(CellValue::as_identifier)
                })
                .collect()
        }
    }

    impl SideloadApi for FakeService {
        async fn sideload(
            &self,
            payload: &PayloadMap,
            archive: &Path,
        ) -> Result<UploadReceipt, UploadError> {
            assert!(archive.is_file(), "archive must exist during upload");
            self.payloads.lock().unwrap().push(payload.clone());
            self.archives.lock().unwrap().push(
                archive
                    .file_name()
                    .unwrap()
                    .to_string_lossy()
                    .into_owned(),
            );
            self.answers
                .lock()
                .unwrap()
                .pop_front()
                .expect("unexpected upload")
        }
    }

    fn rejected(id: Option<i64>) -> Result<UploadReceipt, UploadError> {
        Err(UploadError::Rejected {
            status: 500,
            id,
            message: "boom".into(),
        })
    }

    /// A run directory with a complete `dta` folder.
    fn run_directory() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("dta")).unwrap();
        fs::write(root.join("dta/a.out"), "a").unwrap();
        for suffix in ["html", "png", "txt", "vennDiagram.png"] {
            fs::write(root.join(format!("combined_dta.{suffix}")), "dta/a.out").unwrap();
        }
        dir
    }

    fn dataset(name: &str, ratio: &str, paths: Vec<PathBuf>) -> NormalizedDataset {
        NormalizedDataset {
            data: flatten([
                ("name".to_string(), PayloadNode::Leaf(CellValue::from_text(name))),
                (
                    "ratio_numerator".to_string(),
                    PayloadNode::Leaf(CellValue::from_text(ratio)),
                ),
            ]),
            paths,
        }
    }

    #[tokio::test]
    async fn second_folder_is_linked_to_first_upload() {
        //* Given
        let (first, second) = (run_directory(), run_directory());
        let datasets = vec![Ok(dataset(
            "Foo",
            "H",
            vec![first.path().join("dta"), second.path().join("dta")],
        ))];
        let service = FakeService::answering(vec![
            Ok(UploadReceipt { id: 42 }),
            Ok(UploadReceipt { id: 43 }),
        ]);
        let canonical = CanonicalConfig::default();

        //* When
        let report = UploadOrchestrator::new(&service, &canonical, ReplicateAnchor::FirstSuccess)
            .process(&datasets)
            .await;

        //* Then
        assert_eq!(service.replicate_of(), vec![None, Some(42)]);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.results[0].id, Some(42));
        assert_eq!(report.results[1].replicate_of, Some(42));
        assert_eq!(*service.archives.lock().unwrap(), vec!["Foo.zip", "Foo.zip"]);
    }

    #[tokio::test]
    async fn failed_folder_does_not_stop_the_run() {
        //* Given
        let (good, other) = (run_directory(), run_directory());
        let datasets = vec![
            Ok(dataset(
                "Foo",
                "L",
                vec![PathBuf::from("/nonexistent/sideload/dta"), good.path().join("dta")],
            )),
            Ok(dataset("Bar", "L", vec![other.path().join("dta")])),
        ];
        let service =
            FakeService::answering(vec![Ok(UploadReceipt { id: 7 }), Ok(UploadReceipt { id: 8 })]);
        let canonical = CanonicalConfig::default();

        //* When
        let report = UploadOrchestrator::new(&service, &canonical, ReplicateAnchor::FirstSuccess)
            .process(&datasets)
            .await;

        //* Then
        let statuses: Vec<UploadStatus> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![UploadStatus::Failed, UploadStatus::Uploaded, UploadStatus::Uploaded]
        );
        assert_eq!(report.failed, 1);
        assert_eq!(service.replicate_of(), vec![None, None]);
        assert_eq!(report.results[1].id, Some(7));
        assert_eq!(report.results[2].dataset, "Bar");
    }

    #[tokio::test]
    async fn rejected_upload_id_anchors_only_under_first_response() {
        for (policy, expected) in [
            (ReplicateAnchor::FirstSuccess, vec![None, None, Some(11)]),
            (ReplicateAnchor::FirstResponse, vec![None, Some(9), Some(9)]),
        ] {
            //* Given
            let dirs = [run_directory(), run_directory(), run_directory()];
            let datasets = vec![Ok(dataset(
                "Foo",
                "L",
                dirs.iter().map(|dir| dir.path().join("dta")).collect(),
            ))];
            let service = FakeService::answering(vec![
                rejected(Some(9)),
                Ok(UploadReceipt { id: 11 }),
                Ok(UploadReceipt { id: 12 }),
            ]);
            let canonical = CanonicalConfig::default();

            //* When
            UploadOrchestrator::new(&service, &canonical, policy)
                .process(&datasets)
                .await;

            //* Then
            assert_eq!(service.replicate_of(), expected, "policy {policy:?}");
        }
    }

    #[tokio::test]
    async fn unknown_ratio_fails_each_folder_without_uploading() {
        let dir = run_directory();
        let datasets = vec![Ok(dataset("Foo", "M", vec![dir.path().join("dta")]))];
        let service = FakeService::answering(Vec::new());
        let canonical = CanonicalConfig::default();

        let report = UploadOrchestrator::new(&service, &canonical, ReplicateAnchor::FirstSuccess)
            .process(&datasets)
            .await;

        assert_eq!(report.failed, 1);
        assert!(
            report.results[0]
                .error
                .as_deref()
                .is_some_and(|error| error.contains("ratio numerator M"))
        );
        assert!(service.payloads.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn rejected_record_is_reported_while_others_upload() {
        //* Given
        let dir = run_directory();
        let records = vec![
            Err(RecordError {
                record: 1,
                name: Some("Bad".into()),
                paths: vec![PathBuf::from("/bad/one/dta"), PathBuf::from("/bad/two/dta")],
                source: ResolutionError::Unresolved {
                    header: "organism".into(),
                    name: "martian".into(),
                    reason: "server answered 500".into(),
                },
            }),
            Ok(dataset("Good", "L", vec![dir.path().join("dta")])),
        ];
        let service = FakeService::answering(vec![Ok(UploadReceipt { id: 5 })]);
        let canonical = CanonicalConfig::default();

        //* When
        let report = UploadOrchestrator::new(&service, &canonical, ReplicateAnchor::FirstSuccess)
            .process(&records)
            .await;

        //* Then
        assert_eq!((report.succeeded, report.failed), (1, 2));
        assert_eq!(report.results[0].dataset, "Bad");
        assert_eq!(report.results[1].folder, "/bad/two/dta");
        assert!(
            report.results[0]
                .error
                .as_deref()
                .is_some_and(|error| error.contains("martian"))
        );
        assert_eq!(report.results[2].id, Some(5));
        assert_eq!(service.payloads.lock().unwrap().len(), 1);
    }

    #[test]
    fn path_lines_name_dataset_and_folder() {
        let ok = UploadResult::uploaded("Foo", "/a/dta", 42, None);
        let failed = UploadResult::failed("Foo", "/b/dta", Some(42), "rejected".into());

        assert_eq!(path_line(&ok), "ok      Foo /a/dta (id 42)");
        assert_eq!(path_line(&failed), "failed  Foo /b/dta: rejected");
    }
}
