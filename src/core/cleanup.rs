//! Deletion executor for flagged catalog entries.
//!
//! Dry-run is the default and the review listing is printed on every run,
//! including live ones. A live run additionally requires the caller-supplied
//! confirmation to succeed before any request is sent. Individual delete
//! failures are recorded and the run continues.

use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::catalog::EntryKind;
use crate::http::CatalogApi;
use crate::report::ClassifiedEntry;

/// Delay between consecutive delete requests.
pub const DEFAULT_PACE: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct CleanupOptions {
    /// When false (the default) the run stops after the review listing.
    pub execute: bool,
    pub pace: Duration,
}

impl Default for CleanupOptions {
    fn default() -> Self {
        Self {
            execute: false,
            pace: DEFAULT_PACE,
        }
    }
}

/// One entry scheduled for deletion, with the reasons it was flagged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: String,
    pub name: String,
    pub reasons: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    NothingToDo,
    DryRun,
    Aborted,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletionOutcome {
    pub entry_id: String,
    pub name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CleanupOutcome {
    pub status: RunStatus,
    pub candidates: Vec<Candidate>,
    pub deleted_count: usize,
    pub error_count: usize,
    pub outcomes: Vec<DeletionOutcome>,
    /// Fraction of attempted deletions that succeeded. Only present when at
    /// least one deletion failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_rate: Option<f64>,
}

impl CleanupOutcome {
    fn without_deletions(status: RunStatus, candidates: Vec<Candidate>) -> Self {
        Self {
            status,
            candidates,
            deleted_count: 0,
            error_count: 0,
            outcomes: Vec::new(),
            success_rate: None,
        }
    }
}

/// Select deletion candidates from a classified set. Only entries whose
/// classification actually flagged them are eligible; essentials never are.
pub fn plan(classified: &[ClassifiedEntry]) -> Vec<Candidate> {
    classified
        .iter()
        .filter(|item| item.classification.is_flagged())
        .map(|item| Candidate {
            id: item.entry.id.clone(),
            name: item.entry.name.clone(),
            reasons: item.classification.issues.clone(),
        })
        .collect()
}

/// Run the executor over `candidates`.
///
/// The review listing always prints first. Without `execute` the run ends
/// there; with it, `confirm` decides whether deletions proceed.
pub fn run(
    api: &dyn CatalogApi,
    kind: EntryKind,
    candidates: Vec<Candidate>,
    confirm: &mut dyn FnMut() -> bool,
    options: &CleanupOptions,
) -> CleanupOutcome {
    if candidates.is_empty() {
        log_status!("cleanup", "No {} flagged for removal", kind.plural());
        return CleanupOutcome::without_deletions(RunStatus::NothingToDo, candidates);
    }

    log_status!(
        "cleanup",
        "{} {} flagged for removal:",
        candidates.len(),
        kind.plural()
    );
    for candidate in &candidates {
        log_status!(
            "cleanup",
            "  - {} ({}): {}",
            candidate.name,
            candidate.id,
            candidate.reasons.join(", ")
        );
    }

    if !options.execute {
        log_status!("cleanup", "Dry run only. Re-run with --execute to delete.");
        return CleanupOutcome::without_deletions(RunStatus::DryRun, candidates);
    }

    if !confirm() {
        log_status!("cleanup", "Aborted, nothing deleted");
        return CleanupOutcome::without_deletions(RunStatus::Aborted, candidates);
    }

    let mut outcomes = Vec::with_capacity(candidates.len());
    let mut deleted_count = 0;
    let mut error_count = 0;

    for (index, candidate) in candidates.iter().enumerate() {
        match api.delete(kind, &candidate.id) {
            Ok(()) => {
                log_status!("cleanup", "Deleted '{}' ({})", candidate.name, candidate.id);
                deleted_count += 1;
                outcomes.push(DeletionOutcome {
                    entry_id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    success: true,
                    error: None,
                });
            }
            Err(err) => {
                log_status!(
                    "cleanup",
                    "Failed to delete '{}' ({}): {}",
                    candidate.name,
                    candidate.id,
                    err.message
                );
                error_count += 1;
                outcomes.push(DeletionOutcome {
                    entry_id: candidate.id.clone(),
                    name: candidate.name.clone(),
                    success: false,
                    error: Some(err.message),
                });
            }
        }

        if index + 1 < candidates.len() && !options.pace.is_zero() {
            thread::sleep(options.pace);
        }
    }

    let success_rate = if error_count > 0 {
        Some(deleted_count as f64 / (deleted_count + error_count) as f64)
    } else {
        None
    };

    log_status!(
        "cleanup",
        "Done: {} deleted, {} failed",
        deleted_count,
        error_count
    );

    CleanupOutcome {
        status: RunStatus::Completed,
        candidates,
        deleted_count,
        error_count,
        outcomes,
        success_rate,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEntry;
    use crate::classify::Classifier;
    use crate::error::{Error, Result};
    use serde_json::Value;
    use std::cell::RefCell;

    struct FakeApi {
        deleted: RefCell<Vec<String>>,
        fail_ids: Vec<String>,
    }

    impl FakeApi {
        fn new() -> Self {
            Self {
                deleted: RefCell::new(Vec::new()),
                fail_ids: Vec::new(),
            }
        }

        fn failing_on(ids: &[&str]) -> Self {
            Self {
                deleted: RefCell::new(Vec::new()),
                fail_ids: ids.iter().map(|s| s.to_string()).collect(),
            }
        }
    }

    impl CatalogApi for FakeApi {
        fn list_page(&self, _kind: EntryKind, _page: u32, _page_size: u32) -> Result<Vec<Value>> {
            Ok(Vec::new())
        }

        fn delete(&self, _kind: EntryKind, id: &str) -> Result<()> {
            if self.fail_ids.iter().any(|f| f == id) {
                return Err(Error::api_request_failed(
                    Some(500),
                    "server error",
                    Some(format!("delete property {id}")),
                ));
            }
            self.deleted.borrow_mut().push(id.to_string());
            Ok(())
        }
    }

    fn classified_fixture() -> Vec<ClassifiedEntry> {
        let classifier = Classifier::with_defaults();
        ["zip_code", "userId", "old_debug_flag"]
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let entry = CatalogEntry {
                    id: format!("p{}", i + 1),
                    name: name.to_string(),
                    description: None,
                    data_type: None,
                    event_type: None,
                    created_at: None,
                };
                let classification = classifier.classify(&entry, EntryKind::Property);
                ClassifiedEntry {
                    entry,
                    classification,
                }
            })
            .collect()
    }

    fn fast() -> CleanupOptions {
        CleanupOptions {
            execute: true,
            pace: Duration::ZERO,
        }
    }

    #[test]
    fn plan_selects_only_flagged_entries() {
        let candidates = plan(&classified_fixture());
        let ids: Vec<&str> = candidates.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
        assert!(!candidates[0].reasons.is_empty());
    }

    #[test]
    fn dry_run_never_calls_delete() {
        let api = FakeApi::new();
        let candidates = plan(&classified_fixture());
        let mut confirm = || panic!("confirmation must not be asked in a dry run");

        let outcome = run(
            &api,
            EntryKind::Property,
            candidates,
            &mut confirm,
            &CleanupOptions::default(),
        );

        assert_eq!(outcome.status, RunStatus::DryRun);
        assert_eq!(outcome.deleted_count, 0);
        assert!(api.deleted.borrow().is_empty());
    }

    #[test]
    fn declined_confirmation_aborts_without_deleting() {
        let api = FakeApi::new();
        let candidates = plan(&classified_fixture());
        let mut confirm = || false;

        let outcome = run(&api, EntryKind::Property, candidates, &mut confirm, &fast());

        assert_eq!(outcome.status, RunStatus::Aborted);
        assert!(api.deleted.borrow().is_empty());
    }

    #[test]
    fn confirmed_run_deletes_every_candidate() {
        let api = FakeApi::new();
        let candidates = plan(&classified_fixture());
        let mut confirm = || true;

        let outcome = run(&api, EntryKind::Property, candidates, &mut confirm, &fast());

        assert_eq!(outcome.status, RunStatus::Completed);
        assert_eq!(outcome.deleted_count, 2);
        assert_eq!(outcome.error_count, 0);
        assert_eq!(outcome.success_rate, None);
        assert_eq!(*api.deleted.borrow(), vec!["p1", "p3"]);
    }

    #[test]
    fn failed_deletion_is_recorded_and_run_continues() {
        let api = FakeApi::failing_on(&["p1"]);
        let candidates = plan(&classified_fixture());
        let mut confirm = || true;

        let outcome = run(&api, EntryKind::Property, candidates, &mut confirm, &fast());

        assert_eq!(outcome.status, RunStatus::Completed);
        assert_eq!(outcome.deleted_count, 1);
        assert_eq!(outcome.error_count, 1);
        assert_eq!(outcome.success_rate, Some(0.5));
        assert!(!outcome.outcomes[0].success);
        assert!(outcome.outcomes[0].error.is_some());
        assert_eq!(*api.deleted.borrow(), vec!["p3"]);
    }

    #[test]
    fn empty_candidate_list_is_nothing_to_do() {
        let api = FakeApi::new();
        let mut confirm = || panic!("must not confirm with nothing to delete");

        let outcome = run(&api, EntryKind::Property, Vec::new(), &mut confirm, &fast());

        assert_eq!(outcome.status, RunStatus::NothingToDo);
        assert!(api.deleted.borrow().is_empty());
    }
}
