//! Bulk access operations
//!
//! A bulk operation is compiled by a pure planning step into an ordered
//! list of single-user access calls (one remote write per affected
//! (user, document) pair), which the executor then issues sequentially.
//! There is no rollback: failures are recorded per call and already-applied
//! changes remain.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, warn};

use grist_client::{AccessLevel, ClientError};

use crate::aggregate::{AccessRow, DocumentRef};
use crate::store::AccessStore;

/// One selected row of the access table: a user's current standing on a
/// document, as the operator picked it for a bulk operation.
#[derive(Debug, Clone)]
pub struct AccessSelection {
    pub document: DocumentRef,
    pub email: String,
    /// `None` when the row only reflects inherited or absent access
    pub level: Option<AccessLevel>,
}

impl AccessSelection {
    /// Build a selection from a granted row of the aggregated table.
    ///
    /// Inherited levels count as the row's level, so copying an inherited
    /// grant promotes it to a direct one. Unlisted and failed rows are not
    /// selectable.
    pub fn from_row(row: &AccessRow) -> Option<Self> {
        match row {
            AccessRow::Granted { document, entry } => Some(Self {
                document: document.clone(),
                email: entry.email.trim().to_string(),
                level: entry.level,
            }),
            _ => None,
        }
    }
}

/// A batch transformation applied across the selected (user, document) pairs
#[derive(Debug, Clone)]
pub enum BulkOperation {
    /// Grant every selected user their current level on each target
    /// document; sources are untouched.
    Copy { targets: Vec<DocumentRef> },
    /// Copy to the targets, then remove each selected entry from its
    /// source document.
    Move { targets: Vec<DocumentRef> },
    /// Overwrite each selected entry's level in place
    SetLevel { level: AccessLevel },
    /// Delete each selected user's access from its document
    Remove,
    /// Grant the replacement user each selected entry's level on that
    /// entry's document, then remove the original user.
    Replace { email: String },
}

/// One planned remote write: set (or clear, when `level` is `None`) a
/// user's access on a document.
#[derive(Debug, Clone)]
pub struct AccessCall {
    pub document: DocumentRef,
    pub email: String,
    pub level: Option<AccessLevel>,
}

/// Compile a bulk operation into the ordered list of access calls it
/// requires. Pure; issuing the calls is the executor's job.
///
/// Sources without a concrete level are skipped for copy, move, and
/// replace; there is no level to carry. Degenerate pairs that would undo
/// their own work (moving onto the source document, replacing a user with
/// themselves) skip the removal side.
pub fn plan(operation: &BulkOperation, selection: &[AccessSelection]) -> Vec<AccessCall> {
    let mut calls = Vec::new();

    match operation {
        BulkOperation::Copy { targets } => {
            for source in selection {
                let Some(level) = source.level else { continue };
                for target in targets {
                    calls.push(AccessCall {
                        document: target.clone(),
                        email: source.email.clone(),
                        level: Some(level),
                    });
                }
            }
        }
        BulkOperation::Move { targets } => {
            for source in selection {
                let Some(level) = source.level else { continue };
                for target in targets {
                    calls.push(AccessCall {
                        document: target.clone(),
                        email: source.email.clone(),
                        level: Some(level),
                    });
                }
                let source_is_target = targets.iter().any(|t| t.id == source.document.id);
                if !source_is_target {
                    calls.push(AccessCall {
                        document: source.document.clone(),
                        email: source.email.clone(),
                        level: None,
                    });
                }
            }
        }
        BulkOperation::SetLevel { level } => {
            for source in selection {
                calls.push(AccessCall {
                    document: source.document.clone(),
                    email: source.email.clone(),
                    level: Some(*level),
                });
            }
        }
        BulkOperation::Remove => {
            for source in selection {
                calls.push(AccessCall {
                    document: source.document.clone(),
                    email: source.email.clone(),
                    level: None,
                });
            }
        }
        BulkOperation::Replace { email } => {
            let replacement = email.trim();
            for source in selection {
                let Some(level) = source.level else { continue };
                calls.push(AccessCall {
                    document: source.document.clone(),
                    email: replacement.to_string(),
                    level: Some(level),
                });
                if !source.email.eq_ignore_ascii_case(replacement) {
                    calls.push(AccessCall {
                        document: source.document.clone(),
                        email: source.email.clone(),
                        level: None,
                    });
                }
            }
        }
    }

    calls
}

/// Shared flag to abort a running bulk operation.
///
/// Once set, the executor issues no further calls; calls already issued are
/// never undone.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// What happened to one planned call
#[derive(Debug)]
pub enum CallStatus {
    Applied,
    Failed(ClientError),
    /// Not issued because the operation was cancelled first
    Skipped,
}

/// A planned call together with its outcome
#[derive(Debug)]
pub struct CallOutcome {
    pub call: AccessCall,
    pub status: CallStatus,
}

/// Aggregate outcome of a bulk operation, one entry per planned call
#[derive(Debug, Default)]
pub struct BulkReport {
    pub outcomes: Vec<CallOutcome>,
}

impl BulkReport {
    pub fn applied(&self) -> usize {
        self.count(|s| matches!(s, CallStatus::Applied))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, CallStatus::Failed(_)))
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, CallStatus::Skipped))
    }

    fn count(&self, pred: impl Fn(&CallStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }

    /// Full success means every planned call was applied
    pub fn is_complete(&self) -> bool {
        self.failed() == 0 && self.skipped() == 0
    }

    /// Collapse the report into a result: full success, or a
    /// [`PartialFailure`] summary when any call failed or was skipped.
    pub fn summary(&self) -> Result<usize, PartialFailure> {
        if self.is_complete() {
            return Ok(self.applied());
        }
        let first_error = self
            .outcomes
            .iter()
            .find_map(|o| match &o.status {
                CallStatus::Failed(err) => {
                    Some(format!("{} on {}: {}", o.call.email, o.call.document.id, err))
                }
                _ => None,
            })
            .unwrap_or_else(|| "cancelled before completion".to_string());

        Err(PartialFailure {
            applied: self.applied(),
            failed: self.failed(),
            skipped: self.skipped(),
            first_error,
        })
    }
}

/// One or more calls of a bulk operation failed or were skipped while
/// others succeeded. Applied changes remain in effect.
#[derive(Error, Debug)]
#[error("bulk operation incomplete: {applied} applied, {failed} failed, {skipped} skipped ({first_error})")]
pub struct PartialFailure {
    pub applied: usize,
    pub failed: usize,
    pub skipped: usize,
    pub first_error: String,
}

/// Issues planned calls sequentially against a store
pub struct BulkExecutor<'a, S> {
    store: &'a S,
    cancel: CancelFlag,
}

impl<'a, S: AccessStore + Sync> BulkExecutor<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            cancel: CancelFlag::new(),
        }
    }

    /// Use an externally held cancel flag
    pub fn with_cancel_flag(store: &'a S, cancel: CancelFlag) -> Self {
        Self { store, cancel }
    }

    /// Handle for aborting the operation from the caller's side
    pub fn cancel_flag(&self) -> CancelFlag {
        self.cancel.clone()
    }

    /// Plan and execute an operation over the selection
    pub async fn execute(
        &self,
        operation: &BulkOperation,
        selection: &[AccessSelection],
    ) -> BulkReport {
        self.apply(plan(operation, selection)).await
    }

    /// Issue a list of planned calls in order, one at a time.
    ///
    /// A failed call is recorded and execution continues with the next
    /// call. Once the cancel flag is set, the remaining calls are recorded
    /// as skipped without being issued.
    pub async fn apply(&self, calls: Vec<AccessCall>) -> BulkReport {
        let mut report = BulkReport::default();

        for call in calls {
            if self.cancel.is_cancelled() {
                report.outcomes.push(CallOutcome {
                    call,
                    status: CallStatus::Skipped,
                });
                continue;
            }

            let result = self
                .store
                .update_access(&call.document.id, &call.email, call.level)
                .await;

            let status = match result {
                Ok(()) => {
                    debug!(doc = %call.document.id, email = %call.email, "access updated");
                    CallStatus::Applied
                }
                Err(err) => {
                    warn!(doc = %call.document.id, email = %call.email, error = %err, "access update failed");
                    CallStatus::Failed(err)
                }
            };
            report.outcomes.push(CallOutcome { call, status });
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str) -> DocumentRef {
        DocumentRef {
            id: id.to_string(),
            name: id.to_uppercase(),
            workspace: "ws".to_string(),
        }
    }

    fn selected(doc_id: &str, email: &str, level: Option<AccessLevel>) -> AccessSelection {
        AccessSelection {
            document: doc(doc_id),
            email: email.to_string(),
            level,
        }
    }

    #[test]
    fn test_copy_plans_no_source_writes() {
        let selection = vec![selected("a", "alice@x", Some(AccessLevel::Editor))];
        let calls = plan(
            &BulkOperation::Copy {
                targets: vec![doc("b"), doc("c")],
            },
            &selection,
        );

        assert_eq!(calls.len(), 2);
        assert!(calls.iter().all(|c| c.document.id != "a"));
        assert!(calls.iter().all(|c| c.level == Some(AccessLevel::Editor)));
    }

    #[test]
    fn test_copy_skips_levelless_sources() {
        let selection = vec![selected("a", "alice@x", None)];
        let calls = plan(
            &BulkOperation::Copy {
                targets: vec![doc("b")],
            },
            &selection,
        );
        assert!(calls.is_empty());
    }

    #[test]
    fn test_move_grants_before_removal() {
        let selection = vec![selected("a", "alice@x", Some(AccessLevel::Owner))];
        let calls = plan(
            &BulkOperation::Move {
                targets: vec![doc("b")],
            },
            &selection,
        );

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].document.id, "b");
        assert_eq!(calls[0].level, Some(AccessLevel::Owner));
        assert_eq!(calls[1].document.id, "a");
        assert_eq!(calls[1].level, None);
    }

    #[test]
    fn test_move_onto_source_skips_removal() {
        let selection = vec![selected("a", "alice@x", Some(AccessLevel::Editor))];
        let calls = plan(
            &BulkOperation::Move {
                targets: vec![doc("a")],
            },
            &selection,
        );

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].level, Some(AccessLevel::Editor));
    }

    #[test]
    fn test_set_level_touches_only_selected_documents() {
        let selection = vec![
            selected("a", "alice@x", Some(AccessLevel::Viewer)),
            selected("b", "bob@x", None),
        ];
        let calls = plan(
            &BulkOperation::SetLevel {
                level: AccessLevel::Editor,
            },
            &selection,
        );

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].document.id, "a");
        assert_eq!(calls[1].document.id, "b");
        assert!(calls.iter().all(|c| c.level == Some(AccessLevel::Editor)));
    }

    #[test]
    fn test_replace_grants_then_removes() {
        let selection = vec![selected("a", "old@x", Some(AccessLevel::Viewer))];
        let calls = plan(
            &BulkOperation::Replace {
                email: "new@x".to_string(),
            },
            &selection,
        );

        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].email, "new@x");
        assert_eq!(calls[0].level, Some(AccessLevel::Viewer));
        assert_eq!(calls[1].email, "old@x");
        assert_eq!(calls[1].level, None);
    }

    #[test]
    fn test_replace_with_same_user_skips_removal() {
        let selection = vec![selected("a", "same@x", Some(AccessLevel::Editor))];
        let calls = plan(
            &BulkOperation::Replace {
                email: "Same@X".to_string(),
            },
            &selection,
        );

        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].level, Some(AccessLevel::Editor));
    }

    #[test]
    fn test_empty_selection_plans_nothing() {
        let calls = plan(&BulkOperation::Remove, &[]);
        assert!(calls.is_empty());
    }
}
