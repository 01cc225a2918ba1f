//! Organization-wide access aggregation
//!
//! Walks Organization → Workspace → Document and reads each document's
//! access list, producing one flat row per (document, user) pair. A single
//! document failing to answer does not abort the scan; its row is marked
//! and the walk continues.

use grist_client::{AccessEntry, Result};
use tracing::warn;

use crate::store::AccessStore;

/// Lookup key for a document inside the scanned tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentRef {
    pub id: String,
    pub name: String,
    pub workspace: String,
}

/// One row of the aggregated access table
#[derive(Debug, Clone)]
pub enum AccessRow {
    /// A user observed on a document
    Granted {
        document: DocumentRef,
        entry: AccessEntry,
    },
    /// A document with no explicit user entries still appears in the table
    Unlisted { document: DocumentRef },
    /// The document's access list could not be fetched
    Failed { document: DocumentRef, error: String },
}

impl AccessRow {
    pub fn document(&self) -> &DocumentRef {
        match self {
            AccessRow::Granted { document, .. }
            | AccessRow::Unlisted { document }
            | AccessRow::Failed { document, .. } => document,
        }
    }

    /// Whether this row only reflects access inherited from a parent
    pub fn is_inherited(&self) -> bool {
        matches!(self, AccessRow::Granted { entry, .. } if entry.inherited)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, AccessRow::Failed { .. })
    }
}

/// Scan an organization into a flat access table.
///
/// The workspace listing itself failing aborts the scan (there is nothing
/// to walk); per-document access failures degrade into [`AccessRow::Failed`]
/// rows. An organization with zero documents yields an empty table.
pub async fn scan_organization<S: AccessStore + Sync>(
    store: &S,
    org: &str,
) -> Result<Vec<AccessRow>> {
    let workspaces = store.workspaces(org).await?;
    let mut rows = Vec::new();

    for workspace in &workspaces {
        for doc in &workspace.docs {
            let document = DocumentRef {
                id: doc.id.clone(),
                name: doc.name.trim().to_string(),
                workspace: workspace.name.trim().to_string(),
            };

            match store.document_access(&doc.id).await {
                Ok(entries) if entries.is_empty() => {
                    rows.push(AccessRow::Unlisted { document });
                }
                Ok(entries) => {
                    for entry in entries {
                        rows.push(AccessRow::Granted {
                            document: document.clone(),
                            entry,
                        });
                    }
                }
                Err(err) => {
                    warn!(doc = %document.id, error = %err, "access fetch failed, continuing scan");
                    rows.push(AccessRow::Failed {
                        document,
                        error: err.to_string(),
                    });
                }
            }
        }
    }

    Ok(rows)
}

/// Drop rows that only reflect inherited access
pub fn without_inherited(rows: Vec<AccessRow>) -> Vec<AccessRow> {
    rows.into_iter().filter(|row| !row.is_inherited()).collect()
}
