//! Seam over the remote permission service
//!
//! The aggregator and the bulk executor talk to this trait instead of the
//! concrete client, so their semantics can be exercised against in-memory
//! fakes.

use async_trait::async_trait;

use grist_client::{AccessEntry, AccessLevel, GristClient, Result, Workspace};

/// The slice of the remote service the access layer needs: the workspace
/// tree and per-document access reads and writes.
#[async_trait]
pub trait AccessStore {
    /// Workspaces of an organization, each with its documents
    async fn workspaces(&self, org: &str) -> Result<Vec<Workspace>>;

    /// Current access list of a document
    async fn document_access(&self, doc_id: &str) -> Result<Vec<AccessEntry>>;

    /// Grant, change, or remove (`None`) one user's access on a document
    async fn update_access(
        &self,
        doc_id: &str,
        email: &str,
        level: Option<AccessLevel>,
    ) -> Result<()>;
}

#[async_trait]
impl AccessStore for GristClient {
    async fn workspaces(&self, org: &str) -> Result<Vec<Workspace>> {
        self.list_workspaces(org).await
    }

    async fn document_access(&self, doc_id: &str) -> Result<Vec<AccessEntry>> {
        self.get_document_access(doc_id).await
    }

    async fn update_access(
        &self,
        doc_id: &str,
        email: &str,
        level: Option<AccessLevel>,
    ) -> Result<()> {
        self.update_user_access(doc_id, email, level).await
    }
}
