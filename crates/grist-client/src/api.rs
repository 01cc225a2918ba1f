//! Grist REST API operations
//!
//! Endpoints consumed: list organizations, organization access, workspace
//! listing (with embedded documents), and per-document access reads/writes.
//! Response decoding lives in standalone `parse_*` functions over the raw
//! JSON body so the shapes can be exercised without a network.

use serde::{Deserialize, Serialize};

use crate::config::GristConfig;
use crate::error::{ClientError, Result};
use crate::http::HttpTransport;
use crate::types::{AccessDelta, AccessEntry, AccessLevel, Document, Organization, Workspace};

/// Client for the Grist REST API
pub struct GristClient {
    transport: HttpTransport,
}

impl GristClient {
    /// Build a client from explicit configuration
    pub fn new(config: GristConfig) -> Result<Self> {
        Ok(Self {
            transport: HttpTransport::new(config)?,
        })
    }

    /// Build a client from the process environment (`GRIST_API_KEY`,
    /// optional `GRIST_BASE_URL`)
    pub fn from_env() -> Result<Self> {
        Self::new(GristConfig::from_env()?)
    }

    /// List the organizations visible to the credential
    pub async fn list_orgs(&self) -> Result<Vec<Organization>> {
        let body = self.transport.get(&["orgs"]).await?;
        parse_org_list(&body)
    }

    /// List organization-level members.
    ///
    /// `org` may be a numeric id or a team subdomain. The endpoint answers
    /// with the member collection wrapped under a `users` field on some
    /// deployments and a bare object on others; the bare shape yields an
    /// empty list rather than an error.
    pub async fn list_org_members(&self, org: &str) -> Result<Vec<AccessEntry>> {
        let body = self.transport.get(&["orgs", org, "access"]).await?;
        parse_member_list(&body, org)
    }

    /// List an organization's workspaces, each with its embedded documents
    pub async fn list_workspaces(&self, org: &str) -> Result<Vec<Workspace>> {
        let body = self.transport.get(&["orgs", org, "workspaces"]).await?;
        parse_workspace_list(&body)
    }

    /// List the documents of a single workspace
    pub async fn list_documents(&self, workspace_id: i64) -> Result<Vec<Document>> {
        let body = self
            .transport
            .get(&["workspaces", &workspace_id.to_string()])
            .await?;
        Ok(parse_workspace(&body)?.docs)
    }

    /// Read the access list of a document, including inherited grants
    pub async fn get_document_access(&self, doc_id: &str) -> Result<Vec<AccessEntry>> {
        let body = self.transport.get(&["docs", doc_id, "access"]).await?;
        parse_member_list(&body, doc_id)
    }

    /// Apply a batch of per-user access changes to a document.
    ///
    /// Idempotent on the remote side: re-submitting the same final state
    /// changes nothing and does not error. An empty delta is skipped
    /// locally.
    pub async fn set_document_access(&self, doc_id: &str, delta: &AccessDelta) -> Result<()> {
        if delta.is_empty() {
            return Ok(());
        }
        let patch = AccessPatch { delta };
        self.transport
            .patch_json(&["docs", doc_id, "access"], &patch)
            .await?;
        Ok(())
    }

    /// Grant, change, or remove (`None`) a single user's access on a document
    pub async fn update_user_access(
        &self,
        doc_id: &str,
        email: &str,
        level: Option<AccessLevel>,
    ) -> Result<()> {
        let delta = match level {
            Some(level) => AccessDelta::new().set(email.trim(), level),
            None => AccessDelta::new().clear(email.trim()),
        };
        self.set_document_access(doc_id, &delta).await
    }
}

#[derive(Serialize)]
struct AccessPatch<'a> {
    delta: &'a AccessDelta,
}

/// One user row as the access endpoints report it
#[derive(Debug, Deserialize)]
struct UserRecord {
    id: Option<i64>,
    email: Option<String>,
    name: Option<String>,
    access: Option<String>,
    #[serde(rename = "parentAccess")]
    parent_access: Option<String>,
}

/// The two shapes the member endpoints answer with: a collection wrapped
/// under `users`, or a bare object without it.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum MemberListResponse {
    Wrapped { users: Vec<UserRecord> },
    Bare(serde_json::Value),
}

/// Parse the organization listing
pub fn parse_org_list(json: &str) -> Result<Vec<Organization>> {
    serde_json::from_str(json)
        .map_err(|e| ClientError::Decode(format!("invalid organization list: {}", e)))
}

/// Parse a member list, tolerating both response shapes.
///
/// Rows without an email are dropped; they cannot be addressed by any
/// access operation.
pub fn parse_member_list(json: &str, resource_id: &str) -> Result<Vec<AccessEntry>> {
    let response: MemberListResponse = serde_json::from_str(json)
        .map_err(|e| ClientError::Decode(format!("invalid member list: {}", e)))?;

    let records = match response {
        MemberListResponse::Wrapped { users } => users,
        MemberListResponse::Bare(_) => return Ok(Vec::new()),
    };

    Ok(records
        .into_iter()
        .filter_map(|record| entry_from_record(record, resource_id))
        .collect())
}

/// Parse the workspace listing (with embedded documents)
pub fn parse_workspace_list(json: &str) -> Result<Vec<Workspace>> {
    serde_json::from_str(json)
        .map_err(|e| ClientError::Decode(format!("invalid workspace list: {}", e)))
}

/// Parse a single workspace
pub fn parse_workspace(json: &str) -> Result<Workspace> {
    serde_json::from_str(json).map_err(|e| ClientError::Decode(format!("invalid workspace: {}", e)))
}

fn entry_from_record(record: UserRecord, resource_id: &str) -> Option<AccessEntry> {
    let email = record.email?.trim().to_string();
    if email.is_empty() {
        return None;
    }

    let direct = record.access.as_deref().and_then(AccessLevel::parse);
    let parent = record.parent_access.as_deref().and_then(AccessLevel::parse);
    let (level, inherited) = match direct {
        Some(level) => (Some(level), false),
        None => (parent, parent.is_some()),
    };

    Some(AccessEntry {
        user_id: record.id,
        email,
        name: record.name.unwrap_or_default().trim().to_string(),
        resource_id: resource_id.to_string(),
        level,
        inherited,
    })
}
