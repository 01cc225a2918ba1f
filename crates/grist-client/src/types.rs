//! Domain types for Grist organizations, workspaces, documents, and access
//!
//! All entities are transient snapshots read fresh from the remote service;
//! the service itself is the source of truth.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

/// A Grist organization (team site), the top-level tenant grouping.
///
/// Read-only from this tool's perspective.
#[derive(Debug, Clone, Deserialize)]
pub struct Organization {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub domain: Option<String>,
}

/// A folder-like grouping of documents within an organization.
///
/// The workspace listing endpoint embeds each workspace's documents, so the
/// documents arrive in the same response.
#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub docs: Vec<Document>,
}

/// The unit on which fine-grained access entries are set
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub name: String,
}

/// Access level a user holds on a document or organization.
///
/// The absence of access ("none") is represented as `Option::None` wherever
/// a level may be missing; the wire encoding for removal is `null`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AccessLevel {
    Viewer,
    Editor,
    Owner,
}

impl AccessLevel {
    /// Wire name used by the Grist access delta ("viewers", "editors", "owners")
    pub fn as_role(&self) -> &'static str {
        match self {
            AccessLevel::Viewer => "viewers",
            AccessLevel::Editor => "editors",
            AccessLevel::Owner => "owners",
        }
    }

    /// Tolerant parse accepting both the collective wire spelling and the
    /// singular form the service uses in some responses.
    pub fn parse(value: &str) -> Option<AccessLevel> {
        match value.trim().to_ascii_lowercase().as_str() {
            "viewer" | "viewers" => Some(AccessLevel::Viewer),
            "editor" | "editors" => Some(AccessLevel::Editor),
            "owner" | "owners" => Some(AccessLevel::Owner),
            _ => None,
        }
    }
}

impl fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_role())
    }
}

impl FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccessLevel::parse(s).ok_or_else(|| format!("unknown access level: {}", s))
    }
}

impl Serialize for AccessLevel {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_role())
    }
}

/// One user's access on a single resource (document or organization).
///
/// At most one entry exists per (user, resource) pair.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessEntry {
    /// Remote user id, when the service reports one
    pub user_id: Option<i64>,
    pub email: String,
    pub name: String,
    /// Document or organization the entry was read from
    pub resource_id: String,
    /// `None` means the user is listed without direct access
    pub level: Option<AccessLevel>,
    /// Level comes from the parent resource rather than a direct grant
    pub inherited: bool,
}

impl AccessEntry {
    /// Display form of the level, marking inherited grants
    pub fn level_label(&self) -> String {
        match (self.level, self.inherited) {
            (Some(level), false) => level.to_string(),
            (Some(level), true) => format!("{} (inherited)", level),
            (None, _) => "none".to_string(),
        }
    }
}

/// A batch of per-user access changes for one document.
///
/// Serializes to the `users` map of the Grist access delta: a level grants
/// or overwrites, `null` removes. Submitting the same final state twice is a
/// no-op on the remote side.
#[derive(Debug, Clone, Default, Serialize)]
pub struct AccessDelta {
    users: BTreeMap<String, Option<AccessLevel>>,
}

impl AccessDelta {
    pub fn new() -> Self {
        Self::default()
    }

    /// Grant or overwrite `email` at `level`
    pub fn set(mut self, email: impl Into<String>, level: AccessLevel) -> Self {
        self.users.insert(email.into(), Some(level));
        self
    }

    /// Remove all access for `email`
    pub fn clear(mut self, email: impl Into<String>) -> Self {
        self.users.insert(email.into(), None);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }
}
