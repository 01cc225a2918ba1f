//! grist-client: typed client for the Grist REST API
//!
//! Wraps the handful of endpoints an access-administration tool needs:
//! listing organizations and their members, walking workspaces and
//! documents, and reading or patching per-document access lists. The
//! credential is explicit configuration handed to the constructor, and
//! every operation maps failures into a small typed taxonomy
//! (authentication, network, API, decode).

pub mod api;
pub mod config;
pub mod error;
mod http;
pub mod types;

pub use api::GristClient;
pub use config::{GristConfig, API_KEY_VAR, BASE_URL_VAR, DEFAULT_BASE_URL};
pub use error::{ClientError, Result};
pub use types::{AccessDelta, AccessEntry, AccessLevel, Document, Organization, Workspace};
