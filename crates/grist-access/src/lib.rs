//! grist-access: access aggregation and bulk permission operations
//!
//! Builds the flat (user, document, level) view of a Grist team site and
//! applies batch transformations over it (copy, move, set-level, remove,
//! replace), one sequential remote write per affected pair. Both layers
//! run against the [`AccessStore`] seam so they can be tested without a
//! remote service.

pub mod aggregate;
pub mod bulk;
pub mod store;

pub use aggregate::{scan_organization, without_inherited, AccessRow, DocumentRef};
pub use bulk::{
    plan, AccessCall, AccessSelection, BulkExecutor, BulkOperation, BulkReport, CallOutcome,
    CallStatus, CancelFlag, PartialFailure,
};
pub use store::AccessStore;
