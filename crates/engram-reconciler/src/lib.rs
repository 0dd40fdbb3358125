//! Engram Reconciliation Engine
//!
//! The reconciler is the single writer of the persistent workspace. Each
//! ingestion hands it the previous workspace snapshot and a freshly
//! extracted semantic structure; one oracle call merges the two into the
//! next snapshot, which is persisted wholesale before being returned.
//!
//! The merge is all-or-nothing: if the oracle's answer cannot be recovered
//! as JSON, the previous snapshot is returned untouched and nothing is
//! written, so a bad generation can never corrupt the memory.

#![warn(missing_docs)]

mod error;
mod reconciler;

pub use error::ReconcileError;
pub use reconciler::Reconciler;
