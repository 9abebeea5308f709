//! Point Ledger Repository

use crate::error::StoreResult;
use async_trait::async_trait;
use hcms_core::{LedgerFilter, NewLedgerEntry, PointLedgerEntry};

/// Append-only point ledger
#[async_trait]
pub trait PointLedgerRepository: Send + Sync {
    /// Entries matching every populated field of `filter`
    async fn query_entries(&self, filter: &LedgerFilter) -> StoreResult<Vec<PointLedgerEntry>>;

    /// Append a new entry and return it with its assigned id.
    ///
    /// Existing entries are never modified.
    async fn append_entry(&self, entry: NewLedgerEntry) -> StoreResult<PointLedgerEntry>;
}
