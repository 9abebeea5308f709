//! Maintenance Ticket Repository

use crate::error::StoreResult;
use async_trait::async_trait;
use hcms_core::{MaintenanceComment, TicketId};
use std::collections::HashMap;

/// Ticket lookups used by reporting
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Titles of the given tickets; unknown ids are omitted
    async fn ticket_titles(&self, ticket_ids: &[TicketId]) -> StoreResult<HashMap<TicketId, String>>;

    /// Comments with a positive point value on the given tickets
    async fn point_comments(&self, ticket_ids: &[TicketId])
        -> StoreResult<Vec<MaintenanceComment>>;
}
