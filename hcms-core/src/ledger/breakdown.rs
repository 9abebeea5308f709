//! Per-worker usage breakdown

use crate::calendar::DateTimeRange;
use crate::types::{LedgerFilter, LedgerScope, MaintenanceComment, PointLedgerEntry, TicketId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Name reported when the worker cannot be identified
pub const UNASSIGNED_WORKER: &str = "Unassigned";

/// Usage attributed to one worker
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkerUsage {
    pub name: String,
    pub worker_type: i32,
    pub total_used: u64,
    pub event_count: u64,
}

/// Latest comment with a positive point value per ticket.
///
/// Ties on `created_at` go to the higher comment id.
pub fn latest_point_comments(
    comments: &[MaintenanceComment],
) -> HashMap<TicketId, &MaintenanceComment> {
    let mut latest: HashMap<TicketId, &MaintenanceComment> = HashMap::new();
    for comment in comments.iter().filter(|comment| comment.point > 0) {
        latest
            .entry(comment.ticket_id)
            .and_modify(|current| {
                if (comment.created_at, comment.id) > (current.created_at, current.id) {
                    *current = comment;
                }
            })
            .or_insert(comment);
    }
    latest
}

/// Worker type shown for an entry: the matched comment's, else the entry's own
pub fn effective_worker_type(
    entry: &PointLedgerEntry,
    comment: Option<&MaintenanceComment>,
) -> Option<i32> {
    comment
        .and_then(|comment| comment.worker_type)
        .filter(|worker_type| *worker_type != 0)
        .or(entry.worker_type)
}

/// Group executed usage of `scope` within `window` by worker.
///
/// The worker comes from the latest positive-point comment on the entry's
/// ticket. Entries with no matching comment are attributed to
/// [`UNASSIGNED_WORKER`] with the entry's own worker type. Result is ordered
/// by `total_used` descending, then name and worker type.
pub fn worker_breakdown(
    entries: &[PointLedgerEntry],
    comments: &[MaintenanceComment],
    scope: LedgerScope,
    window: DateTimeRange,
) -> Vec<WorkerUsage> {
    let filter = LedgerFilter::executed_usage(scope, window);
    let latest = latest_point_comments(comments);

    let mut grouped: HashMap<(String, i32), WorkerUsage> = HashMap::new();
    for entry in entries.iter().filter(|entry| filter.matches(entry)) {
        let comment = entry
            .ticket_id
            .and_then(|ticket_id| latest.get(&ticket_id).copied());

        let name = comment
            .and_then(|comment| comment.writer.as_ref())
            .and_then(|writer| writer.display_name())
            .unwrap_or(UNASSIGNED_WORKER)
            .to_string();
        let worker_type = effective_worker_type(entry, comment).unwrap_or(0);

        let usage = grouped
            .entry((name.clone(), worker_type))
            .or_insert_with(|| WorkerUsage {
                name,
                worker_type,
                total_used: 0,
                event_count: 0,
            });
        usage.total_used = usage.total_used.saturating_add(entry.magnitude());
        usage.event_count += 1;
    }

    let mut result: Vec<WorkerUsage> = grouped.into_values().collect();
    result.sort_by(|a, b| {
        b.total_used
            .cmp(&a.total_used)
            .then_with(|| a.name.cmp(&b.name))
            .then_with(|| a.worker_type.cmp(&b.worker_type))
    });
    result
}
