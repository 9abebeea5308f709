//! Ledger Aggregator
//!
//! Sums ledger entries into scoped totals. Every aggregation re-asserts the
//! full scope (project and company), kind and execution state even when the
//! collaborator already filtered, so a row from another company can never
//! leak into a total.
//!
//! - Balance math uses the closed cycle window `[start, end]`.
//! - Chart buckets use half-open windows `[bucket_start, bucket_end)`, so an
//!   event exactly on a month boundary lands in the later bucket.

mod breakdown;

pub use breakdown::*;

use crate::calendar::{start_of_day, DateTimeRange, MonthArithmetic};
use crate::types::{LedgerFilter, LedgerScope, PointLedgerEntry};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Usage in one month bucket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyUsage {
    /// Bucket label, `YYYY-MM` of the bucket start
    pub month: String,
    pub usage: u64,
}

/// Sum of `|amount|` over executed usage entries of `scope` inside `window`.
///
/// No matching rows yields 0.
pub fn sum_usage<'a, I>(entries: I, scope: LedgerScope, window: DateTimeRange) -> u64
where
    I: IntoIterator<Item = &'a PointLedgerEntry>,
{
    let filter = LedgerFilter::executed_usage(scope, window);
    entries
        .into_iter()
        .filter(|entry| filter.matches(entry))
        .fold(0u64, |total, entry| total.saturating_add(entry.magnitude()))
}

/// Usage per month for `months` consecutive buckets starting at `start`.
///
/// Bucket `i` spans `[start + i months, start + (i + 1) months)`; both ends
/// are computed from `start` so consecutive buckets never overlap or leave gaps.
pub fn monthly_usage_series(
    entries: &[PointLedgerEntry],
    scope: LedgerScope,
    start: NaiveDate,
    months: u32,
    arithmetic: &dyn MonthArithmetic,
) -> Vec<MonthlyUsage> {
    (0..months)
        .map(|offset| {
            let bucket_start = arithmetic.add_months(start, offset);
            let bucket_end = arithmetic.add_months(start, offset + 1);
            let window =
                DateTimeRange::half_open(start_of_day(bucket_start), start_of_day(bucket_end));
            MonthlyUsage {
                month: bucket_start.format("%Y-%m").to_string(),
                usage: sum_usage(entries, scope, window),
            }
        })
        .collect()
}

#[cfg(test)]
pub(crate) mod test_support {
    use crate::types::*;
    use chrono::{NaiveDate, NaiveDateTime};

    pub fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    pub fn usage(id: i64, amount: i64, occurred_at: NaiveDateTime) -> PointLedgerEntry {
        PointLedgerEntry {
            id: EntryId(id),
            project_id: ProjectId(10),
            company_id: CompanyId(1),
            ticket_id: None,
            comment_id: None,
            content: format!("work {id}"),
            amount,
            kind: LedgerKind::Usage,
            state: ExecutionState::Executed,
            worker_type: None,
            occurred_at,
        }
    }

    pub fn scope() -> LedgerScope {
        LedgerScope::new(ProjectId(10), CompanyId(1))
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::calendar::CalendarMonths;
    use crate::types::{CompanyId, ExecutionState, LedgerKind};

    #[test]
    fn test_sum_usage_counts_only_executed_usage_in_scope() {
        let window = DateTimeRange::closed(at(2024, 1, 1, 0), at(2024, 7, 1, 0));

        let mut draft = usage(2, 50, at(2024, 2, 1, 9));
        draft.state = ExecutionState::Draft;
        let mut charge = usage(3, 500, at(2024, 2, 1, 9));
        charge.kind = LedgerKind::Charge;
        let mut foreign = usage(4, 70, at(2024, 2, 1, 9));
        foreign.company_id = CompanyId(2);
        let negative = usage(5, -15, at(2024, 3, 1, 9));

        let entries = vec![
            usage(1, 30, at(2024, 1, 1, 0)),
            draft,
            charge,
            foreign,
            negative,
            usage(6, 40, at(2024, 7, 1, 0)),
            usage(7, 99, at(2024, 7, 1, 1)),
        ];

        assert_eq!(sum_usage(&entries, scope(), window), 30 + 15 + 40);
    }

    #[test]
    fn test_sum_usage_empty_is_zero() {
        let window = DateTimeRange::closed(at(2024, 1, 1, 0), at(2024, 7, 1, 0));
        let entries: Vec<PointLedgerEntry> = Vec::new();
        assert_eq!(sum_usage(&entries, scope(), window), 0);
    }

    #[test]
    fn test_monthly_series_labels_and_half_open_buckets() {
        let start = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let entries = vec![
            usage(1, 10, at(2024, 1, 15, 0)),
            usage(2, 20, at(2024, 2, 14, 23)),
            usage(3, 5, at(2024, 2, 15, 0)),
            usage(4, 7, at(2024, 6, 20, 8)),
            usage(5, 100, at(2024, 7, 15, 0)),
            usage(6, 100, at(2024, 1, 14, 23)),
        ];

        let series = monthly_usage_series(&entries, scope(), start, 6, &CalendarMonths);
        let labels: Vec<&str> = series.iter().map(|bucket| bucket.month.as_str()).collect();
        assert_eq!(
            labels,
            vec!["2024-01", "2024-02", "2024-03", "2024-04", "2024-05", "2024-06"]
        );

        let totals: Vec<u64> = series.iter().map(|bucket| bucket.usage).collect();
        assert_eq!(totals, vec![30, 5, 0, 0, 0, 7]);
    }
}
