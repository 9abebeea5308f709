//! Monthly usage chart

use crate::calendar::MonthArithmetic;
use crate::ledger::{monthly_usage_series, MonthlyUsage};
use crate::types::{LedgerScope, PointLedgerEntry};
use chrono::NaiveDate;

/// Buckets in the usage chart
pub const CHART_MONTHS: u32 = 6;

/// Six monthly usage buckets starting at `cycle_start`
pub fn monthly_chart(
    entries: &[PointLedgerEntry],
    scope: LedgerScope,
    cycle_start: NaiveDate,
    arithmetic: &dyn MonthArithmetic,
) -> Vec<MonthlyUsage> {
    monthly_usage_series(entries, scope, cycle_start, CHART_MONTHS, arithmetic)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarMonths;
    use crate::ledger::test_support::{at, scope, usage};

    #[test]
    fn test_chart_has_six_buckets_from_cycle_start() {
        let start = NaiveDate::from_ymd_opt(2024, 7, 31).unwrap();
        let entries = vec![
            usage(1, 12, at(2024, 8, 30, 10)),
            usage(2, 8, at(2024, 9, 30, 0)),
        ];

        let chart = monthly_chart(&entries, scope(), start, &CalendarMonths);
        assert_eq!(chart.len(), 6);
        assert_eq!(chart[0].month, "2024-07");
        assert_eq!(chart[5].month, "2024-12");
        assert_eq!(chart[0].usage, 12);
        assert_eq!(chart[1].usage, 0);
        assert_eq!(chart[2].usage, 8);
    }
}
