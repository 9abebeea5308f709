//! Multi-project balance summary

use crate::balance::{BalanceCalculator, PointBalance};
use crate::types::{PointLedgerEntry, Project, ProjectId};
use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;

/// Current-cycle balance of one project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectBalanceSummary {
    pub id: ProjectId,
    pub title: String,
    pub monthly_point_allocation: i64,
    pub total_points: u64,
    pub used_points: u64,
    pub remaining_points: u64,
    /// Share of the cycle allocation still available, one decimal place
    pub remaining_percent: Decimal,
}

impl ProjectBalanceSummary {
    pub fn from_balance(project: &Project, balance: &PointBalance) -> Self {
        Self {
            id: project.id,
            title: project.title.clone(),
            monthly_point_allocation: project.monthly_point_allocation.unwrap_or(0),
            total_points: balance.total,
            used_points: balance.used,
            remaining_points: balance.remaining,
            remaining_percent: remaining_percent(balance.remaining, balance.total),
        }
    }
}

/// `remaining / total * 100`, rounded to one decimal; zero when nothing was granted
pub fn remaining_percent(remaining: u64, total: u64) -> Decimal {
    if total == 0 {
        return Decimal::ZERO;
    }
    (Decimal::from(remaining) * Decimal::ONE_HUNDRED / Decimal::from(total))
        .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Projects offering point-based maintenance on `today`: positive allocation
/// and an active contract. Newest first by creation time; projects without a
/// creation time sort last.
pub fn active_maintenance_projects(projects: &[Project], today: NaiveDate) -> Vec<&Project> {
    let mut active: Vec<&Project> = projects
        .iter()
        .filter(|project| project.positive_allocation().is_some() && project.contract_covers(today))
        .collect();
    active.sort_by_key(|project| (Reverse(project.created_at), Reverse(project.id)));
    active
}

/// Requested project when it is among `active`, otherwise the first (newest)
pub fn select_current_project<'a>(
    active: &[&'a Project],
    requested: Option<ProjectId>,
) -> Option<&'a Project> {
    requested
        .and_then(|id| active.iter().copied().find(|project| project.id == id))
        .or_else(|| active.first().copied())
}

/// Current-cycle balances of every active maintenance project
pub fn summarize_projects(
    calculator: &BalanceCalculator,
    projects: &[&Project],
    entries: &[PointLedgerEntry],
    today: NaiveDate,
) -> Vec<ProjectBalanceSummary> {
    projects
        .iter()
        .map(|project| {
            let balance = calculator.balance(project, entries, today);
            ProjectBalanceSummary::from_balance(project, &balance)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::{at, usage};
    use crate::types::CompanyId;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn project(id: i64, created_day: u32) -> Project {
        Project::new(ProjectId(id), CompanyId(1), format!("Project {id}"))
            .with_contract(date(2024, 1, 1), date(2025, 1, 1))
            .with_allocation(100)
            .with_created_at(at(2023, 12, created_day, 9))
    }

    #[test]
    fn test_remaining_percent() {
        assert_eq!(remaining_percent(0, 0), Decimal::ZERO);
        assert_eq!(remaining_percent(400, 600), dec("66.7"));
        assert_eq!(remaining_percent(600, 600), dec("100"));
        assert_eq!(remaining_percent(0, 600), Decimal::ZERO);
    }

    #[test]
    fn test_active_projects_filter_and_order() {
        let mut expired = project(1, 20);
        expired.contract_end_date = Some(date(2024, 2, 1));
        let no_points = project(2, 21).with_allocation(0);
        let older = project(3, 1);
        let newer = project(4, 15);
        let mut undated = project(5, 1);
        undated.created_at = None;

        let projects = vec![expired, no_points, older, newer, undated];
        let active = active_maintenance_projects(&projects, date(2024, 3, 1));
        let ids: Vec<ProjectId> = active.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![ProjectId(4), ProjectId(3), ProjectId(5)]);
    }

    #[test]
    fn test_select_current_project_falls_back_to_newest() {
        let projects = vec![project(3, 1), project(4, 15)];
        let active = active_maintenance_projects(&projects, date(2024, 3, 1));

        assert_eq!(
            select_current_project(&active, Some(ProjectId(3))).map(|p| p.id),
            Some(ProjectId(3))
        );
        assert_eq!(
            select_current_project(&active, Some(ProjectId(99))).map(|p| p.id),
            Some(ProjectId(4))
        );
        assert_eq!(select_current_project(&active, None).map(|p| p.id), Some(ProjectId(4)));
        assert!(select_current_project(&[], Some(ProjectId(3))).is_none());
    }

    #[test]
    fn test_summaries_use_current_cycle() {
        let projects = vec![project(3, 1)];
        let active = active_maintenance_projects(&projects, date(2024, 8, 1));
        let mut entries = vec![usage(1, 150, at(2024, 7, 10, 9)), usage(2, 500, at(2024, 2, 1, 9))];
        for entry in &mut entries {
            entry.project_id = ProjectId(3);
        }

        let summaries =
            summarize_projects(&BalanceCalculator::default(), &active, &entries, date(2024, 8, 1));
        assert_eq!(summaries.len(), 1);
        assert_eq!(summaries[0].total_points, 600);
        assert_eq!(summaries[0].used_points, 150);
        assert_eq!(summaries[0].remaining_points, 450);
        assert_eq!(summaries[0].remaining_percent, dec("75"));
    }
}
