//! Reporting Assembler
//!
//! Builds the point-usage report for presentation layers from the same
//! primitives the balance uses:
//! - totals and worker breakdown for the current cycle
//! - a six-bucket monthly chart from the cycle start
//! - a filtered, paginated history over the whole contract period
//! - current-cycle balances of every active maintenance project

mod chart;
mod history;
mod summary;

pub use chart::*;
pub use history::*;
pub use summary::*;

use crate::balance::BalanceCalculator;
use crate::calendar::DateTimeRange;
use crate::error::HcmsResult;
use crate::ledger::{worker_breakdown, MonthlyUsage, WorkerUsage};
use crate::types::{LedgerScope, MaintenanceComment, PointLedgerEntry, Project, ProjectId, TicketId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Contract header of the selected project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub id: ProjectId,
    pub title: String,
    pub monthly_point_allocation: i64,
    pub contract_start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
}

impl From<&Project> for ProjectInfo {
    fn from(project: &Project) -> Self {
        Self {
            id: project.id,
            title: project.title.clone(),
            monthly_point_allocation: project.monthly_point_allocation.unwrap_or(0),
            contract_start_date: project.contract_start_date,
            contract_end_date: project.contract_end_date,
        }
    }
}

/// Point-usage report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageReport {
    /// The company has at least one active maintenance project
    pub maintenance_customer: bool,
    pub current_project: Option<ProjectInfo>,
    pub projects_with_balance: Vec<ProjectBalanceSummary>,
    /// Current cycle start
    pub period_start: Option<NaiveDate>,
    /// Current cycle end
    pub period_end: Option<NaiveDate>,
    pub total_points: u64,
    pub used_points: u64,
    pub remaining_points: u64,
    pub worker_stats: Vec<WorkerUsage>,
    pub point_histories: Page<HistoryItem>,
    pub chart_data: Vec<MonthlyUsage>,
    /// Filters as supplied
    pub filters: HistoryFilters,
    pub ignored_filters: Vec<IgnoredFilter>,
}

/// Inputs for one report
#[derive(Clone, Debug)]
pub struct ReportRequest {
    pub requested_project: Option<ProjectId>,
    pub filters: HistoryFilters,
    pub pagination: Pagination,
    pub policy: FilterPolicy,
    pub today: NaiveDate,
}

/// Data the report is computed over, all belonging to one company
#[derive(Clone, Copy, Debug)]
pub struct ReportData<'a> {
    pub projects: &'a [Project],
    pub entries: &'a [PointLedgerEntry],
    pub comments: &'a [MaintenanceComment],
    pub ticket_titles: &'a HashMap<TicketId, String>,
}

/// Report assembler
#[derive(Clone, Debug, Default)]
pub struct ReportAssembler {
    calculator: BalanceCalculator,
}

impl ReportAssembler {
    pub fn new(calculator: BalanceCalculator) -> Self {
        Self { calculator }
    }

    /// Project the report will be built for
    pub fn current_project<'a>(
        &self,
        projects: &'a [Project],
        requested: Option<ProjectId>,
        today: NaiveDate,
    ) -> Option<&'a Project> {
        let active = active_maintenance_projects(projects, today);
        select_current_project(&active, requested)
    }

    /// Assemble the report.
    ///
    /// Fails only on filters rejected under [`FilterPolicy::Strict`].
    pub fn assemble(&self, data: ReportData<'_>, request: &ReportRequest) -> HcmsResult<UsageReport> {
        let parsed = request.filters.parse(request.policy)?;

        let active = active_maintenance_projects(data.projects, request.today);
        let mut report = UsageReport {
            maintenance_customer: !active.is_empty(),
            current_project: None,
            projects_with_balance: summarize_projects(
                &self.calculator,
                &active,
                data.entries,
                request.today,
            ),
            period_start: None,
            period_end: None,
            total_points: 0,
            used_points: 0,
            remaining_points: 0,
            worker_stats: Vec::new(),
            point_histories: Page::empty(request.pagination),
            chart_data: Vec::new(),
            filters: request.filters.clone(),
            ignored_filters: parsed.ignored.clone(),
        };

        let Some(project) = select_current_project(&active, request.requested_project) else {
            return Ok(report);
        };
        let scope = LedgerScope::new(project.id, project.company_id);
        let balance = self.calculator.balance(project, data.entries, request.today);

        report.current_project = Some(ProjectInfo::from(project));
        report.total_points = balance.total;
        report.used_points = balance.used;
        report.remaining_points = balance.remaining;

        if let Some(cycle) = balance.cycle.cycle() {
            report.period_start = Some(cycle.start_date);
            report.period_end = Some(cycle.end_date);
            report.worker_stats =
                worker_breakdown(data.entries, data.comments, scope, cycle.usage_window());
            report.chart_data = monthly_chart(
                data.entries,
                scope,
                cycle.start_date,
                self.calculator.resolver().months().as_ref(),
            );
        }

        if let (Some(start), Some(end)) = (project.contract_start_date, project.contract_end_date) {
            let source = HistorySource {
                entries: data.entries,
                ticket_titles: data.ticket_titles,
                comments: data.comments,
            };
            report.point_histories = usage_history_page(
                source,
                scope,
                DateTimeRange::whole_days(start, end),
                &parsed,
                request.pagination,
            );
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::{at, usage};
    use crate::types::{CommentId, CompanyId, LedgerKind, WorkerIdentity};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn request(today: NaiveDate) -> ReportRequest {
        ReportRequest {
            requested_project: None,
            filters: HistoryFilters::default(),
            pagination: Pagination::default(),
            policy: FilterPolicy::Lenient,
            today,
        }
    }

    fn projects() -> Vec<Project> {
        vec![Project::new(ProjectId(10), CompanyId(1), "Main site")
            .with_contract(date(2024, 1, 1), date(2025, 1, 1))
            .with_allocation(100)
            .with_created_at(at(2023, 12, 1, 9))]
    }

    #[test]
    fn test_report_without_active_projects() {
        let titles = HashMap::new();
        let data = ReportData {
            projects: &[],
            entries: &[],
            comments: &[],
            ticket_titles: &titles,
        };
        let report = ReportAssembler::default()
            .assemble(data, &request(date(2024, 3, 1)))
            .unwrap();

        assert!(!report.maintenance_customer);
        assert!(report.current_project.is_none());
        assert_eq!(report.point_histories.total, 0);
        assert_eq!(report.point_histories.total_pages, 1);
        assert!(report.chart_data.is_empty());
    }

    #[test]
    fn test_report_for_current_cycle() {
        let mut linked = usage(1, 120, at(2024, 7, 3, 10));
        linked.ticket_id = Some(TicketId(5));
        let mut charge = usage(2, 600, at(2024, 7, 1, 0));
        charge.kind = LedgerKind::Charge;
        let entries = vec![linked, charge, usage(3, 200, at(2024, 3, 1, 9))];
        let comments = vec![MaintenanceComment {
            id: CommentId(1),
            ticket_id: TicketId(5),
            writer: Some(WorkerIdentity {
                name: Some("Han".to_string()),
                username: None,
            }),
            worker_type: Some(2),
            point: 120,
            created_at: at(2024, 7, 3, 9),
        }];
        let titles = HashMap::from([(TicketId(5), "Backup restore".to_string())]);
        let projects = projects();
        let data = ReportData {
            projects: &projects,
            entries: &entries,
            comments: &comments,
            ticket_titles: &titles,
        };

        let report = ReportAssembler::default()
            .assemble(data, &request(date(2024, 8, 15)))
            .unwrap();

        assert!(report.maintenance_customer);
        assert_eq!(report.current_project.as_ref().unwrap().id, ProjectId(10));
        assert_eq!(report.period_start, Some(date(2024, 7, 1)));
        assert_eq!(report.period_end, Some(date(2025, 1, 1)));
        assert_eq!(report.total_points, 600);
        assert_eq!(report.used_points, 120);
        assert_eq!(report.remaining_points, 480);

        assert_eq!(report.worker_stats.len(), 1);
        assert_eq!(report.worker_stats[0].name, "Han");
        assert_eq!(report.worker_stats[0].total_used, 120);

        assert_eq!(report.chart_data.len(), 6);
        assert_eq!(report.chart_data[0].month, "2024-07");
        assert_eq!(report.chart_data[0].usage, 120);

        assert_eq!(report.point_histories.total, 3);
        assert_eq!(report.point_histories.items[0].ticket_title, "Backup restore");
        assert_eq!(report.projects_with_balance.len(), 1);
        assert_eq!(report.projects_with_balance[0].remaining_points, 480);
    }

    #[test]
    fn test_report_lists_ignored_filters() {
        let projects = projects();
        let titles = HashMap::new();
        let data = ReportData {
            projects: &projects,
            entries: &[],
            comments: &[],
            ticket_titles: &titles,
        };
        let mut req = request(date(2024, 3, 1));
        req.filters.date_from = Some("03/01/2024".to_string());

        let report = ReportAssembler::default().assemble(data, &req).unwrap();
        assert_eq!(report.ignored_filters.len(), 1);
        assert_eq!(report.filters.date_from.as_deref(), Some("03/01/2024"));

        req.policy = FilterPolicy::Strict;
        let err = ReportAssembler::default().assemble(data, &req).unwrap_err();
        assert_eq!(err.code(), "HCMS-FILTER-001");
    }
}
