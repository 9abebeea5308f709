//! Points Service
//!
//! Orchestrates the repositories and the points engine for the queries the
//! presentation layers expose. Every query is scoped to the caller's company;
//! a project owned by another company is reported as out of scope, never
//! computed.

use chrono::NaiveDate;
use hcms_core::{
    BalanceCalculator, CompanyId, Eligibility, ExecutionState, FilterPolicy, HcmsError,
    HistoryFilters, LedgerFilter, LedgerKind, LedgerScope, NewLedgerEntry, Pagination,
    PointBalance, PointLedgerEntry, Project, ProjectId, ReportAssembler, ReportData,
    ReportRequest, TicketId, UsageReport,
};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{StoreError, StoreResult};
use crate::repos::{
    HcmsRepository, PaymentRepository, PointLedgerRepository, ProjectRepository, TicketRepository,
};

/// Contract state shown in project listings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContractStatus {
    Active,
    Expired,
}

/// Maintenance availability of one project
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceProjectStatus {
    pub id: ProjectId,
    pub title: String,
    /// New maintenance requests are allowed
    pub permit: bool,
    pub remaining_points: u64,
    pub contract_status: ContractStatus,
    pub contract_start_date: Option<NaiveDate>,
    pub contract_end_date: Option<NaiveDate>,
}

/// Points service
#[derive(Clone)]
pub struct PointsService {
    repo: Arc<dyn HcmsRepository>,
    calculator: BalanceCalculator,
    filter_policy: FilterPolicy,
}

impl PointsService {
    pub fn new(
        repo: Arc<dyn HcmsRepository>,
        calculator: BalanceCalculator,
        filter_policy: FilterPolicy,
    ) -> Self {
        Self {
            repo,
            calculator,
            filter_policy,
        }
    }

    pub fn repository(&self) -> &Arc<dyn HcmsRepository> {
        &self.repo
    }

    pub fn filter_policy(&self) -> FilterPolicy {
        self.filter_policy
    }

    /// Project owned by `company_id`
    pub async fn owned_project(
        &self,
        company_id: CompanyId,
        project_id: ProjectId,
    ) -> StoreResult<Project> {
        let project = self
            .repo
            .get_project(project_id)
            .await?
            .ok_or_else(|| StoreError::not_found("project", project_id))?;

        if project.company_id != company_id {
            debug!(
                company_id = %company_id,
                project_id = %project_id,
                "Project requested outside caller scope"
            );
            return Err(HcmsError::ProjectNotInScope {
                project_id: project_id.value(),
                company_id: company_id.value(),
            }
            .into());
        }
        Ok(project)
    }

    async fn executed_usage(&self, project: &Project) -> StoreResult<Vec<PointLedgerEntry>> {
        let filter = LedgerFilter::for_scope(LedgerScope::new(project.id, project.company_id))
            .with_kind(LedgerKind::Usage)
            .with_state(ExecutionState::Executed);
        self.repo.query_entries(&filter).await
    }

    /// Current-cycle balance of a project
    pub async fn balance(
        &self,
        company_id: CompanyId,
        project_id: ProjectId,
        today: NaiveDate,
    ) -> StoreResult<PointBalance> {
        let project = self.owned_project(company_id, project_id).await?;
        let entries = self.executed_usage(&project).await?;
        let balance = self.calculator.balance(&project, &entries, today);

        debug!(
            company_id = %company_id,
            project_id = %project_id,
            cycle_index = balance.cycle.cycle().map(|c| c.index),
            remaining = balance.remaining,
            "Computed balance"
        );
        Ok(balance)
    }

    /// Remaining points of a project, never negative
    pub async fn remaining_points(
        &self,
        company_id: CompanyId,
        project_id: ProjectId,
        today: NaiveDate,
    ) -> StoreResult<u64> {
        Ok(self.balance(company_id, project_id, today).await?.remaining)
    }

    /// Eligibility of a project for a new maintenance request
    pub async fn eligibility(
        &self,
        company_id: CompanyId,
        project_id: ProjectId,
        today: NaiveDate,
    ) -> StoreResult<Eligibility> {
        let project = self.owned_project(company_id, project_id).await?;
        self.evaluate(&project, today).await
    }

    async fn evaluate(&self, project: &Project, today: NaiveDate) -> StoreResult<Eligibility> {
        let payment = self.repo.payment_status(project.id).await?;
        let entries = self.executed_usage(project).await?;
        Ok(Eligibility::evaluate(
            &self.calculator,
            project,
            payment,
            &entries,
            today,
        ))
    }

    /// Availability of every project of the company
    pub async fn maintenance_projects(
        &self,
        company_id: CompanyId,
        today: NaiveDate,
    ) -> StoreResult<Vec<MaintenanceProjectStatus>> {
        let projects = self.repo.list_projects(company_id).await?;
        let mut result = Vec::with_capacity(projects.len());

        for project in &projects {
            let eligibility = self.evaluate(project, today).await?;
            result.push(MaintenanceProjectStatus {
                id: project.id,
                title: project.title.clone(),
                permit: eligibility.is_eligible(),
                remaining_points: eligibility.remaining_points,
                contract_status: if eligibility.contract_active {
                    ContractStatus::Active
                } else {
                    ContractStatus::Expired
                },
                contract_start_date: project.contract_start_date,
                contract_end_date: project.contract_end_date,
            });
        }

        debug!(company_id = %company_id, count = result.len(), "Listed maintenance projects");
        Ok(result)
    }

    /// Point-usage report for the company.
    ///
    /// An absent or foreign `requested_project` falls back to the
    /// company's most recently created active project.
    pub async fn usage_report(
        &self,
        company_id: CompanyId,
        requested_project: Option<ProjectId>,
        filters: HistoryFilters,
        pagination: Pagination,
        today: NaiveDate,
    ) -> StoreResult<UsageReport> {
        let projects = self.repo.list_projects(company_id).await?;

        let filter = LedgerFilter {
            company_id: Some(company_id),
            ..Default::default()
        };
        let entries: Vec<PointLedgerEntry> = self
            .repo
            .query_entries(&filter)
            .await?
            .into_iter()
            .filter(|entry| projects.iter().any(|p| p.id == entry.project_id))
            .collect();

        let ticket_ids: Vec<TicketId> = entries
            .iter()
            .filter_map(|entry| entry.ticket_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let (ticket_titles, comments) = if ticket_ids.is_empty() {
            (HashMap::new(), Vec::new())
        } else {
            (
                self.repo.ticket_titles(&ticket_ids).await?,
                self.repo.point_comments(&ticket_ids).await?,
            )
        };

        let request = ReportRequest {
            requested_project,
            filters,
            pagination,
            policy: self.filter_policy,
            today,
        };
        let data = ReportData {
            projects: &projects,
            entries: &entries,
            comments: &comments,
            ticket_titles: &ticket_titles,
        };
        let report = ReportAssembler::new(self.calculator.clone()).assemble(data, &request)?;

        info!(
            company_id = %company_id,
            project_id = report.current_project.as_ref().map(|p| p.id.value()),
            remaining = report.remaining_points,
            count = report.point_histories.total,
            "Assembled usage report"
        );
        Ok(report)
    }

    /// Append a ledger entry
    pub async fn record_entry(&self, entry: NewLedgerEntry) -> StoreResult<PointLedgerEntry> {
        self.owned_project(entry.company_id, entry.project_id).await?;
        let stored = self.repo.append_entry(entry).await?;
        info!(
            operation = "append",
            entry_id = %stored.id,
            project_id = %stored.project_id,
            company_id = %stored.company_id,
            kind = stored.kind.code(),
            amount = stored.amount,
            "Ledger entry appended"
        );
        Ok(stored)
    }
}
