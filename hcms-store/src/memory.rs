//! In-memory store
//!
//! Thread-safe implementation of every repository, backed by `RwLock`
//! protected maps. Used for tests, offline CLI queries and fixture-backed
//! servers.

use async_trait::async_trait;
use hcms_core::{
    CompanyId, HcmsError, LedgerFilter, MaintenanceComment, NewLedgerEntry, PaymentStatus,
    PointLedgerEntry, Project, ProjectId, Ticket, TicketId,
};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{StoreError, StoreResult};
use crate::fixture::Fixture;
use crate::repos::{PaymentRepository, PointLedgerRepository, ProjectRepository, TicketRepository};

/// In-memory store
#[derive(Debug, Default)]
pub struct MemoryStore {
    projects: Arc<RwLock<HashMap<ProjectId, Project>>>,
    /// Raw payment status codes per project
    payments: Arc<RwLock<HashMap<ProjectId, Vec<i32>>>>,
    /// Append-only ledger in insertion order
    ledger: Arc<RwLock<Vec<PointLedgerEntry>>>,
    tickets: Arc<RwLock<HashMap<TicketId, Ticket>>>,
    comments: Arc<RwLock<Vec<MaintenanceComment>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded from a fixture
    pub async fn from_fixture(fixture: Fixture) -> StoreResult<Self> {
        let store = Self::new();
        for record in fixture.projects {
            store.insert_project(record.normalize()).await?;
        }
        for payment in fixture.payments {
            store.record_payment(payment.project_id, payment.status).await;
        }
        for ticket in fixture.tickets {
            store.insert_ticket(ticket).await?;
        }
        for comment in fixture.comments {
            store.insert_comment(comment.normalize()).await;
        }
        for record in fixture.ledger {
            store.seed_entry(record.normalize()).await?;
        }
        Ok(store)
    }

    pub async fn insert_project(&self, project: Project) -> StoreResult<()> {
        let mut projects = self.projects.write().await;
        if projects.contains_key(&project.id) {
            return Err(StoreError::duplicate("project", project.id));
        }
        projects.insert(project.id, project);
        Ok(())
    }

    /// Record a payment status code for a project
    pub async fn record_payment(&self, project_id: ProjectId, status: i32) {
        let mut payments = self.payments.write().await;
        payments.entry(project_id).or_default().push(status);
    }

    pub async fn insert_ticket(&self, ticket: Ticket) -> StoreResult<()> {
        let mut tickets = self.tickets.write().await;
        if tickets.contains_key(&ticket.id) {
            return Err(StoreError::duplicate("ticket", ticket.id));
        }
        tickets.insert(ticket.id, ticket);
        Ok(())
    }

    pub async fn insert_comment(&self, comment: MaintenanceComment) {
        self.comments.write().await.push(comment);
    }

    /// Insert a historical entry with its original id
    pub async fn seed_entry(&self, entry: PointLedgerEntry) -> StoreResult<()> {
        let mut ledger = self.ledger.write().await;
        if ledger.iter().any(|existing| existing.id == entry.id) {
            return Err(StoreError::duplicate("ledger_entry", entry.id));
        }
        ledger.push(entry);
        Ok(())
    }

    pub async fn ledger_len(&self) -> usize {
        self.ledger.read().await.len()
    }
}

#[async_trait]
impl ProjectRepository for MemoryStore {
    async fn get_project(&self, project_id: ProjectId) -> StoreResult<Option<Project>> {
        let projects = self.projects.read().await;
        Ok(projects.get(&project_id).cloned())
    }

    async fn list_projects(&self, company_id: CompanyId) -> StoreResult<Vec<Project>> {
        let projects = self.projects.read().await;
        let mut result: Vec<Project> = projects
            .values()
            .filter(|p| p.company_id == company_id)
            .cloned()
            .collect();
        result.sort_by_key(|p| p.id);
        Ok(result)
    }
}

#[async_trait]
impl PaymentRepository for MemoryStore {
    async fn payment_status(&self, project_id: ProjectId) -> StoreResult<PaymentStatus> {
        let payments = self.payments.read().await;
        Ok(payments
            .get(&project_id)
            .map(|codes| PaymentStatus::from_codes(codes.iter().copied()))
            .unwrap_or_default())
    }
}

#[async_trait]
impl PointLedgerRepository for MemoryStore {
    async fn query_entries(&self, filter: &LedgerFilter) -> StoreResult<Vec<PointLedgerEntry>> {
        let ledger = self.ledger.read().await;
        Ok(ledger.iter().filter(|e| filter.matches(e)).cloned().collect())
    }

    async fn append_entry(&self, entry: NewLedgerEntry) -> StoreResult<PointLedgerEntry> {
        entry.validate()?;

        {
            let projects = self.projects.read().await;
            let project = projects
                .get(&entry.project_id)
                .ok_or_else(|| StoreError::not_found("project", entry.project_id))?;
            if project.company_id != entry.company_id {
                return Err(HcmsError::ProjectNotInScope {
                    project_id: entry.project_id.value(),
                    company_id: entry.company_id.value(),
                }
                .into());
            }
        }

        let mut ledger = self.ledger.write().await;
        let next_id = ledger.iter().map(|e| e.id.value()).max().unwrap_or(0) + 1;
        let stored = entry.into_entry(next_id.into());
        ledger.push(stored.clone());
        Ok(stored)
    }
}

#[async_trait]
impl TicketRepository for MemoryStore {
    async fn ticket_titles(&self, ticket_ids: &[TicketId]) -> StoreResult<HashMap<TicketId, String>> {
        let tickets = self.tickets.read().await;
        Ok(ticket_ids
            .iter()
            .filter_map(|id| tickets.get(id).map(|t| (*id, t.title.clone())))
            .collect())
    }

    async fn point_comments(
        &self,
        ticket_ids: &[TicketId],
    ) -> StoreResult<Vec<MaintenanceComment>> {
        let wanted: HashSet<TicketId> = ticket_ids.iter().copied().collect();
        let comments = self.comments.read().await;
        Ok(comments
            .iter()
            .filter(|c| c.point > 0 && wanted.contains(&c.ticket_id))
            .cloned()
            .collect())
    }
}
