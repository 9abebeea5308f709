//! Project and Payment Repositories

use crate::error::StoreResult;
use async_trait::async_trait;
use hcms_core::{CompanyId, PaymentStatus, Project, ProjectId};

/// Project repository trait
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Get project by id, regardless of owner
    async fn get_project(&self, project_id: ProjectId) -> StoreResult<Option<Project>>;

    /// All projects of a company
    async fn list_projects(&self, company_id: CompanyId) -> StoreResult<Vec<Project>>;
}

/// Payment repository trait
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Whether a completed payment exists for the project
    async fn payment_status(&self, project_id: ProjectId) -> StoreResult<PaymentStatus>;
}
