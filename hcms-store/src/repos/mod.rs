//! HCMS Store Repositories
//!
//! Collaborator interfaces the points engine reads from. Implementations may
//! return rows in any order; the engine imposes its own ordering.

mod ledger_repo;
mod project_repo;
mod ticket_repo;

pub use ledger_repo::*;
pub use project_repo::*;
pub use ticket_repo::*;

/// Every repository the points service needs
pub trait HcmsRepository:
    ProjectRepository + PaymentRepository + PointLedgerRepository + TicketRepository
{
}

impl<T> HcmsRepository for T where
    T: ProjectRepository + PaymentRepository + PointLedgerRepository + TicketRepository
{
}
