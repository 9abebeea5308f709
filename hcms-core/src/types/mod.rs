//! HCMS Core Type Definitions
//!
//! All types follow these naming conventions:
//! - snake_case for field names
//! - *_id suffix for identifiers
//! - *_at suffix for timestamps, *_date suffix for calendar dates

pub mod common;
pub mod ledger;
pub mod project;
pub mod ticket;

pub use common::{CommentId, CompanyId, EntryId, LedgerScope, ProjectId, TicketId};

pub use ledger::{ExecutionState, LedgerFilter, LedgerKind, NewLedgerEntry, PointLedgerEntry};

pub use project::{PaymentStatus, Project, PAYMENT_STATUS_COMPLETED};

pub use ticket::{MaintenanceComment, Ticket, WorkerIdentity};
