//! HCMS Store - Collaborator Interfaces and Points Service
//!
//! Provides the data access layer the points engine consumes:
//! - Repository traits for projects, payments, the point ledger and tickets
//! - [`MemoryStore`], an in-memory implementation of every repository
//! - [`Fixture`] loading with one-time date normalization
//! - [`PointsService`], which scopes each query to the caller's company and
//!   runs the engine over the repository data
//!
//! # Usage Example
//!
//! ```ignore
//! use hcms_store::{Fixture, MemoryStore, PointsService};
//! use hcms_core::{BalanceCalculator, CompanyId, FilterPolicy, ProjectId};
//! use std::sync::Arc;
//!
//! async fn example() -> hcms_store::StoreResult<()> {
//!     let fixture = Fixture::load("fixture.json").await?;
//!     let store = MemoryStore::from_fixture(fixture).await?;
//!     let service = PointsService::new(
//!         Arc::new(store),
//!         BalanceCalculator::default(),
//!         FilterPolicy::Lenient,
//!     );
//!     let today = chrono::Local::now().date_naive();
//!     let remaining = service.remaining_points(CompanyId(1), ProjectId(10), today).await?;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod fixture;
pub mod memory;
pub mod repos;
pub mod service;

pub use error::*;
pub use fixture::{Fixture, LedgerRecord, PaymentRecord, ProjectRecord};
pub use memory::MemoryStore;
pub use repos::*;
pub use service::{ContractStatus, MaintenanceProjectStatus, PointsService};
