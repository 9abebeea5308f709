//! HCMS Basic Types
//!
//! Identifiers are newtypes over the portal's integer sequence keys so that a
//! project id can never be passed where a company id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! sequence_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn new(value: i64) -> Self {
                Self(value)
            }

            pub fn value(&self) -> i64 {
                self.0
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

sequence_id!(
    /// Customer company (tenant) identifier
    CompanyId
);
sequence_id!(
    /// Project (contract) identifier
    ProjectId
);
sequence_id!(
    /// Maintenance ticket identifier
    TicketId
);
sequence_id!(
    /// Maintenance ticket comment identifier
    CommentId
);
sequence_id!(
    /// Point ledger entry identifier
    EntryId
);

/// Ownership scope for ledger queries.
///
/// Both fields must match an entry for it to be aggregated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LedgerScope {
    pub project_id: ProjectId,
    pub company_id: CompanyId,
}

impl LedgerScope {
    pub fn new(project_id: ProjectId, company_id: CompanyId) -> Self {
        Self {
            project_id,
            company_id,
        }
    }
}
