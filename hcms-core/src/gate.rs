//! Eligibility Gate
//!
//! New chargeable work may be requested only when all of:
//! - a completed payment exists for the project
//! - today lies within the contract period
//! - the current cycle has remaining points
//!
//! Every condition is evaluated on every call so callers can report all
//! failing conditions at once.

use crate::balance::BalanceCalculator;
use crate::types::{PaymentStatus, PointLedgerEntry, Project};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Condition that blocks a new request
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlockingReason {
    PaymentIncomplete,
    ContractInactive,
    NoRemainingPoints,
}

/// Evaluated eligibility
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub payment_completed: bool,
    pub contract_active: bool,
    pub remaining_points: u64,
}

impl Eligibility {
    pub fn evaluate(
        calculator: &BalanceCalculator,
        project: &Project,
        payment: PaymentStatus,
        entries: &[PointLedgerEntry],
        today: NaiveDate,
    ) -> Self {
        Self {
            payment_completed: payment.completed,
            contract_active: project.contract_covers(today),
            remaining_points: calculator.remaining_points(project, entries, today),
        }
    }

    pub fn is_eligible(&self) -> bool {
        self.payment_completed && self.contract_active && self.remaining_points > 0
    }

    /// All failing conditions
    pub fn blocking_reasons(&self) -> Vec<BlockingReason> {
        let mut reasons = Vec::new();
        if !self.payment_completed {
            reasons.push(BlockingReason::PaymentIncomplete);
        }
        if !self.contract_active {
            reasons.push(BlockingReason::ContractInactive);
        }
        if self.remaining_points == 0 {
            reasons.push(BlockingReason::NoRemainingPoints);
        }
        reasons
    }
}

/// Whether a new maintenance request may be submitted for `project`
pub fn is_eligible_for_new_request(
    calculator: &BalanceCalculator,
    project: &Project,
    payment: PaymentStatus,
    entries: &[PointLedgerEntry],
    today: NaiveDate,
) -> bool {
    Eligibility::evaluate(calculator, project, payment, entries, today).is_eligible()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::test_support::{at, usage};
    use crate::types::{CompanyId, ProjectId};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn project() -> Project {
        Project::new(ProjectId(10), CompanyId(1), "Main site")
            .with_contract(date(2024, 1, 1), date(2025, 1, 1))
            .with_allocation(100)
    }

    #[test]
    fn test_all_conditions_met() {
        let calc = BalanceCalculator::default();
        assert!(is_eligible_for_new_request(
            &calc,
            &project(),
            PaymentStatus::completed(),
            &[],
            date(2024, 3, 1)
        ));
    }

    #[test]
    fn test_incomplete_payment_blocks_despite_points() {
        let calc = BalanceCalculator::default();
        let eligibility = Eligibility::evaluate(
            &calc,
            &project(),
            PaymentStatus::incomplete(),
            &[],
            date(2024, 3, 1),
        );
        assert_eq!(eligibility.remaining_points, 600);
        assert!(!eligibility.is_eligible());
        assert_eq!(
            eligibility.blocking_reasons(),
            vec![BlockingReason::PaymentIncomplete]
        );
    }

    #[test]
    fn test_exhausted_points_block_despite_payment() {
        let calc = BalanceCalculator::default();
        let entries = vec![usage(1, 600, at(2024, 2, 1, 9))];
        let eligibility = Eligibility::evaluate(
            &calc,
            &project(),
            PaymentStatus::completed(),
            &entries,
            date(2024, 3, 1),
        );
        assert!(eligibility.contract_active);
        assert!(!eligibility.is_eligible());
        assert_eq!(
            eligibility.blocking_reasons(),
            vec![BlockingReason::NoRemainingPoints]
        );
    }

    #[test]
    fn test_every_condition_reported() {
        let calc = BalanceCalculator::default();
        let eligibility = Eligibility::evaluate(
            &calc,
            &project(),
            PaymentStatus::incomplete(),
            &[],
            date(2025, 6, 1),
        );
        assert_eq!(
            eligibility.blocking_reasons(),
            vec![
                BlockingReason::PaymentIncomplete,
                BlockingReason::ContractInactive,
                BlockingReason::NoRemainingPoints,
            ]
        );
    }
}
