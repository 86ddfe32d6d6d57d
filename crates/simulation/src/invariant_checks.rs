//! Runtime invariant guards for the ledger, train kinematics and occupancy.
//!
//! Validation runs after every app update. Violations are logged and counted
//! but never repaired: a broken invariant means a bug upstream.

use bevy::prelude::*;

use crate::economy::EconomicSystem;
use crate::plugin::RailwaySimulation;
use crate::railway_manager::RailwayManager;
use crate::train::Train;

/// Relative tolerance for the ledger identity.
const LEDGER_TOLERANCE: f64 = 1e-6;

/// Violations seen during the most recent pass, plus a running total.
/// Used by integration tests.
#[derive(Resource, Default, Debug, Clone, PartialEq)]
pub struct InvariantViolations {
    pub ledger: u32,
    pub progress_out_of_range: u32,
    pub over_capacity: u32,
    pub total: u64,
}

impl InvariantViolations {
    pub fn last_pass(&self) -> u32 {
        self.ledger + self.progress_out_of_range + self.over_capacity
    }
}

// ---------------------------------------------------------------------------
// Checks
// ---------------------------------------------------------------------------

/// `total_revenue - total_costs == balance - initial_balance`, within a
/// tolerance relative to the largest figure involved.
pub fn ledger_is_consistent(economy: &EconomicSystem) -> bool {
    let lhs = economy.total_revenue - economy.total_costs;
    let rhs = economy.balance - economy.initial_balance;
    let scale = [
        1.0,
        economy.total_revenue.abs(),
        economy.total_costs.abs(),
        economy.balance.abs(),
        economy.initial_balance.abs(),
    ]
    .into_iter()
    .fold(f64::MIN, f64::max);
    (lhs - rhs).abs() <= LEDGER_TOLERANCE * scale
}

pub fn progress_in_range(train: &Train) -> bool {
    (0.0..=1.0).contains(&train.progress)
}

pub fn within_capacity(train: &Train) -> bool {
    train.occupancy() <= train.capacity
}

/// Run every check against `manager`, logging each violation.
pub fn check_manager(manager: &RailwayManager) -> InvariantViolations {
    let mut found = InvariantViolations::default();

    let economy = manager.economy();
    if !ledger_is_consistent(economy) {
        warn!(
            "Invariant violation: ledger drifted (revenue {:.4} - costs {:.4} != balance {:.4} - initial {:.4})",
            economy.total_revenue, economy.total_costs, economy.balance, economy.initial_balance
        );
        found.ledger += 1;
    }

    for train in manager.trains() {
        if !progress_in_range(train) {
            warn!(
                "Invariant violation: {} progress {} outside [0, 1]",
                train.id, train.progress
            );
            found.progress_out_of_range += 1;
        }
        if !within_capacity(train) {
            warn!(
                "Invariant violation: {} carries {} passengers, capacity {}",
                train.id,
                train.occupancy(),
                train.capacity
            );
            found.over_capacity += 1;
        }
    }

    found.total = found.last_pass() as u64;
    found
}

// ---------------------------------------------------------------------------
// System
// ---------------------------------------------------------------------------

pub fn validate_railway(
    sim: Res<RailwaySimulation>,
    mut violations: ResMut<InvariantViolations>,
) {
    let found = check_manager(sim.session().manager());
    let total = violations.total + found.total;
    *violations = InvariantViolations { total, ..found };
}
