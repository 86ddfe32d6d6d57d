use bevy::log::warn;
use serde::{Deserialize, Serialize};

use crate::sim_params::EconomyParams;

/// Running ledger of fare revenue and operating costs.
///
/// `total_revenue - total_costs == balance - initial_balance` holds after any
/// sequence of `earn_revenue` / `spend_money` calls. Spending past zero is
/// allowed; `spend_money` only reports solvency.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EconomicSystem {
    pub balance: f64,
    pub initial_balance: f64,
    pub total_revenue: f64,
    pub total_costs: f64,
    pub base_fare: f64,
    pub fare_per_km: f64,
    pub train_operating_cost_per_sec: f64,
    pub line_maintenance_cost_per_sec: f64,
}

impl Default for EconomicSystem {
    fn default() -> Self {
        Self::new(&EconomyParams::default())
    }
}

impl EconomicSystem {
    pub fn new(params: &EconomyParams) -> Self {
        Self {
            balance: params.starting_balance,
            initial_balance: params.starting_balance,
            total_revenue: 0.0,
            total_costs: 0.0,
            base_fare: params.base_fare,
            fare_per_km: params.fare_per_km,
            train_operating_cost_per_sec: params.train_operating_cost_per_sec,
            line_maintenance_cost_per_sec: params.line_maintenance_cost_per_sec,
        }
    }

    /// Credit `amount`. Negative amounts are accepted as-is.
    pub fn earn_revenue(&mut self, amount: f64) {
        self.balance += amount;
        self.total_revenue += amount;
    }

    /// Debit `amount` unconditionally. Returns whether the balance is still
    /// non-negative afterwards.
    pub fn spend_money(&mut self, amount: f64) -> bool {
        let was_solvent = self.is_solvent();
        self.balance -= amount;
        self.total_costs += amount;

        let solvent = self.is_solvent();
        if was_solvent && !solvent {
            warn!(
                "Ledger went insolvent: balance {:.2} after spending {:.2}",
                self.balance, amount
            );
        }
        solvent
    }

    /// Fare for a trip of `distance_m` meters.
    pub fn calculate_fare(&self, distance_m: f64) -> f64 {
        self.base_fare + (distance_m / 1000.0) * self.fare_per_km
    }

    /// Operating cost for `elapsed_secs` of simulated time.
    pub fn operating_cost(&self, running_trains: usize, lines: usize, elapsed_secs: f64) -> f64 {
        let train_costs = running_trains as f64 * self.train_operating_cost_per_sec * elapsed_secs;
        let line_costs = lines as f64 * self.line_maintenance_cost_per_sec * elapsed_secs;
        train_costs + line_costs
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn profit(&self) -> f64 {
        self.total_revenue - self.total_costs
    }

    pub fn is_solvent(&self) -> bool {
        self.balance >= 0.0
    }
}
