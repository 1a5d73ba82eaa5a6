mod rates;
mod schedule;

pub use rates::{RateBasis, RateTable};
pub use schedule::{CommissionSchedule, ProductMultipliers, VerticalBonuses};

use crate::pipeline::domain::{PartnerKind, Product, Vertical};
use serde::{Deserialize, Serialize};

/// Stateless calculator applying one schedule to a deal's figures.
#[derive(Debug, Clone)]
pub struct CommissionEngine {
    rates: RateTable,
}

impl CommissionEngine {
    pub fn new(schedule: CommissionSchedule) -> Self {
        Self {
            rates: RateTable::new(schedule),
        }
    }

    pub fn standard() -> Self {
        Self::new(CommissionSchedule::standard())
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    /// Compute the commission for one deal. Assumes non-negative GMV; the
    /// intake boundary rejects negative figures before they reach here.
    pub fn quote(
        &self,
        kind: PartnerKind,
        monthly_gmv: u64,
        product: Product,
        vertical: Vertical,
    ) -> CommissionResult {
        match self.rates.base_rate(kind) {
            RateBasis::Fixed(amount) => CommissionResult {
                amount,
                breakdown: vec![BreakdownEntry {
                    label: "fixed incentive".to_string(),
                    value: amount,
                }],
                formula: format!("fixed incentive per integration = {amount:.2}"),
            },
            RateBasis::Share(base) => {
                let multiplier = self.rates.product_multiplier(product);
                let bonus = self.rates.vertical_bonus(vertical);
                let effective = base * multiplier + bonus;
                let gmv = monthly_gmv as f64;
                let amount = gmv * effective;

                let breakdown = vec![
                    BreakdownEntry {
                        label: "monthly GMV".to_string(),
                        value: gmv,
                    },
                    BreakdownEntry {
                        label: "base rate".to_string(),
                        value: base,
                    },
                    BreakdownEntry {
                        label: "product multiplier".to_string(),
                        value: multiplier,
                    },
                    BreakdownEntry {
                        label: "vertical bonus".to_string(),
                        value: bonus,
                    },
                    BreakdownEntry {
                        label: "effective rate".to_string(),
                        value: effective,
                    },
                ];

                CommissionResult {
                    amount,
                    breakdown,
                    formula: format!(
                        "{monthly_gmv} x ({base:.3} x {multiplier:.2} + {bonus:.3}) = {amount:.2}"
                    ),
                }
            }
        }
    }
}

impl Default for CommissionEngine {
    fn default() -> Self {
        Self::standard()
    }
}

/// One inspectable factor of a quote, in calculation order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub label: String,
    pub value: f64,
}

/// Commission amount plus the audit trail the portal renders. Derived from
/// a deal's figures, never stored independently of it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionResult {
    pub amount: f64,
    pub breakdown: Vec<BreakdownEntry>,
    pub formula: String,
}
