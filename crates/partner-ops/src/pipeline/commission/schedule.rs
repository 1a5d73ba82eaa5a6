use serde::{Deserialize, Serialize};

/// Published commission constants for one payout schedule.
///
/// The portal ships with `standard()`; operators can load experimental
/// schedules without touching the calculator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommissionSchedule {
    pub referral_base_rate: f64,
    pub reseller_base_rate: f64,
    /// Service partners are paid per integration, not per revenue share.
    pub service_fixed_incentive: f64,
    pub product_multipliers: ProductMultipliers,
    pub vertical_bonuses: VerticalBonuses,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductMultipliers {
    pub checkout: f64,
    pub returns_management: f64,
    pub engagement: f64,
    pub all_products: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerticalBonuses {
    pub fashion: f64,
    pub electronics: f64,
    pub beauty: f64,
    pub home: f64,
    pub food: f64,
    pub other: f64,
}

impl CommissionSchedule {
    pub fn standard() -> Self {
        Self {
            referral_base_rate: 0.03,
            reseller_base_rate: 0.05,
            service_fixed_incentive: 10_000.0,
            product_multipliers: ProductMultipliers {
                checkout: 1.2,
                returns_management: 1.1,
                engagement: 1.0,
                all_products: 1.5,
            },
            vertical_bonuses: VerticalBonuses {
                fashion: 0.01,
                electronics: 0.005,
                beauty: 0.008,
                home: 0.005,
                food: 0.007,
                other: 0.0,
            },
        }
    }
}

impl Default for CommissionSchedule {
    fn default() -> Self {
        Self::standard()
    }
}
