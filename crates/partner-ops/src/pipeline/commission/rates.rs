use super::schedule::CommissionSchedule;
use crate::pipeline::domain::{PartnerKind, Product, Vertical};

/// How a partner kind is paid: a share of GMV or a fixed amount.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RateBasis {
    Share(f64),
    Fixed(f64),
}

/// Pure lookups over the schedule constants. Every input is a closed enum,
/// so the lookups are total and never fail.
#[derive(Debug, Clone)]
pub struct RateTable {
    schedule: CommissionSchedule,
}

impl RateTable {
    pub fn new(schedule: CommissionSchedule) -> Self {
        Self { schedule }
    }

    pub fn standard() -> Self {
        Self::new(CommissionSchedule::standard())
    }

    pub fn schedule(&self) -> &CommissionSchedule {
        &self.schedule
    }

    pub fn base_rate(&self, kind: PartnerKind) -> RateBasis {
        match kind {
            PartnerKind::Referral => RateBasis::Share(self.schedule.referral_base_rate),
            PartnerKind::Reseller => RateBasis::Share(self.schedule.reseller_base_rate),
            PartnerKind::Service => RateBasis::Fixed(self.schedule.service_fixed_incentive),
        }
    }

    pub fn product_multiplier(&self, product: Product) -> f64 {
        let multipliers = &self.schedule.product_multipliers;
        match product {
            Product::Checkout => multipliers.checkout,
            Product::ReturnsManagement => multipliers.returns_management,
            Product::Engagement => multipliers.engagement,
            Product::AllProducts => multipliers.all_products,
        }
    }

    pub fn vertical_bonus(&self, vertical: Vertical) -> f64 {
        let bonuses = &self.schedule.vertical_bonuses;
        match vertical {
            Vertical::Fashion => bonuses.fashion,
            Vertical::Electronics => bonuses.electronics,
            Vertical::Beauty => bonuses.beauty,
            Vertical::Home => bonuses.home,
            Vertical::Food => bonuses.food,
            Vertical::Other => bonuses.other,
        }
    }

    /// Combined rate for revenue-share kinds; `None` for fixed-incentive
    /// kinds, which have no rate to combine.
    pub fn effective_rate(
        &self,
        kind: PartnerKind,
        product: Product,
        vertical: Vertical,
    ) -> Option<f64> {
        match self.base_rate(kind) {
            RateBasis::Share(base) => {
                Some(base * self.product_multiplier(product) + self.vertical_bonus(vertical))
            }
            RateBasis::Fixed(_) => None,
        }
    }
}

impl Default for RateTable {
    fn default() -> Self {
        Self::standard()
    }
}
