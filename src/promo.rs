use crate::model::{PromoBase, PromoInput, PromoMode, PromoResult};
use crate::safe_math::{percent_of, safe_ratio};

/// Promotions need at least this margin, whatever the ad targets say.
pub const MIN_PROMO_MARGIN_PERCENT: f64 = 30.0;

pub fn compute_promo(base: &PromoBase, mode: &PromoMode) -> PromoResult {
    let unit_cost = base.manufacturing_cost + base.shipping_cost;

    match *mode {
        PromoMode::Bogo {
            paid_items,
            free_items,
        } => {
            let total = paid_items.saturating_add(free_items);
            let units = f64::from(total);

            let revenue = base.selling_price * f64::from(paid_items);
            let costs = unit_cost * units;
            let normal_revenue = base.selling_price * units;
            let profit = revenue - costs;

            PromoResult {
                revenue,
                costs,
                profit,
                margin_percent: percent_of(profit, revenue),
                discount_percent: percent_of(normal_revenue - revenue, normal_revenue),
                cost_per_unit: safe_ratio(costs, units),
                effective_price: safe_ratio(revenue, units),
                units_offered: total,
                units_paid: paid_items,
            }
        }
        PromoMode::Pack {
            pack_size,
            discount_percent,
        } => {
            let units = f64::from(pack_size);

            let revenue = base.selling_price * units * (1.0 - discount_percent / 100.0);
            let costs = unit_cost * units;
            let profit = revenue - costs;

            PromoResult {
                revenue,
                costs,
                profit,
                margin_percent: percent_of(profit, revenue),
                discount_percent,
                cost_per_unit: safe_ratio(costs, units),
                effective_price: safe_ratio(revenue, units),
                units_offered: pack_size,
                units_paid: pack_size,
            }
        }
    }
}

impl PromoInput {
    pub fn compute(&self) -> PromoResult {
        compute_promo(&self.base, &self.mode)
    }
}

impl PromoResult {
    pub fn is_rentable(&self) -> bool {
        self.margin_percent >= MIN_PROMO_MARGIN_PERCENT
    }
}
