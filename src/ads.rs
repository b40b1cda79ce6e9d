use crate::model::{AdInput, AdResult};
use crate::safe_math::safe_ratio;

pub fn compute_ad_metrics(input: &AdInput) -> AdResult {
    let conversion = input.conversion_rate / 100.0;

    let clicks = safe_ratio(input.budget, input.cost_per_click);
    // partial conversions never count
    let conversions = (clicks * conversion).floor().max(0.0) as u64;
    let revenue = conversions as f64 * input.average_cart_value;
    let total_costs = input.budget + conversions as f64 * input.product_cost;
    let profit = revenue - total_costs;

    AdResult {
        clicks,
        conversions,
        revenue,
        total_costs,
        profit,
        roas: safe_ratio(revenue, input.budget),
        margin_percent: safe_ratio(profit, revenue) * 100.0,
        minimum_roas: safe_ratio(100.0, 100.0 - input.target_margin),
        max_recommended_cpc: safe_ratio(input.average_cart_value * conversion, input.target_roas),
    }
}

impl AdResult {
    pub fn is_rentable(&self, target_margin: f64) -> bool {
        self.margin_percent >= target_margin
    }

    pub fn meets_target_roas(&self, target_roas: f64) -> bool {
        self.roas >= target_roas
    }

    /// How far the campaign ROAS is towards the target, in percent.
    pub fn roas_progress_percent(&self, target_roas: f64) -> f64 {
        safe_ratio(self.roas * 100.0, target_roas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn campaign() -> AdInput {
        AdInput {
            budget: 100.0,
            cost_per_click: 1.0,
            conversion_rate: 10.0,
            average_cart_value: 50.0,
            product_cost: 10.0,
            target_roas: 2.0,
            target_margin: 30.0,
        }
    }

    #[test]
    fn reference_campaign() {
        let input = campaign();
        let r = compute_ad_metrics(&input);
        assert!(close(r.clicks, 100.0));
        assert_eq!(r.conversions, 10);
        assert!(close(r.revenue, 500.0));
        assert!(close(r.total_costs, 200.0));
        assert!(close(r.profit, 300.0));
        assert!(close(r.roas, 5.0));
        assert!(close(r.margin_percent, 60.0));
        assert!(close(r.minimum_roas, 100.0 / 70.0));
        assert!(close(r.max_recommended_cpc, 2.5));
        assert!(r.is_rentable(input.target_margin));
        assert!(r.meets_target_roas(input.target_roas));
        assert!(close(r.roas_progress_percent(input.target_roas), 250.0));
    }

    #[test]
    fn conversions_round_down() {
        let input = AdInput {
            budget: 99.0,
            conversion_rate: 1.0,
            cost_per_click: 1.0,
            ..campaign()
        };
        // 0.99 expected conversions
        let r = compute_ad_metrics(&input);
        assert_eq!(r.conversions, 0);
        assert_eq!(r.revenue, 0.0);
        assert_eq!(r.margin_percent, 0.0);
        assert!(!r.is_rentable(input.target_margin));
    }

    #[test]
    fn zero_cpc_and_budget_fall_back() {
        let input = AdInput {
            budget: 0.0,
            cost_per_click: 0.0,
            ..campaign()
        };
        let r = compute_ad_metrics(&input);
        assert_eq!(r.clicks, 0.0);
        assert_eq!(r.conversions, 0);
        assert_eq!(r.roas, 0.0);
        assert_eq!(r.margin_percent, 0.0);
    }

    #[test]
    fn full_margin_target_does_not_blow_up() {
        let input = AdInput {
            target_margin: 100.0,
            target_roas: 0.0,
            ..campaign()
        };
        let r = compute_ad_metrics(&input);
        assert_eq!(r.minimum_roas, 0.0);
        assert_eq!(r.max_recommended_cpc, 0.0);
        assert_eq!(r.roas_progress_percent(0.0), 0.0);
    }
}
