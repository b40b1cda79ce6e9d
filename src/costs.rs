use crate::model::{CostInput, CostResult, Product};
use crate::safe_math::{percent_of, safe_ratio};

/// Share of the selling price that costs may take for a product to count as
/// profitable, in percent.
pub const MAX_COST_RATIO_PERCENT: f64 = 30.0;
/// Listing margin at or above which a catalog product is shown as healthy.
pub const HEALTHY_MARGIN_PERCENT: f64 = 30.0;

const CHARM_STEP: f64 = 5.0;
const CHARM_OFFSET: f64 = 0.1;

pub fn compute_costs(input: &CostInput) -> CostResult {
    let custom: f64 = input.custom_costs.iter().map(|c| c.value).sum();
    let total_cost = input.manufacturing_cost + input.shipping_cost + custom;
    let profit = input.selling_price - total_cost;

    let margin_percent = if input.selling_price > 0.0 {
        profit / input.selling_price * 100.0
    } else {
        0.0
    };

    // zero at a zero selling price, even with costs
    let cost_ratio_percent = if total_cost > 0.0 {
        percent_of(total_cost, input.selling_price)
    } else {
        0.0
    };

    let minimum_price = safe_ratio(total_cost, MAX_COST_RATIO_PERCENT / 100.0);
    let suggested_price = (minimum_price / CHARM_STEP).ceil() * CHARM_STEP - CHARM_OFFSET;

    CostResult {
        total_cost,
        profit,
        margin_percent,
        cost_ratio_percent,
        minimum_price,
        suggested_price,
    }
}

/// Named cost lines behind `total_cost`, zero and negative lines left out.
pub fn cost_components(input: &CostInput) -> Vec<(String, f64)> {
    [
        ("Manufacturing".to_string(), input.manufacturing_cost),
        ("Shipping".to_string(), input.shipping_cost),
    ]
    .into_iter()
    .chain(input.custom_costs.iter().map(|c| (c.name.clone(), c.value)))
    .filter(|(_, value)| *value > 0.0)
    .collect()
}

impl CostResult {
    pub fn is_rentable(&self) -> bool {
        self.cost_ratio_percent <= MAX_COST_RATIO_PERCENT
    }
}

impl From<&Product> for CostInput {
    fn from(p: &Product) -> Self {
        CostInput {
            selling_price: p.price,
            manufacturing_cost: p.manufacturing_cost,
            shipping_cost: p.shipping_cost,
            custom_costs: p.custom_costs.clone(),
        }
    }
}

/// Margin shown next to a product in the catalog listing. Only the
/// manufacturing and shipping costs count here.
pub fn product_margin_percent(product: &Product) -> f64 {
    let unit_margin = product.price - (product.manufacturing_cost + product.shipping_cost);
    percent_of(unit_margin, product.price)
}

pub fn is_healthy_margin(margin_percent: f64) -> bool {
    margin_percent >= HEALTHY_MARGIN_PERCENT
}
