//! Amazon FBA profitability for one product.
//!
//! Landed cost covers the purchase, freight and import taxes spread over the
//! order quantity. Amazon fees add referral, fulfillment and storage spread
//! over monthly sales; marketing and returns come on top of both.

use crate::fees::{fulfillment_fee, referral_fee, storage_fee, volume_m3};
use crate::import::compute_import_costs;
use crate::model::{FbaInput, FbaResult};
use crate::safe_math::{percent_of, safe_ratio};

pub const MIN_FBA_MARGIN_PERCENT: f64 = 30.0;

pub fn compute_fba(input: &FbaInput) -> FbaResult {
    let volume = volume_m3(input.length, input.width, input.height);
    let total_weight = input.weight + input.packaging_weight;

    let import = compute_import_costs(
        input.buying_price,
        input.customs_duty_rate,
        input.vat_rate,
        input.other_import_costs,
    );
    let referral = referral_fee(input.selling_price, input.category);
    let fulfillment = fulfillment_fee(total_weight, volume);
    let storage = storage_fee(volume, input.stocking_period);

    let discount_rate = input.promotional_discount_rate / 100.0;
    let promotional_discount = input.selling_price * discount_rate;

    let landed_cost_per_unit =
        input.buying_price + input.shipping_cost_per_unit + safe_ratio(import.total, input.moq);
    let amazon_fees_per_unit = referral + fulfillment + safe_ratio(storage, input.monthly_units);
    let marketing_cost_per_unit =
        input.ppc_budget_per_unit + input.other_marketing_costs + promotional_discount;
    let return_cost = (fulfillment + referral) * (input.return_rate / 100.0);

    let total_cost_per_unit =
        landed_cost_per_unit + amazon_fees_per_unit + marketing_cost_per_unit + return_cost;
    let effective_selling_price = input.selling_price * (1.0 - discount_rate);
    let profit_per_unit = effective_selling_price - total_cost_per_unit;
    let margin_percent = percent_of(profit_per_unit, effective_selling_price);

    FbaResult {
        duty_amount: import.duty,
        vat_amount: import.vat,
        referral_fee: referral,
        fulfillment_fee: fulfillment,
        monthly_storage_fee: storage,
        landed_cost_per_unit,
        amazon_fees_per_unit,
        marketing_cost_per_unit,
        return_cost,
        total_cost_per_unit,
        effective_selling_price,
        profit_per_unit,
        margin_percent,
        monthly_profit: profit_per_unit * input.monthly_units * input.seasonality_factor,
        roi: percent_of(profit_per_unit, landed_cost_per_unit),
        is_rentable: margin_percent >= MIN_FBA_MARGIN_PERCENT,
    }
}
