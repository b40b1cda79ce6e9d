use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::fees::Category;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCost {
    pub id: String,
    pub name: String,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CostInput {
    pub selling_price: f64,
    pub manufacturing_cost: f64,
    pub shipping_cost: f64,
    pub custom_costs: Vec<CustomCost>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostResult {
    pub total_cost: f64,
    pub profit: f64,
    pub margin_percent: f64,
    pub cost_ratio_percent: f64,
    pub minimum_price: f64,
    pub suggested_price: f64,
}

/// A catalog entry. `id` is assigned by the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub manufacturing_cost: f64,
    pub shipping_cost: f64,
    #[serde(default)]
    pub custom_costs: Vec<CustomCost>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportCosts {
    pub duty: f64,
    pub vat: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FbaInput {
    pub selling_price: f64,
    pub buying_price: f64,
    pub category: Category,

    // sourcing
    pub moq: f64,
    pub shipping_cost_per_unit: f64,
    pub customs_duty_rate: f64,
    pub vat_rate: f64,
    pub other_import_costs: f64,

    // parcel, kg and cm
    pub weight: f64,
    pub length: f64,
    pub width: f64,
    pub height: f64,
    pub packaging_weight: f64,

    // forecast
    pub monthly_units: f64,
    pub seasonality_factor: f64,
    pub return_rate: f64,
    pub stocking_period: f64,

    // marketing
    pub ppc_budget_per_unit: f64,
    pub promotional_discount_rate: f64,
    pub other_marketing_costs: f64,
}

impl Default for FbaInput {
    fn default() -> Self {
        FbaInput {
            selling_price: 0.0,
            buying_price: 0.0,
            category: Category::Standard,
            moq: 0.0,
            shipping_cost_per_unit: 0.0,
            customs_duty_rate: 0.0,
            vat_rate: 20.0,
            other_import_costs: 0.0,
            weight: 0.0,
            length: 0.0,
            width: 0.0,
            height: 0.0,
            packaging_weight: 0.0,
            monthly_units: 0.0,
            seasonality_factor: 1.0,
            return_rate: 2.0,
            stocking_period: 3.0,
            ppc_budget_per_unit: 0.0,
            promotional_discount_rate: 0.0,
            other_marketing_costs: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FbaResult {
    pub duty_amount: f64,
    pub vat_amount: f64,
    pub referral_fee: f64,
    pub fulfillment_fee: f64,
    pub monthly_storage_fee: f64,
    pub landed_cost_per_unit: f64,
    pub amazon_fees_per_unit: f64,
    pub marketing_cost_per_unit: f64,
    pub return_cost: f64,
    pub total_cost_per_unit: f64,
    pub effective_selling_price: f64,
    pub profit_per_unit: f64,
    pub margin_percent: f64,
    pub monthly_profit: f64,
    pub roi: f64,
    pub is_rentable: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdInput {
    pub budget: f64,
    pub cost_per_click: f64,
    pub conversion_rate: f64,
    pub average_cart_value: f64,
    pub product_cost: f64,
    pub target_roas: f64,
    pub target_margin: f64,
}

impl Default for AdInput {
    fn default() -> Self {
        AdInput {
            budget: 0.0,
            cost_per_click: 0.0,
            conversion_rate: 2.0,
            average_cart_value: 50.0,
            product_cost: 0.0,
            target_roas: 2.0,
            target_margin: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdResult {
    pub clicks: f64,
    pub conversions: u64,
    pub revenue: f64,
    pub total_costs: f64,
    pub profit: f64,
    pub roas: f64,
    pub margin_percent: f64,
    pub minimum_roas: f64,
    pub max_recommended_cpc: f64,
}

/// Price and unit costs shared by every promotion shape.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PromoBase {
    pub selling_price: f64,
    pub manufacturing_cost: f64,
    pub shipping_cost: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "promoType", rename_all = "lowercase")]
pub enum PromoMode {
    /// Buy `paid_items`, get `free_items` free.
    #[serde(rename_all = "camelCase")]
    Bogo { paid_items: u32, free_items: u32 },
    /// `pack_size` units sold together at `discount_percent` off.
    #[serde(rename_all = "camelCase")]
    Pack { pack_size: u32, discount_percent: f64 },
}

impl PromoMode {
    pub fn default_bogo() -> Self {
        PromoMode::Bogo {
            paid_items: 2,
            free_items: 1,
        }
    }

    pub fn default_pack() -> Self {
        PromoMode::Pack {
            pack_size: 3,
            discount_percent: 20.0,
        }
    }
}

impl Default for PromoMode {
    fn default() -> Self {
        PromoMode::default_bogo()
    }
}

/// Deserializes leniently: a missing `promoType` means bogo, missing counts
/// take the form defaults and counts are truncated to whole units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "PromoForm")]
pub struct PromoInput {
    #[serde(flatten)]
    pub base: PromoBase,
    #[serde(flatten)]
    pub mode: PromoMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
enum PromoKind {
    #[default]
    Bogo,
    Pack,
}

impl<'de> Deserialize<'de> for PromoKind {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        // anything that is not bogo is priced as a pack
        Ok(match raw.trim().to_ascii_lowercase().as_str() {
            "bogo" => PromoKind::Bogo,
            "pack" => PromoKind::Pack,
            other => {
                warn!(promo_type = %other, "unknown promotion type, using pack");
                PromoKind::Pack
            }
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct PromoForm {
    selling_price: f64,
    manufacturing_cost: f64,
    shipping_cost: f64,
    promo_type: PromoKind,
    paid_items: Option<f64>,
    free_items: Option<f64>,
    pack_size: Option<f64>,
    discount_percent: Option<f64>,
}

/// Negative and NaN counts become zero, fractions are dropped.
fn whole_units(count: f64) -> u32 {
    count.max(0.0) as u32
}

impl From<PromoForm> for PromoInput {
    fn from(form: PromoForm) -> Self {
        let mode = match form.promo_type {
            PromoKind::Bogo => PromoMode::Bogo {
                paid_items: form.paid_items.map_or(2, whole_units),
                free_items: form.free_items.map_or(1, whole_units),
            },
            PromoKind::Pack => PromoMode::Pack {
                pack_size: form.pack_size.map_or(3, whole_units),
                discount_percent: form.discount_percent.unwrap_or(20.0),
            },
        };
        PromoInput {
            base: PromoBase {
                selling_price: form.selling_price,
                manufacturing_cost: form.manufacturing_cost,
                shipping_cost: form.shipping_cost,
            },
            mode,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromoResult {
    pub revenue: f64,
    pub costs: f64,
    pub profit: f64,
    pub margin_percent: f64,
    pub discount_percent: f64,
    pub cost_per_unit: f64,
    pub effective_price: f64,
    pub units_offered: u32,
    pub units_paid: u32,
}
