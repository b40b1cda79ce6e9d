//! Amazon FBA fee tables.

use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

const FULFILLMENT_BASE_FEE: f64 = 2.70;
const OVERSIZE_VOLUME_M3: f64 = 0.04;
const OVERSIZE_MULTIPLIER: f64 = 1.2;
const STORAGE_RATE_PER_M3_MONTH: f64 = 30.0;

/// Weight tiers as (upper bound in kg, inclusive; increment).
const WEIGHT_TIERS: [(f64, f64); 5] = [
    (0.5, 2.35),
    (1.0, 3.35),
    (2.0, 4.00),
    (5.0, 5.20),
    (10.0, 6.80),
];
const HEAVY_STEP_KG: f64 = 5.0;
const HEAVY_STEP_FEE: f64 = 1.50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    Standard,
    Premium,
}

impl Category {
    pub fn referral_rate(self) -> f64 {
        match self {
            Category::Standard => 0.15,
            Category::Premium => 0.20,
        }
    }

    /// Unknown names fall back to `Standard`.
    pub fn parse_lenient(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "standard" => Category::Standard,
            "premium" => Category::Premium,
            other => {
                warn!(category = %other, "unknown category, using standard");
                Category::Standard
            }
        }
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Category::parse_lenient(&raw))
    }
}

pub fn referral_fee(price: f64, category: Category) -> f64 {
    price * category.referral_rate()
}

/// Fulfillment fee for one unit. Boundary weights stay in the lower tier.
pub fn fulfillment_fee(weight_kg: f64, volume_m3: f64) -> f64 {
    let increment = WEIGHT_TIERS
        .iter()
        .find(|(limit, _)| weight_kg <= *limit)
        .map(|(_, fee)| *fee)
        .unwrap_or_else(|| {
            let extra_steps = ((weight_kg - 10.0) / HEAVY_STEP_KG).ceil();
            6.80 + extra_steps * HEAVY_STEP_FEE
        });

    let fee = FULFILLMENT_BASE_FEE + increment;
    if volume_m3 > OVERSIZE_VOLUME_M3 {
        fee * OVERSIZE_MULTIPLIER
    } else {
        fee
    }
}

pub fn storage_fee(volume_m3: f64, months: f64) -> f64 {
    volume_m3 * STORAGE_RATE_PER_M3_MONTH * months
}

/// Package volume in m³ from dimensions in centimetres.
pub fn volume_m3(length_cm: f64, width_cm: f64, height_cm: f64) -> f64 {
    (length_cm * width_cm * height_cm) / 1_000_000.0
}
