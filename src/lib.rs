//! Profitability calculators for e-commerce products: cost breakdowns,
//! Amazon FBA fees, Meta Ads returns and promotional pricing, plus a small
//! product catalog.
//!
//! Every calculator is a pure function that never fails. Degenerate input
//! (zero prices, empty budgets) produces zeros, not errors.

pub mod ads;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod costs;
pub mod error;
pub mod fba;
pub mod fees;
pub mod import;
pub mod logging;
pub mod model;
pub mod promo;
pub mod report;
pub mod safe_math;
pub mod store;

pub use ads::compute_ad_metrics;
pub use costs::compute_costs;
pub use fba::compute_fba;
pub use fees::{fulfillment_fee, referral_fee, storage_fee, Category};
pub use import::compute_import_costs;
pub use promo::compute_promo;
pub use safe_math::safe_divide;
