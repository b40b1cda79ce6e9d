use serde::Serialize;
use statrs::statistics::Statistics;

use crate::costs::{compute_costs, is_healthy_margin, product_margin_percent};
use crate::model::{CostInput, CostResult, Product};
use crate::safe_math::finite_or_zero;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRow {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub margin_percent: f64, // listing margin, manufacturing + shipping only
    pub healthy: bool,
    pub costs: CostResult, // every cost component
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortBy {
    #[default]
    Name,
    Price,
    Margin,
    Profit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Default)]
pub struct ReportFilter {
    pub search: String,
    pub min_margin: Option<f64>,
    pub rentable_only: bool,
    pub sort_by: SortBy,
    pub order: SortOrder,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub count: usize,
    pub healthy_count: usize,
    pub rentable_count: usize,
    pub mean_margin: f64,
    pub std_dev_margin: f64,
    pub min_margin: f64,
    pub max_margin: f64,
}

pub fn build_report(products: &[Product]) -> Vec<ProductRow> {
    products
        .iter()
        .map(|p| {
            let margin_percent = product_margin_percent(p);
            ProductRow {
                id: p.id.clone(),
                name: p.name.clone(),
                price: p.price,
                margin_percent,
                healthy: is_healthy_margin(margin_percent),
                costs: compute_costs(&CostInput::from(p)),
            }
        })
        .collect()
}

pub fn apply_filter(rows: &[ProductRow], filter: &ReportFilter) -> Vec<ProductRow> {
    let mut filtered = rows.to_vec();

    if !filter.search.is_empty() {
        let needle = filter.search.to_lowercase();
        filtered.retain(|r| r.name.to_lowercase().contains(&needle));
    }

    if let Some(min) = filter.min_margin {
        filtered.retain(|r| r.margin_percent >= min);
    }

    if filter.rentable_only {
        filtered.retain(|r| r.costs.is_rentable());
    }

    filtered.sort_by(|a, b| {
        let ord = match filter.sort_by {
            SortBy::Name => a.name.to_lowercase().cmp(&b.name.to_lowercase()),
            SortBy::Price => a.price.total_cmp(&b.price),
            SortBy::Margin => a.margin_percent.total_cmp(&b.margin_percent),
            SortBy::Profit => a.costs.profit.total_cmp(&b.costs.profit),
        };
        match filter.order {
            SortOrder::Ascending => ord,
            SortOrder::Descending => ord.reverse(),
        }
    });

    filtered
}

pub fn summarize(rows: &[ProductRow]) -> CatalogSummary {
    if rows.is_empty() {
        return CatalogSummary::default();
    }

    let margins: Vec<f64> = rows.iter().map(|r| r.margin_percent).collect();
    // sample std dev is NaN for a single product
    let std_dev = finite_or_zero((&margins).std_dev());

    CatalogSummary {
        count: rows.len(),
        healthy_count: rows.iter().filter(|r| r.healthy).count(),
        rentable_count: rows.iter().filter(|r| r.costs.is_rentable()).count(),
        mean_margin: (&margins).mean(),
        std_dev_margin: std_dev,
        min_margin: Statistics::min(&margins),
        max_margin: Statistics::max(&margins),
    }
}
