//! Product catalog and the working set the calculators read from.
//!
//! Storage sits behind [`ProductRepository`]; callers get the repository
//! injected and never see how products are persisted. Loading a product
//! into the [`Workspace`] copies it, later edits to either side do not
//! propagate.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::info;

use crate::error::CatalogError;
use crate::model::{CostInput, CustomCost, Product};

/// Fields of a product before the repository assigns an id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NewProduct {
    pub name: String,
    pub price: f64,
    pub manufacturing_cost: f64,
    pub shipping_cost: f64,
    pub custom_costs: Vec<CustomCost>,
}

/// Partial update, `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub manufacturing_cost: Option<f64>,
    pub shipping_cost: Option<f64>,
    pub custom_costs: Option<Vec<CustomCost>>,
}

impl ProductUpdate {
    fn apply(self, product: &mut Product) {
        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(price) = self.price {
            product.price = price;
        }
        if let Some(cost) = self.manufacturing_cost {
            product.manufacturing_cost = cost;
        }
        if let Some(cost) = self.shipping_cost {
            product.shipping_cost = cost;
        }
        if let Some(costs) = self.custom_costs {
            product.custom_costs = costs;
        }
    }
}

pub trait ProductRepository {
    fn get(&self, id: &str) -> Result<Option<Product>, CatalogError>;
    fn list(&self) -> Result<Vec<Product>, CatalogError>;
    fn create(&mut self, product: NewProduct) -> Result<Product, CatalogError>;
    fn update(&mut self, id: &str, update: ProductUpdate) -> Result<Product, CatalogError>;
    fn delete(&mut self, id: &str) -> Result<(), CatalogError>;
}

static LAST_TOKEN: AtomicU64 = AtomicU64::new(0);

/// Millisecond timestamp token, strictly increasing within the process.
/// Not guaranteed unique across processes.
fn next_token() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or_default();
    let prev = LAST_TOKEN
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |last| {
            Some(now.max(last + 1))
        })
        .unwrap_or_else(|last| last);
    now.max(prev + 1)
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InMemoryRepository {
    products: Vec<Product>,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_products(products: Vec<Product>) -> Self {
        InMemoryRepository { products }
    }

    pub fn into_products(self) -> Vec<Product> {
        self.products
    }

    fn next_id(&self) -> String {
        let mut id = next_token().to_string();
        while self.products.iter().any(|p| p.id == id) {
            id = next_token().to_string();
        }
        id
    }
}

impl ProductRepository for InMemoryRepository {
    fn get(&self, id: &str) -> Result<Option<Product>, CatalogError> {
        Ok(self.products.iter().find(|p| p.id == id).cloned())
    }

    fn list(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.products.clone())
    }

    fn create(&mut self, product: NewProduct) -> Result<Product, CatalogError> {
        let created = Product {
            id: self.next_id(),
            name: product.name,
            price: product.price,
            manufacturing_cost: product.manufacturing_cost,
            shipping_cost: product.shipping_cost,
            custom_costs: product.custom_costs,
        };
        info!(id = %created.id, name = %created.name, "product created");
        self.products.push(created.clone());
        Ok(created)
    }

    fn update(&mut self, id: &str, update: ProductUpdate) -> Result<Product, CatalogError> {
        let product = self
            .products
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))?;
        update.apply(product);
        info!(id = %id, "product updated");
        Ok(product.clone())
    }

    fn delete(&mut self, id: &str) -> Result<(), CatalogError> {
        let before = self.products.len();
        self.products.retain(|p| p.id != id);
        if self.products.len() == before {
            return Err(CatalogError::NotFound(id.to_string()));
        }
        info!(id = %id, "product deleted");
        Ok(())
    }
}

impl CustomCost {
    /// A named extra cost. Empty names and non-positive values are refused.
    pub fn new(name: &str, value: f64) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() || value.is_nan() || value <= 0.0 {
            return None;
        }
        Some(CustomCost {
            id: next_token().to_string(),
            name: name.to_string(),
            value,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductCosts {
    pub product_name: String,
    #[serde(flatten)]
    pub costs: CostInput,
}

/// Partial edit of the working product costs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductCostsUpdate {
    pub product_name: Option<String>,
    pub selling_price: Option<f64>,
    pub manufacturing_cost: Option<f64>,
    pub shipping_cost: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AdMetrics {
    pub budget: f64,
    pub conversion_rate: f64,
    pub cpc: f64,
    pub average_cart_value: f64,
    pub cost_per_sale: f64,
}

impl Default for AdMetrics {
    fn default() -> Self {
        AdMetrics {
            budget: 0.0,
            conversion_rate: 0.0,
            cpc: 1.0,
            average_cart_value: 50.0,
            cost_per_sale: 0.0,
        }
    }
}

/// Transient calculator state: the selected product and the values being
/// edited.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Workspace {
    pub selected_product_id: Option<String>,
    pub product_costs: ProductCosts,
    pub ad_metrics: AdMetrics,
}

impl Workspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` switches back to manual entry.
    pub fn select(&mut self, id: Option<&str>) {
        self.selected_product_id = id.map(str::to_string);
    }

    /// Snapshots the product into the working costs. Unknown ids leave the
    /// workspace untouched and return `false`.
    pub fn load_product<R: ProductRepository + ?Sized>(
        &mut self,
        repo: &R,
        id: &str,
    ) -> Result<bool, CatalogError> {
        let Some(product) = repo.get(id)? else {
            return Ok(false);
        };
        self.product_costs = ProductCosts {
            product_name: product.name.clone(),
            costs: CostInput::from(&product),
        };
        Ok(true)
    }

    pub fn set_product_costs(&mut self, update: ProductCostsUpdate) {
        let pc = &mut self.product_costs;
        if let Some(name) = update.product_name {
            pc.product_name = name;
        }
        if let Some(v) = update.selling_price {
            pc.costs.selling_price = v;
        }
        if let Some(v) = update.manufacturing_cost {
            pc.costs.manufacturing_cost = v;
        }
        if let Some(v) = update.shipping_cost {
            pc.costs.shipping_cost = v;
        }
    }

    /// Appends the cost, re-keying it if its id is already in the list.
    /// Returns the id it was stored under.
    pub fn add_custom_cost(&mut self, mut cost: CustomCost) -> String {
        let costs = &mut self.product_costs.costs.custom_costs;
        while costs.iter().any(|c| c.id == cost.id) {
            cost.id = next_token().to_string();
        }
        let id = cost.id.clone();
        costs.push(cost);
        id
    }

    pub fn remove_custom_cost(&mut self, id: &str) {
        self.product_costs.costs.custom_costs.retain(|c| c.id != id);
    }

    pub fn update_custom_cost(&mut self, id: &str, name: Option<String>, value: Option<f64>) {
        if let Some(cost) = self
            .product_costs
            .costs
            .custom_costs
            .iter_mut()
            .find(|c| c.id == id)
        {
            if let Some(name) = name {
                cost.name = name;
            }
            if let Some(value) = value {
                cost.value = value;
            }
        }
    }

    pub fn set_ad_metrics(&mut self, metrics: AdMetrics) {
        self.ad_metrics = metrics;
    }

    /// Drops the selection when it pointed at a deleted product.
    pub fn on_product_deleted(&mut self, id: &str) {
        if self.selected_product_id.as_deref() == Some(id) {
            self.selected_product_id = None;
        }
    }

    pub fn reset(&mut self) {
        *self = Workspace::default();
    }
}
