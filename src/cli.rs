//! Command line surface of `profit-desk`.
//!
//! [`execute`] runs one command and returns the JSON document the binary
//! prints. Calculator inputs come from a JSON file or stdin; `--product`
//! pulls the prices from the catalog through the stored workspace instead.

use clap::{Parser, Subcommand, ValueEnum};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::catalog::{
    NewProduct, ProductCostsUpdate, ProductRepository, ProductUpdate, Workspace,
};
use crate::config::AppConfig;
use crate::costs::cost_components;
use crate::error::{CatalogError, Error, Result};
use crate::model::{AdInput, CostInput, CustomCost, FbaInput, PromoBase, PromoInput};
use crate::report::{apply_filter, build_report, summarize, ReportFilter, SortBy, SortOrder};
use crate::store::SqliteRepository;
use crate::{compute_ad_metrics, compute_costs, compute_fba};

#[derive(Parser, Debug)]
#[command(name = "profit-desk", version, about = "E-commerce profitability calculators")]
pub struct Cli {
    /// JSON config file
    #[arg(long, default_value = "profit-desk.json")]
    pub config: PathBuf,

    /// Catalog database, overrides the config file
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// Log filter, e.g. "debug"
    #[arg(long)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cost breakdown, margin and minimum price
    Costs {
        input: Option<PathBuf>,
        /// Use the stored product's costs instead of an input file
        #[arg(long, conflicts_with = "input")]
        product: Option<String>,
    },
    /// Amazon FBA fees and profitability
    Fba { input: Option<PathBuf> },
    /// Meta Ads ROAS and margin
    Ads { input: Option<PathBuf> },
    /// BOGO or pack promotion
    Promo {
        input: Option<PathBuf>,
        /// Take price and unit costs from the stored product
        #[arg(long)]
        product: Option<String>,
    },
    /// Product catalog
    #[command(subcommand)]
    Products(ProductCommand),
    /// Stored calculator state: selection and working costs
    #[command(subcommand)]
    Workspace(WorkspaceCommand),
}

#[derive(Subcommand, Debug)]
pub enum ProductCommand {
    List,
    Show {
        id: String,
    },
    Add {
        #[arg(long)]
        name: String,
        #[arg(long)]
        price: f64,
        #[arg(long, default_value_t = 0.0)]
        manufacturing: f64,
        #[arg(long, default_value_t = 0.0)]
        shipping: f64,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        manufacturing: Option<f64>,
        #[arg(long)]
        shipping: Option<f64>,
    },
    Delete {
        id: String,
    },
    /// Margin listing with summary statistics
    Report {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long)]
        min_margin: Option<f64>,
        #[arg(long)]
        rentable_only: bool,
        #[arg(long, value_enum, default_value_t = SortKey::Name)]
        sort: SortKey,
        #[arg(long)]
        desc: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum WorkspaceCommand {
    Show,
    /// Load a product into the working costs, `none` for manual entry
    Select {
        id: String,
    },
    /// Edit the working costs
    Set {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        price: Option<f64>,
        #[arg(long)]
        manufacturing: Option<f64>,
        #[arg(long)]
        shipping: Option<f64>,
    },
    AddCost {
        #[arg(long)]
        name: String,
        #[arg(long)]
        value: f64,
    },
    RemoveCost {
        id: String,
    },
    /// Run the cost calculator on the working costs
    Costs,
    Reset,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
pub enum SortKey {
    Name,
    Price,
    Margin,
    Profit,
}

impl From<SortKey> for SortBy {
    fn from(k: SortKey) -> Self {
        match k {
            SortKey::Name => SortBy::Name,
            SortKey::Price => SortBy::Price,
            SortKey::Margin => SortBy::Margin,
            SortKey::Profit => SortBy::Profit,
        }
    }
}

pub fn execute(command: Command, config: &AppConfig) -> Result<Value> {
    match command {
        Command::Costs { input, product } => {
            let input: CostInput = match product {
                Some(id) => {
                    let mut repo = open_catalog(config)?;
                    select_product(&mut repo, &id)?.product_costs.costs
                }
                None => read_input(input.as_deref())?,
            };
            Ok(costs_report(&input))
        }
        Command::Fba { input } => {
            let input: FbaInput = read_input(input.as_deref())?;
            let result = compute_fba(&input);
            debug!(?result, "fba computed");
            Ok(json!(result))
        }
        Command::Ads { input } => {
            let input: AdInput = read_input(input.as_deref())?;
            let result = compute_ad_metrics(&input);
            debug!(?result, "ads computed");
            Ok(json!({
                "result": result,
                "isRentable": result.is_rentable(input.target_margin),
                "meetsTargetRoas": result.meets_target_roas(input.target_roas),
                "roasProgressPercent": result.roas_progress_percent(input.target_roas),
            }))
        }
        Command::Promo { input, product } => {
            let mut promo: PromoInput = match (&input, &product) {
                (None, Some(_)) => PromoInput::default(),
                _ => read_input(input.as_deref())?,
            };
            if let Some(id) = product {
                let mut repo = open_catalog(config)?;
                let costs = select_product(&mut repo, &id)?.product_costs.costs;
                promo.base = PromoBase {
                    selling_price: costs.selling_price,
                    manufacturing_cost: costs.manufacturing_cost,
                    shipping_cost: costs.shipping_cost,
                };
            }
            let result = promo.compute();
            debug!(?result, "promo computed");
            Ok(json!({ "result": result, "isRentable": result.is_rentable() }))
        }
        Command::Products(cmd) => {
            let mut repo = open_catalog(config)?;
            run_products(cmd, &mut repo)
        }
        Command::Workspace(cmd) => {
            let mut repo = open_catalog(config)?;
            run_workspace(cmd, &mut repo)
        }
    }
}

fn run_products<R: ProductRepository>(cmd: ProductCommand, repo: &mut R) -> Result<Value> {
    match cmd {
        ProductCommand::List => Ok(json!(repo.list()?)),
        ProductCommand::Show { id } => {
            let product = repo.get(&id)?.ok_or(CatalogError::NotFound(id))?;
            Ok(json!(product))
        }
        ProductCommand::Add {
            name,
            price,
            manufacturing,
            shipping,
        } => {
            let created = repo.create(NewProduct {
                name,
                price,
                manufacturing_cost: manufacturing,
                shipping_cost: shipping,
                custom_costs: Vec::new(),
            })?;
            Ok(json!(created))
        }
        ProductCommand::Update {
            id,
            name,
            price,
            manufacturing,
            shipping,
        } => {
            let updated = repo.update(
                &id,
                ProductUpdate {
                    name,
                    price,
                    manufacturing_cost: manufacturing,
                    shipping_cost: shipping,
                    custom_costs: None,
                },
            )?;
            Ok(json!(updated))
        }
        ProductCommand::Delete { id } => {
            repo.delete(&id)?;
            Ok(json!({ "deleted": id }))
        }
        ProductCommand::Report {
            search,
            min_margin,
            rentable_only,
            sort,
            desc,
        } => {
            let rows = build_report(&repo.list()?);
            let filter = ReportFilter {
                search,
                min_margin,
                rentable_only,
                sort_by: sort.into(),
                order: if desc {
                    SortOrder::Descending
                } else {
                    SortOrder::Ascending
                },
            };
            let rows = apply_filter(&rows, &filter);
            let summary = summarize(&rows);
            Ok(json!({ "products": rows, "summary": summary }))
        }
    }
}

fn run_workspace(cmd: WorkspaceCommand, repo: &mut SqliteRepository) -> Result<Value> {
    let mut ws = repo.load_workspace()?;
    match cmd {
        WorkspaceCommand::Show => return Ok(json!(ws)),
        WorkspaceCommand::Costs => return Ok(costs_report(&ws.product_costs.costs)),
        WorkspaceCommand::Select { id } if id == "none" => ws.select(None),
        WorkspaceCommand::Select { id } => ws = select_product(repo, &id)?,
        WorkspaceCommand::Set {
            name,
            price,
            manufacturing,
            shipping,
        } => ws.set_product_costs(ProductCostsUpdate {
            product_name: name,
            selling_price: price,
            manufacturing_cost: manufacturing,
            shipping_cost: shipping,
        }),
        WorkspaceCommand::AddCost { name, value } => {
            let cost = CustomCost::new(&name, value).ok_or_else(|| {
                Error::Argument(format!("custom cost {name:?} needs a positive value"))
            })?;
            ws.add_custom_cost(cost);
        }
        WorkspaceCommand::RemoveCost { id } => ws.remove_custom_cost(&id),
        WorkspaceCommand::Reset => ws.reset(),
    }
    repo.save_workspace(&ws)?;
    Ok(json!(ws))
}

fn open_catalog(config: &AppConfig) -> Result<SqliteRepository> {
    Ok(SqliteRepository::open(&config.db_path, &config.storage_key)?)
}

/// Selects `id` in the stored workspace and snapshots its costs.
fn select_product(repo: &mut SqliteRepository, id: &str) -> Result<Workspace> {
    let mut ws = repo.load_workspace()?;
    if !ws.load_product(&*repo, id)? {
        return Err(CatalogError::NotFound(id.to_string()).into());
    }
    ws.select(Some(id));
    repo.save_workspace(&ws)?;
    Ok(ws)
}

fn costs_report(input: &CostInput) -> Value {
    let result = compute_costs(input);
    debug!(?result, "costs computed");
    let components: Vec<Value> = cost_components(input)
        .into_iter()
        .map(|(name, value)| json!({ "name": name, "value": value }))
        .collect();
    json!({
        "result": result,
        "isRentable": result.is_rentable(),
        "components": components,
    })
}

pub fn parse_input<T: DeserializeOwned>(raw: &str) -> Result<T> {
    Ok(serde_json::from_str(raw)?)
}

/// Reads JSON from `path`, or stdin when absent.
fn read_input<T: DeserializeOwned>(path: Option<&Path>) -> Result<T> {
    let raw = match path {
        Some(p) => std::fs::read_to_string(p)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    parse_input(&raw)
}
