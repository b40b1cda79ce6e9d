use clap::Parser;
use serde_json::Value;
use std::path::Path;

use profit_desk::cli::{execute, parse_input, Cli};
use profit_desk::config::AppConfig;
use profit_desk::error::{CatalogError, Error};
use profit_desk::model::{AdInput, CostInput, FbaInput, PromoInput, PromoMode};

fn config_in(dir: &Path) -> AppConfig {
    AppConfig {
        db_path: dir.join("catalog.db"),
        ..AppConfig::default()
    }
}

fn run(config: &AppConfig, args: &[&str]) -> Result<Value, Error> {
    let cli = Cli::try_parse_from(std::iter::once("profit-desk").chain(args.iter().copied()))
        .unwrap();
    execute(cli.command, config)
}

fn write_input(dir: &Path, name: &str, json: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, json).unwrap();
    path.to_string_lossy().into_owned()
}

fn assert_close(actual: &Value, expected: f64) {
    let actual = actual.as_f64().unwrap();
    assert!(
        (actual - expected).abs() < 1e-2,
        "expected {expected}, got {actual}"
    );
}

#[test]
fn empty_objects_take_form_defaults() {
    let costs: CostInput = parse_input("{}").unwrap();
    assert_eq!(costs, CostInput::default());

    let fba: FbaInput = parse_input("{}").unwrap();
    assert_eq!(fba.vat_rate, 20.0);
    assert_eq!(fba.seasonality_factor, 1.0);
    assert_eq!(fba.return_rate, 2.0);
    assert_eq!(fba.stocking_period, 3.0);

    let ads: AdInput = parse_input("{}").unwrap();
    assert_eq!(ads, AdInput::default());
    assert_eq!(ads.target_roas, 2.0);
    assert_eq!(ads.target_margin, 30.0);

    let promo: PromoInput = parse_input("{}").unwrap();
    assert_eq!(promo.mode, PromoMode::default_bogo());
    let promo: PromoInput = parse_input(r#"{"promoType":"pack"}"#).unwrap();
    assert_eq!(promo.mode, PromoMode::default_pack());
}

#[test]
fn malformed_input_is_an_input_error() {
    assert!(matches!(
        parse_input::<CostInput>("{\"sellingPrice\": "),
        Err(Error::Input(_))
    ));
}

#[test]
fn costs_prints_result_flag_and_components() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let input = write_input(
        dir.path(),
        "costs.json",
        r#"{"sellingPrice":100,"manufacturingCost":30,"shippingCost":10,
            "customCosts":[{"id":"1","name":"Box","value":5}]}"#,
    );

    let out = run(&config, &["costs", &input]).unwrap();
    assert_close(&out["result"]["totalCost"], 45.0);
    assert_close(&out["result"]["minimumPrice"], 150.0);
    assert_eq!(out["isRentable"], false);
    let names: Vec<&str> = out["components"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Manufacturing", "Shipping", "Box"]);
}

#[test]
fn ads_and_promo_report_rentability() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let ads = write_input(
        dir.path(),
        "ads.json",
        r#"{"budget":100,"costPerClick":0.5,"conversionRate":5,
            "averageCartValue":100,"productCost":40}"#,
    );
    let out = run(&config, &["ads", &ads]).unwrap();
    assert_close(&out["result"]["revenue"], 1000.0);
    assert_eq!(out["isRentable"], true);
    assert_eq!(out["meetsTargetRoas"], true);
    assert_close(&out["roasProgressPercent"], 500.0);

    let promo = write_input(
        dir.path(),
        "promo.json",
        r#"{"sellingPrice":30,"manufacturingCost":10,"shippingCost":2}"#,
    );
    let out = run(&config, &["promo", &promo]).unwrap();
    assert_eq!(out["result"]["unitsOffered"], 3);
    assert_close(&out["result"]["revenue"], 60.0);
    assert_eq!(out["isRentable"], true);

    let fba = write_input(dir.path(), "fba.json", r#"{"sellingPrice":40,"buyingPrice":8}"#);
    let out = run(&config, &["fba", &fba]).unwrap();
    assert!(out["isRentable"].is_boolean());
    assert!(out["marginPercent"].as_f64().unwrap().is_finite());
}

#[test]
fn products_round_trip_through_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    let created = run(
        &config,
        &["products", "add", "--name", "Hoodie", "--price", "45", "--manufacturing", "12"],
    )
    .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    run(&config, &["products", "update", &id, "--shipping", "4"]).unwrap();
    let shown = run(&config, &["products", "show", &id]).unwrap();
    assert_eq!(shown["name"], "Hoodie");
    assert_close(&shown["shippingCost"], 4.0);

    run(
        &config,
        &["products", "add", "--name", "Sticker", "--price", "3", "--manufacturing", "2.5"],
    )
    .unwrap();
    let report = run(&config, &["products", "report", "--sort", "margin", "--desc"]).unwrap();
    assert_eq!(report["products"][0]["name"], "Hoodie");
    assert_eq!(report["summary"]["count"], 2);
    assert_eq!(report["summary"]["healthyCount"], 1);

    run(&config, &["products", "delete", &id]).unwrap();
    assert_eq!(run(&config, &["products", "list"]).unwrap().as_array().unwrap().len(), 1);
    assert!(matches!(
        run(&config, &["products", "show", &id]),
        Err(Error::Catalog(CatalogError::NotFound(_)))
    ));
}

#[test]
fn product_flag_feeds_costs_and_promo() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let created = run(
        &config,
        &[
            "products",
            "add",
            "--name",
            "Mug",
            "--price",
            "30",
            "--manufacturing",
            "10",
            "--shipping",
            "2",
        ],
    )
    .unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    let costs = run(&config, &["costs", "--product", &id]).unwrap();
    assert_close(&costs["result"]["totalCost"], 12.0);
    assert_close(&costs["result"]["profit"], 18.0);

    // no input file: bogo 2+1 on the product's prices
    let promo = run(&config, &["promo", "--product", &id]).unwrap();
    assert_close(&promo["result"]["revenue"], 60.0);
    assert_close(&promo["result"]["costs"], 36.0);

    let ws = run(&config, &["workspace", "show"]).unwrap();
    assert_eq!(ws["selectedProductId"], id.as_str());
    assert_eq!(ws["productCosts"]["productName"], "Mug");

    assert!(matches!(
        run(&config, &["costs", "--product", "missing"]),
        Err(Error::Catalog(CatalogError::NotFound(_)))
    ));
}

#[test]
fn workspace_edits_persist_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    run(&config, &["workspace", "set", "--name", "Lamp", "--price", "100"]).unwrap();
    run(&config, &["workspace", "set", "--manufacturing", "20"]).unwrap();
    let ws = run(&config, &["workspace", "add-cost", "--name", "Box", "--value", "5"]).unwrap();
    let cost_id = ws["productCosts"]["customCosts"][0]["id"]
        .as_str()
        .unwrap()
        .to_string();

    let out = run(&config, &["workspace", "costs"]).unwrap();
    assert_close(&out["result"]["totalCost"], 25.0);
    assert_eq!(out["isRentable"], true);

    assert!(matches!(
        run(&config, &["workspace", "add-cost", "--name", "Free", "--value", "0"]),
        Err(Error::Argument(_))
    ));

    run(&config, &["workspace", "remove-cost", &cost_id]).unwrap();
    let out = run(&config, &["workspace", "costs"]).unwrap();
    assert_close(&out["result"]["totalCost"], 20.0);

    run(&config, &["workspace", "reset"]).unwrap();
    let ws = run(&config, &["workspace", "show"]).unwrap();
    assert_eq!(ws["productCosts"]["productName"], "");
    assert_eq!(ws["adMetrics"]["cpc"], 1.0);
}

#[test]
fn deleting_selected_product_clears_stored_selection() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    let created = run(&config, &["products", "add", "--name", "Cap", "--price", "20"]).unwrap();
    let id = created["id"].as_str().unwrap().to_string();

    run(&config, &["workspace", "select", &id]).unwrap();
    run(&config, &["products", "delete", &id]).unwrap();
    let ws = run(&config, &["workspace", "show"]).unwrap();
    assert!(ws["selectedProductId"].is_null());

    run(&config, &["workspace", "select", "none"]).unwrap();
    assert!(matches!(
        run(&config, &["workspace", "select", "missing"]),
        Err(Error::Catalog(CatalogError::NotFound(_)))
    ));
}
