use crate::model::ImportCosts;

/// Customs duty and VAT on a purchase. VAT is charged on price plus duty.
pub fn compute_import_costs(
    buying_price: f64,
    customs_duty_rate: f64,
    vat_rate: f64,
    other_import_costs: f64,
) -> ImportCosts {
    let duty = buying_price * (customs_duty_rate / 100.0);
    let vat = (buying_price + duty) * (vat_rate / 100.0);

    ImportCosts {
        duty,
        vat,
        total: duty + vat + other_import_costs,
    }
}
