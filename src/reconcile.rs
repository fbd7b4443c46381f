//! Derivation rules: revenue / cost / gross-profit triangulation, the UAE
//! corporate tax provision, and the dependent-total rule tables evaluated by
//! the engine. All arithmetic is safe-coercing; nothing in this module can
//! fail or panic on malformed figures.

use crate::templates::ids;
use serde::{Deserialize, Serialize};

/// UAE corporate tax: 9% of taxable income above the small-business
/// threshold.
pub const CORPORATE_TAX_THRESHOLD: f64 = 375_000.0;
pub const CORPORATE_TAX_RATE: f64 = 0.09;

/// Consistency tolerance for triangulation: 2% of the expected figure,
/// floored at one whole currency unit. Empirically tuned against observed
/// extraction output; not derived from anything.
const RELATIVE_TOLERANCE: f64 = 0.02;

pub fn within_tolerance(expected: f64, actual: f64) -> bool {
    let tolerance = (expected.abs() * RELATIVE_TOLERANCE).max(1.0);
    (expected - actual).abs() <= tolerance
}

/// NaN and infinities collapse to zero so one corrupt figure cannot poison a
/// whole statement.
pub fn sanitize_amount(amount: f64) -> f64 {
    if amount.is_finite() {
        amount
    } else {
        0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrossProfitTriple {
    pub revenue: f64,
    pub cost_of_revenue: f64,
    pub gross_profit: f64,
}

/// Resolves the revenue / cost-of-revenue / gross-profit triple when one
/// figure is missing or inconsistent with the other two. Costs may arrive
/// with either sign convention, so every formula consumes them by magnitude;
/// a recomputed cost is stored negative. Applied independently per period.
pub fn triangulate(revenue: f64, cost_of_revenue: f64, gross_profit: f64) -> GrossProfitTriple {
    let mut revenue = sanitize_amount(revenue);
    let mut cost = sanitize_amount(cost_of_revenue);
    let mut gross = sanitize_amount(gross_profit);

    if gross != 0.0 && cost != 0.0 && (revenue == 0.0 || !within_tolerance(gross + cost.abs(), revenue))
    {
        revenue = gross + cost.abs();
    } else if revenue != 0.0
        && gross != 0.0
        && (cost == 0.0 || !within_tolerance(revenue - gross, cost.abs()))
    {
        cost = -(revenue - gross);
    } else if gross == 0.0 && revenue != 0.0 && cost != 0.0 {
        gross = revenue - cost.abs();
    }

    GrossProfitTriple {
        revenue,
        cost_of_revenue: cost,
        gross_profit: gross,
    }
}

/// Tax charge for one period. Losses carry no charge.
pub fn corporate_tax_provision(net_profit: f64) -> f64 {
    let taxable = sanitize_amount(net_profit).max(0.0);
    if taxable > CORPORATE_TAX_THRESHOLD {
        (taxable - CORPORATE_TAX_THRESHOLD) * CORPORATE_TAX_RATE
    } else {
        0.0
    }
}

/// One dependent total: `sum(add) - sum(|subtract|)`. Subtracted components
/// are consumed by magnitude so either expense sign convention in the source
/// yields the same total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TotalRule {
    pub id: String,
    pub add: Vec<String>,
    #[serde(default)]
    pub subtract: Vec<String>,
}

impl TotalRule {
    fn new(id: &str, add: &[&str], subtract: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            add: add.iter().map(|s| s.to_string()).collect(),
            subtract: subtract.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Income components of the net profit derivation.
const INCOME_COMPONENTS: &[&str] = &[
    ids::REVENUE,
    ids::OTHER_INCOME,
    ids::UNREALISED_GAINS,
    ids::SHARE_OF_ASSOCIATE_PROFITS,
    ids::REVALUATION_GAINS,
];

/// Expense components of the net profit derivation.
const EXPENSE_COMPONENTS: &[&str] = &[
    ids::COST_OF_REVENUE,
    ids::IMPAIRMENTS,
    ids::BUSINESS_PROMOTION,
    ids::FOREX_LOSS,
    ids::SELLING_DISTRIBUTION,
    ids::ADMINISTRATIVE_EXPENSES,
    ids::FINANCE_COSTS,
    ids::DEPRECIATION,
];

/// Dependent-total rules for the P&L, in evaluation order. The corporate tax
/// provision, profit after tax, and comprehensive-income default are handled
/// by the engine after these rules.
pub fn profit_and_loss_total_rules() -> Vec<TotalRule> {
    vec![
        TotalRule::new(ids::GROSS_PROFIT, &[ids::REVENUE], &[ids::COST_OF_REVENUE]),
        TotalRule::new(ids::PROFIT_LOSS_YEAR, INCOME_COMPONENTS, EXPENSE_COMPONENTS),
    ]
}

/// Dependent-total rules for the balance sheet, in evaluation order:
/// section totals first, then the roll-ups built from them.
pub fn balance_sheet_total_rules() -> Vec<TotalRule> {
    vec![
        TotalRule::new(
            ids::TOTAL_NON_CURRENT_ASSETS,
            &[ids::PROPERTY_PLANT_EQUIPMENT, ids::INTANGIBLE_ASSETS],
            &[],
        ),
        TotalRule::new(
            ids::TOTAL_CURRENT_ASSETS,
            &[
                ids::INVENTORIES,
                ids::TRADE_RECEIVABLES,
                ids::DUE_FROM_RELATED_PARTIES,
                ids::CASH_AND_BANK,
            ],
            &[],
        ),
        TotalRule::new(
            ids::TOTAL_ASSETS,
            &[ids::TOTAL_NON_CURRENT_ASSETS, ids::TOTAL_CURRENT_ASSETS],
            &[],
        ),
        TotalRule::new(
            ids::TOTAL_EQUITY,
            &[
                ids::SHARE_CAPITAL,
                ids::SHAREHOLDERS_CURRENT_ACCOUNT,
                ids::RETAINED_EARNINGS,
            ],
            &[],
        ),
        TotalRule::new(
            ids::TOTAL_LIABILITIES,
            &[
                ids::TRADE_PAYABLES,
                ids::ACCRUED_EXPENSES,
                ids::VAT_PAYABLE,
                ids::CORPORATE_TAX_PAYABLE,
            ],
            &[],
        ),
        TotalRule::new(
            ids::TOTAL_EQUITY_LIABILITIES,
            &[ids::TOTAL_EQUITY, ids::TOTAL_LIABILITIES],
            &[],
        ),
    ]
}
