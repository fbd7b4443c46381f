//! Boundary with the document extraction service. The service returns a
//! loosely-typed JSON object; nothing in it may be assumed present. This
//! module finds the statement sections, flattens their row lists, and reads
//! the named top-level figures some response shapes carry instead of rows.

use crate::extract::{coerce_amount, extract_amount};
use crate::schema::{Period, StatementKind};
use serde_json::Value;

const INCOME_STATEMENT_SECTIONS: &[&str] = &[
    "statementOfComprehensiveIncome",
    "statement_of_comprehensive_income",
    "incomeStatement",
    "income_statement",
    "profitAndLoss",
    "profit_and_loss",
    "pnl",
];

const FINANCIAL_POSITION_SECTIONS: &[&str] = &[
    "statementOfFinancialPosition",
    "statement_of_financial_position",
    "balanceSheet",
    "balance_sheet",
];

const ROW_CONTAINERS: &[&str] = &["items", "rows", "lineItems", "line_items", "entries"];

const DESCRIPTION_FIELDS: &[&str] = &["description", "label", "name", "particulars"];

/// Named figure keys for the revenue / cost / gross-profit triple.
pub const REVENUE_KEYS: &[&str] = &[
    "revenue",
    "totalRevenue",
    "total_revenue",
    "sales",
    "turnover",
];

pub const COST_OF_SALES_KEYS: &[&str] = &[
    "costOfSales",
    "cost_of_sales",
    "costOfRevenue",
    "cost_of_revenue",
    "costOfGoodsSold",
    "cogs",
];

pub const GROSS_PROFIT_KEYS: &[&str] = &["grossProfit", "gross_profit"];

/// Named figure keys for balance sheet totals that some response shapes
/// report directly.
pub const TOTAL_ASSETS_KEYS: &[&str] = &["totalAssets", "total_assets"];
pub const TOTAL_EQUITY_KEYS: &[&str] = &["totalEquity", "total_equity"];
pub const TOTAL_LIABILITIES_KEYS: &[&str] = &["totalLiabilities", "total_liabilities"];
pub const TOTAL_EQUITY_LIABILITIES_KEYS: &[&str] = &[
    "totalEquityAndLiabilities",
    "total_equity_and_liabilities",
    "totalEquityLiabilities",
];

/// Finds the section of the response covering `kind`, trying each known
/// section name in order.
pub fn statement_section(document: &Value, kind: StatementKind) -> Option<&Value> {
    let names = match kind {
        StatementKind::ProfitAndLoss => INCOME_STATEMENT_SECTIONS,
        StatementKind::BalanceSheet => FINANCIAL_POSITION_SECTIONS,
    };

    let obj = document.as_object()?;
    names.iter().find_map(|name| obj.get(*name))
}

/// Flattens a section into its raw line-item records. A section may be the
/// row array itself, or an object holding the rows under one of the known
/// container keys. Anything else yields no rows.
pub fn section_rows(section: &Value) -> Vec<Value> {
    if let Some(rows) = section.as_array() {
        return rows.clone();
    }

    if let Some(obj) = section.as_object() {
        for container in ROW_CONTAINERS {
            if let Some(rows) = obj.get(*container).and_then(Value::as_array) {
                return rows.clone();
            }
        }
    }

    Vec::new()
}

/// Free-text description of one raw record, if it has one.
pub fn row_description(record: &Value) -> Option<&str> {
    let obj = record.as_object()?;

    DESCRIPTION_FIELDS
        .iter()
        .find_map(|field| obj.get(*field).and_then(Value::as_str))
        .map(str::trim)
        .filter(|description| !description.is_empty())
}

/// Reads a named statement figure from a section. Scalar values are
/// current-period figures; object or array values go through the period
/// candidate search. Absent keys yield `None`.
pub fn named_figure(section: &Value, keys: &[&str], period: Period) -> Option<f64> {
    let obj = section.as_object()?;

    for key in keys {
        match obj.get(*key) {
            Some(value @ (Value::Object(_) | Value::Array(_))) => {
                if let Some(amount) = wrapped_figure(value, period) {
                    return Some(amount);
                }
            }
            Some(value) => {
                if period == Period::Current {
                    return Some(coerce_amount(value));
                }
            }
            None => {}
        }
    }

    None
}

fn wrapped_figure(value: &Value, period: Period) -> Option<f64> {
    if value.is_object() {
        return extract_amount(value, period);
    }

    // A bare two-column array: current first, previous second.
    let columns = value.as_array()?;
    let index = match period {
        Period::Current => 0,
        Period::Previous => 1,
    };
    columns.get(index).map(coerce_amount)
}

/// Source currency declared by the section, if any.
pub fn section_currency(section: &Value) -> Option<&str> {
    section
        .as_object()?
        .get("currency")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|currency| !currency.is_empty())
}
