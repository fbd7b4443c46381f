//! Buckets raw extraction rows into canonical accounts by keyword matching
//! on the row description. Rules are ordered data, first match wins; the
//! keyword lists are tuned against observed extraction output and are kept
//! as-is rather than re-derived.

use crate::extract::extract_amount;
use crate::ingestion::row_description;
use crate::schema::{CurrencyConfig, Period, WorkingNote};
use crate::templates::ids;
use serde_json::Value;
use std::collections::{BTreeMap, HashSet};

#[derive(Debug, Clone, Copy)]
pub struct ClassificationRule {
    pub account: &'static str,
    pub keywords: &'static [&'static str],
}

/// P&L rules. Cost-of-revenue precedes revenue so "cost of revenue" rows
/// never file under revenue; profit-after-tax precedes net profit for the
/// same reason.
pub const PROFIT_AND_LOSS_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        account: ids::COST_OF_REVENUE,
        keywords: &[
            "cost of revenue",
            "cost of sales",
            "cost of goods",
            "cogs",
            "direct cost",
        ],
    },
    ClassificationRule {
        account: ids::REVENUE,
        keywords: &["revenue", "sales", "turnover"],
    },
    ClassificationRule {
        account: ids::GROSS_PROFIT,
        keywords: &["gross profit", "gross margin"],
    },
    ClassificationRule {
        account: ids::OTHER_INCOME,
        keywords: &["other income", "miscellaneous income", "sundry income"],
    },
    ClassificationRule {
        account: ids::UNREALISED_GAINS,
        keywords: &["unrealised gain", "unrealized gain", "fair value gain"],
    },
    ClassificationRule {
        account: ids::SHARE_OF_ASSOCIATE_PROFITS,
        keywords: &["share of associate", "share of profit of associate", "equity accounted"],
    },
    ClassificationRule {
        account: ids::REVALUATION_GAINS,
        keywords: &["revaluation"],
    },
    ClassificationRule {
        account: ids::IMPAIRMENTS,
        keywords: &["impairment"],
    },
    ClassificationRule {
        account: ids::BUSINESS_PROMOTION,
        keywords: &["business promotion", "promotion", "advertis"],
    },
    ClassificationRule {
        account: ids::FOREX_LOSS,
        keywords: &["foreign exchange", "forex", "exchange loss"],
    },
    ClassificationRule {
        account: ids::SELLING_DISTRIBUTION,
        keywords: &["selling", "distribution", "marketing"],
    },
    ClassificationRule {
        account: ids::ADMINISTRATIVE_EXPENSES,
        keywords: &["administrative", "admin expense", "general and admin", "general & admin"],
    },
    ClassificationRule {
        account: ids::FINANCE_COSTS,
        keywords: &[
            "finance cost",
            "finance charge",
            "interest expense",
            "bank charge",
            "borrowing cost",
        ],
    },
    ClassificationRule {
        account: ids::DEPRECIATION,
        keywords: &["depreciation", "amortisation", "amortization"],
    },
    ClassificationRule {
        account: ids::PROFIT_AFTER_TAX,
        keywords: &["profit after tax", "net profit after tax"],
    },
    ClassificationRule {
        account: ids::CORPORATE_TAX,
        keywords: &["corporate tax", "income tax", "tax provision", "tax expense"],
    },
    ClassificationRule {
        account: ids::TOTAL_COMPREHENSIVE_INCOME,
        keywords: &["comprehensive income"],
    },
    ClassificationRule {
        account: ids::PROFIT_LOSS_YEAR,
        keywords: &[
            "net profit",
            "net income",
            "profit for the year",
            "profit for the period",
            "loss for the year",
        ],
    },
];

/// Balance sheet rules. Total lines precede their constituents so a "total
/// trade receivables" style row never lands in an item bucket.
pub const BALANCE_SHEET_RULES: &[ClassificationRule] = &[
    ClassificationRule {
        account: ids::TOTAL_EQUITY_LIABILITIES,
        keywords: &["total equity and liabilities", "equity and liabilities"],
    },
    ClassificationRule {
        account: ids::TOTAL_NON_CURRENT_ASSETS,
        keywords: &["total non-current assets", "total non current assets"],
    },
    ClassificationRule {
        account: ids::TOTAL_CURRENT_ASSETS,
        keywords: &["total current assets"],
    },
    ClassificationRule {
        account: ids::TOTAL_ASSETS,
        keywords: &["total assets"],
    },
    ClassificationRule {
        account: ids::TOTAL_EQUITY,
        keywords: &["total equity", "total shareholders"],
    },
    ClassificationRule {
        account: ids::TOTAL_LIABILITIES,
        keywords: &["total liabilities"],
    },
    ClassificationRule {
        account: ids::PROPERTY_PLANT_EQUIPMENT,
        keywords: &["property, plant", "property plant", "fixed asset"],
    },
    ClassificationRule {
        account: ids::INTANGIBLE_ASSETS,
        keywords: &["intangible"],
    },
    ClassificationRule {
        account: ids::INVENTORIES,
        keywords: &["inventor", "stock in trade"],
    },
    ClassificationRule {
        account: ids::TRADE_RECEIVABLES,
        keywords: &[
            "trade receivable",
            "trade and other receivable",
            "accounts receivable",
            "trade debtor",
        ],
    },
    ClassificationRule {
        account: ids::DUE_FROM_RELATED_PARTIES,
        keywords: &["due from related", "related party receivable"],
    },
    ClassificationRule {
        account: ids::CASH_AND_BANK,
        keywords: &["cash", "bank balance"],
    },
    ClassificationRule {
        account: ids::SHARE_CAPITAL,
        keywords: &["share capital", "paid-up capital", "paid up capital"],
    },
    ClassificationRule {
        account: ids::SHAREHOLDERS_CURRENT_ACCOUNT,
        keywords: &[
            "shareholders' current account",
            "shareholder's current account",
            "shareholders current account",
        ],
    },
    ClassificationRule {
        account: ids::RETAINED_EARNINGS,
        keywords: &["retained earning", "accumulated profit", "accumulated loss"],
    },
    ClassificationRule {
        account: ids::TRADE_PAYABLES,
        keywords: &[
            "trade payable",
            "trade and other payable",
            "accounts payable",
            "trade creditor",
        ],
    },
    ClassificationRule {
        account: ids::ACCRUED_EXPENSES,
        keywords: &["accrual", "accrued"],
    },
    ClassificationRule {
        account: ids::VAT_PAYABLE,
        keywords: &["vat"],
    },
    ClassificationRule {
        account: ids::CORPORATE_TAX_PAYABLE,
        keywords: &["corporate tax payable", "tax payable"],
    },
];

/// Descriptions that mark a row as cost-of-revenue even when it matched the
/// revenue rule (e.g. "Cost of revenue" contains "revenue").
const COST_MISFILE_KEYWORDS: &[&str] = &["cost of revenue", "cost of sales", "cost of goods", "cogs"];

/// Buckets raw rows into canonical accounts. Rows with no description or two
/// zero amounts are skipped; rows matching no rule are dropped. Amounts are
/// converted to the base currency before storage.
pub fn classify_rows(
    rows: &[Value],
    rules: &[ClassificationRule],
    currency: &CurrencyConfig,
) -> BTreeMap<String, Vec<WorkingNote>> {
    let mut buckets: BTreeMap<String, Vec<WorkingNote>> = BTreeMap::new();

    for row in rows {
        let Some(description) = row_description(row) else {
            continue;
        };

        let current = extract_amount(row, Period::Current).unwrap_or(0.0);
        let previous = extract_amount(row, Period::Previous).unwrap_or(0.0);
        if current == 0.0 && previous == 0.0 {
            continue;
        }

        let lowered = description.to_lowercase();
        let Some(account) = match_rule(&lowered, rules) else {
            continue;
        };

        let mut note = WorkingNote::new(description, currency.to_base(current), currency.to_base(previous));
        if !currency.is_base() {
            note.original_amount = Some(current);
            note.currency = Some(currency.effective_currency().to_string());
        }

        buckets.entry(account.to_string()).or_default().push(note);
    }

    buckets
}

fn match_rule<'r>(lowered_description: &str, rules: &'r [ClassificationRule]) -> Option<&'r str> {
    rules
        .iter()
        .find(|rule| {
            rule.keywords
                .iter()
                .any(|keyword| lowered_description.contains(keyword))
        })
        .map(|rule| rule.account)
}

/// Re-homes rows misfiled under revenue whose description indicates
/// cost-of-revenue, deduplicating against the target bucket so repeated
/// passes never accumulate copies.
pub fn rehome_cost_of_revenue(buckets: &mut BTreeMap<String, Vec<WorkingNote>>) {
    let Some(revenue) = buckets.get_mut(ids::REVENUE) else {
        return;
    };

    let mut kept = Vec::with_capacity(revenue.len());
    let mut misfiled = Vec::new();

    for note in revenue.drain(..) {
        let lowered = note.description.to_lowercase();
        if COST_MISFILE_KEYWORDS.iter().any(|k| lowered.contains(k)) {
            misfiled.push(note);
        } else {
            kept.push(note);
        }
    }
    *revenue = kept;

    if revenue.is_empty() {
        buckets.remove(ids::REVENUE);
    }

    if misfiled.is_empty() {
        return;
    }

    let target = buckets.entry(ids::COST_OF_REVENUE.to_string()).or_default();
    let mut seen: HashSet<String> = target.iter().map(dedup_key).collect();

    for note in misfiled {
        let key = dedup_key(&note);
        if seen.insert(key) {
            target.push(note);
        }
    }
}

fn dedup_key(note: &WorkingNote) -> String {
    format!(
        "{}|{:.2}|{:.2}",
        note.description.trim().to_lowercase(),
        note.current_year_amount,
        note.previous_year_amount
    )
}
