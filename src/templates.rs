use crate::error::{ReconcileError, Result};
use crate::schema::LineItem;

/// Canonical account ids. Stable across statement templates regardless of
/// how the source document labeled the line.
pub mod ids {
    // Profit & Loss
    pub const REVENUE: &str = "revenue";
    pub const COST_OF_REVENUE: &str = "cost_of_revenue";
    pub const GROSS_PROFIT: &str = "gross_profit";
    pub const OTHER_INCOME: &str = "other_income";
    pub const UNREALISED_GAINS: &str = "unrealised_gains";
    pub const SHARE_OF_ASSOCIATE_PROFITS: &str = "share_of_associate_profits";
    pub const REVALUATION_GAINS: &str = "revaluation_gains";
    pub const IMPAIRMENTS: &str = "impairments";
    pub const BUSINESS_PROMOTION: &str = "business_promotion";
    pub const FOREX_LOSS: &str = "forex_loss";
    pub const SELLING_DISTRIBUTION: &str = "selling_distribution";
    pub const ADMINISTRATIVE_EXPENSES: &str = "administrative_expenses";
    pub const FINANCE_COSTS: &str = "finance_costs";
    pub const DEPRECIATION: &str = "depreciation";
    pub const PROFIT_LOSS_YEAR: &str = "profit_loss_year";
    pub const CORPORATE_TAX: &str = "corporate_tax";
    pub const PROFIT_AFTER_TAX: &str = "profit_after_tax";
    pub const TOTAL_COMPREHENSIVE_INCOME: &str = "total_comprehensive_income";

    // Balance Sheet
    pub const PROPERTY_PLANT_EQUIPMENT: &str = "property_plant_equipment";
    pub const INTANGIBLE_ASSETS: &str = "intangible_assets";
    pub const TOTAL_NON_CURRENT_ASSETS: &str = "total_non_current_assets";
    pub const INVENTORIES: &str = "inventories";
    pub const TRADE_RECEIVABLES: &str = "trade_receivables";
    pub const DUE_FROM_RELATED_PARTIES: &str = "due_from_related_parties";
    pub const CASH_AND_BANK: &str = "cash_and_bank";
    pub const TOTAL_CURRENT_ASSETS: &str = "total_current_assets";
    pub const TOTAL_ASSETS: &str = "total_assets";
    pub const SHARE_CAPITAL: &str = "share_capital";
    pub const SHAREHOLDERS_CURRENT_ACCOUNT: &str = "shareholders_current_account";
    pub const RETAINED_EARNINGS: &str = "retained_earnings";
    pub const TOTAL_EQUITY: &str = "total_equity";
    pub const TRADE_PAYABLES: &str = "trade_payables";
    pub const ACCRUED_EXPENSES: &str = "accrued_expenses";
    pub const VAT_PAYABLE: &str = "vat_payable";
    pub const CORPORATE_TAX_PAYABLE: &str = "corporate_tax_payable";
    pub const TOTAL_LIABILITIES: &str = "total_liabilities";
    pub const TOTAL_EQUITY_LIABILITIES: &str = "total_equity_liabilities";
}

/// Statement of comprehensive income template, in presentation order.
pub fn profit_and_loss_template() -> Vec<LineItem> {
    vec![
        LineItem::item(ids::REVENUE, "Revenue"),
        LineItem::item(ids::COST_OF_REVENUE, "Cost of revenue"),
        LineItem::total(ids::GROSS_PROFIT, "Gross profit"),
        LineItem::item(ids::OTHER_INCOME, "Other income"),
        LineItem::item(ids::UNREALISED_GAINS, "Unrealised gains on investments"),
        LineItem::item(
            ids::SHARE_OF_ASSOCIATE_PROFITS,
            "Share of profits of associates",
        ),
        LineItem::item(ids::REVALUATION_GAINS, "Gains on revaluation"),
        LineItem::subheader("expenses", "Expenses"),
        LineItem::item(ids::IMPAIRMENTS, "Impairment losses"),
        LineItem::item(ids::BUSINESS_PROMOTION, "Business promotion expenses"),
        LineItem::item(ids::FOREX_LOSS, "Foreign exchange loss"),
        LineItem::item(
            ids::SELLING_DISTRIBUTION,
            "Selling and distribution expenses",
        ),
        LineItem::item(ids::ADMINISTRATIVE_EXPENSES, "Administrative expenses"),
        LineItem::item(ids::FINANCE_COSTS, "Finance costs"),
        LineItem::item(ids::DEPRECIATION, "Depreciation and amortisation"),
        LineItem::total(ids::PROFIT_LOSS_YEAR, "Net profit for the year"),
        LineItem::total(ids::CORPORATE_TAX, "Corporate tax provision"),
        LineItem::total(ids::PROFIT_AFTER_TAX, "Profit after tax"),
        LineItem::grand_total(
            ids::TOTAL_COMPREHENSIVE_INCOME,
            "Total comprehensive income for the year",
        ),
    ]
}

/// Statement of financial position template, in presentation order.
pub fn balance_sheet_template() -> Vec<LineItem> {
    vec![
        LineItem::header("assets", "Assets"),
        LineItem::subheader("non_current_assets", "Non-current assets"),
        LineItem::item(ids::PROPERTY_PLANT_EQUIPMENT, "Property, plant and equipment"),
        LineItem::item(ids::INTANGIBLE_ASSETS, "Intangible assets"),
        LineItem::total(ids::TOTAL_NON_CURRENT_ASSETS, "Total non-current assets"),
        LineItem::subheader("current_assets", "Current assets"),
        LineItem::item(ids::INVENTORIES, "Inventories"),
        LineItem::item(ids::TRADE_RECEIVABLES, "Trade receivables"),
        LineItem::item(ids::DUE_FROM_RELATED_PARTIES, "Due from related parties"),
        LineItem::item(ids::CASH_AND_BANK, "Cash and bank balances"),
        LineItem::total(ids::TOTAL_CURRENT_ASSETS, "Total current assets"),
        LineItem::total(ids::TOTAL_ASSETS, "Total assets"),
        LineItem::header("equity_and_liabilities", "Equity and liabilities"),
        LineItem::subheader("equity", "Equity"),
        LineItem::item(ids::SHARE_CAPITAL, "Share capital"),
        LineItem::item(
            ids::SHAREHOLDERS_CURRENT_ACCOUNT,
            "Shareholders' current account",
        ),
        LineItem::item(ids::RETAINED_EARNINGS, "Retained earnings"),
        LineItem::total(ids::TOTAL_EQUITY, "Total equity"),
        LineItem::subheader("liabilities", "Liabilities"),
        LineItem::item(ids::TRADE_PAYABLES, "Trade payables"),
        LineItem::item(ids::ACCRUED_EXPENSES, "Accrued expenses"),
        LineItem::item(ids::VAT_PAYABLE, "VAT payable"),
        LineItem::item(ids::CORPORATE_TAX_PAYABLE, "Corporate tax payable"),
        LineItem::total(ids::TOTAL_LIABILITIES, "Total liabilities"),
        LineItem::grand_total(ids::TOTAL_EQUITY_LIABILITIES, "Total equity and liabilities"),
    ]
}

/// Inserts a user-defined line item immediately after `after_id`.
pub fn insert_custom_item(
    structure: &mut Vec<LineItem>,
    after_id: &str,
    item: LineItem,
) -> Result<()> {
    if structure.iter().any(|existing| existing.id == item.id) {
        return Err(ReconcileError::DuplicateLineItem(item.id));
    }

    let position = structure
        .iter()
        .position(|existing| existing.id == after_id)
        .ok_or_else(|| ReconcileError::InvalidTemplatePosition(after_id.to_string()))?;

    structure.insert(position + 1, item);
    Ok(())
}
