use crate::error::{ReconcileError, Result};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Reporting base currency. Every amount stored by the engine is expressed
/// in this currency after ingestion.
pub const BASE_CURRENCY: &str = "AED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Header,
    Subheader,
    Item,
    Total,
    GrandTotal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementKind {
    ProfitAndLoss,
    BalanceSheet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Current,
    Previous,
}

/// One row of a statement template. Headers and totals are not editable;
/// totals are recomputed by the engine and direct edits to them are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: String,
    pub label: String,
    pub kind: RowKind,
    pub is_editable: bool,
}

impl LineItem {
    pub fn item(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: RowKind::Item,
            is_editable: true,
        }
    }

    pub fn header(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: RowKind::Header,
            is_editable: false,
        }
    }

    pub fn subheader(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: RowKind::Subheader,
            is_editable: false,
        }
    }

    pub fn total(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: RowKind::Total,
            is_editable: false,
        }
    }

    pub fn grand_total(id: &str, label: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: RowKind::GrandTotal,
            is_editable: false,
        }
    }

    pub fn carries_value(&self) -> bool {
        !matches!(self.kind, RowKind::Header | RowKind::Subheader)
    }
}

/// Current- and previous-period amounts for one line item, in the base
/// currency.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodValue {
    pub current_year: f64,
    pub previous_year: f64,
}

impl PeriodValue {
    pub fn new(current_year: f64, previous_year: f64) -> Self {
        Self {
            current_year,
            previous_year,
        }
    }

    pub fn get(&self, period: Period) -> f64 {
        match period {
            Period::Current => self.current_year,
            Period::Previous => self.previous_year,
        }
    }

    pub fn set(&mut self, period: Period, value: f64) {
        match period {
            Period::Current => self.current_year = value,
            Period::Previous => self.previous_year = value,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.current_year == 0.0 && self.previous_year == 0.0
    }
}

/// One breakdown row backing a canonical line item. Once a line item has any
/// working notes, their sum is the source of truth for its displayed value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkingNote {
    pub description: String,

    /// The legacy `amount` field is an alias for the current-year figure.
    #[serde(alias = "amount")]
    pub current_year_amount: f64,

    #[serde(default)]
    pub previous_year_amount: f64,

    /// Amount as printed in the source document, before conversion to the
    /// base currency. Absent for rows already quoted in the base currency.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_amount: Option<f64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

impl WorkingNote {
    pub fn new(description: &str, current_year_amount: f64, previous_year_amount: f64) -> Self {
        Self {
            description: description.to_string(),
            current_year_amount,
            previous_year_amount,
            original_amount: None,
            currency: None,
        }
    }

    /// Legacy accessor mirroring the serialized `amount` alias.
    pub fn amount(&self) -> f64 {
        self.current_year_amount
    }

    pub fn amount_for(&self, period: Period) -> f64 {
        match period {
            Period::Current => self.current_year_amount,
            Period::Previous => self.previous_year_amount,
        }
    }
}

/// Conversion parameters for one workflow session. Set once; every amount
/// pulled from the raw extraction passes through [`CurrencyConfig::to_base`]
/// before it is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    pub selected_currency: String,

    /// Free-text currency code when the selection is not in the preset list.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_currency: Option<String>,

    pub exchange_rate_to_aed: f64,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self::base()
    }
}

impl CurrencyConfig {
    pub fn base() -> Self {
        Self {
            selected_currency: BASE_CURRENCY.to_string(),
            custom_currency: None,
            exchange_rate_to_aed: 1.0,
        }
    }

    pub fn new(currency: &str, exchange_rate_to_aed: f64) -> Result<Self> {
        if !exchange_rate_to_aed.is_finite() || exchange_rate_to_aed <= 0.0 {
            return Err(ReconcileError::InvalidExchangeRate(exchange_rate_to_aed));
        }

        Ok(Self {
            selected_currency: currency.to_string(),
            custom_currency: None,
            exchange_rate_to_aed,
        })
    }

    pub fn effective_currency(&self) -> &str {
        self.custom_currency
            .as_deref()
            .unwrap_or(&self.selected_currency)
    }

    pub fn is_base(&self) -> bool {
        self.effective_currency() == BASE_CURRENCY
    }

    /// Converts a source-currency amount into the base currency, rounded to
    /// the nearest whole unit. Identity rate for base-currency sessions.
    pub fn to_base(&self, amount: f64) -> f64 {
        if !amount.is_finite() {
            return 0.0;
        }

        if self.is_base() {
            return amount.round();
        }

        (amount * self.exchange_rate_to_aed).round()
    }

    /// Inverse of [`CurrencyConfig::to_base`], up to rounding.
    pub fn from_base(&self, amount: f64) -> f64 {
        if self.is_base() || self.exchange_rate_to_aed == 0.0 {
            return amount;
        }

        amount / self.exchange_rate_to_aed
    }
}

/// Preferred response shape for the document extraction service. The engine
/// parses arbitrary JSON defensively regardless, but handing this schema to
/// the service keeps its output close to the fast path.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractionOutline {
    #[schemars(
        description = "Profit & Loss section: the statement of comprehensive income as printed in the document"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_of_comprehensive_income: Option<ExtractedStatement>,

    #[schemars(
        description = "Balance Sheet section: the statement of financial position as printed in the document"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statement_of_financial_position: Option<ExtractedStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedStatement {
    #[schemars(
        description = "Every line of the statement in document order. Include subtotal and total lines exactly as printed."
    )]
    #[serde(default)]
    pub items: Vec<ExtractedRow>,

    #[schemars(
        description = "ISO 4217 code of the currency the statement is presented in (e.g. AED, USD)"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedRow {
    #[schemars(description = "The line description exactly as printed in the source document")]
    pub description: String,

    #[schemars(
        description = "Amount for the current reporting period. Use a negative number for amounts shown in parentheses."
    )]
    pub amount: f64,

    #[schemars(
        description = "Amount for the comparative (previous) period, if the document shows one"
    )]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub previous_year_amount: Option<f64>,
}

impl ExtractionOutline {
    pub fn generate_json_schema() -> schemars::schema::RootSchema {
        schemars::schema_for!(ExtractionOutline)
    }

    pub fn schema_as_json() -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&Self::generate_json_schema())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_round_trip() {
        let config = CurrencyConfig::new("USD", 3.6725).unwrap();

        let original = 10_000.0;
        let converted = config.to_base(original);
        assert_eq!(converted, 36_725.0);

        let back = config.from_base(converted);
        assert!((back - original).abs() < 1.0);
    }

    #[test]
    fn test_base_currency_is_identity() {
        let config = CurrencyConfig::base();
        assert!(config.is_base());
        assert_eq!(config.to_base(1234.4), 1234.0);
        assert_eq!(config.from_base(1234.0), 1234.0);
    }

    #[test]
    fn test_conversion_rounds_to_whole_units() {
        let config = CurrencyConfig::new("EUR", 3.98).unwrap();
        assert_eq!(config.to_base(100.3), 399.0);
    }

    #[test]
    fn test_invalid_exchange_rate_rejected() {
        assert!(CurrencyConfig::new("USD", 0.0).is_err());
        assert!(CurrencyConfig::new("USD", -2.5).is_err());
        assert!(CurrencyConfig::new("USD", f64::NAN).is_err());
    }

    #[test]
    fn test_custom_currency_wins() {
        let mut config = CurrencyConfig::new("OTHER", 2.0).unwrap();
        config.custom_currency = Some("KWD".to_string());
        assert_eq!(config.effective_currency(), "KWD");
        assert!(!config.is_base());
    }

    #[test]
    fn test_working_note_amount_alias() {
        let json = r#"{ "description": "Export sales", "amount": 1500.0 }"#;
        let note: WorkingNote = serde_json::from_str(json).unwrap();
        assert_eq!(note.current_year_amount, 1500.0);
        assert_eq!(note.amount(), 1500.0);
        assert_eq!(note.previous_year_amount, 0.0);
    }

    #[test]
    fn test_extraction_outline_schema_generation() {
        let schema_json = ExtractionOutline::schema_as_json().unwrap();
        assert!(schema_json.contains("statementOfComprehensiveIncome"));
        assert!(schema_json.contains("statementOfFinancialPosition"));
        assert!(schema_json.contains("description"));
    }
}
