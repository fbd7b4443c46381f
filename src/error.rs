use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("Invalid exchange rate {0}: must be a positive finite number")]
    InvalidExchangeRate(f64),

    #[error("Unknown line item id: {0}")]
    UnknownLineItem(String),

    #[error("Line item '{0}' is not editable")]
    NotEditable(String),

    #[error("Invalid template position '{0}': no item with that id")]
    InvalidTemplatePosition(String),

    #[error("Duplicate line item id: {0}")]
    DuplicateLineItem(String),

    #[error("Invalid reporting period: end {end} is before start {start}")]
    InvalidReportingPeriod { start: String, end: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
