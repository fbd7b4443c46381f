//! # Statement Reconciler
//!
//! A library for turning loosely-typed financial statement data (extracted
//! from documents by an external AI service) into canonical, internally
//! consistent Profit & Loss and Balance Sheet line items in a fixed
//! reporting currency.
//!
//! ## Core Concepts
//!
//! - **Canonical account id**: a stable key (`revenue`, `trade_receivables`)
//!   identifying one line item regardless of how the source document
//!   labeled it
//! - **Working note**: a breakdown row backing a line item; once present,
//!   the notes are the source of truth for that line item's value
//! - **Dirty statement**: one the user has edited manually; extraction
//!   refreshes never overwrite it until it is explicitly reset
//! - **Triangulation**: resolving revenue, cost of revenue, and gross
//!   profit from whichever two of the three the extraction supplied
//!
//! ## Example
//!
//! ```rust,ignore
//! use statement_reconciler::*;
//! use chrono::NaiveDate;
//! use serde_json::json;
//!
//! let mut state = StepState::new(
//!     "Gulf Trading LLC",
//!     NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!     NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
//!     CurrencyConfig::base(),
//! )?;
//!
//! state.apply_extraction(&json!({
//!     "statementOfComprehensiveIncome": {
//!         "items": [
//!             { "description": "Revenue", "amount": 1_000_000.0 },
//!             { "description": "Cost of revenue", "amount": -400_000.0 }
//!         ]
//!     }
//! }));
//!
//! let net = state.profit_and_loss.value("profit_loss_year");
//! ```

pub mod classify;
pub mod engine;
pub mod error;
pub mod export;
pub mod extract;
pub mod ingestion;
pub mod reconcile;
pub mod schema;
pub mod templates;

pub use engine::{Contribution, EditState, Statement, StatementEvent, StepState};
pub use error::{ReconcileError, Result};
pub use export::{
    statement_rows, statement_to_csv, working_note_rows, working_notes_to_csv, StatementRow,
    WorkingNoteRow,
};
pub use extract::{coerce_amount, extract_amount};
pub use reconcile::{corporate_tax_provision, triangulate, GrossProfitTriple};
pub use schema::{
    CurrencyConfig, ExtractionOutline, LineItem, Period, PeriodValue, RowKind, StatementKind,
    WorkingNote, BASE_CURRENCY,
};
pub use templates::{balance_sheet_template, insert_custom_item, profit_and_loss_template};
