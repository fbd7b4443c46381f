//! Per-statement state and the event reducer. All recomputation runs
//! synchronously in a fixed order (working notes, then line-item totals,
//! then dependent totals, then the tax provision) so a read immediately
//! after any single event sees a fully reconciled statement.

use crate::classify::{classify_rows, rehome_cost_of_revenue, BALANCE_SHEET_RULES, PROFIT_AND_LOSS_RULES};
use crate::error::{ReconcileError, Result};
use crate::ingestion;
use crate::reconcile::{
    balance_sheet_total_rules, corporate_tax_provision, profit_and_loss_total_rules,
    sanitize_amount, triangulate, TotalRule,
};
use crate::schema::{CurrencyConfig, LineItem, Period, PeriodValue, StatementKind, WorkingNote};
use crate::templates::{self, ids};
use chrono::NaiveDate;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Edit state of one statement. The transition is one-way: any manual edit
/// makes the statement dirty, and only an explicit [`Statement::reset`]
/// (a fresh extraction run) returns it to pristine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    Pristine,
    Dirty,
}

/// Which side of a total rule a custom line item contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Contribution {
    Add,
    Subtract,
}

/// Everything that can change a statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum StatementEvent {
    /// A new extraction result became available. Ignored while the
    /// statement is dirty.
    RawExtracted { document: Value },

    /// The user edited one line item's value directly.
    LineItemEdited {
        id: String,
        period: Period,
        value: f64,
    },

    /// The user replaced the working-note breakdown of one line item. An
    /// empty list clears the bucket and leaves the last value in place.
    WorkingNoteEdited { id: String, notes: Vec<WorkingNote> },
}

/// Named-figure fallbacks per statement: canonical id and the response keys
/// that may carry the figure directly.
const PNL_NAMED_FIGURES: &[(&str, &[&str])] = &[
    (ids::REVENUE, ingestion::REVENUE_KEYS),
    (ids::COST_OF_REVENUE, ingestion::COST_OF_SALES_KEYS),
    (ids::GROSS_PROFIT, ingestion::GROSS_PROFIT_KEYS),
];

const BALANCE_SHEET_NAMED_FIGURES: &[(&str, &[&str])] = &[
    (ids::TOTAL_ASSETS, ingestion::TOTAL_ASSETS_KEYS),
    (ids::TOTAL_EQUITY, ingestion::TOTAL_EQUITY_KEYS),
    (ids::TOTAL_LIABILITIES, ingestion::TOTAL_LIABILITIES_KEYS),
    (
        ids::TOTAL_EQUITY_LIABILITIES,
        ingestion::TOTAL_EQUITY_LIABILITIES_KEYS,
    ),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub kind: StatementKind,
    pub structure: Vec<LineItem>,
    pub values: BTreeMap<String, PeriodValue>,
    pub working_notes: BTreeMap<String, Vec<WorkingNote>>,
    pub currency: CurrencyConfig,
    pub edit_state: EditState,
    totals: Vec<TotalRule>,
}

impl Statement {
    pub fn profit_and_loss(currency: CurrencyConfig) -> Self {
        Self {
            kind: StatementKind::ProfitAndLoss,
            structure: templates::profit_and_loss_template(),
            values: BTreeMap::new(),
            working_notes: BTreeMap::new(),
            currency,
            edit_state: EditState::Pristine,
            totals: profit_and_loss_total_rules(),
        }
    }

    pub fn balance_sheet(currency: CurrencyConfig) -> Self {
        Self {
            kind: StatementKind::BalanceSheet,
            structure: templates::balance_sheet_template(),
            values: BTreeMap::new(),
            working_notes: BTreeMap::new(),
            currency,
            edit_state: EditState::Pristine,
            totals: balance_sheet_total_rules(),
        }
    }

    pub fn is_dirty(&self) -> bool {
        self.edit_state == EditState::Dirty
    }

    /// Clears the dirty flag so the next extraction refresh is applied.
    /// Called by the workflow when the user deliberately re-runs extraction.
    pub fn reset(&mut self) {
        self.edit_state = EditState::Pristine;
    }

    /// Current value of a line item; zero for ids that have never been set.
    pub fn value(&self, id: &str) -> PeriodValue {
        self.values.get(id).copied().unwrap_or_default()
    }

    pub fn line_item(&self, id: &str) -> Option<&LineItem> {
        self.structure.iter().find(|item| item.id == id)
    }

    fn has_notes(&self, id: &str) -> bool {
        self.working_notes.get(id).is_some_and(|notes| !notes.is_empty())
    }

    /// Direct edit of one line item value. Rejects unknown ids and rows that
    /// are not editable (headers, derived totals). Marks the statement dirty.
    pub fn set_value(&mut self, id: &str, period: Period, value: f64) -> Result<()> {
        let editable = self
            .line_item(id)
            .map(|item| item.is_editable && item.carries_value())
            .ok_or_else(|| ReconcileError::UnknownLineItem(id.to_string()))?;

        if !editable {
            return Err(ReconcileError::NotEditable(id.to_string()));
        }

        self.values
            .entry(id.to_string())
            .or_default()
            .set(period, sanitize_amount(value));
        self.edit_state = EditState::Dirty;
        self.recompute();
        Ok(())
    }

    /// Inserts a user-defined line item after `after_id` and registers it as
    /// a constituent of the total identified by `total_id`.
    pub fn add_custom_item(
        &mut self,
        after_id: &str,
        item: LineItem,
        total_id: &str,
        contribution: Contribution,
    ) -> Result<()> {
        let Some(rule_index) = self.totals.iter().position(|rule| rule.id == total_id) else {
            return Err(ReconcileError::UnknownLineItem(total_id.to_string()));
        };

        let item_id = item.id.clone();
        templates::insert_custom_item(&mut self.structure, after_id, item)?;

        match contribution {
            Contribution::Add => self.totals[rule_index].add.push(item_id),
            Contribution::Subtract => self.totals[rule_index].subtract.push(item_id),
        }

        self.recompute();
        Ok(())
    }

    /// The reducer. Never fails: malformed events degrade to no-ops.
    pub fn apply(&mut self, event: StatementEvent) {
        match event {
            StatementEvent::RawExtracted { document } => self.refresh_from_extraction(&document),
            StatementEvent::LineItemEdited { id, period, value } => {
                if self.set_value(&id, period, value).is_err() {
                    debug!("ignoring edit to unknown or non-editable line item '{id}'");
                }
            }
            StatementEvent::WorkingNoteEdited { id, notes } => self.set_working_notes(&id, notes),
        }
    }

    fn set_working_notes(&mut self, id: &str, notes: Vec<WorkingNote>) {
        if self.line_item(id).is_none() {
            debug!("ignoring working notes for unknown line item '{id}'");
            return;
        }

        if notes.is_empty() {
            self.working_notes.remove(id);
        } else {
            let sanitized = notes
                .into_iter()
                .map(|mut note| {
                    note.current_year_amount = sanitize_amount(note.current_year_amount);
                    note.previous_year_amount = sanitize_amount(note.previous_year_amount);
                    note
                })
                .collect();
            self.working_notes.insert(id.to_string(), sanitized);
        }

        self.edit_state = EditState::Dirty;
        self.recompute();
    }

    /// Rebuilds the statement from a fresh extraction result. A dirty
    /// statement is left untouched; so is everything when the result has no
    /// section for this statement.
    fn refresh_from_extraction(&mut self, document: &Value) {
        if self.is_dirty() {
            debug!(
                "{:?} has manual edits; skipping extraction refresh",
                self.kind
            );
            return;
        }

        let Some(section) = ingestion::statement_section(document, self.kind) else {
            debug!(
                "extraction result has no {:?} section; keeping previous values",
                self.kind
            );
            return;
        };

        let rows = ingestion::section_rows(section);
        let rules = match self.kind {
            StatementKind::ProfitAndLoss => PROFIT_AND_LOSS_RULES,
            StatementKind::BalanceSheet => BALANCE_SHEET_RULES,
        };

        let mut buckets = classify_rows(&rows, rules, &self.currency);
        if self.kind == StatementKind::ProfitAndLoss {
            rehome_cost_of_revenue(&mut buckets);
        }

        debug!(
            "classified {} of {} extracted rows into {} buckets for {:?}",
            buckets.values().map(Vec::len).sum::<usize>(),
            rows.len(),
            buckets.len(),
            self.kind
        );

        self.working_notes = buckets;
        self.values.clear();
        self.apply_working_note_sums();
        self.apply_named_figures(section);

        if self.kind == StatementKind::ProfitAndLoss {
            self.triangulate_gross_profit();
        }

        self.recompute();
    }

    /// Named top-level figures backfill ids that classification produced no
    /// breakdown for.
    fn apply_named_figures(&mut self, section: &Value) {
        let named = match self.kind {
            StatementKind::ProfitAndLoss => PNL_NAMED_FIGURES,
            StatementKind::BalanceSheet => BALANCE_SHEET_NAMED_FIGURES,
        };

        for (id, keys) in named {
            if self.has_notes(id) {
                continue;
            }

            let current = ingestion::named_figure(section, keys, Period::Current)
                .map(|amount| self.currency.to_base(amount))
                .unwrap_or(0.0);
            let previous = ingestion::named_figure(section, keys, Period::Previous)
                .map(|amount| self.currency.to_base(amount))
                .unwrap_or(0.0);

            let value = PeriodValue::new(current, previous);
            if !value.is_zero() {
                self.values.insert(id.to_string(), value);
            }
        }
    }

    /// Resolves the revenue / cost / gross-profit triple per period during a
    /// refresh. Figures backed by working notes are never overwritten.
    fn triangulate_gross_profit(&mut self) {
        for period in [Period::Current, Period::Previous] {
            let triple = triangulate(
                self.value(ids::REVENUE).get(period),
                self.value(ids::COST_OF_REVENUE).get(period),
                self.value(ids::GROSS_PROFIT).get(period),
            );

            for (id, resolved) in [
                (ids::REVENUE, triple.revenue),
                (ids::COST_OF_REVENUE, triple.cost_of_revenue),
                (ids::GROSS_PROFIT, triple.gross_profit),
            ] {
                if resolved != 0.0 && !self.has_notes(id) {
                    self.values
                        .entry(id.to_string())
                        .or_default()
                        .set(period, resolved);
                }
            }
        }
    }

    fn apply_working_note_sums(&mut self) {
        for (id, notes) in &self.working_notes {
            if notes.is_empty() {
                continue;
            }

            let current = notes
                .iter()
                .map(|note| sanitize_amount(note.current_year_amount))
                .sum();
            let previous = notes
                .iter()
                .map(|note| sanitize_amount(note.previous_year_amount))
                .sum();
            self.values
                .insert(id.clone(), PeriodValue::new(current, previous));
        }
    }

    /// The fixed-order recompute pipeline. Working notes win over every
    /// derivation formula for their line item.
    fn recompute(&mut self) {
        self.apply_working_note_sums();

        let rules = self.totals.clone();
        for rule in &rules {
            if self.has_notes(&rule.id) {
                continue;
            }
            if let Some(value) = self.eval_rule(rule) {
                self.values.insert(rule.id.clone(), value);
            }
        }

        if self.kind == StatementKind::ProfitAndLoss {
            self.recompute_tax_chain();
        }
    }

    /// `sum(add) - sum(|subtract|)`, or `None` when no constituent has ever
    /// been populated (so a directly-sourced total is not zeroed out).
    fn eval_rule(&self, rule: &TotalRule) -> Option<PeriodValue> {
        let referenced = rule
            .add
            .iter()
            .chain(rule.subtract.iter())
            .any(|id| self.values.contains_key(id));
        if !referenced {
            return None;
        }

        let mut value = PeriodValue::default();
        for period in [Period::Current, Period::Previous] {
            let added: f64 = rule.add.iter().map(|id| self.value(id).get(period)).sum();
            let subtracted: f64 = rule
                .subtract
                .iter()
                .map(|id| self.value(id).get(period).abs())
                .sum();
            value.set(period, added - subtracted);
        }
        Some(value)
    }

    /// Comprehensive income default, tax provision, and after-tax profit,
    /// in that order. Each step yields to working notes for its own id.
    fn recompute_tax_chain(&mut self) {
        let Some(net) = self.values.get(ids::PROFIT_LOSS_YEAR).copied() else {
            return;
        };

        if !self.has_notes(ids::TOTAL_COMPREHENSIVE_INCOME) {
            self.values
                .insert(ids::TOTAL_COMPREHENSIVE_INCOME.to_string(), net);
        }

        let tax = if self.has_notes(ids::CORPORATE_TAX) {
            self.value(ids::CORPORATE_TAX)
        } else {
            let tax = PeriodValue::new(
                corporate_tax_provision(net.current_year),
                corporate_tax_provision(net.previous_year),
            );
            self.values.insert(ids::CORPORATE_TAX.to_string(), tax);
            tax
        };

        if !self.has_notes(ids::PROFIT_AFTER_TAX) {
            self.values.insert(
                ids::PROFIT_AFTER_TAX.to_string(),
                PeriodValue::new(
                    net.current_year - tax.current_year,
                    net.previous_year - tax.previous_year,
                ),
            );
        }
    }
}

/// Serialized workflow step state: both statements plus the reporting
/// period they cover. Opaque to the surrounding workflow beyond being this
/// engine's persisted in-memory state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StepState {
    pub organization_name: String,
    pub period_start: NaiveDate,
    pub period_end: NaiveDate,
    pub profit_and_loss: Statement,
    pub balance_sheet: Statement,
}

impl StepState {
    pub fn new(
        organization_name: &str,
        period_start: NaiveDate,
        period_end: NaiveDate,
        currency: CurrencyConfig,
    ) -> Result<Self> {
        if period_end < period_start {
            return Err(ReconcileError::InvalidReportingPeriod {
                start: period_start.to_string(),
                end: period_end.to_string(),
            });
        }

        Ok(Self {
            organization_name: organization_name.to_string(),
            period_start,
            period_end,
            profit_and_loss: Statement::profit_and_loss(currency.clone()),
            balance_sheet: Statement::balance_sheet(currency),
        })
    }

    /// Routes a fresh extraction result to both statements. Dirty statements
    /// keep their manual edits.
    pub fn apply_extraction(&mut self, document: &Value) {
        info!(
            "applying extraction result for {} ({} to {})",
            self.organization_name, self.period_start, self.period_end
        );

        self.profit_and_loss.apply(StatementEvent::RawExtracted {
            document: document.clone(),
        });
        self.balance_sheet.apply(StatementEvent::RawExtracted {
            document: document.clone(),
        });
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn pnl() -> Statement {
        Statement::profit_and_loss(CurrencyConfig::base())
    }

    fn sample_document() -> Value {
        json!({
            "statementOfComprehensiveIncome": {
                "items": [
                    { "description": "Revenue", "amount": 1_000_000.0, "previousYearAmount": 800_000.0 },
                    { "description": "Cost of revenue", "amount": -400_000.0, "previousYearAmount": -350_000.0 },
                    { "description": "Administrative expenses", "amount": -100_000.0, "previousYearAmount": -90_000.0 }
                ]
            },
            "statementOfFinancialPosition": {
                "rows": [
                    { "description": "Trade receivables", "amount": 250_000.0 },
                    { "description": "Cash and bank balances", "amount": 150_000.0 },
                    { "description": "Share capital", "amount": 100_000.0 },
                    { "description": "Trade payables", "amount": 80_000.0 }
                ]
            }
        })
    }

    #[test]
    fn test_extraction_builds_derived_totals() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        assert_eq!(statement.value(ids::REVENUE).current_year, 1_000_000.0);
        assert_eq!(statement.value(ids::GROSS_PROFIT).current_year, 600_000.0);
        assert_eq!(
            statement.value(ids::PROFIT_LOSS_YEAR).current_year,
            500_000.0
        );
        // (500,000 - 375,000) * 9%
        assert_eq!(statement.value(ids::CORPORATE_TAX).current_year, 11_250.0);
        assert_eq!(
            statement.value(ids::PROFIT_AFTER_TAX).current_year,
            488_750.0
        );
        assert_eq!(
            statement.value(ids::TOTAL_COMPREHENSIVE_INCOME).current_year,
            500_000.0
        );
        assert!(!statement.is_dirty());
    }

    #[test]
    fn test_previous_year_flows_through() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        assert_eq!(statement.value(ids::REVENUE).previous_year, 800_000.0);
        assert_eq!(statement.value(ids::GROSS_PROFIT).previous_year, 450_000.0);
        assert_eq!(
            statement.value(ids::PROFIT_LOSS_YEAR).previous_year,
            360_000.0
        );
        assert_eq!(statement.value(ids::CORPORATE_TAX).previous_year, 0.0);
    }

    #[test]
    fn test_dirty_guard_blocks_refresh() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        statement.apply(StatementEvent::LineItemEdited {
            id: ids::REVENUE.to_string(),
            period: Period::Current,
            value: 1_200_000.0,
        });
        assert!(statement.is_dirty());
        assert_eq!(statement.value(ids::REVENUE).current_year, 1_200_000.0);

        // A refresh with different figures must not clobber the edit.
        let refreshed = json!({
            "statementOfComprehensiveIncome": {
                "items": [{ "description": "Revenue", "amount": 999.0 }]
            }
        });
        statement.apply(StatementEvent::RawExtracted { document: refreshed.clone() });
        assert_eq!(statement.value(ids::REVENUE).current_year, 1_200_000.0);

        // After an explicit reset the refresh applies again.
        statement.reset();
        statement.apply(StatementEvent::RawExtracted { document: refreshed });
        assert_eq!(statement.value(ids::REVENUE).current_year, 999.0);
    }

    #[test]
    fn test_edit_recomputes_dependent_totals() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        statement.apply(StatementEvent::LineItemEdited {
            id: ids::ADMINISTRATIVE_EXPENSES.to_string(),
            period: Period::Current,
            value: -200_000.0,
        });

        assert_eq!(
            statement.value(ids::PROFIT_LOSS_YEAR).current_year,
            400_000.0
        );
        assert_eq!(statement.value(ids::CORPORATE_TAX).current_year, 2_250.0);
        assert_eq!(
            statement.value(ids::PROFIT_AFTER_TAX).current_year,
            397_750.0
        );
    }

    #[test]
    fn test_edits_to_derived_totals_are_ignored() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        statement.apply(StatementEvent::LineItemEdited {
            id: ids::GROSS_PROFIT.to_string(),
            period: Period::Current,
            value: 1.0,
        });

        assert_eq!(statement.value(ids::GROSS_PROFIT).current_year, 600_000.0);
        assert!(!statement.is_dirty());
    }

    #[test]
    fn test_working_notes_win_over_derivation() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        statement.apply(StatementEvent::WorkingNoteEdited {
            id: ids::GROSS_PROFIT.to_string(),
            notes: vec![WorkingNote::new("Gross profit per audit", 550_000.0, 0.0)],
        });

        assert_eq!(statement.value(ids::GROSS_PROFIT).current_year, 550_000.0);
    }

    #[test]
    fn test_working_note_sums_stay_reconciled() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        statement.apply(StatementEvent::WorkingNoteEdited {
            id: ids::REVENUE.to_string(),
            notes: vec![
                WorkingNote::new("Local sales", 700_000.0, 500_000.0),
                WorkingNote::new("Export sales", 300_000.0, 250_000.0),
            ],
        });

        let notes = &statement.working_notes[ids::REVENUE];
        let sum: f64 = notes.iter().map(|n| n.current_year_amount).sum();
        assert_eq!(statement.value(ids::REVENUE).current_year, sum);
        assert_eq!(statement.value(ids::REVENUE).previous_year, 750_000.0);
        assert!(statement.is_dirty());
    }

    #[test]
    fn test_clearing_notes_keeps_last_value() {
        let mut statement = pnl();
        statement.apply(StatementEvent::WorkingNoteEdited {
            id: ids::OTHER_INCOME.to_string(),
            notes: vec![WorkingNote::new("Scrap sales", 5_000.0, 0.0)],
        });
        assert_eq!(statement.value(ids::OTHER_INCOME).current_year, 5_000.0);

        statement.apply(StatementEvent::WorkingNoteEdited {
            id: ids::OTHER_INCOME.to_string(),
            notes: vec![],
        });
        assert!(!statement.working_notes.contains_key(ids::OTHER_INCOME));
        assert_eq!(statement.value(ids::OTHER_INCOME).current_year, 5_000.0);
    }

    #[test]
    fn test_triangulation_during_refresh() {
        let mut statement = pnl();
        let document = json!({
            "statementOfComprehensiveIncome": {
                "costOfSales": -40.0,
                "grossProfit": 60.0
            }
        });
        statement.apply(StatementEvent::RawExtracted { document });

        assert_eq!(statement.value(ids::REVENUE).current_year, 100.0);
        assert_eq!(statement.value(ids::COST_OF_REVENUE).current_year, -40.0);
        assert_eq!(statement.value(ids::GROSS_PROFIT).current_year, 60.0);
    }

    #[test]
    fn test_balance_sheet_totals() {
        let mut statement = Statement::balance_sheet(CurrencyConfig::base());
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        assert_eq!(
            statement.value(ids::TOTAL_CURRENT_ASSETS).current_year,
            400_000.0
        );
        assert_eq!(statement.value(ids::TOTAL_ASSETS).current_year, 400_000.0);
        assert_eq!(statement.value(ids::TOTAL_EQUITY).current_year, 100_000.0);
        assert_eq!(
            statement.value(ids::TOTAL_LIABILITIES).current_year,
            80_000.0
        );
        assert_eq!(
            statement.value(ids::TOTAL_EQUITY_LIABILITIES).current_year,
            180_000.0
        );
    }

    #[test]
    fn test_missing_section_keeps_previous_values() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });
        let before = statement.value(ids::REVENUE);

        statement.apply(StatementEvent::RawExtracted {
            document: json!({ "unrelated": true }),
        });
        assert_eq!(statement.value(ids::REVENUE), before);
    }

    #[test]
    fn test_custom_item_feeds_its_total() {
        let mut statement = pnl();
        statement.apply(StatementEvent::RawExtracted {
            document: sample_document(),
        });

        statement
            .add_custom_item(
                ids::ADMINISTRATIVE_EXPENSES,
                LineItem::item("staff_costs", "Staff costs"),
                ids::PROFIT_LOSS_YEAR,
                Contribution::Subtract,
            )
            .unwrap();

        statement.apply(StatementEvent::LineItemEdited {
            id: "staff_costs".to_string(),
            period: Period::Current,
            value: -50_000.0,
        });

        assert_eq!(
            statement.value(ids::PROFIT_LOSS_YEAR).current_year,
            450_000.0
        );
    }

    #[test]
    fn test_unknown_event_targets_are_ignored() {
        let mut statement = pnl();
        statement.apply(StatementEvent::LineItemEdited {
            id: "no_such_item".to_string(),
            period: Period::Current,
            value: 42.0,
        });
        statement.apply(StatementEvent::WorkingNoteEdited {
            id: "no_such_item".to_string(),
            notes: vec![WorkingNote::new("x", 1.0, 0.0)],
        });

        assert!(statement.values.is_empty());
        assert!(!statement.is_dirty());
    }

    #[test]
    fn test_step_state_round_trip() {
        let mut state = StepState::new(
            "Gulf Trading LLC",
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            CurrencyConfig::base(),
        )
        .unwrap();
        state.apply_extraction(&sample_document());

        let json = state.to_json().unwrap();
        let restored = StepState::from_json(&json).unwrap();

        assert_eq!(restored.organization_name, "Gulf Trading LLC");
        assert_eq!(
            restored.profit_and_loss.value(ids::PROFIT_LOSS_YEAR),
            state.profit_and_loss.value(ids::PROFIT_LOSS_YEAR)
        );
        assert_eq!(
            restored.balance_sheet.value(ids::TOTAL_ASSETS),
            state.balance_sheet.value(ids::TOTAL_ASSETS)
        );
    }

    #[test]
    fn test_step_state_rejects_inverted_period() {
        let result = StepState::new(
            "Gulf Trading LLC",
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            CurrencyConfig::base(),
        );
        assert!(result.is_err());
    }
}
