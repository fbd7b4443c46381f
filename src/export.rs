//! Flat row views of a statement for the surrounding export step. The
//! spreadsheet/PDF rendering itself happens outside this crate; the CSV
//! text here is the crate's own boundary format.

use crate::engine::Statement;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct StatementRow {
    pub id: String,
    pub label: String,
    pub current_year: f64,
    pub previous_year: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorkingNoteRow {
    pub linked_item: String,
    pub description: String,
    pub current_year: f64,
    pub previous_year: f64,
}

/// One row per value-carrying template line, in presentation order.
pub fn statement_rows(statement: &Statement) -> Vec<StatementRow> {
    statement
        .structure
        .iter()
        .filter(|item| item.carries_value())
        .map(|item| {
            let value = statement.value(&item.id);
            StatementRow {
                id: item.id.clone(),
                label: item.label.clone(),
                current_year: value.current_year,
                previous_year: value.previous_year,
            }
        })
        .collect()
}

/// One row per working note, grouped by the presentation order of the line
/// items they back.
pub fn working_note_rows(statement: &Statement) -> Vec<WorkingNoteRow> {
    let mut rows = Vec::new();

    for item in &statement.structure {
        let Some(notes) = statement.working_notes.get(&item.id) else {
            continue;
        };

        for note in notes {
            rows.push(WorkingNoteRow {
                linked_item: item.id.clone(),
                description: note.description.clone(),
                current_year: note.current_year_amount,
                previous_year: note.previous_year_amount,
            });
        }
    }

    rows
}

pub fn statement_to_csv(statement: &Statement) -> String {
    let mut output = String::new();
    output.push_str("Id,Label,Current Year,Previous Year\n");

    for row in statement_rows(statement) {
        output.push_str(&format!(
            "{},{},{:.2},{:.2}\n",
            csv_field(&row.id),
            csv_field(&row.label),
            row.current_year,
            row.previous_year
        ));
    }

    output
}

pub fn working_notes_to_csv(statement: &Statement) -> String {
    let mut output = String::new();
    output.push_str("Linked Item,Description,Current Year,Previous Year\n");

    for row in working_note_rows(statement) {
        output.push_str(&format!(
            "{},{},{:.2},{:.2}\n",
            csv_field(&row.linked_item),
            csv_field(&row.description),
            row.current_year,
            row.previous_year
        ));
    }

    output
}

/// Labels like "Property, plant and equipment" need quoting.
fn csv_field(raw: &str) -> String {
    if raw.contains(',') || raw.contains('"') || raw.contains('\n') {
        format!("\"{}\"", raw.replace('"', "\"\""))
    } else {
        raw.to_string()
    }
}
