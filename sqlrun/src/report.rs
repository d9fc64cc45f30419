// sqlrun/src/report.rs
//
// Human-readable rendering of a batch: one status line per script, one table
// per result set, failures repeated on stderr.

use comfy_table::Table;
use comfy_table::presets::ASCII_FULL;

use sqlrun_core::domain::outcome::{BatchVerdict, ScriptOutcome};
use sqlrun_core::domain::result::{Cell, ResultSet};

const NULL_MARKER: &str = "NULL";

pub fn render_result_set(set: &ResultSet) -> String {
    let mut table = Table::new();
    table
        .load_preset(ASCII_FULL)
        .set_header(set.column_names().to_vec());
    for row in set.rows() {
        table.add_row(row.iter().map(display_cell).collect::<Vec<_>>());
    }

    let count = set.rows().len();
    format!(
        "{}\ntypes: {}\n({} {})",
        table,
        set.column_type_names().join(", "),
        count,
        if count == 1 { "row" } else { "rows" }
    )
}

fn display_cell(cell: &Cell) -> String {
    match cell.as_text() {
        Some(text) => text.into_owned(),
        None => NULL_MARKER.to_string(),
    }
}

pub fn outcome_line(outcome: &ScriptOutcome) -> String {
    let name = outcome.script().name();
    match outcome.failure() {
        Some(failure) => format!("❌ {} ({} ms): {}", name, outcome.elapsed_ms(), failure),
        None => format!(
            "✅ {} ({} ms, {} result sets)",
            name,
            outcome.elapsed_ms(),
            outcome.result_sets().len()
        ),
    }
}

pub fn print_result_sets(sets: &[ResultSet]) {
    if sets.is_empty() {
        println!("   (no result sets)");
    }
    for set in sets {
        println!("{}", render_result_set(set));
    }
}

pub fn print_verdict(verdict: &BatchVerdict, quiet: bool) {
    for outcome in verdict.outcomes() {
        println!("{}", outcome_line(outcome));
        for warning in outcome.warnings() {
            println!("   ⚠️  {}", warning);
        }
        if !quiet && outcome.failure().is_none() {
            for set in outcome.result_sets() {
                println!("{}", render_result_set(set));
            }
        }
    }
}

pub fn print_failures(verdict: &BatchVerdict) {
    let failures: Vec<_> = verdict.failures().collect();
    if failures.is_empty() {
        return;
    }
    eprintln!("\n❌ {} script(s) failed:", failures.len());
    for (script, failure) in failures {
        eprintln!("   ➜ {}: {}", script.name(), failure);
    }
}
