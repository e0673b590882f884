//! Missing-term report
//!
//! Pure set logic plus file output: compares the candidate records against
//! the identifiers already annotated in the ontology, writes the difference
//! as CSV, and renders a short preview table.

use std::collections::BTreeSet;
use std::path::Path;

use tracing::debug;

use crate::error::Result;
use crate::rxnav::TermRecord;

/// Column order of the report
pub const CSV_HEADER: [&str; 4] = ["rxcui", "name", "status", "tty"];

/// Candidate records whose identifier the ontology does not carry.
///
/// Identifiers are compared numerically, so "0042" and "42" are the same
/// concept no matter which side wrote it with a leading zero. Any identifier
/// that does not parse is an error: a non-numeric RxCUI means either the
/// ontology annotation or the harvest is corrupt, and a silently wrong
/// report would be worse than no report.
///
/// Rows come back sorted by numeric identifier.
pub fn missing_terms(
    existing: &[TermRecord],
    candidates: &[TermRecord],
) -> Result<Vec<TermRecord>> {
    let mut known = BTreeSet::new();
    for record in existing {
        known.insert(record.numeric_rxcui()?);
    }

    let mut rows: Vec<(i64, TermRecord)> = Vec::new();
    for record in candidates {
        let id = record.numeric_rxcui()?;
        if !known.contains(&id) {
            rows.push((id, record.clone()));
        }
    }
    rows.sort_by_key(|(id, _)| *id);

    debug!(
        existing = existing.len(),
        candidates = candidates.len(),
        missing = rows.len(),
        "Computed missing terms"
    );

    Ok(rows.into_iter().map(|(_, record)| record).collect())
}

/// Write records as CSV with the standard header.
///
/// Absent fields become empty cells.
pub fn write_csv(path: &Path, records: &[TermRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for record in records {
        writer.write_record([
            record.rxcui.as_str(),
            record.name.as_deref().unwrap_or(""),
            record.status.as_deref().unwrap_or(""),
            record.tty.as_deref().unwrap_or(""),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Render the first `limit` records as an aligned text table.
pub fn preview(records: &[TermRecord], limit: usize) -> String {
    if records.is_empty() {
        return "(no missing terms)".to_string();
    }

    let rows: Vec<[String; 4]> = records
        .iter()
        .take(limit)
        .map(|r| {
            [
                r.rxcui.clone(),
                r.name.clone().unwrap_or_default(),
                r.status.clone().unwrap_or_default(),
                r.tty.clone().unwrap_or_default(),
            ]
        })
        .collect();

    let mut widths: [usize; 4] = [0; 4];
    for (width, header) in widths.iter_mut().zip(CSV_HEADER) {
        *width = header.len();
    }
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.len());
        }
    }

    let mut out = String::new();
    let header = CSV_HEADER.map(str::to_string);
    push_row(&mut out, &header, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 4], widths: &[usize; 4]) {
    let mut line = String::new();
    for (cell, width) in cells.iter().zip(widths.iter().copied()) {
        if !line.is_empty() {
            line.push_str("  ");
        }
        line.push_str(&format!("{cell:<width$}"));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
