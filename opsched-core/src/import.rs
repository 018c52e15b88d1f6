//! Import orchestration: the two-phase preview/commit flow.
//!
//! Preview and commit share one pure pipeline (`parse_feed_rows` plus
//! store annotation); commit only adds the insertion loop. Re-running the
//! pipeline on commit instead of trusting a client-supplied row list rules
//! out staleness and tampering between the two phases.

use std::collections::HashMap;

use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::ImportResult;
use crate::expand::expand_event;
use crate::ics::parse_feed;
use crate::matcher::is_duplicate;
use crate::row::{ImportRow, PreviewRow};
use crate::store::{NewPatient, PatientStore};

/// Rows extracted from one feed, after intra-file dedup and sorting.
#[derive(Debug)]
pub struct ParsedFeed {
    /// Raw expanded-row count, before intra-file dedup.
    pub events_found: usize,
    pub rows: Vec<ImportRow>,
}

/// Preview totals. Constructed fresh per request, never stored.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PreviewTotals {
    pub events_found: usize,
    pub valid_rows: usize,
    pub duplicate_rows: usize,
}

#[derive(Debug, Serialize)]
pub struct ImportPreview {
    pub totals: PreviewTotals,
    pub rows: Vec<PreviewRow>,
}

/// Commit totals. Partial success is a normal outcome: `skipped` counts
/// both duplicate-suppressed rows and rows the store rejected.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommitTotals {
    pub events_found: usize,
    pub valid_rows: usize,
    pub imported: usize,
    pub skipped: usize,
    pub duplicate_skipped: usize,
}

#[derive(Debug, Serialize)]
pub struct ImportSummary {
    pub totals: CommitTotals,
}

/// Parse feed text into deduplicated, sorted candidate rows.
///
/// Recurrence expansion and malformed feeds can emit exact repeats of the
/// same source occurrence; collapsing keeps the last-seen row per source
/// key. Output is sorted by `(surgery_date, full_name)` for deterministic
/// display.
pub fn parse_feed_rows(text: &str) -> ImportResult<ParsedFeed> {
    let events = parse_feed(text)?;

    let expanded: Vec<ImportRow> = events.iter().flat_map(expand_event).collect();
    let events_found = expanded.len();

    let mut by_key: HashMap<String, ImportRow> = HashMap::new();
    for row in expanded {
        by_key.insert(row.source_key.clone(), row);
    }

    let mut rows: Vec<ImportRow> = by_key.into_values().collect();
    rows.sort_by(|a, b| {
        a.surgery_date
            .cmp(&b.surgery_date)
            .then_with(|| a.full_name.cmp(&b.full_name))
    });

    Ok(ParsedFeed { events_found, rows })
}

/// Annotate candidate rows against the store's current state.
///
/// The store is queried once for the distinct date set of the candidates,
/// not once per row.
async fn annotate_rows(
    store: &dyn PatientStore,
    rows: Vec<ImportRow>,
) -> ImportResult<Vec<PreviewRow>> {
    let mut dates: Vec<String> = rows.iter().map(|r| r.surgery_date.clone()).collect();
    dates.sort();
    dates.dedup();

    let existing = if dates.is_empty() {
        Vec::new()
    } else {
        store.find_by_dates(&dates).await?
    };

    Ok(rows
        .into_iter()
        .map(|row| {
            let duplicate = is_duplicate(&row, &existing);
            PreviewRow { row, duplicate }
        })
        .collect())
}

/// Preview an import: full pipeline, no store mutation.
pub async fn preview(store: &dyn PatientStore, text: &str) -> ImportResult<ImportPreview> {
    let parsed = parse_feed_rows(text)?;
    let rows = annotate_rows(store, parsed.rows).await?;

    let totals = PreviewTotals {
        events_found: parsed.events_found,
        valid_rows: rows.len(),
        duplicate_rows: rows.iter().filter(|r| r.duplicate).count(),
    };

    Ok(ImportPreview { totals, rows })
}

/// Commit an import: re-run the preview pipeline, then insert row by row.
///
/// The loop is best-effort and not transactional. A store rejection of one
/// row is counted as `skipped` and the remaining rows still go in; callers
/// needing atomicity must layer a transaction at the store boundary.
pub async fn commit(
    store: &dyn PatientStore,
    text: &str,
    skip_duplicates: bool,
) -> ImportResult<ImportSummary> {
    let preview = preview(store, text).await?;

    let mut imported = 0;
    let mut skipped = 0;
    let mut duplicate_skipped = 0;

    for entry in &preview.rows {
        if skip_duplicates && entry.duplicate {
            skipped += 1;
            duplicate_skipped += 1;
            continue;
        }

        let patient = NewPatient {
            full_name: entry.row.full_name.clone(),
            phone: entry.row.phone.clone().unwrap_or_default(),
            surgery_date: entry.row.surgery_date.clone(),
            notes: entry.row.notes.clone(),
        };

        match store.insert(patient).await {
            Ok(_) => imported += 1,
            Err(e) => {
                warn!(
                    "Insert failed for '{}' on {}: {}",
                    entry.row.full_name, entry.row.surgery_date, e
                );
                skipped += 1;
            }
        }
    }

    Ok(ImportSummary {
        totals: CommitTotals {
            events_found: preview.totals.events_found,
            valid_rows: preview.totals.valid_rows,
            imported,
            skipped,
            duplicate_skipped,
        },
    })
}
