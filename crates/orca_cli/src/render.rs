//! Text renderer for the terminal front end.
//!
//! Each store notification prints only the regions whose fields changed, and
//! within the search list only the rows whose checksum changed.

use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use orca_core::{ClientView, Field, MegadocView, RecordDiff, SearchRowView, StateStore};

/// Shared output sink for rendered lines and prompts.
pub type Output = Arc<Mutex<dyn Write + Send>>;

/// A screen region and the snapshot fields it displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    Status,
    Corpus,
    Searches,
    Error,
}

impl Region {
    pub const ALL: [Region; 4] = [
        Region::Status,
        Region::Corpus,
        Region::Searches,
        Region::Error,
    ];

    pub fn fields(self) -> &'static [Field] {
        match self {
            Region::Status => &[Field::IsConnected, Field::IsPollingEnabled, Field::ApiVersion],
            Region::Corpus => &[Field::CorpusChecksum, Field::CorpusTotal],
            Region::Searches => &[Field::Searches],
            Region::Error => &[Field::Error],
        }
    }
}

/// Lines describing what changed in the store's most recent update.
pub fn render(store: &StateStore) -> Vec<String> {
    let changes = store.changes();
    let view = ClientView::from_snapshot(store.get());
    let mut lines = Vec::new();

    for region in Region::ALL {
        if !region.fields().iter().any(|field| changes.contains(*field)) {
            continue;
        }
        match region {
            Region::Status => lines.push(status_line(&view)),
            Region::Corpus => lines.push(corpus_line(&view)),
            Region::Searches => {
                let diff = RecordDiff::for_snapshots(store.previous(), store.get());
                lines.extend(search_lines(&view, &diff));
            }
            Region::Error => lines.push(error_line(&view)),
        }
    }
    lines
}

/// Registers a listener that writes [`render`] output to `out`.
pub fn subscribe(store: &mut StateStore, out: Output) {
    store.subscribe(move |store| {
        let lines = render(store);
        if lines.is_empty() {
            return;
        }
        let mut out = out.lock().unwrap_or_else(PoisonError::into_inner);
        for line in lines {
            let _ = writeln!(out, "{line}");
        }
        let _ = out.flush();
    });
}

fn status_line(view: &ClientView) -> String {
    let polling = if view.polling_enabled { "on" } else { "paused" };
    let mut line = format!("[status] {} | polling {}", view.connection_label(), polling);
    if let Some(version) = &view.api_version {
        line.push_str(&format!(" | api {version}"));
    }
    if let Some(polled_at) = view.last_polled_at {
        line.push_str(&format!(" | polled {}", polled_at.format("%H:%M:%S")));
    }
    line
}

fn corpus_line(view: &ClientView) -> String {
    let total = view
        .corpus_total
        .map(format_with_commas)
        .unwrap_or_else(|| "unknown".to_string());
    match &view.corpus_checksum {
        Some(checksum) => format!("[corpus] documents: {total} | checksum {checksum}"),
        None => format!("[corpus] documents: {total}"),
    }
}

fn error_line(view: &ClientView) -> String {
    match &view.error {
        Some(error) => format!("[error] {error}"),
        None => "[error] cleared".to_string(),
    }
}

fn search_lines(view: &ClientView, diff: &RecordDiff) -> Vec<String> {
    let mut lines: Vec<String> = view
        .searches
        .iter()
        .filter_map(|row| {
            if diff.added.contains(&row.uid) {
                Some(format_search_row('+', row))
            } else if diff.updated.contains(&row.uid) {
                Some(format_search_row('~', row))
            } else {
                None
            }
        })
        .collect();
    lines.extend(diff.removed.iter().map(|uid| format!("[search] - {uid}")));
    lines
}

fn format_search_row(marker: char, row: &SearchRowView) -> String {
    let mut line = format!(
        "[search] {marker} {uid} \"{search_str}\" {status}, {results} results",
        uid = row.uid,
        search_str = row.search_str,
        status = row.status.as_str().to_ascii_lowercase(),
        results = format_with_commas(row.results),
    );
    for megadoc in &row.megadocs {
        line.push_str(" | ");
        line.push_str(&format_megadoc(megadoc));
    }
    line
}

fn format_megadoc(megadoc: &MegadocView) -> String {
    match &megadoc.url {
        Some(url) => format!("{} {} {}", megadoc.filetype, megadoc.label, url),
        None => format!("{} {}", megadoc.filetype, megadoc.label),
    }
}

fn format_with_commas(value: u64) -> String {
    let mut out = String::new();
    for (i, ch) in value.to_string().chars().rev().enumerate() {
        if i != 0 && i % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out.chars().rev().collect()
}
