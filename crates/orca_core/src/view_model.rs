use chrono::{DateTime, Utc};

use crate::{JobStatus, MegadocRecord, SearchRecord, StateSnapshot};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientView {
    pub connected: bool,
    pub polling_enabled: bool,
    /// Submission is only offered while the service is reachable.
    pub can_submit: bool,
    pub last_polled_at: Option<DateTime<Utc>>,
    pub api_version: Option<String>,
    pub corpus_checksum: Option<String>,
    pub corpus_total: Option<u64>,
    pub searches: Vec<SearchRowView>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRowView {
    pub uid: String,
    pub search_str: String,
    pub status: JobStatus,
    pub results: u64,
    pub megadocs: Vec<MegadocView>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MegadocView {
    pub filetype: String,
    pub label: String,
    pub url: Option<String>,
}

impl ClientView {
    pub fn from_snapshot(snapshot: &StateSnapshot) -> Self {
        Self {
            connected: snapshot.is_connected,
            polling_enabled: snapshot.is_polling_enabled,
            can_submit: snapshot.is_connected,
            last_polled_at: snapshot.last_polled_at,
            api_version: snapshot.api_version.clone(),
            corpus_checksum: snapshot.corpus_checksum.clone(),
            corpus_total: snapshot.corpus_total,
            searches: snapshot.searches.iter().map(SearchRowView::from_record).collect(),
            error: snapshot.error.clone(),
        }
    }

    pub fn connection_label(&self) -> &'static str {
        if self.connected {
            "connected"
        } else {
            "disconnected"
        }
    }
}

impl SearchRowView {
    pub fn from_record(record: &SearchRecord) -> Self {
        Self {
            uid: record.uid.clone(),
            search_str: record.search_str.clone(),
            status: record.status,
            results: record.results,
            megadocs: record.megadocs.iter().map(MegadocView::from_record).collect(),
        }
    }
}

impl MegadocView {
    pub fn from_record(record: &MegadocRecord) -> Self {
        let label = match (record.status, record.download()) {
            (JobStatus::Success, Some((_, size))) => format_filesize(size),
            (JobStatus::Started, _) => {
                let fraction = record.progress.unwrap_or(0.0).clamp(0.0, 1.0);
                format!("{:.0}%", fraction * 100.0)
            }
            (JobStatus::Sending, _) => "sending".to_string(),
            (status, _) => status.as_str().to_ascii_lowercase(),
        };
        Self {
            filetype: record.filetype.clone(),
            label,
            url: record.download().map(|(url, _)| url.to_string()),
        }
    }
}

/// Human-readable byte count using binary units, e.g. `1.5 KiB`.
pub fn format_filesize(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KiB", "MiB", "GiB", "TiB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    format!("{value:.1} {}", UNITS[unit])
}
