use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Lifecycle of a server-side job. Searches and megadocs share the same set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    Pending,
    Started,
    Stopped,
    Sending,
    Success,
    Failure,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "PENDING",
            JobStatus::Started => "STARTED",
            JobStatus::Stopped => "STOPPED",
            JobStatus::Sending => "SENDING",
            JobStatus::Success => "SUCCESS",
            JobStatus::Failure => "FAILURE",
        }
    }

    /// Terminal states never change again on the server.
    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Success | JobStatus::Failure)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown job status '{0}'")]
pub struct UnknownStatus(pub String);

impl FromStr for JobStatus {
    type Err = UnknownStatus;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let status = match raw.trim().to_ascii_uppercase().as_str() {
            "PENDING" => JobStatus::Pending,
            "STARTED" => JobStatus::Started,
            "STOPPED" => JobStatus::Stopped,
            "SENDING" => JobStatus::Sending,
            "SUCCESS" => JobStatus::Success,
            "FAILURE" => JobStatus::Failure,
            _ => return Err(UnknownStatus(raw.to_string())),
        };
        Ok(status)
    }
}

/// One search job as last reported by the server.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchRecord {
    pub uid: String,
    /// Changes whenever any client-visible field of the record or its megadocs changes.
    pub checksum: String,
    pub search_str: String,
    pub status: JobStatus,
    pub results: u64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub megadocs: Vec<MegadocRecord>,
}

/// A derived artifact generated from a search's results.
#[derive(Debug, Clone, PartialEq)]
pub struct MegadocRecord {
    pub uid: String,
    /// Lowercase extension without the leading dot, e.g. `txt`.
    pub filetype: String,
    /// Size in bytes; always present once the megadoc is [`JobStatus::Success`].
    pub filesize: Option<u64>,
    pub status: JobStatus,
    /// Fraction in `[0, 1]`; only informative while the megadoc is not terminal.
    pub progress: Option<f64>,
    /// Download location; always present once the megadoc is [`JobStatus::Success`].
    pub url: Option<String>,
}

impl MegadocRecord {
    /// Download location and size, available only for finished megadocs.
    pub fn download(&self) -> Option<(&str, u64)> {
        if self.status != JobStatus::Success {
            return None;
        }
        Some((self.url.as_deref()?, self.filesize?))
    }
}

/// Normalizes a megadoc filetype: lowercase, no leading dot.
pub fn normalize_filetype(raw: &str) -> String {
    raw.trim().trim_start_matches('.').to_ascii_lowercase()
}

/// Corpus and search state as returned by one successful poll.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CorpusStatus {
    pub api_version: Option<String>,
    pub checksum: Option<String>,
    pub total_documents: Option<u64>,
    /// Order is exactly as received from the server; the client never re-sorts.
    pub searches: Vec<SearchRecord>,
}
