//! JSON shapes exchanged with the ORCA service and their mapping onto core types.
//!
//! Two status layouts are accepted: a nested one carrying a `corpus` object and
//! a flat one with `hash`/`total`/`searches` at the top level. Field names are
//! canonical camelCase, with the snake_case spellings accepted as aliases.

use chrono::{DateTime, NaiveDateTime, Utc};
use orca_core::{
    derive_record_checksum, normalize_filetype, CorpusStatus, JobStatus, MegadocRecord,
    SearchRecord,
};
use orca_logging::orca_warn;
use serde::{Deserialize, Serialize};

use crate::{ApiError, FailureKind};

const DEFAULT_FILETYPE: &str = "txt";

/// Body of `POST <base>/search`. The service expects the snake_case field.
#[derive(Debug, Serialize)]
pub(crate) struct CreateSearchBody<'a> {
    pub search_str: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum StatusDocument {
    Nested(NestedStatus),
    Flat(FlatStatus),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NestedStatus {
    #[serde(default, alias = "version", alias = "api_version")]
    api_version: Option<String>,
    corpus: CorpusWire,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CorpusWire {
    #[serde(default, alias = "hash")]
    checksum: Option<String>,
    #[serde(default, alias = "total", alias = "total_documents")]
    total_documents: Option<u64>,
    #[serde(default)]
    searches: Vec<SearchWire>,
}

#[derive(Debug, Deserialize)]
struct FlatStatus {
    #[serde(default, alias = "apiVersion", alias = "api_version")]
    version: Option<String>,
    #[serde(default, alias = "checksum")]
    hash: Option<String>,
    #[serde(default, alias = "totalDocuments", alias = "total_documents")]
    total: Option<u64>,
    searches: Vec<SearchWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchWire {
    #[serde(alias = "id", alias = "guid")]
    uid: String,
    #[serde(default, alias = "hash")]
    checksum: Option<String>,
    #[serde(alias = "search_str")]
    search_str: String,
    status: String,
    #[serde(default)]
    results: u64,
    #[serde(default, alias = "created_at", alias = "created")]
    created_at: Option<String>,
    #[serde(default, alias = "updated_at", alias = "updated")]
    updated_at: Option<String>,
    #[serde(default)]
    megadocs: Vec<MegadocWire>,
}

#[derive(Debug, Deserialize)]
struct MegadocWire {
    #[serde(alias = "id", alias = "guid")]
    uid: String,
    #[serde(default)]
    filetype: Option<String>,
    #[serde(default)]
    filesize: Option<u64>,
    status: String,
    #[serde(default)]
    progress: Option<f64>,
    #[serde(default)]
    url: Option<String>,
}

/// Decodes a `GET <base>` response body.
pub fn decode_status(body: &[u8]) -> Result<CorpusStatus, ApiError> {
    let document: StatusDocument = serde_json::from_slice(body)
        .map_err(|err| ApiError::new(FailureKind::Decode, format!("invalid status body: {err}")))?;

    let (api_version, checksum, total_documents, searches) = match document {
        StatusDocument::Nested(nested) => (
            nested.api_version,
            nested.corpus.checksum,
            nested.corpus.total_documents,
            nested.corpus.searches,
        ),
        StatusDocument::Flat(flat) => (flat.version, flat.hash, flat.total, flat.searches),
    };

    let searches = searches
        .into_iter()
        .map(SearchWire::into_record)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorpusStatus {
        api_version,
        checksum,
        total_documents,
        searches,
    })
}

impl SearchWire {
    fn into_record(self) -> Result<SearchRecord, ApiError> {
        let status = parse_status(&self.status, &self.uid)?;
        let megadocs = self
            .megadocs
            .into_iter()
            .map(MegadocWire::into_record)
            .collect::<Result<Vec<_>, _>>()?;
        let mut record = SearchRecord {
            created_at: parse_timestamp(self.created_at.as_deref()),
            updated_at: parse_timestamp(self.updated_at.as_deref()),
            uid: self.uid,
            checksum: String::new(),
            search_str: self.search_str,
            status,
            results: self.results,
            megadocs,
        };
        record.checksum = match self.checksum {
            Some(checksum) if !checksum.is_empty() => checksum,
            _ => derive_record_checksum(&record),
        };
        Ok(record)
    }
}

impl MegadocWire {
    fn into_record(self) -> Result<MegadocRecord, ApiError> {
        let status = parse_status(&self.status, &self.uid)?;
        if status == JobStatus::Success && (self.url.is_none() || self.filesize.is_none()) {
            return Err(ApiError::new(
                FailureKind::Decode,
                format!("finished megadoc {} is missing url or filesize", self.uid),
            ));
        }
        let progress = match status {
            JobStatus::Sending | JobStatus::Success | JobStatus::Failure => None,
            _ => self.progress.map(|fraction| fraction.clamp(0.0, 1.0)),
        };
        Ok(MegadocRecord {
            filetype: normalize_filetype(self.filetype.as_deref().unwrap_or(DEFAULT_FILETYPE)),
            uid: self.uid,
            filesize: self.filesize,
            status,
            progress,
            url: self.url,
        })
    }
}

fn parse_status(raw: &str, uid: &str) -> Result<JobStatus, ApiError> {
    raw.parse()
        .map_err(|err| ApiError::new(FailureKind::Decode, format!("record {uid}: {err}")))
}

/// RFC 3339, or a naive ISO timestamp taken as UTC. Unparseable values are dropped.
fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Some(parsed.with_timezone(&Utc));
    }
    match NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Some(naive.and_utc()),
        Err(err) => {
            orca_warn!("Ignoring unparseable timestamp {:?}: {}", raw, err);
            None
        }
    }
}
