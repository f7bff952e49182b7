use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::fingerprint::data_fingerprint;
use crate::{CorpusStatus, SearchRecord};

/// One fully merged view of client-visible state.
///
/// Snapshots are immutable once stored; cloning is cheap because `searches` is
/// shared behind an [`Arc`].
#[derive(Debug, Clone, PartialEq)]
pub struct StateSnapshot {
    pub is_connected: bool,
    pub is_polling_enabled: bool,
    pub last_polled_at: Option<DateTime<Utc>>,
    pub api_version: Option<String>,
    pub corpus_checksum: Option<String>,
    pub corpus_total: Option<u64>,
    /// Fingerprint of the last successful poll, see [`crate::data_fingerprint`].
    pub data_checksum: Option<String>,
    pub searches: Arc<[SearchRecord]>,
    pub error: Option<String>,
}

impl Default for StateSnapshot {
    fn default() -> Self {
        Self {
            is_connected: false,
            is_polling_enabled: true,
            last_polled_at: None,
            api_version: None,
            corpus_checksum: None,
            corpus_total: None,
            data_checksum: None,
            searches: Arc::from(Vec::new()),
            error: None,
        }
    }
}

impl StateSnapshot {
    pub fn search(&self, uid: &str) -> Option<&SearchRecord> {
        self.searches.iter().find(|search| search.uid == uid)
    }
}

/// Logical snapshot fields, as reported by change detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    IsConnected,
    IsPollingEnabled,
    LastPolledAt,
    ApiVersion,
    CorpusChecksum,
    CorpusTotal,
    DataChecksum,
    Searches,
    Error,
}

impl Field {
    pub const ALL: [Field; 9] = [
        Field::IsConnected,
        Field::IsPollingEnabled,
        Field::LastPolledAt,
        Field::ApiVersion,
        Field::CorpusChecksum,
        Field::CorpusTotal,
        Field::DataChecksum,
        Field::Searches,
        Field::Error,
    ];
}

/// Partial update for [`crate::StateStore::update`].
///
/// Every field set here replaces the corresponding snapshot field; unset fields
/// carry over unchanged. Nullable fields use a nested `Option` so they can be
/// explicitly cleared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    pub is_connected: Option<bool>,
    pub is_polling_enabled: Option<bool>,
    pub last_polled_at: Option<Option<DateTime<Utc>>>,
    pub api_version: Option<Option<String>>,
    pub corpus_checksum: Option<Option<String>>,
    pub corpus_total: Option<Option<u64>>,
    pub data_checksum: Option<Option<String>>,
    pub searches: Option<Arc<[SearchRecord]>>,
    pub error: Option<Option<String>>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields refreshed by a successful poll. Connection and error flags are
    /// left to the caller.
    pub fn from_status(status: CorpusStatus, polled_at: DateTime<Utc>) -> Self {
        let fingerprint = data_fingerprint(&status);
        Self {
            last_polled_at: Some(Some(polled_at)),
            api_version: Some(status.api_version),
            corpus_checksum: Some(status.checksum),
            corpus_total: Some(status.total_documents),
            data_checksum: Some(Some(fingerprint)),
            searches: Some(Arc::from(status.searches)),
            ..Self::default()
        }
    }

    pub fn connected(mut self, connected: bool) -> Self {
        self.is_connected = Some(connected);
        self
    }

    pub fn polling_enabled(mut self, enabled: bool) -> Self {
        self.is_polling_enabled = Some(enabled);
        self
    }

    pub fn error(mut self, error: Option<String>) -> Self {
        self.error = Some(error);
        self
    }

    pub fn searches(mut self, searches: Vec<SearchRecord>) -> Self {
        self.searches = Some(Arc::from(searches));
        self
    }

    pub fn corpus_total(mut self, total: Option<u64>) -> Self {
        self.corpus_total = Some(total);
        self
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Shallow merge onto `base`.
    pub(crate) fn apply(self, base: &StateSnapshot) -> StateSnapshot {
        let mut next = base.clone();
        if let Some(value) = self.is_connected {
            next.is_connected = value;
        }
        if let Some(value) = self.is_polling_enabled {
            next.is_polling_enabled = value;
        }
        if let Some(value) = self.last_polled_at {
            next.last_polled_at = value;
        }
        if let Some(value) = self.api_version {
            next.api_version = value;
        }
        if let Some(value) = self.corpus_checksum {
            next.corpus_checksum = value;
        }
        if let Some(value) = self.corpus_total {
            next.corpus_total = value;
        }
        if let Some(value) = self.data_checksum {
            next.data_checksum = value;
        }
        if let Some(value) = self.searches {
            next.searches = value;
        }
        if let Some(value) = self.error {
            next.error = value;
        }
        next
    }
}
