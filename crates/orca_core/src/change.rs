use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::{Field, SearchRecord, StateSnapshot};

/// Which snapshot fields changed in the last update.
///
/// Scalars compare by value. `searches` compares by identity: any update that
/// supplied a new sequence counts as changed even if its content is identical.
/// Per-record staleness is decided by [`RecordDiff`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChangeSet {
    bits: u16,
}

impl ChangeSet {
    /// A missing `previous` reports every field as changed.
    pub fn between(previous: Option<&StateSnapshot>, current: &StateSnapshot) -> Self {
        let Some(previous) = previous else {
            return Self::all();
        };
        let mut changes = Self::default();
        for field in Field::ALL {
            if field_changed(field, previous, current) {
                changes.insert(field);
            }
        }
        changes
    }

    pub fn all() -> Self {
        let mut changes = Self::default();
        for field in Field::ALL {
            changes.insert(field);
        }
        changes
    }

    pub fn contains(&self, field: Field) -> bool {
        self.bits & mask(field) != 0
    }

    pub fn insert(&mut self, field: Field) {
        self.bits |= mask(field);
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Field> + '_ {
        Field::ALL
            .into_iter()
            .filter(move |field| self.contains(*field))
    }
}

fn mask(field: Field) -> u16 {
    1 << field as u16
}

fn field_changed(field: Field, previous: &StateSnapshot, current: &StateSnapshot) -> bool {
    match field {
        Field::IsConnected => previous.is_connected != current.is_connected,
        Field::IsPollingEnabled => previous.is_polling_enabled != current.is_polling_enabled,
        Field::LastPolledAt => previous.last_polled_at != current.last_polled_at,
        Field::ApiVersion => previous.api_version != current.api_version,
        Field::CorpusChecksum => previous.corpus_checksum != current.corpus_checksum,
        Field::CorpusTotal => previous.corpus_total != current.corpus_total,
        Field::DataChecksum => previous.data_checksum != current.data_checksum,
        Field::Searches => !Arc::ptr_eq(&previous.searches, &current.searches),
        Field::Error => previous.error != current.error,
    }
}

/// Per-record changes between two search lists, keyed by `uid` and compared by
/// `checksum`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordDiff {
    /// Uids present now but not before, in current order.
    pub added: Vec<String>,
    /// Uids present in both whose checksum differs, in current order.
    pub updated: Vec<String>,
    /// Uids present before but not now, in previous order.
    pub removed: Vec<String>,
}

impl RecordDiff {
    pub fn between(previous: &[SearchRecord], current: &[SearchRecord]) -> Self {
        let known: HashMap<&str, &str> = previous
            .iter()
            .map(|record| (record.uid.as_str(), record.checksum.as_str()))
            .collect();
        let mut diff = Self::default();
        for record in current {
            match known.get(record.uid.as_str()) {
                None => diff.added.push(record.uid.clone()),
                Some(checksum) if *checksum != record.checksum => {
                    diff.updated.push(record.uid.clone())
                }
                Some(_) => {}
            }
        }
        let still_present: HashSet<&str> =
            current.iter().map(|record| record.uid.as_str()).collect();
        diff.removed = previous
            .iter()
            .filter(|record| !still_present.contains(record.uid.as_str()))
            .map(|record| record.uid.clone())
            .collect();
        diff
    }

    /// Snapshot form; an absent previous snapshot makes every record "added".
    pub fn for_snapshots(previous: Option<&StateSnapshot>, current: &StateSnapshot) -> Self {
        match previous {
            Some(previous) if Arc::ptr_eq(&previous.searches, &current.searches) => {
                Self::default()
            }
            Some(previous) => Self::between(&previous.searches, &current.searches),
            None => Self::between(&[], &current.searches),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.updated.is_empty() && self.removed.is_empty()
    }

    /// Whether the row for `uid` needs to be redrawn.
    pub fn touches(&self, uid: &str) -> bool {
        self.added.iter().chain(&self.updated).any(|known| known == uid)
    }
}
