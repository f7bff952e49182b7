use std::fmt::Write;

use sha2::{Digest, Sha256};

use crate::{CorpusStatus, SearchRecord};

const FINGERPRINT_BYTES: usize = 8;

/// Single scalar summarizing everything a poll reported: corpus checksum, document
/// total, and every search's `(uid, checksum)` in received order.
pub fn data_fingerprint(status: &CorpusStatus) -> String {
    let mut hasher = Sha256::new();
    hasher.update(status.checksum.as_deref().unwrap_or("").as_bytes());
    hasher.update([0]);
    if let Some(total) = status.total_documents {
        hasher.update(total.to_le_bytes());
    }
    for search in &status.searches {
        hasher.update([0x1e]);
        hasher.update(search.uid.as_bytes());
        hasher.update([0x1f]);
        hasher.update(search.checksum.as_bytes());
    }
    short_hex(&hasher.finalize())
}

/// Checksum over a record's client-visible content, for servers that omit one.
///
/// The `checksum` field of `record` itself is ignored.
pub fn derive_record_checksum(record: &SearchRecord) -> String {
    let mut canonical = String::new();
    let _ = write!(
        canonical,
        "{}|{}|{}|{}|{:?}|{:?}",
        record.uid,
        record.search_str,
        record.status,
        record.results,
        record.created_at,
        record.updated_at
    );
    for megadoc in &record.megadocs {
        let _ = write!(
            canonical,
            "\n{}|{}|{:?}|{}|{:?}|{:?}",
            megadoc.uid,
            megadoc.filetype,
            megadoc.filesize,
            megadoc.status,
            megadoc.progress.map(f64::to_bits),
            megadoc.url
        );
    }
    short_hex(&Sha256::digest(canonical.as_bytes()))
}

fn short_hex(digest: &[u8]) -> String {
    let mut hex = String::with_capacity(FINGERPRINT_BYTES * 2);
    for byte in digest.iter().take(FINGERPRINT_BYTES) {
        let _ = write!(&mut hex, "{byte:02x}");
    }
    hex
}
