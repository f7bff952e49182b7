use orca_client::{decode_status, FailureKind};
use orca_core::{derive_record_checksum, JobStatus};
use pretty_assertions::assert_eq;
use serde_json::json;

fn decode(value: serde_json::Value) -> Result<orca_core::CorpusStatus, orca_client::ApiError> {
    decode_status(value.to_string().as_bytes())
}

#[test]
fn flat_document_with_snake_case_records() {
    let status = decode(json!({
        "version": "0.9.2",
        "hash": "deadbeef",
        "total": 1234,
        "created": "2024-05-01T10:00:00+00:00",
        "searches": [
            {
                "id": "newer",
                "search_str": "orcas",
                "status": "started",
                "results": 0,
                "created_at": "2024-05-01T09:59:00.123456",
                "megadocs": []
            },
            {
                "uid": "older",
                "hash": "c-older",
                "search_str": "whales",
                "status": "SUCCESS",
                "results": 7
            }
        ]
    }))
    .expect("decodes");

    assert_eq!(status.api_version.as_deref(), Some("0.9.2"));
    assert_eq!(status.checksum.as_deref(), Some("deadbeef"));
    assert_eq!(status.total_documents, Some(1234));
    // Received order is kept as-is.
    let uids: Vec<_> = status.searches.iter().map(|s| s.uid.as_str()).collect();
    assert_eq!(uids, vec!["newer", "older"]);
    assert_eq!(status.searches[0].status, JobStatus::Started);
    assert!(status.searches[0].created_at.is_some());
    assert_eq!(status.searches[1].checksum, "c-older");
}

#[test]
fn missing_record_checksum_is_derived_from_content() {
    let document = |progress: f64| {
        json!({
            "searches": [{
                "uid": "s1",
                "searchStr": "orcas",
                "status": "STARTED",
                "megadocs": [{"uid": "m1", "filetype": "docx", "status": "STARTED", "progress": progress}]
            }]
        })
    };

    let first = decode(document(0.1)).expect("decodes");
    let again = decode(document(0.1)).expect("decodes");
    let later = decode(document(0.6)).expect("decodes");

    let record = &first.searches[0];
    assert!(!record.checksum.is_empty());
    assert_eq!(record.checksum, derive_record_checksum(record));
    assert_eq!(record.checksum, again.searches[0].checksum);
    assert_ne!(record.checksum, later.searches[0].checksum);
}

#[test]
fn megadoc_progress_is_clamped_and_dropped_when_done() {
    let status = decode(json!({
        "searches": [{
            "uid": "s1",
            "checksum": "c",
            "searchStr": "orcas",
            "status": "SUCCESS",
            "megadocs": [
                {"uid": "a", "status": "STARTED", "progress": 1.7},
                {"uid": "b", "filetype": ".DOCX", "status": "SENDING", "progress": 100.0},
                {"uid": "c", "filetype": "txt", "status": "SUCCESS", "filesize": 10, "url": "https://cdn/x.txt", "progress": 100.0}
            ]
        }]
    }))
    .expect("decodes");

    let megadocs = &status.searches[0].megadocs;
    assert_eq!(megadocs[0].progress, Some(1.0));
    assert_eq!(megadocs[0].filetype, "txt");
    assert_eq!(megadocs[1].progress, None);
    assert_eq!(megadocs[1].filetype, "docx");
    assert_eq!(megadocs[2].progress, None);
    assert_eq!(megadocs[2].download(), Some(("https://cdn/x.txt", 10)));
}

#[test]
fn finished_megadoc_without_url_is_rejected() {
    let err = decode(json!({
        "searches": [{
            "uid": "s1",
            "searchStr": "orcas",
            "status": "SUCCESS",
            "megadocs": [{"uid": "m1", "status": "SUCCESS", "filesize": 10}]
        }]
    }))
    .unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
}

#[test]
fn unknown_status_is_rejected() {
    let err = decode(json!({
        "searches": [{"uid": "s1", "searchStr": "orcas", "status": "EXPLODED"}]
    }))
    .unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
    assert!(err.message.contains("EXPLODED"));
}

#[test]
fn document_without_searches_is_rejected() {
    let err = decode(json!({"hello": "world"})).unwrap_err();

    assert_eq!(err.kind, FailureKind::Decode);
}
