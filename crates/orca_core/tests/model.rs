use std::error::Error;

use orca_core::{normalize_filetype, JobStatus, UnknownStatus};
use pretty_assertions::assert_eq;

#[test]
fn status_parsing_ignores_case_and_padding() {
    assert_eq!(" started ".parse::<JobStatus>(), Ok(JobStatus::Started));
    assert_eq!("Success".parse::<JobStatus>(), Ok(JobStatus::Success));
    assert!(JobStatus::Failure.is_terminal());
    assert!(!JobStatus::Sending.is_terminal());
}

#[test]
fn unknown_status_is_a_described_error() {
    let err = "EXPLODED".parse::<JobStatus>().unwrap_err();

    assert_eq!(err, UnknownStatus("EXPLODED".to_string()));
    assert_eq!(err.to_string(), "unknown job status 'EXPLODED'");
    let boxed: Box<dyn Error + Send + Sync> = Box::new(err);
    assert!(boxed.source().is_none());
}

#[test]
fn filetypes_are_normalized() {
    assert_eq!(normalize_filetype(" .DOCX"), "docx");
    assert_eq!(normalize_filetype("txt"), "txt");
}
