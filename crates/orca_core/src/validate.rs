use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("search string is empty")]
    EmptySearch,
    #[error("search uid is empty")]
    EmptyUid,
}

/// Trims `raw` and rejects it if nothing is left.
pub fn validate_search_str(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptySearch);
    }
    Ok(trimmed)
}

pub fn validate_uid(raw: &str) -> Result<&str, ValidationError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyUid);
    }
    Ok(trimmed)
}
