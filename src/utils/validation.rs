// Validation utilities
use crate::error::{Error, Result};
use std::collections::BTreeSet;

/// Reject names with no visible characters
///
/// Names are otherwise stored exactly as supplied, so "Salt" and "salt" are
/// different catalog entries.
pub fn validate_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::Validation(format!("{kind} name cannot be empty")));
    }
    Ok(())
}

/// Treat an empty image reference as no image; anything else is kept verbatim
pub fn normalize_image(image: Option<&str>) -> Option<String> {
    image.filter(|path| !path.is_empty()).map(str::to_string)
}

/// Largest number of bound parameters SQLite accepts in one statement
pub const MAX_SELECTION: usize = 32766;

/// Collapse a selection to its distinct ids in ascending order
pub fn distinct_ids(ids: &[i64]) -> Vec<i64> {
    ids.iter().copied().collect::<BTreeSet<_>>().into_iter().collect()
}

/// Reject id lists too long to bind into a single `IN (...)` query
pub fn check_selection_size(len: usize) -> Result<()> {
    if len > MAX_SELECTION {
        return Err(Error::Validation(format!(
            "Too many ingredients selected ({len}, at most {MAX_SELECTION})"
        )));
    }
    Ok(())
}

/// Distinct ids of a non-empty ingredient selection small enough to query
pub fn selection(ids: &[i64]) -> Result<Vec<i64>> {
    let ids = distinct_ids(ids);
    if ids.is_empty() {
        return Err(Error::EmptySelection);
    }
    check_selection_size(ids.len())?;
    Ok(ids)
}

/// Parse a comma-separated id list such as `1,2, 5`
pub fn parse_id_list(raw: &str) -> Result<Vec<i64>> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<i64>()
                .map_err(|_| Error::Validation(format!("Invalid ingredient id: {part}")))
        })
        .collect()
}
