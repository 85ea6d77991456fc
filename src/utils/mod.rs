//! Request parsing helpers shared by the catalog modules.

use serde::{Deserialize, Deserializer};
use uuid::Uuid;

use crate::store::OrderTerm;

/// Deserialize a field that distinguishes "absent" from `null`.
///
/// Use with `#[serde(default)]`: an absent key stays `None`, `null` becomes
/// `Some(None)`.
pub fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Parse a path id. Only the canonical hyphenated form names a record.
pub fn parse_id(raw: &str) -> Option<Uuid> {
    if raw.len() != 36 {
        return None;
    }
    Uuid::try_parse(raw).ok()
}

/// Trim an optional text field.
pub fn clean_text(value: Option<String>) -> Option<String> {
    value.map(|text| text.trim().to_string())
}

/// Turn an `ordering` parameter into sort terms.
///
/// `allowed` maps public field names to columns. Unknown fields are skipped;
/// when nothing usable remains, `default` is returned.
pub fn parse_ordering(
    raw: Option<&str>,
    allowed: &[(&str, &'static str)],
    default: &[OrderTerm],
) -> Vec<OrderTerm> {
    let terms: Vec<OrderTerm> = raw
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter_map(|field| {
            let (name, descending) = match field.strip_prefix('-') {
                Some(name) => (name, true),
                None => (field, false),
            };
            allowed
                .iter()
                .find(|(public, _)| *public == name)
                .map(|&(_, column)| OrderTerm { column, descending })
        })
        .collect();

    if terms.is_empty() {
        default.to_vec()
    } else {
        terms
    }
}
