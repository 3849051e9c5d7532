//! Path normalization and order-preserving dedup helpers shared by the
//! index and the detector.

/// Normalize a file path for consistent index keys and lookups.
///
/// - backslashes collapse to forward slashes
/// - leading `./` runs are stripped
/// - trailing slashes are stripped
///
/// Normalization is idempotent: `normalize_path(normalize_path(p))` equals
/// `normalize_path(p)` for every input, which is why *runs* of `./` and `/`
/// are stripped rather than a single occurrence.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let replaced = path.replace('\\', "/");

    let mut rest = replaced.as_str();
    while let Some(stripped) = rest.strip_prefix("./") {
        rest = stripped;
    }

    rest.trim_end_matches('/').to_string()
}

/// Append `value` to `list` unless an equal element is already present.
///
/// Preserves existing order; appending a duplicate is a no-op.
pub fn append_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|existing| existing == value) {
        list.push(value.to_string());
    }
}
