//! Label cleaning and name disambiguation.

use std::collections::BTreeMap;

/// Trimmed text of a label cell.
///
/// Formula text (leading `=`) counts as no label unless `allow_formulas` is
/// set, so a computed header like `=+time_macro!R[1]C[-1]` never names a
/// table or row.
pub fn clean_text(text: Option<&str>, allow_formulas: bool) -> String {
    let trimmed = text.unwrap_or_default().trim();
    if !allow_formulas && trimmed.starts_with('=') {
        return String::new();
    }
    trimmed.to_string()
}

/// Return `name`, or the first free `name (2)`, `name (3)`, ... in `existing`.
pub fn disambiguate<V>(name: &str, existing: &BTreeMap<String, V>) -> String {
    if !existing.contains_key(name) {
        return name.to_string();
    }
    (2usize..)
        .map(|i| format!("{} ({})", name, i))
        .find(|candidate| !existing.contains_key(candidate))
        .unwrap_or_else(|| name.to_string())
}
