//! Free-text search helpers shared by the catalog, wardrobe, and outfit
//! listings.
//!
//! Listings match a case-insensitive substring across several columns.
//! Postgres `ILIKE` treats `%` and `_` as wildcards, so user input is
//! escaped before being wrapped in `%...%`.

/// Normalize an optional query-string value: trims whitespace and maps
/// empty strings to `None`.
///
/// HTML forms submit blank fields as `?search=`, which must behave exactly
/// like an absent parameter.
pub fn normalize_param(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Escape `ILIKE` metacharacters (`\`, `%`, `_`) so the term matches
/// literally.
pub fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Build the `%term%` pattern for a substring `ILIKE` match.
pub fn contains_pattern(term: &str) -> String {
    format!("%{}%", escape_like(term))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_params_are_absent() {
        assert_eq!(normalize_param(None), None);
        assert_eq!(normalize_param(Some("")), None);
        assert_eq!(normalize_param(Some("   ")), None);
        assert_eq!(normalize_param(Some(" linen ")), Some("linen".to_string()));
    }

    #[test]
    fn wildcards_are_escaped() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn contains_pattern_wraps_term() {
        assert_eq!(contains_pattern("denim"), "%denim%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
    }
}
