//! Catalog vocabulary: category tags and display helpers.

// ---------------------------------------------------------------------------
// Category tags
// ---------------------------------------------------------------------------

/// Category tags a catalog or wardrobe item can carry.
pub const VALID_TAGS: &[&str] = &[
    "top",
    "bottom",
    "dress",
    "outerwear",
    "shoes",
    "accessory",
    "other",
];

/// Tag assigned when none is supplied.
pub const DEFAULT_TAG: &str = "other";

/// Tag given to items imported from the marketplace search.
pub const MARKETPLACE_TAG: &str = "accessory";

/// Check whether a category tag is recognised.
pub fn is_valid_tag(tag: &str) -> bool {
    VALID_TAGS.contains(&tag)
}

/// Resolve an optional, possibly blank tag to a stored value.
///
/// Returns `Err` with a message listing the valid tags when the value is
/// not recognised.
pub fn resolve_tag(tag: Option<&str>) -> Result<&str, String> {
    match tag.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(DEFAULT_TAG),
        Some(t) if is_valid_tag(t) => Ok(t),
        Some(t) => Err(format!(
            "Invalid category '{t}'. Must be one of: {}",
            VALID_TAGS.join(", ")
        )),
    }
}

// ---------------------------------------------------------------------------
// Short description
// ---------------------------------------------------------------------------

/// Descriptions longer than this are truncated for listings.
pub const SHORT_DESCRIPTION_MAX: usize = 75;

/// Characters kept before the ellipsis when truncating.
const SHORT_DESCRIPTION_KEEP: usize = 72;

/// Listing-friendly description: kept whole up to 75 characters, otherwise
/// the first 72 characters followed by `...`.
pub fn short_description(description: &str) -> String {
    if description.chars().count() <= SHORT_DESCRIPTION_MAX {
        return description.to_string();
    }
    let mut out: String = description.chars().take(SHORT_DESCRIPTION_KEEP).collect();
    out.push_str("...");
    out
}
