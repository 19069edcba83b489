//! Typed filter for the wardrobe listing.

use crate::search::normalize_param;

/// Category value meaning "no category filter".
pub const ALL_CATEGORIES: &str = "all";

/// Allow-listed sort keys for the wardrobe listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WardrobeSort {
    #[default]
    CreatedDesc,
    CreatedAsc,
    TitleAsc,
    TitleDesc,
    BrandAsc,
    BrandDesc,
}

impl WardrobeSort {
    /// Parse a sort key. Unknown or absent values fall back to
    /// `-created_at`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("-created_at") => Self::CreatedDesc,
            Some("created_at") => Self::CreatedAsc,
            Some("title") => Self::TitleAsc,
            Some("-title") => Self::TitleDesc,
            Some("brand") => Self::BrandAsc,
            Some("-brand") => Self::BrandDesc,
            _ => Self::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreatedDesc => "-created_at",
            Self::CreatedAsc => "created_at",
            Self::TitleAsc => "title",
            Self::TitleDesc => "-title",
            Self::BrandAsc => "brand",
            Self::BrandDesc => "-brand",
        }
    }
}

/// Validated wardrobe-listing filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WardrobeFilter {
    /// Exact category match; `None` when absent, blank, or `all`.
    pub category: Option<String>,
    pub search: Option<String>,
    pub sort: WardrobeSort,
}

impl WardrobeFilter {
    pub fn from_params(category: Option<&str>, search: Option<&str>, sort: Option<&str>) -> Self {
        Self {
            category: normalize_param(category).filter(|c| c != ALL_CATEGORIES),
            search: normalize_param(search),
            sort: WardrobeSort::parse(sort),
        }
    }

    /// Category value to echo back to the client (`all` when unfiltered).
    pub fn category_label(&self) -> &str {
        self.category.as_deref().unwrap_or(ALL_CATEGORIES)
    }
}
