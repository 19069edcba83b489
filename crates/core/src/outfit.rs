//! Outfit vocabulary and the typed filter for the outfit listing.
//!
//! [`OutfitFilter::from_params`] turns raw query-string values into a
//! validated filter. The `db` crate compiles it into SQL; nothing here
//! touches the database.

use crate::search::normalize_param;

// ---------------------------------------------------------------------------
// Vocabulary
// ---------------------------------------------------------------------------

/// Occasion values an outfit may carry (blank is also allowed).
pub const VALID_OCCASIONS: &[&str] = &[
    "casual",
    "business",
    "formal",
    "athletic",
    "night_out",
    "date",
    "other",
];

/// Season values an outfit may carry (blank is also allowed).
pub const VALID_SEASONS: &[&str] = &["spring", "summer", "fall", "winter", "all"];

/// Outfits created within this many days belong to the `recent` collection.
pub const RECENT_WINDOW_DAYS: i64 = 30;

/// Outfits with fewer linked items than this belong to `incomplete`.
pub const INCOMPLETE_THRESHOLD: i64 = 3;

/// Check an occasion value; blank is accepted.
pub fn is_valid_occasion(occasion: &str) -> bool {
    occasion.is_empty() || VALID_OCCASIONS.contains(&occasion)
}

/// Check a season value; blank is accepted.
pub fn is_valid_season(season: &str) -> bool {
    season.is_empty() || VALID_SEASONS.contains(&season)
}

/// Name given to a duplicated outfit.
///
/// The first copy is `"<name> (Copy)"`; later attempts (`attempt >= 2`)
/// yield `"<name> (Copy N)"` so a taken name never blocks duplication.
pub fn copy_name(original: &str, attempt: u32) -> String {
    if attempt <= 1 {
        format!("{original} (Copy)")
    } else {
        format!("{original} (Copy {attempt})")
    }
}

// ---------------------------------------------------------------------------
// Smart collections
// ---------------------------------------------------------------------------

/// Predefined filter presets over a user's outfits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SmartCollection {
    Favorites,
    Summer,
    Winter,
    Casual,
    Work,
    Date,
    Formal,
    Recent,
    Incomplete,
}

/// What a smart collection selects, independent of any query language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionCriterion {
    Favorite,
    Season(&'static str),
    Occasion(&'static str),
    /// Created on or after `now - days`.
    CreatedWithinDays(i64),
    /// Fewer linked items than the given count.
    ItemCountBelow(i64),
}

impl SmartCollection {
    pub const ALL: [SmartCollection; 9] = [
        SmartCollection::Favorites,
        SmartCollection::Summer,
        SmartCollection::Winter,
        SmartCollection::Casual,
        SmartCollection::Work,
        SmartCollection::Date,
        SmartCollection::Formal,
        SmartCollection::Recent,
        SmartCollection::Incomplete,
    ];

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.as_str() == value)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Favorites => "favorites",
            Self::Summer => "summer",
            Self::Winter => "winter",
            Self::Casual => "casual",
            Self::Work => "work",
            Self::Date => "date",
            Self::Formal => "formal",
            Self::Recent => "recent",
            Self::Incomplete => "incomplete",
        }
    }

    pub fn criterion(self) -> CollectionCriterion {
        match self {
            Self::Favorites => CollectionCriterion::Favorite,
            Self::Summer => CollectionCriterion::Season("summer"),
            Self::Winter => CollectionCriterion::Season("winter"),
            Self::Casual => CollectionCriterion::Occasion("casual"),
            Self::Work => CollectionCriterion::Occasion("business"),
            Self::Date => CollectionCriterion::Occasion("date"),
            Self::Formal => CollectionCriterion::Occasion("formal"),
            Self::Recent => CollectionCriterion::CreatedWithinDays(RECENT_WINDOW_DAYS),
            Self::Incomplete => CollectionCriterion::ItemCountBelow(INCOMPLETE_THRESHOLD),
        }
    }
}

// ---------------------------------------------------------------------------
// Sorting
// ---------------------------------------------------------------------------

/// Allow-listed sort keys for the outfit listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutfitSort {
    NameAsc,
    NameDesc,
    CreatedAsc,
    #[default]
    CreatedDesc,
    UpdatedAsc,
    UpdatedDesc,
    ItemCountAsc,
    ItemCountDesc,
}

impl OutfitSort {
    /// Parse a sort key. Unknown or absent values fall back to
    /// `-created_at`.
    pub fn parse(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("name") => Self::NameAsc,
            Some("-name") => Self::NameDesc,
            Some("created_at") => Self::CreatedAsc,
            Some("-created_at") => Self::CreatedDesc,
            Some("updated_at") => Self::UpdatedAsc,
            Some("-updated_at") => Self::UpdatedDesc,
            Some("item_count") => Self::ItemCountAsc,
            Some("-item_count") => Self::ItemCountDesc,
            _ => Self::default(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::NameAsc => "name",
            Self::NameDesc => "-name",
            Self::CreatedAsc => "created_at",
            Self::CreatedDesc => "-created_at",
            Self::UpdatedAsc => "updated_at",
            Self::UpdatedDesc => "-updated_at",
            Self::ItemCountAsc => "item_count",
            Self::ItemCountDesc => "-item_count",
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Validated outfit-listing filter.
///
/// When `collection` is set, `occasion`, `season`, and `favorites_only` are
/// cleared: the collection takes precedence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutfitFilter {
    pub collection: Option<SmartCollection>,
    pub occasion: Option<String>,
    pub season: Option<String>,
    pub favorites_only: bool,
    pub search: Option<String>,
    pub sort: OutfitSort,
}

impl OutfitFilter {
    /// Build a filter from raw query-string values.
    ///
    /// Unrecognised collection names are ignored, as are blank values.
    pub fn from_params(
        collection: Option<&str>,
        occasion: Option<&str>,
        season: Option<&str>,
        favorites: Option<&str>,
        search: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        let collection = normalize_param(collection)
            .as_deref()
            .and_then(SmartCollection::parse);
        let search = normalize_param(search);
        let sort = OutfitSort::parse(sort);

        if collection.is_some() {
            return Self {
                collection,
                search,
                sort,
                ..Self::default()
            };
        }

        Self {
            collection: None,
            occasion: normalize_param(occasion),
            season: normalize_param(season),
            favorites_only: is_truthy(favorites),
            search,
            sort,
        }
    }
}

/// Query-string truthiness for checkbox-style flags.
pub fn is_truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(|v| v.trim().to_ascii_lowercase()).as_deref(),
        Some("true" | "1" | "on" | "yes")
    )
}
