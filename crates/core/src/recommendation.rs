//! Styling-recommendation prompt construction and response parsing.
//!
//! The advisor is asked to end its answer with a machine-readable line:
//!
//! ```text
//! RECOMMENDED_ITEMS: [12, 4, 9]
//! ```
//!
//! [`parse_response`] pulls the ids out of that line and returns the text
//! with the line removed, ready for display.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::types::DbId;

/// Marker the advisor is told to end its answer with.
pub const RECOMMENDED_ITEMS_MARKER: &str = "RECOMMENDED_ITEMS";

/// Recommended-item count requested from the advisor.
pub const MIN_RECOMMENDED: usize = 3;
pub const MAX_RECOMMENDED: usize = 6;

// ---------------------------------------------------------------------------
// Prompt construction
// ---------------------------------------------------------------------------

/// Profile fields that shape a recommendation.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleProfile<'a> {
    pub bio: &'a str,
    pub style_preferences: &'a str,
    pub favorite_colors: &'a str,
}

/// A catalog item as presented to the advisor.
#[derive(Debug, Clone, Copy)]
pub struct PromptItem<'a> {
    pub id: DbId,
    pub title: &'a str,
    pub description: &'a str,
    pub tag: &'a str,
}

/// One line per item: `ID: 3 | Title: .. | Description: .. | Category: ..`.
pub fn format_items(items: &[PromptItem<'_>]) -> String {
    items
        .iter()
        .map(|item| {
            format!(
                "ID: {} | Title: {} | Description: {} | Category: {}",
                item.id, item.title, item.description, item.tag
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the full advisor prompt.
///
/// A blank `request` produces a profile-only prompt.
pub fn build_prompt(profile: &StyleProfile<'_>, items: &[PromptItem<'_>], request: &str) -> String {
    let mut prompt = format!(
        "You are a fashion recommendation engine talking directly to the end user. \
Do not use the user's name or username, only use \"you\" instead.\n\n\
User Bio:\n{}\n\
Style Preferences:\n{}\n\
Favorite Colors:\n{}\n\n\
Available Items (with IDs):\n{}\n",
        profile.bio,
        profile.style_preferences,
        profile.favorite_colors,
        format_items(items),
    );

    let request = request.trim();
    let target = if request.is_empty() {
        prompt.push_str(
            "\nGenerate personalized clothing recommendations based on the user's \
profile and preferences.\n",
        );
        "the user's profile"
    } else {
        prompt.push_str(&format!(
            "\nUser Request:\n{request}\n\n\
Generate personalized clothing recommendations based on the user's profile, \
preferences, and their specific request above.\n"
        ));
        "the user's request"
    };

    prompt.push_str(&format!(
        "\nIMPORTANT: At the end of your response, list the IDs of recommended items \
in the following format:\n{RECOMMENDED_ITEMS_MARKER}: [id1, id2, id3, ...]\n\n\
Include {MIN_RECOMMENDED}-{MAX_RECOMMENDED} item IDs that best match {target}.\n"
    ));
    prompt
}

// ---------------------------------------------------------------------------
// Response parsing
// ---------------------------------------------------------------------------

/// Advisor output split into display text and recommended ids.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRecommendation {
    /// Text with the marker line removed.
    pub display_text: String,
    /// Ids in the order the advisor listed them, first occurrence only.
    pub item_ids: Vec<DbId>,
}

static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[ \t]*RECOMMENDED_ITEMS:\s*\[([^\]]*)\][ \t]*").expect("valid regex")
});

/// Split advisor output into display text and ordered item ids.
///
/// Tokens inside the brackets that are not integers are dropped. Without a
/// marker the text is returned verbatim and the id list is empty.
pub fn parse_response(response: &str) -> ParsedRecommendation {
    let Some(caps) = MARKER_RE.captures(response) else {
        return ParsedRecommendation {
            display_text: response.to_string(),
            item_ids: Vec::new(),
        };
    };

    let mut item_ids: Vec<DbId> = Vec::new();
    for token in caps[1].split(',') {
        if let Ok(id) = token.trim().parse::<DbId>() {
            if !item_ids.contains(&id) {
                item_ids.push(id);
            }
        }
    }

    // `get(0)` is always present on a successful capture.
    let span = caps.get(0).map(|m| m.start()..m.end()).unwrap_or(0..0);
    let before = response[..span.start].trim_end();
    let after = response[span.end..].trim_start();
    let display_text = match (before.is_empty(), after.is_empty()) {
        (false, false) => format!("{before}\n\n{after}"),
        (false, true) => before.to_string(),
        (true, _) => after.to_string(),
    };

    ParsedRecommendation {
        display_text,
        item_ids,
    }
}

/// Order looked-up rows by the advisor's id list, skipping ids that were
/// not found.
pub fn order_by_ids<T>(ids: &[DbId], rows: Vec<T>, id_of: impl Fn(&T) -> DbId) -> Vec<T> {
    let mut by_id: HashMap<DbId, T> = rows.into_iter().map(|r| (id_of(&r), r)).collect();
    ids.iter().filter_map(|id| by_id.remove(id)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_line_is_parsed_and_stripped() {
        let parsed = parse_response("Great picks!\nRECOMMENDED_ITEMS: [3, 1]");
        assert_eq!(parsed.item_ids, vec![3, 1]);
        assert_eq!(parsed.display_text, "Great picks!");
    }

    #[test]
    fn missing_marker_keeps_text_verbatim() {
        let text = "  Try a navy blazer.\n\n";
        let parsed = parse_response(text);
        assert!(parsed.item_ids.is_empty());
        assert_eq!(parsed.display_text, text);
    }

    #[test]
    fn non_numeric_tokens_are_dropped() {
        let parsed = parse_response("Ok\nRECOMMENDED_ITEMS: [7, abc,  2 ,, x9, 7]");
        assert_eq!(parsed.item_ids, vec![7, 2]);
    }

    #[test]
    fn surrounding_blank_lines_are_removed() {
        let parsed =
            parse_response("Intro\n\n\nRECOMMENDED_ITEMS:   [ 5 ]\n\n\nEnjoy your look.");
        assert_eq!(parsed.item_ids, vec![5]);
        assert_eq!(parsed.display_text, "Intro\n\nEnjoy your look.");
    }

    #[test]
    fn empty_brackets_yield_no_ids() {
        let parsed = parse_response("Nothing fits.\nRECOMMENDED_ITEMS: []");
        assert!(parsed.item_ids.is_empty());
        assert_eq!(parsed.display_text, "Nothing fits.");
    }

    #[test]
    fn order_follows_advisor_and_skips_missing() {
        let rows = vec![(1, "a"), (2, "b"), (3, "c")];
        let ordered = order_by_ids(&[3, 99, 1], rows, |r| r.0);
        assert_eq!(ordered, vec![(3, "c"), (1, "a")]);
    }

    #[test]
    fn prompt_lists_items_and_instructions() {
        let profile = StyleProfile {
            bio: "Loves hiking",
            style_preferences: "casual",
            favorite_colors: "green",
        };
        let items = [PromptItem {
            id: 4,
            title: "Fleece",
            description: "Warm layer",
            tag: "outerwear",
        }];
        let prompt = build_prompt(&profile, &items, "something for the trail");

        assert!(prompt.contains("ID: 4 | Title: Fleece | Description: Warm layer | Category: outerwear"));
        assert!(prompt.contains("User Request:\nsomething for the trail"));
        assert!(prompt.contains("RECOMMENDED_ITEMS: [id1, id2, id3, ...]"));
        assert!(prompt.contains("Include 3-6 item IDs"));
        assert!(prompt.contains("only use \"you\" instead"));
        assert!(prompt.contains("Loves hiking"));
    }

    #[test]
    fn blank_request_builds_profile_prompt() {
        let prompt = build_prompt(&StyleProfile::default(), &[], "   ");
        assert!(!prompt.contains("User Request:"));
        assert!(prompt.contains("best match the user's profile"));
    }
}
