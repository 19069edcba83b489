//! Moderation rules: IP-ban activity, client IP resolution, and the
//! regex content filter applied to forum submissions.

use std::net::IpAddr;
use std::path::Path;

use regex::Regex;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// IP bans
// ---------------------------------------------------------------------------

/// A ban applies while `active` is set and its expiry (if any) has not
/// passed. A ban expiring exactly `now` still applies.
pub fn ban_is_active(active: bool, expires_at: Option<Timestamp>, now: Timestamp) -> bool {
    active && expires_at.map_or(true, |expires| now <= expires)
}

/// Resolve the client address: the first `X-Forwarded-For` entry when
/// present, otherwise the socket peer.
pub fn client_ip(forwarded_for: Option<&str>, peer: Option<IpAddr>) -> Option<String> {
    forwarded_for
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|ip| !ip.is_empty())
        .map(str::to_string)
        .or_else(|| peer.map(|p| p.to_string()))
}

// ---------------------------------------------------------------------------
// Content filter
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum ContentFilterError {
    #[error("Invalid content filter on line {line}: {source}")]
    InvalidPattern {
        line: usize,
        #[source]
        source: regex::Error,
    },

    #[error("Failed to read content filters: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered set of blocked-content patterns.
#[derive(Debug, Clone, Default)]
pub struct ContentFilter {
    patterns: Vec<Regex>,
}

impl ContentFilter {
    /// A filter that blocks nothing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Compile one pattern per non-empty line.
    pub fn from_lines(source: &str) -> Result<Self, ContentFilterError> {
        let mut patterns = Vec::new();
        for (idx, line) in source.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let re = Regex::new(line).map_err(|source| ContentFilterError::InvalidPattern {
                line: idx + 1,
                source,
            })?;
            patterns.push(re);
        }
        Ok(Self { patterns })
    }

    /// Load patterns from a file. A missing file yields an empty filter.
    pub fn load(path: &Path) -> Result<Self, ContentFilterError> {
        match std::fs::read_to_string(path) {
            Ok(source) => Self::from_lines(&source),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(path = %path.display(), "Content filter file not found, no filters loaded");
                Ok(Self::empty())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// True when any pattern matches at the start of `text`.
    ///
    /// The leftmost match of a regex starts at 0 exactly when some match
    /// starts at 0, so `find` gives anchored semantics without recompiling.
    pub fn blocks(&self, text: &str) -> bool {
        self.patterns
            .iter()
            .any(|re| re.find(text).is_some_and(|m| m.start() == 0))
    }

    /// True when any pattern matches anywhere in `text`.
    pub fn flags(&self, text: &str) -> bool {
        self.patterns.iter().any(|re| re.is_match(text))
    }

    /// True when any of the given fields is blocked.
    pub fn blocks_any(&self, fields: &[&str]) -> bool {
        fields.iter().any(|f| self.blocks(f))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::{Duration, Utc};

    #[test]
    fn ban_activity_rules() {
        let now = Utc::now();
        assert!(ban_is_active(true, None, now));
        assert!(ban_is_active(true, Some(now + Duration::hours(1)), now));
        assert!(ban_is_active(true, Some(now), now));
        assert!(!ban_is_active(true, Some(now - Duration::seconds(1)), now));
        assert!(!ban_is_active(false, None, now));
    }

    #[test]
    fn forwarded_for_wins_over_peer() {
        let peer: IpAddr = "10.0.0.9".parse().unwrap();
        assert_eq!(
            client_ip(Some(" 203.0.113.5 , 10.0.0.1"), Some(peer)).as_deref(),
            Some("203.0.113.5")
        );
        assert_eq!(client_ip(Some(""), Some(peer)).as_deref(), Some("10.0.0.9"));
        assert_eq!(client_ip(None, Some(peer)).as_deref(), Some("10.0.0.9"));
        assert_eq!(client_ip(None, None), None);
    }

    #[test]
    fn filter_matches_only_at_start() {
        let filter = ContentFilter::from_lines("spam\n\n(?i)buy now\n").unwrap();
        assert_eq!(filter.len(), 2);
        assert!(filter.blocks("spam spam"));
        assert!(filter.blocks("BUY NOW cheap"));
        assert!(!filter.blocks("this is spam"));
        assert!(filter.flags("this is spam"));
        assert!(filter.blocks_any(&["hello", "spam"]));
        assert!(!filter.blocks_any(&["hello", "world"]));
    }

    #[test]
    fn alternation_is_anchored_as_a_whole() {
        let filter = ContentFilter::from_lines("foo|bar").unwrap();
        assert!(filter.blocks("bar baz"));
        assert!(!filter.blocks("baz bar"));
    }

    #[test]
    fn invalid_pattern_reports_line() {
        let err = ContentFilter::from_lines("ok\n(unclosed").unwrap_err();
        assert_matches!(err, ContentFilterError::InvalidPattern { line: 2, .. });
    }

    #[test]
    fn missing_file_is_empty_filter() {
        let filter = ContentFilter::load(Path::new("/nonexistent/filters.txt")).unwrap();
        assert!(filter.is_empty());
        assert!(!filter.blocks("anything"));
    }
}
