//! Line match predicate.

/// Literal that must directly follow the token for a line to match.
///
/// Access log lines are tab separated and the request URL column follows
/// the identifier column, so `<token>\thttp` pins the token to that column.
pub const MATCH_MARKER: &str = "\thttp";

/// Plain substring matcher for `<token>\thttp`.
///
/// Matching is unanchored byte containment: no regex, no trimming, no case
/// folding. An empty token matches every line containing the marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineMatcher {
    needle: String,
}

impl LineMatcher {
    /// Build a matcher for `token`.
    pub fn new(token: &str) -> Self {
        let mut needle = String::with_capacity(token.len() + MATCH_MARKER.len());
        needle.push_str(token);
        needle.push_str(MATCH_MARKER);
        Self { needle }
    }

    /// The full search substring (`token` followed by the marker).
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Whether `line` contains the search substring at least once.
    #[inline]
    pub fn matches(&self, line: &str) -> bool {
        line.contains(self.needle.as_str())
    }
}

/// One-shot form of [`LineMatcher::matches`].
pub fn matches(line: &str, token: &str) -> bool {
    LineMatcher::new(token).matches(line)
}
