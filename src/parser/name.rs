//! Node name resolution
//!
//! Extracts the human label from a link's fragment, strips it down to the
//! charset the downstream config accepts, and deduplicates it against the
//! names already handed out in the current batch.

use std::collections::HashSet;

use tracing::trace;

/// Label used when a link carries no fragment, or when sanitization
/// removes every character of the label.
pub const UNNAMED_LABEL: &str = "Unnamed";

/// Maximum length of a node name, in characters.
const MAX_NAME_LEN: usize = 24;

// ============================================================================
// Label Extraction
// ============================================================================

/// Extracts the raw label from a link.
///
/// The label is the percent-decoded text after the first `#`. When the
/// decoded text carries a parenthesized or CJK-bracketed annotation, only the
/// first bracketed content is kept: `HK 节点（香港 01）` resolves to `香港 01`.
/// A link without a fragment resolves to the `"Unnamed"` sentinel.
pub fn extract_label(link: &str) -> String {
    let fragment = match link.find('#') {
        Some(pos) if pos + 1 < link.len() => &link[pos + 1..],
        _ => return UNNAMED_LABEL.to_string(),
    };

    let decoded = urlencoding::decode(fragment)
        .unwrap_or_else(|_| fragment.into())
        .into_owned();

    match bracketed_annotation(&decoded) {
        Some(inner) => inner.to_string(),
        None => decoded,
    }
}

/// Returns the content of the first `(...)` / `（...）` annotation, if any.
/// Bracket styles may be mixed, as they often are in subscription remarks.
fn bracketed_annotation(label: &str) -> Option<&str> {
    let open = label.find(['(', '（'])?;
    let bracket = label[open..].chars().next()?;
    let start = open + bracket.len_utf8();
    let close = label[start..].find([')', '）'])?;
    Some(&label[start..start + close])
}

// ============================================================================
// Name Registry
// ============================================================================

/// Batch-scoped registry of assigned node names.
///
/// Owned by the batch aggregator and threaded through the scheme decoders; a
/// decoder reserves a name right before constructing its node, so failed
/// lines never consume a numeric suffix.
#[derive(Debug, Default)]
pub struct NameRegistry {
    used: HashSet<String>,
}

impl NameRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self {
            used: HashSet::new(),
        }
    }

    /// Resolves, sanitizes, and reserves the name for a link.
    pub fn assign(&mut self, link: &str) -> String {
        self.sanitize(&extract_label(link))
    }

    /// Sanitizes a label and reserves a unique name for it.
    ///
    /// Characters outside the allowed set (CJK ideographs, ASCII
    /// alphanumerics, `_`, `-`) are stripped and the result is truncated to
    /// 24 characters. Collisions with already-reserved names get a `_1`,
    /// `_2`, … suffix, first free integer wins.
    pub fn sanitize(&mut self, label: &str) -> String {
        let cleaned: String = label
            .trim()
            .chars()
            .filter(|&c| is_allowed_char(c))
            .take(MAX_NAME_LEN)
            .collect();

        // A label of nothing but stripped symbols must still produce a name
        let base = if cleaned.is_empty() {
            UNNAMED_LABEL.to_string()
        } else {
            cleaned
        };

        let mut candidate = base.clone();
        let mut counter = 1;
        while self.used.contains(&candidate) {
            candidate = format!("{}_{}", base, counter);
            counter += 1;
        }

        trace!("Assigned node name '{}'", candidate);
        self.used.insert(candidate.clone());
        candidate
    }

    /// Number of names reserved so far
    pub fn len(&self) -> usize {
        self.used.len()
    }

    /// True when no names have been reserved
    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-' || ('\u{4e00}'..='\u{9fa5}').contains(&c)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_label_plain() {
        assert_eq!(extract_label("ss://abc@host:1#MyNode"), "MyNode");
    }

    #[test]
    fn test_extract_label_missing_fragment() {
        assert_eq!(extract_label("ss://abc@host:1"), "Unnamed");
    }

    #[test]
    fn test_extract_label_empty_fragment() {
        assert_eq!(extract_label("ss://abc@host:1#"), "Unnamed");
    }

    #[test]
    fn test_extract_label_percent_decoded() {
        assert_eq!(extract_label("trojan://p@h:1#US%20Server"), "US Server");
    }

    #[test]
    fn test_extract_label_first_hash_wins() {
        assert_eq!(extract_label("vless://u@h:1#one#two"), "one#two");
    }

    #[test]
    fn test_extract_label_cjk_brackets() {
        assert_eq!(extract_label("ss://abc@host:1#节点（香港01）"), "香港01");
    }

    #[test]
    fn test_extract_label_ascii_parens() {
        assert_eq!(extract_label("ss://abc@host:1#node(HK-1)"), "HK-1");
    }

    #[test]
    fn test_extract_label_mixed_brackets() {
        assert_eq!(extract_label("ss://abc@host:1#node(香港）"), "香港");
    }

    #[test]
    fn test_extract_label_unclosed_bracket_keeps_whole() {
        assert_eq!(extract_label("ss://abc@host:1#node(HK"), "node(HK");
    }

    #[test]
    fn test_sanitize_strips_disallowed() {
        let mut names = NameRegistry::new();
        assert_eq!(names.sanitize("🇺🇸 US Server!"), "USServer");
    }

    #[test]
    fn test_sanitize_keeps_cjk() {
        let mut names = NameRegistry::new();
        assert_eq!(names.sanitize("香港 IPLC-01"), "香港IPLC-01");
    }

    #[test]
    fn test_sanitize_truncates_to_24() {
        let mut names = NameRegistry::new();
        let name = names.sanitize(&"a".repeat(40));
        assert_eq!(name.chars().count(), 24);
    }

    #[test]
    fn test_sanitize_empty_falls_back() {
        let mut names = NameRegistry::new();
        assert_eq!(names.sanitize("!!!"), "Unnamed");
    }

    #[test]
    fn test_sanitize_dedup_suffixes_in_order() {
        let mut names = NameRegistry::new();
        assert_eq!(names.sanitize("Node"), "Node");
        assert_eq!(names.sanitize("Node"), "Node_1");
        assert_eq!(names.sanitize("Node"), "Node_2");
        assert_eq!(names.len(), 3);
    }

    #[test]
    fn test_sanitize_dedup_after_truncation() {
        let mut names = NameRegistry::new();
        let long = "b".repeat(30);
        let first = names.sanitize(&long);
        let second = names.sanitize(&long);
        assert_eq!(first, "b".repeat(24));
        assert_eq!(second, format!("{}_1", "b".repeat(24)));
    }

    #[test]
    fn test_assign_uses_link_fragment() {
        let mut names = NameRegistry::new();
        assert_eq!(names.assign("ss://abc@host:1#My%20Node"), "MyNode");
    }
}
