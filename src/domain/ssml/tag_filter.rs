//! Platform capability filtering for speech markup.
//!
//! Each platform supports a subset of SSML. A [`TagFilter`] removes the tags a
//! platform does not understand while keeping the text they enclose:
//!
//! ```
//! use voice_adapter::domain::ssml::TagFilter;
//!
//! let filter = TagFilter::new(["emphasis"]).unwrap();
//! assert_eq!(filter.strip("<emphasis>hi</emphasis> there"), "hi there");
//! ```

use std::borrow::Cow;
use std::collections::BTreeSet;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Valid SSML element names (optionally namespaced, e.g. `amazon:effect`).
static TAG_NAME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_.\-]*(:[A-Za-z][A-Za-z0-9_.\-]*)?$").unwrap());

/// Errors raised while configuring a tag filter.
#[derive(Debug, Error)]
pub enum TagFilterError {
    #[error("Invalid markup tag name: '{0}'")]
    InvalidTagName(String),

    #[error("Failed to compile tag pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Strips a fixed set of markup tags from speech.
#[derive(Debug, Clone, Default)]
pub struct TagFilter {
    tags: BTreeSet<String>,
    pattern: Option<Regex>,
}

impl TagFilter {
    /// Creates a filter for the given tag names (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns `TagFilterError::InvalidTagName` for names that are not valid
    /// element names.
    pub fn new<I, S>(tags: I) -> Result<Self, TagFilterError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut names = BTreeSet::new();
        for tag in tags {
            let tag = tag.as_ref().trim();
            if !TAG_NAME_RE.is_match(tag) {
                return Err(TagFilterError::InvalidTagName(tag.to_string()));
            }
            names.insert(tag.to_ascii_lowercase());
        }

        if names.is_empty() {
            return Ok(Self::none());
        }

        let alternatives = names
            .iter()
            .map(|t| regex::escape(t))
            .collect::<Vec<_>>()
            .join("|");
        // Opening, closing and self-closing forms, with or without attributes.
        let pattern = Regex::new(&format!(r"(?i)<\s*/?\s*(?:{})(?:[\s/][^>]*)?>", alternatives))?;

        Ok(Self {
            tags: names,
            pattern: Some(pattern),
        })
    }

    /// A filter that lets every tag through.
    pub fn none() -> Self {
        Self::default()
    }

    /// The filtered tag names, lowercased.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Removes every filtered tag, keeping enclosed text.
    ///
    /// Repeats until nothing matches, so removing one tag can never leave
    /// the pieces of another one behind.
    pub fn strip<'a>(&self, markup: &'a str) -> Cow<'a, str> {
        let Some(pattern) = &self.pattern else {
            return Cow::Borrowed(markup);
        };
        if !pattern.is_match(markup) {
            return Cow::Borrowed(markup);
        }

        let mut current = pattern.replace_all(markup, "").into_owned();
        while pattern.is_match(&current) {
            current = pattern.replace_all(&current, "").into_owned();
        }
        Cow::Owned(current)
    }

    /// Returns true if `markup` contains any filtered tag.
    pub fn contains_unsupported(&self, markup: &str) -> bool {
        self.pattern
            .as_ref()
            .map(|p| p.is_match(markup))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emphasis() -> TagFilter {
        TagFilter::new(["emphasis"]).unwrap()
    }

    // ══════════════════════════════════════════════════════════════
    // Construction
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn rejects_invalid_tag_names() {
        assert!(matches!(
            TagFilter::new(["<emphasis>"]),
            Err(TagFilterError::InvalidTagName(_))
        ));
        assert!(matches!(
            TagFilter::new(["1abc"]),
            Err(TagFilterError::InvalidTagName(_))
        ));
        assert!(matches!(
            TagFilter::new([""]),
            Err(TagFilterError::InvalidTagName(_))
        ));
    }

    #[test]
    fn accepts_namespaced_tags() {
        let filter = TagFilter::new(["amazon:effect"]).unwrap();
        assert_eq!(
            filter.strip(r#"<amazon:effect name="whispered">psst</amazon:effect>"#),
            "psst"
        );
    }

    #[test]
    fn empty_filter_passes_everything() {
        let filter = TagFilter::new(Vec::<String>::new()).unwrap();
        assert!(filter.is_empty());
        let markup = "<emphasis>hi</emphasis>";
        assert_eq!(filter.strip(markup), markup);
        assert!(!filter.contains_unsupported(markup));
    }

    #[test]
    fn tag_names_are_normalized() {
        let filter = TagFilter::new([" Emphasis ", "PROSODY"]).unwrap();
        let tags: Vec<&str> = filter.tags().collect();
        assert_eq!(tags, vec!["emphasis", "prosody"]);
    }

    // ══════════════════════════════════════════════════════════════
    // Stripping
    // ══════════════════════════════════════════════════════════════

    #[test]
    fn strips_tag_and_keeps_enclosed_text() {
        assert_eq!(emphasis().strip("<emphasis>hi</emphasis> there"), "hi there");
    }

    #[test]
    fn strips_tags_with_attributes() {
        assert_eq!(
            emphasis().strip(r#"<emphasis level="strong">now</emphasis>!"#),
            "now!"
        );
    }

    #[test]
    fn strips_self_closing_and_spaced_forms() {
        assert_eq!(emphasis().strip("a<emphasis/>b< / emphasis >c"), "abc");
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(emphasis().strip("<EMPHASIS>loud</Emphasis>"), "loud");
    }

    #[test]
    fn leaves_other_tags_alone() {
        let markup = r#"Hold on<break time="500ms"/> <say-as interpret-as="digits">42</say-as>"#;
        assert_eq!(emphasis().strip(markup), markup);
    }

    #[test]
    fn does_not_match_tags_sharing_a_prefix() {
        let markup = "<emphasisx>keep</emphasisx>";
        assert_eq!(emphasis().strip(markup), markup);
    }

    #[test]
    fn nested_remnants_cannot_reassemble_a_tag() {
        let stripped = emphasis().strip("<emph<emphasis>asis>boo");
        assert_eq!(stripped, "boo");
        assert!(!emphasis().contains_unsupported(&stripped));
    }

    #[test]
    fn borrowed_when_nothing_to_strip() {
        assert!(matches!(emphasis().strip("plain text"), Cow::Borrowed(_)));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn arb_markup() -> impl Strategy<Value = String> {
            let piece = prop_oneof![
                "[a-z ]{0,8}",
                Just("<emphasis>".to_string()),
                Just("</emphasis>".to_string()),
                Just(r#"<emphasis level="strong">"#.to_string()),
                Just("<emph".to_string()),
                Just("asis>".to_string()),
                Just("<prosody rate=\"slow\">".to_string()),
                Just("</prosody>".to_string()),
                Just("<break time=\"1s\"/>".to_string()),
                "[<>/ a-z=\"]{0,6}",
            ];
            prop::collection::vec(piece, 0..12).prop_map(|parts| parts.concat())
        }

        proptest! {
            #[test]
            fn output_never_contains_filtered_tags(markup in arb_markup()) {
                let filter = TagFilter::new(["emphasis", "prosody"]).unwrap();
                let stripped = filter.strip(&markup);
                prop_assert!(!filter.contains_unsupported(&stripped));
            }

            #[test]
            fn text_without_angle_brackets_is_untouched(text in "[^<>]{0,64}") {
                prop_assert_eq!(emphasis().strip(&text), text.as_str());
            }

            #[test]
            fn stripping_is_idempotent(markup in arb_markup()) {
                let filter = emphasis();
                let once = filter.strip(&markup).into_owned();
                let twice = filter.strip(&once).into_owned();
                prop_assert_eq!(once, twice);
            }
        }
    }
}
