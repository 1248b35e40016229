//! Incremental construction of SSML speech.

use std::borrow::Cow;
use std::fmt;
use std::time::Duration;

use super::TagFilter;

/// Longest pause SSML platforms accept in a single break.
pub const MAX_BREAK: Duration = Duration::from_secs(10);

/// Emphasis strength for [`SsmlDocumentBuilder::emphasis`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmphasisLevel {
    Strong,
    #[default]
    Moderate,
    Reduced,
}

impl fmt::Display for EmphasisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EmphasisLevel::Strong => "strong",
            EmphasisLevel::Moderate => "moderate",
            EmphasisLevel::Reduced => "reduced",
        };
        f.write_str(s)
    }
}

/// Accumulates speech fragments into the body of an SSML document.
///
/// Unsupported tags are stripped as each fragment is appended, so the body is
/// render-safe at every point. Fragments are separated by a single space
/// unless one side already provides whitespace.
#[derive(Debug, Clone, Default)]
pub struct SsmlDocumentBuilder {
    filter: TagFilter,
    body: String,
}

impl SsmlDocumentBuilder {
    pub fn new(filter: TagFilter) -> Self {
        Self {
            filter,
            body: String::new(),
        }
    }

    /// Appends a markup fragment verbatim, minus unsupported tags.
    pub fn markup(&mut self, markup: &str) -> &mut Self {
        let filtered = self.filter.strip(markup);
        self.push(&filtered);
        self
    }

    /// Appends plain text, escaping XML special characters.
    pub fn text(&mut self, text: &str) -> &mut Self {
        let escaped = escape_text(text);
        self.push(&escaped);
        self
    }

    /// Appends a pause, clamped to [`MAX_BREAK`].
    pub fn pause(&mut self, duration: Duration) -> &mut Self {
        let millis = duration.min(MAX_BREAK).as_millis();
        self.markup(&format!(r#"<break time="{}ms"/>"#, millis))
    }

    /// Appends emphasized text.
    ///
    /// On platforms that filter `emphasis` only the text remains.
    pub fn emphasis(&mut self, text: &str, level: EmphasisLevel) -> &mut Self {
        let fragment = format!(
            r#"<emphasis level="{}">{}</emphasis>"#,
            level,
            escape_text(text)
        );
        self.markup(&fragment)
    }

    pub fn is_empty(&self) -> bool {
        self.body.trim().is_empty()
    }

    /// The filter applied to every fragment.
    pub fn filter(&self) -> &TagFilter {
        &self.filter
    }

    /// Finalized body markup, without the `<speak>` wrapper.
    ///
    /// The filter runs once more over the whole body: a tag split across two
    /// fragments is only visible after they are joined.
    pub fn build(&self) -> String {
        self.filter.strip(self.body.trim()).into_owned()
    }

    fn push(&mut self, fragment: &str) {
        if fragment.is_empty() {
            return;
        }
        let needs_space = self
            .body
            .chars()
            .last()
            .is_some_and(|c| !c.is_whitespace())
            && fragment.chars().next().is_some_and(|c| !c.is_whitespace());
        if needs_space {
            self.body.push(' ');
        }
        self.body.push_str(fragment);
    }
}

/// Escapes text for inclusion in SSML.
pub fn escape_text(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    Cow::Owned(escaped)
}
