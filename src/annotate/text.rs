//! Styled annotation text
//!
//! Annotations carry lightweight presentation emphasis for the downstream
//! renderer: an ordered run of spans, each with one style. `Display`
//! yields the plain concatenation; `html()` reproduces the renderer's tag
//! vocabulary (bold, italic, green and red highlights).

use std::fmt;

use serde::Serialize;

/// Emphasis applied to one span of annotation text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Style {
    /// No emphasis
    Plain,
    /// Bold: filters, index names, grouping keys
    Strong,
    /// Italic: operator type names
    Em,
    /// Green highlight: relations and matched conditions
    Good,
    /// Red highlight: aliases and ascending sort keys
    Bad,
}

/// One run of uniformly styled text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Span {
    pub text: String,
    pub style: Style,
}

/// An annotation's text as ordered styled spans
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StyledText {
    spans: Vec<Span>,
}

impl StyledText {
    /// Creates empty text
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a span with the given style
    pub fn push(&mut self, text: impl Into<String>, style: Style) -> &mut Self {
        let text = text.into();
        if !text.is_empty() {
            self.spans.push(Span { text, style });
        }
        self
    }

    /// Appends unstyled text
    pub fn plain(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text, Style::Plain)
    }

    /// Appends bold text
    pub fn strong(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text, Style::Strong)
    }

    /// Appends italic text
    pub fn em(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text, Style::Em)
    }

    /// Appends green-highlighted text
    pub fn good(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text, Style::Good)
    }

    /// Appends red-highlighted text
    pub fn bad(&mut self, text: impl Into<String>) -> &mut Self {
        self.push(text, Style::Bad)
    }

    /// Appends all spans of another text
    pub fn append(&mut self, other: StyledText) -> &mut Self {
        self.spans.extend(other.spans);
        self
    }

    /// The styled spans in order
    pub fn spans(&self) -> &[Span] {
        &self.spans
    }

    /// True when no text has been pushed
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Renders the HTML form the original interface displayed
    pub fn html(&self) -> String {
        let mut out = String::with_capacity(self.spans.iter().map(|s| s.text.len() + 16).sum());
        for span in &self.spans {
            let (open, close) = match span.style {
                Style::Plain => ("", ""),
                Style::Strong => ("<b>", "</b>"),
                Style::Em => ("<em>", "</em>"),
                Style::Good => ("<span style='color:green'>", "</span>"),
                Style::Bad => ("<span style='color:red'>", "</span>"),
            };
            out.push_str(open);
            escape_html(&mut out, &span.text);
            out.push_str(close);
        }
        out
    }
}

impl fmt::Display for StyledText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in &self.spans {
            f.write_str(&span.text)?;
        }
        Ok(())
    }
}

/// Escapes the characters that would break the surrounding markup.
/// Predicates routinely contain comparison operators.
fn escape_html(out: &mut String, text: &str) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            c => out.push(c),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_concatenates_plain_text() {
        let mut text = StyledText::new();
        text.plain("The ").em("Seq Scan").plain(" operation.");
        assert_eq!(text.to_string(), "The Seq Scan operation.");
    }

    #[test]
    fn test_html_reproduces_tag_vocabulary() {
        let mut text = StyledText::new();
        text.good("orders")
            .plain(" ")
            .bad("o")
            .plain(" ")
            .strong("filter")
            .plain(" ")
            .em("Sort");

        assert_eq!(
            text.html(),
            "<span style='color:green'>orders</span> \
             <span style='color:red'>o</span> \
             <b>filter</b> \
             <em>Sort</em>"
        );
    }

    #[test]
    fn test_html_escapes_predicate_operators() {
        let mut text = StyledText::new();
        text.good("(a.id < 10 AND b.id > 2)");
        assert_eq!(
            text.html(),
            "<span style='color:green'>(a.id &lt; 10 AND b.id &gt; 2)</span>"
        );
    }

    #[test]
    fn test_empty_pushes_are_dropped() {
        let mut text = StyledText::new();
        text.plain("").strong("");
        assert!(text.is_empty());
        assert_eq!(text.to_string(), "");
    }

    #[test]
    fn test_append_preserves_order() {
        let mut tail = StyledText::new();
        tail.plain("tail");
        let mut text = StyledText::new();
        text.plain("head ").append(tail);
        assert_eq!(text.to_string(), "head tail");
        assert_eq!(text.spans().len(), 2);
    }
}
