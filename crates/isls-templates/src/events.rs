use std::fmt::Write;

use serde::Deserialize;

/// One `name="value"` pair on an opening tag.
///
/// `offset` is the distance in characters from the tag's `<` to the first
/// character of the attribute name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attribute {
    pub name: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub offset: u32,
}

/// An opening (possibly self-closing) tag as seen by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagOccurrence {
    pub tag_name: String,
    pub line: u32,
    pub col: u32,
    #[serde(default, alias = "close")]
    pub self_closed: bool,
    #[serde(default)]
    pub attrs: Vec<Attribute>,
    #[serde(default)]
    pub raw: String,
}

impl TagOccurrence {
    #[must_use]
    pub fn new(tag_name: impl Into<String>, line: u32, col: u32) -> Self {
        let tag_name = tag_name.into();
        let raw = format!("<{tag_name}>");
        Self {
            tag_name,
            line,
            col,
            self_closed: false,
            attrs: Vec::new(),
            raw,
        }
    }

    /// Append an attribute, laying it out after the previous ones as
    /// `<tag name="value" ...>` would be written.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let name = name.into();
        let value = value.into();
        let close = if self.self_closed { "/>" } else { ">" };

        self.raw.truncate(self.raw.len().saturating_sub(close.len()));
        let offset = u32::try_from(self.raw.chars().count() + 1).unwrap_or(u32::MAX);
        let _ = write!(self.raw, " {name}=\"{value}\"{close}");
        self.attrs.push(Attribute { name, value, offset });
        self
    }

    #[must_use]
    pub fn self_closing(mut self) -> Self {
        if !self.self_closed {
            self.raw.pop();
            self.raw.push_str("/>");
        }
        self.self_closed = true;
        self
    }

    /// Column of an attribute, for findings that point at it.
    #[must_use]
    pub fn attr_col(&self, attr: &Attribute) -> u32 {
        self.col.saturating_add(attr.offset)
    }

    pub fn attrs_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Attribute> {
        self.attrs.iter().filter(move |attr| attr.name == name)
    }

    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|attr| attr.name == name)
    }
}

/// Text, comment or character data between tags.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chunk {
    pub line: u32,
    pub col: u32,
    #[serde(default)]
    pub raw: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TagEnd {
    pub tag_name: String,
    pub line: u32,
    pub col: u32,
    #[serde(default)]
    pub raw: String,
}

/// A tokenizer event. Positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Event {
    TagStart(TagOccurrence),
    Text(Chunk),
    Comment(Chunk),
    Cdata(Chunk),
    TagEnd(TagEnd),
}

impl Event {
    #[must_use]
    pub fn line(&self) -> u32 {
        match self {
            Event::TagStart(tag) => tag.line,
            Event::Text(chunk) | Event::Comment(chunk) | Event::Cdata(chunk) => chunk.line,
            Event::TagEnd(end) => end.line,
        }
    }

    #[must_use]
    pub fn col(&self) -> u32 {
        match self {
            Event::TagStart(tag) => tag.col,
            Event::Text(chunk) | Event::Comment(chunk) | Event::Cdata(chunk) => chunk.col,
            Event::TagEnd(end) => end.col,
        }
    }

    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Event::TagStart(tag) => &tag.raw,
            Event::Text(chunk) | Event::Comment(chunk) | Event::Cdata(chunk) => &chunk.raw,
            Event::TagEnd(end) => &end.raw,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_layout() {
        let tag = TagOccurrence::new("isset", 3, 5)
            .with_attr("name", "x")
            .with_attr("value", "1")
            .self_closing();

        assert_eq!(tag.raw, r#"<isset name="x" value="1"/>"#);
        assert_eq!(tag.attrs[0].offset, 7);
        assert_eq!(tag.attrs[1].offset, 16);
        assert_eq!(&tag.raw[7..11], "name");
        assert_eq!(&tag.raw[16..21], "value");
        assert_eq!(tag.attr_col(&tag.attrs[1]), 21);
    }

    #[test]
    fn test_attrs_named_keeps_duplicates() {
        let tag = TagOccurrence::new("iscache", 1, 1)
            .with_attr("type", "relative")
            .with_attr("type", "weekly");

        let values: Vec<&str> = tag.attrs_named("type").map(|a| a.value.as_str()).collect();
        assert_eq!(values, vec!["relative", "weekly"]);
        assert!(tag.has_attr("type"));
        assert!(!tag.has_attr("Type"));
    }

    #[test]
    fn test_deserialize_event_stream() {
        let json = r#"[
            {"kind": "tag-start", "tag_name": "img", "line": 1, "col": 1, "close": true,
             "attrs": [{"name": "src", "value": "a.png", "offset": 5}],
             "raw": "<img src=\"a.png\"/>"},
            {"kind": "text", "line": 1, "col": 19, "raw": "hello"},
            {"kind": "comment", "line": 2, "col": 1},
            {"kind": "cdata", "line": 3, "col": 1},
            {"kind": "tag-end", "tag_name": "div", "line": 4, "col": 1, "raw": "</div>"}
        ]"#;

        let events: Vec<Event> = serde_json::from_str(json).unwrap();

        assert_eq!(events.len(), 5);
        let Event::TagStart(img) = &events[0] else {
            panic!("expected tag-start");
        };
        assert!(img.self_closed);
        assert_eq!(img.attrs[0].name, "src");
        assert_eq!(events[1].col(), 19);
        assert_eq!(events[4].line(), 4);
        assert_eq!(events[4].raw(), "</div>");
    }
}
