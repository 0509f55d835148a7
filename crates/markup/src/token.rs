use std::fmt::Write;

/// Structural meaning of a tag name. Names outside the allow-list map to `Other`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Bold,
    Italic,
    Underline,
    Heading(u8),
    Paragraph,
    Div,
    Break,
    Image,
    UnorderedList,
    OrderedList,
    ListItem,
    Other,
}

impl TagKind {
    pub fn from_name(name: &str) -> Self {
        match name {
            "b" | "strong" => TagKind::Bold,
            "i" | "em" => TagKind::Italic,
            "u" => TagKind::Underline,
            "h1" => TagKind::Heading(1),
            "h2" => TagKind::Heading(2),
            "h3" => TagKind::Heading(3),
            "p" => TagKind::Paragraph,
            "div" => TagKind::Div,
            "br" => TagKind::Break,
            "img" => TagKind::Image,
            "ul" => TagKind::UnorderedList,
            "ol" => TagKind::OrderedList,
            "li" => TagKind::ListItem,
            _ => TagKind::Other,
        }
    }

    /// Tags that never wrap content.
    pub fn is_void(self) -> bool {
        matches!(self, TagKind::Break | TagKind::Image)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    /// Lower-cased tag name as written.
    pub name: String,
    pub closing: bool,
    /// Only populated for `img`.
    pub src: Option<String>,
}

impl Tag {
    pub fn open(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            closing: false,
            src: None,
        }
    }

    pub fn close(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            closing: true,
            src: None,
        }
    }

    pub fn image(src: impl Into<String>) -> Self {
        Self {
            name: "img".to_string(),
            closing: false,
            src: Some(src.into()),
        }
    }

    pub fn kind(&self) -> TagKind {
        TagKind::from_name(&self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// A run of non-whitespace characters, entities already decoded.
    Word(String),
    /// A run of whitespace; may contain `\n`.
    Whitespace(String),
    Tag(Tag),
}

impl Token {
    pub fn as_tag(&self) -> Option<&Tag> {
        match self {
            Token::Tag(tag) => Some(tag),
            _ => None,
        }
    }

    /// Writes the token back as markup, re-escaping text so the result tokenizes to
    /// the same token.
    pub fn write_markup(&self, out: &mut String) {
        match self {
            Token::Word(text) | Token::Whitespace(text) => out.push_str(&escape_text(text)),
            Token::Tag(tag) => {
                let slash = if tag.closing { "/" } else { "" };
                let _ = write!(out, "<{}{}", slash, tag.name);
                if let Some(src) = &tag.src {
                    let quote = if src.contains('"') { '\'' } else { '"' };
                    let _ = write!(out, " src={}{}{}", quote, src, quote);
                }
                out.push('>');
            }
        }
    }
}

/// Escapes the characters the tokenizer decodes.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            c => out.push(c),
        }
    }
    out
}
