use crate::token::{Tag, Token};
use regex::Regex;
use std::sync::LazyLock;

static TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<(/?)([a-zA-Z][a-zA-Z0-9]*)((?:\s[^<>]*?)?)\s*/?>")
        .expect("BUG: invalid TAG_RE regex literal")
});

static SRC_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(?:^|\s)src\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'>]+))"#)
        .expect("BUG: invalid SRC_RE regex literal")
});

/// Decodes `&nbsp;`, `&lt;`, `&gt;` and `&amp;`. `&nbsp;` becomes U+00A0 so it stays
/// inside its word. `&amp;` goes last, so `&amp;lt;` decodes to the text `&lt;`.
pub fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", "\u{a0}")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Splits `markup` into words, whitespace runs and tags, in document order.
///
/// Entities are decoded before tags are scanned, so `&lt;b&gt;` opens a bold run.
/// `\r\n` and lone `\r` are normalised to `\n`.
pub fn tokenize(markup: &str) -> Vec<Token> {
    let normalized = decode_entities(&markup.replace("\r\n", "\n").replace('\r', "\n"));
    let mut tokens = Vec::new();
    let mut last = 0;

    for caps in TAG_RE.captures_iter(&normalized) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        push_text(&mut tokens, &normalized[last..whole.start()]);
        last = whole.end();

        let name = caps
            .get(2)
            .map(|m| m.as_str().to_ascii_lowercase())
            .unwrap_or_default();
        let closing = caps.get(1).is_some_and(|m| !m.as_str().is_empty());
        let src = if name == "img" && !closing {
            caps.get(3).and_then(|attrs| extract_src(attrs.as_str()))
        } else {
            None
        };
        tokens.push(Token::Tag(Tag { name, closing, src }));
    }
    push_text(&mut tokens, &normalized[last..]);
    tokens
}

fn extract_src(attrs: &str) -> Option<String> {
    let caps = SRC_RE.captures(attrs)?;
    let raw = caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3))?;
    Some(raw.as_str().to_string())
}

fn is_break_space(c: char) -> bool {
    c.is_whitespace() && c != '\u{a0}'
}

fn push_text(tokens: &mut Vec<Token>, raw: &str) {
    if raw.is_empty() {
        return;
    }
    let mut current = String::new();
    let mut in_space = false;

    for c in raw.chars() {
        let space = is_break_space(c);
        if space != in_space && !current.is_empty() {
            tokens.push(make_text_token(std::mem::take(&mut current), in_space));
        }
        in_space = space;
        current.push(c);
    }
    if !current.is_empty() {
        tokens.push(make_text_token(current, in_space));
    }
}

fn make_text_token(text: String, space: bool) -> Token {
    if space {
        Token::Whitespace(text)
    } else {
        Token::Word(text)
    }
}
