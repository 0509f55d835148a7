use penmark_markup::{TagKind, Token};

pub fn is_arabic(ch: char) -> bool {
    matches!(
        ch as u32,
        0x0600..=0x06FF | 0x0750..=0x077F | 0x08A0..=0x08FF | 0xFB50..=0xFDFF | 0xFE70..=0xFEFF | 0x1EE00..=0x1EEFF
    )
}

/// Whether `tag` ends the paragraph it appears in.
pub fn is_block_boundary(kind: TagKind) -> bool {
    matches!(
        kind,
        TagKind::Paragraph
            | TagKind::Div
            | TagKind::Break
            | TagKind::Heading(_)
            | TagKind::UnorderedList
            | TagKind::OrderedList
            | TagKind::ListItem
    )
}

/// How many paragraph boundaries a token introduces.
pub fn paragraph_breaks(token: &Token) -> usize {
    match token {
        Token::Whitespace(ws) => ws.matches('\n').count(),
        Token::Tag(tag) => usize::from(is_block_boundary(tag.kind())),
        Token::Word(_) => 0,
    }
}

/// Direction of every paragraph in `tokens`, indexed like the engine numbers them.
/// A paragraph is right-to-left as soon as any of its words contains Arabic script.
pub fn paragraph_directions(tokens: &[Token]) -> Vec<bool> {
    let mut rtl = vec![false];
    for token in tokens {
        if let Token::Word(word) = token
            && word.chars().any(is_arabic)
            && let Some(last) = rtl.last_mut()
        {
            *last = true;
        }
        for _ in 0..paragraph_breaks(token) {
            rtl.push(false);
        }
    }
    rtl
}
