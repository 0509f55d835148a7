//! Turns lightweight inline markup into a flat token stream.
//!
//! The stream alternates words, whitespace runs and tags so the pagination engine can
//! break lines at whitespace without scanning the text again. Tokenizing never fails:
//! anything that does not look like a tag is kept as text.

mod token;
mod tokenizer;

pub use token::{Tag, TagKind, Token, escape_text};
pub use tokenizer::{decode_entities, tokenize};
