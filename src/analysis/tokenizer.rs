use crate::analysis::token::Token;

/// General Punctuation.
const EXCLUDE_BLOCK_1: (u32, u32) = (0x2000, 0x206F);
/// CJK Symbols and Punctuation.
const EXCLUDE_BLOCK_2: (u32, u32) = (0x3000, 0x303F);

/// Whether a code point is a token member (§4.2).
///
/// ASCII code points are members only when alphanumeric; every other code
/// point is a member unless it falls in one of the two excluded blocks.
/// No casefolding happens here — `normalize` handles that separately, kept
/// apart so membership and casing stay independently testable.
fn is_member(c: char) -> bool {
    if c.is_ascii() {
        c.is_ascii_alphanumeric()
    } else {
        let cp = c as u32;
        let in_block = |b: (u32, u32)| cp >= b.0 && cp <= b.1;
        !in_block(EXCLUDE_BLOCK_1) && !in_block(EXCLUDE_BLOCK_2)
    }
}

/// Lowercase ASCII; non-ASCII code points pass through unchanged (§4.2:
/// "Casefolding is not performed for non-ASCII code points").
fn normalize(c: char) -> char {
    if c.is_ascii_uppercase() {
        c.to_ascii_lowercase()
    } else {
        c
    }
}

/// Splits `text` into maximal runs of member code points.
///
/// `text` is required to already be valid UTF-8 (the Corpus Reader treats
/// invalid UTF-8 as fatal before ever calling this); `char_indices` gives
/// us code-point boundaries directly, without hand-rolling UTF-8
/// continuation-byte validation. A token ends the instant a
/// non-member code point is seen; that code point is never consumed into
/// a token, matching the "cursor rewinds" behavior of §4.2.
pub fn tokenize(text: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0usize;

    for (byte_offset, c) in text.char_indices() {
        if is_member(c) {
            if current.is_empty() {
                start = byte_offset;
            }
            current.push(normalize(c));
        } else if !current.is_empty() {
            tokens.push(Token::new(std::mem::take(&mut current), start));
        }
    }
    if !current.is_empty() {
        tokens.push(Token::new(current, start));
    }

    tokens
}
