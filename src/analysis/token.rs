/// One lowercased alnum "word" produced by the Tokenizer (§3 "Token").
///
/// `text` is owned UTF-8: either a single lowercased ASCII alnum byte or a
/// run of multi-byte code points that are not in the excluded punctuation
/// blocks. `byte_offset` is the offset of the token's first byte within
/// the slice the tokenizer was called on. Positions are not tracked
/// (phrase queries are a non-goal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub byte_offset: usize,
}

impl Token {
    pub fn new(text: String, byte_offset: usize) -> Self {
        Token { text, byte_offset }
    }
}
