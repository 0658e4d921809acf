// ============================================================
// Layer 3 — Token
// ============================================================
// A token is a surface form plus the CHARACTER offset (not byte
// offset) where it starts in the text it was cut from.
//
// On the wire a token is a two element array:
//   ["what", 0]
// which keeps the JSONL records compact. serde's from/into
// attributes map the struct to and from a (String, usize) tuple.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(String, usize)", into = "(String, usize)")]
pub struct Token {
    /// The token text as produced by the tokenizer
    pub text: String,

    /// Character offset of the first character of the token
    pub offset: usize,
}

impl Token {
    pub fn new(text: impl Into<String>, offset: usize) -> Self {
        Self { text: text.into(), offset }
    }

    /// Same token, moved `delta` characters to the right.
    /// Used when paragraphs are joined into one merged text.
    pub fn shifted(&self, delta: usize) -> Self {
        Self { text: self.text.clone(), offset: self.offset + delta }
    }
}

impl From<(String, usize)> for Token {
    fn from((text, offset): (String, usize)) -> Self {
        Self { text, offset }
    }
}

impl From<Token> for (String, usize) {
    fn from(token: Token) -> Self {
        (token.text, token.offset)
    }
}

/// True when offsets never decrease along the sequence.
pub fn offsets_are_monotonic(tokens: &[Token]) -> bool {
    tokens.windows(2).all(|w| w[0].offset <= w[1].offset)
}
