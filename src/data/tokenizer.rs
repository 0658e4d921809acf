// ============================================================
// Layer 4 — Rule-based Tokenizers
// ============================================================
// Three tokenizers that need no model files, plus the JSON
// configuration that selects a tokenizer by name:
//
//   {"type": "word"}                         ← default
//   {"type": "whitespace", "lowercase": true}
//   {"type": "character"}
//   {"type": "pretrained", "path": "tokenizer.json"}
//
// The "pretrained" kind wraps a HuggingFace tokenizer file and
// is built by infra::tokenizer_store.
//
// All offsets are CHARACTER offsets, so "naïve cat" yields
// [("naïve", 0), ("cat", 6)] even though "ï" is two bytes.

use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::domain::token::Token;
use crate::domain::traits::Tokenizer;

// ─── Configuration ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case", deny_unknown_fields)]
pub enum TokenizerConfig {
    /// Alphanumeric runs; every other non-space character is its own token
    Word {
        #[serde(default)]
        lowercase: bool,
    },
    /// Split on whitespace only
    Whitespace {
        #[serde(default)]
        lowercase: bool,
    },
    /// One token per non-space character
    Character {
        #[serde(default)]
        lowercase: bool,
    },
    /// A HuggingFace `tokenizer.json`
    Pretrained {
        path: PathBuf,
    },
}

impl Default for TokenizerConfig {
    fn default() -> Self {
        TokenizerConfig::Word { lowercase: false }
    }
}

fn surface(text: &str, lowercase: bool) -> String {
    if lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    }
}

// ─── WordTokenizer ────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct WordTokenizer {
    pub lowercase: bool,
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens  = Vec::new();
        let mut current = String::new();
        let mut start   = 0usize;

        for (i, c) in text.chars().enumerate() {
            if c.is_alphanumeric() {
                if current.is_empty() {
                    start = i;
                }
                current.push(c);
                continue;
            }

            // Any other character closes the running word
            if !current.is_empty() {
                tokens.push(Token::new(surface(&current, self.lowercase), start));
                current.clear();
            }
            if !c.is_whitespace() {
                tokens.push(Token::new(surface(&c.to_string(), self.lowercase), i));
            }
        }

        if !current.is_empty() {
            tokens.push(Token::new(surface(&current, self.lowercase), start));
        }
        Ok(tokens)
    }
}

// ─── WhitespaceTokenizer ──────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct WhitespaceTokenizer {
    pub lowercase: bool,
}

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        let mut tokens  = Vec::new();
        let mut current = String::new();
        let mut start   = 0usize;

        for (i, c) in text.chars().enumerate() {
            if c.is_whitespace() {
                if !current.is_empty() {
                    tokens.push(Token::new(surface(&current, self.lowercase), start));
                    current.clear();
                }
            } else {
                if current.is_empty() {
                    start = i;
                }
                current.push(c);
            }
        }

        if !current.is_empty() {
            tokens.push(Token::new(surface(&current, self.lowercase), start));
        }
        Ok(tokens)
    }
}

// ─── CharacterTokenizer ───────────────────────────────────────────────────────
#[derive(Debug, Clone, Default)]
pub struct CharacterTokenizer {
    pub lowercase: bool,
}

impl Tokenizer for CharacterTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        Ok(text
            .chars()
            .enumerate()
            .filter(|(_, c)| !c.is_whitespace())
            .map(|(i, c)| Token::new(surface(&c.to_string(), self.lowercase), i))
            .collect())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(tokens: Vec<Token>) -> Vec<(String, usize)> {
        tokens.into_iter().map(Into::into).collect()
    }

    #[test]
    fn test_word_splits_punctuation() {
        let tokens = WordTokenizer::default().tokenize("Who wrote 'Hamlet'?").unwrap();
        assert_eq!(
            pairs(tokens),
            vec![
                ("Who".to_string(), 0),
                ("wrote".to_string(), 4),
                ("'".to_string(), 10),
                ("Hamlet".to_string(), 11),
                ("'".to_string(), 17),
                ("?".to_string(), 18),
            ]
        );
    }

    #[test]
    fn test_word_uses_character_offsets() {
        let tokens = WordTokenizer::default().tokenize("naïve cat").unwrap();
        assert_eq!(tokens[1], Token::new("cat", 6));
    }

    #[test]
    fn test_word_lowercase() {
        let tokens = WordTokenizer { lowercase: true }.tokenize("The Frog").unwrap();
        assert_eq!(tokens, vec![Token::new("the", 0), Token::new("frog", 4)]);
    }

    #[test]
    fn test_whitespace_keeps_punctuation_attached() {
        let tokens = WhitespaceTokenizer::default().tokenize("  hello,  world!").unwrap();
        assert_eq!(tokens, vec![Token::new("hello,", 2), Token::new("world!", 10)]);
    }

    #[test]
    fn test_character_skips_spaces() {
        let tokens = CharacterTokenizer::default().tokenize("a b").unwrap();
        assert_eq!(tokens, vec![Token::new("a", 0), Token::new("b", 2)]);
    }

    #[test]
    fn test_empty_text() {
        assert!(WordTokenizer::default().tokenize("").unwrap().is_empty());
        assert!(WhitespaceTokenizer::default().tokenize("   ").unwrap().is_empty());
    }

    #[test]
    fn test_config_defaults_to_word() {
        let cfg: TokenizerConfig = serde_json::from_str(r#"{"type": "word"}"#).unwrap();
        assert_eq!(cfg, TokenizerConfig::default());
    }

    #[test]
    fn test_config_rejects_unknown_type() {
        let cfg: Result<TokenizerConfig, _> = serde_json::from_str(r#"{"type": "spacy"}"#);
        assert!(cfg.is_err());
    }

    #[test]
    fn test_config_rejects_unknown_field() {
        let cfg: Result<TokenizerConfig, _> =
            serde_json::from_str(r#"{"type": "word", "language": "en"}"#);
        assert!(cfg.is_err());
    }
}
