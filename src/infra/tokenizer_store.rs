// ============================================================
// Layer 6 — Tokenizer Store
// ============================================================
// Builds the tokenizer named in the configuration. The rule-based
// kinds live in data::tokenizer; the "pretrained" kind loads a
// HuggingFace tokenizer.json from disk.
//
// The HuggingFace tokenizer may normalise the text (e.g. lowercase
// it) before splitting. Token strings are taken after normalisation,
// offsets always point into the original text, in characters.
//
// Reference: HuggingFace tokenizers, Encoding::get_offsets

use anyhow::{anyhow, Context, Result};
use std::path::Path;
use tokenizers::Tokenizer as HfTokenizer;

use crate::data::tokenizer::{
    CharacterTokenizer, TokenizerConfig, WhitespaceTokenizer, WordTokenizer,
};
use crate::domain::token::Token;
use crate::domain::traits::Tokenizer;

// ─── PretrainedTokenizer ──────────────────────────────────────────────────────
pub struct PretrainedTokenizer {
    inner: HfTokenizer,
}

impl PretrainedTokenizer {
    /// Load a tokenizer.json file
    pub fn from_file(path: &Path) -> Result<Self> {
        let inner = HfTokenizer::from_file(path).map_err(|e| {
            anyhow!("Cannot load tokenizer from '{}': {}", path.display(), e)
        })?;
        Ok(Self { inner })
    }
}

impl Tokenizer for PretrainedTokenizer {
    fn tokenize(&self, text: &str) -> Result<Vec<Token>> {
        // No [CLS]/[SEP]: the records hold only the text itself
        let encoding = self
            .inner
            .encode_char_offsets(text, false)
            .map_err(|e| anyhow!("Tokenizer failed: {e}"))?;

        Ok(encoding
            .get_tokens()
            .iter()
            .zip(encoding.get_offsets())
            .map(|(tok, &(start, _))| Token::new(tok.clone(), start))
            .collect())
    }
}

// ─── TokenizerStore ───────────────────────────────────────────────────────────
pub struct TokenizerStore;

impl TokenizerStore {
    /// Build the tokenizer selected by the configuration.
    pub fn build(config: &TokenizerConfig) -> Result<Box<dyn Tokenizer>> {
        let tokenizer: Box<dyn Tokenizer> = match config {
            TokenizerConfig::Word { lowercase } => {
                Box::new(WordTokenizer { lowercase: *lowercase })
            }
            TokenizerConfig::Whitespace { lowercase } => {
                Box::new(WhitespaceTokenizer { lowercase: *lowercase })
            }
            TokenizerConfig::Character { lowercase } => {
                Box::new(CharacterTokenizer { lowercase: *lowercase })
            }
            TokenizerConfig::Pretrained { path } => {
                tracing::info!("Loading pretrained tokenizer from '{}'", path.display());
                let tokenizer = PretrainedTokenizer::from_file(path)
                    .context("Cannot build the configured tokenizer")?;
                Box::new(tokenizer)
            }
        };
        tracing::debug!("Using tokenizer {:?}", config);
        Ok(tokenizer)
    }
}
