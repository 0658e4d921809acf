// ============================================================
// Layer 4 — Answer Span Finder
// ============================================================
// TriviaQA is distantly supervised: we know the answer STRINGS
// but not where they occur. Every occurrence of an accepted
// answer in a paragraph's tokens becomes a candidate span.
//
// Matching rules:
//   - compare normalised tokens: lower-case, with punctuation
//     and the quote-like characters ‘ ’ ´ ` _ stripped from
//     both ends
//   - answer text is run through the SAME tokenizer as the
//     paragraphs, so subword models split both sides alike
//     ("Kermit" → [ker] [##mit]); pieces that normalise to
//     nothing are dropped
//   - inside a match the articles "a", "an", "the" may be
//     skipped in the paragraph:
//       answer "Kermit Frog" matches "Kermit the Frog"
//   - spans are INCLUSIVE (start, end) token indices
//
// Example:
//   tokens:  [Kermit] [the] [Frog] [sings]
//   answers: ["kermit frog"]
//   spans:   [(0, 2)]

use std::collections::{BTreeSet, HashMap};

use anyhow::{Context, Result};

use crate::domain::question::TokenSpan;
use crate::domain::token::Token;
use crate::domain::traits::Tokenizer;

const IGNORED_TOKENS: &[&str] = &["a", "an", "the"];

fn is_stripped(c: char) -> bool {
    c.is_ascii_punctuation() || matches!(c, '‘' | '’' | '´' | '`' | '_')
}

fn normalise(text: &str) -> String {
    text.to_lowercase().trim_matches(is_stripped).to_string()
}

/// Tokenise and normalise each answer text. An answer with no
/// pieces left is kept as an empty list and never matches.
pub fn answer_pieces(tokenizer: &dyn Tokenizer, answer_texts: &[String]) -> Result<Vec<Vec<String>>> {
    answer_texts
        .iter()
        .map(|answer| {
            let tokens = tokenizer
                .tokenize(answer)
                .with_context(|| format!("Cannot tokenise answer '{}'", answer))?;
            Ok(tokens
                .iter()
                .map(|t| normalise(&t.text))
                .filter(|piece| !piece.is_empty())
                .collect())
        })
        .collect()
}

/// Find every span of `tokens` that matches one of the tokenised
/// answers from [`answer_pieces`]. The result is sorted and free of
/// duplicates.
pub fn find_answer_spans(tokens: &[Token], answers: &[Vec<String>]) -> Vec<TokenSpan> {
    let normalised: Vec<String> = tokens.iter().map(|t| normalise(&t.text)).collect();

    // Where each normalised word occurs, so only plausible starts are tried
    let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
    for (i, word) in normalised.iter().enumerate() {
        positions.entry(word.as_str()).or_default().push(i);
    }

    let mut spans = BTreeSet::new();

    for answer_words in answers {
        let Some(first) = answer_words.first() else {
            continue;
        };
        let Some(starts) = positions.get(first.as_str()) else {
            continue;
        };

        for &start in starts {
            let mut end     = start;
            let mut matched = 1usize;

            while matched < answer_words.len() && end + 1 < normalised.len() {
                let next = normalised[end + 1].as_str();
                if next == answer_words[matched] {
                    matched += 1;
                    end     += 1;
                } else if IGNORED_TOKENS.contains(&next) {
                    end += 1;
                } else {
                    break;
                }
            }

            if matched == answer_words.len() {
                spans.insert((start, end));
            }
        }
    }

    spans.into_iter().collect()
}
