// ============================================================
// Layer 3 — Question Record
// ============================================================
// The unit of output: one line of JSONL per source question.
//
//   {
//     "id": "qw_1934",
//     "text": "what is the ... ?",
//     "tokens": [["what", 0], ...],
//     "paragraphs": {
//       "text":        ["first paragraph...", ...],
//       "tokens":      [[["first", 0], ...], ...],
//       "token_spans": [[[62, 63]], ...],
//       "has_answers": [1, ...]
//     },
//     "answer_texts": ["primary answer", "alternative answer"]
//   }
//
// Spans are INCLUSIVE token indices into the paragraph's own
// token list: (3, 5) covers tokens 3, 4 and 5.
//
// Reference: Joshi et al. (2017) TriviaQA

use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use crate::domain::token::{offsets_are_monotonic, Token};

/// An inclusive `(start, end)` token span.
pub type TokenSpan = (usize, usize);

/// A fully processed question, ready to be written as one JSON line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    /// The TriviaQA `QuestionId`
    pub id: String,

    /// The raw question text
    pub text: String,

    /// The tokenised question
    pub tokens: Vec<Token>,

    /// Selected evidence paragraphs, in ranked order
    pub paragraphs: Paragraphs,

    /// Accepted answers: primary value first, then aliases
    pub answer_texts: Vec<String>,
}

/// Column-oriented paragraph data. Every field has one entry per paragraph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Paragraphs {
    pub text:        Vec<String>,
    pub tokens:      Vec<Vec<Token>>,
    pub token_spans: Vec<Vec<TokenSpan>>,

    /// Whether each paragraph contains at least one answer span.
    /// Written as 0 / 1 integers.
    #[serde(with = "flags_as_ints")]
    pub has_answers: Vec<bool>,
}

impl Paragraphs {
    /// Append one paragraph. `has_answers` is derived from the spans
    /// so the two columns cannot disagree.
    pub fn push(&mut self, text: String, tokens: Vec<Token>, spans: Vec<TokenSpan>) {
        self.has_answers.push(!spans.is_empty());
        self.text.push(text);
        self.tokens.push(tokens);
        self.token_spans.push(spans);
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Number of paragraphs containing an answer
    pub fn answered(&self) -> usize {
        self.has_answers.iter().filter(|&&h| h).count()
    }
}

/// One (question, paragraph) pair, the shape a reading-comprehension
/// model consumes. Produced by flattening a Question.
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphInstance {
    pub question_id:     String,
    pub question_tokens: Vec<Token>,
    pub paragraph_index: usize,
    pub paragraph_text:  String,
    pub paragraph_tokens: Vec<Token>,
    pub token_spans:     Vec<TokenSpan>,
    pub has_answer:      bool,
    pub answer_texts:    Vec<String>,
}

impl Question {
    /// Check the record invariants. Called before a record is written
    /// and after one is read back.
    pub fn validate(&self) -> Result<()> {
        let p = &self.paragraphs;
        let n = p.text.len();

        ensure!(
            p.tokens.len() == n && p.token_spans.len() == n && p.has_answers.len() == n,
            "question {}: paragraph columns disagree (text={}, tokens={}, token_spans={}, has_answers={})",
            self.id, n, p.tokens.len(), p.token_spans.len(), p.has_answers.len()
        );
        ensure!(
            offsets_are_monotonic(&self.tokens),
            "question {}: question token offsets are not monotonic", self.id
        );

        for i in 0..n {
            let tokens = &p.tokens[i];
            ensure!(
                offsets_are_monotonic(tokens),
                "question {}: paragraph {} token offsets are not monotonic", self.id, i
            );
            for &(start, end) in &p.token_spans[i] {
                ensure!(
                    start <= end && end < tokens.len(),
                    "question {}: paragraph {} span ({}, {}) is out of range for {} tokens",
                    self.id, i, start, end, tokens.len()
                );
            }
            ensure!(
                p.has_answers[i] == !p.token_spans[i].is_empty(),
                "question {}: paragraph {} has_answers flag disagrees with its spans", self.id, i
            );
        }
        Ok(())
    }

    /// Flatten into one instance per paragraph, in paragraph order.
    pub fn paragraph_instances(&self) -> Vec<ParagraphInstance> {
        let p = &self.paragraphs;
        (0..p.len())
            .map(|i| ParagraphInstance {
                question_id:      self.id.clone(),
                question_tokens:  self.tokens.clone(),
                paragraph_index:  i,
                paragraph_text:   p.text[i].clone(),
                paragraph_tokens: p.tokens[i].clone(),
                token_spans:      p.token_spans[i].clone(),
                has_answer:       p.has_answers[i],
                answer_texts:     self.answer_texts.clone(),
            })
            .collect()
    }
}

/// serde adapter: `Vec<bool>` on the Rust side, `[0, 1, ...]` in JSON.
mod flags_as_ints {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(flags: &[bool], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(flags.iter().map(|&f| u8::from(f)))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<bool>, D::Error> {
        let ints = Vec::<u8>::deserialize(deserializer)?;
        Ok(ints.into_iter().map(|i| i != 0).collect())
    }
}
