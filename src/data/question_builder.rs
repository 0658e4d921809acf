// ============================================================
// Layer 4 — Question Builder
// ============================================================
// Turns one raw TriviaQA question into one output record.
//
//   RawQuestion
//       │
//       ▼
//   Tokenizer           → question tokens
//       │
//       ▼
//   EvidenceSource      → evidence documents (missing ones skipped)
//       │
//       ▼
//   Preprocessor        → clean paragraphs per document
//       │
//       ▼
//   Tokenizer           → tokens per paragraph
//       │
//       ▼
//   ParagraphMerger     → merged paragraphs per document
//       │
//       ▼
//   TfIdfRanker         → all merged paragraphs, best first, top N kept
//       │
//       ▼
//   find_answer_spans   → spans + has_answers per paragraph
//       │
//       ▼
//   Question            → validated record

use anyhow::{Context, Result};

use crate::data::{
    answer_spans::{answer_pieces, find_answer_spans},
    loader::RawQuestion,
    merger::{ParagraphMerger, TokenizedParagraph},
    preprocessor::Preprocessor,
    ranker::TfIdfRanker,
};
use crate::domain::{
    question::{Paragraphs, Question},
    traits::{EvidenceSource, Tokenizer},
};

pub struct QuestionBuilder<'a> {
    source:       &'a dyn EvidenceSource,
    tokenizer:    &'a dyn Tokenizer,
    preprocessor: Preprocessor,
    merger:       ParagraphMerger,
    ranker:       TfIdfRanker,
    /// How many ranked paragraphs to keep per question
    topn:         usize,
}

impl<'a> QuestionBuilder<'a> {
    pub fn new(
        source:               &'a dyn EvidenceSource,
        tokenizer:            &'a dyn Tokenizer,
        paragraph_max_tokens: usize,
        topn:                 usize,
    ) -> Self {
        Self {
            source,
            tokenizer,
            preprocessor: Preprocessor::new(),
            merger:       ParagraphMerger::new(paragraph_max_tokens),
            ranker:       TfIdfRanker::new(),
            topn,
        }
    }

    /// Load, split, tokenise and merge every evidence document of a question.
    fn merged_paragraphs(&self, raw: &RawQuestion) -> Result<Vec<TokenizedParagraph>> {
        let mut merged = Vec::new();

        for (kind, filename) in raw.evidence() {
            let Some(doc) = self.source.load_document(kind, filename)? else {
                continue;
            };

            let paragraphs = self
                .preprocessor
                .paragraphs(&doc.text)
                .into_iter()
                .map(|text| -> Result<TokenizedParagraph> {
                    let tokens = self.tokenizer.tokenize(&text)?;
                    Ok(TokenizedParagraph::new(text, tokens))
                })
                .collect::<Result<Vec<_>>>()
                .with_context(|| format!("Cannot tokenise evidence '{}'", doc.source))?;

            // Merging never crosses a document boundary
            merged.extend(self.merger.merge(paragraphs));
        }

        Ok(merged)
    }

    /// Build the output record for one question.
    pub fn build(&self, raw: &RawQuestion) -> Result<Question> {
        let tokens = self
            .tokenizer
            .tokenize(&raw.question)
            .with_context(|| format!("Cannot tokenise question {}", raw.question_id))?;
        let answer_texts = raw.answer_texts();
        let answers = answer_pieces(self.tokenizer, &answer_texts)
            .with_context(|| format!("Cannot tokenise answers of {}", raw.question_id))?;

        let mut candidates: Vec<Option<TokenizedParagraph>> = self
            .merged_paragraphs(raw)?
            .into_iter()
            .map(Some)
            .collect();

        let ranked = {
            let token_lists: Vec<&[_]> = candidates
                .iter()
                .flatten()
                .map(|p| p.tokens.as_slice())
                .collect();
            self.ranker.rank(&tokens, &token_lists)
        };

        let mut paragraphs = Paragraphs::default();
        for (index, score) in ranked.into_iter().take(self.topn) {
            // Each index appears once in the ranking, so take() always succeeds
            let Some(paragraph) = candidates[index].take() else {
                continue;
            };
            tracing::trace!("{}: paragraph {} score {:.4}", raw.question_id, index, score);

            let spans = find_answer_spans(&paragraph.tokens, &answers);
            paragraphs.push(paragraph.text, paragraph.tokens, spans);
        }

        let question = Question {
            id: raw.question_id.clone(),
            text: raw.question.clone(),
            tokens,
            paragraphs,
            answer_texts,
        };
        question.validate()?;
        Ok(question)
    }
}
