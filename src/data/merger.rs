// ============================================================
// Layer 4 — Paragraph Merger
// ============================================================
// Evidence documents are split one paragraph per line, and many
// of those lines are tiny (headings, captions, list items).
// Ranking them one by one favours fragments, so consecutive
// paragraphs of the same document are glued together until a
// token budget is reached.
//
// Example with max_tokens = 5:
//   "A B"  "C D"  "E F G H"  "I"
//   → "A B\nC D"   (4 tokens; adding "E F G H" would make 8)
//   → "E F G H\nI" (5 tokens)
//
// A paragraph longer than the budget on its own is kept whole.
//
// Paragraphs are tokenised BEFORE merging; the tokens of each
// appended paragraph are shifted by the character length of
// the text already merged (+1 for the '\n' separator) so every
// offset still points into the merged text.
//
// Reference: Clark & Gardner (2018) Simple and Effective
//            Multi-Paragraph Reading Comprehension

use crate::domain::token::Token;

/// A paragraph together with its tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenizedParagraph {
    pub text:   String,
    pub tokens: Vec<Token>,
}

impl TokenizedParagraph {
    pub fn new(text: impl Into<String>, tokens: Vec<Token>) -> Self {
        Self { text: text.into(), tokens }
    }

    /// Append another paragraph after a newline, shifting its offsets.
    fn append(&mut self, other: TokenizedParagraph) {
        let delta = self.text.chars().count() + 1;
        self.text.push('\n');
        self.text.push_str(&other.text);
        self.tokens
            .extend(other.tokens.iter().map(|t| t.shifted(delta)));
    }
}

pub struct ParagraphMerger {
    /// Upper bound on tokens per merged paragraph
    max_tokens: usize,
}

impl ParagraphMerger {
    /// Create a new ParagraphMerger.
    ///
    /// # Panics
    /// Panics if max_tokens is 0; the config loader rejects that value.
    pub fn new(max_tokens: usize) -> Self {
        assert!(max_tokens > 0, "max_tokens must be positive");
        Self { max_tokens }
    }

    /// Merge the paragraphs of ONE document, preserving order.
    /// Paragraphs without tokens are dropped.
    pub fn merge(&self, paragraphs: Vec<TokenizedParagraph>) -> Vec<TokenizedParagraph> {
        let mut merged: Vec<TokenizedParagraph> = Vec::new();
        let mut current: Option<TokenizedParagraph> = None;

        for paragraph in paragraphs.into_iter().filter(|p| !p.tokens.is_empty()) {
            current = match current.take() {
                Some(mut cur) if cur.tokens.len() + paragraph.tokens.len() <= self.max_tokens => {
                    cur.append(paragraph);
                    Some(cur)
                }
                Some(cur) => {
                    merged.push(cur);
                    Some(paragraph)
                }
                None => Some(paragraph),
            };
        }

        merged.extend(current);
        merged
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::tokenizer::WhitespaceTokenizer;
    use crate::domain::traits::Tokenizer;

    fn para(text: &str) -> TokenizedParagraph {
        let tokens = WhitespaceTokenizer::default().tokenize(text).unwrap();
        TokenizedParagraph::new(text, tokens)
    }

    fn texts(merged: &[TokenizedParagraph]) -> Vec<&str> {
        merged.iter().map(|p| p.text.as_str()).collect()
    }

    #[test]
    fn test_merges_up_to_budget() {
        let merger = ParagraphMerger::new(5);
        let merged = merger.merge(vec![para("A B"), para("C D"), para("E F G H"), para("I")]);
        assert_eq!(texts(&merged), vec!["A B\nC D", "E F G H\nI"]);
    }

    #[test]
    fn test_shifts_offsets_into_merged_text() {
        let merger = ParagraphMerger::new(10);
        let merged = merger.merge(vec![para("ab cd"), para("ef")]);
        assert_eq!(merged.len(), 1);
        // "ab cd\nef" → "ef" starts at char 6
        assert_eq!(merged[0].tokens[2], Token::new("ef", 6));

        let retokenised = WhitespaceTokenizer::default().tokenize(&merged[0].text).unwrap();
        assert_eq!(merged[0].tokens, retokenised);
    }

    #[test]
    fn test_long_paragraph_stands_alone() {
        let merger = ParagraphMerger::new(2);
        let merged = merger.merge(vec![para("a"), para("b c d e"), para("f")]);
        assert_eq!(texts(&merged), vec!["a", "b c d e", "f"]);
    }

    #[test]
    fn test_drops_empty_paragraphs() {
        let merger = ParagraphMerger::new(4);
        let merged = merger.merge(vec![TokenizedParagraph::new("", vec![]), para("x")]);
        assert_eq!(texts(&merged), vec!["x"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(ParagraphMerger::new(4).merge(Vec::new()).is_empty());
    }

    #[test]
    #[should_panic]
    fn test_zero_budget_panics() {
        let _ = ParagraphMerger::new(0);
    }
}
