// ============================================================
// Layer 4 — TF-IDF Paragraph Ranker
// ============================================================
// Scores each merged paragraph of a question against the
// question text and sorts them best first. Only the top N of
// the sorted list end up in the output record.
//
//   term       = lower-cased token, punctuation stripped,
//                stop words and empty strings removed
//   tf(t, p)   = raw count of t in paragraph p
//   idf(t)     = ln((1 + n) / (1 + df(t))) + 1
//                n = number of paragraphs, df = paragraphs containing t
//   score(p)   = cosine(tfidf(question), tfidf(p))
//
// The IDF is fitted on the paragraphs of ONE question, so a word
// that shows up in every paragraph ("Kermit" for a Kermit
// question) is down-weighted against rarer words.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::domain::token::Token;

/// The standard English stop-word list of scikit-learn's TfidfVectorizer.
const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "across", "after", "afterwards", "again", "against",
    "all", "almost", "alone", "along", "already", "also", "although", "always",
    "am", "among", "amongst", "amoungst", "amount", "an", "and", "another",
    "any", "anyhow", "anyone", "anything", "anyway", "anywhere", "are",
    "around", "as", "at", "back", "be", "became", "because", "become",
    "becomes", "becoming", "been", "before", "beforehand", "behind", "being",
    "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
    "but", "by", "call", "can", "cannot", "cant", "co", "con", "could",
    "couldnt", "cry", "de", "describe", "detail", "do", "done", "down", "due",
    "during", "each", "eg", "eight", "either", "eleven", "else", "elsewhere",
    "empty", "enough", "etc", "even", "ever", "every", "everyone", "everything",
    "everywhere", "except", "few", "fifteen", "fifty", "fill", "find", "fire",
    "first", "five", "for", "former", "formerly", "forty", "found", "four",
    "from", "front", "full", "further", "get", "give", "go", "had", "has",
    "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby",
    "herein", "hereupon", "hers", "herself", "him", "himself", "his", "how",
    "however", "hundred", "i", "ie", "if", "in", "inc", "indeed", "interest",
    "into", "is", "it", "its", "itself", "keep", "last", "latter", "latterly",
    "least", "less", "ltd", "made", "many", "may", "me", "meanwhile", "might",
    "mill", "mine", "more", "moreover", "most", "mostly", "move", "much",
    "must", "my", "myself", "name", "namely", "neither", "never",
    "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor",
    "not", "nothing", "now", "nowhere", "of", "off", "often", "on", "once",
    "one", "only", "onto", "or", "other", "others", "otherwise", "our", "ours",
    "ourselves", "out", "over", "own", "part", "per", "perhaps", "please",
    "put", "rather", "re", "same", "see", "seem", "seemed", "seeming", "seems",
    "serious", "several", "she", "should", "show", "side", "since", "sincere",
    "six", "sixty", "so", "some", "somehow", "someone", "something", "sometime",
    "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
    "that", "the", "their", "them", "themselves", "then", "thence", "there",
    "thereafter", "thereby", "therefore", "therein", "thereupon", "these",
    "they", "thick", "thin", "third", "this", "those", "though", "three",
    "through", "throughout", "thru", "thus", "to", "together", "too", "top",
    "toward", "towards", "twelve", "twenty", "two", "un", "under", "until",
    "up", "upon", "us", "very", "via", "was", "we", "well", "were", "what",
    "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
    "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while",
    "whither", "who", "whoever", "whole", "whom", "whose", "why", "will",
    "with", "within", "without", "would", "yet", "you", "your", "yours",
    "yourself", "yourselves",
];

/// Term counts of one text, in first-seen order.
type TermCounts = IndexMap<String, f64>;

pub struct TfIdfRanker {
    stop_words: HashSet<&'static str>,
}

impl TfIdfRanker {
    pub fn new() -> Self {
        Self { stop_words: STOP_WORDS.iter().copied().collect() }
    }

    fn term_counts(&self, tokens: &[Token]) -> TermCounts {
        let mut counts = TermCounts::new();
        for token in tokens {
            let lower = token.text.to_lowercase();
            let term  = lower.trim_matches(|c: char| !c.is_alphanumeric());
            if term.is_empty() || self.stop_words.contains(term) {
                continue;
            }
            *counts.entry(term.to_string()).or_insert(0.0) += 1.0;
        }
        counts
    }

    /// Weight counts by IDF and L2-normalise.
    fn tfidf(counts: &TermCounts, idf: impl Fn(&str) -> f64) -> TermCounts {
        let mut weighted: TermCounts = counts
            .iter()
            .map(|(term, tf)| (term.clone(), tf * idf(term)))
            .collect();

        let norm = weighted.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            weighted.values_mut().for_each(|w| *w /= norm);
        }
        weighted
    }

    /// Rank paragraphs against the question.
    ///
    /// Returns (paragraph index, score) sorted by descending score.
    /// Equal scores keep their original order.
    pub fn rank(&self, question: &[Token], paragraphs: &[&[Token]]) -> Vec<(usize, f64)> {
        let paragraph_counts: Vec<TermCounts> = paragraphs
            .iter()
            .map(|tokens| self.term_counts(tokens))
            .collect();

        // Document frequency over this question's paragraphs
        let mut doc_freq: IndexMap<&str, usize> = IndexMap::new();
        for counts in &paragraph_counts {
            for term in counts.keys() {
                *doc_freq.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        let n   = paragraphs.len() as f64;
        let idf = |term: &str| {
            let df = doc_freq.get(term).copied().unwrap_or(0) as f64;
            ((1.0 + n) / (1.0 + df)).ln() + 1.0
        };

        let query = Self::tfidf(&self.term_counts(question), &idf);

        let mut scored: Vec<(usize, f64)> = paragraph_counts
            .iter()
            .enumerate()
            .map(|(i, counts)| {
                let doc   = Self::tfidf(counts, &idf);
                let score = query
                    .iter()
                    .filter_map(|(term, q)| doc.get(term).map(|d| q * d))
                    .sum::<f64>();
                (i, score)
            })
            .collect();

        // sort_by is stable, so ties stay in document order
        scored.sort_by(|a, b| b.1.total_cmp(&a.1));
        scored
    }
}

impl Default for TfIdfRanker {
    fn default() -> Self {
        Self::new()
    }
}
