// ============================================================
// Layer 4 — TriviaQA Loader
// ============================================================
// Reads the question files and evidence documents of an
// extracted TriviaQA release.
//
// Layout of the release:
//   <root>/
//     qa/
//       web-train.json         ← {"Data": [question, ...], ...}
//       web-dev.json
//       ...
//     evidence/
//       web/<Filename>         ← one search result page per file
//       wikipedia/<Filename>   ← one entity page per file
//
// A question in qa/*.json looks like:
//   {
//     "QuestionId": "qw_1934",
//     "Question": "Which frog ...?",
//     "Answer": {"Value": "Kermit", "Aliases": ["Kermit the Frog"], ...},
//     "SearchResults": [{"Filename": "12/12_1.txt", "Rank": 0, ...}],
//     "EntityPages":   [{"Filename": "Kermit_the_Frog.txt", ...}],
//     ...
//   }
// Fields we do not use are ignored by serde.
//
// Reference: Joshi et al. (2017) TriviaQA

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    io::BufReader,
    path::PathBuf,
};

use crate::domain::document::{Document, EvidenceKind};
use crate::domain::traits::EvidenceSource;

// ─── Raw JSON Schema ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QuestionFile {
    pub data: Vec<RawQuestion>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawQuestion {
    pub question_id: String,
    pub question: String,

    /// Absent in the test splits
    #[serde(default)]
    pub answer: Option<RawAnswer>,

    #[serde(default)]
    pub search_results: Vec<EvidenceRef>,

    #[serde(default)]
    pub entity_pages: Vec<EvidenceRef>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RawAnswer {
    pub value: String,

    #[serde(default)]
    pub aliases: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EvidenceRef {
    pub filename: String,
}

impl RawQuestion {
    /// Primary answer followed by aliases, duplicates removed,
    /// first occurrence wins.
    pub fn answer_texts(&self) -> Vec<String> {
        let Some(answer) = &self.answer else {
            return Vec::new();
        };

        let mut texts: Vec<String> = Vec::with_capacity(answer.aliases.len() + 1);
        for text in std::iter::once(&answer.value).chain(&answer.aliases) {
            if !texts.contains(text) {
                texts.push(text.clone());
            }
        }
        texts
    }

    /// Every evidence file of this question: search results first,
    /// then entity pages.
    pub fn evidence(&self) -> impl Iterator<Item = (EvidenceKind, &str)> {
        self.search_results
            .iter()
            .map(|r| (EvidenceKind::Web, r.filename.as_str()))
            .chain(
                self.entity_pages
                    .iter()
                    .map(|r| (EvidenceKind::Wikipedia, r.filename.as_str())),
            )
    }
}

// ─── TriviaQaLoader ───────────────────────────────────────────────────────────
/// Reads questions and evidence from an extracted release directory.
pub struct TriviaQaLoader {
    root: PathBuf,
}

impl TriviaQaLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Parse `<root>/qa/<questions_file>`.
    pub fn load_questions(&self, questions_file: &str) -> Result<Vec<RawQuestion>> {
        let path = self.root.join("qa").join(questions_file);
        let file = fs::File::open(&path)
            .with_context(|| format!("Cannot open questions file '{}'", path.display()))?;

        let parsed: QuestionFile = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Cannot parse questions file '{}'", path.display()))?;

        tracing::info!("Read {} questions from '{}'", parsed.data.len(), path.display());
        Ok(parsed.data)
    }

    fn evidence_path(&self, kind: EvidenceKind, filename: &str) -> PathBuf {
        self.root.join("evidence").join(kind.dir_name()).join(filename)
    }
}

impl EvidenceSource for TriviaQaLoader {
    fn load_document(&self, kind: EvidenceKind, filename: &str) -> Result<Option<Document>> {
        let path = self.evidence_path(kind, filename);

        if !path.is_file() {
            tracing::warn!("Skipping missing evidence file '{}'", path.display());
            return Ok(None);
        }

        // Evidence is scraped text; replace invalid UTF-8 instead of failing
        let bytes = fs::read(&path)
            .with_context(|| format!("Cannot read evidence file '{}'", path.display()))?;
        let text  = String::from_utf8_lossy(&bytes).into_owned();

        tracing::debug!("Loaded evidence '{}' ({} chars)", filename, text.chars().count());
        Ok(Some(Document::new(filename, kind, text)))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    const QUESTIONS: &str = r#"{
        "Data": [{
            "QuestionId": "qw_1",
            "Question": "Which frog plays the banjo?",
            "QuestionSource": "http://example.org",
            "Answer": {"Value": "Kermit", "Aliases": ["Kermit the Frog", "Kermit"], "Type": "WikipediaEntity"},
            "SearchResults": [{"Filename": "1/1_0.txt", "Rank": 0, "Title": "Frogs"}],
            "EntityPages": [{"Filename": "Kermit.txt", "DocSource": "TagMe"}]
        }, {
            "QuestionId": "qw_2",
            "Question": "Unanswered?"
        }],
        "Domain": "Web",
        "Split": "train"
    }"#;

    fn write_release(dir: &Path) {
        fs::create_dir_all(dir.join("qa")).unwrap();
        fs::create_dir_all(dir.join("evidence/web/1")).unwrap();
        fs::create_dir_all(dir.join("evidence/wikipedia")).unwrap();
        fs::write(dir.join("qa/web-train.json"), QUESTIONS).unwrap();
        fs::write(dir.join("evidence/web/1/1_0.txt"), "Frogs live in ponds.").unwrap();
    }

    #[test]
    fn test_load_questions() {
        let dir = tempfile::tempdir().unwrap();
        write_release(dir.path());

        let questions = TriviaQaLoader::new(dir.path()).load_questions("web-train.json").unwrap();
        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].question_id, "qw_1");
        assert_eq!(questions[0].answer_texts(), vec!["Kermit", "Kermit the Frog"]);
        assert!(questions[1].answer_texts().is_empty());
        assert_eq!(questions[1].evidence().count(), 0);
    }

    #[test]
    fn test_evidence_order() {
        let file: QuestionFile = serde_json::from_str(QUESTIONS).unwrap();
        let evidence: Vec<_> = file.data[0].evidence().collect();
        assert_eq!(
            evidence,
            vec![(EvidenceKind::Web, "1/1_0.txt"), (EvidenceKind::Wikipedia, "Kermit.txt")]
        );
    }

    #[test]
    fn test_missing_questions_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(TriviaQaLoader::new(dir.path()).load_questions("web-dev.json").is_err());
    }

    #[test]
    fn test_missing_evidence_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write_release(dir.path());
        let loader = TriviaQaLoader::new(dir.path());

        let found = loader.load_document(EvidenceKind::Web, "1/1_0.txt").unwrap();
        assert_eq!(found.unwrap().text, "Frogs live in ponds.");

        let missing = loader.load_document(EvidenceKind::Wikipedia, "Kermit.txt").unwrap();
        assert!(missing.is_none());
    }

    #[test]
    fn test_non_ascii_evidence_is_read_as_characters() {
        let dir = tempfile::tempdir().unwrap();
        write_release(dir.path());
        fs::write(dir.path().join("evidence/wikipedia/Café.txt"), b"Caf\xc3\xa9 \xe2\x99\xaa\xff").unwrap();

        let doc = TriviaQaLoader::new(dir.path())
            .load_document(EvidenceKind::Wikipedia, "Café.txt")
            .unwrap()
            .unwrap();
        assert_eq!(doc.text, "Café ♪\u{FFFD}");
        assert_eq!(doc.text.chars().count(), 7);
        assert_ne!(doc.text.len(), 7);
    }
}
