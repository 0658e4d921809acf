// ============================================================
// Layer 2 — ConvertUseCase
// ============================================================
// Converts a TriviaQA release into one JSONL file per split:
//
//   Step 1: Create the output directory
//   Step 2: Use the input directory or unpack the archive  (Layer 6 - infra)
//   Step 3: Build the configured tokenizer                 (Layer 6 - infra)
//   Step 4: For each split:
//             load qa/<questions_file>                     (Layer 4 - data)
//             build one record per question                (Layer 4 - data)
//             stream records to <output_dir>/<name>.jsonl  (Layer 4 - data)
//   Step 5: Remove the temporary directory                 (Layer 6 - infra)
//
// Reference: Rust Book §13 (Iterators and Closures)

use anyhow::{ensure, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::data::{
    loader::TriviaQaLoader,
    question_builder::QuestionBuilder,
    records::RecordWriter,
    tokenizer::TokenizerConfig,
};
use crate::domain::traits::Tokenizer;
use crate::infra::{archive::PreparedDataset, tokenizer_store::TokenizerStore};

// ─── Conversion Configuration ────────────────────────────────────────────────
/// One questions file and how many ranked paragraphs to keep per question.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplitConfig {
    pub questions_file: String,
    pub topn:           usize,
}

impl SplitConfig {
    pub fn new(questions_file: impl Into<String>, topn: usize) -> Self {
        Self { questions_file: questions_file.into(), topn }
    }

    /// `web-train.json` → `web-train.jsonl`
    pub fn output_name(&self) -> PathBuf {
        Path::new(&self.questions_file).with_extension("jsonl")
    }
}

/// Every key is optional; unknown keys are rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConvertConfig {
    pub tokenizer:            TokenizerConfig,
    pub paragraph_max_tokens: usize,
    pub splits:               Vec<SplitConfig>,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            tokenizer:            TokenizerConfig::default(),
            paragraph_max_tokens: 400,
            splits: vec![
                SplitConfig::new("web-train.json", 4),
                SplitConfig::new("web-dev.json", 15),
            ],
        }
    }
}

impl ConvertConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.paragraph_max_tokens > 0, "paragraph_max_tokens must be positive");
        for split in &self.splits {
            ensure!(
                !split.questions_file.is_empty(),
                "questions_file must not be empty"
            );
        }
        Ok(())
    }
}

/// Counts logged after each split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitSummary {
    pub questions:  usize,
    pub paragraphs: usize,
    pub answered:   usize,
}

// ─── ConvertUseCase ───────────────────────────────────────────────────────────
pub struct ConvertUseCase {
    config:   ConvertConfig,
    /// Where archives are unpacked; the system temp directory if unset
    work_dir: Option<PathBuf>,
}

impl ConvertUseCase {
    pub fn new(config: ConvertConfig) -> Self {
        Self { config, work_dir: None }
    }

    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = Some(dir.into());
        self
    }

    /// Run the conversion and return one summary per split.
    pub fn execute(&self, input: &Path, output_dir: &Path) -> Result<Vec<SplitSummary>> {
        self.config.validate()?;

        // ── Step 1: Output directory ──────────────────────────────────────────
        std::fs::create_dir_all(output_dir).with_context(|| {
            format!("Cannot create output directory '{}'", output_dir.display())
        })?;

        // ── Step 2: Dataset root ──────────────────────────────────────────────
        // Dropping `dataset` on an error path removes the temporary directory
        let dataset = PreparedDataset::prepare_in(input, self.work_dir.as_deref())?;
        let loader  = TriviaQaLoader::new(dataset.root());

        // ── Step 3: Tokenizer ─────────────────────────────────────────────────
        let tokenizer = TokenizerStore::build(&self.config.tokenizer)?;

        // ── Step 4: Splits ────────────────────────────────────────────────────
        let mut summaries = Vec::with_capacity(self.config.splits.len());
        for split in &self.config.splits {
            let summary = self.convert_split(&loader, tokenizer.as_ref(), split, output_dir)?;
            summaries.push(summary);
        }

        // ── Step 5: Cleanup ───────────────────────────────────────────────────
        dataset.cleanup()?;
        Ok(summaries)
    }

    fn convert_split(
        &self,
        loader:     &TriviaQaLoader,
        tokenizer:  &dyn Tokenizer,
        split:      &SplitConfig,
        output_dir: &Path,
    ) -> Result<SplitSummary> {
        tracing::info!("Starting questions file {}", split.questions_file);

        let questions = loader.load_questions(&split.questions_file)?;
        let builder   = QuestionBuilder::new(
            loader,
            tokenizer,
            self.config.paragraph_max_tokens,
            split.topn,
        );

        let output_path = output_dir.join(split.output_name());
        let mut writer  = RecordWriter::create(&output_path)?;
        let mut summary = SplitSummary::default();

        for raw in &questions {
            let question = builder
                .build(raw)
                .with_context(|| format!("Cannot convert question {}", raw.question_id))?;

            summary.paragraphs += question.paragraphs.len();
            summary.answered   += question.paragraphs.answered();
            writer.write(&question)?;
        }
        summary.questions = writer.finish()?;

        tracing::info!(
            "Wrote {}: {} questions, {} paragraphs, {} with answers",
            output_path.display(),
            summary.questions,
            summary.paragraphs,
            summary.answered
        );
        Ok(summary)
    }
}
