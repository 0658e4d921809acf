// ============================================================
// Layer 1 — CLI / Presentation Layer
// ============================================================
// Parses the command line with `clap` and hands off to Layer 2.
//
//   triviaqa-prep [--work-dir DIR] <CONFIG> <INPUT> <OUTPUT_DIR>
//
//   CONFIG     — JSON conversion config ("{}" for the defaults)
//   INPUT      — triviaqa-rc.tar.gz, a plain tar, or an
//                already extracted directory
//   OUTPUT_DIR — receives one <split>.jsonl per questions file
//   --work-dir — where archives are unpacked (system temp dir
//                by default)
//
// Reference: Rust Book §12 (CLI programs)

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::application::convert_use_case::{ConvertConfig, ConvertUseCase};
use crate::infra::config_store::load_json;

#[derive(Parser, Debug)]
#[command(
    name = "triviaqa-prep",
    version,
    about = "Convert the TriviaQA reading-comprehension release into JSONL records."
)]
pub struct Cli {
    /// JSON configuration file
    pub config: PathBuf,

    /// Dataset archive or directory
    pub input: PathBuf,

    /// Directory for the .jsonl output files
    pub output_dir: PathBuf,

    /// Unpack archives here instead of the system temp directory
    #[arg(long)]
    pub work_dir: Option<PathBuf>,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let config: ConvertConfig = load_json(&self.config)?;
        tracing::debug!("Conversion config: {:?}", config);

        let mut use_case = ConvertUseCase::new(config);
        if let Some(dir) = &self.work_dir {
            use_case = use_case.with_work_dir(dir);
        }
        let summaries = use_case.execute(&self.input, &self.output_dir)?;

        let total: usize = summaries.iter().map(|s| s.questions).sum();
        println!("Wrote {} questions to {}", total, self.output_dir.display());
        Ok(())
    }
}
