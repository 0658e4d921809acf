// ============================================================
// Layer 4 — JSONL Record Writer / Reader
// ============================================================
// Output files hold one Question per line:
//
//   {"id":"qw_1","text":"...","tokens":[...],"paragraphs":{...},...}\n
//   {"id":"qw_2",...}\n
//
// RecordWriter streams records to disk as they are built, so a
// split is never held in memory. RecordReader reads them back
// lazily, re-checking the record invariants on every line.

use anyhow::{Context, Result};
use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Lines, Write},
    path::{Path, PathBuf},
};

use crate::domain::question::Question;

// ─── RecordWriter ─────────────────────────────────────────────────────────────
pub struct RecordWriter {
    path:    PathBuf,
    out:     BufWriter<File>,
    written: usize,
}

impl RecordWriter {
    /// Create (or truncate) the output file.
    pub fn create(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let file = File::create(&path)
            .with_context(|| format!("Cannot create output file '{}'", path.display()))?;
        Ok(Self { path, out: BufWriter::new(file), written: 0 })
    }

    /// Append one record as a single JSON line.
    pub fn write(&mut self, question: &Question) -> Result<()> {
        serde_json::to_writer(&mut self.out, question)
            .with_context(|| format!("Cannot serialise question {}", question.id))?;
        self.out.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }

    /// Flush and return the number of records written.
    pub fn finish(mut self) -> Result<usize> {
        self.out
            .flush()
            .with_context(|| format!("Cannot flush '{}'", self.path.display()))?;
        Ok(self.written)
    }
}

// ─── RecordReader ─────────────────────────────────────────────────────────────
pub struct RecordReader<R> {
    lines:   Lines<R>,
    source:  String,
    line_no: usize,
}

impl RecordReader<BufReader<File>> {
    /// Open a JSONL file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Cannot open records file '{}'", path.display()))?;
        Ok(Self::new(BufReader::new(file), path.display().to_string()))
    }
}

impl<R: BufRead> RecordReader<R> {
    /// Read records from any buffered reader.
    /// `source` only appears in error messages.
    pub fn new(reader: R, source: impl Into<String>) -> Self {
        Self { lines: reader.lines(), source: source.into(), line_no: 0 }
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Question>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            self.line_no += 1;

            let line = match line {
                Ok(line) => line,
                Err(e) => {
                    return Some(Err(e).with_context(|| {
                        format!("{}:{}: read error", self.source, self.line_no)
                    }))
                }
            };
            if line.trim().is_empty() {
                continue;
            }

            let parsed = serde_json::from_str::<Question>(&line)
                .map_err(anyhow::Error::from)
                .and_then(|q| q.validate().map(|_| q))
                .with_context(|| format!("{}:{}: invalid record", self.source, self.line_no));
            return Some(parsed);
        }
    }
}
