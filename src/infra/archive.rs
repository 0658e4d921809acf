// ============================================================
// Layer 6 — Dataset Archive
// ============================================================
// Turns the input path into a directory laid out as
//
//   <root>/qa/web-train.json
//   <root>/evidence/web/...
//   <root>/evidence/wikipedia/...
//
// A directory is used in place. Anything else is unpacked as a
// tar archive into a fresh temporary directory; gzip is detected
// from the first two bytes (1f 8b), not from the file name.
//
// The temporary directory is owned by PreparedDataset. Dropping
// it deletes the directory, so early returns and panics clean up
// too; `cleanup` does the same but reports deletion errors.

use anyhow::{Context, Result};
use flate2::read::GzDecoder;
use std::{
    fs::File,
    io::{BufReader, Read, Seek, SeekFrom},
    path::{Path, PathBuf},
};
use tempfile::TempDir;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

pub struct PreparedDataset {
    root:    PathBuf,
    tempdir: Option<TempDir>,
}

impl PreparedDataset {
    /// Use a directory in place or unpack an archive.
    pub fn prepare(input: &Path) -> Result<Self> {
        Self::prepare_in(input, None)
    }

    /// Like [`prepare`](Self::prepare), but archives are unpacked under
    /// `work_dir` instead of the system temp directory.
    pub fn prepare_in(input: &Path, work_dir: Option<&Path>) -> Result<Self> {
        if input.is_dir() {
            tracing::info!("{} is a directory, nothing to unpack", input.display());
            return Ok(Self { root: locate_root(input)?, tempdir: None });
        }

        let mut builder = tempfile::Builder::new();
        builder.prefix("triviaqa-");
        let tempdir = match work_dir {
            Some(dir) => builder.tempdir_in(dir),
            None      => builder.tempdir(),
        }
        .context("Cannot create temporary directory")?;
        tracing::info!("Unpacking {} to {}", input.display(), tempdir.path().display());

        unpack(input, tempdir.path())
            .with_context(|| format!("Cannot unpack archive '{}'", input.display()))?;

        Ok(Self { root: locate_root(tempdir.path())?, tempdir: Some(tempdir) })
    }

    /// The directory containing `qa/` and `evidence/`.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_extracted(&self) -> bool {
        self.tempdir.is_some()
    }

    /// Delete the temporary directory, if any.
    pub fn cleanup(self) -> Result<()> {
        if let Some(tempdir) = self.tempdir {
            let path = tempdir.path().to_path_buf();
            tracing::info!("Cleaning up {}", path.display());
            tempdir
                .close()
                .with_context(|| format!("Cannot remove temporary directory '{}'", path.display()))?;
        }
        Ok(())
    }
}

fn unpack(archive: &Path, target: &Path) -> Result<()> {
    let mut file = File::open(archive)
        .with_context(|| format!("Cannot open '{}'", archive.display()))?;

    let mut magic = [0u8; 2];
    let is_gzip = match file.read_exact(&mut magic) {
        Ok(()) => magic == GZIP_MAGIC,
        Err(_) => false,
    };
    file.seek(SeekFrom::Start(0))?;

    let reader = BufReader::new(file);
    if is_gzip {
        tracing::debug!("Detected gzip compression");
        tar::Archive::new(GzDecoder::new(reader)).unpack(target)?;
    } else {
        tar::Archive::new(reader).unpack(target)?;
    }
    Ok(())
}

/// The dataset root is `base` itself when it holds `qa/`, otherwise
/// the single top-level directory wrapping everything.
fn locate_root(base: &Path) -> Result<PathBuf> {
    if base.join("qa").is_dir() {
        return Ok(base.to_path_buf());
    }

    let entries = std::fs::read_dir(base)
        .with_context(|| format!("Cannot list '{}'", base.display()))?
        .collect::<std::io::Result<Vec<_>>>()?;

    if let [only] = entries.as_slice() {
        let inner = only.path();
        if inner.join("qa").is_dir() {
            tracing::debug!("Dataset is wrapped in {}", inner.display());
            return Ok(inner);
        }
    }

    tracing::warn!("No qa/ directory found under {}", base.display());
    Ok(base.to_path_buf())
}
