//! JSON-lines game transcripts.
//!
//! Each line is one [`SuccessorRecord`]: the game before the move, the move,
//! and the game after it. Games are separated by the records themselves; a
//! record whose `STATE` is an opening position starts a new game.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use games_morris::SuccessorRecord;

pub struct Transcript {
    path: PathBuf,
    writer: BufWriter<File>,
    records: u64,
}

impl Transcript {
    /// Create (or truncate) the transcript file.
    pub fn create(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let file = File::create(path)
            .with_context(|| format!("Failed to create transcript {}", path.display()))?;
        Ok(Self {
            path: path.to_path_buf(),
            writer: BufWriter::new(file),
            records: 0,
        })
    }

    pub fn write(&mut self, record: &SuccessorRecord) -> Result<()> {
        serde_json::to_writer(&mut self.writer, record)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        self.writer.write_all(b"\n")?;
        self.records += 1;
        Ok(())
    }

    pub fn finish(mut self) -> Result<u64> {
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))?;
        Ok(self.records)
    }
}
