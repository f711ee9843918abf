//! Match and training statistics persistence.
//!
//! Results are written as pretty JSON with a write-then-rename so a reader
//! never sees a half-written file.

use std::path::Path;

use agents::write_atomic;
use anyhow::{Context, Result};
use serde::Serialize;
use tracing::debug;

/// Write `value` to `path` as pretty JSON (atomic write-then-rename).
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize stats")?;
    write_atomic(path, json.as_bytes())
        .with_context(|| format!("Failed to write stats to {}", path.display()))?;

    debug!("Wrote stats to {}", path.display());
    Ok(())
}
