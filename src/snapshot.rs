use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

use crate::world::{World, WorldSnapshot};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("snapshot encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Serialize)]
struct SnapshotEnvelope {
    captured_at: String,
    #[serde(flatten)]
    snapshot: WorldSnapshot,
}

/// Writes the full world snapshot to
/// `<dir>/<scenario>/frame_NNNNNN.json` every `interval` frames. Interval 0
/// disables writing entirely.
pub struct SnapshotWriter {
    output_dir: PathBuf,
    interval: u64,
}

impl SnapshotWriter {
    pub fn new(output_dir: impl Into<PathBuf>, interval: u64) -> Self {
        Self {
            output_dir: output_dir.into(),
            interval,
        }
    }

    pub fn maybe_write(&self, world: &World) -> Result<Option<PathBuf>, SnapshotError> {
        if self.interval == 0 {
            return Ok(None);
        }
        let frame = world.frame();
        if frame == 0 || frame % self.interval != 0 {
            return Ok(None);
        }
        let dir = Path::new(&self.output_dir).join(&world.scenario().name);
        fs::create_dir_all(&dir)?;
        let file_path = dir.join(format!("frame_{frame:06}.json"));
        let envelope = SnapshotEnvelope {
            captured_at: chrono::Local::now().to_rfc3339(),
            snapshot: world.snapshot(),
        };
        fs::write(&file_path, serde_json::to_string_pretty(&envelope)?)?;
        tracing::debug!(path = %file_path.display(), frame, "snapshot written");
        Ok(Some(file_path))
    }
}
