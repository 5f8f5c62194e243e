use std::path::{Path, PathBuf};
use std::time::SystemTime;

use walkdir::WalkDir;

use crate::error::PipelineError;

/// File extensions treated as recordings.
pub const AUDIO_EXTENSIONS: &[&str] = &["mp3", "wav", "m4a", "ogg"];

/// An audio recording loaded into memory.
#[derive(Debug, Clone)]
pub struct AudioClip {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

impl AudioClip {
    /// Read the recording at `path`.
    pub fn load(path: &Path) -> Result<Self, PipelineError> {
        if !path.is_file() {
            return Err(PipelineError::SourceNotFound(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| match source.kind() {
            std::io::ErrorKind::NotFound => PipelineError::SourceNotFound(path.to_path_buf()),
            _ => PipelineError::SourceUnreadable {
                path: path.to_path_buf(),
                source,
            },
        })?;
        Ok(Self {
            path: path.to_path_buf(),
            bytes,
        })
    }

    /// File name shown in report titles, e.g. `standup.m4a`.
    pub fn label(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// File name without extension, used to name report files.
    pub fn base_name(&self) -> String {
        self.path
            .file_stem()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| "recording".to_string())
    }
}

fn is_audio_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            AUDIO_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

/// The most recently modified recording directly inside `dir`, if any.
pub fn latest_recording(dir: &Path) -> Option<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::debug!("Skipping walk error: {e}");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file() && is_audio_file(entry.path()))
        .map(|entry| {
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .unwrap_or(SystemTime::UNIX_EPOCH);
            (modified, entry.into_path())
        })
        .max_by(|a, b| a.0.cmp(&b.0))
        .map(|(_, path)| path)
}
