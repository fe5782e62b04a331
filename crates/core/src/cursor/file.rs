//! File-backed cursor store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use super::{format_cursor, parse_cursor, CursorError, CursorStore};

/// Stores the cursor as a single line of RFC 3339 text.
///
/// Writes go to a sibling `.tmp` file which is fsynced and renamed over the
/// target, so a crash leaves either the old or the new value on disk.
#[derive(Debug, Clone)]
pub struct FileCursorStore {
    path: PathBuf,
}

impl FileCursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, source: std::io::Error) -> CursorError {
        CursorError::Io {
            location: self.describe(),
            source,
        }
    }
}

#[async_trait]
impl CursorStore for FileCursorStore {
    async fn read(&self) -> Result<Option<DateTime<Utc>>, CursorError> {
        let raw = match fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No cursor file yet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        parse_cursor(&self.describe(), &raw)
    }

    async fn write(&self, cursor: DateTime<Utc>) -> Result<(), CursorError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| self.io_error(e))?;
        }

        let temp_path = self.temp_path();
        let text = format_cursor(cursor);

        let mut file = fs::File::create(&temp_path)
            .await
            .map_err(|e| self.io_error(e))?;
        file.write_all(text.as_bytes())
            .await
            .map_err(|e| self.io_error(e))?;
        file.sync_all().await.map_err(|e| self.io_error(e))?;
        drop(file);

        fs::rename(&temp_path, &self.path)
            .await
            .map_err(|e| self.io_error(e))?;

        debug!(path = %self.path.display(), cursor = %text, "Cursor written");
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
