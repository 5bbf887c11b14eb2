//! Append-only JSON lines audit file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::domain::AuditRecord;
use crate::domain::ports::{AuditSink, AuditSinkError};

/// Appends one JSON document per line to a file opened in append mode.
///
/// Writes are serialised so concurrent requests never interleave lines.
pub struct JsonLinesAuditSink {
    path: PathBuf,
    file: Mutex<File>,
}

impl JsonLinesAuditSink {
    /// Open (or create) the log at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`AuditSinkError::Unavailable`] when the file cannot be opened.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AuditSinkError> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await
            .map_err(|err| AuditSinkError::unavailable(format!("{}: {err}", path.display())))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Location of the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AuditSink for JsonLinesAuditSink {
    async fn append(&self, record: &AuditRecord) -> Result<(), AuditSinkError> {
        let mut line = serde_json::to_vec(record)
            .map_err(|err| AuditSinkError::encoding(err.to_string()))?;
        line.push(b'\n');

        let mut file = self.file.lock().await;
        file.write_all(&line)
            .await
            .map_err(|err| AuditSinkError::unavailable(err.to_string()))?;
        file.flush()
            .await
            .map_err(|err| AuditSinkError::unavailable(err.to_string()))
    }
}
