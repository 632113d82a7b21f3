//! JSON-lines event log.

use std::fs::File;
use std::io::{BufRead, BufReader, SeekFrom};
use std::path::{Path, PathBuf};
use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::{AsyncReadExt, AsyncSeekExt, AsyncWriteExt};
use tokio::sync::Mutex;

use crate::sink::{EventSink, MonitorEvent, SinkError};

/// Appends one JSON object per line to a file.
pub struct JsonLinesSink {
    path: PathBuf,
    file: Mutex<tokio::fs::File>,
}

impl JsonLinesSink {
    /// Open `path` for appending, creating it if missing.
    ///
    /// A torn last record (no trailing newline) is terminated first so the
    /// next record starts on its own line.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, SinkError> {
        let path = path.as_ref().to_path_buf();
        let mut file = OpenOptions::new()
            .create(true)
            .read(true)
            .append(true)
            .open(&path)
            .await?;

        if file.metadata().await?.len() > 0 {
            let mut last = [0u8; 1];
            file.seek(SeekFrom::End(-1)).await?;
            file.read_exact(&mut last).await?;
            if last[0] != b'\n' {
                tracing::warn!(path = %path.display(), "Event log ends with a partial record");
                file.write_all(b"\n").await?;
                file.flush().await?;
            }
        }

        tracing::info!(path = %path.display(), "Event log opened");
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EventSink for JsonLinesSink {
    async fn append(&self, event: &MonitorEvent) -> Result<(), SinkError> {
        let mut line = serde_json::to_vec(event)?;
        line.push(b'\n');

        // One write per record under the lock keeps lines whole.
        let mut file = self.file.lock().await;
        file.write_all(&line).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Read every event from a JSON-lines log.
///
/// Blank lines are skipped. Truncated records (a write cut short) are skipped
/// with a warning; any other malformed line is an error.
pub fn read_events(path: impl AsRef<Path>) -> Result<Vec<MonitorEvent>, SinkError> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);
    let mut events = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str(&line) {
            Ok(event) => events.push(event),
            Err(e) if e.is_eof() => {
                tracing::warn!(
                    path = %path.display(),
                    line = index + 1,
                    "Skipping truncated event record"
                );
            }
            Err(source) => {
                return Err(SinkError::Decode {
                    line: index + 1,
                    source,
                });
            }
        }
    }

    Ok(events)
}
