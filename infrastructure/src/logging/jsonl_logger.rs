//! JSONL transcript writer for conversation events.
//!
//! Each [`ConversationEvent`] becomes one JSON line carrying `type`,
//! `timestamp` and `session` fields. The file is opened in append mode so
//! transcripts from successive runs accumulate.

use naomi_application::ports::conversation_logger::{ConversationEvent, ConversationLogger};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::warn;

/// Transcript logger that writes one JSON object per line.
///
/// Thread-safe via `Mutex<BufWriter<File>>`. Flushes after every event and
/// on `Drop`.
pub struct JsonlConversationLogger {
    writer: Mutex<BufWriter<File>>,
    path: PathBuf,
    session: String,
}

impl JsonlConversationLogger {
    /// Open (or create) the transcript at `path`.
    ///
    /// Creates parent directories as needed. Returns `None` if the file
    /// cannot be opened; the caller falls back to no transcript.
    pub fn new(path: impl AsRef<Path>) -> Option<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            warn!(
                "Could not create transcript directory {}: {}",
                parent.display(),
                e
            );
            return None;
        }

        let file = match OpenOptions::new().create(true).append(true).open(path) {
            Ok(f) => f,
            Err(e) => {
                warn!("Could not open transcript {}: {}", path.display(), e);
                return None;
            }
        };

        Some(Self {
            writer: Mutex::new(BufWriter::new(file)),
            path: path.to_path_buf(),
            session: chrono::Utc::now().format("%Y%m%dT%H%M%S%.3fZ").to_string(),
        })
    }

    /// Get the path to the transcript.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Identifier stamped on every line written by this logger.
    pub fn session(&self) -> &str {
        &self.session
    }
}

impl ConversationLogger for JsonlConversationLogger {
    fn log(&self, event: ConversationEvent) {
        let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true);

        let mut record = match event.payload {
            serde_json::Value::Object(map) => map,
            other => {
                let mut map = serde_json::Map::new();
                map.insert("data".to_string(), other);
                map
            }
        };
        record.insert("type".to_string(), event.event_type.into());
        record.insert("timestamp".to_string(), timestamp.into());
        record.insert("session".to_string(), self.session.clone().into());

        let Ok(line) = serde_json::to_string(&record) else {
            return;
        };

        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", line);
            let _ = writer.flush();
        }
    }
}

impl Drop for JsonlConversationLogger {
    fn drop(&mut self) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writer.flush();
        }
    }
}
