//! Append-only measurement log.

use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

use crate::state::StoreError;

/// Appender for the tab-separated measurement log.
///
/// One line per ingested measurement: RFC 3339 UTC timestamp, a tab, the
/// weight. Entries are strictly append-order and never rewritten; appends
/// are serialized internally so concurrent submissions cannot interleave
/// within a line.
pub struct MeasurementLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl MeasurementLog {
    /// Create an appender for the log file at `path`. The file is created
    /// on first append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the underlying log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one entry stamped with the current time.
    pub async fn append(&self, weight: f64) -> Result<(), StoreError> {
        self.append_at(Utc::now(), weight).await
    }

    /// Append one entry with an explicit timestamp.
    pub async fn append_at(&self, at: DateTime<Utc>, weight: f64) -> Result<(), StoreError> {
        let line = format!(
            "{}\t{}\n",
            at.to_rfc3339_opts(SecondsFormat::Secs, true),
            weight
        );

        let _guard = self.lock.lock().await;
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[tokio::test]
    async fn appends_one_tab_separated_line_per_measurement() {
        let dir = tempfile::tempdir().unwrap();
        let log = MeasurementLog::new(dir.path().join("measurements.log"));

        let t0 = Utc.with_ymd_and_hms(2026, 8, 7, 12, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2026, 8, 7, 12, 5, 0).unwrap();
        log.append_at(t0, 12.5).await.unwrap();
        log.append_at(t1, 11.0).await.unwrap();

        let content = tokio::fs::read_to_string(log.path()).await.unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "2026-08-07T12:00:00Z\t12.5");
        assert_eq!(lines[1], "2026-08-07T12:05:00Z\t11");
    }

    #[tokio::test]
    async fn append_creates_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let log = MeasurementLog::new(dir.path().join("fresh.log"));

        log.append(0.0).await.unwrap();

        assert!(log.path().exists());
    }
}
