//! JSON-file backed scale state.
//!
//! The record is tiny and read-modify-written as a whole. [`StateStore`]
//! holds an async mutex across the full cycle so two concurrent submissions
//! can never lose an update, and replaces the file atomically (temp file in
//! the same directory, then rename) so readers never observe a torn write.

use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use saltwatch_core::ScaleState;

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for persistence failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A file could not be read, written, or replaced.
    #[error("state I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The record could not be decoded from or encoded to JSON.
    #[error("state JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

// ---------------------------------------------------------------------------
// StateStore
// ---------------------------------------------------------------------------

/// Handle to the persisted [`ScaleState`] record.
pub struct StateStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl StateStore {
    /// Create a handle for the state file at `path`. The file itself is
    /// provisioned externally; a missing file surfaces as an I/O error on
    /// first access.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    /// Path of the underlying state file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the current record.
    pub async fn load(&self) -> Result<ScaleState, StoreError> {
        let bytes = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Locked read-modify-write.
    ///
    /// `apply` receives the current record and returns the record to
    /// persist — or `None` to leave the file untouched — plus a value that
    /// rides through to the caller. The lock is held from the read until
    /// the replacement file has been renamed into place, so updates are
    /// all-or-nothing and strictly serialized.
    pub async fn update<T, F>(&self, apply: F) -> Result<T, StoreError>
    where
        F: FnOnce(ScaleState) -> (Option<ScaleState>, T),
    {
        let _guard = self.lock.lock().await;

        let bytes = tokio::fs::read(&self.path).await?;
        let current: ScaleState = serde_json::from_slice(&bytes)?;

        let (next, out) = apply(current);
        if let Some(next) = next {
            self.replace(&next).await?;
            tracing::debug!(path = %self.path.display(), "State record replaced");
        }

        Ok(out)
    }

    /// Write `state` to a sibling temp file, then rename over the original.
    async fn replace(&self, state: &ScaleState) -> Result<(), StoreError> {
        let mut tmp = self.path.as_os_str().to_owned();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        let body = serde_json::to_vec(state)?;
        tokio::fs::write(&tmp, &body).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use saltwatch_core::{Notified, ScaleState};

    use super::*;

    async fn store_with(state: &ScaleState) -> (tempfile::TempDir, StateStore) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, serde_json::to_vec(state).unwrap())
            .await
            .unwrap();
        (dir, StateStore::new(path))
    }

    fn normal_state() -> ScaleState {
        ScaleState {
            weight: 500.0,
            status: "Normal".to_string(),
            notified: None,
        }
    }

    #[tokio::test]
    async fn load_round_trips_the_record() {
        let (_dir, store) = store_with(&normal_state()).await;

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded, normal_state());
    }

    #[tokio::test]
    async fn load_fails_on_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let store = StateStore::new(dir.path().join("absent.json"));

        assert!(matches!(store.load().await, Err(StoreError::Io(_))));
    }

    #[tokio::test]
    async fn load_fails_on_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"{not json").await.unwrap();
        let store = StateStore::new(path);

        assert!(matches!(store.load().await, Err(StoreError::Json(_))));
    }

    #[tokio::test]
    async fn update_persists_the_returned_record() {
        let (_dir, store) = store_with(&normal_state()).await;

        store
            .update(|mut current| {
                current.weight = 3.0;
                current.status = "Critical".to_string();
                current.notified = Some(Notified::Yes);
                (Some(current), ())
            })
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.weight, 3.0);
        assert_eq!(loaded.status, "Critical");
        assert_eq!(loaded.notified, Some(Notified::Yes));
    }

    #[tokio::test]
    async fn update_with_none_leaves_the_file_untouched() {
        let (_dir, store) = store_with(&normal_state()).await;
        let before = tokio::fs::read(store.path()).await.unwrap();

        let seen: ScaleState = store
            .update(|current| (None, current.clone()))
            .await
            .unwrap();

        assert_eq!(seen, normal_state());
        let after = tokio::fs::read(store.path()).await.unwrap();
        assert_eq!(before, after);
    }

    #[tokio::test]
    async fn update_aborts_without_partial_mutation_on_corrupt_record() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        tokio::fs::write(&path, b"garbage").await.unwrap();
        let store = StateStore::new(&path);

        let result = store.update(|current| (Some(current), ())).await;
        assert!(matches!(result, Err(StoreError::Json(_))));

        // The broken file is preserved as-is for inspection.
        let bytes = tokio::fs::read(&path).await.unwrap();
        assert_eq!(bytes, b"garbage");
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_updates_never_lose_a_write() {
        let (_dir, store) = store_with(&ScaleState {
            weight: 0.0,
            status: "Normal".to_string(),
            notified: None,
        })
        .await;
        let store = Arc::new(store);

        // Each task increments the weight it reads; with a serialized
        // read-modify-write both increments must land.
        let mut handles = Vec::new();
        for _ in 0..2 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .update(|mut current| {
                        current.weight += 1.0;
                        (Some(current), ())
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.weight, 2.0);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn concurrent_submissions_settle_on_exactly_one_weight() {
        let (_dir, store) = store_with(&normal_state()).await;
        let store = Arc::new(store);

        let mut handles = Vec::new();
        for weight in [7.0, 11.0] {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                store
                    .update(move |mut current| {
                        current.weight = weight;
                        (Some(current), ())
                    })
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        // Never a corrupted mix: the record parses and holds one of the
        // two submitted weights.
        let loaded = store.load().await.unwrap();
        assert!(loaded.weight == 7.0 || loaded.weight == 11.0);
    }
}
