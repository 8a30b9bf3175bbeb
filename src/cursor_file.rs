//! Cursor store backed by a local YAML file.
//!
//! The file holds the same document as the config post (see
//! [`CursorDocument`]). It is read when the store is opened and rewritten in
//! full on every write.

use async_trait::async_trait;
use division_bot_core::contract::{ClientError, CursorStore};
use division_bot_core::cursor::CursorDocument;
use division_bot_core::Chamber;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::{error, info};

pub struct FileCursorStore {
    path: PathBuf,
    document: Mutex<CursorDocument>,
}

impl FileCursorStore {
    /// Open an existing cursor file. A missing file is an error.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, ClientError> {
        let path = path.as_ref().to_path_buf();
        let text = fs::read_to_string(&path).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Failed to read cursor file");
            format!("failed to read cursor file {}: {e}", path.display())
        })?;
        let document = CursorDocument::from_yaml(&text).map_err(|e| {
            error!(error = ?e, path = %path.display(), "Cursor file is not a cursor document");
            format!("failed to parse cursor file {}: {e}", path.display())
        })?;
        info!(
            path = %path.display(),
            last_commons_vote = document.last_commons_vote,
            last_lords_vote = document.last_lords_vote,
            "Loaded cursors from file"
        );
        Ok(Self {
            path,
            document: Mutex::new(document),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl CursorStore for FileCursorStore {
    async fn read_cursor(&self, chamber: Chamber) -> Result<i64, ClientError> {
        let document = self
            .document
            .lock()
            .map_err(|_| "cursor cache lock poisoned")?;
        Ok(document.get(chamber))
    }

    async fn write_cursor(&self, chamber: Chamber, division_id: i64) -> Result<(), ClientError> {
        let mut document = self
            .document
            .lock()
            .map_err(|_| "cursor cache lock poisoned")?;
        let mut next = *document;
        next.set(chamber, division_id);

        fs::write(&self.path, next.to_yaml()?).map_err(|e| {
            error!(error = ?e, path = %self.path.display(), "Failed to write cursor file");
            e
        })?;
        *document = next;
        info!(%chamber, division_id, path = %self.path.display(), "Cursor file saved");
        Ok(())
    }
}
