//! Persisted slot state for the command-line front end.
//!
//! A CLI invocation lives for one command, so the slot contents are written to
//! a JSON session file between commands:
//!
//! ```json
//! {
//!   "slots": [
//!     { "source": "photos/dawn.jpg", "source_hash": "9f2c…", "adjustment": { "exposure": 20, "shadow": -30, "highlight": 10 } },
//!     { "adjustment": { "exposure": 0, "shadow": 0, "highlight": 0 } },
//!     …
//!   ]
//! }
//! ```
//!
//! Only the source identifier and adjustment are stored. Opening a session
//! replays it: every source is read, decoded, cropped and adjusted again, so
//! displayed images are always recomputed, never loaded from disk.
//!
//! `source_hash` is the SHA-256 of the bytes a slot was loaded from. If the
//! file changed since (paste temp files are rewritten per slot), replay still
//! loads it and logs a warning. A source that cannot be read or decoded any
//! more is skipped with a warning and its slot replays empty.
//!
//! [`Workspace`] keeps a [`SlotStore`] and the per-slot hashes in step; every
//! front-end command goes through it.

use crate::export::{ExportError, save_png};
use crate::imaging::{Adjustment, AspectRatio};
use crate::payload::SwapPayload;
use crate::slot::{SlotError, SlotId, decode_cropped};
use crate::store::SlotStore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Session file error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("slot {slot}: cannot read '{path}': {error}")]
    ReadSource {
        slot: SlotId,
        path: String,
        #[source]
        error: std::io::Error,
    },
    #[error("slot {slot}: {error}")]
    Slot {
        slot: SlotId,
        #[source]
        error: SlotError,
    },
    #[error(transparent)]
    Reference(#[from] SlotError),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// What is persisted for one slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SlotRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_hash: Option<String>,
    #[serde(default)]
    pub adjustment: Adjustment,
}

/// On-disk session: one record per slot, in slot order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub slots: [SlotRecord; SlotId::COUNT],
}

impl Session {
    /// Read a session file. A missing file is an empty session.
    pub fn load(path: &Path) -> Result<Self, SessionError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

/// SHA-256 of `bytes` as a hex string.
pub fn hash_bytes(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}

/// File name of the temp image a paste into `slot` is written to.
pub fn paste_file_name(slot: SlotId) -> String {
    format!("paste_tmp_{slot}.png")
}

fn read_source(slot: SlotId, path: &str) -> Result<Vec<u8>, SessionError> {
    std::fs::read(path).map_err(|error| SessionError::ReadSource {
        slot,
        path: path.to_string(),
        error,
    })
}

/// A [`SlotStore`] plus the bookkeeping needed to persist it.
#[derive(Debug, Clone, PartialEq)]
pub struct Workspace {
    store: SlotStore,
    hashes: [Option<String>; SlotId::COUNT],
}

impl Workspace {
    pub fn new(aspect: AspectRatio) -> Self {
        Self {
            store: SlotStore::new(aspect),
            hashes: Default::default(),
        }
    }

    /// Rebuild a workspace by replaying `session`.
    ///
    /// A source that can no longer be read or decoded is skipped with a
    /// warning and its slot comes back empty, so a moved or deleted file never
    /// locks the session. Its adjustment is still restored.
    pub fn replay(session: &Session, aspect: AspectRatio) -> Result<Self, SessionError> {
        let mut workspace = Self::new(aspect);
        for (slot, record) in SlotId::ALL.into_iter().zip(&session.slots) {
            if let Some(source) = &record.source {
                workspace.restore_source(slot, source, record.source_hash.as_deref());
            }
            workspace
                .store
                .set_adjustment(slot, record.adjustment)
                .map_err(|error| SessionError::Slot { slot, error })?;
        }
        Ok(workspace)
    }

    fn restore_source(&mut self, slot: SlotId, source: &str, recorded_hash: Option<&str>) {
        let raw = match read_source(slot, source) {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("{e}; leaving slot {slot} empty");
                return;
            }
        };
        let hash = hash_bytes(&raw);
        if recorded_hash.is_some_and(|h| h != hash) {
            log::warn!("slot {slot}: '{source}' changed since it was loaded");
        }
        if let Err(e) = self.store.load(slot, &raw, source) {
            log::warn!("slot {slot}: cannot decode '{source}': {e}; leaving slot empty");
            return;
        }
        // Keep the recorded hash so the warning repeats until reloaded
        self.hashes[slot.index()] = Some(recorded_hash.map_or(hash, str::to_string));
    }

    /// Open the session file at `path` (empty if missing) and replay it.
    pub fn open(path: &Path, aspect: AspectRatio) -> Result<Self, SessionError> {
        Self::replay(&Session::load(path)?, aspect)
    }

    pub fn store(&self) -> &SlotStore {
        &self.store
    }

    pub fn session(&self) -> Session {
        Session {
            slots: SlotId::ALL.map(|id| {
                let slot = self.store.slot(id);
                SlotRecord {
                    source: (!slot.is_empty()).then(|| slot.source().to_string()),
                    source_hash: if slot.is_empty() {
                        None
                    } else {
                        self.hashes[id.index()].clone()
                    },
                    adjustment: slot.adjustment(),
                }
            }),
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), SessionError> {
        self.session().save(path)
    }

    /// Load encoded bytes into `slot` under the identifier `source`.
    pub fn load_bytes(
        &mut self,
        slot: SlotId,
        raw: &[u8],
        source: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.store
            .load(slot, raw, source)
            .map_err(|error| SessionError::Slot { slot, error })?;
        self.hashes[slot.index()] = Some(hash_bytes(raw));
        Ok(())
    }

    /// Load the image file at `path`; the path becomes the source identifier.
    pub fn load_file(&mut self, slot: SlotId, path: &Path) -> Result<(), SessionError> {
        let source = path.to_string_lossy().into_owned();
        let raw = read_source(slot, &source)?;
        self.load_bytes(slot, &raw, source)
    }

    /// Crop pasted bytes, keep them as `paste_tmp_{slot}.png` in `temp_dir`,
    /// and load that file.
    pub fn paste(
        &mut self,
        slot: SlotId,
        raw: &[u8],
        temp_dir: &Path,
    ) -> Result<PathBuf, SessionError> {
        let cropped = decode_cropped(raw, self.store.aspect())
            .map_err(|error| SessionError::Slot { slot, error })?;
        let path = temp_dir.join(paste_file_name(slot));
        save_png(&cropped, &path)?;
        self.load_file(slot, &path)?;
        Ok(path)
    }

    pub fn set_adjustment(
        &mut self,
        slot: SlotId,
        adjustment: Adjustment,
    ) -> Result<(), SessionError> {
        self.store
            .set_adjustment(slot, adjustment)
            .map_err(|error| SessionError::Slot { slot, error })
    }

    /// Drop slot `source`'s content on `dest`, exchanging the two.
    pub fn swap(&mut self, dest: SlotId, source: usize) -> Result<(), SessionError> {
        self.store.swap(dest, source)?;
        self.hashes.swap(dest.index(), source);
        Ok(())
    }

    /// Drop a payload on `dest`; the incoming image is re-read from the
    /// payload's identifier.
    pub fn drop_payload(
        &mut self,
        dest: SlotId,
        payload: &SwapPayload,
    ) -> Result<(), SessionError> {
        let source = SlotId::new(payload.source_slot)?;
        if source == dest {
            return Ok(());
        }
        payload
            .adjustment
            .validate()
            .map_err(|e| SessionError::Slot {
                slot: dest,
                error: e.into(),
            })?;
        let raw = read_source(source, &payload.source)?;
        self.store
            .drop_payload(dest, payload, &raw)
            .map_err(|error| SessionError::Slot { slot: dest, error })?;

        let previous = self.hashes[dest.index()].replace(hash_bytes(&raw));
        self.hashes[source.index()] = previous;
        Ok(())
    }

    pub fn clear(&mut self, slot: SlotId) {
        self.store.clear(slot);
        self.hashes[slot.index()] = None;
    }

    pub fn clear_all(&mut self) {
        self.store.clear_all();
        self.hashes = Default::default();
    }
}
