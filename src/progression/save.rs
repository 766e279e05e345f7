//! Versioned progression snapshots.
//!
//! Two encodings of the same [`ProgressionState`]:
//!
//! Binary, for local files:
//! - Magic (4 bytes, `BSLY`)
//! - Snapshot version (4 bytes, LE)
//! - Data length (4 bytes, LE)
//! - bincode payload (variable length)
//! - SHA256 checksum over version + length + payload (32 bytes)
//!
//! JSON, for web storage: `{ "version", "saved_at", "state" }`.
//!
//! Loading never migrates. A version mismatch, checksum failure or corrupt
//! payload makes `load_*` return `false` and leaves the target untouched.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::stages::ProgressionState;

pub const SNAPSHOT_MAGIC: [u8; 4] = *b"BSLY";
pub const SNAPSHOT_VERSION: u32 = 1;

const HEADER_LEN: usize = 12;
const CHECKSUM_LEN: usize = 32;

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("not a progression snapshot")]
    BadMagic,

    #[error("snapshot version {found} does not match {expected}")]
    VersionMismatch { expected: u32, found: u32 },

    #[error("snapshot truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },

    #[error("checksum verification failed")]
    ChecksumMismatch,

    #[error("serialization error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// JSON snapshot envelope.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub version: u32,
    /// Unix timestamp (seconds).
    pub saved_at: i64,
    pub state: ProgressionState,
}

fn checksum(version: &[u8], length: &[u8], data: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut hasher = Sha256::new();
    hasher.update(version);
    hasher.update(length);
    hasher.update(data);
    let mut out = [0u8; CHECKSUM_LEN];
    out.copy_from_slice(&hasher.finalize());
    out
}

pub fn to_bytes(state: &ProgressionState) -> Result<Vec<u8>, SaveError> {
    let data = bincode::serialize(state)?;
    let version = SNAPSHOT_VERSION.to_le_bytes();
    let length = (data.len() as u32).to_le_bytes();
    let sum = checksum(&version, &length, &data);

    let mut out = Vec::with_capacity(HEADER_LEN + data.len() + CHECKSUM_LEN);
    out.extend_from_slice(&SNAPSHOT_MAGIC);
    out.extend_from_slice(&version);
    out.extend_from_slice(&length);
    out.extend_from_slice(&data);
    out.extend_from_slice(&sum);
    Ok(out)
}

pub fn from_bytes(bytes: &[u8]) -> Result<ProgressionState, SaveError> {
    if bytes.len() < HEADER_LEN {
        return Err(SaveError::Truncated {
            expected: HEADER_LEN,
            actual: bytes.len(),
        });
    }
    let (magic, rest) = bytes.split_at(4);
    if magic != SNAPSHOT_MAGIC {
        return Err(SaveError::BadMagic);
    }
    let (version_bytes, rest) = rest.split_at(4);
    let (length_bytes, rest) = rest.split_at(4);

    let mut word = [0u8; 4];
    word.copy_from_slice(version_bytes);
    let version = u32::from_le_bytes(word);
    if version != SNAPSHOT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: version,
        });
    }
    word.copy_from_slice(length_bytes);
    let data_len = u32::from_le_bytes(word) as usize;

    let expected = data_len + CHECKSUM_LEN;
    if rest.len() != expected {
        return Err(SaveError::Truncated {
            expected: HEADER_LEN + expected,
            actual: bytes.len(),
        });
    }
    let (data, stored) = rest.split_at(data_len);
    if checksum(version_bytes, length_bytes, data).as_slice() != stored {
        return Err(SaveError::ChecksumMismatch);
    }

    Ok(bincode::deserialize(data)?)
}

pub fn to_json(state: &ProgressionState) -> Result<String, SaveError> {
    let snapshot = SaveSnapshot {
        version: SNAPSHOT_VERSION,
        saved_at: chrono::Utc::now().timestamp(),
        state: state.clone(),
    };
    Ok(serde_json::to_string(&snapshot)?)
}

pub fn from_json(json: &str) -> Result<SaveSnapshot, SaveError> {
    let snapshot: SaveSnapshot = serde_json::from_str(json)?;
    if snapshot.version != SNAPSHOT_VERSION {
        return Err(SaveError::VersionMismatch {
            expected: SNAPSHOT_VERSION,
            found: snapshot.version,
        });
    }
    Ok(snapshot)
}

fn replace_on_success(
    target: &mut ProgressionState,
    loaded: Result<ProgressionState, SaveError>,
) -> bool {
    match loaded {
        Ok(state) => {
            *target = state;
            true
        }
        Err(e) => {
            tracing::warn!(error = %e, "progression snapshot rejected");
            false
        }
    }
}

/// Replace `target` with a binary snapshot. Returns false (target
/// untouched) if the snapshot cannot be used.
pub fn load_bytes(target: &mut ProgressionState, bytes: &[u8]) -> bool {
    replace_on_success(target, from_bytes(bytes))
}

/// Replace `target` with a JSON snapshot. Returns false (target untouched)
/// if the snapshot cannot be used.
pub fn load_json(target: &mut ProgressionState, json: &str) -> bool {
    replace_on_success(target, from_json(json).map(|s| s.state))
}

pub fn save_to_file(path: &Path, state: &ProgressionState) -> Result<(), SaveError> {
    fs::write(path, to_bytes(state)?)?;
    Ok(())
}

pub fn load_from_file(target: &mut ProgressionState, path: &Path) -> bool {
    let loaded = fs::read(path)
        .map_err(SaveError::from)
        .and_then(|bytes| from_bytes(&bytes));
    replace_on_success(target, loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::chapters::builtin_chapters;
    use crate::progression::stages::StageRecord;

    fn played_state() -> ProgressionState {
        let chapters = builtin_chapters();
        let mut state = ProgressionState::new();
        for stage in 1..=4 {
            state.complete_stage(
                1,
                stage,
                StageRecord {
                    turns: 4 + stage,
                    damage_taken: 20,
                    tech_debt: 1,
                },
                &chapters,
            );
            state.advance(&chapters);
        }
        state.add_play_time(600);
        state
    }

    #[test]
    fn test_binary_round_trip() {
        let state = played_state();
        let bytes = to_bytes(&state).unwrap();
        assert_eq!(&bytes[..4], b"BSLY");

        let mut loaded = ProgressionState::new();
        assert!(load_bytes(&mut loaded, &bytes));
        assert_eq!(loaded, state);
        assert_eq!((loaded.current_chapter, loaded.current_stage), (2, 1));
    }

    #[test]
    fn test_json_round_trip() {
        let state = played_state();
        let json = to_json(&state).unwrap();
        let mut loaded = ProgressionState::new();
        assert!(load_json(&mut loaded, &json));
        assert_eq!(loaded.totals, state.totals);
        assert_eq!(loaded.chapters, state.chapters);
    }

    #[test]
    fn test_version_mismatch_refused() {
        let state = played_state();
        let mut bytes = to_bytes(&state).unwrap();
        bytes[4] = 99;
        assert!(matches!(
            from_bytes(&bytes),
            Err(SaveError::VersionMismatch { found: 99, .. })
        ));

        let mut target = ProgressionState::new();
        assert!(!load_bytes(&mut target, &bytes));
        assert_eq!(target, ProgressionState::new());

        let json = to_json(&state).unwrap().replace("\"version\":1", "\"version\":2");
        assert!(!load_json(&mut target, &json));
        assert_eq!(target, ProgressionState::new());
    }

    #[test]
    fn test_corruption_detected() {
        let mut bytes = to_bytes(&played_state()).unwrap();
        let mid = bytes.len() / 2;
        bytes[mid] ^= 0xFF;
        assert!(matches!(from_bytes(&bytes), Err(SaveError::ChecksumMismatch)));

        assert!(matches!(
            from_bytes(&bytes[..8]),
            Err(SaveError::Truncated { .. })
        ));
        assert!(matches!(from_bytes(b"nope-nope-nope"), Err(SaveError::BadMagic)));
        let mut target = ProgressionState::new();
        assert!(!load_json(&mut target, "{ broken"));
    }

    #[test]
    fn test_file_round_trip() {
        let path = std::env::temp_dir().join(format!("bug-slayer-save-{}.dat", std::process::id()));
        let state = played_state();
        save_to_file(&path, &state).unwrap();

        let mut loaded = ProgressionState::new();
        assert!(load_from_file(&mut loaded, &path));
        assert_eq!(loaded, state);
        let _ = fs::remove_file(&path);

        assert!(!load_from_file(&mut loaded, &path));
    }
}
