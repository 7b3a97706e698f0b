//! Error types for the fallible edges of the combat core.
//!
//! Gameplay guards never error: a rejected fire/reload/dodge just returns
//! `false` and leaves state untouched. Only configuration I/O and handle
//! lookups from the foreign interface surface as `CombatError`.

use std::path::PathBuf;

use crate::actors::ActorId;

#[derive(Debug, thiserror::Error)]
pub enum CombatError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON parse error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Unsupported config format: {0:?}")]
    UnsupportedFormat(PathBuf),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Stale or unknown actor handle: {0:?}")]
    StaleHandle(ActorId),
}

pub type CombatResult<T> = Result<T, CombatError>;
