//! # Refig Record
//!
//! The provenance record embedded into every saved figure: which
//! logical figure it is, where it was produced, when, and at which
//! commit. Optional fields are genuinely optional: absence is encoded
//! by omission, never by sentinels, so the compact JSON encoding
//! round-trips exactly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Provenance metadata describing one save of one figure.
///
/// Immutable by convention: a new save builds a new record. JSON key
/// names are part of the on-disk contract and must not change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvenanceRecord {
    /// Logical figure name, including the extension (e.g. `loss_curve.png`).
    pub figure: String,

    /// Originating script or notebook, when the host could determine it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    /// Execution count of the producing cell, inside notebook kernels.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cell_number: Option<u64>,

    /// Save instant, UTC.
    pub created_at: DateTime<Utc>,

    /// Short hash of the enclosing VCS revision, when inside a repository.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
}

impl ProvenanceRecord {
    pub fn new(figure: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            figure: figure.into(),
            source: None,
            cell_number: None,
            created_at,
            git_commit: None,
        }
    }

    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    pub fn with_cell_number(mut self, cell_number: u64) -> Self {
        self.cell_number = Some(cell_number);
        self
    }

    pub fn with_git_commit(mut self, git_commit: impl Into<String>) -> Self {
        self.git_commit = Some(git_commit.into());
        self
    }

    /// Compact, deterministic JSON form used by the embedding codecs.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Parse a record previously produced by [`to_json`](Self::to_json).
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }
}
