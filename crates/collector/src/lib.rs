//! # Refig Collector
//!
//! Assembles the [`ProvenanceRecord`] for a save from the current
//! execution context. Collection never fails: every field other than
//! the figure name and the timestamp degrades to absent when its
//! collaborator cannot answer, and every collaborator query runs
//! under a hard time budget so a slow or missing collaborator cannot
//! stall a save.
//!
//! ## Example
//!
//! ```no_run
//! use refig_collector::Collector;
//!
//! #[tokio::main]
//! async fn main() {
//!     let collector = Collector::new();
//!     let record = collector.collect("loss_curve.png").await;
//!     println!("saving at {}", record.created_at);
//! }
//! ```

mod git;
mod notebook;

pub use git::GitRepoProbe;
pub use notebook::{EnvNotebookProbe, StaticNotebookProbe};

use chrono::{DateTime, Utc};
use refig_record::ProvenanceRecord;
use std::sync::atomic::{AtomicI64, Ordering};
use tokio::time::{timeout, Duration};

// Upper bound for any single collaborator query, including injected
// ones the collector does not control.
const PROBE_BUDGET: Duration = Duration::from_secs(2);

/// What the notebook collaborator knows about the running cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionContext {
    pub source: Option<String>,
    pub cell_number: Option<u64>,
}

/// Notebook-introspection collaborator.
#[async_trait::async_trait]
pub trait NotebookProbe: Send + Sync {
    async fn execution_context(&self) -> ExecutionContext;
}

/// Repository-introspection collaborator.
#[async_trait::async_trait]
pub trait RepoProbe: Send + Sync {
    async fn commit_hash(&self) -> Option<String>;
}

/// Fixed commit answer, for deterministic tests and for hosts that
/// resolve their revision once up front.
#[derive(Default, Clone)]
pub struct StaticRepoProbe {
    pub commit_hash: Option<String>,
}

#[async_trait::async_trait]
impl RepoProbe for StaticRepoProbe {
    async fn commit_hash(&self) -> Option<String> {
        self.commit_hash.clone()
    }
}

static LAST_SAVE_INSTANT_US: AtomicI64 = AtomicI64::new(i64::MIN);

/// Wall-clock now, clamped so repeated saves within one process never
/// observe a timestamp moving backwards. Ties are legal; the store
/// disambiguates colliding history names.
fn monotonic_now() -> DateTime<Utc> {
    let now_us = Utc::now().timestamp_micros();
    let mut last = LAST_SAVE_INSTANT_US.load(Ordering::Relaxed);
    loop {
        let clamped = now_us.max(last);
        match LAST_SAVE_INSTANT_US.compare_exchange(
            last,
            clamped,
            Ordering::Relaxed,
            Ordering::Relaxed,
        ) {
            Ok(_) => {
                return DateTime::<Utc>::from_timestamp_micros(clamped)
                    .unwrap_or_else(Utc::now)
            }
            Err(next) => last = next,
        }
    }
}

/// Builds provenance records from injected collaborators.
pub struct Collector {
    notebook: Box<dyn NotebookProbe>,
    repo: Box<dyn RepoProbe>,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new()
    }
}

impl Collector {
    /// Collector with the default collaborators: Jupyter environment
    /// detection and a bounded `git rev-parse` against the working
    /// directory.
    pub fn new() -> Self {
        Self {
            notebook: Box::new(EnvNotebookProbe),
            repo: Box::new(GitRepoProbe::default()),
        }
    }

    pub fn with_probes(notebook: Box<dyn NotebookProbe>, repo: Box<dyn RepoProbe>) -> Self {
        Self { notebook, repo }
    }

    /// Assemble the record for one save of `figure_name`.
    ///
    /// Infallible: collaborator failures and timeouts show up as
    /// absent fields, not errors.
    pub async fn collect(&self, figure_name: &str) -> ProvenanceRecord {
        let context = match timeout(PROBE_BUDGET, self.notebook.execution_context()).await {
            Ok(context) => context,
            Err(_) => {
                log::warn!("notebook probe exceeded {PROBE_BUDGET:?}; recording no source");
                ExecutionContext::default()
            }
        };
        let commit = match timeout(PROBE_BUDGET, self.repo.commit_hash()).await {
            Ok(commit) => commit,
            Err(_) => {
                log::warn!("repository probe exceeded {PROBE_BUDGET:?}; recording no commit");
                None
            }
        };

        ProvenanceRecord {
            figure: figure_name.to_string(),
            source: context.source,
            cell_number: context.cell_number,
            created_at: monotonic_now(),
            git_commit: commit,
        }
    }
}
