//! # Refig Store
//!
//! The versioned figure store: every save writes an atomically
//! replaced "latest" copy and a write-once "history" snapshot, both
//! carrying the embedded provenance record.
//!
//! ## Pipeline
//!
//! ```text
//! savefig(name, render)
//!     │
//!     ├──> Collector (notebook + git probes, bounded)
//!     │      └─> ProvenanceRecord
//!     │
//!     ├──> Codec (PNG tEXt / SVG metadata)
//!     │      └─> annotated payload, encoded once
//!     │
//!     └──> FigureStore
//!            ├─> figures/latest/<name>.<ext>        (atomic replace)
//!            └─> figures/history/<name>/_<ts>…      (write-once)
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use refig_store::savefig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let saved = savefig("loss_curve.png", |format| {
//!         // hand the target format to the plotting backend
//!         render_current_figure(format)
//!     })
//!     .await?;
//!
//!     println!("latest:  {}", saved.latest_path.display());
//!     println!("history: {}", saved.history_path.display());
//!     Ok(())
//! }
//! # fn render_current_figure(
//! #     _format: refig_store::ImageFormat,
//! # ) -> Result<Vec<u8>, std::io::Error> { Ok(Vec::new()) }
//! ```

mod error;
mod savefig;
mod store;

pub use error::{Result, StoreError};
pub use savefig::{savefig, Figures};
pub use store::{FigureStore, SaveResult, DEFAULT_ROOT};

// Callers need these for renderer signatures and for reading records back.
pub use refig_codec::ImageFormat;
pub use refig_record::ProvenanceRecord;
