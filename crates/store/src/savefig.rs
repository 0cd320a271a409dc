use refig_codec::ImageFormat;
use refig_collector::Collector;

use crate::error::{Result, StoreError};
use crate::store::{split_figure_name, FigureStore, SaveResult};

/// A figure store wired to a provenance collector: the `savefig`
/// entry point hosts call after rendering.
pub struct Figures {
    store: FigureStore,
    collector: Collector,
}

impl Default for Figures {
    fn default() -> Self {
        Self::new()
    }
}

impl Figures {
    /// Default figures root (`figures/`) and default collaborators.
    pub fn new() -> Self {
        Self {
            store: FigureStore::default(),
            collector: Collector::new(),
        }
    }

    pub fn with_root(root: impl AsRef<std::path::Path>) -> Self {
        Self {
            store: FigureStore::new(root),
            collector: Collector::new(),
        }
    }

    pub fn with_collector(mut self, collector: Collector) -> Self {
        self.collector = collector;
        self
    }

    pub fn store(&self) -> &FigureStore {
        &self.store
    }

    /// Save one rendered figure under `name` (`<stem>.png` or
    /// `<stem>.svg`). The renderer is handed the target format and
    /// returns the raw image payload; provenance collection, metadata
    /// embedding and the latest/history writes happen here.
    pub async fn savefig<R, E>(&self, name: &str, render: R) -> Result<SaveResult>
    where
        R: FnOnce(ImageFormat) -> std::result::Result<Vec<u8>, E>,
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        let (_, format) = split_figure_name(name)?;
        let record = self.collector.collect(name).await;
        let payload = render(format).map_err(|err| StoreError::Render(err.into()))?;
        self.store.save(name, &payload, &record).await
    }
}

/// One-shot [`Figures::savefig`] with the default root and collaborators.
pub async fn savefig<R, E>(name: &str, render: R) -> Result<SaveResult>
where
    R: FnOnce(ImageFormat) -> std::result::Result<Vec<u8>, E>,
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
{
    Figures::new().savefig(name, render).await
}
