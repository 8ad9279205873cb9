use crate::configuration::Settings;
use crate::snapshot::CatalogSnapshot;
use parking_lot::RwLock;
use std::sync::Arc;
use use_cases::sources::Snapshotting;

/// Serves reads from the current catalog snapshot. Publishing swaps the whole snapshot, so a
/// query that already holds one keeps reading a consistent version.
#[derive(Clone)]
pub struct Repository {
    snapshot: Arc<RwLock<Arc<CatalogSnapshot>>>,
}

impl Repository {
    pub fn from_snapshot(snapshot: CatalogSnapshot) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(Arc::new(snapshot))),
        }
    }

    pub fn seeded() -> anyhow::Result<Self> {
        CatalogSnapshot::seed().map(Self::from_snapshot)
    }

    /// Loads the snapshot named by the settings, falling back to the seed catalog.
    pub async fn new() -> anyhow::Result<Self> {
        let settings = Settings::parse()?;
        match settings.fixture_path() {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading catalog snapshot");
                CatalogSnapshot::from_file(path)
                    .await
                    .map(Self::from_snapshot)
            }
            None => Self::seeded(),
        }
    }

    pub fn snapshot(&self) -> Arc<CatalogSnapshot> {
        self.snapshot.read().clone()
    }

    pub fn publish(&self, snapshot: CatalogSnapshot) {
        *self.snapshot.write() = Arc::new(snapshot);
        tracing::info!("published catalog snapshot");
    }
}

/// A pinned repository owns its own lock, so publishes through the original never reach it.
impl Snapshotting for Repository {
    fn pinned(&self) -> Self {
        Self {
            snapshot: Arc::new(RwLock::new(self.snapshot())),
        }
    }
}
