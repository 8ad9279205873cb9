use serde::Deserialize;
use shared_kernel::configuration::config;
use std::path::PathBuf;

#[derive(Debug, Deserialize)]
pub struct Settings {
    catalog: CatalogSettings,
}

#[derive(Debug, Deserialize)]
pub struct CatalogSettings {
    /// JSON snapshot to serve. The compiled-in seed catalog is used when unset.
    #[serde(default)]
    fixture_path: Option<PathBuf>,
}

impl Settings {
    pub fn parse() -> anyhow::Result<Self> {
        config::<Settings>()
    }

    pub fn fixture_path(&self) -> Option<&PathBuf> {
        self.catalog.fixture_path.as_ref()
    }
}
