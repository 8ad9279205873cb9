use anyhow::Context;
use entities::games::Game;
use entities::locations::{Region, ZipCode, ZipCodeValue};
use entities::platforms::Platform;
use entities::teams::{Team, TeamId};
use entities::viewing_options::ViewingOptionRecord;
use serde::{Deserialize, Serialize};
use std::path::Path;

const SEED_CATALOG: &str = include_str!("../fixtures/catalog.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamAssignment {
    pub zip_code: ZipCodeValue,
    pub teams: Vec<TeamId>,
}

/// One immutable version of every reference catalog the engine reads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    pub regions: Vec<Region>,
    pub zip_codes: Vec<ZipCode>,
    #[serde(default)]
    pub team_assignments: Vec<TeamAssignment>,
    pub teams: Vec<Team>,
    pub games: Vec<Game>,
    pub platforms: Vec<Platform>,
    pub viewing_options: Vec<ViewingOptionRecord>,
}

impl CatalogSnapshot {
    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("Failed to parse catalog snapshot")
    }

    pub fn seed() -> anyhow::Result<Self> {
        Self::from_json(SEED_CATALOG)
    }

    pub async fn from_file(path: &Path) -> anyhow::Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read catalog snapshot {}", path.display()))?;
        Self::from_json(&json)
    }

    pub fn zip_code(&self, zip: &str) -> Option<&ZipCode> {
        self.zip_codes.iter().find(|zip_code| zip_code.code == *zip)
    }
}
