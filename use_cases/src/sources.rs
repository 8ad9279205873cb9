//! Contracts for the collaborators the engine reads from. Implementations may hit the
//! network or disk; the engine wraps every call with the caller's deadline.

use async_trait::async_trait;
use entities::games::{Game, GameFilter, GameId};
use entities::locations::{Region, RegionCode};
use entities::platforms::Platform;
use entities::teams::{League, Team, TeamId};
use entities::viewing_options::ViewingOptionRecord;
#[cfg(test)]
use mockall::automock;
use std::sync::Arc;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Whether the ZIP exists in the location database.
    async fn validate_zip(&self, zip: &str) -> anyhow::Result<bool>;

    /// `None` when the ZIP exists but no market is assigned to it.
    async fn zip_to_region(&self, zip: &str) -> anyhow::Result<Option<RegionCode>>;

    /// The full region catalog, in catalog order.
    async fn regions(&self) -> anyhow::Result<Vec<Region>>;

    async fn teams_for_zip(&self, zip: &str) -> anyhow::Result<Vec<TeamId>>;

    /// Markets whose ZIPs are assigned the team. Empty for an unknown team.
    async fn regions_for_team(&self, team_id: &TeamId) -> anyhow::Result<Vec<RegionCode>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScheduleSource: Send + Sync {
    async fn game_by_id(&self, id: &GameId) -> anyhow::Result<Option<Game>>;

    async fn games(&self, filter: &GameFilter) -> anyhow::Result<Vec<Game>>;

    async fn team_by_id(&self, id: &TeamId) -> anyhow::Result<Option<Team>>;

    async fn teams(&self, league: Option<League>) -> anyhow::Result<Vec<Team>>;
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait RightsSource: Send + Sync {
    /// Raw records in catalog insertion order.
    async fn options_by_game(&self, id: &GameId) -> anyhow::Result<Vec<ViewingOptionRecord>>;

    /// Every raw record in the catalog, in insertion order.
    async fn options(&self) -> anyhow::Result<Vec<ViewingOptionRecord>>;

    async fn platforms(&self) -> anyhow::Result<Vec<Platform>>;
}

/// A source that can hand out a copy of itself frozen at the catalog version current now.
pub trait Snapshotting: Sized {
    fn pinned(&self) -> Self;
}

/// The three sources one operation reads from.
#[derive(Clone)]
pub struct Sources {
    pub location: Arc<dyn LocationSource>,
    pub schedule: Arc<dyn ScheduleSource>,
    pub rights: Arc<dyn RightsSource>,
}

impl Sources {
    pub fn new(
        location: Arc<dyn LocationSource>,
        schedule: Arc<dyn ScheduleSource>,
        rights: Arc<dyn RightsSource>,
    ) -> Self {
        Self {
            location,
            schedule,
            rights,
        }
    }
}

/// Called once at the start of every operation. All reads made through the returned
/// [`Sources`] see the same catalog version, even if a newer one is published meanwhile.
pub trait SourceProvider: Send + Sync {
    fn pin(&self) -> Sources;
}

/// Sources that are already fixed, such as mocks.
impl SourceProvider for Sources {
    fn pin(&self) -> Sources {
        self.clone()
    }
}
