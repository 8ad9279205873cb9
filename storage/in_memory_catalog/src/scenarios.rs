//! End-to-end queries against the seed catalog.

use crate::repository::Repository;
use crate::snapshot::CatalogSnapshot;
use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use entities::games::{Game, GameFilter, GameId};
use entities::locations::{Region, RegionCode};
use entities::platforms::{Platform, PlatformCategory};
use entities::teams::{League, Team, TeamId};
use entities::viewing_options::ViewingOptionRecord;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use use_cases::blackout_map::AvailabilityStatus;
use use_cases::errors::ResolutionError;
use use_cases::query_context::QueryContext;
use use_cases::sources::{LocationSource, RightsSource, ScheduleSource, Snapshotting};
use use_cases::{App, AppImpl};

fn app() -> (Repository, AppImpl) {
    let repository = Repository::seeded().unwrap();
    (repository.clone(), AppImpl::new(repository))
}

fn providers(options: &[entities::viewing_options::ViewingOption]) -> Vec<&str> {
    options.iter().map(|option| option.provider.as_str()).collect()
}

#[tokio::test]
async fn test_boston_viewer_only_gets_the_national_broadcast() {
    let (_, app) = app();
    let grouped = app
        .viewing_options()
        .get_viewing_options(
            &QueryContext::default(),
            &GameId::from("mlb-game-1"),
            Some("02108"),
        )
        .await
        .unwrap();

    assert_eq!(grouped.groups.len(), 1);
    assert_eq!(providers(grouped.bucket(PlatformCategory::NationalTv)), vec!["ESPN"]);
    assert!(grouped.has_national_broadcast());
}

#[tokio::test]
async fn test_viewer_outside_every_market_gets_everything() {
    let (_, app) = app();
    let grouped = app
        .viewing_options()
        .get_viewing_options(
            &QueryContext::default(),
            &GameId::from("mlb-game-1"),
            Some("00501"),
        )
        .await
        .unwrap();

    assert_eq!(grouped.groups.len(), 3);
    assert_eq!(providers(grouped.bucket(PlatformCategory::LocalTv)), vec!["YES Network"]);
    assert_eq!(providers(grouped.bucket(PlatformCategory::NationalTv)), vec!["ESPN"]);
    assert_eq!(providers(grouped.bucket(PlatformCategory::Streaming)), vec!["MLB.TV"]);
}

#[tokio::test]
async fn test_league_pass_map_for_nba_game_1() {
    let (_, app) = app();
    let map = app
        .blackout_map()
        .get_blackout_map(&QueryContext::default(), &GameId::from("nba-game-1"))
        .await
        .unwrap();

    assert_eq!(map.default_platform, *"national_tv");
    assert_eq!(
        map.status("nba_league_pass", "NYC"),
        Some(AvailabilityStatus::Available)
    );
    assert_eq!(
        map.status("nba_league_pass", "BOS"),
        Some(AvailabilityStatus::BlackedOut)
    );
    assert_eq!(
        map.status("nba_league_pass", "LA"),
        Some(AvailabilityStatus::BlackedOut)
    );
    assert_eq!(
        map.status("nba_league_pass", "CHI"),
        Some(AvailabilityStatus::Available)
    );
}

#[tokio::test]
async fn test_malformed_zip_is_rejected() {
    let (_, app) = app();
    let result = app
        .viewing_options()
        .get_viewing_options(
            &QueryContext::default(),
            &GameId::from("mlb-game-1"),
            Some("abc"),
        )
        .await;
    assert!(matches!(result, Err(ResolutionError::InvalidZip(zip)) if zip == "abc"));
}

#[tokio::test]
async fn test_well_formed_but_unknown_zip_is_rejected() {
    let (_, app) = app();
    let result = app
        .viewing_options()
        .get_viewing_options(
            &QueryContext::default(),
            &GameId::from("mlb-game-1"),
            Some("99999"),
        )
        .await;
    assert!(matches!(result, Err(ResolutionError::InvalidZip(zip)) if zip == "99999"));
}

#[tokio::test]
async fn test_unknown_game() {
    let (_, app) = app();
    let result = app
        .blackout_map()
        .get_blackout_map(&QueryContext::default(), &GameId::from("mlb-game-9"))
        .await;
    assert!(matches!(result, Err(ResolutionError::GameNotFound(_))));
}

#[tokio::test]
async fn test_game_availability_per_market() {
    let (_, app) = app();
    let ctx = QueryContext::default();
    let game_id = GameId::from("nhl-game-1");
    let viewing_options = app.viewing_options();

    assert!(!viewing_options
        .is_game_available(&ctx, &game_id, Some("02108"))
        .await
        .unwrap());
    assert!(viewing_options
        .is_game_available(&ctx, &game_id, Some("10001"))
        .await
        .unwrap());
}

#[tokio::test]
async fn test_local_teams_and_their_upcoming_games() {
    let (_, app) = app();
    let ctx = QueryContext::default();
    let teams = app.schedule().local_teams(&ctx, "02108").await.unwrap();
    let ids = teams.iter().map(|team| team.id.as_ref()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["mlb-bos", "nba-bos", "nhl-bos"]);

    let team_ids = teams.into_iter().map(|team| team.id).collect::<Vec<TeamId>>();
    let from = Utc.with_ymd_and_hms(2023, 7, 15, 0, 0, 0).unwrap();
    let games = app
        .schedule()
        .upcoming_games_for_teams(&ctx, &team_ids, from, 2)
        .await
        .unwrap();
    let ids = games.iter().map(|game| game.id.as_ref()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["mlb-game-1", "nba-game-1"]);
}

#[tokio::test]
async fn test_schedule_filters() {
    let (_, app) = app();
    let ctx = QueryContext::default();
    let nhl = app
        .schedule()
        .games(
            &ctx,
            &GameFilter {
                league: Some(League::Nhl),
                ..GameFilter::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(nhl.len(), 2);

    let nba_teams = app.schedule().teams(&ctx, Some(League::Nba)).await.unwrap();
    assert_eq!(nba_teams.len(), 4);
}

#[tokio::test]
async fn test_published_snapshot_is_served_to_new_queries() {
    let (repository, app) = app();
    let ctx = QueryContext::default();
    let game_id = GameId::from("mlb-game-1");

    let mut snapshot = (*repository.snapshot()).clone();
    snapshot
        .viewing_options
        .retain(|record| record.game_id != game_id);
    repository.publish(snapshot);

    let grouped = app
        .viewing_options()
        .get_viewing_options(&ctx, &game_id, Some("02108"))
        .await
        .unwrap();
    assert!(grouped.is_empty());

    let result = app.blackout_map().get_blackout_map(&ctx, &game_id).await;
    assert!(matches!(result, Err(ResolutionError::NoOptionsForGame(_))));
}

#[tokio::test]
async fn test_snapshot_round_trips_through_a_file() {
    let path = std::env::temp_dir().join(format!("catalog-{}.json", std::process::id()));
    let seed = CatalogSnapshot::seed().unwrap();
    tokio::fs::write(&path, serde_json::to_string(&seed).unwrap())
        .await
        .unwrap();

    let loaded = CatalogSnapshot::from_file(&path).await;
    tokio::fs::remove_file(&path).await.unwrap();
    assert_eq!(loaded.unwrap(), seed);
}

#[tokio::test]
async fn test_cancelled_query_reports_cancellation() {
    let (_, app) = app();
    let token = CancellationToken::new();
    token.cancel();
    let ctx = QueryContext::default().with_cancellation(token);

    let result = app
        .viewing_options()
        .get_viewing_options(&ctx, &GameId::from("mlb-game-1"), None)
        .await;
    assert!(matches!(result, Err(ResolutionError::Cancelled)));
}

#[tokio::test]
async fn test_platforms_open_to_a_boston_viewer() {
    let (_, app) = app();
    let platforms = app
        .viewing_options()
        .available_platforms(&QueryContext::default(), Some("02108"))
        .await
        .unwrap();
    let codes = platforms
        .iter()
        .map(|platform| platform.code.as_ref())
        .collect::<Vec<_>>();
    assert_eq!(
        codes,
        vec!["local_tv", "national_tv", "espn_plus", "nba_league_pass", "mlb_tv"]
    );
}

#[tokio::test]
async fn test_team_markets_follow_zip_assignments() {
    let (_, app) = app();
    let ctx = QueryContext::default();

    let knicks = app
        .schedule()
        .regions_for_team(&ctx, &TeamId::from("nba-nyk"))
        .await
        .unwrap();
    let codes = knicks
        .iter()
        .map(|region| region.code.as_ref())
        .collect::<Vec<_>>();
    assert_eq!(codes, vec!["NYC", "CHI"]);

    let warriors = app
        .schedule()
        .regions_for_team(&ctx, &TeamId::from("nba-gsw"))
        .await
        .unwrap();
    assert!(warriors.is_empty());

    let result = app
        .schedule()
        .regions_for_team(&ctx, &TeamId::from("nfl-ne"))
        .await;
    assert!(matches!(result, Err(ResolutionError::TeamNotFound(id)) if id == *"nfl-ne"));
}

#[tokio::test]
async fn test_team_lookup_by_id() {
    let (_, app) = app();
    let ctx = QueryContext::default();
    let team = app
        .schedule()
        .team(&ctx, &TeamId::from("nhl-tor"))
        .await
        .unwrap();
    assert_eq!(team.league, League::Nhl);

    let result = app.schedule().team(&ctx, &TeamId::from("nhl-sea")).await;
    assert!(matches!(result, Err(ResolutionError::TeamNotFound(_))));
}

/// Publishes `next` right after a query has read its viewing option records, so the rest of
/// that query runs while a newer catalog is live.
#[derive(Clone)]
struct PublishAfterRightsRead {
    reads: Repository,
    live: Repository,
    next: Arc<CatalogSnapshot>,
}

impl PublishAfterRightsRead {
    fn new(live: Repository, next: CatalogSnapshot) -> Self {
        Self {
            reads: live.clone(),
            live,
            next: Arc::new(next),
        }
    }
}

impl Snapshotting for PublishAfterRightsRead {
    fn pinned(&self) -> Self {
        Self {
            reads: self.live.pinned(),
            live: self.live.clone(),
            next: self.next.clone(),
        }
    }
}

#[async_trait]
impl LocationSource for PublishAfterRightsRead {
    async fn validate_zip(&self, zip: &str) -> anyhow::Result<bool> {
        self.reads.validate_zip(zip).await
    }

    async fn zip_to_region(&self, zip: &str) -> anyhow::Result<Option<RegionCode>> {
        self.reads.zip_to_region(zip).await
    }

    async fn regions(&self) -> anyhow::Result<Vec<Region>> {
        self.reads.regions().await
    }

    async fn teams_for_zip(&self, zip: &str) -> anyhow::Result<Vec<TeamId>> {
        self.reads.teams_for_zip(zip).await
    }

    async fn regions_for_team(&self, team_id: &TeamId) -> anyhow::Result<Vec<RegionCode>> {
        self.reads.regions_for_team(team_id).await
    }
}

#[async_trait]
impl ScheduleSource for PublishAfterRightsRead {
    async fn game_by_id(&self, id: &GameId) -> anyhow::Result<Option<Game>> {
        self.reads.game_by_id(id).await
    }

    async fn games(&self, filter: &GameFilter) -> anyhow::Result<Vec<Game>> {
        self.reads.games(filter).await
    }

    async fn team_by_id(&self, id: &TeamId) -> anyhow::Result<Option<Team>> {
        self.reads.team_by_id(id).await
    }

    async fn teams(&self, league: Option<League>) -> anyhow::Result<Vec<Team>> {
        self.reads.teams(league).await
    }
}

#[async_trait]
impl RightsSource for PublishAfterRightsRead {
    async fn options_by_game(&self, id: &GameId) -> anyhow::Result<Vec<ViewingOptionRecord>> {
        let records = self.reads.options_by_game(id).await?;
        self.live.publish((*self.next).clone());
        Ok(records)
    }

    async fn options(&self) -> anyhow::Result<Vec<ViewingOptionRecord>> {
        self.reads.options().await
    }

    async fn platforms(&self) -> anyhow::Result<Vec<Platform>> {
        self.reads.platforms().await
    }
}

fn seed_without_boston() -> CatalogSnapshot {
    let mut snapshot = CatalogSnapshot::seed().unwrap();
    snapshot.regions.retain(|region| region.code != *"BOS");
    snapshot
}

#[tokio::test]
async fn test_query_reads_one_catalog_version_while_a_new_one_is_published() {
    let live = Repository::seeded().unwrap();
    let app = AppImpl::new(PublishAfterRightsRead::new(live.clone(), seed_without_boston()));
    let ctx = QueryContext::default();
    let game_id = GameId::from("mlb-game-1");

    let grouped = app
        .viewing_options()
        .get_viewing_options(&ctx, &game_id, None)
        .await
        .unwrap();
    assert_eq!(grouped.total(), 3);
    assert!(live.snapshot().regions.iter().all(|region| region.code != *"BOS"));

    // Options blacked out in the retired market no longer pass validation.
    let grouped = app
        .viewing_options()
        .get_viewing_options(&ctx, &game_id, None)
        .await
        .unwrap();
    assert_eq!(providers(grouped.bucket(PlatformCategory::NationalTv)), vec!["ESPN"]);
    assert_eq!(grouped.total(), 1);
}

#[tokio::test]
async fn test_map_covers_the_markets_of_the_version_it_started_on() {
    let live = Repository::seeded().unwrap();
    let app = AppImpl::new(PublishAfterRightsRead::new(live, seed_without_boston()));

    let map = app
        .blackout_map()
        .get_blackout_map(&QueryContext::default(), &GameId::from("mlb-game-1"))
        .await
        .unwrap();

    assert_eq!(map.platforms.len(), 3);
    assert!(map.platforms.iter().all(|platform| platform.regions.len() == 4));
    assert_eq!(
        map.status("local_tv", "BOS"),
        Some(AvailabilityStatus::BlackedOut)
    );
}
