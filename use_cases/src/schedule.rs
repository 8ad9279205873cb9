use crate::errors::{DataIntegrityError, ResolutionError, Upstream};
use crate::query_context::QueryContext;
use crate::region_resolver::{RegionResolver, RegionResolverImpl};
use crate::sources::SourceProvider;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use entities::games::{Game, GameFilter, GameId};
use entities::locations::Region;
use entities::teams::{League, Team, TeamId};
use itertools::Itertools;
#[cfg(test)]
use mockall::automock;
use std::collections::HashMap;
use std::sync::Arc;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait ScheduleInteractor: Send + Sync {
    async fn games(
        &self,
        ctx: &QueryContext,
        filter: &GameFilter,
    ) -> Result<Vec<Game>, ResolutionError>;

    async fn game(&self, ctx: &QueryContext, id: &GameId) -> Result<Game, ResolutionError>;

    /// Games involving any of `team_ids` that start within `days` days of `from`,
    /// earliest first.
    async fn upcoming_games_for_teams(
        &self,
        ctx: &QueryContext,
        team_ids: &[TeamId],
        from: DateTime<Utc>,
        days: u32,
    ) -> Result<Vec<Game>, ResolutionError>;

    async fn teams(
        &self,
        ctx: &QueryContext,
        league: Option<League>,
    ) -> Result<Vec<Team>, ResolutionError>;

    async fn team(&self, ctx: &QueryContext, id: &TeamId) -> Result<Team, ResolutionError>;

    /// Teams whose home market covers the ZIP.
    async fn local_teams(&self, ctx: &QueryContext, zip: &str)
        -> Result<Vec<Team>, ResolutionError>;

    /// Markets the team is local to, in region catalog order.
    async fn regions_for_team(
        &self,
        ctx: &QueryContext,
        team_id: &TeamId,
    ) -> Result<Vec<Region>, ResolutionError>;
}

pub struct ScheduleInteractorImpl {
    sources: Arc<dyn SourceProvider>,
}

impl ScheduleInteractorImpl {
    pub fn new(sources: Arc<dyn SourceProvider>) -> Self {
        Self { sources }
    }
}

#[async_trait]
impl ScheduleInteractor for ScheduleInteractorImpl {
    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn games(
        &self,
        ctx: &QueryContext,
        filter: &GameFilter,
    ) -> Result<Vec<Game>, ResolutionError> {
        let sources = self.sources.pin();
        ctx.call(Upstream::Schedule, sources.schedule.games(filter))
            .await
    }

    async fn game(&self, ctx: &QueryContext, id: &GameId) -> Result<Game, ResolutionError> {
        let sources = self.sources.pin();
        ctx.call(Upstream::Schedule, sources.schedule.game_by_id(id))
            .await?
            .ok_or_else(|| ResolutionError::GameNotFound(id.clone()))
    }

    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn upcoming_games_for_teams(
        &self,
        ctx: &QueryContext,
        team_ids: &[TeamId],
        from: DateTime<Utc>,
        days: u32,
    ) -> Result<Vec<Game>, ResolutionError> {
        if team_ids.is_empty() {
            return Ok(vec![]);
        }
        let until = from + Duration::days(i64::from(days));
        let sources = self.sources.pin();
        let games = ctx
            .call(Upstream::Schedule, sources.schedule.games(&GameFilter::default()))
            .await?;

        Ok(games
            .into_iter()
            .filter(|game| game.start_time >= from && game.start_time < until)
            .filter(|game| team_ids.iter().any(|team| game.involves(team)))
            .sorted_by_key(|game| game.start_time)
            .collect())
    }

    async fn teams(
        &self,
        ctx: &QueryContext,
        league: Option<League>,
    ) -> Result<Vec<Team>, ResolutionError> {
        let sources = self.sources.pin();
        ctx.call(Upstream::Schedule, sources.schedule.teams(league))
            .await
    }

    async fn team(&self, ctx: &QueryContext, id: &TeamId) -> Result<Team, ResolutionError> {
        let sources = self.sources.pin();
        ctx.call(Upstream::Schedule, sources.schedule.team_by_id(id))
            .await?
            .ok_or_else(|| ResolutionError::TeamNotFound(id.clone()))
    }

    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn local_teams(
        &self,
        ctx: &QueryContext,
        zip: &str,
    ) -> Result<Vec<Team>, ResolutionError> {
        let zip = zip.trim();
        let sources = self.sources.pin();
        if !RegionResolverImpl::new(sources.location.clone())
            .validate(ctx, zip)
            .await?
        {
            return Err(ResolutionError::InvalidZip(zip.to_owned()));
        }

        let (team_ids, teams) = tokio::try_join!(
            ctx.call(Upstream::Location, sources.location.teams_for_zip(zip)),
            ctx.call(Upstream::Schedule, sources.schedule.teams(None)),
        )?;
        let mut teams = teams
            .into_iter()
            .map(|team| (team.id.clone(), team))
            .collect::<HashMap<_, _>>();

        Ok(team_ids
            .into_iter()
            .unique()
            .filter_map(|id| {
                let team = teams.remove(&id);
                if team.is_none() {
                    tracing::warn!(zip, team_id = %id, "ZIP is assigned a team missing from the schedule");
                }
                team
            })
            .collect())
    }

    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn regions_for_team(
        &self,
        ctx: &QueryContext,
        team_id: &TeamId,
    ) -> Result<Vec<Region>, ResolutionError> {
        let sources = self.sources.pin();
        let (team, codes, regions) = tokio::try_join!(
            ctx.call(Upstream::Schedule, sources.schedule.team_by_id(team_id)),
            ctx.call(Upstream::Location, sources.location.regions_for_team(team_id)),
            ctx.call(Upstream::Location, sources.location.regions()),
        )?;
        if team.is_none() {
            return Err(ResolutionError::TeamNotFound(team_id.clone()));
        }

        if let Some(unknown) = codes
            .iter()
            .find(|code| !regions.iter().any(|region| region.code == **code))
        {
            return Err(DataIntegrityError::UnknownRegion(unknown.clone()).into());
        }
        Ok(regions
            .into_iter()
            .filter(|region| codes.contains(&region.code))
            .collect())
    }
}
