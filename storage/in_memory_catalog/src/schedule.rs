use crate::repository::Repository;
use async_trait::async_trait;
use entities::games::{Game, GameFilter, GameId};
use entities::teams::{League, Team, TeamId};
use itertools::Itertools;
use use_cases::sources::ScheduleSource;

#[async_trait]
impl ScheduleSource for Repository {
    async fn game_by_id(&self, id: &GameId) -> anyhow::Result<Option<Game>> {
        Ok(self
            .snapshot()
            .games
            .iter()
            .find(|game| &game.id == id)
            .cloned())
    }

    async fn games(&self, filter: &GameFilter) -> anyhow::Result<Vec<Game>> {
        Ok(self
            .snapshot()
            .games
            .iter()
            .filter(|game| filter.matches(game))
            .sorted_by_key(|game| game.start_time)
            .cloned()
            .collect())
    }

    async fn team_by_id(&self, id: &TeamId) -> anyhow::Result<Option<Team>> {
        Ok(self
            .snapshot()
            .teams
            .iter()
            .find(|team| &team.id == id)
            .cloned())
    }

    async fn teams(&self, league: Option<League>) -> anyhow::Result<Vec<Team>> {
        Ok(self
            .snapshot()
            .teams
            .iter()
            .filter(|team| league.map_or(true, |league| team.league == league))
            .cloned()
            .collect())
    }
}
