use crate::teams::{League, Team, TeamId};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared_kernel::string_key;

string_key!(GameId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Scheduled,
    InProgress,
    Final,
    Postponed,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Game {
    pub id: GameId,
    pub league: League,
    pub home_team: Team,
    pub away_team: Team,
    pub start_time: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
    pub status: GameStatus,
}

impl Game {
    pub fn involves(&self, team: &TeamId) -> bool {
        &self.home_team.id == team || &self.away_team.id == team
    }

    /// Calendar date of the start time in UTC.
    pub fn date(&self) -> NaiveDate {
        self.start_time.date_naive()
    }
}

/// Optional filters for schedule lookups. Unset fields match every game.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameFilter {
    pub date: Option<NaiveDate>,
    pub league: Option<League>,
    pub team_id: Option<TeamId>,
}

impl GameFilter {
    pub fn matches(&self, game: &Game) -> bool {
        self.date.map_or(true, |date| game.date() == date)
            && self.league.map_or(true, |league| game.league == league)
            && self
                .team_id
                .as_ref()
                .map_or(true, |team| game.involves(team))
    }
}
