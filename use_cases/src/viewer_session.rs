use crate::errors::ResolutionError;
use crate::query_context::QueryContext;
use crate::schedule::ScheduleInteractor;
use chrono::{DateTime, Utc};
use entities::games::Game;
use entities::teams::{Team, TeamId};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// A team's schedule window: the team, the window start and its length in days.
type TeamWindow = (TeamId, DateTime<Utc>, u32);

/// Per-viewer cache of results derived from the viewer's ZIP.
///
/// Everything cached here belongs to the current ZIP; changing the ZIP throws it all away.
#[derive(Debug, Default)]
pub struct ViewerSession {
    zip: Option<String>,
    local_teams: Option<Vec<Team>>,
    team_games: HashMap<TeamWindow, Vec<Game>>,
}

impl ViewerSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn zip(&self) -> Option<&str> {
        self.zip.as_deref()
    }

    /// Switches the session to `new_zip`. Returns `true` when the key changed and the cached
    /// results were discarded.
    pub fn invalidate_on(&mut self, new_zip: &str) -> bool {
        let new_zip = Some(new_zip.trim()).filter(|zip| !zip.is_empty());
        if self.zip.as_deref() == new_zip {
            return false;
        }
        self.zip = new_zip.map(str::to_owned);
        self.local_teams = None;
        self.team_games.clear();
        true
    }

    pub async fn local_teams(
        &mut self,
        ctx: &QueryContext,
        schedule: &dyn ScheduleInteractor,
    ) -> Result<&[Team], ResolutionError> {
        let Some(zip) = self.zip.as_deref() else {
            return Ok(&[]);
        };
        if self.local_teams.is_none() {
            let teams = schedule.local_teams(ctx, zip).await?;
            self.local_teams = Some(teams);
        }
        Ok(self.local_teams.as_deref().unwrap_or_default())
    }

    pub async fn team_games(
        &mut self,
        ctx: &QueryContext,
        schedule: &dyn ScheduleInteractor,
        team_id: &TeamId,
        from: DateTime<Utc>,
        days: u32,
    ) -> Result<&[Game], ResolutionError> {
        let games = match self.team_games.entry((team_id.clone(), from, days)) {
            Entry::Occupied(cached) => cached.into_mut(),
            Entry::Vacant(slot) => {
                let games = schedule
                    .upcoming_games_for_teams(ctx, std::slice::from_ref(team_id), from, days)
                    .await?;
                slot.insert(games)
            }
        };
        Ok(games.as_slice())
    }
}
