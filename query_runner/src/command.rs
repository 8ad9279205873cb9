use anyhow::{bail, Context};
use entities::games::{GameFilter, GameId};
use entities::teams::League;
use std::str::FromStr;
use use_cases::query_context::QueryContext;
use use_cases::App;

const USAGE: &str =
    "usage: query_runner options <game_id> [zip] | platforms [zip] | map <game_id> | games [league]";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    Options { game_id: GameId, zip: Option<String> },
    Platforms { zip: Option<String> },
    Map { game_id: GameId },
    Games { league: Option<League> },
}

impl Command {
    pub fn parse(args: impl IntoIterator<Item = String>) -> anyhow::Result<Self> {
        let mut args = args.into_iter();
        let command = match (args.next().as_deref(), args.next(), args.next()) {
            (Some("options"), Some(game_id), zip) => Command::Options {
                game_id: game_id.into(),
                zip,
            },
            (Some("platforms"), zip, None) => Command::Platforms { zip },
            (Some("map"), Some(game_id), None) => Command::Map {
                game_id: game_id.into(),
            },
            (Some("games"), league, None) => Command::Games {
                league: league
                    .map(|league| {
                        League::from_str(&league)
                            .with_context(|| format!("Unknown league {league:?}"))
                    })
                    .transpose()?,
            },
            _ => bail!(USAGE),
        };
        if args.next().is_some() {
            bail!(USAGE);
        }
        Ok(command)
    }

    pub async fn run(&self, app: &dyn App, ctx: &QueryContext) -> anyhow::Result<serde_json::Value> {
        let output = match self {
            Command::Options { game_id, zip } => serde_json::to_value(
                app.viewing_options()
                    .get_viewing_options(ctx, game_id, zip.as_deref())
                    .await?,
            ),
            Command::Platforms { zip } => serde_json::to_value(
                app.viewing_options()
                    .available_platforms(ctx, zip.as_deref())
                    .await?,
            ),
            Command::Map { game_id } => serde_json::to_value(
                app.blackout_map().get_blackout_map(ctx, game_id).await?,
            ),
            Command::Games { league } => {
                let filter = GameFilter {
                    league: *league,
                    ..GameFilter::default()
                };
                serde_json::to_value(app.schedule().games(ctx, &filter).await?)
            }
        };
        output.context("Failed to serialize the result")
    }
}
