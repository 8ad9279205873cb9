use entities::games::GameId;
use entities::locations::RegionCode;
use entities::platforms::{PlatformCategory, PlatformCode};
use entities::teams::TeamId;
use strum::Display;
use thiserror::Error;

/// The collaborator a failed call was made to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "snake_case")]
pub enum Upstream {
    Location,
    Schedule,
    Rights,
}

#[derive(Error, Debug)]
pub enum ResolutionError {
    #[error("Invalid ZIP code: {0:?}")]
    InvalidZip(String),
    #[error("ZIP code {0:?} not found")]
    ZipNotFound(String),
    #[error("Game {0} not found")]
    GameNotFound(GameId),
    #[error("Team {0} not found")]
    TeamNotFound(TeamId),
    #[error("Game {0} has no viewing options")]
    NoOptionsForGame(GameId),
    #[error(transparent)]
    DataIntegrity(#[from] DataIntegrityError),
    #[error("The {0} source did not answer in time")]
    UpstreamTimeout(Upstream),
    #[error("The {upstream} source is unavailable")]
    UpstreamUnavailable {
        upstream: Upstream,
        #[source]
        source: anyhow::Error,
    },
    #[error("Query cancelled")]
    Cancelled,
}

impl ResolutionError {
    /// Upstream failures may succeed on a later attempt. Retrying is left to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            ResolutionError::UpstreamTimeout(_) | ResolutionError::UpstreamUnavailable { .. }
        )
    }
}

/// Reference data that contradicts the region or platform catalogs.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataIntegrityError {
    #[error("platform {0} is not in the platform catalog")]
    UnknownPlatform(PlatformCode),
    #[error("category {0:?} is not a known platform category")]
    UnknownCategory(String),
    #[error("platform {platform} is registered as {expected} but the option says {found}")]
    CategoryMismatch {
        platform: PlatformCode,
        expected: PlatformCategory,
        found: PlatformCategory,
    },
    #[error("region {0} is not in the region catalog")]
    UnknownRegion(RegionCode),
    #[error("url {0:?} cannot be parsed")]
    InvalidUrl(String),
    #[error("{category} platform {platform} cannot carry a direct link")]
    UnexpectedUrl {
        platform: PlatformCode,
        category: PlatformCategory,
    },
}
