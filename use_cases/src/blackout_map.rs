use crate::blackout_evaluator::is_available;
use crate::errors::ResolutionError;
use crate::query_context::QueryContext;
use crate::rights_catalog::{RightsCatalog, RightsCatalogImpl};
use crate::sources::SourceProvider;
use async_trait::async_trait;
use entities::games::GameId;
use entities::locations::{Region, RegionCode};
use entities::platforms::{PlatformCategory, PlatformCode};
use entities::viewing_options::{Coverage, ViewingOption};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AvailabilityStatus {
    Available,
    BlackedOut,
    /// The platform has no coverage record for this game. Never the same as `Available`.
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegionAvailability {
    pub region: RegionCode,
    pub description: String,
    pub status: AvailabilityStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlatformAvailability {
    pub platform: PlatformCode,
    pub category: PlatformCategory,
    pub providers: Vec<String>,
    /// One entry per region, in region catalog order.
    pub regions: Vec<RegionAvailability>,
}

impl PlatformAvailability {
    pub fn status(&self, region: &str) -> Option<AvailabilityStatus> {
        self.regions
            .iter()
            .find(|availability| availability.region == *region)
            .map(|availability| availability.status)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlackoutMap {
    pub game_id: GameId,
    /// First platform in catalog order, preselected by map views.
    pub default_platform: PlatformCode,
    pub platforms: Vec<PlatformAvailability>,
}

impl BlackoutMap {
    pub fn platform(&self, code: &str) -> Option<&PlatformAvailability> {
        self.platforms
            .iter()
            .find(|platform| platform.platform == *code)
    }

    pub fn status(&self, platform: &str, region: &str) -> Option<AvailabilityStatus> {
        self.platform(platform)
            .and_then(|platform| platform.status(region))
    }
}

#[async_trait]
pub trait BlackoutMapInteractor: Send + Sync {
    async fn get_blackout_map(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
    ) -> Result<BlackoutMap, ResolutionError>;
}

pub struct BlackoutMapBuilder {
    sources: Arc<dyn SourceProvider>,
}

impl BlackoutMapBuilder {
    pub fn new(sources: Arc<dyn SourceProvider>) -> Self {
        Self { sources }
    }
}

/// The options recorded for one platform. Every option carries the platform's category.
struct PlatformOptions<'a> {
    code: &'a PlatformCode,
    category: PlatformCategory,
    options: Vec<&'a ViewingOption>,
}

/// Options grouped per platform, platforms in order of first appearance.
fn options_per_platform(options: &[ViewingOption]) -> Vec<PlatformOptions<'_>> {
    let mut platforms: Vec<PlatformOptions<'_>> = vec![];
    for option in options {
        match platforms
            .iter_mut()
            .find(|platform| platform.code == &option.platform_code)
        {
            Some(platform) => platform.options.push(option),
            None => platforms.push(PlatformOptions {
                code: &option.platform_code,
                category: option.category,
                options: vec![option],
            }),
        }
    }
    platforms
}

/// A region is open when any option with a coverage record leaves it open.
fn region_status(options: &[&ViewingOption], region: &RegionCode) -> AvailabilityStatus {
    let mut recorded = options
        .iter()
        .filter(|option| matches!(option.blackout_regions, Coverage::Recorded(_)))
        .peekable();
    if recorded.peek().is_none() {
        return AvailabilityStatus::NoData;
    }
    if recorded.any(|option| is_available(option, Some(region))) {
        AvailabilityStatus::Available
    } else {
        AvailabilityStatus::BlackedOut
    }
}

fn platform_availability(platform: &PlatformOptions<'_>, regions: &[Region]) -> PlatformAvailability {
    PlatformAvailability {
        platform: platform.code.clone(),
        category: platform.category,
        providers: platform
            .options
            .iter()
            .map(|option| option.provider.clone())
            .collect(),
        regions: regions
            .iter()
            .map(|region| RegionAvailability {
                region: region.code.clone(),
                description: region.description.clone(),
                status: region_status(&platform.options, &region.code),
            })
            .collect(),
    }
}

#[async_trait]
impl BlackoutMapInteractor for BlackoutMapBuilder {
    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn get_blackout_map(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
    ) -> Result<BlackoutMap, ResolutionError> {
        let sources = self.sources.pin();
        let catalog = RightsCatalogImpl::from_sources(&sources)
            .catalog_for_game(ctx, game_id)
            .await?;
        let per_platform = options_per_platform(&catalog.options);
        let Some(default_platform) = per_platform.first() else {
            return Err(ResolutionError::NoOptionsForGame(game_id.clone()));
        };

        Ok(BlackoutMap {
            game_id: game_id.clone(),
            default_platform: default_platform.code.clone(),
            platforms: per_platform
                .iter()
                .map(|platform| platform_availability(platform, &catalog.regions))
                .collect(),
        })
    }
}
