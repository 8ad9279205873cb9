use crate::errors::{DataIntegrityError, ResolutionError, Upstream};
use crate::query_context::QueryContext;
use crate::sources::{LocationSource, RightsSource, ScheduleSource, Sources};
use async_trait::async_trait;
use entities::games::GameId;
use entities::locations::{Region, RegionCode};
use entities::platforms::{Platform, PlatformCategory, PlatformCode};
use entities::viewing_options::{Coverage, ViewingOption, ViewingOptionRecord};
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::Arc;
use url::Url;

/// Validated options together with the reference catalogs they were checked against.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CatalogOptions {
    pub options: Vec<ViewingOption>,
    pub platforms: Vec<Platform>,
    pub regions: Vec<Region>,
}

#[async_trait]
pub trait RightsCatalog: Send + Sync {
    /// Validated options for a game in catalog order, plus the platform and region catalogs
    /// used for validation. Records that contradict those catalogs are logged and left out.
    /// When the game has no records the reference catalogs are not fetched and come back empty.
    async fn catalog_for_game(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
    ) -> Result<CatalogOptions, ResolutionError>;

    /// Every validated option in the catalog, across all games.
    async fn full_catalog(&self, ctx: &QueryContext) -> Result<CatalogOptions, ResolutionError>;

    async fn options_for(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
    ) -> Result<Vec<ViewingOption>, ResolutionError> {
        self.catalog_for_game(ctx, game_id)
            .await
            .map(|catalog| catalog.options)
    }
}

pub struct RightsCatalogImpl {
    schedule: Arc<dyn ScheduleSource>,
    rights: Arc<dyn RightsSource>,
    location: Arc<dyn LocationSource>,
}

impl RightsCatalogImpl {
    pub fn new(
        schedule: Arc<dyn ScheduleSource>,
        rights: Arc<dyn RightsSource>,
        location: Arc<dyn LocationSource>,
    ) -> Self {
        Self {
            schedule,
            rights,
            location,
        }
    }

    pub fn from_sources(sources: &Sources) -> Self {
        Self::new(
            sources.schedule.clone(),
            sources.rights.clone(),
            sources.location.clone(),
        )
    }

    async fn validated(
        &self,
        ctx: &QueryContext,
        records: Vec<ViewingOptionRecord>,
    ) -> Result<CatalogOptions, ResolutionError> {
        let (platforms, regions) = tokio::try_join!(
            ctx.call(Upstream::Rights, self.rights.platforms()),
            ctx.call(Upstream::Location, self.location.regions()),
        )?;
        let reference = ReferenceCatalog::new(&platforms, &regions);

        let options = records
            .into_iter()
            .filter_map(|record| {
                let game_id = record.game_id.clone();
                let platform = record.platform.clone();
                match reference.validate(record) {
                    Ok(option) => Some(option),
                    Err(error) => {
                        tracing::warn!(
                            game_id = %game_id,
                            platform = %platform,
                            %error,
                            "excluding viewing option that fails integrity checks"
                        );
                        None
                    }
                }
            })
            .collect();

        Ok(CatalogOptions {
            options,
            platforms,
            regions,
        })
    }
}

#[async_trait]
impl RightsCatalog for RightsCatalogImpl {
    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn catalog_for_game(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
    ) -> Result<CatalogOptions, ResolutionError> {
        ctx.call(Upstream::Schedule, self.schedule.game_by_id(game_id))
            .await?
            .ok_or_else(|| ResolutionError::GameNotFound(game_id.clone()))?;

        let records = ctx
            .call(Upstream::Rights, self.rights.options_by_game(game_id))
            .await?;
        if records.is_empty() {
            return Ok(CatalogOptions::default());
        }
        self.validated(ctx, records).await
    }

    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn full_catalog(&self, ctx: &QueryContext) -> Result<CatalogOptions, ResolutionError> {
        let records = ctx.call(Upstream::Rights, self.rights.options()).await?;
        self.validated(ctx, records).await
    }
}

/// Platform and region catalogs that raw option records are checked against.
pub(crate) struct ReferenceCatalog {
    platforms: HashMap<PlatformCode, Platform>,
    regions: HashSet<RegionCode>,
}

impl ReferenceCatalog {
    pub(crate) fn new(platforms: &[Platform], regions: &[Region]) -> Self {
        Self {
            platforms: platforms
                .iter()
                .map(|platform| (platform.code.clone(), platform.clone()))
                .collect(),
            regions: regions.iter().map(|region| region.code.clone()).collect(),
        }
    }

    pub(crate) fn validate(
        &self,
        record: ViewingOptionRecord,
    ) -> Result<ViewingOption, DataIntegrityError> {
        let platform = self
            .platforms
            .get(&record.platform)
            .ok_or_else(|| DataIntegrityError::UnknownPlatform(record.platform.clone()))?;

        let category = match record.category.as_deref() {
            None => platform.category,
            Some(raw) => {
                let found = PlatformCategory::from_str(raw)
                    .map_err(|_| DataIntegrityError::UnknownCategory(raw.to_owned()))?;
                if found != platform.category {
                    return Err(DataIntegrityError::CategoryMismatch {
                        platform: platform.code.clone(),
                        expected: platform.category,
                        found,
                    });
                }
                found
            }
        };

        if record.url.is_some() && !category.links_directly() {
            return Err(DataIntegrityError::UnexpectedUrl {
                platform: platform.code.clone(),
                category,
            });
        }
        let url = record
            .url
            .map(|raw| Url::parse(&raw).map_err(|_| DataIntegrityError::InvalidUrl(raw)))
            .transpose()?;

        let blackout_regions = match record.blackout_regions {
            None => Coverage::Unrecorded,
            Some(codes) => {
                if let Some(unknown) = codes.iter().find(|code| !self.regions.contains(*code)) {
                    return Err(DataIntegrityError::UnknownRegion(unknown.clone()));
                }
                Coverage::Recorded(codes.into_iter().collect())
            }
        };

        Ok(ViewingOption {
            game_id: record.game_id,
            platform_code: record.platform,
            category,
            provider: record.provider,
            channel: record.channel,
            url,
            blackout_regions,
        })
    }
}
