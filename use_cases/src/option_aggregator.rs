use crate::blackout_evaluator::is_available;
use crate::errors::ResolutionError;
use crate::query_context::QueryContext;
use crate::region_resolver::{RegionResolver, RegionResolverImpl};
use crate::rights_catalog::{RightsCatalog, RightsCatalogImpl};
use crate::sources::{SourceProvider, Sources};
use async_trait::async_trait;
use entities::games::GameId;
use entities::locations::RegionAssignment;
use entities::platforms::{Platform, PlatformCategory};
use entities::viewing_options::ViewingOption;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Options a viewer may use for one game, bucketed by category. Empty buckets are absent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedOptions {
    pub game_id: GameId,
    /// `None` when the caller did not supply a location and nothing was filtered.
    pub viewer_region: Option<RegionAssignment>,
    pub groups: BTreeMap<PlatformCategory, Vec<ViewingOption>>,
}

impl GroupedOptions {
    pub fn bucket(&self, category: PlatformCategory) -> &[ViewingOption] {
        self.groups
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn total(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Broadcast tier comes from the rights catalog: a game is nationally broadcast when a
    /// national TV option survives filtering.
    pub fn has_national_broadcast(&self) -> bool {
        self.groups.contains_key(&PlatformCategory::NationalTv)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CategoryCounts {
    /// Options in the catalog for this category.
    pub raw: usize,
    /// Options left after blackout filtering.
    pub available: usize,
}

impl CategoryCounts {
    pub fn blacked_out(&self) -> usize {
        self.raw - self.available
    }
}

/// Grouped options plus per-category counts before and after filtering, so callers can
/// tell "no streaming option exists" from "the streaming option is blacked out".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewingDiagnostics {
    pub options: GroupedOptions,
    pub counts: BTreeMap<PlatformCategory, CategoryCounts>,
}

#[async_trait]
pub trait ViewingOptionsInteractor: Send + Sync {
    async fn get_viewing_options(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
        zip: Option<&str>,
    ) -> Result<GroupedOptions, ResolutionError>;

    async fn get_viewing_diagnostics(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
        zip: Option<&str>,
    ) -> Result<ViewingDiagnostics, ResolutionError>;

    /// Whether at least one option survives filtering for this viewer.
    async fn is_game_available(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
        zip: Option<&str>,
    ) -> Result<bool, ResolutionError>;

    /// Platforms, in platform catalog order, that carry at least one option open to the
    /// viewer for any game.
    async fn available_platforms(
        &self,
        ctx: &QueryContext,
        zip: Option<&str>,
    ) -> Result<Vec<Platform>, ResolutionError>;
}

pub struct OptionAggregator {
    sources: Arc<dyn SourceProvider>,
}

impl OptionAggregator {
    pub fn new(sources: Arc<dyn SourceProvider>) -> Self {
        Self { sources }
    }

    /// `None` when no ZIP was given. An invalid ZIP fails before the catalog is consulted.
    async fn viewer_region(
        &self,
        ctx: &QueryContext,
        sources: &Sources,
        zip: Option<&str>,
    ) -> Result<Option<RegionAssignment>, ResolutionError> {
        let Some(zip) = zip.map(str::trim).filter(|zip| !zip.is_empty()) else {
            return Ok(None);
        };
        RegionResolverImpl::new(sources.location.clone())
            .resolve(ctx, zip)
            .await
            .map(Some)
            .map_err(|err| match err {
                ResolutionError::ZipNotFound(zip) => ResolutionError::InvalidZip(zip),
                other => other,
            })
    }

    async fn viewer_and_options(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
        zip: Option<&str>,
    ) -> Result<(Option<RegionAssignment>, Vec<ViewingOption>), ResolutionError> {
        let sources = self.sources.pin();
        let viewer_region = self.viewer_region(ctx, &sources, zip).await?;
        let options = RightsCatalogImpl::from_sources(&sources)
            .options_for(ctx, game_id)
            .await?;
        Ok((viewer_region, options))
    }
}

/// Buckets options by category, keeping catalog order inside each bucket.
pub fn group_by_category(
    options: impl IntoIterator<Item = ViewingOption>,
) -> BTreeMap<PlatformCategory, Vec<ViewingOption>> {
    let mut groups: BTreeMap<PlatformCategory, Vec<ViewingOption>> = BTreeMap::new();
    for option in options {
        groups.entry(option.category).or_default().push(option);
    }
    groups
}

fn filter_and_count(
    options: Vec<ViewingOption>,
    viewer_region: Option<&RegionAssignment>,
) -> (Vec<ViewingOption>, BTreeMap<PlatformCategory, CategoryCounts>) {
    let region = viewer_region.and_then(RegionAssignment::code);
    let mut counts: BTreeMap<PlatformCategory, CategoryCounts> = BTreeMap::new();
    let available = options
        .into_iter()
        .filter(|option| {
            let counts = counts.entry(option.category).or_default();
            counts.raw += 1;
            let available = is_available(option, region);
            if available {
                counts.available += 1;
            }
            available
        })
        .collect();
    (available, counts)
}

#[async_trait]
impl ViewingOptionsInteractor for OptionAggregator {
    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn get_viewing_options(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
        zip: Option<&str>,
    ) -> Result<GroupedOptions, ResolutionError> {
        self.get_viewing_diagnostics(ctx, game_id, zip)
            .await
            .map(|diagnostics| diagnostics.options)
    }

    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn get_viewing_diagnostics(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
        zip: Option<&str>,
    ) -> Result<ViewingDiagnostics, ResolutionError> {
        let (viewer_region, options) = self.viewer_and_options(ctx, game_id, zip).await?;
        let (available, counts) = filter_and_count(options, viewer_region.as_ref());

        Ok(ViewingDiagnostics {
            options: GroupedOptions {
                game_id: game_id.clone(),
                viewer_region,
                groups: group_by_category(available),
            },
            counts,
        })
    }

    async fn is_game_available(
        &self,
        ctx: &QueryContext,
        game_id: &GameId,
        zip: Option<&str>,
    ) -> Result<bool, ResolutionError> {
        let options = self.get_viewing_options(ctx, game_id, zip).await?;
        Ok(!options.is_empty())
    }

    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn available_platforms(
        &self,
        ctx: &QueryContext,
        zip: Option<&str>,
    ) -> Result<Vec<Platform>, ResolutionError> {
        let sources = self.sources.pin();
        let viewer_region = self.viewer_region(ctx, &sources, zip).await?;
        let region = viewer_region.as_ref().and_then(RegionAssignment::code);
        let catalog = RightsCatalogImpl::from_sources(&sources)
            .full_catalog(ctx)
            .await?;

        Ok(catalog
            .platforms
            .into_iter()
            .filter(|platform| {
                catalog.options.iter().any(|option| {
                    option.platform_code == platform.code && is_available(option, region)
                })
            })
            .collect())
    }
}
