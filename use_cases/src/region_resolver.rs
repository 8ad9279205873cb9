use crate::errors::{DataIntegrityError, ResolutionError, Upstream};
use crate::query_context::QueryContext;
use crate::sources::LocationSource;
use async_trait::async_trait;
use entities::locations::{is_well_formed_zip, RegionAssignment};
use std::sync::Arc;

#[async_trait]
pub trait RegionResolver: Send + Sync {
    /// `false` for input that is not five digits or is unknown to the location source.
    async fn validate(&self, ctx: &QueryContext, zip: &str) -> Result<bool, ResolutionError>;

    /// Distinguishes a valid ZIP without a market (`Unresolved`) from an invalid ZIP
    /// (`ZipNotFound`).
    async fn resolve(
        &self,
        ctx: &QueryContext,
        zip: &str,
    ) -> Result<RegionAssignment, ResolutionError>;
}

pub struct RegionResolverImpl {
    location: Arc<dyn LocationSource>,
}

impl RegionResolverImpl {
    pub fn new(location: Arc<dyn LocationSource>) -> Self {
        Self { location }
    }
}

#[async_trait]
impl RegionResolver for RegionResolverImpl {
    async fn validate(&self, ctx: &QueryContext, zip: &str) -> Result<bool, ResolutionError> {
        if !is_well_formed_zip(zip) {
            return Ok(false);
        }
        ctx.call(Upstream::Location, self.location.validate_zip(zip))
            .await
    }

    #[tracing::instrument(err, skip(self, ctx), level = "info")]
    async fn resolve(
        &self,
        ctx: &QueryContext,
        zip: &str,
    ) -> Result<RegionAssignment, ResolutionError> {
        if !self.validate(ctx, zip).await? {
            return Err(ResolutionError::ZipNotFound(zip.to_owned()));
        }

        let region_code = ctx
            .call(Upstream::Location, self.location.zip_to_region(zip))
            .await?;
        let Some(region_code) = region_code else {
            return Ok(RegionAssignment::Unresolved);
        };

        let regions = ctx
            .call(Upstream::Location, self.location.regions())
            .await?;
        regions
            .into_iter()
            .find(|region| region.code == region_code)
            .map(RegionAssignment::Resolved)
            .ok_or_else(|| DataIntegrityError::UnknownRegion(region_code).into())
    }
}
