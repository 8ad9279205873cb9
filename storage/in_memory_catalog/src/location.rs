use crate::repository::Repository;
use async_trait::async_trait;
use entities::locations::{Region, RegionCode};
use entities::teams::TeamId;
use itertools::Itertools;
use use_cases::sources::LocationSource;

#[async_trait]
impl LocationSource for Repository {
    async fn validate_zip(&self, zip: &str) -> anyhow::Result<bool> {
        Ok(self.snapshot().zip_code(zip).is_some())
    }

    async fn zip_to_region(&self, zip: &str) -> anyhow::Result<Option<RegionCode>> {
        let snapshot = self.snapshot();
        let zip_code = snapshot
            .zip_code(zip)
            .ok_or_else(|| anyhow::anyhow!("ZIP {zip} is not in the location catalog"))?;
        Ok(zip_code.region_code.clone())
    }

    async fn regions(&self) -> anyhow::Result<Vec<Region>> {
        Ok(self.snapshot().regions.clone())
    }

    async fn teams_for_zip(&self, zip: &str) -> anyhow::Result<Vec<TeamId>> {
        Ok(self
            .snapshot()
            .team_assignments
            .iter()
            .filter(|assignment| assignment.zip_code == *zip)
            .flat_map(|assignment| assignment.teams.iter().cloned())
            .collect())
    }

    async fn regions_for_team(&self, team_id: &TeamId) -> anyhow::Result<Vec<RegionCode>> {
        let snapshot = self.snapshot();
        Ok(snapshot
            .team_assignments
            .iter()
            .filter(|assignment| assignment.teams.contains(team_id))
            .filter_map(|assignment| snapshot.zip_code(assignment.zip_code.as_ref()))
            .filter_map(|zip_code| zip_code.region_code.clone())
            .unique()
            .collect())
    }
}
