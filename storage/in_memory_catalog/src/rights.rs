use crate::repository::Repository;
use async_trait::async_trait;
use entities::games::GameId;
use entities::platforms::Platform;
use entities::viewing_options::ViewingOptionRecord;
use use_cases::sources::RightsSource;

#[async_trait]
impl RightsSource for Repository {
    async fn options_by_game(&self, id: &GameId) -> anyhow::Result<Vec<ViewingOptionRecord>> {
        Ok(self
            .snapshot()
            .viewing_options
            .iter()
            .filter(|record| &record.game_id == id)
            .cloned()
            .collect())
    }

    async fn options(&self) -> anyhow::Result<Vec<ViewingOptionRecord>> {
        Ok(self.snapshot().viewing_options.clone())
    }

    async fn platforms(&self) -> anyhow::Result<Vec<Platform>> {
        Ok(self.snapshot().platforms.clone())
    }
}
