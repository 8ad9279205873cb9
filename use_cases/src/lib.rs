use crate::blackout_map::{BlackoutMapBuilder, BlackoutMapInteractor};
use crate::option_aggregator::{OptionAggregator, ViewingOptionsInteractor};
use crate::repositories::{Repository, RepositoryProvider};
use crate::schedule::{ScheduleInteractor, ScheduleInteractorImpl};
use crate::sources::SourceProvider;
use std::sync::Arc;

pub mod blackout_evaluator;
pub mod blackout_map;
pub mod errors;
pub mod option_aggregator;
pub mod query_context;
pub mod region_resolver;
mod repositories;
pub mod rights_catalog;
pub mod schedule;
pub mod sources;
pub mod viewer_session;

pub trait App: Send + Sync {
    fn viewing_options(&self) -> &dyn ViewingOptionsInteractor;
    fn blackout_map(&self) -> &dyn BlackoutMapInteractor;
    fn schedule(&self) -> &dyn ScheduleInteractor;
}

pub struct AppImpl {
    viewing_options: Arc<dyn ViewingOptionsInteractor>,
    blackout_map: Arc<dyn BlackoutMapInteractor>,
    schedule: Arc<dyn ScheduleInteractor>,
}

impl App for AppImpl {
    fn viewing_options(&self) -> &dyn ViewingOptionsInteractor {
        self.viewing_options.as_ref()
    }

    fn blackout_map(&self) -> &dyn BlackoutMapInteractor {
        self.blackout_map.as_ref()
    }

    fn schedule(&self) -> &dyn ScheduleInteractor {
        self.schedule.as_ref()
    }
}

impl AppImpl {
    /// Each operation pins the repository once and reads only from that pin.
    pub fn new<R: Repository + 'static>(repo: R) -> Self {
        let sources: Arc<dyn SourceProvider> = Arc::new(RepositoryProvider(repo));

        Self {
            viewing_options: Arc::new(OptionAggregator::new(sources.clone())),
            blackout_map: Arc::new(BlackoutMapBuilder::new(sources.clone())),
            schedule: Arc::new(ScheduleInteractorImpl::new(sources)),
        }
    }
}
