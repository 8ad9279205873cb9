use crate::sources::{
    LocationSource, RightsSource, ScheduleSource, Snapshotting, SourceProvider, Sources,
};
use std::sync::Arc;

pub trait Repository:
    LocationSource + ScheduleSource + RightsSource + Snapshotting + Clone
{
}

impl<T> Repository for T where
    T: Clone + LocationSource + ScheduleSource + RightsSource + Snapshotting
{
}

/// Pins the repository once per operation.
pub(crate) struct RepositoryProvider<R>(pub(crate) R);

impl<R: Repository + 'static> SourceProvider for RepositoryProvider<R> {
    fn pin(&self) -> Sources {
        let pinned = Arc::new(self.0.pinned());
        Sources::new(pinned.clone(), pinned.clone(), pinned)
    }
}
