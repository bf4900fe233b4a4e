use std::sync::Arc;

use super::errors::{Operation, OperationContext, WorkflowResult};
use crate::api::{QueryCache, QueryKey, RequestStore};
use crate::domain::DashboardSummary;

/// Read-through of the backend's pre-aggregated admin summary.
#[derive(Clone)]
pub struct Dashboard {
    store: Arc<dyn RequestStore>,
    cache: QueryCache,
}

impl Dashboard {
    pub fn new(store: Arc<dyn RequestStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub async fn summary(&self) -> WorkflowResult<DashboardSummary> {
        self.cache
            .fetch(QueryKey::AdminDashboard, || self.store.dashboard())
            .await
            .during(Operation::Load("dashboard"))
    }
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard").finish_non_exhaustive()
    }
}
