//! One handle over every workflow, all sharing a single query cache so an
//! invalidation in one service is seen by the others.

use std::sync::Arc;

use crate::api::{ApiError, HttpStore, QueryCache, RequestStore};
use crate::config::MaduveConfig;
use crate::workflows::{
    AccountService, AdminDirectory, ConnectionWorkflow, Dashboard, ImageLinks, MemberDirectory,
    ProfileImageService, SignupApprovalWorkflow,
};

#[derive(Debug, Clone)]
pub struct MaduveClient {
    cache: QueryCache,
    pub accounts: AccountService,
    pub members: MemberDirectory,
    pub admins: AdminDirectory,
    pub approvals: SignupApprovalWorkflow,
    pub connections: ConnectionWorkflow,
    pub images: ProfileImageService,
    pub dashboard: Dashboard,
}

impl MaduveClient {
    /// Client talking to the configured backend over HTTP.
    pub fn from_config(config: &MaduveConfig) -> Result<Self, ApiError> {
        let store: Arc<dyn RequestStore> = Arc::new(HttpStore::new(&config.api)?);
        Self::new(store, config)
    }

    pub fn new(store: Arc<dyn RequestStore>, config: &MaduveConfig) -> Result<Self, ApiError> {
        let cache = QueryCache::new(&config.cache);
        let links = ImageLinks::new(&config.api)?;

        Ok(Self {
            accounts: AccountService::new(store.clone(), cache.clone()),
            members: MemberDirectory::new(store.clone(), cache.clone()),
            admins: AdminDirectory::new(store.clone(), cache.clone()),
            approvals: SignupApprovalWorkflow::new(store.clone(), cache.clone()),
            connections: ConnectionWorkflow::new(store.clone(), cache.clone()),
            images: ProfileImageService::new(
                store.clone(),
                cache.clone(),
                links,
                config.images.settle_delay(),
            ),
            dashboard: Dashboard::new(store, cache.clone()),
            cache,
        })
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }
}
