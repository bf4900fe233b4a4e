use std::sync::Arc;
use tracing::info;

use super::errors::{Operation, OperationContext, WorkflowResult};
use crate::api::{QueryCache, QueryKey, RequestStore};
use crate::domain::{Admin, AdminUpdate, AuthLevel};
use crate::validation::{require, require_admin_id, validate_email, ValidationError};

#[derive(Clone)]
pub struct AdminDirectory {
    store: Arc<dyn RequestStore>,
    cache: QueryCache,
}

impl AdminDirectory {
    pub fn new(store: Arc<dyn RequestStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub async fn list(&self) -> WorkflowResult<Vec<Admin>> {
        self.cache
            .fetch(QueryKey::Admins, || self.store.list_admins())
            .await
            .during(Operation::Load("admins"))
    }

    pub async fn get(&self, admin_id: &str) -> WorkflowResult<Admin> {
        self.cache
            .fetch(QueryKey::Admin(admin_id.to_string()), || self.store.get_admin(admin_id))
            .await
            .during(Operation::Load("admin"))
    }

    pub async fn get_by_email(&self, email: &str) -> WorkflowResult<Admin> {
        self.store
            .get_admin_by_email(email.trim())
            .await
            .during(Operation::Load("admin"))
    }

    pub async fn update(&self, admin_id: &str, update: &AdminUpdate) -> WorkflowResult<()> {
        let admin_id = require_admin_id(admin_id)?;
        require("Full Name", &update.full_name)?;
        validate_email(&update.email)?;
        require("Phone", &update.phone)?;

        self.store
            .update_admin(admin_id, update)
            .await
            .during(Operation::UpdateAdmin)?;
        info!(admin_id = %admin_id, "Admin updated");
        self.cache
            .invalidate(&[QueryKey::Admins, QueryKey::Admin(admin_id.to_string())])
            .await;
        Ok(())
    }

    /// Remove another admin account. Removing the account you are logged in
    /// with is refused.
    pub async fn remove(&self, acting_admin_id: &str, target_admin_id: &str) -> WorkflowResult<()> {
        let acting_admin_id = require_admin_id(acting_admin_id)?;
        if acting_admin_id == target_admin_id.trim() {
            return Err(ValidationError::SelfRemoval.into());
        }

        self.store
            .remove_admin(target_admin_id)
            .await
            .during(Operation::RemoveAdmin)?;
        info!(
            admin_id = %target_admin_id,
            removed_by = %acting_admin_id,
            "Admin removed"
        );
        self.cache
            .invalidate(&[
                QueryKey::Admins,
                QueryKey::Admin(target_admin_id.to_string()),
                QueryKey::AdminDashboard,
            ])
            .await;
        Ok(())
    }

    pub async fn auth_level(&self, user_id: &str) -> WorkflowResult<AuthLevel> {
        self.store
            .auth_level(user_id)
            .await
            .during(Operation::Load("auth level"))
    }
}

impl std::fmt::Debug for AdminDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminDirectory").finish_non_exhaustive()
    }
}
