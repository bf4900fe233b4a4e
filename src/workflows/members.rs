use std::sync::Arc;
use tracing::info;

use super::errors::{Operation, OperationContext, WorkflowResult};
use crate::api::{QueryCache, QueryKey, RequestStore};
use crate::domain::{User, UserStatus};
use crate::validation::{require_admin_id, require_user_id};

/// Members a user may browse: everyone active except themselves, optionally
/// narrowed by a case-insensitive name match.
pub fn browsable<'a>(users: &'a [User], viewer_id: &str, search: &str) -> Vec<&'a User> {
    let needle = search.trim().to_lowercase();
    users
        .iter()
        .filter(|user| user.id != viewer_id)
        .filter(|user| user.status == UserStatus::Active)
        .filter(|user| needle.is_empty() || user.full_name.to_lowercase().contains(&needle))
        .collect()
}

/// Admin search over name or email, any status.
pub fn search<'a>(users: &'a [User], term: &str) -> Vec<&'a User> {
    let needle = term.trim().to_lowercase();
    users
        .iter()
        .filter(|user| {
            needle.is_empty()
                || user.full_name.to_lowercase().contains(&needle)
                || user.email.to_lowercase().contains(&needle)
        })
        .collect()
}

#[derive(Clone)]
pub struct MemberDirectory {
    store: Arc<dyn RequestStore>,
    cache: QueryCache,
}

impl MemberDirectory {
    pub fn new(store: Arc<dyn RequestStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    pub async fn list_users(&self) -> WorkflowResult<Vec<User>> {
        self.cache
            .fetch(QueryKey::Users, || self.store.list_users())
            .await
            .during(Operation::Load("users"))
    }

    pub async fn get_user(&self, user_id: &str) -> WorkflowResult<User> {
        self.cache
            .fetch(QueryKey::User(user_id.to_string()), || self.store.get_user(user_id))
            .await
            .during(Operation::Load("user"))
    }

    pub async fn get_user_by_email(&self, email: &str) -> WorkflowResult<User> {
        self.store
            .get_user_by_email(email.trim())
            .await
            .during(Operation::Load("user"))
    }

    pub async fn browse(&self, viewer_id: &str, search_term: &str) -> WorkflowResult<Vec<User>> {
        let viewer_id = require_user_id(viewer_id)?;
        let users = self.list_users().await?;
        Ok(browsable(&users, viewer_id, search_term)
            .into_iter()
            .cloned()
            .collect())
    }

    pub async fn search_users(&self, term: &str) -> WorkflowResult<Vec<User>> {
        let users = self.list_users().await?;
        Ok(search(&users, term).into_iter().cloned().collect())
    }

    pub async fn change_status(&self, user_id: &str, status: UserStatus) -> WorkflowResult<()> {
        self.store
            .change_user_status(user_id, status)
            .await
            .during(Operation::ChangeUserStatus)?;
        info!(user_id = %user_id, status = %status, "User status changed");
        self.invalidate_user_views(user_id).await;
        Ok(())
    }

    pub async fn delete_user(&self, user_id: &str, admin_id: &str) -> WorkflowResult<()> {
        let admin_id = require_admin_id(admin_id)?;
        self.store
            .delete_user(user_id, admin_id)
            .await
            .during(Operation::DeleteUser)?;
        info!(user_id = %user_id, admin_id = %admin_id, "User deleted");
        self.invalidate_user_views(user_id).await;
        Ok(())
    }

    async fn invalidate_user_views(&self, user_id: &str) {
        self.cache
            .invalidate(&[
                QueryKey::Users,
                QueryKey::User(user_id.to_string()),
                QueryKey::AdminDashboard,
            ])
            .await;
    }
}

impl std::fmt::Debug for MemberDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberDirectory").finish_non_exhaustive()
    }
}
