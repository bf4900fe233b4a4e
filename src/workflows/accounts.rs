use std::sync::Arc;
use tracing::info;

use super::errors::{Operation, OperationContext, WorkflowError, WorkflowResult};
use crate::api::{QueryCache, QueryKey, RequestStore};
use crate::domain::{
    AccountType, Admin, AdminSignupRequest, ApplicationStatus, LoginRequest, LoginResponse,
    ProfileUpdate, SignupRequest, SignupResponse, User,
};
use crate::session::{PersistedSession, Session};
use crate::validation::{
    require_user_id, validate_admin_signup, validate_email, validate_login,
    validate_profile_update, validate_signup,
};

/// Signup, login and self-service profile changes.
#[derive(Clone)]
pub struct AccountService {
    store: Arc<dyn RequestStore>,
    cache: QueryCache,
}

impl AccountService {
    pub fn new(store: Arc<dyn RequestStore>, cache: QueryCache) -> Self {
        Self { store, cache }
    }

    /// Submit a signup request for admin review.
    pub async fn signup(&self, request: &SignupRequest) -> WorkflowResult<SignupResponse> {
        validate_signup(request)?;
        let response = self
            .store
            .signup(request)
            .await
            .during(Operation::Signup)?;
        info!(request_id = %response.request_id, "Signup request submitted");
        self.cache.invalidate(&[QueryKey::PendingRequests, QueryKey::AdminDashboard]).await;
        Ok(response)
    }

    pub async fn admin_signup(&self, request: &AdminSignupRequest) -> WorkflowResult<Admin> {
        validate_admin_signup(request)?;
        let admin = self
            .store
            .create_admin(request)
            .await
            .during(Operation::AdminSignup)?;
        info!(admin_id = %admin.id, "Admin account created");
        self.cache.invalidate(&[QueryKey::Admins]).await;
        Ok(admin)
    }

    /// Log in and start the session. A `success: false` answer surfaces the
    /// backend's message.
    pub async fn login<'s>(
        &self,
        session: &'s mut Session,
        credentials: &LoginRequest,
        account: AccountType,
    ) -> WorkflowResult<&'s PersistedSession> {
        let response = self.authenticate(credentials, account).await?;
        Ok(session.start(&response, account)?)
    }

    /// Check credentials without touching any session.
    pub async fn authenticate(
        &self,
        credentials: &LoginRequest,
        account: AccountType,
    ) -> WorkflowResult<LoginResponse> {
        validate_login(credentials)?;
        let response = match account {
            AccountType::User => self.store.login_user(credentials).await,
            AccountType::Admin => self.store.login_admin(credentials).await,
        }
        .during(Operation::Login)?;

        if !response.success {
            let message = response.message.trim();
            return Err(WorkflowError::Rejected(if message.is_empty() {
                Operation::Login.fallback_message()
            } else {
                message.to_string()
            }));
        }
        Ok(response)
    }

    pub async fn application_status(&self, email: &str) -> WorkflowResult<ApplicationStatus> {
        validate_email(email)?;
        let email = email.trim();
        self.cache
            .fetch(QueryKey::ApplicationStatus(email.to_string()), || {
                self.store.application_status(email)
            })
            .await
            .during(Operation::Load("application status"))
    }

    pub async fn current_user(&self, session: &Session) -> WorkflowResult<User> {
        let user = session.require_user()?;
        self.user(&user.id).await
    }

    pub async fn user(&self, user_id: &str) -> WorkflowResult<User> {
        let user_id = require_user_id(user_id)?;
        self.cache
            .fetch(QueryKey::User(user_id.to_string()), || self.store.get_user(user_id))
            .await
            .during(Operation::Load("profile"))
    }

    /// Update the logged-in member's own profile and the session's display name.
    pub async fn update_profile(&self, session: &mut Session, update: &ProfileUpdate) -> WorkflowResult<()> {
        let user_id = session.require_user()?.id.clone();
        validate_profile_update(update)?;

        self.store
            .update_user(&user_id, update)
            .await
            .during(Operation::UpdateProfile)?;
        info!(user_id = %user_id, "Profile updated");
        self.cache.invalidate(&[QueryKey::User(user_id)]).await;
        session.update_display_name(&update.full_name)?;
        Ok(())
    }
}

impl std::fmt::Debug for AccountService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AccountService").finish_non_exhaustive()
    }
}
