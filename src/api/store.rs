use async_trait::async_trait;

use super::errors::ApiError;
use crate::domain::{
    Admin, AdminSignupRequest, AdminUpdate, ApplicationStatus, AuthLevel, ConnectRequest,
    DashboardSummary, ImageSlot, ImageUpload, LoginRequest, LoginResponse, ProfileImagesResponse,
    ProfileUpdate, SignupRequest, SignupResponse, TransitionResponse, UploadResponse, User,
    UserRequest, UserStatus,
};

/// The remote backend as the workflows see it.
///
/// Every method is one request; caching and invalidation live above this
/// seam, in the workflows.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RequestStore: Send + Sync {
    // Authentication
    async fn login_user(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn login_admin(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError>;
    async fn application_status(&self, email: &str) -> Result<ApplicationStatus, ApiError>;

    // Members
    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError>;
    async fn list_users(&self) -> Result<Vec<User>, ApiError>;
    async fn get_user(&self, user_id: &str) -> Result<User, ApiError>;
    async fn get_user_by_email(&self, email: &str) -> Result<User, ApiError>;
    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), ApiError>;
    async fn change_user_status(&self, user_id: &str, status: UserStatus) -> Result<(), ApiError>;
    async fn delete_user(&self, user_id: &str, admin_id: &str) -> Result<(), ApiError>;

    // Single profile photo
    async fn upload_profile_photo(
        &self,
        user_id: &str,
        upload: &ImageUpload,
    ) -> Result<UploadResponse, ApiError>;
    async fn delete_profile_photo(&self, user_id: &str) -> Result<(), ApiError>;

    // Numbered profile images
    async fn upload_profile_image(
        &self,
        user_id: &str,
        slot: ImageSlot,
        upload: &ImageUpload,
    ) -> Result<UploadResponse, ApiError>;
    async fn delete_profile_image(&self, user_id: &str, slot: ImageSlot) -> Result<(), ApiError>;
    async fn list_profile_images(&self, user_id: &str) -> Result<ProfileImagesResponse, ApiError>;
    async fn available_image_slots(&self, user_id: &str) -> Result<Vec<u8>, ApiError>;

    // Admin accounts
    async fn create_admin(&self, request: &AdminSignupRequest) -> Result<Admin, ApiError>;
    async fn list_admins(&self) -> Result<Vec<Admin>, ApiError>;
    async fn get_admin(&self, admin_id: &str) -> Result<Admin, ApiError>;
    async fn get_admin_by_email(&self, email: &str) -> Result<Admin, ApiError>;
    async fn update_admin(&self, admin_id: &str, update: &AdminUpdate) -> Result<(), ApiError>;
    async fn remove_admin(&self, admin_id: &str) -> Result<(), ApiError>;
    async fn auth_level(&self, user_id: &str) -> Result<AuthLevel, ApiError>;

    // Signup requests
    async fn dashboard(&self) -> Result<DashboardSummary, ApiError>;
    async fn pending_requests(&self) -> Result<Vec<UserRequest>, ApiError>;
    async fn pending_request(&self, request_id: &str) -> Result<UserRequest, ApiError>;
    async fn approve_request(
        &self,
        request_id: &str,
        admin_id: &str,
    ) -> Result<TransitionResponse, ApiError>;
    async fn reject_request(
        &self,
        request_id: &str,
        admin_id: &str,
    ) -> Result<TransitionResponse, ApiError>;
    async fn delete_pending_request(&self, request_id: &str) -> Result<(), ApiError>;
    async fn delete_all_pending_requests(&self) -> Result<(), ApiError>;

    // Connect requests
    async fn send_connect_request(
        &self,
        sender_id: &str,
        receiver_id: &str,
        message: &str,
    ) -> Result<TransitionResponse, ApiError>;
    async fn accept_connect_request(
        &self,
        receiver_id: &str,
        sender_id: &str,
    ) -> Result<TransitionResponse, ApiError>;
    async fn reject_connect_request(
        &self,
        receiver_id: &str,
        sender_id: &str,
    ) -> Result<TransitionResponse, ApiError>;
    async fn received_requests(&self, receiver_id: &str) -> Result<Vec<ConnectRequest>, ApiError>;
    async fn sent_requests(&self, sender_id: &str) -> Result<Vec<ConnectRequest>, ApiError>;
    async fn connection_status(&self, sender_id: &str, receiver_id: &str) -> Result<bool, ApiError>;
}
