use async_trait::async_trait;

use super::client::ApiClient;
use super::errors::ApiError;
use super::store::RequestStore;
use crate::config::ApiConfig;
use crate::domain::{
    Admin, AdminSignupRequest, AdminUpdate, ApplicationStatus, AuthLevel, AuthLevelResponse,
    AvailableSlotsResponse, ConnectRequest, ConnectRequestBody, ConnectionStatus,
    DashboardSummary, ImageSlot, ImageUpload, LoginRequest, LoginResponse, ProfileImagesResponse,
    ProfileUpdate, SignupRequest, SignupResponse, StatusChange, TransitionResponse,
    UploadResponse, User, UserRequest, UserStatus,
};

/// `RequestStore` backed by the REST API.
#[derive(Debug, Clone)]
pub struct HttpStore {
    client: ApiClient,
    connect_segment: String,
    images_segment: String,
}

impl HttpStore {
    pub fn new(config: &ApiConfig) -> Result<Self, ApiError> {
        Ok(Self {
            client: ApiClient::new(config)?,
            connect_segment: config.connect_requests_path.trim_matches('/').to_string(),
            images_segment: config.profile_images_path.trim_matches('/').to_string(),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    async fn upload(&self, segments: &[&str], upload: &ImageUpload) -> Result<UploadResponse, ApiError> {
        let value: serde_json::Value = self.client.upload_file(segments, upload).await?;
        if value.is_null() {
            return Ok(UploadResponse {
                message: String::new(),
                size: upload.bytes.len() as u64,
            });
        }
        Ok(serde_json::from_value(value)?)
    }
}

#[async_trait]
impl RequestStore for HttpStore {
    async fn login_user(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client.post(&["login", "user"], credentials).await
    }

    async fn login_admin(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.client.post(&["login", "admin"], credentials).await
    }

    async fn application_status(&self, email: &str) -> Result<ApplicationStatus, ApiError> {
        self.client.get(&["login", "status", email]).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.client.post(&["users", "signup"], request).await
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.client.get(&["users"]).await
    }

    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.client.get(&["users", user_id]).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, ApiError> {
        self.client.get(&["users", "email", email]).await
    }

    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.client.put_unit(&["users", user_id], update).await
    }

    async fn change_user_status(&self, user_id: &str, status: UserStatus) -> Result<(), ApiError> {
        self.client
            .patch(&["users", user_id, "status"], &StatusChange { status })
            .await
    }

    async fn delete_user(&self, user_id: &str, admin_id: &str) -> Result<(), ApiError> {
        self.client
            .delete_with_query(&["users", user_id], &[("adminId", admin_id)])
            .await
    }

    async fn upload_profile_photo(
        &self,
        user_id: &str,
        upload: &ImageUpload,
    ) -> Result<UploadResponse, ApiError> {
        self.upload(&["users", user_id, "photo"], upload).await
    }

    async fn delete_profile_photo(&self, user_id: &str) -> Result<(), ApiError> {
        self.client.delete(&["users", user_id, "photo"]).await
    }

    async fn upload_profile_image(
        &self,
        user_id: &str,
        slot: ImageSlot,
        upload: &ImageUpload,
    ) -> Result<UploadResponse, ApiError> {
        let slot = slot.to_string();
        self.upload(&[self.images_segment.as_str(), user_id, "upload", slot.as_str()], upload)
            .await
    }

    async fn delete_profile_image(&self, user_id: &str, slot: ImageSlot) -> Result<(), ApiError> {
        let slot = slot.to_string();
        self.client
            .delete(&[self.images_segment.as_str(), user_id, "image", slot.as_str()])
            .await
    }

    async fn list_profile_images(&self, user_id: &str) -> Result<ProfileImagesResponse, ApiError> {
        self.client.get(&[self.images_segment.as_str(), user_id, "all"]).await
    }

    async fn available_image_slots(&self, user_id: &str) -> Result<Vec<u8>, ApiError> {
        let response: AvailableSlotsResponse = self
            .client
            .get(&[self.images_segment.as_str(), user_id, "available-slots"])
            .await?;
        Ok(response.available_slots)
    }

    async fn create_admin(&self, request: &AdminSignupRequest) -> Result<Admin, ApiError> {
        self.client.post(&["admin", "signup"], request).await
    }

    async fn list_admins(&self) -> Result<Vec<Admin>, ApiError> {
        self.client.get(&["admin"]).await
    }

    async fn get_admin(&self, admin_id: &str) -> Result<Admin, ApiError> {
        self.client.get(&["admin", admin_id]).await
    }

    async fn get_admin_by_email(&self, email: &str) -> Result<Admin, ApiError> {
        self.client.get(&["admin", "email", email]).await
    }

    async fn update_admin(&self, admin_id: &str, update: &AdminUpdate) -> Result<(), ApiError> {
        self.client.put_unit(&["admin", admin_id], update).await
    }

    async fn remove_admin(&self, admin_id: &str) -> Result<(), ApiError> {
        self.client.delete(&["admin", admin_id]).await
    }

    async fn auth_level(&self, user_id: &str) -> Result<AuthLevel, ApiError> {
        let response: AuthLevelResponse = self.client.get(&["admin", "auth-level", user_id]).await?;
        Ok(response.auth_level)
    }

    async fn dashboard(&self) -> Result<DashboardSummary, ApiError> {
        self.client.get(&["admin", "dashboard"]).await
    }

    async fn pending_requests(&self) -> Result<Vec<UserRequest>, ApiError> {
        self.client.get(&["admin", "requests", "pending"]).await
    }

    async fn pending_request(&self, request_id: &str) -> Result<UserRequest, ApiError> {
        self.client.get(&["admin", "requests", request_id]).await
    }

    async fn approve_request(
        &self,
        request_id: &str,
        admin_id: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.client
            .post_raw_string::<Option<TransitionResponse>>(
                &["admin", "requests", request_id, "approve"],
                admin_id,
            )
            .await
            .map(Option::unwrap_or_default)
    }

    async fn reject_request(
        &self,
        request_id: &str,
        admin_id: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.client
            .post_raw_string::<Option<TransitionResponse>>(
                &["admin", "requests", request_id, "reject"],
                admin_id,
            )
            .await
            .map(Option::unwrap_or_default)
    }

    async fn delete_pending_request(&self, request_id: &str) -> Result<(), ApiError> {
        self.client.delete(&["admin", "requests", request_id]).await
    }

    async fn delete_all_pending_requests(&self) -> Result<(), ApiError> {
        self.client.delete(&["admin", "requests", "all"]).await
    }

    async fn send_connect_request(
        &self,
        sender_id: &str,
        receiver_id: &str,
        message: &str,
    ) -> Result<TransitionResponse, ApiError> {
        let body = ConnectRequestBody {
            receiver_id: receiver_id.to_string(),
            message: message.to_string(),
        };
        self.client
            .post::<Option<TransitionResponse>, _>(
                &[self.connect_segment.as_str(), "sender", sender_id, "send"],
                &body,
            )
            .await
            .map(Option::unwrap_or_default)
    }

    async fn accept_connect_request(
        &self,
        receiver_id: &str,
        sender_id: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.client
            .post_empty::<Option<TransitionResponse>>(&[
                self.connect_segment.as_str(),
                "receiver",
                receiver_id,
                "accept",
                sender_id,
            ])
            .await
            .map(Option::unwrap_or_default)
    }

    async fn reject_connect_request(
        &self,
        receiver_id: &str,
        sender_id: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.client
            .post_empty::<Option<TransitionResponse>>(&[
                self.connect_segment.as_str(),
                "receiver",
                receiver_id,
                "reject",
                sender_id,
            ])
            .await
            .map(Option::unwrap_or_default)
    }

    async fn received_requests(&self, receiver_id: &str) -> Result<Vec<ConnectRequest>, ApiError> {
        self.client
            .get(&[self.connect_segment.as_str(), "receiver", receiver_id, "pending"])
            .await
    }

    async fn sent_requests(&self, sender_id: &str) -> Result<Vec<ConnectRequest>, ApiError> {
        self.client
            .get(&[self.connect_segment.as_str(), "sender", sender_id, "sent"])
            .await
    }

    async fn connection_status(&self, sender_id: &str, receiver_id: &str) -> Result<bool, ApiError> {
        let status: ConnectionStatus = self
            .client
            .get(&[self.connect_segment.as_str(), "check", sender_id, receiver_id])
            .await?;
        Ok(status.has_active_connection)
    }
}
