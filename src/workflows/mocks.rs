// In-memory backend for workflow tests - no network, records every call

use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use crate::api::{ApiError, RequestStore};
use crate::domain::{
    AccountType, Admin, AdminSignupRequest, AdminUpdate, ApplicationStatus, AuthLevel,
    ConnectRequest, ConnectRequestStatus, DashboardSummary, ImageSlot, ImageUpload, LoginRequest,
    LoginResponse, ProfileImage, ProfileImagesResponse, ProfileUpdate, SignupRequest,
    SignupResponse, TransitionResponse, UploadResponse, User, UserRequest, UserStatus,
};

#[derive(Debug, Default)]
struct Backend {
    users: BTreeMap<String, User>,
    requests: BTreeMap<String, UserRequest>,
    admins: BTreeMap<String, Admin>,
    connects: Vec<ConnectRequest>,
    images: HashMap<String, BTreeMap<u8, ProfileImage>>,
    next_id: u32,
}

impl Backend {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{prefix}{}", self.next_id)
    }
}

/// Store that keeps everything in memory and logs each call by name.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    backend: Mutex<Backend>,
    calls: Mutex<Vec<String>>,
    failure: Mutex<Option<(u16, Option<String>)>>,
}

pub fn sample_user(id: &str, name: &str, status: UserStatus) -> User {
    let now = Utc::now();
    User {
        id: id.to_string(),
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase().replace(' ', ".")),
        phone: "555-0100".to_string(),
        ecclesia: "Bangalore".to_string(),
        language: "English".to_string(),
        education: "BSc".to_string(),
        bio: "Hi".to_string(),
        has_profile_photo: false,
        has_profile_image1: false,
        has_profile_image2: false,
        has_profile_image3: false,
        status,
        created_at: now,
        updated_at: now,
    }
}

pub fn sample_request(id: &str, name: &str) -> UserRequest {
    UserRequest {
        id: id.to_string(),
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "555-0100".to_string(),
        ecclesia: "Bangalore".to_string(),
        language: "English".to_string(),
        education: "BSc".to_string(),
        bio: "Hi".to_string(),
        status: UserStatus::Pending,
        created_at: Utc::now(),
    }
}

pub fn sample_admin(id: &str, name: &str) -> Admin {
    Admin {
        id: id.to_string(),
        full_name: name.to_string(),
        email: format!("{}@example.com", name.to_lowercase()),
        phone: "555-0199".to_string(),
        is_active: true,
        created_at: Utc::now(),
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, user: User) -> Self {
        self.lock().users.insert(user.id.clone(), user);
        self
    }

    pub fn with_request(self, request: UserRequest) -> Self {
        self.lock().requests.insert(request.id.clone(), request);
        self
    }

    pub fn with_admin(self, admin: Admin) -> Self {
        self.lock().admins.insert(admin.id.clone(), admin);
        self
    }

    /// Make every following call fail with this status and optional message.
    pub fn fail_with(&self, status: u16, message: Option<&str>) {
        *self.failure.lock().unwrap() = Some((status, message.map(str::to_string)));
    }

    pub fn recover(&self) {
        *self.failure.lock().unwrap() = None;
    }

    pub fn get_executed_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.as_str() == name)
            .count()
    }

    pub fn request_status(&self, id: &str) -> Option<UserStatus> {
        self.lock().requests.get(id).map(|request| request.status)
    }

    pub fn user(&self, id: &str) -> Option<User> {
        self.lock().users.get(id).cloned()
    }

    pub fn connect_status(&self, sender_id: &str, receiver_id: &str) -> Option<ConnectRequestStatus> {
        self.lock()
            .connects
            .iter()
            .find(|c| c.sender_id == sender_id && c.receiver_id == receiver_id)
            .map(|c| c.status)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Backend> {
        self.backend.lock().unwrap()
    }

    fn record(&self, call: &str) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call.to_string());
        match self.failure.lock().unwrap().clone() {
            Some((status, Some(message))) => Err(ApiError::remote(status, message)),
            Some((status, None)) => Err(ApiError::from_body(status, String::new())),
            None => Ok(()),
        }
    }

    fn not_found(what: &str) -> ApiError {
        ApiError::remote(404, format!("{what} not found"))
    }

    fn decide(&self, request_id: &str, status: UserStatus) -> Result<TransitionResponse, ApiError> {
        let mut backend = self.lock();
        let request = backend
            .requests
            .get_mut(request_id)
            .ok_or_else(|| Self::not_found("Request"))?;
        if request.status != UserStatus::Pending {
            return Err(ApiError::remote(400, "Request already processed"));
        }
        request.status = status;
        let approved = request.clone();
        if status == UserStatus::Active {
            let mut user = sample_user(&approved.id, &approved.full_name, UserStatus::Active);
            user.email = approved.email.clone();
            backend.users.insert(user.id.clone(), user);
        }
        Ok(TransitionResponse {
            id: request_id.to_string(),
            status: status.label().to_string(),
            message: format!("Request {}", status.label().to_lowercase()),
        })
    }

    fn answer(
        &self,
        receiver_id: &str,
        sender_id: &str,
        status: ConnectRequestStatus,
    ) -> Result<TransitionResponse, ApiError> {
        let mut backend = self.lock();
        let request = backend
            .connects
            .iter_mut()
            .find(|c| {
                c.sender_id == sender_id
                    && c.receiver_id == receiver_id
                    && c.status == ConnectRequestStatus::Pending
            })
            .ok_or_else(|| Self::not_found("Connect request"))?;
        request.status = status;
        Ok(TransitionResponse {
            id: request.id.clone(),
            status: status.label().to_string(),
            message: format!("Request {}", status.label().to_lowercase()),
        })
    }

    fn set_image_flag(&self, user_id: &str, slot: u8, value: bool) {
        if let Some(user) = self.lock().users.get_mut(user_id) {
            match slot {
                1 => user.has_profile_image1 = value,
                2 => user.has_profile_image2 = value,
                _ => user.has_profile_image3 = value,
            }
        }
    }

    fn login(&self, credentials: &LoginRequest, account: AccountType) -> LoginResponse {
        let backend = self.lock();
        let found = match account {
            AccountType::User => backend
                .users
                .values()
                .find(|u| u.email == credentials.email)
                .map(|u| (u.id.clone(), u.full_name.clone(), Some(u.status))),
            AccountType::Admin => backend
                .admins
                .values()
                .find(|a| a.email == credentials.email)
                .map(|a| (a.id.clone(), a.full_name.clone(), None)),
        };
        match found {
            Some((id, name, status)) => LoginResponse {
                success: true,
                message: "Login successful".to_string(),
                user_id: Some(id),
                user_type: Some(account),
                user_name: Some(name),
                status,
            },
            None => LoginResponse {
                success: false,
                message: "Invalid email or password".to_string(),
                user_id: None,
                user_type: None,
                user_name: None,
                status: None,
            },
        }
    }
}

#[async_trait]
impl RequestStore for InMemoryStore {
    async fn login_user(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record("login_user")?;
        Ok(self.login(credentials, AccountType::User))
    }

    async fn login_admin(&self, credentials: &LoginRequest) -> Result<LoginResponse, ApiError> {
        self.record("login_admin")?;
        Ok(self.login(credentials, AccountType::Admin))
    }

    async fn application_status(&self, email: &str) -> Result<ApplicationStatus, ApiError> {
        self.record("application_status")?;
        let backend = self.lock();
        let request = backend
            .requests
            .values()
            .find(|r| r.email == email)
            .ok_or_else(|| Self::not_found("Application"))?;
        Ok(ApplicationStatus {
            email: request.email.clone(),
            status: request.status,
            message: String::new(),
            created_at: request.created_at,
            processed_at: None,
            admin_name: None,
        })
    }

    async fn signup(&self, request: &SignupRequest) -> Result<SignupResponse, ApiError> {
        self.record("signup")?;
        let mut backend = self.lock();
        let id = backend.next_id("req-");
        let mut pending = sample_request(&id, &request.full_name);
        pending.email = request.email.clone();
        backend.requests.insert(id.clone(), pending);
        Ok(SignupResponse {
            message: "Signup request submitted".to_string(),
            request_id: id,
        })
    }

    async fn list_users(&self) -> Result<Vec<User>, ApiError> {
        self.record("list_users")?;
        Ok(self.lock().users.values().cloned().collect())
    }

    async fn get_user(&self, user_id: &str) -> Result<User, ApiError> {
        self.record("get_user")?;
        self.user(user_id).ok_or_else(|| Self::not_found("User"))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<User, ApiError> {
        self.record("get_user_by_email")?;
        self.lock()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| Self::not_found("User"))
    }

    async fn update_user(&self, user_id: &str, update: &ProfileUpdate) -> Result<(), ApiError> {
        self.record("update_user")?;
        let mut backend = self.lock();
        let user = backend
            .users
            .get_mut(user_id)
            .ok_or_else(|| Self::not_found("User"))?;
        user.full_name = update.full_name.clone();
        user.phone = update.phone.clone();
        user.ecclesia = update.ecclesia.clone();
        user.language = update.language.clone();
        user.education = update.education.clone();
        user.bio = update.bio.clone();
        Ok(())
    }

    async fn change_user_status(&self, user_id: &str, status: UserStatus) -> Result<(), ApiError> {
        self.record("change_user_status")?;
        let mut backend = self.lock();
        let user = backend
            .users
            .get_mut(user_id)
            .ok_or_else(|| Self::not_found("User"))?;
        user.status = status;
        Ok(())
    }

    async fn delete_user(&self, user_id: &str, _admin_id: &str) -> Result<(), ApiError> {
        self.record("delete_user")?;
        self.lock()
            .users
            .remove(user_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("User"))
    }

    async fn upload_profile_photo(
        &self,
        user_id: &str,
        upload: &ImageUpload,
    ) -> Result<UploadResponse, ApiError> {
        self.record("upload_profile_photo")?;
        let mut backend = self.lock();
        let user = backend
            .users
            .get_mut(user_id)
            .ok_or_else(|| Self::not_found("User"))?;
        user.has_profile_photo = true;
        Ok(UploadResponse {
            message: "Photo uploaded".to_string(),
            size: upload.bytes.len() as u64,
        })
    }

    async fn delete_profile_photo(&self, user_id: &str) -> Result<(), ApiError> {
        self.record("delete_profile_photo")?;
        if let Some(user) = self.lock().users.get_mut(user_id) {
            user.has_profile_photo = false;
        }
        Ok(())
    }

    async fn upload_profile_image(
        &self,
        user_id: &str,
        slot: ImageSlot,
        upload: &ImageUpload,
    ) -> Result<UploadResponse, ApiError> {
        self.record("upload_profile_image")?;
        let image = ProfileImage {
            image_number: slot.number(),
            content_type: upload.content_type.clone(),
            size: upload.bytes.len() as u64,
            image_url: format!("/profile-image/{user_id}/image/{slot}"),
        };
        self.lock()
            .images
            .entry(user_id.to_string())
            .or_default()
            .insert(slot.number(), image);
        self.set_image_flag(user_id, slot.number(), true);
        Ok(UploadResponse {
            message: "Image uploaded".to_string(),
            size: upload.bytes.len() as u64,
        })
    }

    async fn delete_profile_image(&self, user_id: &str, slot: ImageSlot) -> Result<(), ApiError> {
        self.record("delete_profile_image")?;
        let removed = self
            .lock()
            .images
            .get_mut(user_id)
            .and_then(|images| images.remove(&slot.number()));
        if removed.is_none() {
            return Err(Self::not_found("Image"));
        }
        self.set_image_flag(user_id, slot.number(), false);
        Ok(())
    }

    async fn list_profile_images(&self, user_id: &str) -> Result<ProfileImagesResponse, ApiError> {
        self.record("list_profile_images")?;
        let images: Vec<ProfileImage> = self
            .lock()
            .images
            .get(user_id)
            .map(|images| images.values().cloned().collect())
            .unwrap_or_default();
        Ok(ProfileImagesResponse {
            user_id: user_id.to_string(),
            total_images: images.len() as u32,
            images,
        })
    }

    async fn available_image_slots(&self, user_id: &str) -> Result<Vec<u8>, ApiError> {
        self.record("available_image_slots")?;
        let backend = self.lock();
        let taken = backend.images.get(user_id);
        Ok((1..=3)
            .filter(|n| taken.map_or(true, |images| !images.contains_key(n)))
            .collect())
    }

    async fn create_admin(&self, request: &AdminSignupRequest) -> Result<Admin, ApiError> {
        self.record("create_admin")?;
        let mut backend = self.lock();
        let id = backend.next_id("adm-");
        let mut admin = sample_admin(&id, &request.full_name);
        admin.email = request.email.clone();
        admin.phone = request.phone.clone();
        backend.admins.insert(id, admin.clone());
        Ok(admin)
    }

    async fn list_admins(&self) -> Result<Vec<Admin>, ApiError> {
        self.record("list_admins")?;
        Ok(self.lock().admins.values().cloned().collect())
    }

    async fn get_admin(&self, admin_id: &str) -> Result<Admin, ApiError> {
        self.record("get_admin")?;
        self.lock()
            .admins
            .get(admin_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Admin"))
    }

    async fn get_admin_by_email(&self, email: &str) -> Result<Admin, ApiError> {
        self.record("get_admin_by_email")?;
        self.lock()
            .admins
            .values()
            .find(|a| a.email == email)
            .cloned()
            .ok_or_else(|| Self::not_found("Admin"))
    }

    async fn update_admin(&self, admin_id: &str, update: &AdminUpdate) -> Result<(), ApiError> {
        self.record("update_admin")?;
        let mut backend = self.lock();
        let admin = backend
            .admins
            .get_mut(admin_id)
            .ok_or_else(|| Self::not_found("Admin"))?;
        admin.full_name = update.full_name.clone();
        admin.email = update.email.clone();
        admin.phone = update.phone.clone();
        Ok(())
    }

    async fn remove_admin(&self, admin_id: &str) -> Result<(), ApiError> {
        self.record("remove_admin")?;
        self.lock()
            .admins
            .remove(admin_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("Admin"))
    }

    async fn auth_level(&self, user_id: &str) -> Result<AuthLevel, ApiError> {
        self.record("auth_level")?;
        let backend = self.lock();
        Ok(if backend.admins.contains_key(user_id) {
            AuthLevel::Admin
        } else if backend.users.contains_key(user_id) {
            AuthLevel::User
        } else {
            AuthLevel::Unknown
        })
    }

    async fn dashboard(&self) -> Result<DashboardSummary, ApiError> {
        self.record("dashboard")?;
        let backend = self.lock();
        let pending = backend
            .requests
            .values()
            .filter(|r| r.status == UserStatus::Pending)
            .count();
        Ok(DashboardSummary {
            stats: vec![
                format!("Total Users: {}", backend.users.len()),
                format!("Pending Requests: {pending}"),
            ],
        })
    }

    async fn pending_requests(&self) -> Result<Vec<UserRequest>, ApiError> {
        self.record("pending_requests")?;
        Ok(self
            .lock()
            .requests
            .values()
            .filter(|r| r.status == UserStatus::Pending)
            .cloned()
            .collect())
    }

    async fn pending_request(&self, request_id: &str) -> Result<UserRequest, ApiError> {
        self.record("pending_request")?;
        self.lock()
            .requests
            .get(request_id)
            .cloned()
            .ok_or_else(|| Self::not_found("Request"))
    }

    async fn approve_request(
        &self,
        request_id: &str,
        _admin_id: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.record("approve_request")?;
        self.decide(request_id, UserStatus::Active)
    }

    async fn reject_request(
        &self,
        request_id: &str,
        _admin_id: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.record("reject_request")?;
        self.decide(request_id, UserStatus::Inactive)
    }

    async fn delete_pending_request(&self, request_id: &str) -> Result<(), ApiError> {
        self.record("delete_pending_request")?;
        self.lock()
            .requests
            .remove(request_id)
            .map(|_| ())
            .ok_or_else(|| Self::not_found("Request"))
    }

    async fn delete_all_pending_requests(&self) -> Result<(), ApiError> {
        self.record("delete_all_pending_requests")?;
        self.lock()
            .requests
            .retain(|_, r| r.status != UserStatus::Pending);
        Ok(())
    }

    async fn send_connect_request(
        &self,
        sender_id: &str,
        receiver_id: &str,
        message: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.record("send_connect_request")?;
        let mut backend = self.lock();
        let id = backend.next_id("con-");
        backend.connects.push(ConnectRequest {
            id: id.clone(),
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            sender_name: String::new(),
            receiver_name: String::new(),
            message: message.to_string(),
            status: ConnectRequestStatus::Pending,
            created_at: Utc::now(),
        });
        Ok(TransitionResponse {
            id,
            status: "Pending".to_string(),
            message: "Connect request sent".to_string(),
        })
    }

    async fn accept_connect_request(
        &self,
        receiver_id: &str,
        sender_id: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.record("accept_connect_request")?;
        self.answer(receiver_id, sender_id, ConnectRequestStatus::Accepted)
    }

    async fn reject_connect_request(
        &self,
        receiver_id: &str,
        sender_id: &str,
    ) -> Result<TransitionResponse, ApiError> {
        self.record("reject_connect_request")?;
        self.answer(receiver_id, sender_id, ConnectRequestStatus::Rejected)
    }

    async fn received_requests(&self, receiver_id: &str) -> Result<Vec<ConnectRequest>, ApiError> {
        self.record("received_requests")?;
        Ok(self
            .lock()
            .connects
            .iter()
            .filter(|c| c.receiver_id == receiver_id && c.status == ConnectRequestStatus::Pending)
            .cloned()
            .collect())
    }

    async fn sent_requests(&self, sender_id: &str) -> Result<Vec<ConnectRequest>, ApiError> {
        self.record("sent_requests")?;
        Ok(self
            .lock()
            .connects
            .iter()
            .filter(|c| c.sender_id == sender_id)
            .cloned()
            .collect())
    }

    async fn connection_status(&self, sender_id: &str, receiver_id: &str) -> Result<bool, ApiError> {
        self.record("connection_status")?;
        Ok(self.lock().connects.iter().any(|c| {
            c.sender_id == sender_id
                && c.receiver_id == receiver_id
                && c.status == ConnectRequestStatus::Accepted
        }))
    }
}
