use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::images::ImageSlots;
use super::status::{ConnectRequestStatus, UserStatus};

/// Timestamps arrive either as RFC 3339 or as naive `YYYY-MM-DDTHH:MM:SS[.f]`
/// (treated as UTC).
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
            return Some(parsed.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
    }

    pub mod option {
        use chrono::{DateTime, Utc};
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            value: &Option<DateTime<Utc>>,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            match value {
                Some(value) => serializer.serialize_some(&value.to_rfc3339()),
                None => serializer.serialize_none(),
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<Option<DateTime<Utc>>, D::Error> {
            match Option::<String>::deserialize(deserializer)? {
                None => Ok(None),
                Some(raw) if raw.trim().is_empty() => Ok(None),
                Some(raw) => super::parse(&raw)
                    .map(Some)
                    .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub ecclesia: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub has_profile_photo: bool,
    #[serde(default)]
    pub has_profile_image1: bool,
    #[serde(default)]
    pub has_profile_image2: bool,
    #[serde(default)]
    pub has_profile_image3: bool,
    pub status: UserStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "timestamp")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn image_slots(&self) -> ImageSlots {
        ImageSlots::from_flags(
            self.has_profile_image1,
            self.has_profile_image2,
            self.has_profile_image3,
        )
    }

    pub fn initial(&self) -> char {
        self.full_name.chars().next().unwrap_or('?')
    }
}

/// A signup request waiting for (or past) admin review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRequest {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub ecclesia: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub education: String,
    #[serde(default)]
    pub bio: String,
    pub status: UserStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Admin {
    pub id: String,
    pub full_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequest {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    #[serde(default)]
    pub sender_name: String,
    #[serde(default)]
    pub receiver_name: String,
    #[serde(default)]
    pub message: String,
    pub status: ConnectRequestStatus,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    User,
    Admin,
}

impl std::fmt::Display for AccountType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AccountType::User => f.write_str("User"),
            AccountType::Admin => f.write_str("Admin"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Failed logins come back with `success: false` and little else filled in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub user_type: Option<AccountType>,
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub status: Option<UserStatus>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub ecclesia: String,
    pub language: String,
    pub education: String,
    pub bio: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupResponse {
    pub message: String,
    #[serde(default)]
    pub request_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminSignupRequest {
    pub full_name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatus {
    pub email: String,
    pub status: UserStatus,
    #[serde(default)]
    pub message: String,
    #[serde(with = "timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(default, with = "timestamp::option")]
    pub processed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub admin_name: Option<String>,
}

/// Fields a member may change on their own profile.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: String,
    pub ecclesia: String,
    pub language: String,
    pub education: String,
    pub bio: String,
}

impl From<&User> for ProfileUpdate {
    fn from(user: &User) -> Self {
        Self {
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            ecclesia: user.ecclesia.clone(),
            language: user.language.clone(),
            education: user.education.clone(),
            bio: user.bio.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminUpdate {
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

impl From<&Admin> for AdminUpdate {
    fn from(admin: &Admin) -> Self {
        Self {
            full_name: admin.full_name.clone(),
            email: admin.email.clone(),
            phone: admin.phone.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChange {
    pub status: UserStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRequestBody {
    pub receiver_id: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImage {
    pub image_number: u8,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub size: u64,
    #[serde(default)]
    pub image_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileImagesResponse {
    pub user_id: String,
    pub total_images: u32,
    #[serde(default)]
    pub images: Vec<ProfileImage>,
}

impl ProfileImagesResponse {
    pub fn image(&self, slot: u8) -> Option<&ProfileImage> {
        self.images.iter().find(|image| image.image_number == slot)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AvailableSlotsResponse {
    pub available_slots: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthLevel {
    Admin,
    User,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthLevelResponse {
    pub user_id: String,
    pub auth_level: AuthLevel,
}

/// `{id, status, message}` answer of the approve/reject/send/accept endpoints.
/// `status` is a free-form name here. A 2xx answer with no body decodes
/// to the default (all fields empty).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub size: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStatus {
    pub has_active_connection: bool,
}

/// Pre-aggregated admin dashboard lines.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DashboardSummary {
    pub stats: Vec<String>,
}

impl<'de> Deserialize<'de> for DashboardSummary {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Shape {
            Lines(Vec<String>),
            Wrapped {
                #[serde(default)]
                stats: Vec<String>,
            },
        }

        Ok(match Shape::deserialize(deserializer)? {
            Shape::Lines(stats) => DashboardSummary { stats },
            Shape::Wrapped { stats } => DashboardSummary { stats },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_user_decodes_backend_shape() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "fullName": "Blessy Thomas",
            "email": "blessy@example.com",
            "phone": "123",
            "ecclesia": "Mysore",
            "language": "Malayalam",
            "education": "MSc",
            "bio": "Teacher",
            "hasProfilePhoto": true,
            "hasProfileImage2": true,
            "status": 1,
            "createdAt": "2024-05-01T10:00:00",
            "updatedAt": "2024-05-02T10:00:00.123Z"
        }))
        .unwrap();

        assert_eq!(user.status, UserStatus::Active);
        assert!(!user.has_profile_image1);
        assert!(user.image_slots().is_occupied(crate::domain::ImageSlot::SECOND));
        assert_eq!(user.initial(), 'B');
    }

    #[test]
    fn test_dashboard_accepts_both_shapes() {
        let bare: DashboardSummary =
            serde_json::from_value(json!(["Pending: 3", "Users: 10"])).unwrap();
        let wrapped: DashboardSummary =
            serde_json::from_value(json!({"stats": ["Pending: 3", "Users: 10"]})).unwrap();
        assert_eq!(bare, wrapped);
        assert_eq!(bare.stats.len(), 2);
    }

    #[test]
    fn test_failed_login_response_decodes() {
        let response: LoginResponse = serde_json::from_value(json!({
            "success": false,
            "message": "Your application is still pending"
        }))
        .unwrap();
        assert!(!response.success);
        assert!(response.user_id.is_none());
    }

    #[test]
    fn test_application_status_with_null_processed_at() {
        let status: ApplicationStatus = serde_json::from_value(json!({
            "email": "a@b.co",
            "status": 0,
            "message": "Pending review",
            "createdAt": "2024-01-01T00:00:00Z",
            "processedAt": null,
            "adminName": null
        }))
        .unwrap();
        assert_eq!(status.status, UserStatus::Pending);
        assert!(status.processed_at.is_none());
    }

    #[test]
    fn test_unknown_auth_level() {
        let response: AuthLevelResponse =
            serde_json::from_value(json!({"userId": "x", "authLevel": "Guest"})).unwrap();
        assert_eq!(response.auth_level, AuthLevel::Unknown);
    }
}
