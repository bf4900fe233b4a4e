// Local form validation - everything here runs before a request leaves the client

use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

use crate::domain::{AdminSignupRequest, LoginRequest, ProfileUpdate, SignupRequest};

pub const MIN_PASSWORD_LEN: usize = 6;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Errors raised locally, before any network call is made.
///
/// The `Display` text is what the user sees, so it is kept word-for-word.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Password must be at least 6 characters long")]
    PasswordTooShort,
    #[error("Admin ID is missing. Please log in again.")]
    MissingAdminId,
    #[error("User ID is missing. Please log in again.")]
    MissingUserId,
    #[error("Please enter a message")]
    EmptyMessage,
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("Image slot must be 1, 2 or 3")]
    InvalidImageSlot { slot: u8 },
    #[error("Please choose an image file")]
    EmptyUpload,
    #[error("You cannot remove your own admin account")]
    SelfRemoval,
}

pub fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField { field });
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    require("Email", email)?;
    if !EMAIL_PATTERN.is_match(email.trim()) {
        return Err(ValidationError::InvalidEmail);
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort);
    }
    Ok(())
}

/// Returns the trimmed admin id, or fails fast when the session lost it.
pub fn require_admin_id(admin_id: &str) -> Result<&str, ValidationError> {
    let trimmed = admin_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingAdminId);
    }
    Ok(trimmed)
}

pub fn require_user_id(user_id: &str) -> Result<&str, ValidationError> {
    let trimmed = user_id.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::MissingUserId);
    }
    Ok(trimmed)
}

pub fn validate_message(message: &str) -> Result<(), ValidationError> {
    if message.trim().is_empty() {
        return Err(ValidationError::EmptyMessage);
    }
    Ok(())
}

pub fn validate_signup(request: &SignupRequest) -> Result<(), ValidationError> {
    require("Full Name", &request.full_name)?;
    validate_email(&request.email)?;
    require("Phone", &request.phone)?;
    require("Ecclesia", &request.ecclesia)?;
    require("Language", &request.language)?;
    require("Education", &request.education)?;
    require("Bio", &request.bio)?;
    validate_password(&request.password)
}

pub fn validate_admin_signup(request: &AdminSignupRequest) -> Result<(), ValidationError> {
    require("Full Name", &request.full_name)?;
    validate_email(&request.email)?;
    require("Phone", &request.phone)?;
    validate_password(&request.password)
}

pub fn validate_login(request: &LoginRequest) -> Result<(), ValidationError> {
    require("Email", &request.email)?;
    require("Password", &request.password)
}

pub fn validate_profile_update(update: &ProfileUpdate) -> Result<(), ValidationError> {
    require("Full Name", &update.full_name)?;
    require("Phone", &update.phone)?;
    require("Ecclesia", &update.ecclesia)?;
    require("Language", &update.language)?;
    require("Education", &update.education)?;
    require("Bio", &update.bio)
}
