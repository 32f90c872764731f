use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

pub const USERNAME_MIN_LEN: usize = 6;
pub const USERNAME_MAX_LEN: usize = 20;

/// Profile of a signed-in user
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Opaque id issued by the auth provider
    pub uid: String,
    /// Sequential platform id used by the recommendation model
    pub user_id: Option<u64>,
    pub username: String,
    pub email: String,
    pub display_name: Option<String>,
    pub photo_url: Option<String>,
    #[serde(default)]
    pub providers: Vec<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterProfileRequest {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    /// Sign-in provider, e.g. "password" or "google.com"
    #[serde(default = "default_provider")]
    pub provider: String,
}

fn default_provider() -> String {
    "password".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
}

/// Validates and normalizes a username, returning the trimmed form
pub fn validate_username(username: &str) -> AppResult<String> {
    let trimmed = username.trim();
    if trimmed.is_empty() {
        return Err(AppError::InvalidInput("username: Username is required".to_string()));
    }

    let len = trimmed.chars().count();
    if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&len) {
        return Err(AppError::InvalidInput(format!(
            "username: Username must be between {} and {} characters",
            USERNAME_MIN_LEN, USERNAME_MAX_LEN
        )));
    }

    Ok(trimmed.to_string())
}

/// Validates an email address of the form `local@domain.tld`
pub fn validate_email(email: &str) -> AppResult<()> {
    if email.trim().is_empty() {
        return Err(AppError::InvalidInput("email: Email is required".to_string()));
    }
    if email != email.trim() {
        return Err(AppError::InvalidInput(
            "email: Email cannot start or end with spaces".to_string(),
        ));
    }

    let invalid = || AppError::InvalidInput("email: Please enter a valid email address".to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    // The domain needs a dot with something on both sides of it
    match domain.rsplit_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() => Ok(()),
        _ => Err(invalid()),
    }
}
