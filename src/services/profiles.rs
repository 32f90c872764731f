use chrono::Utc;

use crate::{
    db::UserStore,
    error::{AppError, AppResult},
    models::{
        profile::{validate_email, validate_username},
        RegisterProfileRequest, UpdateProfileRequest, UserProfile,
    },
};

/// Creates the profile for a newly signed-in user
///
/// Returns the stored profile unchanged if `uid` is already registered, adding
/// the sign-in provider to it when it is new.
pub async fn register(
    store: &dyn UserStore,
    uid: &str,
    request: RegisterProfileRequest,
) -> AppResult<UserProfile> {
    if let Some(mut existing) = store.profile(uid).await? {
        if !existing.providers.contains(&request.provider) {
            existing.providers.push(request.provider);
            store.save_profile(&existing).await?;
        }
        tracing::debug!(uid = %uid, "Profile already registered");
        return Ok(existing);
    }

    let username = validate_username(&request.username)?;
    validate_email(&request.email)?;

    if !store.claim_username(uid, &username).await? {
        return Err(username_taken());
    }
    if !store.claim_email(uid, &request.email).await? {
        store.release_username(uid, &username).await?;
        return Err(AppError::Conflict(
            "email: An account with this email already exists".to_string(),
        ));
    }

    let email = request.email.clone();
    match create_profile(store, uid, username.clone(), request).await {
        Ok(profile) => {
            tracing::info!(uid = %uid, user_id = ?profile.user_id, "Registered profile");
            Ok(profile)
        }
        Err(e) => {
            release_claims(store, uid, &username, &email).await;
            Err(e)
        }
    }
}

/// Assigns the numeric id and writes the new profile last, so a failure
/// leaves no profile behind
async fn create_profile(
    store: &dyn UserStore,
    uid: &str,
    username: String,
    request: RegisterProfileRequest,
) -> AppResult<UserProfile> {
    let now = Utc::now();
    let user_id = store.next_user_id().await?;
    store.ensure_interaction_record(uid, now).await?;

    let profile = UserProfile {
        uid: uid.to_string(),
        user_id: Some(user_id),
        username,
        email: request.email,
        display_name: request.display_name,
        photo_url: request.photo_url,
        providers: vec![request.provider],
        created_at: now,
    };

    store.save_profile(&profile).await?;
    Ok(profile)
}

async fn release_claims(store: &dyn UserStore, uid: &str, username: &str, email: &str) {
    if let Err(e) = store.release_username(uid, username).await {
        tracing::error!(uid = %uid, error = %e, "Failed to release username claim");
    }
    if let Err(e) = store.release_email(uid, email).await {
        tracing::error!(uid = %uid, error = %e, "Failed to release email claim");
    }
}

pub async fn get(store: &dyn UserStore, uid: &str) -> AppResult<UserProfile> {
    store
        .profile(uid)
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))
}

/// Applies a profile edit; a new username is validated and claimed first
pub async fn update(
    store: &dyn UserStore,
    uid: &str,
    request: UpdateProfileRequest,
) -> AppResult<UserProfile> {
    let mut profile = get(store, uid).await?;

    if let Some(requested) = request.username {
        let username = validate_username(&requested)?;
        let previous = std::mem::replace(&mut profile.username, username);

        // Claims are case-insensitive, so a case-only change keeps the same claim
        if previous.to_lowercase() != profile.username.to_lowercase() {
            if !store.claim_username(uid, &profile.username).await? {
                return Err(username_taken());
            }
            store.release_username(uid, &previous).await?;
            tracing::info!(uid = %uid, from = %previous, to = %profile.username, "Username changed");
        }
    }

    if let Some(display_name) = request.display_name {
        profile.display_name = Some(display_name);
    }
    if let Some(photo_url) = request.photo_url {
        profile.photo_url = Some(photo_url);
    }

    store.save_profile(&profile).await?;
    Ok(profile)
}

fn username_taken() -> AppError {
    AppError::Conflict("username: Username already taken. Please choose another one".to_string())
}
