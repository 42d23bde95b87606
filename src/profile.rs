use crate::errors::AppError;
use crate::models::{CreateProfileRequest, UpdateProfileRequest, UserPreferences, UserProfile};
use chrono::NaiveDateTime;
use uuid::Uuid;

pub const NICKNAME_MAX_CHARS: usize = 50;
pub const SIGNATURE_MAX_CHARS: usize = 200;

/// Nicknames allow CJK ideographs, ASCII alphanumerics, underscore, hyphen
/// and whitespace, 1 to 50 characters.
fn validate_nickname(nickname: &str) -> Result<(), AppError> {
    let chars = nickname.chars().count();
    if chars == 0 || chars > NICKNAME_MAX_CHARS {
        return Err(AppError::bad_request(format!(
            "nickname must be 1 to {NICKNAME_MAX_CHARS} characters"
        )));
    }
    let allowed = nickname.chars().all(|c| {
        c.is_ascii_alphanumeric()
            || c == '_'
            || c == '-'
            || c.is_whitespace()
            || ('\u{4e00}'..='\u{9fa5}').contains(&c)
    });
    if !allowed {
        return Err(AppError::bad_request("nickname contains unsupported characters"));
    }
    Ok(())
}

fn validate_signature(signature: &str) -> Result<(), AppError> {
    if signature.chars().count() > SIGNATURE_MAX_CHARS {
        return Err(AppError::bad_request(format!(
            "signature must be at most {SIGNATURE_MAX_CHARS} characters"
        )));
    }
    Ok(())
}

/// Creates the single profile this store holds. Rejects when one already
/// exists or the input fails validation; nothing is mutated on rejection.
pub fn create_profile(
    existing: Option<&UserProfile>,
    request: CreateProfileRequest,
    now: NaiveDateTime,
) -> Result<UserProfile, AppError> {
    if existing.is_some() {
        return Err(AppError::conflict("a profile already exists"));
    }
    validate_nickname(&request.nickname)?;
    if let Some(signature) = &request.signature {
        validate_signature(signature)?;
    }

    Ok(UserProfile {
        id: format!("user_{}", Uuid::new_v4()),
        nickname: request.nickname,
        avatar: request.avatar,
        signature: request.signature,
        created_at: now,
        updated_at: now,
        preferences: UserPreferences::default(),
    })
}

/// Shallow merge of the supplied fields; `updated_at` always advances, even
/// when no field changed. Validation failures reject before any mutation.
pub fn update_profile(
    profile: &mut UserProfile,
    request: UpdateProfileRequest,
    now: NaiveDateTime,
) -> Result<(), AppError> {
    if let Some(nickname) = &request.nickname {
        validate_nickname(nickname)?;
    }
    if let Some(signature) = &request.signature {
        validate_signature(signature)?;
    }

    if let Some(nickname) = request.nickname {
        profile.nickname = nickname;
    }
    if let Some(avatar) = request.avatar {
        profile.avatar = Some(avatar);
    }
    if let Some(signature) = request.signature {
        profile.signature = Some(signature);
    }
    profile.updated_at = now;
    Ok(())
}
