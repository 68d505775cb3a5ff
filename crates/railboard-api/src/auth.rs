use std::ops::RangeInclusive;
use std::sync::Arc;

use argon2::{
    Argon2, PasswordHash, PasswordHasher, PasswordVerifier,
    password_hash::{SaltString, rand_core::OsRng},
};
use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use railboard_db::Database;
use railboard_types::api::{
    Claims, LoginRequest, LoginResponse, MeResponse, RegisterRequest, RegisterResponse,
};

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
}

const USERNAME_LEN: RangeInclusive<usize> = 3..=24;
const MIN_PASSWORD_LEN: usize = 10;
/// Issued tokens expire after two weeks; the login screen's redirect query
/// brings the rider back to where they were headed.
const TOKEN_TTL_DAYS: i64 = 14;

pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    check_credentials(&req.username, &req.password)?;

    if state.db.get_user_by_username(&req.username)?.is_some() {
        return Err(ApiError::Conflict("username is already taken"));
    }

    let user_id = Uuid::new_v4();
    let password_hash = hash_password(&req.password)?;
    state
        .db
        .create_user(&user_id.to_string(), &req.username, &password_hash)?;

    let token = issue_token(&state.jwt_secret, user_id, &req.username)?;
    Ok((StatusCode::CREATED, Json(RegisterResponse { user_id, token })))
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // An unknown username and a wrong password answer identically.
    let user = state
        .db
        .get_user_by_username(&req.username)?
        .ok_or(ApiError::Unauthorized)?;

    let stored = PasswordHash::new(&user.password)
        .map_err(|e| anyhow::anyhow!("stored password hash unreadable: {e}"))?;
    Argon2::default()
        .verify_password(req.password.as_bytes(), &stored)
        .map_err(|_| ApiError::Unauthorized)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| anyhow::anyhow!("stored user id {:?} invalid: {e}", user.id))?;
    let token = issue_token(&state.jwt_secret, user_id, &user.username)?;

    Ok(Json(LoginResponse {
        user_id,
        username: user.username,
        token,
    }))
}

/// Resolve the current user from the bearer token the middleware verified.
/// This is the endpoint a client-side identity provider polls after session
/// restoration.
pub async fn me(Extension(claims): Extension<Claims>) -> Json<MeResponse> {
    Json(MeResponse {
        user_id: claims.sub,
        username: claims.username,
    })
}

fn check_credentials(username: &str, password: &str) -> Result<(), ApiError> {
    if !USERNAME_LEN.contains(&username.chars().count()) {
        return Err(ApiError::BadRequest("username must be 3-24 characters"));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ApiError::BadRequest(
            "password must be at least 10 characters",
        ));
    }
    Ok(())
}

fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| anyhow::anyhow!("hash password: {e}"))
}

fn issue_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let expires = chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS);
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: expires.timestamp() as usize,
    };

    Ok(encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{DecodingKey, Validation, decode};

    #[test]
    fn credential_policy_bounds_username_and_password() {
        assert!(matches!(
            check_credentials("jo", "a-long-enough-pass"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            check_credentials(&"x".repeat(25), "a-long-enough-pass"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(matches!(
            check_credentials("rider", "short"),
            Err(ApiError::BadRequest(_))
        ));
        assert!(check_credentials("rider", "platform-doors").is_ok());
    }

    #[test]
    fn issued_tokens_decode_with_the_same_secret() {
        let user_id = Uuid::new_v4();
        let token = issue_token("test-secret", user_id, "rider").unwrap();

        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();

        assert_eq!(data.claims.sub, user_id);
        assert_eq!(data.claims.username, "rider");
    }

    #[test]
    fn issued_tokens_carry_the_two_week_expiry() {
        let token = issue_token("test-secret", Uuid::new_v4(), "rider").unwrap();
        let data = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();

        let expected =
            (chrono::Utc::now() + chrono::Duration::days(TOKEN_TTL_DAYS)).timestamp() as usize;
        assert!(data.claims.exp.abs_diff(expected) < 60);
    }

    #[test]
    fn issued_tokens_fail_with_another_secret() {
        let token = issue_token("test-secret", Uuid::new_v4(), "rider").unwrap();
        assert!(
            decode::<Claims>(
                &token,
                &DecodingKey::from_secret(b"other-secret"),
                &Validation::default(),
            )
            .is_err()
        );
    }
}
