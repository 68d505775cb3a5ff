use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::FieldError;

// -- JWT Claims --

/// JWT claims shared between token issuance and the auth middleware.
/// Canonical definition lives here in railboard-types.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user_id: Uuid,
    pub token: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

/// The server-side answer to "who is the current user".
#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user_id: Uuid,
    pub username: String,
}

// -- Widgets --

#[derive(Debug, Deserialize)]
pub struct ListWidgetsQuery {
    /// Active display pipelines only see enabled widgets; admin surfaces
    /// pass `include_disabled=true` to see everything stored.
    #[serde(default)]
    pub include_disabled: bool,
}

/// Body of an HTTP 422 validation failure: every failing field, not just
/// the first.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResponse {
    pub errors: Vec<FieldError>,
}
