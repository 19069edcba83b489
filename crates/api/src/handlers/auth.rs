//! Handlers for `/accounts` (signup, login, logout).

use axum::extract::{Query, State};
use axum::http::header::SET_COOKIE;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use best_dressed_core::error::CoreError;
use best_dressed_db::models::user::{CreateUser, User};
use best_dressed_db::repositories::UserRepo;
use serde::{Deserialize, Serialize};

use crate::auth::jwt::{clear_session_cookie, generate_session_token, session_cookie};
use crate::auth::password::{
    hash_password, validate_password_strength, verify_password, MIN_PASSWORD_LENGTH,
};
use crate::error::{AppError, AppResult};
use crate::query::NextParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Where a successful login lands when no `next` was given.
const DEFAULT_NEXT: &str = "/dashboard/";

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginPage {
    pub next: String,
    pub fields: [&'static str; 2],
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// POST /accounts/signup/
///
/// Create an account. A taken username is reported as 409.
pub async fn signup(
    State(state): State<AppState>,
    Json(input): Json<SignupRequest>,
) -> AppResult<impl IntoResponse> {
    let username = input.username.trim();
    if username.is_empty() {
        return Err(CoreError::Validation("Username is required".into()).into());
    }
    if !input.email.contains('@') {
        return Err(CoreError::Validation("Enter a valid email address".into()).into());
    }
    validate_password_strength(&input.password, MIN_PASSWORD_LENGTH)
        .map_err(CoreError::Validation)?;
    if input.password != input.password_confirm {
        return Err(CoreError::Validation("Passwords do not match".into()).into());
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            username: username.to_string(),
            email: input.email.trim().to_string(),
            password_hash,
            is_staff: false,
        },
    )
    .await?;

    tracing::info!(user_id = user.id, "User signed up");
    Ok((StatusCode::CREATED, Json(DataResponse { data: user })))
}

/// GET /accounts/login/
///
/// Describes the login form and echoes the post-login destination.
pub async fn login_page(Query(params): Query<NextParams>) -> Json<DataResponse<LoginPage>> {
    let next = params
        .next
        .filter(|n| n.starts_with('/'))
        .unwrap_or_else(|| DEFAULT_NEXT.to_string());
    Json(DataResponse {
        data: LoginPage {
            next,
            fields: ["username", "password"],
        },
    })
}

/// POST /accounts/login/
///
/// Verify credentials, set the session cookie, and return the token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> AppResult<impl IntoResponse> {
    let invalid = || AppError::Core(CoreError::Unauthorized("Invalid username or password".into()));

    let user = UserRepo::find_by_username(&state.pool, input.username.trim())
        .await?
        .ok_or_else(invalid)?;

    let password_valid = verify_password(&input.password, &user.password_hash)
        .map_err(|e| AppError::InternalError(format!("Password verification error: {e}")))?;
    if !password_valid {
        tracing::info!(user_id = user.id, "Failed login attempt");
        return Err(invalid());
    }

    let token = generate_session_token(user.id, user.is_staff, &state.config.jwt)
        .map_err(|e| AppError::InternalError(format!("Token generation error: {e}")))?;
    let cookie = session_cookie(&token, &state.config.jwt);

    tracing::info!(user_id = user.id, "User logged in");
    Ok((
        [(SET_COOKIE, cookie)],
        Json(DataResponse {
            data: LoginResponse { token, user },
        }),
    ))
}

/// POST /accounts/logout/
///
/// Clear the session cookie. Returns 204 No Content.
pub async fn logout() -> impl IntoResponse {
    (StatusCode::NO_CONTENT, [(SET_COOKIE, clear_session_cookie())])
}
