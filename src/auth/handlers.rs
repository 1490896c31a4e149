use axum::{
    extract::{FromRef, Path, State},
    routing::{get, post},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{instrument, warn};
use uuid::Uuid;

use crate::{
    auth::{
        claims::{Claims, Role},
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest, UpdateUserRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        services,
    },
    error::ApiError,
    state::AppState,
};

pub fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/admin/login", post(admin_login))
}

pub fn protected_routes() -> Router<AppState> {
    Router::new().route("/auth/user/:id", get(get_user).put(update_user))
}

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Self-or-admin rule for profile updates, evaluated against guard-attached
/// claims at the handler, not inside the service.
fn may_update(claims: &Claims, target: Uuid) -> bool {
    claims.sub == target || claims.role == Role::Admin
}

fn validate_registration(payload: &RegisterRequest) -> Result<(), ApiError> {
    if !is_valid_email(payload.email.trim()) {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }
    if payload.password.len() < 8 {
        return Err(ApiError::BadRequest("Password too short".into()));
    }
    if payload.first_name.trim().is_empty() || payload.last_name.trim().is_empty() {
        return Err(ApiError::BadRequest("First and last name are required".into()));
    }
    Ok(())
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    validate_registration(&payload)?;

    let keys = JwtKeys::from_ref(&state);
    let (access_token, user) = services::register(&state.db, &keys, payload).await?;

    Ok(Json(AuthResponse {
        access_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    login_with_role(state, payload, Role::User, "Login failed: invalid email or password").await
}

#[instrument(skip(state, payload))]
pub async fn admin_login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    login_with_role(
        state,
        payload,
        Role::Admin,
        "Admin login failed: invalid credentials or not an admin",
    )
    .await
}

/// Shared login path. The denial message never reveals which factor failed.
async fn login_with_role(
    state: AppState,
    payload: LoginRequest,
    role: Role,
    denied: &str,
) -> Result<Json<AuthResponse>, ApiError> {
    if !is_valid_email(payload.email.trim()) {
        return Err(ApiError::BadRequest("Invalid email".into()));
    }

    let user = services::validate_credentials(&state.db, &payload.email, &payload.password, Some(role))
        .await?
        .ok_or_else(|| {
            warn!(role = role.as_str(), "login rejected");
            ApiError::InvalidCredentials(denied.to_string())
        })?;

    let keys = JwtKeys::from_ref(&state);
    let access_token = services::login(&keys, &user)?;

    Ok(Json(AuthResponse {
        access_token,
        user: user.into(),
    }))
}

#[instrument(skip(state, _caller))]
pub async fn get_user(
    State(state): State<AppState>,
    AuthUser(_caller): AuthUser,
    Path(id): Path<Uuid>,
) -> Result<Json<PublicUser>, ApiError> {
    let user = services::get_user(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

#[instrument(skip(state, caller, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    AuthUser(caller): AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserRequest>,
) -> Result<Json<PublicUser>, ApiError> {
    if !may_update(&caller, id) {
        warn!(caller = %caller.sub, target = %id, "update refused");
        return Err(ApiError::Forbidden(
            "You do not have permission to update this user".into(),
        ));
    }

    if let Some(email) = payload.email.as_deref() {
        if !is_valid_email(email.trim()) {
            return Err(ApiError::BadRequest("Invalid email".into()));
        }
    }
    if let Some(password) = payload.password.as_deref() {
        if password.len() < 8 {
            return Err(ApiError::BadRequest("Password too short".into()));
        }
    }

    let user = services::update_user(&state.db, id, payload)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".into()))?;
    Ok(Json(user.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::OffsetDateTime;

    fn claims(sub: Uuid, role: Role) -> Claims {
        let now = OffsetDateTime::now_utc().unix_timestamp() as usize;
        Claims {
            sub,
            email: "caller@test.com".into(),
            first_name: "Cal".into(),
            last_name: "Ler".into(),
            role,
            iat: now,
            exp: now + 300,
            iss: "test-issuer".into(),
            aud: "test-aud".into(),
        }
    }

    #[test]
    fn subject_may_update_own_profile() {
        let id = Uuid::new_v4();
        assert!(may_update(&claims(id, Role::User), id));
    }

    #[test]
    fn admin_may_update_any_profile() {
        assert!(may_update(&claims(Uuid::new_v4(), Role::Admin), Uuid::new_v4()));
    }

    #[test]
    fn other_user_may_not_update() {
        assert!(!may_update(&claims(Uuid::new_v4(), Role::User), Uuid::new_v4()));
    }

    #[test]
    fn email_validation() {
        assert!(is_valid_email("jane@test.com"));
        assert!(is_valid_email("Jane@Test.com"));
        assert!(!is_valid_email("jane@test"));
        assert!(!is_valid_email("jane test@x.com"));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn registration_validation_rejects_short_password() {
        let payload = RegisterRequest {
            first_name: "Jane".into(),
            last_name: "Doe".into(),
            email: "jane@test.com".into(),
            password: "short".into(),
            role: None,
        };
        let err = validate_registration(&payload).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn registration_validation_rejects_blank_name() {
        let payload = RegisterRequest {
            first_name: "  ".into(),
            last_name: "Doe".into(),
            email: "jane@test.com".into(),
            password: "longenough".into(),
            role: None,
        };
        assert!(validate_registration(&payload).is_err());
    }
}
