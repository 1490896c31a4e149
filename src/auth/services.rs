use sqlx::PgPool;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::{
        claims::Role,
        dto::{RegisterRequest, UpdateUserRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
        repo::{NewUser, User, UserChanges},
    },
    error::ApiError,
};

/// Lowercased, trimmed form used for storage and lookup. Idempotent.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Create a user and immediately issue a token (self-login-on-register).
///
/// The existence check is only a fast path; the unique index on
/// `(email, role)` is what actually prevents duplicates under concurrent
/// registration, surfacing here through the `From<sqlx::Error>` mapping.
pub async fn register(
    db: &PgPool,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<(String, User), ApiError> {
    let email = normalize_email(&req.email);
    let role = req.role.unwrap_or_default();

    if User::find_by_email_and_role(db, &email, role).await?.is_some() {
        warn!(%email, role = role.as_str(), "registration for existing identity");
        return Err(ApiError::DuplicateIdentity("Email already exists".into()));
    }

    let password_hash = hash_password(&req.password).map_err(ApiError::Internal)?;

    let user = User::create(
        db,
        NewUser {
            email,
            password_hash,
            first_name: req.first_name,
            last_name: req.last_name,
            role,
        },
    )
    .await?;

    let token = login(keys, &user)?;
    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((token, user))
}

/// Look up a user by email (optionally scoped to a role) and check the
/// password. Unknown email, wrong password and wrong role all yield
/// `Ok(None)`: the caller cannot tell which factor failed.
pub async fn validate_credentials(
    db: &PgPool,
    email: &str,
    password: &str,
    role: Option<Role>,
) -> Result<Option<User>, ApiError> {
    let email = normalize_email(email);
    let user = match role {
        Some(role) => User::find_by_email_and_role(db, &email, role).await?,
        None => User::find_by_email(db, &email).await?,
    };
    let Some(user) = user else {
        return Ok(None);
    };

    let ok = verify_password(password, &user.password_hash).map_err(ApiError::Internal)?;
    if !ok {
        warn!(user_id = %user.id, "password verification failed");
        return Ok(None);
    }
    Ok(Some(user))
}

/// Issue a bearer token for an already-validated user. Stateless: the token
/// is not persisted on the record.
pub fn login(keys: &JwtKeys, user: &User) -> Result<String, ApiError> {
    keys.sign(user).map_err(ApiError::Internal)
}

pub async fn get_user(db: &PgPool, id: Uuid) -> Result<Option<User>, ApiError> {
    Ok(User::find_by_id(db, id).await?)
}

/// Partial profile update: email re-normalized, password re-hashed when
/// present. `None` when the id does not resolve.
pub async fn update_user(
    db: &PgPool,
    id: Uuid,
    req: UpdateUserRequest,
) -> Result<Option<User>, ApiError> {
    let password_hash = match req.password.as_deref() {
        Some(plain) => Some(hash_password(plain).map_err(ApiError::Internal)?),
        None => None,
    };
    let changes = UserChanges {
        email: req.email.as_deref().map(normalize_email),
        password_hash,
        first_name: req.first_name,
        last_name: req.last_name,
    };
    let updated = User::update(db, id, changes).await?;
    if let Some(user) = &updated {
        info!(user_id = %user.id, "user profile updated");
    }
    Ok(updated)
}
