use serde_json::json;
use tracing::{error, info, warn};

use crate::{
    auth::{
        dto::{normalize_email, LoginRequest, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password_blocking, verify_password_blocking},
    },
    error::ApiError,
    models::User,
    store::{self, DocumentStore, StoreError},
};

pub async fn find_user_by_email(
    db: &dyn DocumentStore,
    email: &str,
) -> Result<Option<User>, StoreError> {
    store::find_one::<User>(db, json!({ "email": email })).await
}

/// Create the account and return a token for it.
pub async fn register(
    db: &dyn DocumentStore,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> Result<String, ApiError> {
    let email = normalize_email(&req.email);

    if find_user_by_email(db, &email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(ApiError::Conflict);
    }

    let password_hash = hash_password_blocking(req.password).await?;
    let user = User {
        name: req.name,
        email,
        password_hash,
        avatar_url: req.avatar_url,
        is_active: req.is_active,
    };

    // The unique index catches a concurrent registration that passed the lookup.
    if let Err(e) = store::insert(db, &user).await {
        if matches!(e, StoreError::Duplicate { .. }) {
            warn!(email = %user.email, "email registered concurrently");
        } else {
            error!(error = %e, "create user failed");
        }
        return Err(e.into());
    }

    let token = keys.sign(&user.email)?;
    info!(email = %user.email, "user registered");
    Ok(token)
}

/// Check credentials and return a fresh token.
pub async fn login(
    db: &dyn DocumentStore,
    keys: &JwtKeys,
    req: LoginRequest,
) -> Result<String, ApiError> {
    let email = normalize_email(&req.email);

    let Some(user) = find_user_by_email(db, &email).await? else {
        warn!(email = %email, "login unknown email");
        return Err(ApiError::InvalidCredentials);
    };

    if !verify_password_blocking(req.password, user.password_hash).await? {
        warn!(email = %email, "login invalid password");
        return Err(ApiError::InvalidCredentials);
    }

    let token = keys.sign(&user.email)?;
    info!(email = %user.email, "user logged in");
    Ok(token)
}

/// Resolve a bearer token to the stored user it names.
pub async fn authenticate(
    db: &dyn DocumentStore,
    keys: &JwtKeys,
    token: &str,
) -> Result<User, ApiError> {
    let claims = keys.verify(token)?;
    match find_user_by_email(db, &claims.sub).await? {
        Some(user) => Ok(user),
        None => {
            warn!(sub = %claims.sub, "token subject no longer exists");
            Err(ApiError::bad_credentials())
        }
    }
}
