use crate::{
    config::AuthSettings,
    database::UserStore,
    models::User,
    utils::AppError,
};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Header carrying the session token on protected routes
pub const AUTH_HEADER: &str = "auth-token";

pub const WRONG_PASSWORD_MESSAGE: &str = "Wrong password";
pub const WRONG_EMAIL_MESSAGE: &str = "Wrong Email Id";

// JWT Claims: {"user": {"id": "<hex>"}, ...}
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub user: TokenUser,
    #[serde(default)]
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<usize>,
    #[serde(default)]
    pub jti: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TokenUser {
    pub id: String,
}

// Request/Response structures
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct SignupRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub success: bool,
    pub token: String,
}

#[derive(Debug)]
pub enum LoginOutcome {
    Authenticated(String),
    WrongPassword,
    UnknownEmail,
}

// Generate JWT token
pub fn generate_token(user_id: &str, settings: &AuthSettings) -> Result<String, AppError> {
    let now = Utc::now();
    let exp = settings
        .jwt_expiry_hours
        .map(|hours| (now + Duration::hours(hours)).timestamp() as usize);

    let claims = Claims {
        user: TokenUser {
            id: user_id.to_string(),
        },
        iat: now.timestamp() as usize,
        exp,
        jti: Uuid::new_v4().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(settings.jwt_secret.as_ref()),
    )
    .map_err(|e| AppError::Internal(format!("Failed to generate token: {}", e)))
}

// Verify JWT token. `exp` is optional but enforced when present
pub fn verify_token(token: &str, settings: &AuthSettings) -> Result<Claims, AppError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.required_spec_claims.clear();

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(settings.jwt_secret.as_ref()),
        &validation,
    )
    .map(|data| data.claims)
    .map_err(|e| {
        log::debug!("Token rejected: {}", e);
        AppError::Unauthenticated
    })
}

pub async fn hash_password(password: &str, cost: u32) -> Result<String, AppError> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || hash(password, cost))
        .await
        .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// A plaintext password may itself start with `$2`, so the whole hash layout is checked
fn is_bcrypt_hash(stored: &str) -> bool {
    stored.parse::<bcrypt::HashParts>().is_ok()
}

/// Checks a login attempt. Records that still hold a plaintext password are compared
/// directly and rehashed on success
async fn password_matches(store: &dyn UserStore, user: &User, password: &str, cost: u32) -> Result<bool, AppError> {
    if is_bcrypt_hash(&user.password) {
        let candidate = password.to_string();
        let stored = user.password.clone();
        return tokio::task::spawn_blocking(move || verify(candidate, &stored))
            .await
            .map_err(|e| AppError::Internal(format!("Task join error: {}", e)))?
            .map_err(|e| AppError::Internal(format!("Password verification error: {}", e)));
    }

    if user.password != password {
        return Ok(false);
    }

    let hashed = hash_password(password, cost).await?;
    store.update_password(&user.id, &hashed).await?;
    log::info!("🔐 Migrated plaintext password to bcrypt for user {}", user.user_id());

    Ok(true)
}

// User registration
pub async fn signup(
    store: &dyn UserStore,
    settings: &AuthSettings,
    request: &SignupRequest,
) -> Result<String, AppError> {
    if store.find_by_email(&request.email).await?.is_some() {
        return Err(AppError::Validation(
            crate::database::users::DUPLICATE_EMAIL_MESSAGE.to_string(),
        ));
    }

    let password_hash = hash_password(&request.password, settings.bcrypt_cost).await?;
    let user = User::new(request.username.clone(), request.email.clone(), password_hash);

    // The unique email index catches a concurrent signup that passed the check above
    store.insert_user(&user).await?;

    log::info!("✅ User registered successfully: {}", request.email);

    generate_token(&user.user_id(), settings)
}

// User login
pub async fn login(
    store: &dyn UserStore,
    settings: &AuthSettings,
    request: &LoginRequest,
) -> Result<LoginOutcome, AppError> {
    let user = match store.find_by_email(&request.email).await? {
        Some(user) => user,
        None => return Ok(LoginOutcome::UnknownEmail),
    };

    if !password_matches(store, &user, &request.password, settings.bcrypt_cost).await? {
        return Ok(LoginOutcome::WrongPassword);
    }

    let token = generate_token(&user.user_id(), settings)?;
    Ok(LoginOutcome::Authenticated(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::database::MemoryStore;

    fn settings() -> AuthSettings {
        Config::for_tests().auth
    }

    fn signup_request(email: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: "tester".to_string(),
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_token_roundtrip_carries_user_id() {
        let token = generate_token("64b7f0c2a1b2c3d4e5f60718", &settings()).unwrap();
        let claims = verify_token(&token, &settings()).unwrap();
        assert_eq!(claims.user.id, "64b7f0c2a1b2c3d4e5f60718");
        assert!(claims.exp.is_none());
    }

    #[test]
    fn test_token_with_other_secret_rejected() {
        let token = generate_token("abc", &settings()).unwrap();
        let mut other = settings();
        other.jwt_secret = "another-secret".to_string();
        assert!(matches!(verify_token(&token, &other), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_garbage_token_rejected() {
        assert!(matches!(verify_token("not-a-jwt", &settings()), Err(AppError::Unauthenticated)));
    }

    #[test]
    fn test_expired_token_rejected() {
        let mut s = settings();
        s.jwt_expiry_hours = Some(-2);
        let token = generate_token("abc", &s).unwrap();
        assert!(verify_token(&token, &settings()).is_err());
    }

    #[test]
    fn test_token_without_exp_or_jti_accepted() {
        // Shape of tokens issued before expiry support
        let legacy = serde_json::json!({ "user": { "id": "abc" }, "iat": 1700000000 });
        let token = encode(
            &Header::default(),
            &legacy,
            &EncodingKey::from_secret(settings().jwt_secret.as_ref()),
        )
        .unwrap();

        let claims = verify_token(&token, &settings()).unwrap();
        assert_eq!(claims.user.id, "abc");
    }

    #[tokio::test]
    async fn test_signup_hashes_password() {
        let store = MemoryStore::new();
        signup(&store, &settings(), &signup_request("a@x.com", "p")).await.unwrap();

        let user = store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(user.password, "p");
        assert!(is_bcrypt_hash(&user.password));
        assert_eq!(user.cart.total_items(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_signup_fails_with_validation() {
        let store = MemoryStore::new();
        signup(&store, &settings(), &signup_request("a@x.com", "p")).await.unwrap();

        let err = signup(&store, &settings(), &signup_request("a@x.com", "q")).await.unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn test_login_outcomes() {
        let store = MemoryStore::new();
        signup(&store, &settings(), &signup_request("a@x.com", "p")).await.unwrap();

        let ok = LoginRequest { email: "a@x.com".into(), password: "p".into() };
        assert!(matches!(login(&store, &settings(), &ok).await.unwrap(), LoginOutcome::Authenticated(_)));

        let wrong = LoginRequest { email: "a@x.com".into(), password: "nope".into() };
        assert!(matches!(login(&store, &settings(), &wrong).await.unwrap(), LoginOutcome::WrongPassword));

        let unknown = LoginRequest { email: "b@x.com".into(), password: "p".into() };
        assert!(matches!(login(&store, &settings(), &unknown).await.unwrap(), LoginOutcome::UnknownEmail));
    }

    #[tokio::test]
    async fn test_plaintext_password_is_migrated_on_login() {
        let store = MemoryStore::new();
        let legacy = User::new("old".into(), "old@x.com".into(), "secret".into());
        store.insert_user(&legacy).await.unwrap();

        let request = LoginRequest { email: "old@x.com".into(), password: "secret".into() };
        assert!(matches!(login(&store, &settings(), &request).await.unwrap(), LoginOutcome::Authenticated(_)));

        let stored = store.find_by_email("old@x.com").await.unwrap().unwrap();
        assert!(is_bcrypt_hash(&stored.password));

        // Still works against the new hash
        assert!(matches!(login(&store, &settings(), &request).await.unwrap(), LoginOutcome::Authenticated(_)));
    }

    #[tokio::test]
    async fn test_plaintext_password_shaped_like_hash() {
        let store = MemoryStore::new();
        let legacy = User::new("old".into(), "dollar@x.com".into(), "$2secret".into());
        store.insert_user(&legacy).await.unwrap();
        assert!(!is_bcrypt_hash("$2secret"));

        let wrong = LoginRequest { email: "dollar@x.com".into(), password: "nope".into() };
        assert!(matches!(login(&store, &settings(), &wrong).await.unwrap(), LoginOutcome::WrongPassword));

        let right = LoginRequest { email: "dollar@x.com".into(), password: "$2secret".into() };
        assert!(matches!(login(&store, &settings(), &right).await.unwrap(), LoginOutcome::Authenticated(_)));

        let stored = store.find_by_email("dollar@x.com").await.unwrap().unwrap();
        assert!(is_bcrypt_hash(&stored.password));
    }

    #[tokio::test]
    async fn test_signup_accepts_any_non_duplicate_fields() {
        let store = MemoryStore::new();
        let request = SignupRequest {
            username: String::new(),
            email: "no-at-sign".to_string(),
            password: "p".to_string(),
        };
        assert!(signup(&store, &settings(), &request).await.is_ok());
    }
}
