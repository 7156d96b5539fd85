//! Account registration, credential checks, and JWT issuance.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::entities::{AuthenticatedUser, NewUser, User};
use crate::domain::repositories::UserRepository;
use crate::error::AppError;

const ISSUER: &str = "subtrack";

/// Token signing parameters, taken from configuration at startup.
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_seconds: u64,
    pub refresh_ttl_seconds: u64,
}

/// What a successful login or refresh hands back to the client.
#[derive(Debug, Clone, Serialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: &'static str,
    pub expires_in: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenKind {
    Access,
    Refresh,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    email: String,
    iss: String,
    iat: i64,
    nbf: i64,
    exp: i64,
    kind: TokenKind,
}

/// Issues and validates tokens and owns the password hashing scheme.
///
/// Passwords are stored as PHC-formatted Argon2id hashes. Tokens are
/// HS256 JWTs; access and refresh tokens differ only in lifetime and a
/// `kind` claim, and each is rejected where the other is expected.
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl_seconds: u64,
    refresh_ttl_seconds: u64,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserRepository>, config: JwtConfig) -> Self {
        Self {
            users,
            encoding_key: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.secret.as_bytes()),
            access_ttl_seconds: config.access_ttl_seconds,
            refresh_ttl_seconds: config.refresh_ttl_seconds,
        }
    }

    /// Creates an account with a hashed password and logs it in, returning
    /// the stored user and a fresh token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Conflict`] when the email is already registered.
    pub async fn register(
        &self,
        name: String,
        email: String,
        password: String,
    ) -> Result<(User, TokenPair), AppError> {
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict(
                "Email already registered",
                json!({ "email": email }),
            ));
        }

        let password_hash = hash_password(&password)?;
        let user = self
            .users
            .create(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        debug!(user_id = user.id, "Registered new user");
        let pair = self.issue_pair(&user)?;
        Ok((user, pair))
    }

    /// Verifies credentials and issues a fresh token pair.
    ///
    /// Unknown email and wrong password produce the same error, so the
    /// response does not reveal which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AppError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            return Err(invalid_credentials());
        };

        if !verify_password(password, &user.password_hash) {
            warn!(user_id = user.id, "Login attempt with wrong password");
            return Err(invalid_credentials());
        }

        self.issue_pair(&user)
    }

    /// Exchanges a valid refresh token for a new token pair.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Unauthorized`] for expired or malformed tokens,
    /// for access tokens presented as refresh tokens, and for accounts
    /// that no longer exist.
    pub async fn refresh(&self, refresh_token: &str) -> Result<TokenPair, AppError> {
        let claims = self.decode_claims(refresh_token, TokenKind::Refresh)?;
        let user = self.load_subject(&claims).await?;
        self.issue_pair(&user)
    }

    /// Resolves a bearer access token into the requesting user.
    ///
    /// The account is re-read from the store so that tokens of deleted
    /// users stop working immediately.
    pub async fn authenticate(&self, access_token: &str) -> Result<AuthenticatedUser, AppError> {
        let claims = self.decode_claims(access_token, TokenKind::Access)?;
        let user = self.load_subject(&claims).await?;
        Ok(AuthenticatedUser::from(user))
    }

    fn issue_pair(&self, user: &User) -> Result<TokenPair, AppError> {
        let access_token = self.sign(user, TokenKind::Access, self.access_ttl_seconds)?;
        let refresh_token = self.sign(user, TokenKind::Refresh, self.refresh_ttl_seconds)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
            token_type: "Bearer",
            expires_in: self.access_ttl_seconds,
        })
    }

    fn sign(&self, user: &User, kind: TokenKind, ttl_seconds: u64) -> Result<String, AppError> {
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: user.id.to_string(),
            email: user.email.clone(),
            iss: ISSUER.to_string(),
            iat: now,
            nbf: now,
            exp: now + ttl_seconds as i64,
            kind,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal("Failed to sign token", json!({ "error": e.to_string() })))
    }

    fn decode_claims(&self, token: &str, expected: TokenKind) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[ISSUER]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                debug!(error = %e, "Rejected token");
                AppError::unauthorized("Invalid or expired token", json!({}))
            })?
            .claims;

        if claims.kind != expected {
            return Err(AppError::unauthorized("Invalid or expired token", json!({})));
        }

        Ok(claims)
    }

    async fn load_subject(&self, claims: &Claims) -> Result<User, AppError> {
        let id: i64 = claims
            .sub
            .parse()
            .map_err(|_| AppError::unauthorized("Invalid or expired token", json!({})))?;

        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid or expired token", json!({})))
    }
}

fn invalid_credentials() -> AppError {
    AppError::unauthorized("Invalid email or password", json!({}))
}

fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::internal("Failed to hash password", json!({ "error": e.to_string() })))
}

fn verify_password(password: &str, stored_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored_hash) else {
        warn!("Stored password hash is not in PHC format");
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::MockUserRepository;
    use chrono::Utc;

    fn jwt_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-key".to_string(),
            access_ttl_seconds: 300,
            refresh_ttl_seconds: 7_776_000,
        }
    }

    fn user_with_password(id: i64, email: &str, password: &str) -> User {
        User {
            id,
            name: "Test User".to_string(),
            email: email.to_string(),
            password_hash: hash_password(password).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn service_with(repo: MockUserRepository) -> AuthService {
        AuthService::new(Arc::new(repo), jwt_config())
    }

    #[test]
    fn test_password_hash_round_trip() {
        let hash = hash_password("s3cret").unwrap();

        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("s3cret", &hash));
        assert!(!verify_password("wrong", &hash));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same").unwrap();
        let b = hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_register_rejects_duplicate_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user_with_password(1, email, "pw"))));

        let service = service_with(repo);
        let err = service
            .register("A".into(), "a@example.com".into(), "pw".into())
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::Conflict { .. }));
    }

    #[tokio::test]
    async fn test_register_stores_hash_not_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|new| {
            assert!(new.password_hash.starts_with("$argon2id$"));
            assert_ne!(new.password_hash, "pw");
            Ok(User {
                id: 1,
                name: new.name,
                email: new.email,
                password_hash: new.password_hash,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            })
        });

        let service = service_with(repo);
        let (user, pair) = service
            .register("A".into(), "a@example.com".into(), "pw".into())
            .await
            .unwrap();

        assert_eq!(user.id, 1);
        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_login_issues_usable_access_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user_with_password(7, email, "pw"))));
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user_with_password(id, "a@example.com", "pw"))));

        let service = service_with(repo);
        let pair = service.login("a@example.com", "pw").await.unwrap();

        assert_eq!(pair.token_type, "Bearer");
        assert_eq!(pair.expires_in, 300);

        let who = service.authenticate(&pair.access_token).await.unwrap();
        assert_eq!(who.id, 7);
        assert_eq!(who.email, "a@example.com");
    }

    #[tokio::test]
    async fn test_login_rejects_wrong_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user_with_password(7, email, "right"))));

        let service = service_with(repo);
        let err = service.login("a@example.com", "wrong").await.unwrap_err();

        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_login_rejects_unknown_email_with_same_error() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let service = service_with(repo);
        let err = service.login("ghost@example.com", "pw").await.unwrap_err();

        assert_eq!(err.to_string(), invalid_credentials().to_string());
    }

    #[tokio::test]
    async fn test_refresh_rejects_access_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user_with_password(7, email, "pw"))));

        let service = service_with(repo);
        let pair = service.login("a@example.com", "pw").await.unwrap();

        let err = service.refresh(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_refresh_token() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user_with_password(7, email, "pw"))));

        let service = service_with(repo);
        let pair = service.login("a@example.com", "pw").await.unwrap();

        let err = service.authenticate(&pair.refresh_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_refresh_issues_new_pair() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user_with_password(7, email, "pw"))));
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(user_with_password(id, "a@example.com", "pw"))));

        let service = service_with(repo);
        let pair = service.login("a@example.com", "pw").await.unwrap();

        let renewed = service.refresh(&pair.refresh_token).await.unwrap();
        assert!(!renewed.access_token.is_empty());
        assert!(!renewed.refresh_token.is_empty());
    }

    #[tokio::test]
    async fn test_authenticate_rejects_deleted_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user_with_password(7, email, "pw"))));
        repo.expect_find_by_id().returning(|_| Ok(None));

        let service = service_with(repo);
        let pair = service.login("a@example.com", "pw").await.unwrap();

        let err = service.authenticate(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_authenticate_rejects_garbage_token() {
        let service = service_with(MockUserRepository::new());
        let err = service.authenticate("not.a.jwt").await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[tokio::test]
    async fn test_tokens_from_other_secret_are_rejected() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .returning(|email| Ok(Some(user_with_password(7, email, "pw"))));

        let issuing = service_with(repo);
        let pair = issuing.login("a@example.com", "pw").await.unwrap();

        let other = AuthService::new(
            Arc::new(MockUserRepository::new()),
            JwtConfig {
                secret: "different-secret".to_string(),
                ..jwt_config()
            },
        );

        let err = other.authenticate(&pair.access_token).await.unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }
}
