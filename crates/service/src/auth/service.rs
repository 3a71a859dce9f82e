use std::sync::Arc;

use argon2::{password_hash::{PasswordHasher, PasswordVerifier, SaltString}, Argon2, PasswordHash};
use jsonwebtoken::{encode, EncodingKey, Header as JwtHeader};
use rand::rngs::OsRng;
use tracing::{debug, info, instrument};

use super::domain::{AuthSession, AuthUser, Claims, LoginInput, RegisterInput};
use super::errors::AuthError;
use super::repository::AuthRepository;

/// Auth service configuration
#[derive(Clone)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub token_ttl_hours: i64,
    pub password_algorithm: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self { jwt_secret: None, token_ttl_hours: 12, password_algorithm: "argon2".into() }
    }
}

/// Auth business service independent of web framework
pub struct AuthService<R: AuthRepository> {
    repo: Arc<R>,
    cfg: AuthConfig,
}

impl<R: AuthRepository> AuthService<R> {
    pub fn new(repo: Arc<R>, cfg: AuthConfig) -> Self { Self { repo, cfg } }

    /// Register a new customer with a hashed password.
    ///
    /// Creates the user row, an empty wallet, and, when a referral code is
    /// supplied and resolves to an existing user, a pending referral.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthUser, AuthError> {
        if input.password.len() < 8 {
            return Err(AuthError::Validation("password too short (>=8)".into()));
        }
        if let Some(existing) = self.repo.find_user_by_email(&input.email).await? {
            debug!("user exists: {}", existing.email);
            return Err(AuthError::Conflict);
        }

        // Resolve the referrer up front so a bad code fails before any write.
        let referrer = match input.referral_code.as_deref().filter(|c| !c.trim().is_empty()) {
            Some(code) => Some(
                self.repo
                    .find_user_by_referral_code(code)
                    .await?
                    .ok_or_else(|| AuthError::Validation(format!("unknown referral code '{}'", code)))?,
            ),
            None => None,
        };

        let user = self.repo.create_user(&input.email, &input.name, "customer").await?;
        let salt = SaltString::generate(&mut OsRng);
        let hash = Argon2::default()
            .hash_password(input.password.as_bytes(), &salt)
            .map_err(|e| AuthError::HashError(e.to_string()))?
            .to_string();

        let _cred = self.repo.upsert_password(user.id, hash, self.cfg.password_algorithm.clone()).await?;
        self.repo.create_wallet(user.id).await?;
        if let Some(referrer) = referrer {
            self.repo.record_referral(referrer.id, user.id, &referrer.referral_code).await?;
            info!(referrer_id = %referrer.id, referred_id = %user.id, "referral_recorded");
        }
        info!(user_id = %user.id, email = %user.email, "user_registered");
        Ok(user)
    }

    /// Authenticate a user and optionally issue a token.
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self.repo
            .find_user_by_email(&input.email)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let cred = self.repo
            .get_credentials(user.id)
            .await?
            .ok_or(AuthError::Unauthorized)?;

        let parsed = PasswordHash::new(&cred.password_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
        if Argon2::default().verify_password(input.password.as_bytes(), &parsed).is_err() {
            return Err(AuthError::Unauthorized);
        }

        let mut token = None;
        if let Some(secret) = &self.cfg.jwt_secret {
            let exp = (chrono::Utc::now() + chrono::Duration::hours(self.cfg.token_ttl_hours)).timestamp() as usize;
            let claims = Claims {
                sub: user.email.clone(),
                uid: user.id.to_string(),
                role: user.role.clone(),
                exp,
            };
            token = Some(
                encode(&JwtHeader::default(), &claims, &EncodingKey::from_secret(secret.as_bytes()))
                    .map_err(|e| AuthError::TokenError(e.to_string()))?,
            );
        }

        Ok(AuthSession { user, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::repository::mock::MockAuthRepository;

    fn svc(repo: Arc<MockAuthRepository>, secret: Option<&str>) -> AuthService<MockAuthRepository> {
        AuthService::new(
            repo,
            AuthConfig {
                jwt_secret: secret.map(str::to_string),
                token_ttl_hours: 1,
                password_algorithm: "argon2".into(),
            },
        )
    }

    #[tokio::test]
    async fn register_then_login_roundtrip() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo.clone(), Some("secret"));
        let input = RegisterInput {
            email: "u@example.com".into(),
            name: "U".into(),
            password: "Passw0rd!".into(),
            referral_code: None,
        };
        let user = svc.register(input).await.unwrap();
        assert_eq!(user.role, "customer");

        let session = svc
            .login(LoginInput { email: "u@example.com".into(), password: "Passw0rd!".into() })
            .await
            .unwrap();
        assert!(session.token.is_some());
    }

    #[tokio::test]
    async fn register_rejects_short_password() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo, None);
        let err = svc
            .register(RegisterInput {
                email: "u@example.com".into(),
                name: "U".into(),
                password: "short".into(),
                referral_code: None,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo, None);
        let input = RegisterInput {
            email: "dup@example.com".into(),
            name: "U".into(),
            password: "Passw0rd!".into(),
            referral_code: None,
        };
        svc.register(input.clone()).await.unwrap();
        assert!(matches!(svc.register(input).await.unwrap_err(), AuthError::Conflict));
    }

    #[tokio::test]
    async fn register_records_referral_for_known_code() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo.clone(), None);
        let referrer = svc
            .register(RegisterInput {
                email: "ref@example.com".into(),
                name: "Referrer".into(),
                password: "Passw0rd!".into(),
                referral_code: None,
            })
            .await
            .unwrap();
        svc.register(RegisterInput {
            email: "new@example.com".into(),
            name: "New".into(),
            password: "Passw0rd!".into(),
            referral_code: Some(referrer.referral_code.clone()),
        })
        .await
        .unwrap();
        assert_eq!(repo.referral_count(), 1);
    }

    #[tokio::test]
    async fn register_rejects_unknown_referral_code() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo, None);
        let err = svc
            .register(RegisterInput {
                email: "x@example.com".into(),
                name: "X".into(),
                password: "Passw0rd!".into(),
                referral_code: Some("NOPE1234".into()),
            })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Validation(_)));
    }

    #[tokio::test]
    async fn login_rejects_wrong_password() {
        let repo = Arc::new(MockAuthRepository::default());
        let svc = svc(repo, Some("secret"));
        svc.register(RegisterInput {
            email: "w@example.com".into(),
            name: "W".into(),
            password: "Passw0rd!".into(),
            referral_code: None,
        })
        .await
        .unwrap();
        let err = svc
            .login(LoginInput { email: "w@example.com".into(), password: "wrong".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Unauthorized));
    }
}
