/// Account registration and token login
use serde::Serialize;
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::forms::{LoginForm, RegistrationForm};
use crate::metrics;
use crate::models::{NewUser, PublicProfile};
use crate::repository::BlogRepository;
use crate::security::{hash_password, validate_password, verify_password, JwtKeys};

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub expires_in: i64,
    pub user: PublicProfile,
}

pub struct AuthService {
    repo: Arc<dyn BlogRepository>,
    jwt: JwtKeys,
}

impl AuthService {
    pub fn new(repo: Arc<dyn BlogRepository>, jwt: JwtKeys) -> Self {
        Self { repo, jwt }
    }

    pub async fn register(&self, form: RegistrationForm) -> Result<PublicProfile> {
        form.validate()?;
        validate_password(&form.password, &form.username)?;

        if self
            .repo
            .find_user_by_username(&form.username)
            .await?
            .is_some()
        {
            metrics::record_auth_event("register_conflict");
            return Err(AppError::Conflict("username already exists".to_string()));
        }

        let user = self
            .repo
            .create_user(NewUser {
                username: form.username,
                email: form.email.unwrap_or_default(),
                first_name: form.first_name,
                last_name: form.last_name,
                password_hash: hash_password(&form.password)?,
                is_staff: false,
            })
            .await?;

        metrics::record_auth_event("register");
        tracing::info!(user_id = user.id, username = %user.username, "user registered");

        Ok(PublicProfile::from_user(&user, true))
    }

    pub async fn login(&self, form: LoginForm) -> Result<TokenResponse> {
        form.validate()?;

        let user = match self.repo.find_user_by_username(&form.username).await? {
            Some(user) if user.is_active => user,
            _ => {
                metrics::record_auth_event("login_failed");
                return Err(AppError::Unauthorized("invalid credentials".to_string()));
            }
        };

        if !verify_password(&form.password, &user.password_hash)? {
            metrics::record_auth_event("login_failed");
            tracing::warn!(username = %user.username, "login rejected: wrong password");
            return Err(AppError::Unauthorized("invalid credentials".to_string()));
        }

        let access_token = self.jwt.issue(user.id, &user.username)?;
        metrics::record_auth_event("login");

        Ok(TokenResponse {
            access_token,
            token_type: "Bearer",
            expires_in: self.jwt.expiry_seconds(),
            user: PublicProfile::from_user(&user, true),
        })
    }
}
