//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{NewUser, Permission, User, UserClaims},
    repository::Repository,
};

/// Username of the superuser created on an empty database
pub const BOOTSTRAP_ADMIN_USERNAME: &str = "admin";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate user by username and return a JWT token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;

        if !verify_password(&user, password)? {
            return Err(AppError::Authentication("Invalid username or password".to_string()));
        }

        let token = self.create_token_for_user(&user)?;
        tracing::info!(user_id = user.id, "User logged in");
        Ok((token, user))
    }

    /// Token lifetime in seconds
    pub fn token_lifetime(&self) -> i64 {
        self.config.jwt_expiration_hours as i64 * 3600
    }

    pub fn create_token_for_user(&self, user: &User) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            permissions: user.granted_permissions(),
            exp: now + self.token_lifetime(),
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Create a user with a plain-text password
    pub async fn create_user(
        &self,
        username: &str,
        password: &str,
        is_staff: bool,
        is_superuser: bool,
        permissions: Vec<Permission>,
    ) -> AppResult<User> {
        if username.trim().is_empty() {
            return Err(AppError::Validation("Username is required".to_string()));
        }
        let user = NewUser {
            username: username.trim().to_string(),
            password_hash: hash_password(password)?,
            is_staff,
            is_superuser,
            permissions,
        };
        self.repository.users.create(&user).await
    }

    /// Create the `admin` superuser when no user exists yet and a bootstrap
    /// password is configured.
    pub async fn ensure_bootstrap_admin(&self) -> AppResult<Option<User>> {
        let Some(password) = self.config.bootstrap_admin_password.as_deref() else {
            return Ok(None);
        };
        if self.repository.users.count().await? > 0 {
            return Ok(None);
        }

        let admin = self
            .create_user(BOOTSTRAP_ADMIN_USERNAME, password, true, true, Permission::ALL.to_vec())
            .await?;
        tracing::warn!(user_id = admin.id, "Created bootstrap superuser '{}'", admin.username);
        Ok(Some(admin))
    }
}

/// Verify a password against the user's argon2 hash
pub fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_hash(hash: String) -> User {
        User {
            id: 1,
            username: "testuser1".to_string(),
            password: hash,
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            is_staff: false,
            is_superuser: false,
            permissions: Vec::new(),
            date_joined: Utc::now(),
        }
    }

    #[test]
    fn test_hash_and_verify() {
        let user = user_with_hash(hash_password("1X<ISRUkw+tuK").unwrap());
        assert!(verify_password(&user, "1X<ISRUkw+tuK").unwrap());
        assert!(!verify_password(&user, "wrong").unwrap());
    }

    #[test]
    fn test_unusable_hash_is_internal_error() {
        let user = user_with_hash("plain".to_string());
        assert!(matches!(verify_password(&user, "plain"), Err(AppError::Internal(_))));
    }
}
