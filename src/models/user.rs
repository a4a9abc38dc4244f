//! User model, permissions and JWT claims

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use crate::error::AppError;

/// Catalog permissions held by librarians
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Permission {
    /// Create, update and delete books, copies, genres and languages
    CanEditBook,
    /// Create, update and delete authors
    CanEditAuthor,
    /// Renew loans and see every borrowed copy
    CanMarkReturned,
}

impl Permission {
    pub const ALL: [Permission; 3] = [
        Permission::CanEditBook,
        Permission::CanEditAuthor,
        Permission::CanMarkReturned,
    ];

    pub fn codename(&self) -> &'static str {
        match self {
            Permission::CanEditBook => "can_edit_book",
            Permission::CanEditAuthor => "can_edit_author",
            Permission::CanMarkReturned => "can_mark_returned",
        }
    }
}

impl std::fmt::Display for Permission {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.codename())
    }
}

impl std::str::FromStr for Permission {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Accept both "can_edit_book" and "catalog.can_edit_book"
        let codename = s.strip_prefix("catalog.").unwrap_or(s);
        Permission::ALL
            .into_iter()
            .find(|p| p.codename() == codename)
            .ok_or_else(|| format!("Unknown permission: {}", s))
    }
}

/// Full user model from database
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// Hashed password (argon2)
    #[serde(skip_serializing)]
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    /// Permission codenames
    pub permissions: Vec<String>,
    pub date_joined: DateTime<Utc>,
}

impl User {
    /// Known permissions granted to this user; unknown codenames are ignored
    pub fn granted_permissions(&self) -> Vec<Permission> {
        if self.is_superuser {
            return Permission::ALL.to_vec();
        }
        self.permissions
            .iter()
            .filter_map(|p| p.parse().ok())
            .collect()
    }
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginRequest {
    #[validate(length(min = 1, message = "Username is required"))]
    pub username: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Login response
#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
    pub user: User,
}

/// Fields for a newly created user
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub permissions: Vec<Permission>,
}

/// JWT Claims for authenticated users
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserClaims {
    pub sub: String,
    pub user_id: i32,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub permissions: Vec<Permission>,
    pub exp: i64,
    pub iat: i64,
}

impl UserClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.is_superuser || self.permissions.contains(&permission)
    }

    fn require(&self, permission: Permission, action: &str) -> Result<(), AppError> {
        if self.has_permission(permission) {
            Ok(())
        } else {
            Err(AppError::Authorization(format!("Insufficient rights to {}", action)))
        }
    }

    // Authorization checks
    pub fn require_edit_books(&self) -> Result<(), AppError> {
        self.require(Permission::CanEditBook, "edit books")
    }

    pub fn require_edit_authors(&self) -> Result<(), AppError> {
        self.require(Permission::CanEditAuthor, "edit authors")
    }

    pub fn require_mark_returned(&self) -> Result<(), AppError> {
        self.require(Permission::CanMarkReturned, "manage borrowed books")
    }

    /// Require access to the admin views
    pub fn require_staff(&self) -> Result<(), AppError> {
        if self.is_staff || self.is_superuser {
            Ok(())
        } else {
            Err(AppError::Authorization("Staff privileges required".to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(permissions: Vec<Permission>) -> UserClaims {
        let now = Utc::now().timestamp();
        UserClaims {
            sub: "testuser".to_string(),
            user_id: 1,
            is_staff: false,
            is_superuser: false,
            permissions,
            exp: now + 3600,
            iat: now,
        }
    }

    #[test]
    fn test_permission_parse() {
        assert_eq!("can_edit_book".parse::<Permission>(), Ok(Permission::CanEditBook));
        assert_eq!("catalog.can_mark_returned".parse::<Permission>(), Ok(Permission::CanMarkReturned));
        assert!("can_fly".parse::<Permission>().is_err());
    }

    #[test]
    fn test_token_round_trip() {
        let original = claims(vec![Permission::CanEditAuthor]);
        let token = original.create_token("secret").unwrap();
        let parsed = UserClaims::from_token(&token, "secret").unwrap();
        assert_eq!(parsed.sub, "testuser");
        assert_eq!(parsed.permissions, vec![Permission::CanEditAuthor]);
        assert!(UserClaims::from_token(&token, "other-secret").is_err());
    }

    #[test]
    fn test_require_checks() {
        let patron = claims(Vec::new());
        assert!(patron.require_edit_books().is_err());
        assert!(patron.require_mark_returned().is_err());
        assert!(patron.require_staff().is_err());

        let librarian = claims(vec![Permission::CanMarkReturned]);
        assert!(librarian.require_mark_returned().is_ok());
        assert!(librarian.require_edit_authors().is_err());

        let mut admin = claims(Vec::new());
        admin.is_superuser = true;
        assert!(admin.require_edit_books().is_ok());
        assert!(admin.require_edit_authors().is_ok());
        assert!(admin.require_staff().is_ok());
    }

    #[test]
    fn test_granted_permissions_skip_unknown() {
        let user = User {
            id: 1,
            username: "lib".to_string(),
            password: String::new(),
            first_name: String::new(),
            last_name: String::new(),
            email: String::new(),
            is_staff: true,
            is_superuser: false,
            permissions: vec!["can_edit_book".to_string(), "legacy_perm".to_string()],
            date_joined: Utc::now(),
        };
        assert_eq!(user.granted_permissions(), vec![Permission::CanEditBook]);
    }
}
