//! User management service — application-layer orchestration
//!
//! All identity business logic lives here.
//! HTTP handlers should be thin wrappers that delegate to this service.

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult, RepositoryProvider, Role, User};
use crate::infrastructure::crypto::jwt::{create_token, JwtConfig};
use crate::infrastructure::crypto::password::{hash_password, verify_password};
use crate::shared::Clock;

/// Authentication result returned after a successful login
#[derive(Debug, Clone)]
pub struct AuthResult {
    pub token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub user: User,
}

/// New account fields. `roles` is only honored on the admin path;
/// self-signup always gets USER.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub roles: Vec<Role>,
}

/// Profile update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub password: Option<String>,
    pub roles: Option<Vec<Role>>,
}

pub struct UserService {
    repos: Arc<dyn RepositoryProvider>,
    jwt_config: JwtConfig,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        jwt_config: JwtConfig,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            repos,
            jwt_config,
            clock,
        }
    }

    // ── Authentication ──────────────────────────────────────────

    /// Authenticate by username or email + password and return a JWT.
    pub async fn login(&self, username_or_email: &str, password: &str) -> DomainResult<AuthResult> {
        // Try username first, then email
        let user = match self.repos.users().find_by_username(username_or_email).await? {
            Some(user) => Some(user),
            None => self.repos.users().find_by_email(username_or_email).await?,
        };

        let Some(user) = user else {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        };

        let valid = verify_password(password, &user.password_hash).unwrap_or(false);
        if !valid {
            return Err(DomainError::Unauthorized("Invalid credentials".into()));
        }

        let token = create_token(&user.id, &user.username, &user.role_names(), &self.jwt_config)
            .map_err(|e| DomainError::Unexpected(format!("Failed to create token: {}", e)))?;

        Ok(AuthResult {
            token,
            token_type: "Bearer".into(),
            expires_in: self.jwt_config.expiration_hours * 3600,
            user,
        })
    }

    // ── Registration ────────────────────────────────────────────

    /// Self-signup. The account always starts with the USER role only.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
        full_name: &str,
    ) -> DomainResult<User> {
        self.create_user(CreateUser {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
            roles: vec![Role::User],
        })
        .await
    }

    /// Create an account with explicit roles (admin path).
    pub async fn create_user(&self, input: CreateUser) -> DomainResult<User> {
        validate_credentials(&input.username, &input.email, &input.password)?;

        // Check uniqueness
        if self
            .repos
            .users()
            .find_by_username(&input.username)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict("Username already exists".into()));
        }
        if self
            .repos
            .users()
            .find_by_email(&input.email)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict("Email already exists".into()));
        }

        let password_hash = hash_password(&input.password)
            .map_err(|e| DomainError::Unexpected(format!("Failed to hash password: {}", e)))?;

        let now = self.clock.now();
        let roles = if input.roles.is_empty() {
            vec![Role::User]
        } else {
            input.roles
        };
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: input.username,
            email: input.email,
            password_hash,
            full_name: input.full_name,
            roles,
            created_at: now,
            updated_at: now,
        };

        self.repos.users().save(user.clone()).await?;

        info!(user_id = %user.id, username = %user.username, "New user registered");
        Ok(user)
    }

    // ── Queries ─────────────────────────────────────────────────

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.repos.users().find_all().await
    }

    pub async fn get_by_id(&self, id: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "id", id))
    }

    pub async fn get_by_username(&self, username: &str) -> DomainResult<User> {
        self.repos
            .users()
            .find_by_username(username)
            .await?
            .ok_or_else(|| DomainError::not_found("User", "username", username))
    }

    // ── Commands (mutations) ────────────────────────────────────

    /// Update profile fields; unset fields are left alone. Username and
    /// email changes re-check uniqueness against other accounts.
    pub async fn update_user(&self, id: &str, input: UpdateUser) -> DomainResult<User> {
        let mut user = self.get_by_id(id).await?;

        if let Some(username) = input.username {
            if username != user.username
                && self
                    .repos
                    .users()
                    .find_by_username(&username)
                    .await?
                    .is_some()
            {
                return Err(DomainError::Conflict("Username already exists".into()));
            }
            user.username = username;
        }

        if let Some(email) = input.email {
            if email != user.email
                && self.repos.users().find_by_email(&email).await?.is_some()
            {
                return Err(DomainError::Conflict("Email already exists".into()));
            }
            user.email = email;
        }

        if let Some(full_name) = input.full_name {
            user.full_name = full_name;
        }

        if let Some(password) = input.password {
            if password.len() < 8 {
                return Err(DomainError::Validation(
                    "Password must be at least 8 characters".into(),
                ));
            }
            user.password_hash = hash_password(&password)
                .map_err(|e| DomainError::Unexpected(format!("Failed to hash password: {}", e)))?;
        }

        if let Some(roles) = input.roles {
            user.roles = roles;
        }

        user.updated_at = self.clock.now();
        self.repos.users().update(user.clone()).await?;

        info!(user_id = %user.id, "User updated");
        Ok(user)
    }

    pub async fn delete_user(&self, id: &str) -> DomainResult<()> {
        self.repos.users().delete(id).await?;
        info!(user_id = %id, "User deleted");
        Ok(())
    }
}

fn validate_credentials(username: &str, email: &str, password: &str) -> DomainResult<()> {
    if username.len() < 3 || username.len() > 50 {
        return Err(DomainError::Validation(
            "Username must be 3-50 characters".into(),
        ));
    }
    if password.len() < 8 {
        return Err(DomainError::Validation(
            "Password must be at least 8 characters".into(),
        ));
    }
    if !email.contains('@') {
        return Err(DomainError::Validation("Invalid email address".into()));
    }
    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────
