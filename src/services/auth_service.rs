//! Domain service for accounts and the signed-in session.
//!
//! Handles account creation, sign-in/out and password reset requests.

use serde::Serialize;
use thiserror::Error;

use crate::domain::UserId;

/// Errors specific to authentication operations.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("An account already exists for this email")]
    EmailInUse,

    #[error("No account found for this email")]
    UserNotFound,

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<sea_orm::DbErr> for AuthError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }
}

/// The signed-in account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Account {
    pub user_id: UserId,
    pub email: String,
}

/// Domain service trait for authentication.
#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates an account and signs it in.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::EmailInUse`] if the email is already registered.
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, AuthError>;

    /// Verifies credentials and makes the account the current session.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::InvalidCredentials`] if login fails.
    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthError>;

    /// Ends the current session. Signing out while signed out succeeds.
    async fn sign_out(&self) -> Result<(), AuthError>;

    /// Issues a password reset for the account registered under `email`.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserNotFound`] if no account uses the email.
    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError>;

    /// The signed-in account, if any.
    async fn current_user(&self) -> Result<Option<Account>, AuthError>;

    /// Like [`Self::current_user`] but fails when nobody is signed in.
    async fn require_user(&self) -> Result<Account, AuthError> {
        self.current_user().await?.ok_or(AuthError::NotSignedIn)
    }
}
