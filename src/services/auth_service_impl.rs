//! `SeaORM` implementation of the `AuthService` trait.
//!
//! Accounts live in the `users` table; the session is the signed-in user id
//! kept in preferences so it survives restarts.

use crate::constants::preferences::SESSION_USER_ID;
use crate::db::{Store, User};
use crate::domain::UserId;
use crate::services::auth_service::{Account, AuthError, AuthService};
use async_trait::async_trait;
use tracing::{debug, info, warn};

pub struct SeaOrmAuthService {
    store: Store,
}

impl SeaOrmAuthService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    async fn start_session(&self, user: User) -> Result<Account, AuthError> {
        self.store.set_preference(SESSION_USER_ID, &user.id).await?;
        Ok(Account {
            user_id: UserId::new(user.id),
            email: user.email,
        })
    }
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn create_account(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        if self.store.get_user_by_email(email).await?.is_some() {
            return Err(AuthError::EmailInUse);
        }

        let user = self.store.create_user(email, password).await?;
        info!(user_id = %user.id, "Account created");

        self.start_session(user).await
    }

    async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AuthError> {
        let user = self
            .store
            .verify_user_password(email, password)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        info!(user_id = %user.id, "Signed in");
        self.start_session(user).await
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.store.remove_preference(SESSION_USER_ID).await?;
        info!("Signed out");
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> Result<(), AuthError> {
        let user = self
            .store
            .get_user_by_email(email)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        let code = self.store.record_password_reset(&user).await?;

        info!(user_id = %user.id, "Password reset requested");
        // No mail transport: the code is only surfaced in debug logs.
        debug!(user_id = %user.id, %code, "Password reset code issued");
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Account>, AuthError> {
        let Some(user_id) = self.store.get_preference(SESSION_USER_ID).await? else {
            return Ok(None);
        };

        match self.store.get_user_by_id(&user_id).await? {
            Some(user) => Ok(Some(Account {
                user_id: UserId::new(user.id),
                email: user.email,
            })),
            None => {
                warn!(%user_id, "Session refers to a missing account, clearing it");
                self.store.remove_preference(SESSION_USER_ID).await?;
                Ok(None)
            }
        }
    }
}
