//! Sign-up, log-in and password reset forms.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::watch;
use tracing::warn;

use super::{ErrorNotice, Publisher};
use crate::constants::preferences::{FIRST_NAME, LAST_NAME};
use crate::db::Store;
use crate::services::{Account, AuthService};
use crate::validation::{Field, validate};

// ============================================================================
// Sign up
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignUpState {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub first_name_error: Option<String>,
    pub last_name_error: Option<String>,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub submitting: bool,
    pub account: Option<Account>,
    pub error: Option<ErrorNotice>,
}

impl SignUpState {
    #[must_use]
    pub fn has_field_errors(&self) -> bool {
        self.first_name_error.is_some()
            || self.last_name_error.is_some()
            || self.email_error.is_some()
            || self.password_error.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpEvent {
    FirstNameChanged(String),
    LastNameChanged(String),
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    DismissError,
}

pub struct SignUpHolder {
    auth: Arc<dyn AuthService>,
    store: Store,
    publisher: Publisher<SignUpState>,
}

impl SignUpHolder {
    pub fn new(auth: Arc<dyn AuthService>, store: Store) -> Self {
        Self {
            auth,
            store,
            publisher: Publisher::new(SignUpState::default()),
        }
    }

    pub fn state(&self) -> SignUpState {
        self.publisher.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<SignUpState> {
        self.publisher.subscribe()
    }

    pub async fn on_event(&self, event: SignUpEvent) {
        if self.publisher.is_detached() {
            return;
        }

        match event {
            SignUpEvent::FirstNameChanged(value) => {
                self.publisher.update(|s| {
                    s.first_name = value;
                    s.first_name_error = None;
                });
            }
            SignUpEvent::LastNameChanged(value) => {
                self.publisher.update(|s| {
                    s.last_name = value;
                    s.last_name_error = None;
                });
            }
            SignUpEvent::EmailChanged(value) => {
                self.publisher.update(|s| {
                    s.email = value;
                    s.email_error = None;
                });
            }
            SignUpEvent::PasswordChanged(value) => {
                self.publisher.update(|s| {
                    s.password = value;
                    s.password_error = None;
                });
            }
            SignUpEvent::Submit => self.submit().await,
            SignUpEvent::DismissError => {
                self.publisher.update(|s| s.error = None);
            }
        }
    }

    async fn submit(&self) {
        let form = self.state();
        if form.submitting {
            return;
        }

        let message = |field, value: &str| validate(field, value).message().map(str::to_string);
        let first_name_error = message(Field::FirstName, &form.first_name);
        let last_name_error = message(Field::LastName, &form.last_name);
        let email_error = message(Field::Email, &form.email);
        let password_error = message(Field::SignUpPassword, &form.password);

        let invalid = first_name_error.is_some()
            || last_name_error.is_some()
            || email_error.is_some()
            || password_error.is_some();

        self.publisher.update(|s| {
            s.first_name_error = first_name_error;
            s.last_name_error = last_name_error;
            s.email_error = email_error;
            s.password_error = password_error;
            s.submitting = !invalid;
            s.error = None;
        });
        if invalid {
            return;
        }

        let result = self.auth.create_account(&form.email, &form.password).await;
        match result {
            Ok(account) => {
                self.save_names(form.first_name.trim(), form.last_name.trim()).await;
                self.publisher.update(|s| {
                    s.submitting = false;
                    s.account = Some(account);
                });
            }
            Err(err) => {
                let notice = ErrorNotice::from(&err);
                self.publisher.update(|s| {
                    s.submitting = false;
                    s.error = Some(notice);
                });
            }
        }
    }

    /// Names are display-only; failing to store them does not fail sign-up.
    async fn save_names(&self, first_name: &str, last_name: &str) {
        for (key, value) in [(FIRST_NAME, first_name), (LAST_NAME, last_name)] {
            if let Err(e) = self.store.set_preference(key, value).await {
                warn!("Failed to store {key}: {e:#}");
            }
        }
    }

    pub fn detach(&self) {
        self.publisher.detach();
    }
}

// ============================================================================
// Log in
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LogInState {
    pub email: String,
    #[serde(skip)]
    pub password: String,
    pub email_error: Option<String>,
    pub password_error: Option<String>,
    pub submitting: bool,
    pub account: Option<Account>,
    pub error: Option<ErrorNotice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogInEvent {
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    DismissError,
}

pub struct LogInHolder {
    auth: Arc<dyn AuthService>,
    publisher: Publisher<LogInState>,
}

impl LogInHolder {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self {
            auth,
            publisher: Publisher::new(LogInState::default()),
        }
    }

    pub fn state(&self) -> LogInState {
        self.publisher.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<LogInState> {
        self.publisher.subscribe()
    }

    pub async fn on_event(&self, event: LogInEvent) {
        if self.publisher.is_detached() {
            return;
        }

        match event {
            LogInEvent::EmailChanged(value) => {
                self.publisher.update(|s| {
                    s.email = value;
                    s.email_error = None;
                });
            }
            LogInEvent::PasswordChanged(value) => {
                self.publisher.update(|s| {
                    s.password = value;
                    s.password_error = None;
                });
            }
            LogInEvent::Submit => self.submit().await,
            LogInEvent::DismissError => {
                self.publisher.update(|s| s.error = None);
            }
        }
    }

    async fn submit(&self) {
        let form = self.state();
        if form.submitting {
            return;
        }

        let email_error = validate(Field::Email, &form.email).message().map(str::to_string);
        let password_error = validate(Field::LogInPassword, &form.password)
            .message()
            .map(str::to_string);
        let invalid = email_error.is_some() || password_error.is_some();

        self.publisher.update(|s| {
            s.email_error = email_error;
            s.password_error = password_error;
            s.submitting = !invalid;
            s.error = None;
        });
        if invalid {
            return;
        }

        let result = self.auth.sign_in(&form.email, &form.password).await;
        self.publisher.update(|s| {
            s.submitting = false;
            match result {
                Ok(account) => s.account = Some(account),
                Err(err) => s.error = Some(ErrorNotice::from(&err)),
            }
        });
    }

    pub fn detach(&self) {
        self.publisher.detach();
    }
}

// ============================================================================
// Password reset
// ============================================================================

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResetPasswordState {
    pub email: String,
    pub email_error: Option<String>,
    pub submitting: bool,
    /// A reset was issued for `email`.
    pub sent: bool,
    pub error: Option<ErrorNotice>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResetPasswordEvent {
    EmailChanged(String),
    Submit,
    DismissError,
}

pub struct ResetPasswordHolder {
    auth: Arc<dyn AuthService>,
    publisher: Publisher<ResetPasswordState>,
}

impl ResetPasswordHolder {
    pub fn new(auth: Arc<dyn AuthService>) -> Self {
        Self {
            auth,
            publisher: Publisher::new(ResetPasswordState::default()),
        }
    }

    pub fn state(&self) -> ResetPasswordState {
        self.publisher.state()
    }

    pub fn subscribe(&self) -> watch::Receiver<ResetPasswordState> {
        self.publisher.subscribe()
    }

    pub async fn on_event(&self, event: ResetPasswordEvent) {
        if self.publisher.is_detached() {
            return;
        }

        match event {
            ResetPasswordEvent::EmailChanged(value) => {
                self.publisher.update(|s| {
                    s.email = value;
                    s.email_error = None;
                    s.sent = false;
                });
            }
            ResetPasswordEvent::Submit => self.submit().await,
            ResetPasswordEvent::DismissError => {
                self.publisher.update(|s| s.error = None);
            }
        }
    }

    async fn submit(&self) {
        let form = self.state();
        if form.submitting {
            return;
        }

        if let Some(message) = validate(Field::Email, &form.email).message() {
            let message = message.to_string();
            self.publisher.update(|s| s.email_error = Some(message));
            return;
        }

        self.publisher.update(|s| {
            s.submitting = true;
            s.error = None;
        });

        let result = self.auth.send_password_reset(&form.email).await;
        self.publisher.update(|s| {
            s.submitting = false;
            match result {
                Ok(()) => s.sent = true,
                Err(err) => s.error = Some(ErrorNotice::from(&err)),
            }
        });
    }

    pub fn detach(&self) {
        self.publisher.detach();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::preferences::FIRST_NAME;
    use crate::services::SeaOrmAuthService;
    use crate::validation::{
        EMAIL_BLANK, FIRST_NAME_BLANK, LAST_NAME_BLANK, PASSWORD_EMPTY, PASSWORD_NO_SPECIAL,
    };

    async fn auth() -> (Store, Arc<dyn AuthService>) {
        let store = Store::in_memory().await.unwrap();
        let auth: Arc<dyn AuthService> = Arc::new(SeaOrmAuthService::new(store.clone()));
        (store, auth)
    }

    #[tokio::test]
    async fn sign_up_reports_every_invalid_field_at_once() {
        let (store, auth) = auth().await;
        let holder = SignUpHolder::new(auth, store);

        holder.on_event(SignUpEvent::EmailChanged("ada@example.com".to_string())).await;
        holder.on_event(SignUpEvent::PasswordChanged("abcd1234".to_string())).await;
        holder.on_event(SignUpEvent::Submit).await;

        let state = holder.state();
        assert_eq!(state.first_name_error.as_deref(), Some(FIRST_NAME_BLANK));
        assert_eq!(state.last_name_error.as_deref(), Some(LAST_NAME_BLANK));
        assert_eq!(state.email_error, None);
        assert_eq!(state.password_error.as_deref(), Some(PASSWORD_NO_SPECIAL));
        assert!(!state.submitting);
        assert!(state.account.is_none());
    }

    #[tokio::test]
    async fn sign_up_creates_account_and_stores_names() {
        let (store, auth) = auth().await;
        let holder = SignUpHolder::new(auth.clone(), store.clone());

        for event in [
            SignUpEvent::FirstNameChanged("Ada".to_string()),
            SignUpEvent::LastNameChanged("Lovelace".to_string()),
            SignUpEvent::EmailChanged("ada@example.com".to_string()),
            SignUpEvent::PasswordChanged("abcd123!".to_string()),
            SignUpEvent::Submit,
        ] {
            holder.on_event(event).await;
        }

        let state = holder.state();
        assert!(!state.has_field_errors());
        assert!(state.account.is_some());
        assert_eq!(auth.current_user().await.unwrap(), state.account);
        assert_eq!(
            store.get_preference(FIRST_NAME).await.unwrap().as_deref(),
            Some("Ada")
        );
    }

    #[tokio::test]
    async fn log_in_uses_looser_password_rule() {
        let (_, auth) = auth().await;
        auth.create_account("ada@example.com", "abcd123!").await.unwrap();
        auth.sign_out().await.unwrap();

        let holder = LogInHolder::new(auth.clone());
        holder.on_event(LogInEvent::Submit).await;
        let state = holder.state();
        assert_eq!(state.email_error.as_deref(), Some(EMAIL_BLANK));
        assert_eq!(state.password_error.as_deref(), Some(PASSWORD_EMPTY));

        holder.on_event(LogInEvent::EmailChanged("ada@example.com".to_string())).await;
        holder.on_event(LogInEvent::PasswordChanged("short".to_string())).await;
        holder.on_event(LogInEvent::Submit).await;
        let state = holder.state();
        assert_eq!(state.password_error, None);
        assert!(state.error.is_some(), "wrong password reaches the service");

        holder.on_event(LogInEvent::PasswordChanged("abcd123!".to_string())).await;
        holder.on_event(LogInEvent::Submit).await;
        assert!(holder.state().account.is_some());
    }

    #[tokio::test]
    async fn reset_validates_email_before_calling_service() {
        let (_, auth) = auth().await;
        auth.create_account("ada@example.com", "abcd123!").await.unwrap();
        let holder = ResetPasswordHolder::new(auth);

        holder.on_event(ResetPasswordEvent::EmailChanged("Ada@Example.com".to_string())).await;
        holder.on_event(ResetPasswordEvent::Submit).await;
        let state = holder.state();
        assert!(state.email_error.is_some());
        assert!(!state.sent);

        holder.on_event(ResetPasswordEvent::EmailChanged("ada@example.com".to_string())).await;
        holder.on_event(ResetPasswordEvent::Submit).await;
        assert!(holder.state().sent);
    }
}
