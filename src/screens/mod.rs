//! Per-screen view state holders.
//!
//! Every holder owns one immutable snapshot published through a
//! [`tokio::sync::watch`] channel, takes input through `on_event` over a closed
//! event enum, and stops publishing once `detach` was called. Holders never
//! call each other.

pub mod auth;
pub mod details;
pub mod favourites;
mod feed;
pub mod search;
pub mod trending;

use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use tokio::sync::watch;

use crate::favourites::IndexError;
use crate::gateway::ApiFailure;
use crate::paging::{Page, PagingState};
use crate::services::AuthError;

pub use auth::{LogInHolder, ResetPasswordHolder, SignUpHolder};
pub use details::DetailsHolder;
pub use favourites::FavouritesHolder;
pub use search::SearchHolder;
pub use trending::TrendingHolder;

/// User-facing description of a failed operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorNotice {
    pub message: String,
    pub status_code: Option<u16>,
    pub is_network: bool,
    pub retryable: bool,
}

impl ErrorNotice {
    pub fn new(message: impl Into<String>, retryable: bool) -> Self {
        Self {
            message: message.into(),
            status_code: None,
            is_network: false,
            retryable,
        }
    }
}

/// TMDB error bodies look like `{"status_code": 34, "status_message": "..."}`.
fn service_message(body: Option<&str>) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body?).ok()?;
    value
        .get("status_message")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}

impl From<&ApiFailure> for ErrorNotice {
    fn from(failure: &ApiFailure) -> Self {
        match failure {
            ApiFailure::Network(_) => Self {
                message: "Network unavailable, check your connection and try again".to_string(),
                status_code: None,
                is_network: true,
                retryable: true,
            },
            ApiFailure::Service {
                status_code,
                error_body,
            } => Self {
                message: service_message(error_body.as_deref())
                    .unwrap_or_else(|| format!("Request failed with status {status_code}")),
                status_code: Some(*status_code),
                is_network: false,
                retryable: *status_code >= 500 || *status_code == 429,
            },
        }
    }
}

impl From<&IndexError> for ErrorNotice {
    fn from(err: &IndexError) -> Self {
        let retryable = !matches!(err, IndexError::InvalidItem(_));
        Self::new(err.to_string(), retryable)
    }
}

impl From<&AuthError> for ErrorNotice {
    fn from(err: &AuthError) -> Self {
        let retryable = matches!(err, AuthError::Database(_) | AuthError::Internal(_));
        Self::new(err.to_string(), retryable)
    }
}

/// Snapshot channel plus the detached flag.
pub(crate) struct Publisher<S> {
    tx: watch::Sender<S>,
    detached: AtomicBool,
}

impl<S: Clone> Publisher<S> {
    pub(crate) fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self {
            tx,
            detached: AtomicBool::new(false),
        }
    }

    pub(crate) fn state(&self) -> S {
        self.tx.borrow().clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Applies `change` and notifies subscribers. Returns `false` without
    /// touching the snapshot once detached.
    pub(crate) fn update(&self, change: impl FnOnce(&mut S)) -> bool {
        if self.is_detached() {
            return false;
        }
        self.tx.send_modify(change);
        true
    }

    pub(crate) fn detach(&self) {
        self.detached.store(true, Ordering::Release);
    }

    pub(crate) fn is_detached(&self) -> bool {
        self.detached.load(Ordering::Acquire)
    }
}

/// Visible part of a paged list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot<T> {
    pub items: Vec<T>,
    pub loading: bool,
    pub end_reached: bool,
    /// Pages before the first loaded one exist (after a refresh mid-list).
    pub has_previous: bool,
    pub error: Option<ErrorNotice>,
}

impl<T> Default for ListSnapshot<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            end_reached: false,
            has_previous: false,
            error: None,
        }
    }
}

impl<T: Clone> ListSnapshot<T> {
    pub(crate) fn from_paging(paging: &PagingState<T>) -> Self {
        Self {
            items: paging.items().cloned().collect(),
            loading: false,
            end_reached: paging.end_reached(),
            has_previous: paging.prev_key().is_some(),
            error: None,
        }
    }
}

/// Result of one page load, applied to a [`PagingState`].
pub(crate) fn apply_page<T: Clone>(
    paging: &mut PagingState<T>,
    outcome: Result<Page<T>, ApiFailure>,
) -> ListSnapshot<T> {
    match outcome {
        Ok(page) => {
            paging.insert(page);
            ListSnapshot::from_paging(paging)
        }
        Err(failure) => ListSnapshot {
            error: Some(ErrorNotice::from(&failure)),
            ..ListSnapshot::from_paging(paging)
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_failures_are_retryable() {
        let notice = ErrorNotice::from(&ApiFailure::Network("dns".to_string()));
        assert!(notice.is_network);
        assert!(notice.retryable);
        assert_eq!(notice.status_code, None);
    }

    #[test]
    fn service_failures_use_the_tmdb_message() {
        let notice = ErrorNotice::from(&ApiFailure::Service {
            status_code: 404,
            error_body: Some(
                r#"{"status_code":34,"status_message":"The resource you requested could not be found."}"#
                    .to_string(),
            ),
        });
        assert_eq!(notice.message, "The resource you requested could not be found.");
        assert_eq!(notice.status_code, Some(404));
        assert!(!notice.retryable);

        let notice = ErrorNotice::from(&ApiFailure::Service {
            status_code: 503,
            error_body: None,
        });
        assert_eq!(notice.message, "Request failed with status 503");
        assert!(notice.retryable);
    }

    #[test]
    fn detached_publishers_drop_updates() {
        let publisher = Publisher::new(0_u32);
        let rx = publisher.subscribe();
        assert!(publisher.update(|s| *s = 1));
        assert_eq!(*rx.borrow(), 1);

        publisher.detach();
        assert!(!publisher.update(|s| *s = 2));
        assert_eq!(publisher.state(), 1);
    }
}
