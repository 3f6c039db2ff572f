//! Credentials capability consumed by the request builder.
//!
//! Token acquisition and refresh happen elsewhere. The client only ever
//! reads the current token and acting account id, and it reads them each
//! time a request is built so a refresh applies to the next request.

use std::sync::{Arc, RwLock};

use crate::error::ApiError;
use crate::types::Profile;

/// Token and acting account read together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub token: String,
    pub account_id: String,
}

/// Source of the live bearer token and the authenticated account.
///
/// `snapshot` must return a token and account id that belong together;
/// a request built from it never mixes two accounts.
pub trait Credentials: Send + Sync {
    fn snapshot(&self) -> Snapshot;

    fn current_token(&self) -> String {
        self.snapshot().token
    }

    fn current_account_id(&self) -> String {
        self.snapshot().account_id
    }

    /// Cached profile of the authenticated account, when the provider has one.
    fn current_account_profile(&self) -> Option<Profile> {
        None
    }
}

impl<C: Credentials + ?Sized> Credentials for Arc<C> {
    fn snapshot(&self) -> Snapshot {
        (**self).snapshot()
    }

    fn current_token(&self) -> String {
        (**self).current_token()
    }

    fn current_account_id(&self) -> String {
        (**self).current_account_id()
    }

    fn current_account_profile(&self) -> Option<Profile> {
        (**self).current_account_profile()
    }
}

#[derive(Debug, Clone)]
struct AccountState {
    token: String,
    online_id: String,
    profile: Option<Profile>,
}

/// In-memory credentials that an external refresher updates in place.
#[derive(Debug)]
pub struct StaticCredentials {
    state: RwLock<AccountState>,
}

impl StaticCredentials {
    pub fn new(token: impl Into<String>, online_id: impl Into<String>) -> Self {
        Self {
            state: RwLock::new(AccountState {
                token: token.into(),
                online_id: online_id.into(),
                profile: None,
            }),
        }
    }

    /// Read `PSN_ACCESS_TOKEN` and `PSN_ONLINE_ID`.
    pub fn from_env() -> Result<Self, ApiError> {
        let token = std::env::var("PSN_ACCESS_TOKEN")
            .map_err(|_| ApiError::Config("PSN_ACCESS_TOKEN is not set".to_string()))?;
        let online_id = std::env::var("PSN_ONLINE_ID")
            .map_err(|_| ApiError::Config("PSN_ONLINE_ID is not set".to_string()))?;
        Ok(Self::new(token, online_id))
    }

    /// Replace the token. Requests already built keep the old one.
    pub fn set_token(&self, token: impl Into<String>) {
        self.write().token = token.into();
    }

    /// Switch the acting account; drops any cached profile.
    pub fn set_account(&self, online_id: impl Into<String>) {
        let mut state = self.write();
        state.online_id = online_id.into();
        state.profile = None;
    }

    /// Switch token and acting account in one write; drops any cached profile.
    pub fn set_session(&self, token: impl Into<String>, online_id: impl Into<String>) {
        let mut state = self.write();
        state.token = token.into();
        state.online_id = online_id.into();
        state.profile = None;
    }

    pub fn set_profile(&self, profile: Profile) {
        self.write().profile = Some(profile);
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, AccountState> {
        self.state.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, AccountState> {
        self.state.write().unwrap_or_else(|e| e.into_inner())
    }
}

impl Credentials for StaticCredentials {
    fn snapshot(&self) -> Snapshot {
        let state = self.read();
        Snapshot {
            token: state.token.clone(),
            account_id: state.online_id.clone(),
        }
    }

    fn current_token(&self) -> String {
        self.read().token.clone()
    }

    fn current_account_id(&self) -> String {
        self.read().online_id.clone()
    }

    fn current_account_profile(&self) -> Option<Profile> {
        self.read().profile.clone()
    }
}
