//! Remote accounts as local values.
//!
//! # Design
//! A `User` only exists once its profile is in hand: `User::fetch` is the
//! asynchronous factory, `User::from_profile` wraps a profile already known.
//! Every operation is the same three steps (build, execute, parse) and
//! differs only in which `PsnClient` pair it calls. Nothing is cached
//! between calls; blocking twice sends two requests.

use crate::client::PsnClient;
use crate::endpoints::TrophyPage;
use crate::error::ApiError;
use crate::session::Session;
use crate::types::{ActivityResponse, CompareTrophiesResponse, Message, Profile};

/// A remote PSN account.
#[derive(Debug, Clone)]
pub struct User {
    session: Session,
    profile: Profile,
}

impl User {
    /// Fetch the profile for `online_id` and wrap it.
    pub async fn fetch(session: Session, online_id: &str) -> Result<Self, ApiError> {
        let profile = fetch_profile(&session, online_id).await?;
        Ok(Self { session, profile })
    }

    /// Wrap a profile without touching the network.
    pub fn from_profile(session: Session, profile: Profile) -> Self {
        Self { session, profile }
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn into_profile(self) -> Profile {
        self.profile
    }

    pub fn online_id(&self) -> &str {
        &self.profile.online_id
    }

    /// Refetch and replace the profile. On failure the old one is kept.
    pub async fn refresh(&mut self) -> Result<(), ApiError> {
        self.profile = fetch_profile(&self.session, &self.profile.online_id).await?;
        Ok(())
    }

    /// Send a friend request, optionally with a message.
    pub async fn add_friend(&self, message: Option<&str>) -> Result<(), ApiError> {
        let request = self.session.client().build_add_friend(self.online_id(), message)?;
        self.session.execute(request, PsnClient::parse_ack).await
    }

    pub async fn remove_friend(&self) -> Result<(), ApiError> {
        let request = self.session.client().build_remove_friend(self.online_id())?;
        self.session.execute(request, PsnClient::parse_ack).await
    }

    pub async fn block(&self) -> Result<(), ApiError> {
        let request = self.session.client().build_block(self.online_id())?;
        self.session.execute(request, PsnClient::parse_ack).await
    }

    pub async fn unblock(&self) -> Result<(), ApiError> {
        let request = self.session.client().build_unblock(self.online_id())?;
        self.session.execute(request, PsnClient::parse_ack).await
    }

    /// Send `message` to this user.
    ///
    /// `None` reports `Ok(false)` without a request. Only text messages are
    /// supported; other kinds fail with `NotImplemented` before any I/O.
    pub async fn send_message(&self, message: Option<Message>) -> Result<bool, ApiError> {
        let Some(mut message) = message else {
            return Ok(false);
        };
        message.assign_receiver(self.online_id());
        let request = self.session.client().build_send_message(&message)?;
        self.session.execute(request, PsnClient::parse_ack).await?;
        Ok(true)
    }

    /// Compare the acting account's trophies with this user's.
    pub async fn compare_trophies(&self, offset: u32, limit: u32) -> Result<CompareTrophiesResponse, ApiError> {
        let page = TrophyPage { offset, limit };
        let request = self.session.client().build_compare_trophies(self.online_id(), page)?;
        self.session
            .execute(request, PsnClient::parse_compare_trophies)
            .await
    }

    pub async fn activity(&self) -> Result<ActivityResponse, ApiError> {
        let request = self.session.client().build_activity(self.online_id())?;
        self.session
            .execute(request, PsnClient::parse_activity)
            .await
    }
}

async fn fetch_profile(session: &Session, online_id: &str) -> Result<Profile, ApiError> {
    let request = session.client().build_fetch_profile(online_id)?;
    session
        .execute(request, PsnClient::parse_profile)
        .await
}
