//! A client bound to a transport.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};

use crate::auth::{Credentials, StaticCredentials};
use crate::client::PsnClient;
use crate::endpoints::Endpoints;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{ReqwestTransport, Transport};
use crate::user::User;

/// `PsnClient` plus the `Transport` its requests run on.
///
/// Cloning is cheap; clones share the transport and credentials.
#[derive(Clone)]
pub struct Session {
    client: PsnClient,
    transport: Arc<dyn Transport>,
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("client", &self.client)
            .finish_non_exhaustive()
    }
}

impl Session {
    pub fn new(client: PsnClient, transport: Arc<dyn Transport>) -> Self {
        Self { client, transport }
    }

    /// Production session configured from the environment.
    ///
    /// See `Endpoints::from_env`, `StaticCredentials::from_env` and
    /// `ReqwestTransport::from_env` for the variables read.
    pub fn from_env() -> Result<Self, ApiError> {
        let credentials: Arc<dyn Credentials> = Arc::new(StaticCredentials::from_env()?);
        let client = PsnClient::new(Endpoints::from_env()?, credentials);
        Ok(Self::new(client, Arc::new(ReqwestTransport::from_env()?)))
    }

    pub fn client(&self) -> &PsnClient {
        &self.client
    }

    /// Run one request and interpret its response with `parse`.
    pub async fn execute<T, F>(&self, request: HttpRequest, parse: F) -> Result<T, ApiError>
    where
        F: FnOnce(&PsnClient, HttpResponse) -> Result<T, ApiError>,
    {
        let method = request.method;
        let url = request.url.clone();
        debug!(method = method.as_str(), %url, "psn request");

        let response = self.transport.execute(request).await?;
        trace!(
            method = method.as_str(),
            %url,
            status = response.status,
            bytes = response.body.len(),
            "psn response"
        );
        parse(&self.client, response)
    }

    /// Fetch a user by online id.
    pub async fn user(&self, online_id: &str) -> Result<User, ApiError> {
        User::fetch(self.clone(), online_id).await
    }

    /// The authenticated account, from the credentials' cached profile when
    /// there is one.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        let credentials = self.client.credentials();
        match credentials.current_account_profile() {
            Some(profile) => Ok(User::from_profile(self.clone(), profile)),
            None => self.user(&credentials.current_account_id()).await,
        }
    }
}
