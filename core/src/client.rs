//! Request builder and response parser for the PSN API.
//!
//! # Design
//! `PsnClient` holds the endpoint table and a credentials handle and carries
//! no other state. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. Credentials are read inside `build`, never cached, so a
//! token refresh applies to the very next request built.

use std::fmt;
use std::sync::Arc;

use crate::auth::{Credentials, Snapshot};
use crate::endpoints::{Body, Endpoints, Operation, TrophyPage};
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::response::{interpret_ack, interpret_json};
use crate::types::{
    ActivityResponse, CompareTrophiesResponse, Message, MessageKind, MessagePayload, Profile,
    SendMessageBody,
};

/// Stateless client for the PSN API.
#[derive(Clone)]
pub struct PsnClient {
    endpoints: Endpoints,
    credentials: Arc<dyn Credentials>,
}

impl fmt::Debug for PsnClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PsnClient")
            .field("endpoints", &self.endpoints)
            .finish_non_exhaustive()
    }
}

impl PsnClient {
    pub fn new(endpoints: Endpoints, credentials: Arc<dyn Credentials>) -> Self {
        Self {
            endpoints,
            credentials,
        }
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    pub fn credentials(&self) -> &Arc<dyn Credentials> {
        &self.credentials
    }

    /// Build the request for `operation` against `target`.
    pub fn build(&self, operation: &Operation, target: &str) -> Result<HttpRequest, ApiError> {
        let Snapshot { token, account_id } = self.credentials.snapshot();
        let route = operation.route(&account_id, target);
        let url = self.endpoints.url_for(&route)?;

        let mut headers = vec![("authorization".to_string(), format!("Bearer {token}"))];
        let body = match route.body {
            Body::Empty => None,
            Body::Null => Some("null".to_string()),
            Body::Json(value) => Some(
                serde_json::to_string(&value)
                    .map_err(|e| ApiError::SerializationError(e.to_string()))?,
            ),
        };
        if body.is_some() {
            headers.push(("content-type".to_string(), "application/json".to_string()));
        }

        Ok(HttpRequest {
            method: route.method,
            url: url.into(),
            headers,
            body,
        })
    }

    pub fn build_fetch_profile(&self, online_id: &str) -> Result<HttpRequest, ApiError> {
        self.build(&Operation::FetchProfile, online_id)
    }

    pub fn build_add_friend(&self, online_id: &str, message: Option<&str>) -> Result<HttpRequest, ApiError> {
        let operation = Operation::AddFriend {
            message: message.map(str::to_string),
        };
        self.build(&operation, online_id)
    }

    pub fn build_remove_friend(&self, online_id: &str) -> Result<HttpRequest, ApiError> {
        self.build(&Operation::RemoveFriend, online_id)
    }

    pub fn build_block(&self, online_id: &str) -> Result<HttpRequest, ApiError> {
        self.build(&Operation::Block, online_id)
    }

    pub fn build_unblock(&self, online_id: &str) -> Result<HttpRequest, ApiError> {
        self.build(&Operation::Unblock, online_id)
    }

    /// Only text messages have a wire format.
    pub fn build_send_message(&self, message: &Message) -> Result<HttpRequest, ApiError> {
        if message.kind != MessageKind::Text {
            return Err(ApiError::NotImplemented(format!("{:?} messages", message.kind)));
        }
        let receiver = message
            .receiver()
            .ok_or_else(|| ApiError::InvalidRequest("message has no receiver".to_string()))?;
        let body = SendMessageBody {
            to: message.addressees(),
            message: MessagePayload {
                message_kind: message.kind.wire_code(),
                body: &message.body,
            },
        };
        let body = serde_json::to_value(&body).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        self.build(&Operation::SendMessage { body }, receiver)
    }

    pub fn build_compare_trophies(&self, online_id: &str, page: TrophyPage) -> Result<HttpRequest, ApiError> {
        self.build(&Operation::CompareTrophies(page), online_id)
    }

    pub fn build_activity(&self, online_id: &str) -> Result<HttpRequest, ApiError> {
        self.build(&Operation::GetActivity, online_id)
    }

    /// The profile is wrapped under a `profile` key.
    pub fn parse_profile(&self, response: HttpResponse) -> Result<Profile, ApiError> {
        interpret_json(&response, Some("profile"))?.into_result()
    }

    /// Parse responses that carry no result (friend, block, message).
    pub fn parse_ack(&self, response: HttpResponse) -> Result<(), ApiError> {
        interpret_ack(&response)?.into_result()
    }

    pub fn parse_compare_trophies(&self, response: HttpResponse) -> Result<CompareTrophiesResponse, ApiError> {
        interpret_json(&response, None)?.into_result()
    }

    pub fn parse_activity(&self, response: HttpResponse) -> Result<ActivityResponse, ApiError> {
        interpret_json(&response, None)?.into_result()
    }
}
