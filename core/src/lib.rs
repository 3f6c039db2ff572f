//! Client for the PlayStation Network social API.
//!
//! # Overview
//! Remote accounts are `User` values; each operation on a `User` (friend,
//! block, message, compare trophies, activity) becomes one authenticated
//! HTTP call against a fixed, versioned PSN endpoint.
//!
//! # Design
//! - `PsnClient` builds `HttpRequest` values and parses `HttpResponse`
//!   values without touching the network; a `Transport` does the round trip.
//! - Credentials are a capability (`Credentials`) read at request-build time,
//!   so token refreshes take effect on the next request.
//! - Failures are reported in-band by the API; `response::discriminate`
//!   decides success vs. failure from the body, not the status code.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.
//!
//! ```no_run
//! # async fn demo() -> Result<(), psn_core::ApiError> {
//! let session = psn_core::Session::from_env()?;
//! let user = session.user("Hakoom").await?;
//! user.add_friend(Some("gg")).await?;
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod endpoints;
pub mod error;
pub mod http;
pub mod response;
pub mod session;
pub mod transport;
pub mod types;
pub mod user;

pub use auth::{Credentials, Snapshot, StaticCredentials};
pub use client::PsnClient;
pub use endpoints::{Endpoints, FeedCategory, Operation, TrophyPage};
pub use error::{ApiError, TransportError};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use response::{ApiFailure, ApiResponse};
pub use session::Session;
pub use transport::{ReqwestTransport, Transport};
pub use types::{ActivityResponse, CompareTrophiesResponse, Message, MessageKind, Profile};
pub use user::User;
