//! Endpoint table for the PSN sub-APIs.
//!
//! # Design
//! Every operation differs from the others only in verb, sub-API host, path,
//! query and body shape. `Operation::route` is the one place those are
//! spelled out; `PsnClient::build` turns any `Route` into an `HttpRequest`.
//! Hosts, field lists and filters are hardcoded to the API version the
//! client targets. Only the hosts can be overridden, for tests.

use serde_json::{json, Value};
use url::Url;

use crate::error::ApiError;
use crate::http::HttpMethod;

pub const PROFILE_BASE_URL: &str = "https://us-prof.np.community.playstation.net";
pub const MESSAGING_BASE_URL: &str = "https://us-gmsg.np.community.playstation.net";
pub const TROPHY_BASE_URL: &str = "https://us-tpy.np.community.playstation.net";
pub const ACTIVITY_BASE_URL: &str = "https://activity.api.np.km.playstation.net";

const PROFILE_FIELDS: &str = "npId,onlineId,avatarUrls,plus,aboutMe,languagesUsed,\
trophySummary(@default,progress,earnedTrophies),isOfficiallyVerified,\
personalDetail(@default,profilePictureUrls),primaryOnlineStatus,friendRelation,\
requestMessageFlag,blocking,mutualFriendsCount,following,followerCount";

/// Sub-API a route is served by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Api {
    Profile,
    Messaging,
    Trophy,
    Activity,
}

/// Base URLs for each sub-API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub profile: String,
    pub messaging: String,
    pub trophy: String,
    pub activity: String,
}

impl Endpoints {
    /// Point every sub-API at the same host, e.g. a mock server.
    pub fn with_base(base_url: &str) -> Result<Self, ApiError> {
        Url::parse(base_url)?;
        Ok(Self {
            profile: base_url.to_string(),
            messaging: base_url.to_string(),
            trophy: base_url.to_string(),
            activity: base_url.to_string(),
        })
    }

    /// Production hosts, overridden by `PSN_BASE_URL` (all sub-APIs) or
    /// `PSN_{PROFILE,MESSAGING,TROPHY,ACTIVITY}_BASE_URL`.
    pub fn from_env() -> Result<Self, ApiError> {
        let mut endpoints = match std::env::var("PSN_BASE_URL") {
            Ok(base) => Self::with_base(&base)?,
            Err(_) => Self::default(),
        };
        for (var, slot) in [
            ("PSN_PROFILE_BASE_URL", &mut endpoints.profile),
            ("PSN_MESSAGING_BASE_URL", &mut endpoints.messaging),
            ("PSN_TROPHY_BASE_URL", &mut endpoints.trophy),
            ("PSN_ACTIVITY_BASE_URL", &mut endpoints.activity),
        ] {
            if let Ok(value) = std::env::var(var) {
                Url::parse(&value)?;
                *slot = value;
            }
        }
        Ok(endpoints)
    }

    pub fn base(&self, api: Api) -> &str {
        match api {
            Api::Profile => &self.profile,
            Api::Messaging => &self.messaging,
            Api::Trophy => &self.trophy,
            Api::Activity => &self.activity,
        }
    }

    /// Resolve a route's path segments and query against its sub-API host.
    pub fn url_for(&self, route: &Route) -> Result<Url, ApiError> {
        let mut url = Url::parse(self.base(route.api))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(format!("{} cannot be a base", self.base(route.api))))?
            .pop_if_empty()
            .extend(&route.segments);
        if !route.query.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(route.query.iter().map(|(k, v)| (*k, v.as_str())));
        }
        Ok(url)
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            profile: PROFILE_BASE_URL.to_string(),
            messaging: MESSAGING_BASE_URL.to_string(),
            trophy: TROPHY_BASE_URL.to_string(),
            activity: ACTIVITY_BASE_URL.to_string(),
        }
    }
}

/// Offset/limit pair for the trophy comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrophyPage {
    pub offset: u32,
    pub limit: u32,
}

impl Default for TrophyPage {
    fn default() -> Self {
        Self { offset: 0, limit: 36 }
    }
}

/// Activity feed categories the client asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedCategory {
    Purchased,
    Rated,
    VideoUpload,
    ScreenshotUpload,
    PlayedGame,
    WatchedVideo,
    Trophy,
    Broadcasting,
    Liked,
    ProfilePic,
    Friended,
    ContentShare,
    InGamePost,
    Rented,
    Subscribed,
    FirstPlayedGame,
    InAppPost,
    AppWatchedVideo,
    SharePlayedGame,
    VideoUploadVerified,
    ScreenshotUploadVerified,
    SharedEvent,
    JoinEvent,
    TrophyUpload,
    Following,
    Reshare,
}

impl FeedCategory {
    pub const ALL: [FeedCategory; 26] = [
        FeedCategory::Purchased,
        FeedCategory::Rated,
        FeedCategory::VideoUpload,
        FeedCategory::ScreenshotUpload,
        FeedCategory::PlayedGame,
        FeedCategory::WatchedVideo,
        FeedCategory::Trophy,
        FeedCategory::Broadcasting,
        FeedCategory::Liked,
        FeedCategory::ProfilePic,
        FeedCategory::Friended,
        FeedCategory::ContentShare,
        FeedCategory::InGamePost,
        FeedCategory::Rented,
        FeedCategory::Subscribed,
        FeedCategory::FirstPlayedGame,
        FeedCategory::InAppPost,
        FeedCategory::AppWatchedVideo,
        FeedCategory::SharePlayedGame,
        FeedCategory::VideoUploadVerified,
        FeedCategory::ScreenshotUploadVerified,
        FeedCategory::SharedEvent,
        FeedCategory::JoinEvent,
        FeedCategory::TrophyUpload,
        FeedCategory::Following,
        FeedCategory::Reshare,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FeedCategory::Purchased => "PURCHASED",
            FeedCategory::Rated => "RATED",
            FeedCategory::VideoUpload => "VIDEO_UPLOAD",
            FeedCategory::ScreenshotUpload => "SCREENSHOT_UPLOAD",
            FeedCategory::PlayedGame => "PLAYED_GAME",
            FeedCategory::WatchedVideo => "WATCHED_VIDEO",
            FeedCategory::Trophy => "TROPHY",
            FeedCategory::Broadcasting => "BROADCASTING",
            FeedCategory::Liked => "LIKED",
            FeedCategory::ProfilePic => "PROFILE_PIC",
            FeedCategory::Friended => "FRIENDED",
            FeedCategory::ContentShare => "CONTENT_SHARE",
            FeedCategory::InGamePost => "IN_GAME_POST",
            FeedCategory::Rented => "RENTED",
            FeedCategory::Subscribed => "SUBSCRIBED",
            FeedCategory::FirstPlayedGame => "FIRST_PLAYED_GAME",
            FeedCategory::InAppPost => "IN_APP_POST",
            FeedCategory::AppWatchedVideo => "APP_WATCHED_VIDEO",
            FeedCategory::SharePlayedGame => "SHARE_PLAYED_GAME",
            FeedCategory::VideoUploadVerified => "VIDEO_UPLOAD_VERIFIED",
            FeedCategory::ScreenshotUploadVerified => "SCREENSHOT_UPLOAD_VERIFIED",
            FeedCategory::SharedEvent => "SHARED_EVENT",
            FeedCategory::JoinEvent => "JOIN_EVENT",
            FeedCategory::TrophyUpload => "TROPHY_UPLOAD",
            FeedCategory::Following => "FOLLOWING",
            FeedCategory::Reshare => "RESHARE",
        }
    }
}

/// Request body shape.
#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    /// No body at all.
    Empty,
    /// A literal JSON `null`; some POST endpoints accept nothing else.
    Null,
    Json(Value),
}

/// A fully resolved operation, minus host and credentials.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pub method: HttpMethod,
    pub api: Api,
    pub segments: Vec<String>,
    pub query: Vec<(&'static str, String)>,
    pub body: Body,
}

/// Every call the client knows how to make.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    FetchProfile,
    AddFriend { message: Option<String> },
    RemoveFriend,
    Block,
    Unblock,
    SendMessage { body: Value },
    CompareTrophies(TrophyPage),
    GetActivity,
}

impl Operation {
    /// Route for this operation, acted on by `acting` against `target`.
    pub fn route(&self, acting: &str, target: &str) -> Route {
        match self {
            Operation::FetchProfile => Route {
                method: HttpMethod::Get,
                api: Api::Profile,
                segments: segments(&["userProfile", "v1", "users", target, "profile2"]),
                query: vec![
                    ("fields", PROFILE_FIELDS.to_string()),
                    ("avatarSizes", "m,xl".to_string()),
                    ("profilePictureSizes", "m,xl".to_string()),
                    ("languagesUsedLanguageSet", "set3".to_string()),
                ],
                body: Body::Empty,
            },
            Operation::AddFriend { message } => {
                let body = match message.as_deref() {
                    Some(text) if !text.is_empty() => json!({ "requestMessage": text }),
                    _ => json!({}),
                };
                Route {
                    method: HttpMethod::Post,
                    api: Api::Profile,
                    segments: friend_list(acting, target),
                    query: Vec::new(),
                    body: Body::Json(body),
                }
            }
            Operation::RemoveFriend => Route {
                method: HttpMethod::Delete,
                api: Api::Profile,
                segments: friend_list(acting, target),
                query: Vec::new(),
                body: Body::Empty,
            },
            Operation::Block => Route {
                method: HttpMethod::Post,
                api: Api::Profile,
                segments: block_list(acting, target),
                query: Vec::new(),
                body: Body::Null,
            },
            Operation::Unblock => Route {
                method: HttpMethod::Delete,
                api: Api::Profile,
                segments: block_list(acting, target),
                query: Vec::new(),
                body: Body::Empty,
            },
            Operation::SendMessage { body } => Route {
                method: HttpMethod::Post,
                api: Api::Messaging,
                segments: segments(&["groupMessaging", "v1", "messageGroups"]),
                query: Vec::new(),
                body: Body::Json(body.clone()),
            },
            Operation::CompareTrophies(page) => Route {
                method: HttpMethod::Get,
                api: Api::Trophy,
                segments: segments(&["trophy", "v1", "trophyTitles"]),
                query: vec![
                    ("fields", "@default".to_string()),
                    ("npLanguage", "en".to_string()),
                    ("iconSize", "m".to_string()),
                    ("platform", "PS3,PSVITA,PS4".to_string()),
                    ("offset", page.offset.to_string()),
                    ("limit", page.limit.to_string()),
                    ("comparedUser", target.to_string()),
                ],
                body: Body::Empty,
            },
            Operation::GetActivity => Route {
                method: HttpMethod::Get,
                api: Api::Activity,
                segments: segments(&["activity", "api", "v1", "users", target, "feed", "0"]),
                query: FeedCategory::ALL
                    .iter()
                    .map(|c| ("filters", c.as_str().to_string()))
                    .collect(),
                body: Body::Empty,
            },
        }
    }
}

fn segments(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn friend_list(acting: &str, target: &str) -> Vec<String> {
    segments(&["userProfile", "v1", "users", acting, "friendList", target])
}

fn block_list(acting: &str, target: &str) -> Vec<String> {
    segments(&["userProfile", "v1", "users", acting, "blockList", target])
}
