//! In-memory stand-in for the PSN profile, messaging, trophy and activity APIs.
//!
//! Failures are reported the way PSN reports them: a JSON body of the form
//! `{"error":{"code":..,"message":..}}`, whatever the status code.

use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
};

use axum::{
    extract::{Path, Query, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub const DEFAULT_TOKEN: &str = "mock-token";
pub const DEFAULT_ACCOUNT: &str = "me";

/// Feed categories the activity endpoint accepts.
pub const FEED_FILTERS: &[&str] = &[
    "PURCHASED",
    "RATED",
    "VIDEO_UPLOAD",
    "SCREENSHOT_UPLOAD",
    "PLAYED_GAME",
    "WATCHED_VIDEO",
    "TROPHY",
    "BROADCASTING",
    "LIKED",
    "PROFILE_PIC",
    "FRIENDED",
    "CONTENT_SHARE",
    "IN_GAME_POST",
    "RENTED",
    "SUBSCRIBED",
    "FIRST_PLAYED_GAME",
    "IN_APP_POST",
    "APP_WATCHED_VIDEO",
    "SHARE_PLAYED_GAME",
    "VIDEO_UPLOAD_VERIFIED",
    "SCREENSHOT_UPLOAD_VERIFIED",
    "SHARED_EVENT",
    "JOIN_EVENT",
    "TROPHY_UPLOAD",
    "FOLLOWING",
    "RESHARE",
];

const ERR_INVALID_TOKEN: i64 = 2_138_628;
const ERR_USER_NOT_FOUND: i64 = 2_105_356;
const ERR_BAD_REQUEST: i64 = 2_105_858;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub online_id: String,
    pub about_me: String,
    pub plus: u8,
    pub trophy_summary: TrophySummary,
    pub friend_relation: String,
    pub blocking: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TrophySummary {
    pub level: u32,
    pub progress: u32,
    pub earned_trophies: TrophyCounts,
}

#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrophyCounts {
    pub platinum: u32,
    pub gold: u32,
    pub silver: u32,
    pub bronze: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrophyTitle {
    pub np_communication_id: String,
    pub trophy_title_name: String,
    #[serde(rename = "trophyTitlePlatfrom")]
    pub trophy_title_platform: String,
    pub defined_trophies: TrophyCounts,
    pub compared_user: TitleProgress,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TitleProgress {
    pub online_id: String,
    pub progress: u32,
    pub earned_trophies: TrophyCounts,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedItem {
    pub story_id: String,
    pub story_type: String,
    pub caption: String,
    pub date: String,
    pub like_count: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FriendRequest {
    pub request_message: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageKindPayload {
    pub message_kind: u32,
    pub body: String,
}

#[derive(Deserialize)]
pub struct SendMessage {
    pub to: Vec<String>,
    pub message: MessageKindPayload,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SentMessage {
    pub group_id: String,
    pub from: String,
    pub to: Vec<String>,
    pub body: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrophyQuery {
    pub offset: Option<u32>,
    pub limit: Option<u32>,
    pub compared_user: Option<String>,
}

/// Server state: one authenticated account and the users it can see.
#[derive(Debug)]
pub struct MockPsn {
    pub token: String,
    pub account: String,
    pub profiles: HashMap<String, Profile>,
    /// Friend requests sent by the account, keyed by target, with the message.
    pub friend_requests: HashMap<String, Option<String>>,
    pub blocked: HashSet<String>,
    pub messages: Vec<SentMessage>,
    pub titles: Vec<TrophyTitle>,
    /// Requests that passed routing, authorized or not.
    pub request_count: usize,
}

impl MockPsn {
    /// A server knowing `account` plus a few other users and 40 trophy titles.
    pub fn seeded(token: &str, account: &str) -> Self {
        let mut profiles = HashMap::new();
        for (id, level) in [(account, 20), ("Hakoom", 12), ("Gamer42", 7), ("quiet_one", 1)] {
            profiles.insert(id.to_string(), profile(id, level));
        }
        let titles = (0..40)
            .map(|i| TrophyTitle {
                np_communication_id: format!("NPWR{i:05}_00"),
                trophy_title_name: format!("Game {i}"),
                trophy_title_platform: if i % 2 == 0 { "PS4" } else { "PSVITA" }.to_string(),
                defined_trophies: TrophyCounts {
                    platinum: 1,
                    gold: 4,
                    silver: 10,
                    bronze: 30,
                },
                compared_user: TitleProgress {
                    online_id: String::new(),
                    progress: (i * 7 % 100) as u32,
                    earned_trophies: TrophyCounts::default(),
                },
            })
            .collect();
        Self {
            token: token.to_string(),
            account: account.to_string(),
            profiles,
            friend_requests: HashMap::new(),
            blocked: HashSet::new(),
            messages: Vec::new(),
            titles,
            request_count: 0,
        }
    }

    fn authorize(&mut self, headers: &HeaderMap) -> Result<(), Response> {
        self.request_count += 1;
        let expected = format!("Bearer {}", self.token);
        match headers.get("authorization").and_then(|v| v.to_str().ok()) {
            Some(value) if value == expected => Ok(()),
            _ => Err(psn_error(StatusCode::UNAUTHORIZED, ERR_INVALID_TOKEN, "Invalid token")),
        }
    }

    fn acting_as(&self, online_id: &str) -> Result<(), Response> {
        if online_id == self.account {
            Ok(())
        } else {
            Err(psn_error(StatusCode::FORBIDDEN, ERR_BAD_REQUEST, "Not permitted"))
        }
    }

    fn known(&self, online_id: &str) -> Result<(), Response> {
        if self.profiles.contains_key(online_id) {
            Ok(())
        } else {
            Err(user_not_found())
        }
    }
}

impl Default for MockPsn {
    fn default() -> Self {
        Self::seeded(DEFAULT_TOKEN, DEFAULT_ACCOUNT)
    }
}

pub type Db = Arc<RwLock<MockPsn>>;

pub fn app() -> Router {
    app_with_state(Arc::new(RwLock::new(MockPsn::default())))
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route("/userProfile/v1/users/{online_id}/profile2", get(get_profile))
        .route(
            "/userProfile/v1/users/{me}/friendList/{target}",
            post(add_friend).delete(remove_friend),
        )
        .route(
            "/userProfile/v1/users/{me}/blockList/{target}",
            post(block).delete(unblock),
        )
        .route("/groupMessaging/v1/messageGroups", post(send_message))
        .route("/trophy/v1/trophyTitles", get(trophy_titles))
        .route("/activity/api/v1/users/{online_id}/feed/{page}", get(activity_feed))
        .layer(TraceLayer::new_for_http())
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

fn profile(online_id: &str, level: u32) -> Profile {
    Profile {
        online_id: online_id.to_string(),
        about_me: format!("I am {online_id}"),
        plus: u8::from(level > 5),
        trophy_summary: TrophySummary {
            level,
            progress: level * 3 % 100,
            earned_trophies: TrophyCounts {
                platinum: level / 10,
                gold: level,
                silver: level * 2,
                bronze: level * 5,
            },
        },
        friend_relation: "no".to_string(),
        blocking: false,
    }
}

fn psn_error(status: StatusCode, code: i64, message: &str) -> Response {
    (status, Json(json!({ "error": { "code": code, "message": message } }))).into_response()
}

fn user_not_found() -> Response {
    psn_error(StatusCode::NOT_FOUND, ERR_USER_NOT_FOUND, "User not found")
}

fn parse_body<T: serde::de::DeserializeOwned>(raw: &str) -> Result<T, Response> {
    serde_json::from_str(raw)
        .map_err(|e| psn_error(StatusCode::BAD_REQUEST, ERR_BAD_REQUEST, &format!("Bad request body: {e}")))
}

async fn get_profile(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(online_id): Path<String>,
) -> Result<Json<Value>, Response> {
    let mut db = db.write().await;
    db.authorize(&headers)?;
    let mut profile = db.profiles.get(&online_id).cloned().ok_or_else(user_not_found)?;
    if db.friend_requests.contains_key(&online_id) {
        profile.friend_relation = "requested".to_string();
    }
    profile.blocking = db.blocked.contains(&online_id);
    Ok(Json(json!({ "profile": profile })))
}

async fn add_friend(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((me, target)): Path<(String, String)>,
    body: String,
) -> Result<StatusCode, Response> {
    let mut db = db.write().await;
    db.authorize(&headers)?;
    db.acting_as(&me)?;
    db.known(&target)?;
    let request: FriendRequest = parse_body(&body)?;
    if db.friend_requests.contains_key(&target) {
        return Err(psn_error(
            StatusCode::BAD_REQUEST,
            ERR_BAD_REQUEST,
            "Friend request already sent",
        ));
    }
    db.friend_requests.insert(target, request.request_message);
    Ok(StatusCode::NO_CONTENT)
}

async fn remove_friend(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((me, target)): Path<(String, String)>,
) -> Result<StatusCode, Response> {
    let mut db = db.write().await;
    db.authorize(&headers)?;
    db.acting_as(&me)?;
    db.known(&target)?;
    match db.friend_requests.remove(&target) {
        Some(_) => Ok(StatusCode::NO_CONTENT),
        None => Err(psn_error(StatusCode::BAD_REQUEST, ERR_BAD_REQUEST, "Not a friend")),
    }
}

/// Accepts only an empty or `null` body, like the real endpoint.
async fn block(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((me, target)): Path<(String, String)>,
    body: String,
) -> Result<StatusCode, Response> {
    let mut db = db.write().await;
    db.authorize(&headers)?;
    db.acting_as(&me)?;
    db.known(&target)?;
    let trimmed = body.trim();
    if !(trimmed.is_empty() || trimmed == "null") {
        return Err(psn_error(StatusCode::BAD_REQUEST, ERR_BAD_REQUEST, "Unexpected body"));
    }
    db.blocked.insert(target);
    Ok(StatusCode::NO_CONTENT)
}

async fn unblock(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((me, target)): Path<(String, String)>,
) -> Result<StatusCode, Response> {
    let mut db = db.write().await;
    db.authorize(&headers)?;
    db.acting_as(&me)?;
    if db.blocked.remove(&target) {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(psn_error(StatusCode::BAD_REQUEST, ERR_BAD_REQUEST, "User is not blocked"))
    }
}

async fn send_message(
    State(db): State<Db>,
    headers: HeaderMap,
    body: String,
) -> Result<Json<Value>, Response> {
    let mut db = db.write().await;
    db.authorize(&headers)?;
    let input: SendMessage = parse_body(&body)?;
    if input.message.message_kind != 1 {
        return Err(psn_error(StatusCode::BAD_REQUEST, ERR_BAD_REQUEST, "Unsupported message kind"));
    }
    if input.to.is_empty() {
        return Err(psn_error(StatusCode::BAD_REQUEST, ERR_BAD_REQUEST, "No recipients"));
    }
    for id in &input.to {
        db.known(id)?;
    }
    let group_id = Uuid::new_v4().to_string();
    let sent = SentMessage {
        group_id: group_id.clone(),
        from: db.account.clone(),
        to: input.to,
        body: input.message.body,
    };
    db.messages.push(sent);
    Ok(Json(json!({ "messageGroupId": group_id, "messageUid": db.messages.len() })))
}

async fn trophy_titles(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<TrophyQuery>,
) -> Result<Json<Value>, Response> {
    let mut db = db.write().await;
    db.authorize(&headers)?;
    let compared = query
        .compared_user
        .ok_or_else(|| psn_error(StatusCode::BAD_REQUEST, ERR_BAD_REQUEST, "comparedUser is required"))?;
    db.known(&compared)?;
    let offset = query.offset.unwrap_or(0);
    let limit = query.limit.unwrap_or(36);
    let titles: Vec<TrophyTitle> = db
        .titles
        .iter()
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .map(|mut t| {
            t.compared_user.online_id = compared.clone();
            t
        })
        .collect();
    Ok(Json(json!({
        "totalResults": db.titles.len(),
        "offset": offset,
        "limit": limit,
        "trophyTitles": titles,
    })))
}

async fn activity_feed(
    State(db): State<Db>,
    headers: HeaderMap,
    Path((online_id, _page)): Path<(String, u32)>,
    RawQuery(raw): RawQuery,
) -> Result<Json<Value>, Response> {
    let mut db = db.write().await;
    db.authorize(&headers)?;
    db.known(&online_id)?;
    let filters: Vec<String> = url::form_urlencoded::parse(raw.unwrap_or_default().as_bytes())
        .filter(|(k, _)| k == "filters")
        .map(|(_, v)| v.into_owned())
        .collect();
    if let Some(bad) = filters.iter().find(|f| !FEED_FILTERS.contains(&f.as_str())) {
        return Err(psn_error(
            StatusCode::BAD_REQUEST,
            ERR_BAD_REQUEST,
            &format!("Unknown filter {bad}"),
        ));
    }
    let feed: Vec<FeedItem> = ["TROPHY", "PLAYED_GAME", "FRIENDED"]
        .iter()
        .filter(|kind| filters.is_empty() || filters.iter().any(|f| f == *kind))
        .enumerate()
        .map(|(i, kind)| FeedItem {
            story_id: format!("{online_id}-{i}"),
            story_type: kind.to_string(),
            caption: format!("{online_id} did {kind}"),
            date: "2024-01-01T00:00:00Z".to_string(),
            like_count: i as u32,
        })
        .collect();
    Ok(Json(json!({ "feed": feed })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serializes_camel_case() {
        let json = serde_json::to_value(profile("x", 3)).unwrap();
        assert_eq!(json["onlineId"], "x");
        assert_eq!(json["trophySummary"]["earnedTrophies"]["gold"], 3);
        assert_eq!(json["friendRelation"], "no");
    }

    #[test]
    fn trophy_title_keeps_platform_typo() {
        let db = MockPsn::default();
        let json = serde_json::to_value(&db.titles[0]).unwrap();
        assert_eq!(json["trophyTitlePlatfrom"], "PS4");
    }

    #[test]
    fn seeded_state_contains_account() {
        let db = MockPsn::seeded("t", "alice");
        assert!(db.profiles.contains_key("alice"));
        assert!(db.profiles.contains_key("Hakoom"));
        assert_eq!(db.titles.len(), 40);
    }

    #[test]
    fn authorize_counts_and_checks_bearer() {
        let mut db = MockPsn::default();
        let mut headers = HeaderMap::new();
        assert!(db.authorize(&headers).is_err());
        headers.insert("authorization", format!("Bearer {DEFAULT_TOKEN}").parse().unwrap());
        assert!(db.authorize(&headers).is_ok());
        assert_eq!(db.request_count, 2);
    }

    #[test]
    fn friend_request_message_is_optional() {
        let input: FriendRequest = serde_json::from_str("{}").unwrap();
        assert!(input.request_message.is_none());
        let input: FriendRequest = serde_json::from_str(r#"{"requestMessage":"hi"}"#).unwrap();
        assert_eq!(input.request_message.as_deref(), Some("hi"));
    }
}
