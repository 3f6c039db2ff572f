use std::sync::Arc;

use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with_state, Db, MockPsn, Profile};
use tokio::sync::RwLock;
use tower::ServiceExt;

const AUTH: &str = "Bearer mock-token";

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::AUTHORIZATION, AUTH)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn get(uri: &str) -> Request<String> {
    request("GET", uri, "")
}

fn shared() -> Db {
    Arc::new(RwLock::new(MockPsn::default()))
}

// --- auth ---

#[tokio::test]
async fn missing_token_is_in_band_error() {
    let resp = app()
        .oneshot(
            Request::builder()
                .uri("/userProfile/v1/users/Hakoom/profile2")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["message"], "Invalid token");
}

#[tokio::test]
async fn rotated_token_rejects_old_bearer() {
    let db = shared();
    db.write().await.token = "fresh".to_string();
    let resp = app_with_state(db)
        .oneshot(get("/userProfile/v1/users/Hakoom/profile2"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

// --- profile ---

#[tokio::test]
async fn profile_is_wrapped() {
    let resp = app()
        .oneshot(get("/userProfile/v1/users/Hakoom/profile2?fields=npId,onlineId"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let profile: Profile = serde_json::from_value(body["profile"].clone()).unwrap();
    assert_eq!(profile.online_id, "Hakoom");
    assert_eq!(profile.friend_relation, "no");
}

#[tokio::test]
async fn unknown_profile_is_not_found() {
    let resp = app()
        .oneshot(get("/userProfile/v1/users/nobody/profile2"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body = body_json(resp).await;
    assert_eq!(body["error"]["code"], 2_105_356);
}

// --- friends ---

#[tokio::test]
async fn add_friend_rejects_duplicate() {
    let db = shared();
    let uri = "/userProfile/v1/users/me/friendList/Hakoom";

    let resp = app_with_state(db.clone())
        .oneshot(request("POST", uri, r#"{"requestMessage":"hi"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        db.read().await.friend_requests.get("Hakoom"),
        Some(&Some("hi".to_string()))
    );

    let resp = app_with_state(db)
        .oneshot(request("POST", uri, "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["message"], "Friend request already sent");
}

#[tokio::test]
async fn acting_for_another_account_is_forbidden() {
    let resp = app()
        .oneshot(request("POST", "/userProfile/v1/users/Hakoom/friendList/Gamer42", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn remove_unknown_friend_fails() {
    let resp = app()
        .oneshot(request("DELETE", "/userProfile/v1/users/me/friendList/Hakoom", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["error"]["message"], "Not a friend");
}

// --- block ---

#[tokio::test]
async fn block_accepts_null_body_twice() {
    let db = shared();
    for _ in 0..2 {
        let resp = app_with_state(db.clone())
            .oneshot(request("POST", "/userProfile/v1/users/me/blockList/Gamer42", "null"))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NO_CONTENT);
        assert!(body_bytes(resp).await.is_empty());
    }
    assert!(db.read().await.blocked.contains("Gamer42"));
    assert_eq!(db.read().await.request_count, 2);
}

#[tokio::test]
async fn block_rejects_object_body() {
    let resp = app()
        .oneshot(request("POST", "/userProfile/v1/users/me/blockList/Gamer42", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unblock_without_block_fails() {
    let resp = app()
        .oneshot(request("DELETE", "/userProfile/v1/users/me/blockList/Gamer42", ""))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["error"]["message"], "User is not blocked");
}

// --- messaging ---

#[tokio::test]
async fn text_message_is_recorded() {
    let db = shared();
    let resp = app_with_state(db.clone())
        .oneshot(request(
            "POST",
            "/groupMessaging/v1/messageGroups",
            r#"{"to":["Hakoom"],"message":{"messageKind":1,"body":"gg"}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(body_json(resp).await["messageGroupId"].is_string());
    let db = db.read().await;
    assert_eq!(db.messages.len(), 1);
    assert_eq!(db.messages[0].body, "gg");
    assert_eq!(db.messages[0].from, "me");
}

#[tokio::test]
async fn non_text_message_is_rejected() {
    let resp = app()
        .oneshot(request(
            "POST",
            "/groupMessaging/v1/messageGroups",
            r#"{"to":["Hakoom"],"message":{"messageKind":1011,"body":""}}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- trophies ---

#[tokio::test]
async fn trophy_titles_are_paged() {
    let resp = app()
        .oneshot(get(
            "/trophy/v1/trophyTitles?fields=%40default&offset=10&limit=5&comparedUser=Hakoom",
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["totalResults"], 40);
    assert_eq!(body["offset"], 10);
    let titles = body["trophyTitles"].as_array().unwrap();
    assert_eq!(titles.len(), 5);
    assert_eq!(titles[0]["npCommunicationId"], "NPWR00010_00");
    assert_eq!(titles[0]["comparedUser"]["onlineId"], "Hakoom");
}

#[tokio::test]
async fn trophy_titles_require_compared_user() {
    let resp = app().oneshot(get("/trophy/v1/trophyTitles")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- activity ---

#[tokio::test]
async fn activity_honours_filters() {
    let resp = app()
        .oneshot(get("/activity/api/v1/users/Hakoom/feed/0?filters=TROPHY&filters=RATED"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let feed = body_json(resp).await["feed"].as_array().unwrap().clone();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0]["storyType"], "TROPHY");
}

#[tokio::test]
async fn activity_rejects_unknown_filter() {
    let resp = app()
        .oneshot(get("/activity/api/v1/users/Hakoom/feed/0?filters=NOPE"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- full friend lifecycle ---

#[tokio::test]
async fn friend_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // request
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("POST", "/userProfile/v1/users/me/friendList/quiet_one", "{}"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // profile reflects the pending request
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/userProfile/v1/users/quiet_one/profile2"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["profile"]["friendRelation"], "requested");

    // cancel
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(request("DELETE", "/userProfile/v1/users/me/friendList/quiet_one", ""))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    // back to no relation
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(get("/userProfile/v1/users/quiet_one/profile2"))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["profile"]["friendRelation"], "no");
}
