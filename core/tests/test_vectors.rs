//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results or in-band error messages. Comparing parsed
//! JSON (not raw strings) avoids false negatives from field ordering.

use std::sync::Arc;

use psn_core::{
    ActivityResponse, ApiError, CompareTrophiesResponse, Endpoints, HttpMethod, HttpRequest,
    HttpResponse, Profile, PsnClient, StaticCredentials, TrophyPage,
};

const BASE_URL: &str = "http://localhost:3000";

fn client() -> PsnClient {
    PsnClient::new(
        Endpoints::with_base(BASE_URL).unwrap(),
        Arc::new(StaticCredentials::new("vector-token", "me")),
    )
}

/// Parse the method string from test vectors into `HttpMethod`.
fn parse_method(s: &str) -> HttpMethod {
    match s {
        "GET" => HttpMethod::Get,
        "POST" => HttpMethod::Post,
        "PUT" => HttpMethod::Put,
        "DELETE" => HttpMethod::Delete,
        other => panic!("unknown method: {other}"),
    }
}

fn simulated(case: &serde_json::Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

fn expected_headers(expected_req: &serde_json::Value) -> Vec<(String, String)> {
    expected_req["headers"]
        .as_array()
        .unwrap()
        .iter()
        .map(|h| {
            let arr = h.as_array().unwrap();
            (arr[0].as_str().unwrap().to_string(), arr[1].as_str().unwrap().to_string())
        })
        .collect()
}

/// Method, path (exact or prefix) and, when given, headers.
fn check_request(name: &str, req: &HttpRequest, expected_req: &serde_json::Value) {
    assert_eq!(req.method, parse_method(expected_req["method"].as_str().unwrap()), "{name}: method");
    if let Some(path) = expected_req["path"].as_str() {
        assert_eq!(req.url, format!("{BASE_URL}{path}"), "{name}: url");
    }
    if let Some(prefix) = expected_req["path_prefix"].as_str() {
        assert!(req.url.starts_with(&format!("{BASE_URL}{prefix}")), "{name}: url prefix");
    }
    if expected_req.get("headers").is_some() {
        assert_eq!(req.headers, expected_headers(expected_req), "{name}: headers");
    }
}

/// A JSON `body` is compared structurally; `null` means no body.
fn check_json_body(name: &str, req: &HttpRequest, expected_req: &serde_json::Value) {
    if expected_req["body"].is_null() {
        assert!(req.body.is_none(), "{name}: body should be None");
    } else {
        let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
        assert_eq!(body, expected_req["body"], "{name}: body");
    }
}

fn check_error<T: std::fmt::Debug>(name: &str, result: Result<T, ApiError>, expected: &str) {
    match result {
        Err(ApiError::Domain { message, .. }) => assert_eq!(message, expected, "{name}: error message"),
        other => panic!("{name}: expected domain error, got {other:?}"),
    }
}

fn load(raw: &str) -> Vec<serde_json::Value> {
    let vectors: serde_json::Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

// ---------------------------------------------------------------------------
// Profile
// ---------------------------------------------------------------------------

#[test]
fn profile_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/profile.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = c.build_fetch_profile(id).unwrap();
        check_request(name, &req, &case["expected_request"]);
        check_json_body(name, &req, &case["expected_request"]);

        let result = c.parse_profile(simulated(&case));
        if let Some(expected_error) = case["expected_error"].as_str() {
            check_error(name, result, expected_error);
        } else {
            let expected: Profile = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Friends
// ---------------------------------------------------------------------------

#[test]
fn friend_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/friend.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = match case["method_under_test"].as_str().unwrap() {
            "add_friend" => c.build_add_friend(id, case["input_message"].as_str()).unwrap(),
            "remove_friend" => c.build_remove_friend(id).unwrap(),
            other => panic!("{name}: unknown method_under_test: {other}"),
        };
        check_request(name, &req, &case["expected_request"]);
        check_json_body(name, &req, &case["expected_request"]);

        let result = c.parse_ack(simulated(&case));
        match case["expected_error"].as_str() {
            Some(expected_error) => check_error(name, result, expected_error),
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}

// ---------------------------------------------------------------------------
// Block
// ---------------------------------------------------------------------------

#[test]
fn block_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/block.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = match case["method_under_test"].as_str().unwrap() {
            "block" => c.build_block(id).unwrap(),
            "unblock" => c.build_unblock(id).unwrap(),
            other => panic!("{name}: unknown method_under_test: {other}"),
        };
        check_request(name, &req, &case["expected_request"]);
        // The literal body matters here: `null`, not an absent body.
        assert_eq!(
            req.body.as_deref(),
            case["expected_request"]["raw_body"].as_str(),
            "{name}: raw body"
        );

        let result = c.parse_ack(simulated(&case));
        match case["expected_error"].as_str() {
            Some(expected_error) => check_error(name, result, expected_error),
            None => assert!(result.is_ok(), "{name}: expected success"),
        }
    }
}

// ---------------------------------------------------------------------------
// Trophies
// ---------------------------------------------------------------------------

#[test]
fn trophies_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/trophies.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();
        let page = TrophyPage {
            offset: case["input_offset"].as_u64().unwrap() as u32,
            limit: case["input_limit"].as_u64().unwrap() as u32,
        };

        let req = c.build_compare_trophies(id, page).unwrap();
        check_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body should be None");

        let result = c.parse_compare_trophies(simulated(&case));
        if let Some(expected_error) = case["expected_error"].as_str() {
            check_error(name, result, expected_error);
        } else {
            let expected: CompareTrophiesResponse =
                serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

// ---------------------------------------------------------------------------
// Activity
// ---------------------------------------------------------------------------

#[test]
fn activity_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/activity.json")) {
        let name = case["name"].as_str().unwrap();
        let id = case["input_id"].as_str().unwrap();

        let req = c.build_activity(id).unwrap();
        check_request(name, &req, &case["expected_request"]);
        assert!(req.body.is_none(), "{name}: body should be None");

        let result = c.parse_activity(simulated(&case));
        if let Some(expected_error) = case["expected_error"].as_str() {
            check_error(name, result, expected_error);
        } else {
            let expected: ActivityResponse = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}
