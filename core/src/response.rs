//! In-band failure detection and typed result shaping.
//!
//! # Design
//! The PSN API does not use status codes to signal failure. A body with an
//! `error` key is a failure even on 200, and a body without one is not a
//! failure even on 4xx. `discriminate` is the single place that decides;
//! `interpret_json` and `interpret_ack` then shape the success side.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::ApiError;
use crate::http::HttpResponse;

/// An in-band failure reported by the API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub message: String,
    pub code: Option<i64>,
}

impl From<ApiFailure> for ApiError {
    fn from(f: ApiFailure) -> Self {
        ApiError::Domain {
            message: f.message,
            code: f.code,
        }
    }
}

/// Outcome of one API call before it is folded into a `Result`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Success(T),
    Failure(ApiFailure),
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, ApiError> {
        match self {
            ApiResponse::Success(value) => Ok(value),
            ApiResponse::Failure(failure) => Err(failure.into()),
        }
    }
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorShape,
}

/// Known shapes of the `error` value.
#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorShape {
    Detailed {
        #[serde(default)]
        message: Option<String>,
        #[serde(default)]
        code: Option<i64>,
    },
    Text(String),
    Other(Value),
}

/// Decide whether a payload is an in-band failure.
pub fn discriminate(payload: &Value) -> Option<ApiFailure> {
    if payload.get("error").is_none() {
        return None;
    }
    let shape = ErrorEnvelope::deserialize(payload).ok()?.error;
    Some(match shape {
        ErrorShape::Detailed { message, code } => ApiFailure {
            message: message.unwrap_or_else(|| "unknown error".to_string()),
            code,
        },
        ErrorShape::Text(message) => ApiFailure {
            message,
            code: None,
        },
        ErrorShape::Other(value) => ApiFailure {
            message: value.to_string(),
            code: None,
        },
    })
}

/// Interpret a JSON payload, optionally selecting a named sub-object first.
pub fn interpret_json<T: DeserializeOwned>(
    response: &HttpResponse,
    field: Option<&str>,
) -> Result<ApiResponse<T>, ApiError> {
    let payload = parse_payload(response)?;
    if let Some(failure) = discriminate(&payload) {
        return Ok(ApiResponse::Failure(failure));
    }
    let selected = match field {
        Some(name) => payload
            .get(name)
            .cloned()
            .ok_or_else(|| ApiError::DeserializationError(format!("missing field `{name}`")))?,
        None => payload,
    };
    serde_json::from_value(selected)
        .map(ApiResponse::Success)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))
}

/// Interpret a response that carries no result: only an `error` key fails.
pub fn interpret_ack(response: &HttpResponse) -> Result<ApiResponse<()>, ApiError> {
    if response.body.trim().is_empty() {
        return Ok(ApiResponse::Success(()));
    }
    let payload = parse_payload(response)?;
    Ok(match discriminate(&payload) {
        Some(failure) => ApiResponse::Failure(failure),
        None => ApiResponse::Success(()),
    })
}

fn parse_payload(response: &HttpResponse) -> Result<Value, ApiError> {
    serde_json::from_str(&response.body).map_err(|e| {
        if response.is_success() {
            ApiError::DeserializationError(e.to_string())
        } else {
            ApiError::HttpError {
                status: response.status,
                body: response.body.clone(),
            }
        }
    })
}
