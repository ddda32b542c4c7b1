//! HTTP API Client
//!
//! Functions for communicating with the school activities REST API.

use gloo_net::http::{Request, Response};
use thiserror::Error;

use crate::state::global::{Activity, ActivityDetails, Role};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://localhost:8000";

/// Local storage key for the API base URL override
const API_URL_KEY: &str = "activities_api_url";

/// Local storage key for the bearer token
const TOKEN_KEY: &str = "auth_token";

fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|window| window.local_storage().ok().flatten())
}

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = local_storage()
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    // Normalize: remove trailing slash
    url.trim_end_matches('/').to_string()
}

/// Set the API base URL in local storage
pub fn set_api_base(url: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(API_URL_KEY, url);
    }
}

/// Read the persisted bearer token, if any
pub fn get_token() -> Option<String> {
    local_storage().and_then(|storage| storage.get_item(TOKEN_KEY).ok().flatten())
}

/// Persist the bearer token across reloads
pub fn set_token(token: &str) {
    if let Some(storage) = local_storage() {
        let _ = storage.set_item(TOKEN_KEY, token);
    }
}

/// Remove the persisted bearer token
pub fn clear_token() {
    if let Some(storage) = local_storage() {
        let _ = storage.remove_item(TOKEN_KEY);
    }
}

// ============ Errors ============

/// Errors surfaced by API calls. Each handler maps these to its own
/// user-facing text; nothing propagates past the call site.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// 401: the token is invalid or expired
    #[error("session expired")]
    Unauthorized,

    /// Non-2xx with a server-provided `{detail}` body (or a fallback)
    #[error("{0}")]
    Rejected(String),

    /// Transport-level failure; no response was received
    #[error("network error: {0}")]
    Network(String),

    /// 2xx response whose body could not be parsed
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Server's `{detail}` text, or the fallback when the body has none
async fn detail_or(response: Response, fallback: &str) -> String {
    response
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.detail)
        .unwrap_or_else(|| fallback.to_string())
}

/// Map a non-2xx response on an authenticated call: 401 always means the
/// session is gone; anything else carries the server's detail text.
/// The unauthenticated auth endpoints do not route through here, since a
/// 401 there is a credential failure, not an expired session.
async fn reject(response: Response, fallback: &str) -> ApiError {
    if response.status() == 401 {
        return ApiError::Unauthorized;
    }
    ApiError::Rejected(detail_or(response, fallback).await)
}

// ============ Response Types ============

#[derive(Debug, Clone, serde::Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Identity {
    pub email: String,
    pub role: Role,
}

#[derive(Debug, serde::Deserialize)]
struct MutationResponse {
    message: String,
}

// ============ API Functions ============

/// Fetch all activities, in server-returned order. Requires a token.
pub async fn fetch_activities(token: &str) -> Result<Vec<Activity>, ApiError> {
    let response = Request::get(&format!("{}/activities", get_api_base()))
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(reject(response, "Failed to load activities").await);
    }

    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    parse_activities(&body).map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Parse the `/activities` body: a JSON object mapping activity name to
/// details. Insertion order of the object is preserved and becomes the
/// render order.
pub fn parse_activities(body: &str) -> Result<Vec<Activity>, serde_json::Error> {
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(body)?;
    map.into_iter()
        .map(|(name, value)| {
            let details: ActivityDetails = serde_json::from_value(value)?;
            Ok(Activity { name, details })
        })
        .collect()
}

/// Authenticate with email/password
pub async fn login(email: &str, password: &str) -> Result<LoginResponse, ApiError> {
    #[derive(serde::Serialize)]
    struct LoginRequest<'a> {
        email: &'a str,
        password: &'a str,
    }

    let response = Request::post(&format!("{}/auth/login", get_api_base()))
        .json(&LoginRequest { email, password })
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        // No bearer credential was presented, so a 401 here means bad
        // credentials, not an expired session.
        return Err(ApiError::Rejected(detail_or(response, "Login failed").await));
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Create a new account. The role is always `student`; elevated accounts
/// are provisioned out of band.
pub async fn register(email: &str, password: &str) -> Result<(), ApiError> {
    #[derive(serde::Serialize)]
    struct RegisterRequest<'a> {
        email: &'a str,
        password: &'a str,
        role: &'a str,
    }

    let response = Request::post(&format!("{}/auth/register", get_api_base()))
        .json(&RegisterRequest { email, password, role: "student" })
        .map_err(|e| ApiError::Network(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Rejected(detail_or(response, "Registration failed").await));
    }

    Ok(())
}

/// Validate the token and fetch the identity behind it
pub async fn me(token: &str) -> Result<Identity, ApiError> {
    let response = Request::get(&format!("{}/auth/me", get_api_base()))
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(reject(response, "Session invalid").await);
    }

    response
        .json()
        .await
        .map_err(|e| ApiError::Malformed(e.to_string()))
}

/// Invalidate the session server-side. Best effort: the caller logs
/// failures and proceeds with the local logout regardless.
pub async fn logout(token: &str) -> Result<(), ApiError> {
    Request::post(&format!("{}/auth/logout", get_api_base()))
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;
    Ok(())
}

/// Enroll a participant in an activity. Returns the server's message.
pub async fn signup(token: &str, activity: &str, email: &str) -> Result<String, ApiError> {
    let url = format!(
        "{}/activities/{}/signup?email={}",
        get_api_base(),
        urlencoding::encode(activity),
        urlencoding::encode(email),
    );

    let response = Request::post(&url)
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(reject(response, "An error occurred").await);
    }

    let result: MutationResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Malformed(e.to_string()))?;

    Ok(result.message)
}

/// Remove a participant from an activity. Returns the server's message.
pub async fn unregister(token: &str, activity: &str, email: &str) -> Result<String, ApiError> {
    let url = format!(
        "{}/activities/{}/unregister?email={}",
        get_api_base(),
        urlencoding::encode(activity),
        urlencoding::encode(email),
    );

    let response = Request::delete(&url)
        .header("Authorization", &format!("Bearer {}", token))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(reject(response, "An error occurred").await);
    }

    let result: MutationResponse = response
        .json()
        .await
        .map_err(|e| ApiError::Malformed(e.to_string()))?;

    Ok(result.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_activities_preserves_server_order() {
        // Keys chosen so lexicographic order differs from insertion order
        let body = r#"{
            "Zeta Club": {
                "description": "Last letter first",
                "schedule": "Mondays",
                "max_participants": 5,
                "participants": ["z@x.com"]
            },
            "Alpha Club": {
                "description": "First letter last",
                "schedule": "Tuesdays",
                "max_participants": 10,
                "participants": []
            }
        }"#;

        let activities = parse_activities(body).unwrap();
        assert_eq!(activities.len(), 2);
        assert_eq!(activities[0].name, "Zeta Club");
        assert_eq!(activities[1].name, "Alpha Club");
        assert_eq!(activities[0].spots_left(), 4);
        assert_eq!(activities[1].spots_left(), 10);
    }

    #[test]
    fn test_parse_activities_participant_order() {
        let body = r#"{
            "Chess Club": {
                "description": "Chess",
                "schedule": "Fridays",
                "max_participants": 12,
                "participants": ["b@x.com", "a@x.com", "c@x.com"]
            }
        }"#;

        let activities = parse_activities(body).unwrap();
        assert_eq!(
            activities[0].details.participants,
            vec!["b@x.com", "a@x.com", "c@x.com"]
        );
    }

    #[test]
    fn test_parse_activities_missing_participants_defaults_empty() {
        let body = r#"{
            "Art Club": {
                "description": "Painting",
                "schedule": "Thursdays",
                "max_participants": 15
            }
        }"#;

        let activities = parse_activities(body).unwrap();
        assert!(activities[0].details.participants.is_empty());
        assert_eq!(activities[0].spots_left(), 15);
    }

    #[test]
    fn test_parse_activities_rejects_non_object() {
        assert!(parse_activities("[1, 2, 3]").is_err());
        assert!(parse_activities("not json").is_err());
    }

    #[test]
    fn test_error_body_detail_optional() {
        let body: ErrorBody = serde_json::from_str(r#"{"detail": "Already signed up"}"#).unwrap();
        assert_eq!(body.detail.as_deref(), Some("Already signed up"));

        let body: ErrorBody = serde_json::from_str(r#"{}"#).unwrap();
        assert!(body.detail.is_none());
    }
}
