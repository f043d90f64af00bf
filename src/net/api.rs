//! Function-call client for the hosted auth/data service.
//!
//! Client-side (hydrate): real HTTP calls via `gloo-net`.
//! Server-side / native: every call fails with [`ApiError::Unavailable`], so
//! anything rendered outside the browser stays pending or fails closed.
//!
//! ERROR HANDLING
//! ==============
//! Callers get `Result` outputs instead of panics; the auth core converts
//! each failure into state at the boundary that issued the call.

#[cfg(test)]
#[path = "api_test.rs"]
mod api_test;

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::types::{CredentialRequest, RemoteIdentity, SessionTokens};
use crate::config::{ConfigError, ServiceConfig};
use crate::util::token_store;

pub const CURRENT_USER_QUERY: &str = "user:getCurrentUser";
pub const SIGN_IN_ACTION: &str = "auth:signIn";
pub const SIGN_OUT_ACTION: &str = "auth:signOut";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by service calls.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The client was built without a usable endpoint.
    #[error("backend not configured: {0}")]
    Config(ConfigError),

    /// The HTTP request could not be sent or read.
    #[error("request failed: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status and no message.
    #[error("backend returned status {status}")]
    Status { status: u16 },

    /// The called function reported an error.
    #[error("{0}")]
    Backend(String),

    /// The response body did not match the function-call envelope.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// No HTTP transport outside the browser.
    #[error("backend calls are only available in the browser")]
    Unavailable,
}

// =============================================================================
// WIRE ENVELOPE
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FunctionKind {
    Query,
    Action,
}

impl FunctionKind {
    pub fn route(self) -> &'static str {
        match self {
            Self::Query => "/api/query",
            Self::Action => "/api/action",
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FunctionCall<'a> {
    pub path: &'a str,
    pub args: Value,
    pub format: &'static str,
}

impl<'a> FunctionCall<'a> {
    pub fn new(path: &'a str, args: Value) -> Self {
        Self { path, args, format: "json" }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum FunctionResponse {
    Success {
        #[serde(default)]
        value: Value,
    },
    Error {
        #[serde(rename = "errorMessage", default)]
        error_message: String,
    },
}

/// Decode a function-call response body into its success value.
pub fn parse_function_response(raw: &str) -> Result<Value, ApiError> {
    match serde_json::from_str::<FunctionResponse>(raw) {
        Ok(FunctionResponse::Success { value }) => Ok(value),
        Ok(FunctionResponse::Error { error_message }) if error_message.is_empty() => {
            Err(ApiError::Backend("request failed".to_owned()))
        }
        Ok(FunctionResponse::Error { error_message }) => Err(ApiError::Backend(error_message)),
        Err(e) => Err(ApiError::Decode(e.to_string())),
    }
}

/// Map a non-success HTTP response to an error, preferring the function's
/// own message when the body carries one.
pub fn classify_failure(status: u16, body: &str) -> ApiError {
    match parse_function_response(body) {
        Err(ApiError::Backend(message)) => ApiError::Backend(message),
        _ => ApiError::Status { status },
    }
}

/// `null` means no caller identity; anything else must be an identity object.
pub fn parse_current_user(value: Value) -> Result<Option<RemoteIdentity>, ApiError> {
    if value.is_null() {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some).map_err(|e| ApiError::Decode(e.to_string()))
}

pub fn sign_in_args(request: &CredentialRequest) -> Value {
    json!({
        "provider": request.provider,
        "params": request.payload,
    })
}

/// Tokens from a completed sign-in; `None` when the provider needs another step.
pub fn parse_sign_in_tokens(value: &Value) -> Option<SessionTokens> {
    let tokens = value.get("tokens").filter(|t| !t.is_null())?;
    serde_json::from_value(tokens.clone()).ok()
}

// =============================================================================
// CLIENT
// =============================================================================

/// Cheap-to-clone handle for calling the backend deployment.
#[derive(Clone, Debug)]
pub struct ServiceClient {
    config: Arc<Result<ServiceConfig, ConfigError>>,
}

impl ServiceClient {
    pub fn new(config: Result<ServiceConfig, ConfigError>) -> Self {
        Self { config: Arc::new(config) }
    }

    /// The validated config.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Config`] if the client was built from a bad config.
    pub fn config(&self) -> Result<&ServiceConfig, ApiError> {
        (*self.config).as_ref().map_err(|e| ApiError::Config(e.clone()))
    }

    /// Fetch the identity of the current caller.
    ///
    /// # Errors
    ///
    /// Returns an error if the call fails or the payload is not an identity.
    pub async fn fetch_current_user(&self) -> Result<Option<RemoteIdentity>, ApiError> {
        let value = self.call(FunctionKind::Query, CURRENT_USER_QUERY, json!({})).await?;
        parse_current_user(value)
    }

    /// Exchange credentials for a session and persist the returned tokens.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider rejects the credentials or the call fails.
    pub async fn sign_in(&self, request: &CredentialRequest) -> Result<(), ApiError> {
        let value = self.call(FunctionKind::Action, SIGN_IN_ACTION, sign_in_args(request)).await?;
        match parse_sign_in_tokens(&value) {
            Some(tokens) => token_store::save_tokens(&tokens),
            None => leptos::logging::log!("sign-in completed without session tokens"),
        }
        Ok(())
    }

    /// End the backend session. Local tokens are dropped even if the call fails.
    ///
    /// # Errors
    ///
    /// Returns an error if the sign-out call fails.
    pub async fn sign_out(&self) -> Result<(), ApiError> {
        let result = self.call(FunctionKind::Action, SIGN_OUT_ACTION, json!({})).await.map(|_| ());
        token_store::clear_tokens();
        result
    }

    async fn call(&self, kind: FunctionKind, path: &str, args: Value) -> Result<Value, ApiError> {
        let url = self.config()?.url(kind.route());
        let token = token_store::load_token();
        let raw = send_function_call(&url, token.as_deref(), &FunctionCall::new(path, args)).await?;
        parse_function_response(&raw)
    }
}

#[cfg(feature = "hydrate")]
async fn send_function_call(url: &str, token: Option<&str>, body: &FunctionCall<'_>) -> Result<String, ApiError> {
    let mut builder = gloo_net::http::Request::post(url);
    if let Some(token) = token {
        builder = builder.header("Authorization", &format!("Bearer {token}"));
    }
    let resp = builder
        .json(body)
        .map_err(|e| ApiError::Transport(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    let ok = resp.ok();
    let status = resp.status();
    let text = resp.text().await.map_err(|e| ApiError::Transport(e.to_string()))?;
    if !ok {
        return Err(classify_failure(status, &text));
    }
    Ok(text)
}

#[cfg(not(feature = "hydrate"))]
#[allow(clippy::unused_async)]
async fn send_function_call(url: &str, token: Option<&str>, body: &FunctionCall<'_>) -> Result<String, ApiError> {
    let _ = (url, token, body);
    Err(ApiError::Unavailable)
}
