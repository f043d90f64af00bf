use super::*;
use crate::net::types::AuthFlow;
use futures::executor::block_on;

// =============================================================
// Envelope decoding
// =============================================================

#[test]
fn parse_function_response_returns_success_value() {
    let raw = r#"{"status":"success","value":{"id":"u1"},"logLines":[]}"#;
    assert_eq!(parse_function_response(raw), Ok(json!({"id": "u1"})));
}

#[test]
fn parse_function_response_success_without_value_is_null() {
    assert_eq!(parse_function_response(r#"{"status":"success"}"#), Ok(Value::Null));
}

#[test]
fn parse_function_response_surfaces_error_message() {
    let raw = r#"{"status":"error","errorMessage":"InvalidSecret"}"#;
    assert_eq!(parse_function_response(raw), Err(ApiError::Backend("InvalidSecret".to_owned())));
}

#[test]
fn parse_function_response_rejects_garbage() {
    assert!(matches!(parse_function_response("<html>502</html>"), Err(ApiError::Decode(_))));
}

#[test]
fn classify_failure_prefers_backend_message() {
    let body = r#"{"status":"error","errorMessage":"Invalid credentials"}"#;
    assert_eq!(classify_failure(400, body), ApiError::Backend("Invalid credentials".to_owned()));
    assert_eq!(classify_failure(502, "bad gateway"), ApiError::Status { status: 502 });
}

// =============================================================
// Payload mapping
// =============================================================

#[test]
fn parse_current_user_null_is_absent() {
    assert_eq!(parse_current_user(Value::Null), Ok(None));
}

#[test]
fn parse_current_user_object_is_present() {
    let identity = parse_current_user(json!({"id": "u1", "name": "Ann", "email": "a@x.com"}))
        .unwrap()
        .unwrap();
    assert_eq!(identity.id.as_deref(), Some("u1"));
}

#[test]
fn parse_current_user_rejects_non_object() {
    assert!(matches!(parse_current_user(json!("u1")), Err(ApiError::Decode(_))));
}

#[test]
fn sign_in_args_wrap_payload_under_params() {
    let request = CredentialRequest::password("a@x.com".to_owned(), "secret".to_owned(), AuthFlow::SignUp);
    assert_eq!(
        sign_in_args(&request),
        json!({
            "provider": "password",
            "params": {"email": "a@x.com", "password": "secret", "flow": "signUp"},
        })
    );
}

#[test]
fn parse_sign_in_tokens_reads_token_pair() {
    let tokens = parse_sign_in_tokens(&json!({"tokens": {"token": "jwt", "refreshToken": "r1"}})).unwrap();
    assert_eq!(tokens.token, "jwt");
    assert_eq!(tokens.refresh_token.as_deref(), Some("r1"));
    assert!(parse_sign_in_tokens(&json!({"tokens": null})).is_none());
    assert!(parse_sign_in_tokens(&Value::Null).is_none());
}

#[test]
fn function_call_serializes_json_format() {
    let call = FunctionCall::new(CURRENT_USER_QUERY, json!({}));
    assert_eq!(
        serde_json::to_value(&call).unwrap(),
        json!({"path": "user:getCurrentUser", "args": {}, "format": "json"})
    );
    assert_eq!(FunctionKind::Query.route(), "/api/query");
    assert_eq!(FunctionKind::Action.route(), "/api/action");
}

// =============================================================
// Client without a browser transport
// =============================================================

#[test]
fn misconfigured_client_reports_config_error() {
    let client = ServiceClient::new(Err(ConfigError::MissingEndpoint));
    assert_eq!(block_on(client.fetch_current_user()), Err(ApiError::Config(ConfigError::MissingEndpoint)));
}

#[test]
fn native_client_has_no_transport() {
    let config = ServiceConfig::parse(Some("https://backend.example"), None).unwrap();
    let client = ServiceClient::new(Ok(config));
    assert_eq!(block_on(client.fetch_current_user()), Err(ApiError::Unavailable));
    assert_eq!(block_on(client.sign_out()), Err(ApiError::Unavailable));
}
