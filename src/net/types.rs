//! Wire DTOs for the hosted auth/data service boundary.
//!
//! DESIGN
//! ======
//! Fields the service may omit are `Option` here so decoding never fails on a
//! partial identity; the auth core decides how to default them.

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Provider name the password credential exchange is registered under.
pub const PASSWORD_PROVIDER: &str = "password";

/// Identity object returned by the current-user query.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteIdentity {
    /// Stable caller id. Older deployments return the raw token `subject`.
    #[serde(default, alias = "subject")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// Which side of the password provider a submission targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AuthFlow {
    #[default]
    SignIn,
    SignUp,
}

impl AuthFlow {
    /// Wire spelling (`"signIn"` / `"signUp"`).
    pub fn as_str(self) -> &'static str {
        match self {
            Self::SignIn => "signIn",
            Self::SignUp => "signUp",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }
}

/// Credential payload sent to the password provider.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct CredentialPayload {
    pub email: String,
    pub password: String,
    pub flow: AuthFlow,
}

impl fmt::Debug for CredentialPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPayload")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("flow", &self.flow)
            .finish()
    }
}

/// One credential exchange: `(provider, payload)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CredentialRequest {
    pub provider: &'static str,
    pub payload: CredentialPayload,
}

impl CredentialRequest {
    pub fn password(email: String, password: String, flow: AuthFlow) -> Self {
        Self { provider: PASSWORD_PROVIDER, payload: CredentialPayload { email, password, flow } }
    }
}

/// Session tokens handed back by a completed sign-in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionTokens {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}
