//! Login form state and the single-flight credential submission.
//!
//! SYSTEM CONTEXT
//! ==============
//! Owned by the login page only. A successful exchange does not touch auth
//! state directly: the identity query picks up the new session, the store
//! flips to authenticated, and the login page guard redirects away.
//!
//! ERROR HANDLING
//! ==============
//! Exchange failures land in [`LoginForm::error`] for display and are logged;
//! nothing is raised past [`submit`].

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use std::cell::RefCell;
use std::future::Future;

use crate::net::api::{ApiError, ServiceClient};
use crate::net::types::{AuthFlow, CredentialRequest};

pub const MISSING_FIELDS_MESSAGE: &str = "Enter both email and password.";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitPhase {
    #[default]
    Idle,
    Submitting,
}

/// Why a submit attempt did not start an exchange.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitRejected {
    /// Another exchange is still outstanding.
    InFlight,
    /// Email or password is empty.
    MissingFields,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub mode: AuthFlow,
    pub phase: SubmitPhase,
    /// User-visible message from the last failed attempt.
    pub error: Option<String>,
}

impl LoginForm {
    pub fn is_submitting(&self) -> bool {
        self.phase == SubmitPhase::Submitting
    }

    pub fn set_email(&mut self, email: impl Into<String>) {
        self.email = email.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    /// Switch between sign-in and sign-up. Ignored while submitting.
    ///
    /// Returns `true` if the toggle was applied.
    pub fn set_mode(&mut self, mode: AuthFlow) -> bool {
        if self.is_submitting() {
            return false;
        }
        self.mode = mode;
        true
    }

    /// Validate and latch the current fields into a credential request.
    ///
    /// # Errors
    ///
    /// Returns [`SubmitRejected`] if an exchange is outstanding or a field is empty.
    pub fn begin_submit(&mut self) -> Result<CredentialRequest, SubmitRejected> {
        if self.is_submitting() {
            return Err(SubmitRejected::InFlight);
        }
        let email = self.email.trim();
        if email.is_empty() || self.password.is_empty() {
            self.error = Some(MISSING_FIELDS_MESSAGE.to_owned());
            return Err(SubmitRejected::MissingFields);
        }
        let request = CredentialRequest::password(email.to_owned(), self.password.clone(), self.mode);
        self.phase = SubmitPhase::Submitting;
        self.error = None;
        Ok(request)
    }

    /// Record the exchange outcome and return to idle either way.
    pub fn settle(&mut self, result: &Result<(), ApiError>) {
        self.phase = SubmitPhase::Idle;
        match result {
            Ok(()) => self.error = None,
            Err(e) => self.error = Some(failure_message(self.mode, e)),
        }
    }
}

fn failure_message(mode: AuthFlow, error: &ApiError) -> String {
    let action = match mode {
        AuthFlow::SignIn => "Sign in",
        AuthFlow::SignUp => "Sign up",
    };
    format!("{action} failed: {error}")
}

/// Capability that trades credentials for a backend session.
pub trait CredentialExchange {
    fn exchange(&self, request: CredentialRequest) -> impl Future<Output = Result<(), ApiError>>;
}

impl CredentialExchange for ServiceClient {
    fn exchange(&self, request: CredentialRequest) -> impl Future<Output = Result<(), ApiError>> {
        let client = self.clone();
        async move { client.sign_in(&request).await }
    }
}

/// Somewhere a [`LoginForm`] lives. `None` means the form is gone (the page
/// was navigated away from) and the update was dropped.
pub trait FormSlot {
    fn update_form<R>(&self, f: impl FnOnce(&mut LoginForm) -> R) -> Option<R>;
}

impl FormSlot for RefCell<LoginForm> {
    fn update_form<R>(&self, f: impl FnOnce(&mut LoginForm) -> R) -> Option<R> {
        Some(f(&mut self.borrow_mut()))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Exchange succeeded; the identity query will pick up the session.
    Accepted,
    /// Exchange ran and failed; the form carries the message.
    Failed(ApiError),
    /// No exchange was started.
    Rejected(SubmitRejected),
    /// The form disappeared before or during the exchange.
    Detached,
}

/// Run one submission: validate, exchange, settle.
pub async fn submit<S, E>(slot: &S, exchange: &E) -> SubmitOutcome
where
    S: FormSlot,
    E: CredentialExchange,
{
    let request = match slot.update_form(LoginForm::begin_submit) {
        None => return SubmitOutcome::Detached,
        Some(Err(rejected)) => return SubmitOutcome::Rejected(rejected),
        Some(Ok(request)) => request,
    };
    let flow = request.payload.flow;

    let result = exchange.exchange(request).await;
    if let Err(e) = &result {
        leptos::logging::warn!("{} failed: {e}", flow.as_str());
    }
    if slot.update_form(|form| form.settle(&result)).is_none() {
        return SubmitOutcome::Detached;
    }
    match result {
        Ok(()) => SubmitOutcome::Accepted,
        Err(e) => SubmitOutcome::Failed(e),
    }
}
