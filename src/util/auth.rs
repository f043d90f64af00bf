//! Shared auth UI helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! The root component starts one auth session and mirrors its store into an
//! `RwSignal<AuthState>` context. Route components read that signal for
//! rendering and mount their redirect guard on the session store through
//! [`mount_route_guard`].

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use std::rc::Rc;
use std::time::Duration;

use leptos::prelude::*;

use crate::net::api::ServiceClient;
use crate::net::identity::PollingIdentityQuery;
use crate::state::auth::AuthState;
use crate::state::guard::{GuardHandle, GuardPolicy, Navigator, RouteGuard};
use crate::state::session::AuthSession;
use crate::state::store::Subscription;

/// Auth state was read from a scope with no provider above it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum AuthContextError {
    #[error("auth state read outside its provider; call provide_auth() in the root component first")]
    MissingProvider,
}

/// Everything the auth provider owns for the lifetime of the app.
pub struct AppSession {
    pub session: AuthSession,
    pub query: PollingIdentityQuery,
    pub client: ServiceClient,
    _bridge: Subscription,
}

/// Context handle to the [`AppSession`]; the session is dropped (and its
/// query subscription cancelled) when the providing owner is disposed.
pub type SessionHandle = StoredValue<AppSession, LocalStorage>;

/// Start the auth session and provide its contexts to the component tree.
pub fn provide_auth(client: ServiceClient, revalidate: Duration) -> RwSignal<AuthState> {
    let query = PollingIdentityQuery::new(client.clone(), revalidate);
    let session = AuthSession::start(&query);

    let auth = RwSignal::new(session.store().state());
    let bridge = session.store().subscribe(move |state| auth.set(state.clone()));

    let handle: SessionHandle = StoredValue::new_local(AppSession { session, query, client, _bridge: bridge });
    provide_context(auth);
    provide_context(handle);
    auth
}

/// Read the shared auth state.
///
/// # Errors
///
/// Returns [`AuthContextError::MissingProvider`] outside [`provide_auth`]'s scope.
pub fn try_use_auth() -> Result<RwSignal<AuthState>, AuthContextError> {
    use_context::<RwSignal<AuthState>>().ok_or(AuthContextError::MissingProvider)
}

/// Read the shared auth state.
///
/// # Panics
///
/// Panics outside [`provide_auth`]'s scope; that is an integration bug.
pub fn use_auth() -> RwSignal<AuthState> {
    match try_use_auth() {
        Ok(auth) => auth,
        Err(e) => panic!("{e}"),
    }
}

/// The app session handle.
///
/// # Panics
///
/// Panics outside [`provide_auth`]'s scope.
pub fn use_app_session() -> SessionHandle {
    match use_context::<SessionHandle>() {
        Some(handle) => handle,
        None => panic!("{}", AuthContextError::MissingProvider),
    }
}

/// Mount a guard for `policy` on the session store. It evaluates the current
/// state immediately and redirects through `navigator` until the handle drops.
///
/// # Panics
///
/// Panics outside [`provide_auth`]'s scope.
pub fn mount_route_guard(policy: GuardPolicy, navigator: Rc<dyn Navigator>) -> GuardHandle {
    let store = use_app_session().with_value(|s| s.session.store().clone());
    RouteGuard::new(policy).mount(&store, navigator)
}
