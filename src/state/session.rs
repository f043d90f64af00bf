//! App-session owner for the auth store and its identity subscription.
//!
//! SYSTEM CONTEXT
//! ==============
//! Constructed once by the root component and handed down through context.
//! Everything that needs auth state reads the session's store; nothing else
//! subscribes to the identity query.

#[cfg(test)]
#[path = "session_test.rs"]
mod session_test;

use super::store::AuthStore;
use crate::net::identity::{IdentityQuery, QuerySubscription};

pub struct AuthSession {
    store: AuthStore,
    subscription: Option<QuerySubscription>,
}

impl AuthSession {
    /// Create the store and bind it to `query` with a single subscription.
    pub fn start<Q: IdentityQuery + ?Sized>(query: &Q) -> Self {
        let store = AuthStore::new();
        let subscription = query.subscribe(store.sink());
        leptos::logging::log!("auth session started");
        Self { store, subscription: Some(subscription) }
    }

    pub fn store(&self) -> &AuthStore {
        &self.store
    }

    /// Unsubscribe from the identity query. The store keeps its last state.
    pub fn close(&mut self) {
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
            leptos::logging::log!("auth session closed");
        }
    }
}

impl Drop for AuthSession {
    fn drop(&mut self) {
        self.close();
    }
}
