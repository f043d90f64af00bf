//! Shared, subscribable auth state.
//!
//! DESIGN
//! ======
//! One store per app session, fed by exactly one identity query subscription
//! (see `state::session`). Readers either take a snapshot with
//! [`AuthStore::state`] or register a listener; listeners run synchronously
//! after each change and all observe the same snapshot. A listener that
//! publishes a newer state mid-notification supersedes the rest of the older
//! round, so every listener's last observation is the state the store holds.
//!
//! Once the first resolution has settled, later `Pending` resolutions are
//! ignored, so an ordinary revalidation never flips readers back to loading.

#[cfg(test)]
#[path = "store_test.rs"]
mod store_test;

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::auth::AuthState;
use crate::net::identity::{Resolution, ResolutionSink};

type Listener = Rc<dyn Fn(&AuthState)>;

struct StoreInner {
    state: RefCell<AuthState>,
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_id: Cell<u64>,
    version: Cell<u64>,
}

/// Cheap-to-clone handle to the shared auth state.
#[derive(Clone)]
pub struct AuthStore {
    inner: Rc<StoreInner>,
}

impl Default for AuthStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthStore {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(StoreInner {
                state: RefCell::new(AuthState::Loading),
                listeners: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
                version: Cell::new(0),
            }),
        }
    }

    /// Latest known state.
    pub fn state(&self) -> AuthState {
        self.inner.state.borrow().clone()
    }

    /// Register `listener` for every subsequent state change.
    pub fn subscribe(&self, listener: impl Fn(&AuthState) + 'static) -> Subscription {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);
        self.inner.listeners.borrow_mut().push((id, Rc::new(listener)));
        Subscription { store: Rc::downgrade(&self.inner), id: Some(id) }
    }

    /// Fold one identity query resolution into the store. Normally driven by
    /// the session's query subscription.
    ///
    /// Returns `true` when the published state changed.
    pub fn apply(&self, resolution: &Resolution) -> bool {
        apply_resolution(&self.inner, resolution)
    }

    /// Sink that feeds resolutions into this store without keeping it alive.
    pub(crate) fn sink(&self) -> ResolutionSink {
        let weak: Weak<StoreInner> = Rc::downgrade(&self.inner);
        Rc::new(move |resolution| {
            if let Some(inner) = weak.upgrade() {
                apply_resolution(&inner, &resolution);
            }
        })
    }
}

fn apply_resolution(inner: &StoreInner, resolution: &Resolution) -> bool {
    let next = AuthState::from_resolution(resolution);
    let (snapshot, version) = {
        let mut state = inner.state.borrow_mut();
        if next.is_loading() && !state.is_loading() {
            return false;
        }
        if *state == next {
            return false;
        }
        leptos::logging::log!("auth state: {} -> {}", state.label(), next.label());
        *state = next;
        let version = inner.version.get() + 1;
        inner.version.set(version);
        (state.clone(), version)
    };

    // Listeners may subscribe or unsubscribe while being notified.
    let listeners: Vec<Listener> = inner.listeners.borrow().iter().map(|(_, l)| Rc::clone(l)).collect();
    for listener in listeners {
        // A re-entrant apply already notified everyone of a newer state.
        if inner.version.get() != version {
            break;
        }
        listener(&snapshot);
    }
    true
}

/// Registration returned by [`AuthStore::subscribe`]; unregisters on drop.
#[must_use = "dropping the subscription unregisters the listener"]
pub struct Subscription {
    store: Weak<StoreInner>,
    id: Option<u64>,
}

impl Subscription {
    pub fn unsubscribe(mut self) {
        self.detach();
    }

    fn detach(&mut self) {
        let Some(id) = self.id.take() else {
            return;
        };
        if let Some(inner) = self.store.upgrade() {
            inner.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}
