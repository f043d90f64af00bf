use std::cell::{Cell, RefCell};
use std::rc::Rc;

use super::*;
use crate::net::identity::{Resolution, ResolutionSink};
use crate::net::types::RemoteIdentity;
use crate::state::auth::AuthState;

/// Identity query driven by the test; counts subscriptions.
#[derive(Default)]
struct ManualQuery {
    sink: Rc<RefCell<Option<ResolutionSink>>>,
    subscribes: Cell<usize>,
}

impl ManualQuery {
    fn resolve(&self, resolution: Resolution) {
        let sink = self.sink.borrow().clone();
        if let Some(sink) = sink {
            sink(resolution);
        }
    }

    fn is_subscribed(&self) -> bool {
        self.sink.borrow().is_some()
    }
}

impl IdentityQuery for ManualQuery {
    fn subscribe(&self, sink: ResolutionSink) -> QuerySubscription {
        self.subscribes.set(self.subscribes.get() + 1);
        *self.sink.borrow_mut() = Some(sink);
        let slot = Rc::clone(&self.sink);
        QuerySubscription::new(move || *slot.borrow_mut() = None)
    }
}

fn present(id: &str) -> Resolution {
    Resolution::Present(RemoteIdentity { id: Some(id.to_owned()), name: None, email: None })
}

#[test]
fn start_subscribes_exactly_once() {
    let query = ManualQuery::default();
    let session = AuthSession::start(&query);
    let _a = session.store().subscribe(|_| {});
    let _b = session.store().subscribe(|_| {});
    let _c = session.store().clone();
    assert_eq!(query.subscribes.get(), 1);
    assert!(session.subscription.is_some());
}

#[test]
fn store_starts_loading_until_query_resolves() {
    let query = ManualQuery::default();
    let session = AuthSession::start(&query);
    assert_eq!(session.store().state(), AuthState::Loading);

    query.resolve(Resolution::Pending);
    assert_eq!(session.store().state(), AuthState::Loading);

    query.resolve(present("u1"));
    assert!(session.store().state().is_authenticated());
}

#[test]
fn close_unsubscribes_and_freezes_state() {
    let query = ManualQuery::default();
    let mut session = AuthSession::start(&query);
    query.resolve(present("u1"));

    session.close();
    assert!(session.subscription.is_none());
    assert!(!query.is_subscribed());
    assert!(session.store().state().is_authenticated());

    session.close();
    assert!(session.subscription.is_none());
}

#[test]
fn drop_tears_down_subscription() {
    let query = ManualQuery::default();
    let session = AuthSession::start(&query);
    assert!(query.is_subscribed());
    drop(session);
    assert!(!query.is_subscribed());
}

#[test]
fn clones_of_store_share_session_state() {
    let query = ManualQuery::default();
    let session = AuthSession::start(&query);
    let reader = session.store().clone();
    query.resolve(Resolution::Absent);
    assert_eq!(reader.state(), AuthState::Unauthenticated);
}
