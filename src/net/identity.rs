//! Revalidating "who is the current caller" query.
//!
//! SYSTEM CONTEXT
//! ==============
//! The auth session subscribes exactly once per app session. Every fetch
//! result is delivered to that subscriber as a [`Resolution`]; the store
//! decides what the resolution means for auth state.
//!
//! ERROR HANDLING
//! ==============
//! Fetch failures are delivered as [`Resolution::Failed`], never raised.

#[cfg(test)]
#[path = "identity_test.rs"]
mod identity_test;

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::time::Duration;

use super::api::ServiceClient;
use super::types::RemoteIdentity;

/// One outcome of the identity query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Not resolved yet.
    Pending,
    /// Resolved: no caller identity.
    Absent,
    /// Resolved: caller identity.
    Present(RemoteIdentity),
    /// The query errored.
    Failed(String),
}

/// Callback receiving each resolution in arrival order.
pub type ResolutionSink = Rc<dyn Fn(Resolution)>;

/// Source of identity resolutions.
pub trait IdentityQuery {
    /// Start delivering resolutions to `sink` until the returned subscription
    /// is cancelled or dropped.
    fn subscribe(&self, sink: ResolutionSink) -> QuerySubscription;
}

/// Live subscription to an [`IdentityQuery`]; cancels on drop.
#[must_use = "dropping the subscription cancels it"]
pub struct QuerySubscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl QuerySubscription {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self { cancel: Some(Box::new(cancel)) }
    }

    pub fn cancel(mut self) {
        self.run_cancel();
    }

    fn run_cancel(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for QuerySubscription {
    fn drop(&mut self) {
        self.run_cancel();
    }
}

impl std::fmt::Debug for QuerySubscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuerySubscription").field("active", &self.cancel.is_some()).finish()
    }
}

/// Run the current-user query once and convert the outcome.
pub async fn resolve(client: &ServiceClient) -> Resolution {
    match client.fetch_current_user().await {
        Ok(Some(identity)) => Resolution::Present(identity),
        Ok(None) => Resolution::Absent,
        Err(e) => {
            leptos::logging::warn!("identity query failed: {e}");
            Resolution::Failed(e.to_string())
        }
    }
}

struct PollShared {
    sink: RefCell<Option<ResolutionSink>>,
    epoch: Cell<u64>,
    issued: Cell<u64>,
    delivered: Cell<u64>,
}

#[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
impl PollShared {
    /// Sequence number for a fetch about to start.
    fn begin_fetch(&self) -> u64 {
        let seq = self.issued.get() + 1;
        self.issued.set(seq);
        seq
    }

    fn is_live(&self, epoch: u64) -> bool {
        self.epoch.get() == epoch && self.sink.borrow().is_some()
    }

    /// Deliver only if the subscription that started the fetch is still live
    /// and no later-started fetch has been delivered yet.
    fn deliver(&self, epoch: u64, seq: u64, resolution: Resolution) -> bool {
        if !self.is_live(epoch) || seq <= self.delivered.get() {
            return false;
        }
        self.delivered.set(seq);
        let sink = self.sink.borrow().clone();
        match sink {
            Some(sink) => {
                sink(resolution);
                true
            }
            None => false,
        }
    }
}

/// Identity query backed by the service client, revalidated on an interval
/// and on demand via [`PollingIdentityQuery::refresh`].
#[derive(Clone)]
pub struct PollingIdentityQuery {
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    client: ServiceClient,
    #[cfg_attr(not(feature = "hydrate"), allow(dead_code))]
    interval: Duration,
    shared: Rc<PollShared>,
}

impl PollingIdentityQuery {
    pub fn new(client: ServiceClient, interval: Duration) -> Self {
        Self {
            client,
            interval,
            shared: Rc::new(PollShared {
                sink: RefCell::new(None),
                epoch: Cell::new(0),
                issued: Cell::new(0),
                delivered: Cell::new(0),
            }),
        }
    }

    pub fn is_subscribed(&self) -> bool {
        self.shared.sink.borrow().is_some()
    }

    /// Revalidate now, e.g. right after a sign-in or sign-out.
    pub fn refresh(&self) {
        if !self.is_subscribed() {
            return;
        }
        #[cfg(feature = "hydrate")]
        {
            let client = self.client.clone();
            let shared = Rc::clone(&self.shared);
            let epoch = shared.epoch.get();
            let seq = shared.begin_fetch();
            leptos::task::spawn_local(async move {
                let resolution = resolve(&client).await;
                shared.deliver(epoch, seq, resolution);
            });
        }
    }
}

impl IdentityQuery for PollingIdentityQuery {
    fn subscribe(&self, sink: ResolutionSink) -> QuerySubscription {
        let epoch = self.shared.epoch.get() + 1;
        self.shared.epoch.set(epoch);
        *self.shared.sink.borrow_mut() = Some(sink);

        #[cfg(feature = "hydrate")]
        {
            let client = self.client.clone();
            let shared = Rc::clone(&self.shared);
            let interval = self.interval;
            leptos::task::spawn_local(async move {
                loop {
                    let seq = shared.begin_fetch();
                    let resolution = resolve(&client).await;
                    shared.deliver(epoch, seq, resolution);
                    if !shared.is_live(epoch) {
                        break;
                    }
                    gloo_timers::future::sleep(interval).await;
                }
            });
        }

        let shared = Rc::clone(&self.shared);
        QuerySubscription::new(move || {
            if shared.epoch.get() == epoch {
                shared.epoch.set(epoch + 1);
                *shared.sink.borrow_mut() = None;
            }
        })
    }
}
