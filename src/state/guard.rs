//! Route guard policy evaluation.
//!
//! SYSTEM CONTEXT
//! ==============
//! Protected pages declare which auth state they need and where to send the
//! user otherwise. The guard is re-evaluated on every auth state change.
//!
//! DESIGN
//! ======
//! Redirects fire on the transition into a violating state, not on every
//! evaluation while in it. The guard remembers that it already redirected and
//! clears that mark once the state satisfies the policy again or goes back to
//! loading.

#[cfg(test)]
#[path = "guard_test.rs"]
mod guard_test;

use std::cell::RefCell;
use std::rc::Rc;

use super::auth::AuthState;
use super::store::{AuthStore, Subscription};

/// Auth state a view requires.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Requirement {
    Authenticated,
    Unauthenticated,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardPolicy {
    pub requires: Requirement,
    pub redirect_to: String,
}

impl GuardPolicy {
    pub fn new(requires: Requirement, redirect_to: impl Into<String>) -> Self {
        Self { requires, redirect_to: redirect_to.into() }
    }

    /// Signed-in only; everyone else goes to `redirect_to`.
    pub fn authenticated(redirect_to: impl Into<String>) -> Self {
        Self::new(Requirement::Authenticated, redirect_to)
    }

    /// Signed-out only (login, sign-up).
    pub fn unauthenticated(redirect_to: impl Into<String>) -> Self {
        Self::new(Requirement::Unauthenticated, redirect_to)
    }

    /// `None` while loading; the policy cannot be decided yet.
    pub fn is_satisfied_by(&self, state: &AuthState) -> Option<bool> {
        match (state, self.requires) {
            (AuthState::Loading, _) => None,
            (AuthState::Authenticated(_), Requirement::Authenticated)
            | (AuthState::Unauthenticated, Requirement::Unauthenticated) => Some(true),
            _ => Some(false),
        }
    }

    /// What a guarded view renders for `state`.
    pub fn view_for(&self, state: &AuthState) -> GuardView {
        match self.is_satisfied_by(state) {
            None => GuardView::Pending,
            Some(true) => GuardView::Content,
            Some(false) => GuardView::Nothing,
        }
    }
}

/// Render outcome of a guarded view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardView {
    /// Neutral pending indicator.
    Pending,
    /// The protected content.
    Content,
    /// Nothing; a redirect is under way.
    Nothing,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GuardDecision {
    pub view: GuardView,
    /// Path to navigate to; set only on the evaluation entering violation.
    pub redirect: Option<String>,
}

/// Edge-detecting evaluator for one guarded view instance.
#[derive(Clone, Debug)]
pub struct RouteGuard {
    policy: GuardPolicy,
    redirected: bool,
}

impl RouteGuard {
    pub fn new(policy: GuardPolicy) -> Self {
        Self { policy, redirected: false }
    }

    pub fn evaluate(&mut self, state: &AuthState) -> GuardDecision {
        let view = self.policy.view_for(state);
        let redirect = match view {
            GuardView::Pending | GuardView::Content => {
                self.redirected = false;
                None
            }
            GuardView::Nothing if self.redirected => None,
            GuardView::Nothing => {
                self.redirected = true;
                Some(self.policy.redirect_to.clone())
            }
        };
        GuardDecision { view, redirect }
    }

    /// Evaluate now and on every store change, navigating on violations.
    pub fn mount(self, store: &AuthStore, navigator: Rc<dyn Navigator>) -> GuardHandle {
        let shared = Rc::new(RefCell::new(GuardSlot { guard: self, view: GuardView::Pending }));
        run_guard(&shared, &store.state(), navigator.as_ref());

        let slot = Rc::clone(&shared);
        let subscription = store.subscribe(move |state| run_guard(&slot, state, navigator.as_ref()));
        GuardHandle { slot: shared, _subscription: subscription }
    }
}

/// Navigation side effect used by mounted guards.
pub trait Navigator {
    fn navigate(&self, path: &str);
}

impl<F: Fn(&str)> Navigator for F {
    fn navigate(&self, path: &str) {
        self(path);
    }
}

struct GuardSlot {
    guard: RouteGuard,
    view: GuardView,
}

fn run_guard(slot: &RefCell<GuardSlot>, state: &AuthState, navigator: &dyn Navigator) {
    let decision = {
        let mut slot = slot.borrow_mut();
        let decision = slot.guard.evaluate(state);
        slot.view = decision.view;
        decision
    };
    if let Some(path) = decision.redirect {
        leptos::logging::log!("guard redirect ({}) -> {path}", state.label());
        navigator.navigate(&path);
    }
}

/// A guard mounted on a store; stops reacting when dropped.
pub struct GuardHandle {
    slot: Rc<RefCell<GuardSlot>>,
    _subscription: Subscription,
}

impl GuardHandle {
    pub fn view(&self) -> GuardView {
        self.slot.borrow().view
    }
}
