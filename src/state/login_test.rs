use std::rc::Rc;

use futures::channel::oneshot;
use futures::executor::{LocalPool, block_on};
use futures::task::LocalSpawnExt;

use super::*;
use crate::net::identity::Resolution;
use crate::state::guard::{GuardPolicy, Navigator, RouteGuard};
use crate::state::store::AuthStore;

/// Exchange that answers immediately with a fixed result.
struct ScriptedExchange {
    result: Result<(), ApiError>,
    calls: RefCell<Vec<CredentialRequest>>,
}

impl ScriptedExchange {
    fn new(result: Result<(), ApiError>) -> Self {
        Self { result, calls: RefCell::new(Vec::new()) }
    }
}

impl CredentialExchange for ScriptedExchange {
    fn exchange(&self, request: CredentialRequest) -> impl Future<Output = Result<(), ApiError>> {
        self.calls.borrow_mut().push(request);
        let result = self.result.clone();
        async move { result }
    }
}

/// Exchange that stays outstanding until the test completes it.
#[derive(Default)]
struct GatedExchange {
    calls: RefCell<Vec<CredentialRequest>>,
    pending: RefCell<Option<oneshot::Sender<Result<(), ApiError>>>>,
}

impl GatedExchange {
    fn complete(&self, result: Result<(), ApiError>) {
        let sender = self.pending.borrow_mut().take().unwrap();
        sender.send(result).unwrap();
    }
}

impl CredentialExchange for GatedExchange {
    fn exchange(&self, request: CredentialRequest) -> impl Future<Output = Result<(), ApiError>> {
        self.calls.borrow_mut().push(request);
        let (tx, rx) = oneshot::channel();
        *self.pending.borrow_mut() = Some(tx);
        async move { rx.await.unwrap_or_else(|_| Err(ApiError::Transport("cancelled".to_owned()))) }
    }
}

/// Slot whose form has already been torn down.
struct GoneSlot;

impl FormSlot for GoneSlot {
    fn update_form<R>(&self, _f: impl FnOnce(&mut LoginForm) -> R) -> Option<R> {
        None
    }
}

fn filled(email: &str, password: &str) -> RefCell<LoginForm> {
    let mut form = LoginForm::default();
    form.set_email(email);
    form.set_password(password);
    RefCell::new(form)
}

// =============================================================
// Form state machine
// =============================================================

#[test]
fn login_form_starts_idle_in_sign_in_mode() {
    let form = LoginForm::default();
    assert_eq!(form.mode, AuthFlow::SignIn);
    assert_eq!(form.phase, SubmitPhase::Idle);
    assert!(form.error.is_none());
}

#[test]
fn set_mode_toggles_while_idle_and_keeps_fields() {
    let mut form = filled("a@x.com", "secret").into_inner();
    assert!(form.set_mode(AuthFlow::SignUp));
    assert_eq!(form.mode, AuthFlow::SignUp);
    assert!(form.set_mode(AuthFlow::SignIn));
    assert_eq!(form.mode, AuthFlow::SignIn);
    assert_eq!(form.email, "a@x.com");
    assert_eq!(form.password, "secret");
}

#[test]
fn set_mode_is_ignored_while_submitting() {
    let mut form = filled("a@x.com", "secret").into_inner();
    form.begin_submit().unwrap();
    assert!(!form.set_mode(AuthFlow::SignUp));
    assert_eq!(form.mode, AuthFlow::SignIn);
}

#[test]
fn begin_submit_latches_trimmed_email_and_mode() {
    let mut form = filled("  a@x.com ", " pass word ").into_inner();
    form.set_mode(AuthFlow::SignUp);
    let request = form.begin_submit().unwrap();
    assert_eq!(request, CredentialRequest::password("a@x.com".to_owned(), " pass word ".to_owned(), AuthFlow::SignUp));
    assert!(form.is_submitting());
}

#[test]
fn begin_submit_requires_both_fields() {
    for (email, password) in [("", "secret"), ("   ", "secret"), ("a@x.com", "")] {
        let mut form = filled(email, password).into_inner();
        assert_eq!(form.begin_submit(), Err(SubmitRejected::MissingFields));
        assert_eq!(form.phase, SubmitPhase::Idle);
        assert_eq!(form.error.as_deref(), Some(MISSING_FIELDS_MESSAGE));
    }
}

#[test]
fn begin_submit_clears_previous_error() {
    let mut form = filled("a@x.com", "secret").into_inner();
    form.error = Some("old".to_owned());
    form.begin_submit().unwrap();
    assert!(form.error.is_none());
}

#[test]
fn settle_returns_to_idle_on_success_and_failure() {
    let mut form = filled("a@x.com", "secret").into_inner();
    form.begin_submit().unwrap();
    form.settle(&Ok(()));
    assert_eq!(form.phase, SubmitPhase::Idle);
    assert!(form.error.is_none());

    form.set_mode(AuthFlow::SignUp);
    form.begin_submit().unwrap();
    form.settle(&Err(ApiError::Backend("Account exists".to_owned())));
    assert_eq!(form.phase, SubmitPhase::Idle);
    assert_eq!(form.error.as_deref(), Some("Sign up failed: Account exists"));
}

// =============================================================
// Submission driver
// =============================================================

#[test]
fn scenario_failed_exchange_returns_to_idle_with_visible_error() {
    let store = AuthStore::new();
    store.apply(&Resolution::Absent);
    let paths = Rc::new(RefCell::new(Vec::<String>::new()));
    let sink = Rc::clone(&paths);
    let navigator: Rc<dyn Navigator> = Rc::new(move |p: &str| sink.borrow_mut().push(p.to_owned()));
    let _guard = RouteGuard::new(GuardPolicy::unauthenticated("/dashboard")).mount(&store, navigator);

    let form = filled("a@x.com", "secret");
    let exchange = ScriptedExchange::new(Err(ApiError::Backend("InvalidSecret".to_owned())));
    let outcome = block_on(submit(&form, &exchange));

    assert_eq!(outcome, SubmitOutcome::Failed(ApiError::Backend("InvalidSecret".to_owned())));
    let calls = exchange.calls.borrow();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].provider, "password");
    assert_eq!(calls[0].payload.email, "a@x.com");
    assert_eq!(calls[0].payload.password, "secret");
    assert_eq!(calls[0].payload.flow, AuthFlow::SignIn);

    let form = form.borrow();
    assert_eq!(form.phase, SubmitPhase::Idle);
    assert!(form.error.as_deref().is_some_and(|m| m.contains("InvalidSecret")));
    assert!(paths.borrow().is_empty());
}

#[test]
fn scenario_second_submit_while_in_flight_is_ignored() {
    let form = Rc::new(filled("a@x.com", "secret"));
    let exchange = Rc::new(GatedExchange::default());
    let first = Rc::new(RefCell::new(None));

    let mut pool = LocalPool::new();
    let (f, e, out) = (Rc::clone(&form), Rc::clone(&exchange), Rc::clone(&first));
    pool.spawner()
        .spawn_local(async move {
            let outcome = submit(f.as_ref(), e.as_ref()).await;
            *out.borrow_mut() = Some(outcome);
        })
        .unwrap();
    pool.run_until_stalled();
    assert!(form.borrow().is_submitting());

    let second = block_on(submit(form.as_ref(), exchange.as_ref()));
    assert_eq!(second, SubmitOutcome::Rejected(SubmitRejected::InFlight));
    assert_eq!(exchange.calls.borrow().len(), 1);
    assert!(form.borrow().error.is_none());

    exchange.complete(Ok(()));
    pool.run_until_stalled();
    assert_eq!(*first.borrow(), Some(SubmitOutcome::Accepted));
    assert!(!form.borrow().is_submitting());
}

#[test]
fn successful_exchange_leaves_form_reusable() {
    let form = filled("a@x.com", "secret");
    let exchange = ScriptedExchange::new(Ok(()));
    assert_eq!(block_on(submit(&form, &exchange)), SubmitOutcome::Accepted);
    assert_eq!(form.borrow().phase, SubmitPhase::Idle);
    assert_eq!(block_on(submit(&form, &exchange)), SubmitOutcome::Accepted);
    assert_eq!(exchange.calls.borrow().len(), 2);
}

#[test]
fn empty_fields_never_reach_exchange() {
    let form = filled("a@x.com", "");
    let exchange = ScriptedExchange::new(Ok(()));
    let outcome = block_on(submit(&form, &exchange));
    assert_eq!(outcome, SubmitOutcome::Rejected(SubmitRejected::MissingFields));
    assert!(exchange.calls.borrow().is_empty());
}

#[test]
fn detached_form_skips_exchange() {
    let exchange = ScriptedExchange::new(Ok(()));
    assert_eq!(block_on(submit(&GoneSlot, &exchange)), SubmitOutcome::Detached);
    assert!(exchange.calls.borrow().is_empty());
}

#[test]
fn service_client_exchange_fails_without_config() {
    let client = ServiceClient::new(Err(crate::config::ConfigError::MissingEndpoint));
    let form = filled("a@x.com", "secret");
    let outcome = block_on(submit(&form, &client));
    assert!(matches!(outcome, SubmitOutcome::Failed(ApiError::Config(_))));
    assert!(form.borrow().error.is_some());
}
