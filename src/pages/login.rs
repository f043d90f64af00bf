//! Login page with email + password sign-in and sign-up.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only reachable while signed out. A successful exchange forces an identity
//! revalidation; the resulting auth change makes the guard leave the page.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;

use crate::components::guarded::Guarded;
use crate::net::types::AuthFlow;
use crate::state::guard::GuardPolicy;
use crate::state::login::{FormSlot, LoginForm};
#[cfg(feature = "hydrate")]
use crate::state::login::{SubmitOutcome, submit};
use crate::util::auth::use_app_session;

impl FormSlot for RwSignal<LoginForm> {
    fn update_form<R>(&self, f: impl FnOnce(&mut LoginForm) -> R) -> Option<R> {
        self.try_update(f)
    }
}

fn heading(mode: AuthFlow) -> &'static str {
    match mode {
        AuthFlow::SignIn => "Welcome Back",
        AuthFlow::SignUp => "Create your account",
    }
}

fn submit_label(form: &LoginForm) -> &'static str {
    match (form.mode, form.is_submitting()) {
        (AuthFlow::SignIn, false) => "Sign in",
        (AuthFlow::SignIn, true) => "Signing in...",
        (AuthFlow::SignUp, false) => "Sign up",
        (AuthFlow::SignUp, true) => "Signing up...",
    }
}

fn toggle_prompt(mode: AuthFlow) -> (&'static str, &'static str) {
    match mode {
        AuthFlow::SignIn => ("Don't have an account?", "Sign up"),
        AuthFlow::SignUp => ("Already have an account?", "Sign in"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    view! {
        <Guarded policy=GuardPolicy::unauthenticated("/dashboard")>
            <LoginCard/>
        </Guarded>
    }
}

#[component]
fn LoginCard() -> impl IntoView {
    let form = RwSignal::new(LoginForm::default());
    let session = use_app_session();

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if form.with_untracked(LoginForm::is_submitting) {
            return;
        }

        #[cfg(feature = "hydrate")]
        {
            let (client, query) = session.with_value(|s| (s.client.clone(), s.query.clone()));
            leptos::task::spawn_local(async move {
                if submit(&form, &client).await == SubmitOutcome::Accepted {
                    query.refresh();
                }
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = session;
        }
    };

    let on_toggle = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        form.update(|f| {
            f.set_mode(f.mode.toggled());
        });
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>{move || heading(form.with(|f| f.mode))}</h1>
                <p class="login-card__subtitle">"Enter your credentials to access your account"</p>
                <form class="login-form" on:submit=on_submit>
                    <label class="login-label" for="email">"Email"</label>
                    <input
                        id="email"
                        class="login-input"
                        type="email"
                        placeholder="name@example.com"
                        required=true
                        prop:value=move || form.with(|f| f.email.clone())
                        on:input=move |ev| form.update(|f| f.set_email(event_target_value(&ev)))
                    />
                    <label class="login-label" for="password">"Password"</label>
                    <input
                        id="password"
                        class="login-input"
                        type="password"
                        placeholder="••••••••"
                        required=true
                        prop:value=move || form.with(|f| f.password.clone())
                        on:input=move |ev| form.update(|f| f.set_password(event_target_value(&ev)))
                    />
                    <button class="login-button" type="submit" disabled=move || form.with(LoginForm::is_submitting)>
                        {move || form.with(submit_label)}
                    </button>
                </form>
                <Show when=move || form.with(|f| f.error.is_some())>
                    <p class="login-message" role="alert">{move || form.with(|f| f.error.clone().unwrap_or_default())}</p>
                </Show>
                <p class="login-card__switch">
                    {move || toggle_prompt(form.with(|f| f.mode)).0}
                    " "
                    <a href="#" on:click=on_toggle>
                        {move || toggle_prompt(form.with(|f| f.mode)).1}
                    </a>
                </p>
            </div>
        </div>
    }
}
