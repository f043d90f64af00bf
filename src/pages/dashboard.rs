//! Dashboard page for signed-in users.
//!
//! SYSTEM CONTEXT
//! ==============
//! This is the authenticated landing route. Signed-out visitors, including
//! anyone whose session ends while the page is open, are sent to `/login`.

#[cfg(test)]
#[path = "dashboard_test.rs"]
mod dashboard_test;

use leptos::prelude::*;

use crate::components::guarded::Guarded;
use crate::state::auth::IdentityRecord;
use crate::state::guard::GuardPolicy;
use crate::util::auth::use_auth;

/// Greeting line for the signed-in user, falling back through name and email.
fn greeting(user: &IdentityRecord) -> String {
    if !user.name.is_empty() {
        format!("Welcome back, {}.", user.name)
    } else if !user.email.is_empty() {
        format!("Welcome back, {}.", user.email)
    } else {
        "Welcome back.".to_owned()
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();

    view! {
        <Guarded policy=GuardPolicy::authenticated("/login")>
            <div class="dashboard-page">
                <header class="dashboard-page__header">
                    <h1>"Dashboard"</h1>
                    <p>{move || auth.with(|state| state.user().map(greeting).unwrap_or_default())}</p>
                </header>
            </div>
        </Guarded>
    }
}
