//! Neutral pending indicator.

use leptos::prelude::*;

/// Shown while auth is still resolving; carries no auth-specific wording.
#[component]
pub fn Loader() -> impl IntoView {
    view! {
        <div class="loader" role="status" aria-live="polite">
            <span class="loader__spinner"></span>
            <span class="loader__label">"Loading..."</span>
        </div>
    }
}
