//! Public landing page.
//!
//! The nav reflects auth state: account links and sign-out when signed in,
//! a sign-in link otherwise, nothing while auth is still resolving.

use leptos::prelude::*;

use crate::state::auth::AuthState;
use crate::util::auth::{use_app_session, use_auth};

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let session = use_app_session();
    let signing_out = RwSignal::new(false);

    // Sign-out only ends the backend session; the revalidated identity query
    // moves auth to signed-out and any mounted guard reacts to that.
    let on_sign_out = move |ev: leptos::ev::MouseEvent| {
        ev.prevent_default();
        if signing_out.get_untracked() {
            return;
        }
        signing_out.set(true);

        #[cfg(feature = "hydrate")]
        {
            let (client, query) = session.with_value(|s| (s.client.clone(), s.query.clone()));
            leptos::task::spawn_local(async move {
                if let Err(e) = client.sign_out().await {
                    leptos::logging::warn!("sign-out failed: {e}");
                }
                query.refresh();
                signing_out.set(false);
            });
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = session;
            signing_out.set(false);
        }
    };

    view! {
        <div class="home-page">
            <nav class="home-nav">
                <span class="home-nav__brand">"HomeNuvo"</span>
                <div class="home-nav__actions">
                    {move || match auth.get() {
                        AuthState::Loading => ().into_any(),
                        AuthState::Unauthenticated => {
                            view! { <a class="btn btn--primary" href="/login">"Sign In"</a> }.into_any()
                        }
                        AuthState::Authenticated(user) => {
                            view! {
                                <span class="home-nav__user">{user.email}</span>
                                <a class="btn" href="/dashboard">"Dashboard"</a>
                                <button
                                    class="btn"
                                    type="button"
                                    disabled=move || signing_out.get()
                                    on:click=on_sign_out
                                >
                                    "Sign Out"
                                </button>
                            }
                                .into_any()
                        }
                    }}
                </div>
            </nav>

            <section class="home-hero">
                <h1>"AI Interior Redesign in Seconds"</h1>
                <p>
                    "Upload your room photo and let HomeNuvo AI instantly generate new interior designs tailored to your style."
                </p>
                <a class="btn btn--primary" href="/dashboard">"Try it now"</a>
            </section>

            <footer class="home-footer">"© HomeNuvo. All rights reserved."</footer>
        </div>
    }
}
