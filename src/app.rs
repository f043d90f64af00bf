//! Root application component with routing and context providers.

use std::time::Duration;

use leptos::prelude::*;
use leptos_meta::{MetaTags, Stylesheet, Title, provide_meta_context};
use leptos_router::{
    StaticSegment,
    components::{Route, Router, Routes},
};

use crate::config::{DEFAULT_REVALIDATE_SECS, ServiceConfig};
use crate::net::api::ServiceClient;
use crate::pages::{dashboard::DashboardPage, home::HomePage, login::LoginPage};
use crate::util::auth::provide_auth;

/// HTML shell rendered on the server for SSR + hydration.
pub fn shell(options: LeptosOptions) -> impl IntoView {
    view! {
        <!DOCTYPE html>
        <html lang="en">
            <head>
                <meta charset="utf-8"/>
                <meta name="viewport" content="width=device-width, initial-scale=1"/>
                <AutoReload options=options.clone()/>
                <HydrationScripts options/>
                <MetaTags/>
            </head>
            <body>
                <App/>
            </body>
        </html>
    }
}

/// Root application component.
///
/// Starts the single auth session for the app and sets up client-side routing.
#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let config = ServiceConfig::from_build_env();
    if let Err(e) = &config {
        leptos::logging::error!("service config: {e}");
    }
    let revalidate = Duration::from_secs(config.as_ref().map_or(DEFAULT_REVALIDATE_SECS, |c| c.revalidate_secs));
    provide_auth(ServiceClient::new(config), revalidate);

    view! {
        <Stylesheet id="leptos" href="/pkg/homenuvo.css"/>
        <Title text="HomeNuvo"/>

        <Router>
            <Routes fallback=|| "Page not found.".into_view()>
                <Route path=StaticSegment("") view=HomePage/>
                <Route path=StaticSegment("login") view=LoginPage/>
                <Route path=StaticSegment("dashboard") view=DashboardPage/>
            </Routes>
        </Router>
    }
}
