//! Policy-guarded view wrapper.
//!
//! SYSTEM CONTEXT
//! ==============
//! Wraps a route's content: shows the loader while auth resolves, the content
//! when the policy holds, and nothing while the redirect takes effect.

use std::rc::Rc;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;

use crate::components::loader::Loader;
use crate::state::guard::{GuardPolicy, GuardView, Navigator};
use crate::util::auth::{mount_route_guard, use_auth};

#[component]
pub fn Guarded(policy: GuardPolicy, children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let navigator: Rc<dyn Navigator> = Rc::new(move |path: &str| {
        // Route after the current render or store notification has finished.
        let navigate = navigate.clone();
        let path = path.to_owned();
        leptos::task::spawn_local(async move { navigate(&path, NavigateOptions::default()) });
    });
    let guard = mount_route_guard(policy.clone(), navigator);
    // Owned by this component; disposing it unsubscribes the guard.
    let _guard = StoredValue::new_local(guard);

    // Re-render only when the guard outcome changes, not on every identity refresh.
    let outcome = Memo::new(move |_| policy.view_for(&auth.get()));

    move || match outcome.get() {
        GuardView::Pending => view! { <Loader/> }.into_any(),
        GuardView::Content => children(),
        GuardView::Nothing => ().into_any(),
    }
}
