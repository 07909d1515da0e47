//! Route wrapper that only renders for a signed-in session.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::components::Redirect;
use session::{GuardDecision, guard};

use crate::state::auth::use_auth;

/// Render `children` when a session is present, otherwise redirect to the
/// login page, replacing the current history entry.
///
/// Re-evaluated whenever the session changes, so signing out while the page is
/// open redirects immediately.
#[component]
pub fn PrivateRoute(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let decision = Memo::new(move |_| guard(auth.user().as_ref()));

    move || match decision.get() {
        GuardDecision::Render => children().into_any(),
        GuardDecision::Redirect { to, replace } => view! {
            <Redirect
                path=to.path()
                options=NavigateOptions { replace, ..NavigateOptions::default() }
            />
        }
        .into_any(),
    }
}
