//! Dashboard for the signed-in user: identity header, sign-out, record form.
//!
//! SYSTEM CONTEXT
//! ==============
//! Only reachable through `PrivateRoute`, so a session is present on every
//! render that matters. After sign-out the guard redirects on its own; the
//! explicit navigation here covers the case where the provider notification
//! arrives later.

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::Route;

use crate::components::record_form::RecordForm;
use crate::state::auth::use_auth;

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_sign_out = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        info.set(String::new());
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match auth.logout().await {
                Ok(()) => navigate(Route::Login.path(), NavigateOptions::default()),
                Err(e) => {
                    let _ = info.try_set(format!("Sign-out failed: {e}"));
                }
            }
            let _ = busy.try_set(false);
        });
    };

    let name = move || auth.user().map(|u| u.greeting_name().to_owned()).unwrap_or_default();
    let email = move || auth.user().and_then(|u| u.email).unwrap_or_default();
    let photo = move || auth.user().and_then(|u| u.photo_url);

    view! {
        <div class="dashboard-page">
            <header class="dashboard-header">
                <div class="user-badge">
                    {move || photo().map(|src| view! { <img class="user-badge__photo" src=src alt=""/> })}
                    <div class="user-badge__text">
                        <span class="user-badge__name">{name}</span>
                        <span class="user-badge__email">{email}</span>
                    </div>
                </div>
                <button class="btn" type="button" disabled=move || busy.get() on:click=on_sign_out>
                    "Sign out"
                </button>
            </header>
            <Show when=move || !info.get().is_empty()>
                <p class="dashboard-message">{move || info.get()}</p>
            </Show>
            <RecordForm/>
        </div>
    }
}
