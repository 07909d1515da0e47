//! Login page with Google popup sign-in.
//!
//! A signed-in visitor is sent straight to the dashboard. The email/password
//! form is present but has no backend.

#[cfg(test)]
#[path = "login_test.rs"]
mod login_test;

use leptos::prelude::*;
use leptos_router::NavigateOptions;
use leptos_router::hooks::use_navigate;
use session::{AuthError, LoginRedirect, Route};

use crate::state::auth::use_auth;

pub(crate) const EMAIL_SIGN_IN_UNAVAILABLE: &str = "Email and password sign-in is not implemented.";

/// Message shown when the Google sign-in action fails.
pub(crate) fn sign_in_failure_message(err: &AuthError) -> String {
    match err {
        AuthError::PopupClosed => "Sign-in was cancelled before it finished.".to_owned(),
        AuthError::PopupBlocked => {
            "The sign-in window was blocked. Allow popups for this site and try again.".to_owned()
        }
        other => format!("Sign-in failed: {other}"),
    }
}

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let redirect = StoredValue::new(LoginRedirect::new());
    let email = RwSignal::new(String::new());
    let password = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    // Inverse guard: leave for the dashboard once per transition into signed-in.
    let navigate_dashboard = navigate.clone();
    Effect::new(move || {
        let signed_in = auth.is_signed_in();
        if redirect.try_update_value(|r| r.observe(signed_in)).unwrap_or(false) {
            navigate_dashboard(Route::Dashboard.path(), NavigateOptions::default());
        }
    });

    let on_google = move |_| {
        if busy.get_untracked() {
            return;
        }
        busy.set(true);
        info.set(String::new());
        let navigate = navigate.clone();
        leptos::task::spawn_local(async move {
            match auth.login_with_google().await {
                Ok(_) => {
                    if redirect.try_update_value(LoginRedirect::signed_in).unwrap_or(false) {
                        navigate(Route::Dashboard.path(), NavigateOptions::default());
                    }
                }
                Err(e) => {
                    let _ = info.try_set(sign_in_failure_message(&e));
                }
            }
            let _ = busy.try_set(false);
        });
    };

    let on_email_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        info.set(EMAIL_SIGN_IN_UNAVAILABLE.to_owned());
    };

    view! {
        <div class="login-page">
            <div class="login-card">
                <h1>"Gatekeep"</h1>
                <p class="login-card__subtitle">"Sign in to continue"</p>
                <button
                    class="login-button"
                    type="button"
                    disabled=move || busy.get()
                    on:click=on_google
                >
                    "Sign in with Google"
                </button>
                <div class="login-divider"></div>
                <p class="login-card__subtitle">"Or"</p>
                <form class="login-form" on:submit=on_email_submit>
                    <input
                        class="login-input"
                        type="email"
                        placeholder="you@example.com"
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <input
                        class="login-input"
                        type="password"
                        placeholder="Password"
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <button class="login-button" type="submit">
                        "Sign in with email"
                    </button>
                </form>
                <Show when=move || !info.get().is_empty()>
                    <p class="login-message">{move || info.get()}</p>
                </Show>
            </div>
        </div>
    }
}
