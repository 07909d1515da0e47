//! Landing page; content depends on whether someone is signed in.

use leptos::prelude::*;
use leptos_router::components::A;
use session::Route;

use crate::state::auth::use_auth;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();
    let greeting = move || {
        auth.user()
            .map(|user| format!("Welcome back, {}.", user.greeting_name()))
            .unwrap_or_default()
    };

    view! {
        <div class="home-page">
            <h1>"Gatekeep"</h1>
            <Show
                when=move || auth.is_signed_in()
                fallback=|| view! {
                    <p class="home-page__subtitle">"Sign in to reach your dashboard."</p>
                    <div class="home-page__actions">
                        <A href=Route::Login.path() attr:class="home-button">"Sign in"</A>
                        <A href=Route::Dashboard.path() attr:class="home-button home-button--ghost">
                            "View dashboard"
                        </A>
                    </div>
                }
            >
                <p class="home-page__subtitle">{greeting}</p>
                <div class="home-page__actions">
                    <A href=Route::Dashboard.path() attr:class="home-button">"Go to dashboard"</A>
                </div>
            </Show>
        </div>
    }
}
