//! Fallback for unmatched paths.

use leptos::prelude::*;
use leptos_router::components::A;
use session::Route;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found-page">
            <h1>"404"</h1>
            <p>"Nothing lives at this address."</p>
            <A href=Route::Home.path()>"Back home"</A>
        </div>
    }
}
