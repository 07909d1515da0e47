//! Provides the auth session to everything beneath it.

use leptos::prelude::*;

use crate::state::auth::AuthContext;

/// Owns the session holder for its subtree.
///
/// The provider listener is registered when this component is created and
/// released on cleanup. Children stay unrendered until the first provider
/// notification so a signed-in user never sees a signed-out flash.
#[component]
pub fn AuthProvider(children: ChildrenFn) -> impl IntoView {
    let auth = AuthContext::new();
    provide_context(auth);
    auth.initialize();
    on_cleanup(move || auth.teardown());

    view! {
        <Show when=move || auth.ready()>
            {children()}
        </Show>
    }
}
