//! Name + age form appended to the document store.

#[cfg(test)]
#[path = "record_form_test.rs"]
mod record_form_test;

use leptos::prelude::*;
use session::{ContactRecord, DocumentStore, Record};

use crate::net::store::HttpDocumentStore;

pub(crate) fn parse_age(raw: &str) -> Result<u32, &'static str> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err("Enter an age.");
    }
    raw.parse::<u32>().map_err(|_| "Age must be a whole number.")
}

/// Turn raw form input into a validated record, or the message to show.
pub(crate) fn validate_contact_input(name: &str, age: &str) -> Result<Record, String> {
    let age = parse_age(age).map_err(str::to_owned)?;
    ContactRecord::new(name, age)
        .map(Record::Contact)
        .map_err(|e| format!("Could not save: {e}"))
}

#[component]
pub fn RecordForm() -> impl IntoView {
    let name = RwSignal::new(String::new());
    let age = RwSignal::new(String::new());
    let info = RwSignal::new(String::new());
    let busy = RwSignal::new(false);

    let on_submit = move |ev: leptos::ev::SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }
        let record = match validate_contact_input(&name.get_untracked(), &age.get_untracked()) {
            Ok(record) => record,
            Err(message) => {
                info.set(message);
                return;
            }
        };
        busy.set(true);
        info.set("Saving...".to_owned());

        leptos::task::spawn_local(async move {
            match HttpDocumentStore.append(&record).await {
                Ok(()) => {
                    let _ = name.try_set(String::new());
                    let _ = age.try_set(String::new());
                    let _ = info.try_set("Saved.".to_owned());
                }
                Err(e) => {
                    let _ = info.try_set(format!("Could not save: {e}"));
                }
            }
            let _ = busy.try_set(false);
        });
    };

    view! {
        <form class="record-form" on:submit=on_submit>
            <h2>"New entry"</h2>
            <input
                class="record-input"
                type="text"
                placeholder="Name"
                prop:value=move || name.get()
                on:input=move |ev| name.set(event_target_value(&ev))
            />
            <input
                class="record-input"
                type="number"
                min="0"
                placeholder="Age"
                prop:value=move || age.get()
                on:input=move |ev| age.set(event_target_value(&ev))
            />
            <button class="record-button" type="submit" disabled=move || busy.get()>
                "Save"
            </button>
            <Show when=move || !info.get().is_empty()>
                <p class="record-message">{move || info.get()}</p>
            </Show>
        </form>
    }
}
