//! Networking modules for the server's auth and record endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` holds the raw REST calls, `provider` turns them into the identity
//! provider the session holder listens to, and `store` is the document store
//! used by forms.

pub mod api;
pub mod provider;
pub mod store;
