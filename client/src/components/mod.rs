//! Reusable UI component modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! `auth_provider` owns the session for the whole tree, `private_route` gates
//! protected destinations on it, and `record_form` writes to the document store.

pub mod auth_provider;
pub mod private_route;
pub mod record_form;
