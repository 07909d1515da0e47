//! Session gating core shared by `client` and `server`.
//!
//! This crate owns the signed-in identity model, the auth session holder that
//! republishes identity-provider notifications, the route guard, and the typed
//! records written to the document store. It has no UI or HTTP dependencies so
//! every decision here is testable natively.

pub mod error;
pub mod guard;
pub mod holder;
pub mod identity;
pub mod provider;
pub mod record;

#[cfg(test)]
mod test_helpers;

pub use error::{AuthError, ScopeError, StoreError};
pub use guard::{GuardDecision, LoginRedirect, Route, guard};
pub use holder::{AuthState, AuthStore, SessionHolder, SharedAuth};
pub use identity::{Identity, Session};
pub use provider::{AuthListener, IdentityProvider, ListenerSet, Subscription};
pub use record::{ContactRecord, DocumentStore, Record, RecordError};
