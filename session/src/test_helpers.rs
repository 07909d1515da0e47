//! Scripted identity provider for unit tests.

use std::cell::{Cell, RefCell};

use async_trait::async_trait;

use crate::error::AuthError;
use crate::identity::{Identity, Session};
use crate::provider::{AuthListener, IdentityProvider, ListenerSet, Subscription};

pub fn alice() -> Identity {
    Identity {
        uid: "uid-alice".to_owned(),
        display_name: Some("Alice".to_owned()),
        email: Some("alice@example.com".to_owned()),
        photo_url: Some("https://example.com/alice.png".to_owned()),
    }
}

pub fn bob() -> Identity {
    Identity {
        uid: "uid-bob".to_owned(),
        display_name: None,
        email: Some("bob@example.com".to_owned()),
        photo_url: None,
    }
}

/// Provider whose notifications are driven by the test through [`emit`].
///
/// [`emit`]: FakeProvider::emit
pub struct FakeProvider {
    listeners: ListenerSet,
    sign_in_result: RefCell<Result<Identity, AuthError>>,
    sign_out_result: RefCell<Result<(), AuthError>>,
    pub sign_in_calls: Cell<u32>,
    pub sign_out_calls: Cell<u32>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self {
            listeners: ListenerSet::new(),
            sign_in_result: RefCell::new(Ok(alice())),
            sign_out_result: RefCell::new(Ok(())),
            sign_in_calls: Cell::new(0),
            sign_out_calls: Cell::new(0),
        }
    }

    pub fn emit(&self, session: Session) {
        self.listeners.notify(&session);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn fail_sign_in(&self, err: AuthError) {
        *self.sign_in_result.borrow_mut() = Err(err);
    }

    pub fn fail_sign_out(&self, err: AuthError) {
        *self.sign_out_result.borrow_mut() = Err(err);
    }
}

#[async_trait(?Send)]
impl IdentityProvider for FakeProvider {
    fn subscribe(&self, listener: AuthListener) -> Subscription {
        self.listeners.register(listener)
    }

    async fn sign_in_with_popup(&self) -> Result<Identity, AuthError> {
        self.sign_in_calls.set(self.sign_in_calls.get() + 1);
        self.sign_in_result.borrow().clone()
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        self.sign_out_calls.set(self.sign_out_calls.get() + 1);
        self.sign_out_result.borrow().clone()
    }
}
