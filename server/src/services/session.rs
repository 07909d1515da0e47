//! Cookie session table.
//!
//! ARCHITECTURE
//! ============
//! The browser holds a random 32-byte token in an `HttpOnly` cookie; the
//! table is keyed by the token's SHA-256 so a dump of server memory does not
//! yield usable cookies. Sessions live in process memory and vanish on
//! restart, which signs everyone out. Each entry expires [`SESSION_TTL`]
//! after sign-in whether or not the browser ever logs out.

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;

use std::collections::HashMap;
use std::fmt::Write;
use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::Rng;
use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use super::firebase::FirebaseSession;

pub(crate) fn bytes_to_hex(bytes: &[u8]) -> String {
    let mut s = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(s, "{b:02x}");
    }
    s
}

/// Generate a cryptographically random 32-byte hex token.
#[must_use]
pub fn generate_token() -> String {
    let bytes: [u8; 32] = rand::rng().random();
    bytes_to_hex(&bytes)
}

pub(crate) fn hash_token(token: &str) -> String {
    bytes_to_hex(&Sha256::digest(token.as_bytes()))
}

/// How long a session lives after sign-in. The session cookie carries the
/// same max-age.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

#[derive(Clone)]
struct Entry {
    session: FirebaseSession,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, Entry>>>,
    ttl: Duration,
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::with_ttl(SESSION_TTL)
    }
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_ttl(ttl: Duration) -> Self {
        Self { sessions: Arc::default(), ttl }
    }

    /// Store a session and return the cookie token that names it. Expired
    /// sessions are swept first.
    pub async fn create(&self, session: FirebaseSession) -> String {
        let token = generate_token();
        let now = Instant::now();
        let expires_at = now.checked_add(self.ttl).unwrap_or(now);
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, entry| entry.is_live(now));
        sessions.insert(hash_token(&token), Entry { session, expires_at });
        token
    }

    /// Look up a live session. An expired one is dropped.
    pub async fn get(&self, token: &str) -> Option<FirebaseSession> {
        let key = hash_token(token);
        let now = Instant::now();
        {
            let sessions = self.sessions.read().await;
            match sessions.get(&key) {
                Some(entry) if entry.is_live(now) => return Some(entry.session.clone()),
                Some(_) => {}
                None => return None,
            }
        }
        self.sessions.write().await.remove(&key);
        None
    }

    /// Overwrite an existing session (after a token refresh), keeping its
    /// expiry. Returns false when the session was removed in the meantime.
    pub async fn replace(&self, token: &str, session: FirebaseSession) -> bool {
        match self.sessions.write().await.get_mut(&hash_token(token)) {
            Some(entry) => {
                entry.session = session;
                true
            }
            None => false,
        }
    }

    pub async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(&hash_token(token)).is_some()
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}
