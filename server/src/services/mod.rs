//! Services used by the HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the calls to Google and Firebase plus the session table
//! so route handlers can stay focused on cookies and status codes.

pub mod firebase;
pub mod firestore;
pub mod google;
pub mod session;
