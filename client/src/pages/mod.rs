//! Page modules for route-level screens.
//!
//! ARCHITECTURE
//! ============
//! Pages read the session from `AuthContext` to choose what to show and start
//! sign-in/out. Access control lives in `PrivateRoute`, not here.

pub mod dashboard;
pub mod home;
pub mod login;
pub mod not_found;
