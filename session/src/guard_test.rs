use super::*;
use crate::test_helpers::alice;

// =============================================================================
// Route
// =============================================================================

#[test]
fn route_paths() {
    assert_eq!(Route::Home.path(), "/");
    assert_eq!(Route::Login.path(), "/login");
    assert_eq!(Route::Dashboard.path(), "/dashboard");
    assert_eq!(Route::NotFound.path(), "*");
}

#[test]
fn from_path_matches_known_routes() {
    assert_eq!(Route::from_path("/"), Route::Home);
    assert_eq!(Route::from_path(""), Route::Home);
    assert_eq!(Route::from_path("/login"), Route::Login);
    assert_eq!(Route::from_path("/dashboard/"), Route::Dashboard);
    assert_eq!(Route::from_path("/dashboard?tab=1#top"), Route::Dashboard);
}

#[test]
fn from_path_unmatched_is_not_found() {
    assert_eq!(Route::from_path("/nope"), Route::NotFound);
    assert_eq!(Route::from_path("/dashboard/extra"), Route::NotFound);
}

#[test]
fn only_dashboard_is_protected() {
    assert!(Route::Dashboard.is_protected());
    assert!(!Route::Home.is_protected());
    assert!(!Route::Login.is_protected());
    assert!(!Route::NotFound.is_protected());
}

// =============================================================================
// guard
// =============================================================================

#[test]
fn guard_redirects_without_session_replacing_history() {
    assert_eq!(guard(None), GuardDecision::Redirect { to: Route::Login, replace: true });
}

#[test]
fn guard_renders_with_session() {
    assert_eq!(guard(Some(&alice())), GuardDecision::Render);
}

#[test]
fn guard_follows_session_changes() {
    let user = alice();
    let sessions = [Some(&user), None, Some(&user)];
    let decisions: Vec<_> = sessions.iter().map(|s| guard(*s)).collect();
    assert_eq!(
        decisions,
        vec![
            GuardDecision::Render,
            GuardDecision::Redirect { to: Route::Login, replace: true },
            GuardDecision::Render,
        ]
    );
}

// =============================================================================
// LoginRedirect
// =============================================================================

#[test]
fn login_redirect_fires_when_active_with_session() {
    let mut latch = LoginRedirect::new();
    assert!(latch.observe(true));
}

#[test]
fn login_redirect_fires_once_per_transition() {
    let mut latch = LoginRedirect::new();
    let fired: Vec<bool> = [false, true, true, false, false, true]
        .into_iter()
        .map(|present| latch.observe(present))
        .collect();
    assert_eq!(fired, vec![false, true, false, false, false, true]);
}

#[test]
fn sign_in_then_notification_navigates_once() {
    let mut latch = LoginRedirect::new();
    assert!(!latch.observe(false));
    assert!(latch.signed_in());
    assert!(!latch.observe(true));
}

#[test]
fn notification_then_sign_in_navigates_once() {
    let mut latch = LoginRedirect::new();
    assert!(!latch.observe(false));
    assert!(latch.observe(true));
    assert!(!latch.signed_in());
}
