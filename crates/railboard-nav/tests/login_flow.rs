//! End-to-end navigation flow: cold start during session restoration,
//! redirect to login, sign-in, and return to the originally requested path.

use std::sync::Arc;
use std::time::Duration;

use uuid::Uuid;

use railboard_nav::{AuthUser, NavigationOutcome, Navigator, RouteGuard, SessionIdentity};
use railboard_types::routes::{NavigationRequest, RouteTable};

#[tokio::test]
async fn cold_start_redirects_then_returns_after_login() {
    let (identity, session) = SessionIdentity::restoring();
    let navigator = Navigator::new(RouteGuard::new(
        RouteTable::board_defaults(),
        Arc::new(identity),
    ));

    // Session restoration finishes shortly after startup, with no stored user.
    let restore = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(20)).await;
        session.restored(None);
        session
    });

    // The guard waits for restoration to complete, not merely its first tick.
    let outcome = navigator
        .navigate(NavigationRequest::new("/", "/?tab=arrivals"))
        .await;
    let NavigationOutcome::Redirected(target) = outcome else {
        panic!("expected login redirect, got {outcome:?}");
    };
    assert_eq!(target.path, "/login");
    assert_eq!(target.query.redirect, "/?tab=arrivals");

    // The login screen itself is reachable while signed out.
    let login = navigator
        .navigate(NavigationRequest::bare(&target.path))
        .await;
    assert!(matches!(login, NavigationOutcome::Permitted(_)));

    // Sign in, then follow the remembered redirect back.
    let session = restore.await.unwrap();
    session.sign_in(AuthUser {
        user_id: Uuid::new_v4(),
        username: "rider".to_string(),
    });

    let back = navigator
        .navigate(NavigationRequest::new("/", target.query.redirect.clone()))
        .await;
    assert_eq!(
        back,
        NavigationOutcome::Permitted(NavigationRequest::new("/", "/?tab=arrivals"))
    );
}
