use std::sync::Arc;

use tokio::sync::{Mutex, watch};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use railboard_types::routes::{NavigationRequest, RedirectTarget};

use crate::guard::{NavigationDecision, RouteGuard};

/// Result of asking the navigator to go somewhere.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationOutcome {
    Permitted(NavigationRequest),
    Redirected(RedirectTarget),
    /// A newer navigation arrived while this one's guard was running.
    Superseded,
}

/// Serializes navigation attempts over a single guard.
///
/// Policy is last-navigation-wins: starting a new navigation cancels the
/// in-flight guard evaluation of the previous one, and a superseded attempt
/// never publishes a decision. The current navigation target lives in a
/// watch channel owned here.
pub struct Navigator {
    guard: Arc<RouteGuard>,
    active: Mutex<CancellationToken>,
    current: watch::Sender<Option<NavigationRequest>>,
}

impl Navigator {
    pub fn new(guard: RouteGuard) -> Self {
        let (current, _) = watch::channel(None);
        Self {
            guard: Arc::new(guard),
            active: Mutex::new(CancellationToken::new()),
            current,
        }
    }

    /// Observe the current navigation target.
    pub fn subscribe(&self) -> watch::Receiver<Option<NavigationRequest>> {
        self.current.subscribe()
    }

    pub async fn navigate(&self, nav: NavigationRequest) -> NavigationOutcome {
        let token = {
            let mut active = self.active.lock().await;
            active.cancel();
            *active = CancellationToken::new();
            active.clone()
        };

        let decision = tokio::select! {
            _ = token.cancelled() => {
                debug!(path = %nav.path, "navigation superseded before guard resolved");
                return NavigationOutcome::Superseded;
            }
            decision = self.guard.evaluate(&nav) => decision,
        };

        // A newer navigation may have started between the guard resolving
        // and this point; its decision wins. Re-take the lock so the stale
        // check and the publish are atomic with any navigate() cancelling
        // this token.
        let _active = self.active.lock().await;
        if token.is_cancelled() {
            debug!(path = %nav.path, "navigation superseded after guard resolved");
            return NavigationOutcome::Superseded;
        }

        match decision {
            NavigationDecision::Allow => {
                let _ = self.current.send(Some(nav.clone()));
                NavigationOutcome::Permitted(nav)
            }
            NavigationDecision::Redirect(target) => NavigationOutcome::Redirected(target),
        }
    }
}
