use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use railboard_types::routes::{NavigationRequest, RedirectTarget, RouteTable};

use crate::identity::IdentityProvider;

/// How long a guard evaluation will wait on identity resolution before
/// treating the user as signed out.
pub const DEFAULT_IDENTITY_TIMEOUT: Duration = Duration::from_secs(5);

/// Outcome of a single guard evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationDecision {
    /// Proceed with the requested navigation unchanged.
    Allow,
    /// Go to the login route instead; the original target rides along in
    /// the redirect query.
    Redirect(RedirectTarget),
}

/// Gates navigation on authentication state.
///
/// Holds no mutable state: the identity provider is consulted fresh on
/// every protected navigation and nothing is cached, so evaluating the
/// same request twice under the same identity state gives the same answer.
pub struct RouteGuard {
    table: RouteTable,
    identity: Arc<dyn IdentityProvider>,
    identity_timeout: Duration,
}

impl RouteGuard {
    pub fn new(table: RouteTable, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            table,
            identity,
            identity_timeout: DEFAULT_IDENTITY_TIMEOUT,
        }
    }

    pub fn with_identity_timeout(mut self, timeout: Duration) -> Self {
        self.identity_timeout = timeout;
        self
    }

    /// Decide whether `nav` may proceed.
    ///
    /// Public routes resolve immediately with zero identity calls. Protected
    /// routes await the provider's full resolution, bounded by the identity
    /// timeout; an error or timeout is treated as "no user" rather than
    /// leaving the navigation hanging.
    pub async fn evaluate(&self, nav: &NavigationRequest) -> NavigationDecision {
        // Paths missing from the table fail closed.
        let requires_auth = self
            .table
            .resolve(&nav.path)
            .is_none_or(|route| route.requires_auth);

        if !requires_auth {
            return NavigationDecision::Allow;
        }

        match tokio::time::timeout(self.identity_timeout, self.identity.current_user()).await {
            Ok(Ok(Some(user))) => {
                debug!(path = %nav.path, user = %user.username, "navigation permitted");
                NavigationDecision::Allow
            }
            Ok(Ok(None)) => {
                debug!(path = %nav.path, "no signed-in user, redirecting to login");
                NavigationDecision::Redirect(RedirectTarget::login(nav))
            }
            Ok(Err(err)) => {
                warn!(path = %nav.path, error = %err, "identity resolution failed, treating as signed out");
                NavigationDecision::Redirect(RedirectTarget::login(nav))
            }
            Err(_) => {
                warn!(
                    path = %nav.path,
                    timeout_ms = self.identity_timeout.as_millis() as u64,
                    "identity resolution timed out, treating as signed out"
                );
                NavigationDecision::Redirect(RedirectTarget::login(nav))
            }
        }
    }
}
