pub mod guard;
pub mod identity;
pub mod navigator;

pub use guard::{NavigationDecision, RouteGuard};
pub use identity::{AuthUser, IdentityError, IdentityProvider, SessionIdentity, StaticIdentity};
pub use navigator::{NavigationOutcome, Navigator};
