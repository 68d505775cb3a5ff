use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Where unauthenticated navigations are sent.
pub const LOGIN_PATH: &str = "/login";

/// Static per-route configuration. Auth requirements live here, not in
/// runtime-introspected metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteConfig {
    pub path: String,
    pub requires_auth: bool,
}

impl RouteConfig {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: false,
        }
    }

    pub fn protected(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            requires_auth: true,
        }
    }
}

/// The application's route table, resolved by exact path lookup.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<String, RouteConfig>,
}

impl RouteTable {
    pub fn new(routes: impl IntoIterator<Item = RouteConfig>) -> Self {
        Self {
            routes: routes
                .into_iter()
                .map(|r| (r.path.clone(), r))
                .collect(),
        }
    }

    /// The board's own routes: the home screen is protected, the login and
    /// logged-out screens are not.
    pub fn board_defaults() -> Self {
        Self::new([
            RouteConfig::protected("/"),
            RouteConfig::public(LOGIN_PATH),
            RouteConfig::public("/logged-out"),
        ])
    }

    pub fn resolve(&self, path: &str) -> Option<&RouteConfig> {
        self.routes.get(path)
    }
}

/// A navigation attempt: the bare path plus the full path including any
/// query string, as originally requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub path: String,
    pub full_path: String,
}

impl NavigationRequest {
    pub fn new(path: impl Into<String>, full_path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            full_path: full_path.into(),
        }
    }

    /// A request with no query string.
    pub fn bare(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            full_path: path.clone(),
            path,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectQuery {
    /// The full path of the originally requested route, so a successful
    /// login can send the user back where they were headed.
    pub redirect: String,
}

/// A redirect produced instead of the requested navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectTarget {
    pub path: String,
    pub query: RedirectQuery,
}

impl RedirectTarget {
    /// Redirect to the login route, remembering where the user was going.
    pub fn login(from: &NavigationRequest) -> Self {
        Self {
            path: LOGIN_PATH.to_string(),
            query: RedirectQuery {
                redirect: from.full_path.clone(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn board_defaults_protect_only_home() {
        let table = RouteTable::board_defaults();
        assert!(table.resolve("/").unwrap().requires_auth);
        assert!(!table.resolve("/login").unwrap().requires_auth);
        assert!(!table.resolve("/logged-out").unwrap().requires_auth);
        assert!(table.resolve("/nope").is_none());
    }

    #[test]
    fn login_redirect_preserves_the_full_path() {
        let nav = NavigationRequest::new("/", "/?x=1");
        let redirect = RedirectTarget::login(&nav);
        assert_eq!(redirect.path, "/login");
        assert_eq!(redirect.query.redirect, "/?x=1");
    }
}
