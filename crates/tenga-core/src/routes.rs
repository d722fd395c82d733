//! Application routes and navigation guard
//!
//! Pure route model, no I/O: the six client views, path parsing and
//! formatting, and the authentication guard that runs before every
//! navigation. The guard checks credential *presence* only; an
//! expired-but-present key is caught reactively when a backend call
//! returns 401.

use std::fmt;

/// Path of the login view
pub const LOGIN_PATH: &str = "/login";

/// The client's views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Login / API key entry
    Login,
    /// Document list
    Home,
    /// Creating a new document
    DocumentNew,
    /// Viewing a document
    Document(i64),
    /// Editing a document
    DocumentEdit(i64),
    /// Version history of a document
    VersionHistory(i64),
}

impl Route {
    /// Parse a path (query string ignored) into a route
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.split('?').next().unwrap_or(path);
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        match segments.as_slice() {
            [] => Some(Route::Home),
            ["login"] => Some(Route::Login),
            ["documents", "new"] => Some(Route::DocumentNew),
            ["documents", id] => id.parse().ok().map(Route::Document),
            ["documents", id, "edit"] => id.parse().ok().map(Route::DocumentEdit),
            ["documents", id, "versions"] => id.parse().ok().map(Route::VersionHistory),
            _ => None,
        }
    }

    /// The canonical path of this route
    pub fn path(&self) -> String {
        match self {
            Route::Login => LOGIN_PATH.to_string(),
            Route::Home => "/".to_string(),
            Route::DocumentNew => "/documents/new".to_string(),
            Route::Document(id) => format!("/documents/{}", id),
            Route::DocumentEdit(id) => format!("/documents/{}/edit", id),
            Route::VersionHistory(id) => format!("/documents/{}/versions", id),
        }
    }

    /// Whether navigating here requires a present credential
    pub fn requires_auth(&self) -> bool {
        !matches!(self, Route::Login)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.path())
    }
}

/// Outcome of the navigation guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    /// Navigation may proceed
    Proceed(Route),
    /// No credential present; go to login instead
    RedirectToLogin {
        /// The originally intended path, to resume after login
        redirect: String,
    },
}

impl Navigation {
    /// The login path carrying the preserved redirect, if this is a
    /// redirect outcome
    pub fn login_path(&self) -> Option<String> {
        match self {
            Navigation::Proceed(_) => None,
            Navigation::RedirectToLogin { redirect } => {
                Some(format!("{}?redirect={}", LOGIN_PATH, redirect))
            }
        }
    }
}

/// The guard run before every navigation
///
/// Any route that requires authentication is blocked while no
/// credential is present, preserving the intended path for a post-login
/// redirect. All other navigations proceed unconditionally.
pub fn guard(route: Route, authenticated: bool) -> Navigation {
    if route.requires_auth() && !authenticated {
        Navigation::RedirectToLogin {
            redirect: route.path(),
        }
    } else {
        Navigation::Proceed(route)
    }
}

/// Extract the preserved redirect path from a login query string
pub fn redirect_target(query: &str) -> Option<&str> {
    query
        .split('&')
        .find_map(|pair| pair.strip_prefix("redirect="))
        .filter(|target| !target.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    const AUTH_ROUTES: &[Route] = &[
        Route::Home,
        Route::DocumentNew,
        Route::Document(7),
        Route::DocumentEdit(7),
        Route::VersionHistory(7),
    ];

    #[test]
    fn test_parse_round_trip() {
        let routes = [
            Route::Login,
            Route::Home,
            Route::DocumentNew,
            Route::Document(12),
            Route::DocumentEdit(12),
            Route::VersionHistory(12),
        ];

        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_parse_ignores_query() {
        assert_eq!(
            Route::parse("/login?redirect=/documents/5"),
            Some(Route::Login)
        );
        assert_eq!(Route::parse("/documents/5?foo=bar"), Some(Route::Document(5)));
    }

    #[test]
    fn test_parse_rejects_unknown_paths() {
        assert_eq!(Route::parse("/documents/abc"), None);
        assert_eq!(Route::parse("/documents/5/history"), None);
        assert_eq!(Route::parse("/settings"), None);
    }

    #[test]
    fn test_new_takes_precedence_over_id() {
        // "/documents/new" is the creation view, not a document id
        assert_eq!(Route::parse("/documents/new"), Some(Route::DocumentNew));
    }

    #[test]
    fn test_only_login_is_public() {
        assert!(!Route::Login.requires_auth());
        for route in AUTH_ROUTES {
            assert!(route.requires_auth(), "{} should require auth", route);
        }
    }

    #[test]
    fn test_guard_blocks_unauthenticated_and_preserves_path() {
        for route in AUTH_ROUTES {
            match guard(*route, false) {
                Navigation::RedirectToLogin { redirect } => {
                    assert_eq!(redirect, route.path());
                }
                other => panic!("{} should redirect, got {:?}", route, other),
            }
        }
    }

    #[test]
    fn test_guard_allows_authenticated() {
        for route in AUTH_ROUTES {
            assert_eq!(guard(*route, true), Navigation::Proceed(*route));
        }
    }

    #[test]
    fn test_guard_never_blocks_login() {
        assert_eq!(guard(Route::Login, false), Navigation::Proceed(Route::Login));
        assert_eq!(guard(Route::Login, true), Navigation::Proceed(Route::Login));
    }

    #[test]
    fn test_login_path_carries_redirect() {
        let nav = guard(Route::DocumentEdit(5), false);
        assert_eq!(
            nav.login_path().unwrap(),
            "/login?redirect=/documents/5/edit"
        );
        assert_eq!(guard(Route::Home, true).login_path(), None);
    }

    #[test]
    fn test_redirect_target_round_trip() {
        let nav = guard(Route::VersionHistory(3), false);
        let login_path = nav.login_path().unwrap();
        let query = login_path.split('?').nth(1).unwrap();

        assert_eq!(redirect_target(query), Some("/documents/3/versions"));
        assert_eq!(
            Route::parse(redirect_target(query).unwrap()),
            Some(Route::VersionHistory(3))
        );
    }

    #[test]
    fn test_redirect_target_missing_or_empty() {
        assert_eq!(redirect_target("foo=bar"), None);
        assert_eq!(redirect_target("redirect="), None);
    }
}
