//! Router-backed navigation.
//!
//! [`RouterNavigator`] adapts `leptos_router`'s navigate function to the
//! guard's [`Navigator`] seam. Destinations that match no route in the
//! application are refused up front so callers can fall back instead of
//! landing on the "not found" view.

use leptos_router::NavigateOptions;
use std::rc::Rc;
use vibe_flow_route_guard::{NavigationError, NavigationMode, Navigator};

/// Routes served by the application, excluding parameterized ones.
pub const ROUTES: &[&str] = &[
    "/",
    "/portfolio",
    "/blog",
    "/auth",
    "/dashboard",
    "/blog-manager",
    "/contact-forms",
    "/analytics",
];

/// Route prefixes followed by a single path parameter.
const PARAMETERIZED_ROUTES: &[&str] = &["/blog/"];

/// Returns true when `destination` resolves to a route of the application.
///
/// Query string and fragment are ignored; a trailing slash is tolerated.
pub fn is_known_route(destination: &str) -> bool {
    let path = destination
        .split(['?', '#'])
        .next()
        .unwrap_or(destination);
    let path = match path.strip_suffix('/') {
        Some(trimmed) if !trimmed.is_empty() => trimmed,
        _ => path,
    };

    ROUTES.contains(&path)
        || PARAMETERIZED_ROUTES.iter().any(|prefix| {
            path.strip_prefix(prefix)
                .is_some_and(|param| !param.is_empty() && !param.contains('/'))
        })
}

/// Navigator that drives the application router.
#[derive(Clone)]
pub struct RouterNavigator {
    navigate: Rc<dyn Fn(&str, NavigateOptions)>,
}

impl RouterNavigator {
    /// Wraps a navigate function, usually from `use_navigate()`.
    pub fn new(navigate: impl Fn(&str, NavigateOptions) + 'static) -> Self {
        Self {
            navigate: Rc::new(navigate),
        }
    }
}

impl Navigator for RouterNavigator {
    fn navigate(&self, destination: &str, mode: NavigationMode) -> Result<(), NavigationError> {
        if !is_known_route(destination) {
            return Err(NavigationError::RouteNotFound {
                path: destination.to_string(),
            });
        }

        (self.navigate)(
            destination,
            NavigateOptions {
                replace: mode.is_replace(),
                ..NavigateOptions::default()
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn known_routes_resolve() {
        for path in ["/", "/blog", "/dashboard", "/dashboard/", "/blog?page=2", "/auth#top"] {
            assert!(is_known_route(path), "path {path:?}");
        }
    }

    #[test]
    fn post_routes_resolve() {
        assert!(is_known_route("/blog/hello-world"));
        assert!(!is_known_route("/blog/a/b"));
    }

    #[test]
    fn unknown_routes_do_not_resolve() {
        for path in ["/no-such-page", "/dashboards", "", "dashboard", "/admin"] {
            assert!(!is_known_route(path), "path {path:?}");
        }
    }

    #[test]
    fn navigator_forwards_replace_mode() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let navigator = RouterNavigator::new({
            let calls = calls.clone();
            move |to: &str, options: NavigateOptions| {
                calls.borrow_mut().push((to.to_string(), options.replace));
            }
        });

        navigator
            .navigate("/auth?returnUrl=%2Fblog", NavigationMode::Replace)
            .expect("known route");
        navigator
            .navigate("/blog", NavigationMode::Push)
            .expect("known route");

        assert_eq!(
            *calls.borrow(),
            vec![
                ("/auth?returnUrl=%2Fblog".to_string(), true),
                ("/blog".to_string(), false),
            ]
        );
    }

    #[test]
    fn navigator_refuses_unknown_routes() {
        let navigator = RouterNavigator::new(|_: &str, _: NavigateOptions| {
            panic!("router must not be called");
        });

        let err = navigator
            .navigate("/gone", NavigationMode::Push)
            .expect_err("unknown route");
        assert_eq!(
            err,
            NavigationError::RouteNotFound {
                path: "/gone".to_string()
            }
        );
    }
}
