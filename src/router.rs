//! Route table
//!
//! Maps dashboard paths to pages. The table is fixed at construction; `/`
//! redirects to `/dashboard`. Unknown paths resolve to `None` and the caller
//! decides how to present a not-found.

use crate::consts::cli_consts::MAX_REDIRECTS;

/// A page the dashboard can render.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, strum::Display, strum::EnumIter)]
pub enum Page {
    Dashboard,
    Tools,
    Analytics,
    Settings,
}

/// What a route points at.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum RouteTarget {
    Page(Page),
    Redirect(&'static str),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Route {
    pub path: &'static str,
    pub target: RouteTarget,
}

const ROUTES: &[Route] = &[
    Route {
        path: "/",
        target: RouteTarget::Redirect("/dashboard"),
    },
    Route {
        path: "/dashboard",
        target: RouteTarget::Page(Page::Dashboard),
    },
    Route {
        path: "/tools",
        target: RouteTarget::Page(Page::Tools),
    },
    Route {
        path: "/analytics",
        target: RouteTarget::Page(Page::Analytics),
    },
    Route {
        path: "/settings",
        target: RouteTarget::Page(Page::Settings),
    },
];

#[derive(Debug, Clone)]
pub struct Router {
    routes: &'static [Route],
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl Router {
    pub fn new() -> Self {
        Self { routes: ROUTES }
    }

    pub fn routes(&self) -> &[Route] {
        self.routes
    }

    /// Finds the route declared for `path`, without following redirects.
    ///
    /// Matching ignores case, a trailing slash, the query string and the fragment.
    pub fn find(&self, path: &str) -> Option<&Route> {
        let wanted = normalize_path(path);
        self.routes
            .iter()
            .find(|route| route.path.eq_ignore_ascii_case(&wanted))
    }

    /// Resolves `path` to the page it renders, following redirects.
    pub fn resolve(&self, path: &str) -> Option<Page> {
        let mut current = path.to_string();
        for _ in 0..=MAX_REDIRECTS {
            match self.find(&current)?.target {
                RouteTarget::Page(page) => return Some(page),
                RouteTarget::Redirect(to) => {
                    log::debug!("Redirecting {} -> {}", current, to);
                    current = to.to_string();
                }
            }
        }
        log::warn!("Too many redirects while resolving {}", path);
        None
    }

    /// Canonical path of `page`.
    pub fn path_of(&self, page: Page) -> Option<&'static str> {
        self.routes
            .iter()
            .find(|route| route.target == RouteTarget::Page(page))
            .map(|route| route.path)
    }
}

fn normalize_path(path: &str) -> String {
    let path = path.trim();
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_root_redirects_to_dashboard() {
        let router = Router::new();
        assert_eq!(router.resolve("/"), router.resolve("/dashboard"));
        assert_eq!(router.resolve("/"), Some(Page::Dashboard));
        assert_eq!(
            router.find("/").map(|r| r.target),
            Some(RouteTarget::Redirect("/dashboard"))
        );
    }

    #[test]
    fn test_exact_path_set() {
        let router = Router::new();
        let paths: Vec<_> = router.routes().iter().map(|r| r.path).collect();
        assert_eq!(
            paths,
            vec!["/", "/dashboard", "/tools", "/analytics", "/settings"]
        );
        let redirects = router
            .routes()
            .iter()
            .filter(|r| matches!(r.target, RouteTarget::Redirect(_)))
            .count();
        assert_eq!(redirects, 1);
    }

    #[test]
    fn test_every_page_has_a_path() {
        let router = Router::new();
        for page in Page::iter() {
            let path = router.path_of(page).unwrap();
            assert_eq!(router.resolve(path), Some(page));
        }
    }

    #[test]
    fn test_lenient_matching() {
        let router = Router::new();
        assert_eq!(router.resolve("/tools/"), Some(Page::Tools));
        assert_eq!(router.resolve("/Analytics"), Some(Page::Analytics));
        assert_eq!(router.resolve("/settings?tab=general"), Some(Page::Settings));
        assert_eq!(router.resolve("/dashboard#spend"), Some(Page::Dashboard));
        assert_eq!(router.resolve("tools"), Some(Page::Tools));
        assert_eq!(router.resolve(""), Some(Page::Dashboard));
    }

    #[test]
    /// Unknown paths are left to the caller.
    fn test_unmatched_paths_resolve_to_none() {
        let router = Router::new();
        assert_eq!(router.resolve("/billing"), None);
        assert_eq!(router.resolve("/tools/42"), None);
    }

    #[test]
    fn test_redirect_cycle_resolves_to_none() {
        static CYCLE: &[Route] = &[
            Route {
                path: "/a",
                target: RouteTarget::Redirect("/b"),
            },
            Route {
                path: "/b",
                target: RouteTarget::Redirect("/a"),
            },
        ];
        let router = Router { routes: CYCLE };
        assert_eq!(router.resolve("/a"), None);
    }
}
