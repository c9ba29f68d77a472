//! The static path-to-fragment table.
//!
//! Paths match exactly: trailing slashes, query strings, and parameters are
//! not normalized or parsed. Anything unmatched resolves to the fallback
//! entry, so resolution itself never fails.

use crate::navigator::PageContext;
use anyhow::{Error, anyhow};
use std::collections::HashMap;

/// Key the fallback entry is registered under.
pub const FALLBACK_KEY: &str = "404";

/// Path a failed fragment fetch redirects to. Deliberately absent from the
/// table so it resolves to the fallback entry.
pub const FALLBACK_REDIRECT_PATH: &str = "/404";

/// Initializer invoked synchronously after a route's markup is mounted.
pub type OnMount = Box<dyn Fn(&mut PageContext<'_>) -> Result<(), Error> + Send + Sync>;

pub struct Route {
    pub path: String,
    /// Fragment reference, joined onto the router's base URL.
    pub fragment: String,
    pub on_mount: Option<OnMount>,
}

/// Built once at startup and never mutated afterwards.
pub struct RouteTable {
    routes: HashMap<String, Route>,
    fallback: Route,
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field("fallback", &self.fallback.path)
            .finish()
    }
}

impl RouteTable {
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder {
            routes: Vec::new(),
            fallback: None,
        }
    }

    /// Resolve a path to its route, falling back for unknown paths. Pure:
    /// no fetching, no document access.
    pub fn resolve(&self, path: &str) -> &Route {
        self.routes.get(path).unwrap_or(&self.fallback)
    }

    pub fn fallback(&self) -> &Route {
        &self.fallback
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

pub struct RouteTableBuilder {
    routes: Vec<Route>,
    fallback: Option<Route>,
}

impl RouteTableBuilder {
    #[must_use]
    pub fn route(mut self, path: &str, fragment: &str, on_mount: Option<OnMount>) -> Self {
        self.routes.push(Route {
            path: path.to_owned(),
            fragment: fragment.to_owned(),
            on_mount,
        });
        self
    }

    /// Register the fallback entry rendered for unmatched paths.
    #[must_use]
    pub fn fallback(mut self, fragment: &str, on_mount: Option<OnMount>) -> Self {
        self.fallback = Some(Route {
            path: FALLBACK_KEY.to_owned(),
            fragment: fragment.to_owned(),
            on_mount,
        });
        self
    }

    /// # Errors
    ///
    /// Fails on a duplicate path, a route registered under the reserved
    /// fallback key, or a missing fallback entry.
    pub fn build(self) -> Result<RouteTable, Error> {
        let fallback = self
            .fallback
            .ok_or_else(|| anyhow!("route table needs a fallback entry"))?;
        let mut routes = HashMap::with_capacity(self.routes.len());
        for route in self.routes {
            if route.path == FALLBACK_KEY {
                return Err(anyhow!("route path {FALLBACK_KEY:?} is reserved for the fallback"));
            }
            let path = route.path.clone();
            if routes.insert(path.clone(), route).is_some() {
                return Err(anyhow!("duplicate route for path {path:?}"));
            }
        }
        Ok(RouteTable { routes, fallback })
    }
}
