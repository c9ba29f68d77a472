//! The navigation cycle: resolve, fetch, mount.

use crate::fetch::{FragmentSource, collect_markup};
use crate::history::History;
use crate::routes::{FALLBACK_REDIRECT_PATH, RouteTable};
use crate::telemetry::NavCounters;
use anyhow::Error;
use dom::Document;
use log::{debug, error, warn};
use serde_json::Value;
use std::sync::Arc;
use store::{SessionStorage, Store};
use tracing::info_span;
use url::Url;

/// Mutable collaborators a navigation operates on. Page initializers
/// receive the same view, so everything they need is injected rather than
/// reached through globals.
pub struct PageContext<'a> {
    pub document: &'a mut Document,
    pub store: &'a mut Store,
    pub storage: &'a mut dyn SessionStorage,
}

/// Mounted when the fallback fragment itself cannot be fetched, so a failed
/// navigation still ends on rendered content instead of recursing.
const BUILTIN_FALLBACK_MARKUP: &str = "<section class=\"error-page\">\
<h1>Page not found</h1>\
<p>The page could not be loaded. Try again from the home page.</p>\
</section>";

/// One navigation cycle in flight. Carries the generation stamp used to
/// discard completions that a later navigation has superseded.
#[derive(Debug, Clone)]
pub struct NavigationTicket {
    generation: u64,
    path: String,
    /// Set once the failure redirect has been taken, bounding recovery to a
    /// single extra cycle.
    redirected: bool,
}

impl NavigationTicket {
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// Result of finishing one cycle. `Redirect` asks the caller to run another
/// cycle for the fallback path.
#[derive(Debug)]
pub enum NavStep {
    Mounted { path: String },
    Superseded { path: String },
    Redirect(NavigationTicket),
    Recovered,
}

/// Terminal result of a driven navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavOutcome {
    /// The path's fragment (possibly the fallback's) is mounted.
    Mounted { path: String },
    /// A later navigation won; nothing was mounted for this one.
    Superseded { path: String },
    /// The built-in fallback markup is mounted.
    Recovered,
}

pub struct Router {
    table: RouteTable,
    /// Base every fragment reference is joined onto.
    base: Url,
    source: Arc<dyn FragmentSource>,
    history: History,
    /// Element id of the content region this router owns exclusively.
    content_region: String,
    generation: u64,
    counters: NavCounters,
}

impl Router {
    pub fn new(
        table: RouteTable,
        base: Url,
        source: Arc<dyn FragmentSource>,
        initial_path: &str,
    ) -> Self {
        Self {
            table,
            base,
            source,
            history: History::new(initial_path),
            content_region: String::from("app-content"),
            generation: 0,
            counters: NavCounters::default(),
        }
    }

    /// Override the content region element id.
    #[must_use]
    pub fn with_content_region(mut self, id: &str) -> Self {
        self.content_region = id.to_owned();
        self
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn counters(&self) -> NavCounters {
        self.counters
    }

    /// Start a navigation to `path`: push exactly one history entry and
    /// stamp a fresh generation. The fetch and mount happen in
    /// [`Router::load`] / [`Router::finish`], or via [`Router::navigate_to`].
    pub fn navigate(&mut self, path: &str, state: Option<Value>) -> NavigationTicket {
        self.history.push(path, state);
        self.begin(path)
    }

    /// Start a re-render of the current history entry without pushing.
    pub fn current_location(&mut self) -> NavigationTicket {
        let path = self.history.current_path().to_owned();
        self.begin(&path)
    }

    fn begin(&mut self, path: &str) -> NavigationTicket {
        self.generation = self.generation.wrapping_add(1);
        self.counters.navigations += 1;
        debug!("resolving {path}");
        NavigationTicket {
            generation: self.generation,
            path: path.to_owned(),
            redirected: false,
        }
    }

    /// Resolve the ticket's path and fetch its fragment markup. The only
    /// suspension point in the cycle; takes `&self` so navigations may
    /// overlap.
    ///
    /// # Errors
    ///
    /// Returns an error when the fragment URL is malformed or the fetch
    /// fails; [`Router::finish`] turns that into the failure redirect.
    pub async fn load(&self, ticket: &NavigationTicket) -> Result<String, Error> {
        let route = self.table.resolve(&ticket.path);
        let url = self.base.join(&route.fragment)?;
        debug!("fetching {url}");
        let stream = self.source.fetch(&url).await?;
        collect_markup(stream).await
    }

    /// Complete a cycle with the loaded markup (or fetch error).
    ///
    /// Stale tickets are discarded before anything touches the document, so
    /// the last-requested path wins. On a fetch failure the navigation is
    /// redirected once to the fallback path; if that cycle fails too, the
    /// built-in markup is mounted.
    ///
    /// # Errors
    ///
    /// Propagates errors from the route's initializer.
    pub fn finish(
        &mut self,
        ctx: &mut PageContext<'_>,
        ticket: &NavigationTicket,
        loaded: Result<String, Error>,
    ) -> Result<NavStep, Error> {
        if ticket.generation != self.generation {
            self.counters.superseded += 1;
            debug!("discarding superseded navigation to {}", ticket.path);
            return Ok(NavStep::Superseded {
                path: ticket.path.clone(),
            });
        }
        match loaded {
            Ok(markup) => {
                self.mount(ctx, &ticket.path, &markup)?;
                Ok(NavStep::Mounted {
                    path: ticket.path.clone(),
                })
            }
            Err(err) => {
                self.counters.fetch_failures += 1;
                error!("failed to load fragment for {}: {err}", ticket.path);
                if ticket.redirected {
                    self.mount_builtin_fallback(ctx);
                    Ok(NavStep::Recovered)
                } else {
                    self.history.push(FALLBACK_REDIRECT_PATH, None);
                    Ok(NavStep::Redirect(NavigationTicket {
                        generation: ticket.generation,
                        path: FALLBACK_REDIRECT_PATH.to_owned(),
                        redirected: true,
                    }))
                }
            }
        }
    }

    /// Navigate to `path`, driving the full cycle (and at most one failure
    /// redirect) to completion.
    ///
    /// Unknown paths are not an error; they mount the fallback fragment.
    ///
    /// # Errors
    ///
    /// Propagates initializer errors only.
    pub async fn navigate_to(
        &mut self,
        ctx: &mut PageContext<'_>,
        path: &str,
        state: Option<Value>,
    ) -> Result<NavOutcome, Error> {
        let span = info_span!("navigation", path = %path);
        let _guard = span.enter();
        let ticket = self.navigate(path, state);
        self.drive(ctx, ticket).await
    }

    /// Re-resolve and re-render the current location. Used for the initial
    /// render and after history moves; never cached, so calling it twice
    /// fetches and mounts twice.
    ///
    /// # Errors
    ///
    /// Propagates initializer errors only.
    pub async fn handle_location(
        &mut self,
        ctx: &mut PageContext<'_>,
    ) -> Result<NavOutcome, Error> {
        let ticket = self.current_location();
        self.drive(ctx, ticket).await
    }

    /// Move back one history entry and re-render. `None` when already at
    /// the oldest entry.
    ///
    /// # Errors
    ///
    /// Propagates initializer errors only.
    pub async fn back(&mut self, ctx: &mut PageContext<'_>) -> Result<Option<NavOutcome>, Error> {
        if self.history.back() {
            Ok(Some(self.handle_location(ctx).await?))
        } else {
            Ok(None)
        }
    }

    /// Move forward one history entry and re-render. `None` when already at
    /// the newest entry.
    ///
    /// # Errors
    ///
    /// Propagates initializer errors only.
    pub async fn forward(
        &mut self,
        ctx: &mut PageContext<'_>,
    ) -> Result<Option<NavOutcome>, Error> {
        if self.history.forward() {
            Ok(Some(self.handle_location(ctx).await?))
        } else {
            Ok(None)
        }
    }

    async fn drive(
        &mut self,
        ctx: &mut PageContext<'_>,
        mut ticket: NavigationTicket,
    ) -> Result<NavOutcome, Error> {
        loop {
            let loaded = self.load(&ticket).await;
            match self.finish(ctx, &ticket, loaded)? {
                NavStep::Mounted { path } => return Ok(NavOutcome::Mounted { path }),
                NavStep::Superseded { path } => return Ok(NavOutcome::Superseded { path }),
                NavStep::Recovered => return Ok(NavOutcome::Recovered),
                NavStep::Redirect(next) => ticket = next,
            }
        }
    }

    /// Replace the content region wholesale, then run the route's
    /// initializer synchronously.
    fn mount(
        &mut self,
        ctx: &mut PageContext<'_>,
        path: &str,
        markup: &str,
    ) -> Result<(), Error> {
        let Some(region) = ctx.document.element_by_id(&self.content_region) else {
            warn!(
                "content region #{} missing; skipping mount for {path}",
                self.content_region
            );
            return Ok(());
        };
        ctx.document.set_inner_html(region, markup);
        debug!("mounted {path}");
        self.counters.mounts += 1;
        let route = self.table.resolve(path);
        if let Some(on_mount) = route.on_mount.as_ref() {
            on_mount(ctx)?;
        }
        Ok(())
    }

    fn mount_builtin_fallback(&mut self, ctx: &mut PageContext<'_>) {
        self.counters.fallback_mounts += 1;
        if let Some(region) = ctx.document.element_by_id(&self.content_region) {
            ctx.document.set_inner_html(region, BUILTIN_FALLBACK_MARKUP);
        }
    }
}
