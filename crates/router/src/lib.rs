//! Client-side routing for the marketplace shell.
//!
//! Translates a literal URL path into mounted content: a static route table
//! resolves the path to a fragment reference, the fragment's markup is
//! fetched as a byte stream, and the markup replaces the shell's content
//! region wholesale before the route's initializer runs. Browser-style
//! history (push/back/forward) and interception of marked internal links
//! live here too.
//!
//! Navigations are sequenced by a monotonic generation counter: a fetch
//! that completes for a superseded navigation is discarded, so the
//! last-requested path always wins.

pub mod fetch;
pub mod history;
pub mod links;
pub mod navigator;
pub mod routes;
pub mod telemetry;

pub use fetch::{ByteStream, FetchFuture, FragmentSource, HttpSource, MemorySource, collect_markup};
pub use history::{History, HistoryEntry};
pub use links::{INTERNAL_LINK_ATTR, internal_link_target};
pub use navigator::{NavOutcome, NavStep, NavigationTicket, PageContext, Router};
pub use routes::{
    FALLBACK_KEY, FALLBACK_REDIRECT_PATH, OnMount, Route, RouteTable, RouteTableBuilder,
};
