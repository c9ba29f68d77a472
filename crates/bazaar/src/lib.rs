//! Application shell for the Bazaar marketplace front-end.
//!
//! Wires the document, state store, session storage, and router into one
//! runnable shell, and carries the page modules that make it a marketplace:
//! route initializers, session handling, the API client, the inline mock
//! catalog, and small UI helpers.

pub mod api;
pub mod app;
pub mod config;
pub mod mock;
pub mod pages;
pub mod session;
pub mod toast;
pub mod util;

pub use app::{App, CONTENT_REGION_ID};
pub use config::ShellConfig;
