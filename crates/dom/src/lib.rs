//! Retained document tree for the marketplace shell.
//!
//! Holds the host page and everything the router mounts into it. Markup is
//! parsed with html5ever into an `indextree` arena; the tree exposes the
//! small query/mutation surface the shell needs (id lookup, ancestor walks,
//! wholesale child replacement) plus deterministic serialization for tests.

pub mod document;
pub mod parser;
mod printing;

pub use document::{Document, DomNode, NodeKind};
pub use indextree::NodeId;
