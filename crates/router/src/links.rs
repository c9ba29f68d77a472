//! Interception of clicks on marked internal links.

use dom::{Document, NodeId};

/// Boolean attribute marking an anchor as an internal route; clicks on such
/// anchors are routed client-side instead of triggering a full page load.
pub const INTERNAL_LINK_ATTR: &str = "data-internal-link";

/// Walk from the clicked node to the nearest enclosing marked anchor and
/// return its `href`. `None` means the click should proceed untouched.
pub fn internal_link_target(document: &Document, node: NodeId) -> Option<String> {
    let anchor = document.closest(node, |doc, candidate| {
        doc.tag(candidate) == Some("a") && doc.attr(candidate, INTERNAL_LINK_ATTR).is_some()
    })?;
    document.attr(anchor, "href").map(str::to_owned)
}
