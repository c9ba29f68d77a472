//! Toast notifications appended into the document.

use dom::{Document, NodeId};

pub const TOAST_CONTAINER_ID: &str = "toast-container";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
    Warning,
    Info,
}

impl ToastKind {
    fn class(self) -> &'static str {
        match self {
            Self::Success => "toast toast-success",
            Self::Error => "toast toast-error",
            Self::Warning => "toast toast-warning",
            Self::Info => "toast toast-info",
        }
    }
}

/// Show a toast. The container is created under `body` on first use.
pub fn show(document: &mut Document, message: &str, kind: ToastKind) -> NodeId {
    let container = container(document);
    let toast = document.create_element("div");
    document.set_attr(toast, "class", kind.class());
    document.append(container, toast);
    let text = document.create_text(message);
    document.append(toast, text);
    toast
}

/// Drop every visible toast.
pub fn clear(document: &mut Document) {
    if let Some(container) = document.element_by_id(TOAST_CONTAINER_ID) {
        for toast in document.children(container) {
            document.remove(toast);
        }
    }
}

fn container(document: &mut Document) -> NodeId {
    if let Some(existing) = document.element_by_id(TOAST_CONTAINER_ID) {
        return existing;
    }
    let parent = document.body().unwrap_or(document.root());
    let container = document.create_element("div");
    document.set_attr(container, "id", TOAST_CONTAINER_ID);
    document.append(parent, container);
    container
}
