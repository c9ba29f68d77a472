use indextree::{Arena, NodeId};
use smallvec::SmallVec;

#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
}

impl DomNode {
    pub fn element(tag: &str) -> Self {
        Self {
            kind: NodeKind::Element {
                tag: tag.to_owned(),
            },
            attrs: SmallVec::new(),
        }
    }

    pub fn text(text: &str) -> Self {
        Self {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            attrs: SmallVec::new(),
        }
    }
}

/// A parsed page held as an arena tree. The router owns exactly one of these
/// per shell and swaps fragment markup into its content region.
pub struct Document {
    pub(crate) arena: Arena<DomNode>,
    pub(crate) root: NodeId,
}

impl Document {
    /// Create an empty document containing only the document node.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::default());
        Self { arena, root }
    }

    /// Parse full-page markup. html5ever recovers from malformed input, so
    /// this always yields a tree (possibly just the implied html/head/body).
    pub fn parse(markup: &str) -> Self {
        crate::parser::parse(markup)
    }

    pub(crate) fn from_arena(arena: Arena<DomNode>, root: NodeId) -> Self {
        Self { arena, root }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// The body element, when the parsed markup produced one.
    pub fn body(&self) -> Option<NodeId> {
        self.first_by_tag("body")
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(DomNode::element(tag))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode::text(text))
    }

    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }

    /// Detach and drop a subtree.
    pub fn remove(&mut self, node: NodeId) {
        node.remove_subtree(&mut self.arena);
    }

    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.arena.get(node)?.get().kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    pub fn attr(&self, node: NodeId, name: &str) -> Option<&str> {
        self.arena
            .get(node)?
            .get()
            .attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    pub fn set_attr(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(entry) = self.arena.get_mut(node) else {
            return;
        };
        let attrs = &mut entry.get_mut().attrs;
        if let Some(slot) = attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value.to_owned();
        } else {
            attrs.push((name.to_owned(), value.to_owned()));
        }
    }

    /// Direct children, collected so callers can mutate while iterating.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena).collect()
    }

    /// First element (in document order) whose `id` attribute matches.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.root
            .descendants(&self.arena)
            .find(|node| self.attr(*node, "id") == Some(id))
    }

    /// First element (in document order) with the given tag name.
    pub fn first_by_tag(&self, tag: &str) -> Option<NodeId> {
        self.root
            .descendants(&self.arena)
            .find(|node| self.tag(*node) == Some(tag))
    }

    /// Nearest ancestor (including the node itself) satisfying the
    /// predicate. Mirrors the delegated-handler `closest()` idiom.
    pub fn closest(
        &self,
        node: NodeId,
        pred: impl Fn(&Self, NodeId) -> bool,
    ) -> Option<NodeId> {
        node.ancestors(&self.arena)
            .find(|candidate| pred(self, *candidate))
    }

    /// Concatenated text of the subtree rooted at `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        for descendant in node.descendants(&self.arena) {
            if let Some(entry) = self.arena.get(descendant) {
                if let NodeKind::Text { text } = &entry.get().kind {
                    out.push_str(text);
                }
            }
        }
        out
    }

    /// Replace the node's children with a single text node.
    pub fn set_text(&mut self, node: NodeId, text: &str) {
        self.clear_children(node);
        let child = self.create_text(text);
        self.append(node, child);
    }

    /// Replace the node's children wholesale with parsed fragment markup.
    /// No diffing: everything under `node` is dropped first.
    pub fn set_inner_html(&mut self, node: NodeId, markup: &str) {
        let fragment = Self::parse(markup);
        let source = fragment.body().unwrap_or(fragment.root);
        self.clear_children(node);
        for child in fragment.children(source) {
            self.adopt(node, &fragment, child);
        }
    }

    fn clear_children(&mut self, node: NodeId) {
        for child in self.children(node) {
            child.remove_subtree(&mut self.arena);
        }
    }

    /// Deep-copy a subtree out of another document under `parent`.
    fn adopt(&mut self, parent: NodeId, other: &Self, other_node: NodeId) {
        let Some(entry) = other.arena.get(other_node) else {
            return;
        };
        let copied = self.arena.new_node(entry.get().clone());
        parent.append(copied, &mut self.arena);
        for child in other.children(other_node) {
            self.adopt(copied, other, child);
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
