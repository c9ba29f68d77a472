//! html5ever front-end building the arena document.
//!
//! The sink collects nodes behind `RefCell` interior mutability (the
//! html5ever tree builder drives it through `&self`) and converts to the
//! arena representation when parsing finishes. Element names are kept so
//! the tree builder's scope checks see real tags.

use crate::document::{Document, DomNode, NodeKind};
use html5ever::interface::ElemName;
use html5ever::tendril::{StrTendril, TendrilSink as _};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{
    Attribute, LocalName, Namespace, ParseOpts, QualName, local_name, namespace_url, ns,
    parse_document,
};
use indextree::Arena;
use smallvec::SmallVec;
use std::borrow::Cow;
use std::cell::RefCell;

/// Parse full-page markup into a `Document`.
pub fn parse(markup: &str) -> Document {
    parse_document(ArenaSink::new(), ParseOpts::default()).one(StrTendril::from(markup))
}

struct SinkNode {
    data: DomNode,
    /// Qualified name for elements; queried by the tree builder.
    name: Option<QualName>,
    children: Vec<usize>,
    parent: Option<usize>,
}

impl SinkNode {
    fn new(data: DomNode, name: Option<QualName>) -> Self {
        Self {
            data,
            name,
            children: Vec::new(),
            parent: None,
        }
    }
}

/// Element name handed back to the tree builder; owns its `QualName` so the
/// sink can keep node storage behind a `RefCell`.
#[derive(Debug)]
pub struct OwnedElemName(QualName);

impl ElemName for OwnedElemName {
    fn ns(&self) -> &Namespace {
        &self.0.ns
    }

    fn local_name(&self) -> &LocalName {
        &self.0.local
    }
}

pub(crate) struct ArenaSink {
    nodes: RefCell<Vec<SinkNode>>,
}

impl ArenaSink {
    pub(crate) fn new() -> Self {
        let document = SinkNode::new(DomNode::default(), None);
        Self {
            nodes: RefCell::new(vec![document]),
        }
    }

    fn push_node(&self, node: SinkNode) -> usize {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(node);
        nodes.len() - 1
    }

    fn new_text(&self, text: &str) -> usize {
        self.push_node(SinkNode::new(DomNode::text(text), None))
    }

    /// Detach `child` from its current parent, if any.
    fn detach(nodes: &mut [SinkNode], child: usize) {
        if let Some(parent) = nodes[child].parent.take() {
            nodes[parent].children.retain(|existing| *existing != child);
        }
    }

    fn attach(&self, parent: usize, child: usize) {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach(&mut nodes, child);
        nodes[child].parent = Some(parent);
        nodes[parent].children.push(child);
    }

    /// Append text, merging into a trailing text sibling when present.
    fn attach_text(&self, parent: usize, text: &StrTendril) {
        {
            let mut nodes = self.nodes.borrow_mut();
            if let Some(last) = nodes[parent].children.last().copied() {
                if let NodeKind::Text { text: existing } = &mut nodes[last].data.kind {
                    existing.push_str(text);
                    return;
                }
            }
        }
        let node = self.new_text(text);
        self.attach(parent, node);
    }

    fn build(self) -> Document {
        let nodes = self.nodes.into_inner();
        let mut arena = Arena::new();
        let root = arena.new_node(DomNode::default());

        fn copy_children(
            nodes: &[SinkNode],
            index: usize,
            arena: &mut Arena<DomNode>,
            parent: indextree::NodeId,
        ) {
            for child in &nodes[index].children {
                let node = arena.new_node(nodes[*child].data.clone());
                parent.append(node, arena);
                copy_children(nodes, *child, arena, node);
            }
        }

        copy_children(&nodes, 0, &mut arena, root);
        Document::from_arena(arena, root)
    }
}

impl TreeSink for ArenaSink {
    type Handle = usize;
    type Output = Document;
    type ElemName<'a>
        = OwnedElemName
    where
        Self: 'a;

    fn finish(self) -> Document {
        self.build()
    }

    fn parse_error(&self, msg: Cow<'static, str>) {
        log::trace!("html parse error: {msg}");
    }

    fn get_document(&self) -> usize {
        0
    }

    fn elem_name<'a>(&'a self, target: &'a usize) -> OwnedElemName {
        let nodes = self.nodes.borrow();
        let name = nodes
            .get(*target)
            .and_then(|node| node.name.clone())
            .unwrap_or_else(|| QualName::new(None, ns!(), local_name!("")));
        OwnedElemName(name)
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> usize {
        let mut data = DomNode::element(&name.local);
        for attr in attrs {
            data.attrs
                .push((attr.name.local.to_string(), attr.value.to_string()));
        }
        self.push_node(SinkNode::new(data, Some(name)))
    }

    fn create_comment(&self, text: StrTendril) -> usize {
        let data = DomNode {
            kind: NodeKind::Comment {
                text: text.to_string(),
            },
            attrs: SmallVec::new(),
        };
        self.push_node(SinkNode::new(data, None))
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> usize {
        let data = DomNode {
            kind: NodeKind::Comment {
                text: String::new(),
            },
            attrs: SmallVec::new(),
        };
        self.push_node(SinkNode::new(data, None))
    }

    fn append(&self, parent: &usize, child: NodeOrText<usize>) {
        match child {
            NodeOrText::AppendNode(node) => self.attach(*parent, node),
            NodeOrText::AppendText(text) => self.attach_text(*parent, &text),
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &usize,
        _prev_element: &usize,
        child: NodeOrText<usize>,
    ) {
        self.append(element, child);
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        // Doctype carries no information the shell uses.
    }

    fn get_template_contents(&self, target: &usize) -> usize {
        *target
    }

    fn same_node(&self, x: &usize, y: &usize) -> bool {
        x == y
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &usize, new_node: NodeOrText<usize>) {
        let child = match new_node {
            NodeOrText::AppendNode(node) => node,
            NodeOrText::AppendText(text) => self.new_text(&text),
        };
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes[*sibling].parent else {
            return;
        };
        Self::detach(&mut nodes, child);
        nodes[child].parent = Some(parent);
        let position = nodes[parent]
            .children
            .iter()
            .position(|existing| existing == sibling)
            .unwrap_or(nodes[parent].children.len());
        nodes[parent].children.insert(position, child);
    }

    fn add_attrs_if_missing(&self, target: &usize, attrs: Vec<Attribute>) {
        let mut nodes = self.nodes.borrow_mut();
        let existing = &mut nodes[*target].data.attrs;
        for attr in attrs {
            let key = attr.name.local.to_string();
            if !existing.iter().any(|(name, _)| *name == key) {
                existing.push((key, attr.value.to_string()));
            }
        }
    }

    fn remove_from_parent(&self, target: &usize) {
        let mut nodes = self.nodes.borrow_mut();
        Self::detach(&mut nodes, *target);
    }

    fn reparent_children(&self, node: &usize, new_parent: &usize) {
        let mut nodes = self.nodes.borrow_mut();
        let moved = core::mem::take(&mut nodes[*node].children);
        for child in &moved {
            nodes[*child].parent = Some(*new_parent);
        }
        nodes[*new_parent].children.extend(moved);
    }
}
