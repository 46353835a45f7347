//! A small reference-counted DOM built by html5ever.
//!
//! The typesetter parses the container's markup into this tree, walks its
//! text nodes and writes the tree back out. Text nodes hold decoded text;
//! escaping happens again on output.

use crate::escape::{escape_attribute, escape_text};
use html5ever::driver::ParseOpts;
use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use html5ever::tree_builder::{ElementFlags, NodeOrText, QuirksMode, TreeSink};
use html5ever::{local_name, ns, Attribute, QualName};
use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Elements whose text is written back without escaping.
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "xmp", "iframe", "noembed", "noframes", "noscript", "plaintext",
];

pub type Handle = Rc<Node>;

#[derive(Debug)]
pub enum NodeData {
    Document,
    Doctype,
    Element {
        name: QualName,
        attrs: RefCell<Vec<Attribute>>,
    },
    Text {
        contents: RefCell<String>,
    },
    Comment {
        contents: String,
    },
}

pub struct Node {
    pub data: NodeData,
    parent: Cell<Option<Weak<Node>>>,
    pub children: RefCell<Vec<Handle>>,
}

impl Node {
    fn new(data: NodeData) -> Handle {
        Rc::new(Node {
            data,
            parent: Cell::new(None),
            children: RefCell::new(Vec::new()),
        })
    }

    fn text(contents: &str) -> Handle {
        Node::new(NodeData::Text {
            contents: RefCell::new(contents.to_string()),
        })
    }

    /// Local name of an element, lowercase for HTML elements.
    pub fn local_name(&self) -> Option<&str> {
        match &self.data {
            NodeData::Element { name, .. } => Some(&*name.local),
            _ => None,
        }
    }

    /// Value of the attribute with the given local name.
    pub fn attr(&self, local: &str) -> Option<String> {
        match &self.data {
            NodeData::Element { attrs, .. } => attrs
                .borrow()
                .iter()
                .find(|a| &*a.name.local == local)
                .map(|a| a.value.to_string()),
            _ => None,
        }
    }

    pub fn classes(&self) -> Vec<String> {
        self.attr("class")
            .map(|value| value.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    pub fn is_void(&self) -> bool {
        self.local_name().is_some_and(|n| VOID_ELEMENTS.contains(&n))
    }

    pub fn is_raw_text(&self) -> bool {
        self.local_name()
            .is_some_and(|n| RAW_TEXT_ELEMENTS.contains(&n))
    }

    fn parent(&self) -> Option<Handle> {
        let weak = self.parent.take();
        let parent = weak.as_ref().and_then(Weak::upgrade);
        self.parent.set(weak);
        parent
    }
}

fn append_node(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

fn insert_node(parent: &Handle, index: usize, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().insert(index, child);
}

fn detach(target: &Handle) {
    if let Some(parent) = target.parent.take().and_then(|weak| weak.upgrade()) {
        parent
            .children
            .borrow_mut()
            .retain(|child| !Rc::ptr_eq(child, target));
    }
}

fn child_index(parent: &Handle, child: &Handle) -> Option<usize> {
    parent
        .children
        .borrow()
        .iter()
        .position(|c| Rc::ptr_eq(c, child))
}

/// Append to an existing text node instead of starting a new one.
fn merge_text(node: Option<&Handle>, text: &str) -> bool {
    match node.map(|n| &n.data) {
        Some(NodeData::Text { contents }) => {
            contents.borrow_mut().push_str(text);
            true
        }
        _ => false,
    }
}

/// Tree builder target for [`parse_fragment`].
pub struct FragmentSink {
    document: Handle,
}

impl Default for FragmentSink {
    fn default() -> Self {
        Self {
            document: Node::new(NodeData::Document),
        }
    }
}

impl TreeSink for FragmentSink {
    type Handle = Handle;
    type Output = Handle;
    type ElemName<'a> = &'a QualName where Self: 'a;

    fn finish(self) -> Self::Output {
        self.document
    }

    fn parse_error(&self, _msg: Cow<'static, str>) {}

    fn get_document(&self) -> Self::Handle {
        self.document.clone()
    }

    fn elem_name<'a>(&'a self, target: &'a Self::Handle) -> Self::ElemName<'a> {
        static NO_NAME: QualName = QualName {
            prefix: None,
            ns: ns!(),
            local: local_name!(""),
        };

        match &target.data {
            NodeData::Element { name, .. } => name,
            _ => &NO_NAME,
        }
    }

    fn create_element(
        &self,
        name: QualName,
        attrs: Vec<Attribute>,
        _flags: ElementFlags,
    ) -> Self::Handle {
        Node::new(NodeData::Element {
            name,
            attrs: RefCell::new(attrs),
        })
    }

    fn create_comment(&self, text: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment {
            contents: text.to_string(),
        })
    }

    fn create_pi(&self, _target: StrTendril, _data: StrTendril) -> Self::Handle {
        Node::new(NodeData::Comment {
            contents: String::new(),
        })
    }

    fn append(&self, parent: &Self::Handle, child: NodeOrText<Self::Handle>) {
        match child {
            NodeOrText::AppendNode(node) => append_node(parent, node),
            NodeOrText::AppendText(text) => {
                let merged = merge_text(parent.children.borrow().last(), &text);
                if !merged {
                    append_node(parent, Node::text(&text));
                }
            }
        }
    }

    fn append_based_on_parent_node(
        &self,
        element: &Self::Handle,
        prev_element: &Self::Handle,
        child: NodeOrText<Self::Handle>,
    ) {
        if element.parent().is_some() {
            self.append_before_sibling(element, child);
        } else {
            self.append(prev_element, child);
        }
    }

    fn append_doctype_to_document(
        &self,
        _name: StrTendril,
        _public_id: StrTendril,
        _system_id: StrTendril,
    ) {
        append_node(&self.document, Node::new(NodeData::Doctype));
    }

    fn get_template_contents(&self, target: &Self::Handle) -> Self::Handle {
        target.clone()
    }

    fn same_node(&self, x: &Self::Handle, y: &Self::Handle) -> bool {
        Rc::ptr_eq(x, y)
    }

    fn set_quirks_mode(&self, _mode: QuirksMode) {}

    fn append_before_sibling(&self, sibling: &Self::Handle, new_node: NodeOrText<Self::Handle>) {
        let Some(parent) = sibling.parent() else {
            return;
        };

        match new_node {
            NodeOrText::AppendText(text) => {
                let Some(index) = child_index(&parent, sibling) else {
                    return;
                };
                let merged =
                    index > 0 && merge_text(parent.children.borrow().get(index - 1), &text);
                if !merged {
                    insert_node(&parent, index, Node::text(&text));
                }
            }
            NodeOrText::AppendNode(node) => {
                detach(&node);
                if let Some(index) = child_index(&parent, sibling) {
                    insert_node(&parent, index, node);
                }
            }
        }
    }

    fn add_attrs_if_missing(&self, target: &Self::Handle, attrs: Vec<Attribute>) {
        if let NodeData::Element {
            attrs: existing, ..
        } = &target.data
        {
            let mut existing = existing.borrow_mut();
            for attr in attrs {
                if !existing.iter().any(|a| a.name == attr.name) {
                    existing.push(attr);
                }
            }
        }
    }

    fn remove_from_parent(&self, target: &Self::Handle) {
        detach(target);
    }

    fn reparent_children(&self, node: &Self::Handle, new_parent: &Self::Handle) {
        let children = std::mem::take(&mut *node.children.borrow_mut());
        for child in children {
            append_node(new_parent, child);
        }
    }
}

/// Parse an HTML fragment, returning the `<body>` element that holds it.
pub fn parse_fragment(markup: &str) -> Handle {
    let wrapped = format!(
        "<!DOCTYPE html><html><head></head><body>{}</body></html>",
        markup
    );
    let document = parse_document(FragmentSink::default(), ParseOpts::default())
        .from_utf8()
        .one(wrapped.as_bytes());

    find_child(&document, "html")
        .and_then(|html| find_child(&html, "body"))
        .unwrap_or(document)
}

fn find_child(parent: &Handle, local: &str) -> Option<Handle> {
    parent
        .children
        .borrow()
        .iter()
        .find(|child| child.local_name() == Some(local))
        .cloned()
}

/// Write a node and everything below it.
pub fn serialize(node: &Handle, out: &mut String) {
    match &node.data {
        NodeData::Element { .. } => {
            write_start_tag(node, out);
            if !node.is_void() {
                serialize_children(node, out);
                write_end_tag(node, out);
            }
        }
        NodeData::Text { contents } => {
            if node.parent().is_some_and(|p| p.is_raw_text()) {
                out.push_str(&contents.borrow());
            } else {
                out.push_str(&escape_text(&contents.borrow()));
            }
        }
        NodeData::Comment { contents } => {
            out.push_str("<!--");
            out.push_str(contents);
            out.push_str("-->");
        }
        NodeData::Document => serialize_children(node, out),
        NodeData::Doctype => out.push_str("<!DOCTYPE html>"),
    }
}

pub fn serialize_children(node: &Handle, out: &mut String) {
    for child in node.children.borrow().iter() {
        serialize(child, out);
    }
}

pub fn write_start_tag(node: &Node, out: &mut String) {
    let NodeData::Element { name, attrs } = &node.data else {
        return;
    };
    out.push('<');
    out.push_str(&name.local);
    for attr in attrs.borrow().iter() {
        out.push(' ');
        if let Some(prefix) = &attr.name.prefix {
            out.push_str(prefix);
            out.push(':');
        }
        out.push_str(&attr.name.local);
        out.push_str("=\"");
        out.push_str(&escape_attribute(&attr.value));
        out.push('"');
    }
    out.push('>');
}

pub fn write_end_tag(node: &Node, out: &mut String) {
    if let Some(name) = node.local_name() {
        out.push_str("</");
        out.push_str(name);
        out.push('>');
    }
}
