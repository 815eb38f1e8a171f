use quick_xml::NsReader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::name::ResolveResult;

use crate::common::error::GDataError;

/// Handle to a node inside a [`Document`] arena. Only valid for the document
/// that minted it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A single attribute, stored as written (prefix included) with its value
/// already entity-decoded. Namespace declarations (`xmlns`, `xmlns:*`) are
/// kept here too so a subtree round-trips byte-faithfully.
#[derive(Debug, Clone)]
pub struct Attr {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone)]
enum NodeKind {
    Document,
    Element { name: String, attrs: Vec<Attr> },
    Text(String),
}

#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An XML document held as an arena of nodes.
///
/// The tree keeps element names as they appear on the wire and resolves
/// namespaces on demand from the stored `xmlns` declarations, so a parsed
/// subtree serializes back without loss. Comments, processing instructions
/// and the doctype are dropped at parse time; adjacent text runs coalesce
/// into a single node.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Document {
    /// Empty document containing only the document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// Parse an XML string into a tree.
    ///
    /// Fails with [`GDataError::MalformedTree`] on tokenizer errors, on an
    /// element prefix no in-scope `xmlns` declares, and on input without a
    /// root element.
    pub fn parse(xml: &str) -> Result<Self, GDataError> {
        let mut reader = NsReader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut doc = Document::new();
        let mut stack: Vec<NodeId> = Vec::with_capacity(16);
        let mut parent = doc.root();

        loop {
            match reader.read_resolved_event() {
                Ok((resolve, Event::Start(e))) => {
                    let id = doc.push_parsed_element(parent, &resolve, &e)?;
                    stack.push(parent);
                    parent = id;
                }
                Ok((resolve, Event::Empty(e))) => {
                    doc.push_parsed_element(parent, &resolve, &e)?;
                }
                Ok((_, Event::End(_))) => {
                    parent = stack.pop().unwrap_or_else(|| doc.root());
                }
                Ok((_, Event::Text(e))) => {
                    let text = decode_text(e.as_ref())?;
                    doc.append_text(parent, &text);
                }
                Ok((_, Event::CData(e))) => {
                    let text = String::from_utf8_lossy(e.as_ref()).into_owned();
                    doc.append_text(parent, &text);
                }
                Ok((_, Event::Eof)) => break,
                Err(e) => return Err(GDataError::MalformedTree(format!("XML error: {e}"))),
                _ => {}
            }
        }

        if doc.root_element().is_none() {
            return Err(GDataError::MalformedTree(
                "document has no root element".to_string(),
            ));
        }
        Ok(doc)
    }

    fn push_parsed_element(
        &mut self,
        parent: NodeId,
        resolve: &ResolveResult<'_>,
        e: &BytesStart<'_>,
    ) -> Result<NodeId, GDataError> {
        if let ResolveResult::Unknown(prefix) = resolve {
            return Err(GDataError::MalformedTree(format!(
                "undeclared namespace prefix `{}`",
                String::from_utf8_lossy(prefix)
            )));
        }

        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
        let id = self.add_element(parent, &name);
        for attr in e.attributes().with_checks(false) {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr
                .unescape_value()
                .map_err(|err| GDataError::MalformedTree(format!("invalid attribute: {err}")))?
                .into_owned();
            self.set_attr(id, &key, &value);
        }
        Ok(id)
    }

    /// The document node itself (never an element).
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    /// The first element child of the document node, if any.
    pub fn root_element(&self) -> Option<NodeId> {
        self.children(self.root())
            .iter()
            .copied()
            .find(|&id| self.is_element(id))
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Direct element children, in document order.
    pub fn child_elements(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id)
            .iter()
            .copied()
            .filter(|&c| self.is_element(c))
    }

    /// The subtree rooted at `id` in document (preorder) traversal order,
    /// `id` included.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(n) = stack.pop() {
            out.push(n);
            for &c in self.children(n).iter().rev() {
                stack.push(c);
            }
        }
        out
    }

    pub fn is_element(&self, id: NodeId) -> bool {
        matches!(
            self.nodes.get(id.0).map(|n| &n.kind),
            Some(NodeKind::Element { .. })
        )
    }

    /// Element name as written on the wire, prefix included.
    pub fn name(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Element { name, .. }) => Some(name.as_str()),
            _ => None,
        }
    }

    /// Element name with any prefix stripped.
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.name(id).map(|n| split_qname(n).1)
    }

    /// Namespace URI the element is bound to, resolved from the `xmlns`
    /// declarations in scope. `None` for unbound elements and for an explicit
    /// `xmlns=""` undeclaration.
    pub fn namespace(&self, id: NodeId) -> Option<&str> {
        let name = self.name(id)?;
        let decl = match split_qname(name).0 {
            Some("xml") => return Some("http://www.w3.org/XML/1998/namespace"),
            Some(p) => format!("xmlns:{p}"),
            None => "xmlns".to_string(),
        };

        let mut cur = Some(id);
        while let Some(n) = cur {
            if let Some(NodeKind::Element { attrs, .. }) = self.nodes.get(n.0).map(|d| &d.kind)
                && let Some(a) = attrs.iter().find(|a| a.name == decl)
            {
                if a.value.is_empty() {
                    return None;
                }
                return Some(a.value.as_str());
            }
            cur = self.parent(n);
        }
        None
    }

    /// Look up an attribute by its local name, ignoring the prefix it was
    /// written with. Namespace declarations are not visible through here.
    pub fn attr(&self, id: NodeId, local: &str) -> Option<&str> {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Element { attrs, .. }) => attrs
                .iter()
                .find(|a| {
                    let (prefix, name) = split_qname(&a.name);
                    name == local && prefix != Some("xmlns") && a.name != "xmlns"
                })
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    fn attr_by_full_name(&self, id: NodeId, name: &str) -> Option<&str> {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Element { attrs, .. }) => attrs
                .iter()
                .find(|a| a.name == name)
                .map(|a| a.value.as_str()),
            _ => None,
        }
    }

    /// Text of a text node; `None` for anything else.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Text(t)) => Some(t.as_str()),
            _ => None,
        }
    }

    /// Concatenation of the element's direct text children. Nested element
    /// content is not included.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &c in self.children(id) {
            if let Some(t) = self.text(c) {
                out.push_str(t);
            }
        }
        out
    }

    // ----------- Builder API -----------

    /// Append a new element under `parent`. `name` is written as given,
    /// prefix included.
    pub fn add_element(&mut self, parent: NodeId, name: &str) -> NodeId {
        self.push_node(
            parent,
            NodeKind::Element {
                name: name.to_string(),
                attrs: Vec::new(),
            },
        )
    }

    /// Append a text node under `parent`.
    pub fn add_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    /// Set an attribute by its full wire name, replacing an existing one.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        if let Some(NodeKind::Element { attrs, .. }) = self.nodes.get_mut(id.0).map(|n| &mut n.kind)
        {
            if let Some(a) = attrs.iter_mut().find(|a| a.name == name) {
                a.value = value.to_string();
            } else {
                attrs.push(Attr {
                    name: name.to_string(),
                    value: value.to_string(),
                });
            }
        }
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        if let Some(p) = self.nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    fn append_text(&mut self, parent: NodeId, text: &str) {
        let last = self.children(parent).last().copied();
        if let Some(last) = last
            && let Some(NodeKind::Text(existing)) =
                self.nodes.get_mut(last.0).map(|n| &mut n.kind)
        {
            existing.push_str(text);
            return;
        }
        self.add_text(parent, text);
    }

    // ----------- Subtree copy -----------

    /// Copy the subtree rooted at `node` into a fresh document.
    ///
    /// Namespace declarations that are in scope at `node` but live on its
    /// ancestors are materialized on the copied root, so the copy resolves
    /// and serializes the same way the subtree did in its original home.
    pub fn standalone_copy(&self, node: NodeId) -> Document {
        let mut out = Document::new();
        let out_root = out.root();
        self.copy_subtree(node, &mut out, out_root);

        if let Some(copied_root) = out.root_element() {
            for (decl, uri) in self.inherited_ns_decls(node) {
                if out.attr_by_full_name(copied_root, &decl).is_none() {
                    out.set_attr(copied_root, &decl, &uri);
                }
            }
        }
        out
    }

    fn copy_subtree(&self, id: NodeId, out: &mut Document, out_parent: NodeId) {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Document) => {
                for &c in self.children(id) {
                    self.copy_subtree(c, out, out_parent);
                }
            }
            Some(NodeKind::Text(t)) => {
                out.add_text(out_parent, t);
            }
            Some(NodeKind::Element { name, attrs }) => {
                let new_id = out.add_element(out_parent, name);
                for a in attrs {
                    out.set_attr(new_id, &a.name, &a.value);
                }
                for &c in self.children(id) {
                    self.copy_subtree(c, out, new_id);
                }
            }
            None => {}
        }
    }

    /// `xmlns` declarations on strict ancestors of `node`, nearest first.
    fn inherited_ns_decls(&self, node: NodeId) -> Vec<(String, String)> {
        let mut out: Vec<(String, String)> = Vec::new();
        let mut cur = self.parent(node);
        while let Some(n) = cur {
            if let Some(NodeKind::Element { attrs, .. }) = self.nodes.get(n.0).map(|d| &d.kind) {
                for a in attrs {
                    let is_decl = a.name == "xmlns" || a.name.starts_with("xmlns:");
                    if is_decl && !a.value.is_empty() && !out.iter().any(|(d, _)| *d == a.name) {
                        out.push((a.name.clone(), a.value.clone()));
                    }
                }
            }
            cur = self.parent(n);
        }
        out
    }

    // ----------- Serialization -----------

    /// Serialize the whole document, XML declaration included.
    pub fn to_xml(&self) -> String {
        let mut out = String::with_capacity(256);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        for &child in self.children(self.root()) {
            self.write_node(child, &mut out);
        }
        out
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match self.nodes.get(id.0).map(|n| &n.kind) {
            Some(NodeKind::Text(t)) => out.push_str(&escape_xml(t)),
            Some(NodeKind::Element { name, attrs }) => {
                out.push('<');
                out.push_str(name);
                for a in attrs {
                    out.push(' ');
                    out.push_str(&a.name);
                    out.push_str("=\"");
                    out.push_str(&escape_xml(&a.value));
                    out.push('"');
                }
                let children = self.children(id);
                if children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for &c in children {
                        self.write_node(c, out);
                    }
                    out.push_str("</");
                    out.push_str(name);
                    out.push('>');
                }
            }
            _ => {}
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Split a qualified name into its optional prefix and local part.
pub(crate) fn split_qname(name: &str) -> (Option<&str>, &str) {
    match name.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, name),
    }
}

fn decode_text(raw: &[u8]) -> Result<String, GDataError> {
    match std::str::from_utf8(raw) {
        Ok(s) => Ok(unescape(s)
            .map_err(|err| GDataError::MalformedTree(format!("XML decode error: {err}")))?
            .into_owned()),
        Err(_) => Ok(String::from_utf8_lossy(raw).into_owned()),
    }
}

pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}
