use crate::common::error::GDataError;
use crate::xml::document::{Document, NodeId};
use crate::xml::ns::NamespaceRegistry;
use crate::xml::path::PathExpr;

/// Where a multi-valued field keeps its value: element text content or a
/// named attribute.
#[derive(Debug, Clone, Copy)]
pub enum ValueSource {
    Text,
    Attr(&'static str),
}

/// Result of a multi-valued extraction. All populated vectors have the same
/// length as the match count; per-node attributes that were absent appear as
/// empty strings so indices line up across vectors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiField {
    pub values: Vec<String>,
    pub types: Option<Vec<String>>,
    pub protocols: Option<Vec<String>>,
    pub pref_index: Option<usize>,
}

/// One matched node of a structured extraction: its semantic type label and
/// the ordered (child local name, child text) pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredNode {
    pub rel_type: String,
    pub fields: Vec<(String, String)>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredField {
    pub nodes: Vec<StructuredNode>,
    pub pref_index: Option<usize>,
}

/// Bundles a document with the namespace registry its path expressions
/// resolve against. Zero matches is a soft outcome (empty value), while a
/// path that cannot be compiled is a hard [`GDataError::QueryContext`].
pub struct QueryContext<'d> {
    doc: &'d Document,
    registry: &'d NamespaceRegistry,
}

impl<'d> QueryContext<'d> {
    pub fn new(doc: &'d Document, registry: &'d NamespaceRegistry) -> Self {
        Self { doc, registry }
    }

    pub fn document(&self) -> &'d Document {
        self.doc
    }

    /// Compile and evaluate, returning matched node ids in document order.
    pub fn nodes(&self, path: &str) -> Result<Vec<NodeId>, GDataError> {
        Ok(PathExpr::parse(path, self.registry)?.evaluate(self.doc))
    }

    /// Single-valued text extraction: the path must match exactly one node
    /// and that node must be a text node, otherwise the value is empty.
    pub fn scalar(&self, path: &str) -> Result<String, GDataError> {
        let matches = self.nodes(path)?;
        if let [node] = matches[..]
            && let Some(text) = self.doc.text(node)
        {
            return Ok(text.to_string());
        }
        Ok(String::new())
    }

    /// Single-valued attribute extraction: exactly one matched node, then
    /// the named attribute's value, empty when either is missing.
    pub fn scalar_attr(&self, path: &str, attr: &str) -> Result<String, GDataError> {
        let matches = self.nodes(path)?;
        if let [node] = matches[..] {
            return Ok(self.doc.attr(node, attr).unwrap_or("").to_string());
        }
        Ok(String::new())
    }

    /// Multi-valued extraction over every matched node. `type_attr` and
    /// `protocol_attr` values are URIs whose fragment (after `#`) carries the
    /// semantic label; only the fragment is kept. `pref_index` points at the
    /// first node whose `pref_attr` is literally `"true"`.
    pub fn multi(
        &self,
        path: &str,
        source: ValueSource,
        type_attr: Option<&str>,
        protocol_attr: Option<&str>,
        pref_attr: Option<&str>,
    ) -> Result<MultiField, GDataError> {
        let matches = self.nodes(path)?;
        let mut field = MultiField {
            values: Vec::with_capacity(matches.len()),
            types: type_attr.map(|_| Vec::with_capacity(matches.len())),
            protocols: protocol_attr.map(|_| Vec::with_capacity(matches.len())),
            pref_index: None,
        };

        for (i, &node) in matches.iter().enumerate() {
            let value = match source {
                ValueSource::Text => self.doc.text_content(node),
                ValueSource::Attr(name) => self.doc.attr(node, name).unwrap_or("").to_string(),
            };
            field.values.push(value);

            if let (Some(types), Some(attr)) = (field.types.as_mut(), type_attr) {
                types.push(self.fragment_of(node, attr));
            }
            if let (Some(protocols), Some(attr)) = (field.protocols.as_mut(), protocol_attr) {
                protocols.push(self.fragment_of(node, attr));
            }
            if field.pref_index.is_none()
                && let Some(attr) = pref_attr
                && self.doc.attr(node, attr) == Some("true")
            {
                field.pref_index = Some(i);
            }
        }
        Ok(field)
    }

    /// Structured extraction: each matched node flattens to its (child local
    /// name, child text) pairs in document order, skipping children with no
    /// text content. Type and pref handling as in [`Self::multi`].
    pub fn structured(
        &self,
        path: &str,
        type_attr: Option<&str>,
        pref_attr: Option<&str>,
    ) -> Result<StructuredField, GDataError> {
        let matches = self.nodes(path)?;
        let mut field = StructuredField {
            nodes: Vec::with_capacity(matches.len()),
            pref_index: None,
        };

        for (i, &node) in matches.iter().enumerate() {
            let mut entry = StructuredNode::default();
            if let Some(attr) = type_attr {
                entry.rel_type = self.fragment_of(node, attr);
            }
            for child in self.doc.child_elements(node) {
                let text = self.doc.text_content(child);
                if text.is_empty() {
                    continue;
                }
                let name = self.doc.local_name(child).unwrap_or("").to_string();
                entry.fields.push((name, text));
            }
            field.nodes.push(entry);

            if field.pref_index.is_none()
                && let Some(attr) = pref_attr
                && self.doc.attr(node, attr) == Some("true")
            {
                field.pref_index = Some(i);
            }
        }
        Ok(field)
    }

    fn fragment_of(&self, node: NodeId, attr: &str) -> String {
        uri_fragment(self.doc.attr(node, attr).unwrap_or("")).to_string()
    }
}

/// The fragment (substring after `#`) of a relation URI, or empty when the
/// value has no fragment.
pub fn uri_fragment(value: &str) -> &str {
    value.rsplit_once('#').map_or("", |(_, fragment)| fragment)
}
