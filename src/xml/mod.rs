pub mod document;
pub mod extract;
pub mod ns;
pub mod path;

pub use document::{Attr, Document, NodeId, escape_xml};
pub use extract::{MultiField, QueryContext, StructuredField, StructuredNode, ValueSource, uri_fragment};
pub use ns::{
    NS_ATOM, NS_GCAL, NS_GCONTACT, NS_GDATA, NS_OPENSEARCH, NamespaceRegistry,
};
pub use path::PathExpr;
