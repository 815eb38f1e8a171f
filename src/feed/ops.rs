use crate::common::error::GDataError;
use crate::feed::types::EntryCommon;
use crate::xml::{Document, NamespaceRegistry, NodeId, QueryContext};

/// Entry kinds that can decode themselves from an `atom:entry` node of a
/// feed document. Implementations copy the node into a standalone document
/// first so queries and the optional raw capture see a self-contained entry.
pub trait FromEntryNode: Sized {
    fn from_entry_node(
        feed: &Document,
        entry: NodeId,
        registry: &NamespaceRegistry,
        keep_raw: bool,
    ) -> Result<Self, GDataError>;
}

/// Number of entries the feed declares in its `openSearch:totalResults`
/// node. Exactly one such node must exist.
pub fn total_results(doc: &Document, registry: &NamespaceRegistry) -> Result<usize, GDataError> {
    let q = QueryContext::new(doc, registry);
    let matches = q.nodes("//openSearch:totalResults/text()")?;
    let [node] = matches[..] else {
        return Err(GDataError::MissingRequiredField("openSearch:totalResults"));
    };
    doc.text(node)
        .and_then(|t| t.trim().parse::<usize>().ok())
        .ok_or(GDataError::MissingRequiredField("openSearch:totalResults"))
}

/// Entry element nodes of the feed, in document order.
pub fn entries(doc: &Document, registry: &NamespaceRegistry) -> Result<Vec<NodeId>, GDataError> {
    QueryContext::new(doc, registry).nodes("//atom:entry")
}

/// Decode every entry of the feed, first checking the entry count against
/// the caller's expectation. The first failing entry aborts the batch.
pub fn decode_feed<T: FromEntryNode>(
    doc: &Document,
    registry: &NamespaceRegistry,
    expected: usize,
    keep_raw: bool,
) -> Result<Vec<T>, GDataError> {
    let found = entries(doc, registry)?;
    if found.len() != expected {
        return Err(GDataError::EntryCountMismatch {
            expected,
            found: found.len(),
        });
    }
    tracing::debug!(entries = found.len(), keep_raw, "decoding feed");

    let mut out = Vec::with_capacity(found.len());
    for node in found {
        out.push(T::from_entry_node(doc, node, registry, keep_raw)?);
    }
    Ok(out)
}

/// Rewrite an edit URI that carries a percent-encoded user address
/// (`%40` between `feeds/` and `/private/`) to address the `default` user
/// instead. URIs without the encoded address pass through unchanged, and
/// the rewrite is idempotent.
pub fn normalize_edit_uri(uri: &str) -> String {
    if !uri.contains("%40") {
        return uri.to_string();
    }
    let Some(feeds) = uri.find("feeds/") else {
        return uri.to_string();
    };
    let user = feeds + "feeds/".len();
    let Some(private) = uri[user..].find("/private/") else {
        return uri.to_string();
    };
    format!("{}default{}", &uri[..user], &uri[user + private..])
}

/// Concurrency token from the root element's `etag` attribute, matched on
/// attribute local name so both `etag` and `gd:etag` spellings count.
pub fn entry_etag(doc: &Document) -> Result<String, GDataError> {
    let root = doc
        .root_element()
        .ok_or_else(|| GDataError::MalformedTree("entry document has no root element".into()))?;
    match doc.attr(root, "etag") {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(GDataError::MissingConcurrencyToken),
    }
}

/// Edit URI from the entry's `rel="edit"` link, normalized per
/// [`normalize_edit_uri`]. Mandatory.
pub fn entry_edit_uri(q: &QueryContext<'_>) -> Result<String, GDataError> {
    let href = q.scalar_attr("//atom:entry/atom:link[@rel='edit']", "href")?;
    if href.is_empty() {
        return Err(GDataError::MissingRequiredField("link[@rel='edit']"));
    }
    Ok(normalize_edit_uri(&href))
}

pub(crate) fn require_scalar(
    q: &QueryContext<'_>,
    path: &str,
    name: &'static str,
) -> Result<String, GDataError> {
    let value = q.scalar(path)?;
    if value.is_empty() {
        return Err(GDataError::MissingRequiredField(name));
    }
    Ok(value)
}

pub(crate) fn require_scalar_attr(
    q: &QueryContext<'_>,
    path: &str,
    attr: &str,
    name: &'static str,
) -> Result<String, GDataError> {
    let value = q.scalar_attr(path, attr)?;
    if value.is_empty() {
        return Err(GDataError::MissingRequiredField(name));
    }
    Ok(value)
}

/// Shared tail of both entry decoders: timestamps every entry kind must
/// carry.
pub(crate) fn decode_timestamps(
    q: &QueryContext<'_>,
    common: &mut EntryCommon,
) -> Result<(), GDataError> {
    common.published = require_scalar(q, "//atom:entry/atom:published/text()", "atom:published")?;
    common.updated = require_scalar(q, "//atom:entry/atom:updated/text()", "atom:updated")?;
    Ok(())
}
