use thiserror::Error;

/// Errors produced while decoding or encoding GData feed documents.
///
/// Transport failures are reported separately (the clients use `anyhow`); this
/// enum covers only the codec layer between XML bodies and typed entries.
#[derive(Debug, Error)]
pub enum GDataError {
    /// The body could not be tokenized into a well-formed document tree.
    #[error("malformed XML tree: {0}")]
    MalformedTree(String),

    /// A path expression could not be compiled or evaluated, e.g. it names a
    /// namespace prefix the registry does not know. Distinct from a valid
    /// expression that simply matches nothing.
    #[error("query context error: {0}")]
    QueryContext(String),

    /// A field every well-formed entry carries was absent or empty.
    #[error("missing required field: {0}")]
    MissingRequiredField(&'static str),

    /// The entry carries no etag, so conditional writes would be unsafe.
    #[error("entry has no etag concurrency token")]
    MissingConcurrencyToken,

    /// The feed header declared one entry total and the body held another.
    #[error("feed declared {expected} entries but contains {found}")]
    EntryCountMismatch { expected: usize, found: usize },
}

impl From<quick_xml::Error> for GDataError {
    fn from(e: quick_xml::Error) -> Self {
        Self::MalformedTree(e.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for GDataError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        Self::MalformedTree(e.to_string())
    }
}

impl From<quick_xml::escape::EscapeError> for GDataError {
    fn from(e: quick_xml::escape::EscapeError) -> Self {
        Self::MalformedTree(e.to_string())
    }
}
