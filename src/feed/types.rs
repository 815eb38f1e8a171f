use anyhow::Result;

/// Category scheme every GData kind category uses.
pub const CATEGORY_SCHEME_KIND: &str = "http://schemas.google.com/g/2005#kind";

/// Annotated result of a batch fetch
pub struct BatchItem<T> {
    pub path: String,
    pub result: Result<T>,
}

/// Fields common to every GData entry kind.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryCommon {
    pub id: String,
    pub title: String,
    pub updated: String,
    pub published: String,
    pub edit_uri: String,
    pub etag: String,
    pub deleted: bool,
    /// Serialized form of the standalone entry document, captured only when
    /// the decoder is asked to keep it.
    pub raw_xml: String,
}
