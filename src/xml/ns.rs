//! Namespace vocabulary of the GData wire format.

/// Atom syndication format, the envelope of every feed and entry.
pub const NS_ATOM: &str = "http://www.w3.org/2005/Atom";
/// Shared GData element vocabulary (`gd:` in feeds).
pub const NS_GDATA: &str = "http://schemas.google.com/g/2005";
/// Contact-specific extensions (`gContact:`).
pub const NS_GCONTACT: &str = "http://schemas.google.com/contact/2008";
/// Calendar-specific extensions (`gCal:`).
pub const NS_GCAL: &str = "http://schemas.google.com/gCal/2005";
/// OpenSearch result metadata (`openSearch:`), carries the entry total.
pub const NS_OPENSEARCH: &str = "http://a9.com/-/spec/opensearchrss/1.0/";

/// Maps the prefixes used in path expressions to namespace URIs.
///
/// The registry is shared by every query against a document; it is built once
/// and treated as immutable afterwards. Prefixes here are a client-side
/// convention and independent of whatever prefixes the document declares.
#[derive(Debug, Clone)]
pub struct NamespaceRegistry {
    entries: Vec<(String, String)>,
}

impl NamespaceRegistry {
    /// Empty registry. Prefixless path steps still work without any entries.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Registry preloaded with the five namespaces the GData protocol uses.
    pub fn gdata() -> Self {
        let mut reg = Self::new();
        reg.register("atom", NS_ATOM);
        reg.register("gd", NS_GDATA);
        reg.register("gContact", NS_GCONTACT);
        reg.register("gCal", NS_GCAL);
        reg.register("openSearch", NS_OPENSEARCH);
        reg
    }

    /// Bind `prefix` to `uri`, replacing an existing binding of the prefix.
    pub fn register(&mut self, prefix: &str, uri: &str) {
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| p == prefix) {
            entry.1 = uri.to_string();
        } else {
            self.entries.push((prefix.to_string(), uri.to_string()));
        }
    }

    /// Resolve a prefix to its URI, `None` when unregistered.
    pub fn resolve(&self, prefix: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == prefix)
            .map(|(_, uri)| uri.as_str())
    }
}

impl Default for NamespaceRegistry {
    fn default() -> Self {
        Self::gdata()
    }
}
