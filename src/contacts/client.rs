use anyhow::{Result, anyhow};

use crate::contacts::decode::decode_entry;
use crate::contacts::encode::encode_entry;
use crate::contacts::types::ContactEntry;
use crate::feed::{FeedClient, decode_feed, entries, total_results};
use crate::xml::{Document, NamespaceRegistry};

/// Collection addressed when no explicit path is configured: the
/// authenticated user's own contacts, full projection.
pub const DEFAULT_CONTACTS_PATH: &str = "/m8/feeds/contacts/default/full";

/// Contacts feed service: CRUD over contact entries on top of
/// [`FeedClient`]. Same create/update re-decode contract as the calendar
/// client.
#[derive(Clone)]
pub struct ContactsClient {
    feed: FeedClient,
    collection_path: String,
    registry: NamespaceRegistry,
    store_raw_xml: bool,
}

impl ContactsClient {
    /// Create a new client from a base URL and an optional ready-to-send
    /// `Authorization` value.
    pub fn new(base_url: &str, auth_header: Option<&str>) -> Result<Self> {
        Ok(Self {
            feed: FeedClient::new(base_url, auth_header)?,
            collection_path: DEFAULT_CONTACTS_PATH.to_string(),
            registry: NamespaceRegistry::gdata(),
            store_raw_xml: false,
        })
    }

    /// Address a different contact collection than [`DEFAULT_CONTACTS_PATH`].
    pub fn set_collection_path(&mut self, path: &str) {
        self.collection_path = path.to_string();
    }

    /// Capture the serialized entry XML into every decoded record.
    pub fn set_store_raw_xml(&mut self, store: bool) {
        self.store_raw_xml = store;
    }

    /// The underlying transport, for requests this surface does not cover.
    pub fn feed(&self) -> &FeedClient {
        &self.feed
    }

    /// Fetch and decode the whole contact collection.
    pub async fn contacts(&self) -> Result<Vec<ContactEntry>> {
        self.contacts_page("").await
    }

    /// Fetch one page of the contact collection; `query` is a raw query
    /// string such as `start-index=26&max-results=25`.
    pub async fn contacts_page(&self, query: &str) -> Result<Vec<ContactEntry>> {
        let path = if query.is_empty() {
            self.collection_path.clone()
        } else {
            format!("{}?{}", self.collection_path, query)
        };
        let resp = self.feed.get_xml(&path).await?;
        if !resp.status().is_success() {
            return Err(anyhow!("GET contacts feed failed with {}", resp.status()));
        }
        let body = resp.into_body();
        self.decode_feed_body(&body)
    }

    /// Create a contact and return the server's view of it.
    pub async fn create(&self, entry: &ContactEntry) -> Result<ContactEntry> {
        let body = encode_entry(entry);
        let resp = self.feed.post_entry(&self.collection_path, &body).await?;
        if !resp.status().is_success() {
            return Err(anyhow!("POST contact failed with {}", resp.status()));
        }
        let body = resp.into_body();
        self.decode_entry_body(&body)
    }

    /// Update a contact at its edit URI, guarded by its etag, and return the
    /// server's view of it.
    pub async fn update(&self, entry: &ContactEntry) -> Result<ContactEntry> {
        if entry.common.edit_uri.is_empty() {
            return Err(anyhow!("entry has no edit URI; fetch or create it first"));
        }
        let body = encode_entry(entry);
        let resp = self
            .feed
            .put_entry(&entry.common.edit_uri, &entry.common.etag, &body)
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("PUT contact failed with {}", resp.status()));
        }
        let body = resp.into_body();
        self.decode_entry_body(&body)
    }

    /// Delete a contact at its edit URI, guarded by its etag.
    pub async fn delete(&self, entry: &ContactEntry) -> Result<()> {
        if entry.common.edit_uri.is_empty() {
            return Err(anyhow!("entry has no edit URI; fetch or create it first"));
        }
        let resp = self
            .feed
            .delete_entry(&entry.common.edit_uri, &entry.common.etag)
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("DELETE contact failed with {}", resp.status()));
        }
        Ok(())
    }

    fn decode_feed_body(&self, body: &[u8]) -> Result<Vec<ContactEntry>> {
        let text = std::str::from_utf8(body)?;
        let doc = Document::parse(text)?;
        // totalResults counts the whole collection; a paged response holds
        // at most that many entries, usually fewer.
        let total = total_results(&doc, &self.registry)?;
        let found = entries(&doc, &self.registry)?.len();
        Ok(decode_feed(
            &doc,
            &self.registry,
            found.min(total),
            self.store_raw_xml,
        )?)
    }

    fn decode_entry_body(&self, body: &[u8]) -> Result<ContactEntry> {
        let text = std::str::from_utf8(body)?;
        let doc = Document::parse(text)?;
        Ok(decode_entry(&doc, &self.registry, self.store_raw_xml)?)
    }
}
