use anyhow::{Result, anyhow};

use crate::calendar::decode::decode_entry;
use crate::calendar::encode::encode_entry;
use crate::calendar::types::CalendarEntry;
use crate::feed::{FeedClient, decode_feed, entries, total_results};
use crate::xml::{Document, NamespaceRegistry};

/// Collection addressed when no explicit path is configured: the
/// authenticated user's own calendar, private projection, full detail.
pub const DEFAULT_EVENTS_PATH: &str = "/calendar/feeds/default/private/full";

/// Calendar feed service: CRUD over event entries on top of [`FeedClient`].
///
/// Create and update decode the entry document the server responds with, so
/// the returned record carries the server-assigned id, edit URI and etag
/// needed for the next conditional write.
#[derive(Clone)]
pub struct CalendarClient {
    feed: FeedClient,
    collection_path: String,
    registry: NamespaceRegistry,
    store_raw_xml: bool,
}

impl CalendarClient {
    /// Create a new client from a base URL and an optional ready-to-send
    /// `Authorization` value.
    pub fn new(base_url: &str, auth_header: Option<&str>) -> Result<Self> {
        Ok(Self {
            feed: FeedClient::new(base_url, auth_header)?,
            collection_path: DEFAULT_EVENTS_PATH.to_string(),
            registry: NamespaceRegistry::gdata(),
            store_raw_xml: false,
        })
    }

    /// Address a different event collection than [`DEFAULT_EVENTS_PATH`].
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

    /// Fetch and decode the whole event collection.
    pub async fn events(&self) -> Result<Vec<CalendarEntry>> {
        self.events_page("").await
    }

    /// Fetch one page of the event collection; `query` is a raw query string
    /// such as `start-index=26&max-results=25`.
    pub async fn events_page(&self, query: &str) -> Result<Vec<CalendarEntry>> {
        let path = if query.is_empty() {
            self.collection_path.clone()
        } else {
            format!("{}?{}", self.collection_path, query)
        };
        let resp = self.feed.get_xml(&path).await?;
        if !resp.status().is_success() {
            return Err(anyhow!("GET events feed failed with {}", resp.status()));
        }
        let body = resp.into_body();
        self.decode_feed_body(&body)
    }

    /// Create an event and return the server's view of it.
    pub async fn create(&self, entry: &CalendarEntry) -> Result<CalendarEntry> {
        let body = encode_entry(entry);
        let resp = self.feed.post_entry(&self.collection_path, &body).await?;
        if !resp.status().is_success() {
            return Err(anyhow!("POST event failed with {}", resp.status()));
        }
        let body = resp.into_body();
        self.decode_entry_body(&body)
    }

    /// Update an event at its edit URI, guarded by its etag, and return the
    /// server's view of it.
    pub async fn update(&self, entry: &CalendarEntry) -> Result<CalendarEntry> {
        if entry.common.edit_uri.is_empty() {
            return Err(anyhow!("entry has no edit URI; fetch or create it first"));
        }
        let body = encode_entry(entry);
        let resp = self
            .feed
            .put_entry(&entry.common.edit_uri, &entry.common.etag, &body)
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("PUT event failed with {}", resp.status()));
        }
        let body = resp.into_body();
        self.decode_entry_body(&body)
    }

    /// Delete an event at its edit URI, guarded by its etag.
    pub async fn delete(&self, entry: &CalendarEntry) -> Result<()> {
        if entry.common.edit_uri.is_empty() {
            return Err(anyhow!("entry has no edit URI; fetch or create it first"));
        }
        let resp = self
            .feed
            .delete_entry(&entry.common.edit_uri, &entry.common.etag)
            .await?;
        if !resp.status().is_success() {
            return Err(anyhow!("DELETE event failed with {}", resp.status()));
        }
        Ok(())
    }

    fn decode_feed_body(&self, body: &[u8]) -> Result<Vec<CalendarEntry>> {
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

    fn decode_entry_body(&self, body: &[u8]) -> Result<CalendarEntry> {
        let text = std::str::from_utf8(body)?;
        let doc = Document::parse(text)?;
        Ok(decode_entry(&doc, &self.registry, self.store_raw_xml)?)
    }
}
