//! GData Atom codec and feed client for Google Calendar and Contacts.
//!
//! This library decodes the Atom + `gd`/`gCal`/`gContact` extension XML the
//! legacy GData v2 APIs speak into typed entry records, encodes records back
//! into entry documents, and ships a hyper-based feed client for the CRUD
//! cycle around them.
//!
//! # Features
//!
//! - DOM-backed XML document model with namespace-aware path queries
//! - Calendar and contact entry decoders with strict mandatory-field checks
//! - Minimal entry encoders suitable as create/update request bodies
//! - ETag concurrency tokens carried end to end (`If-Match` on writes)
//! - HTTP/2 multiplexing, connection pooling and automatic response
//!   decompression (br/zstd/gzip)
//! - Batch page fetches with bounded concurrency
//!
//! # Examples
//!
//! ## Fetching and decoding an event feed
//!
//! ```no_run
//! use gdata_rs::calendar::CalendarClient;
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = CalendarClient::new(
//!         "https://www.google.com",
//!         Some("Bearer ya29.a0Af"),
//!     )?;
//!
//!     let events = client.events().await?;
//!     for event in &events {
//!         println!("{}: {} .. {}", event.common.title, event.start, event.end);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Creating an event and updating it
//!
//! ```no_run
//! use gdata_rs::calendar::{CalendarClient, CalendarEntry};
//! use anyhow::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = CalendarClient::new(
//!         "https://www.google.com",
//!         Some("Bearer ya29.a0Af"),
//!     )?;
//!
//!     let mut draft = CalendarEntry::default();
//!     draft.common.title = "Team lunch".to_string();
//!     draft.content = "Pizza at noon".to_string();
//!     draft.start = "2026-09-01T12:00:00.000Z".to_string();
//!     draft.end = "2026-09-01T13:00:00.000Z".to_string();
//!
//!     // The server's response carries the assigned id, edit URI and etag.
//!     let mut created = client.create(&draft).await?;
//!
//!     created.where_text = "Cafeteria".to_string();
//!     let updated = client.update(&created).await?;
//!     println!("now at revision {}", updated.sequence);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Decoding a feed you already have
//!
//! ```
//! use gdata_rs::calendar::CalendarEntry;
//! use gdata_rs::feed::{decode_feed, total_results};
//! use gdata_rs::xml::{Document, NamespaceRegistry};
//!
//! # fn example(feed_xml: &str) -> Result<(), gdata_rs::GDataError> {
//! let registry = NamespaceRegistry::gdata();
//! let doc = Document::parse(feed_xml)?;
//! let expected = total_results(&doc, &registry)?;
//! let events: Vec<CalendarEntry> = decode_feed(&doc, &registry, expected, false)?;
//! # Ok(())
//! # }
//! ```
pub mod calendar;
pub mod common;
pub mod contacts;
pub mod feed;
pub mod xml;

pub use calendar::{CalendarClient, CalendarEntry};
pub use common::GDataError;
pub use common::compression::{
    ContentEncoding, add_accept_encoding, decompress_body, detect_encodings,
};
pub use contacts::{ContactEntry, ContactsClient};
pub use feed::{BatchItem, EntryCommon, FeedClient, decode_feed, normalize_edit_uri, total_results};
pub use xml::{Document, NamespaceRegistry, PathExpr, QueryContext};
