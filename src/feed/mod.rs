pub mod client;
pub mod ops;
pub mod types;

pub use client::FeedClient;
pub use ops::{
    FromEntryNode, decode_feed, entries, entry_edit_uri, entry_etag, normalize_edit_uri,
    total_results,
};
pub use types::{BatchItem, CATEGORY_SCHEME_KIND, EntryCommon};
