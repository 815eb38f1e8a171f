pub mod client;
pub mod decode;
pub mod encode;
pub mod types;

pub use client::{ContactsClient, DEFAULT_CONTACTS_PATH};
pub use decode::decode_entry;
pub use encode::encode_entry;
pub use types::{ContactEntry, ImValue, KIND_CONTACT, REL_PHOTO, StructuredAddress, TypedValue};
