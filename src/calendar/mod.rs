pub mod client;
pub mod decode;
pub mod encode;
pub mod types;

pub use client::{CalendarClient, DEFAULT_EVENTS_PATH};
pub use decode::decode_entry;
pub use encode::encode_entry;
pub use types::{
    Alarm, AlarmKind, Attendee, AttendeeRelation, AttendeeStatus, AttendeeType, CalendarEntry,
    KIND_EVENT, STATUS_CANCELED, STATUS_CONFIRMED, STATUS_TENTATIVE, TRANSPARENCY_OPAQUE,
};
