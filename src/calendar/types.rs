use crate::feed::EntryCommon;

pub const STATUS_CONFIRMED: &str = "http://schemas.google.com/g/2005#event.confirmed";
pub const STATUS_TENTATIVE: &str = "http://schemas.google.com/g/2005#event.tentative";
pub const STATUS_CANCELED: &str = "http://schemas.google.com/g/2005#event.canceled";
pub const TRANSPARENCY_OPAQUE: &str = "http://schemas.google.com/g/2005#event.opaque";
pub const KIND_EVENT: &str = "http://schemas.google.com/g/2005#event";

/// Role of a `gd:who` participant, from the fragment label after the last
/// `.` of its `rel` URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttendeeRelation {
    Attendee,
    Organizer,
    Performer,
    Speaker,
    #[default]
    Unknown,
}

impl AttendeeRelation {
    pub fn from_label(label: &str) -> Self {
        match label {
            "attendee" => Self::Attendee,
            "organizer" => Self::Organizer,
            "performer" => Self::Performer,
            "speaker" => Self::Speaker,
            _ => Self::Unknown,
        }
    }
}

/// Participation status. Organizers resolve against the entry-level event
/// status vocabulary, everyone else against the attendee vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttendeeStatus {
    Confirmed,
    Busy,
    Canceled,
    Accepted,
    Declined,
    Invited,
    Tentative,
    #[default]
    Unset,
}

impl AttendeeStatus {
    /// The `eventStatus` vocabulary used for organizers.
    pub fn from_event_label(label: &str) -> Self {
        match label {
            "confirmed" => Self::Confirmed,
            "busy" => Self::Busy,
            "canceled" => Self::Canceled,
            _ => Self::Unset,
        }
    }

    /// The `attendeeStatus` vocabulary used for ordinary attendees.
    pub fn from_attendee_label(label: &str) -> Self {
        match label {
            "accepted" => Self::Accepted,
            "declined" => Self::Declined,
            "invited" => Self::Invited,
            "tentative" => Self::Tentative,
            _ => Self::Unset,
        }
    }
}

/// Required/optional qualifier from a `gd:attendeeType` sub-element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttendeeType {
    Required,
    Optional,
    #[default]
    Unset,
}

impl AttendeeType {
    pub fn from_label(label: &str) -> Self {
        match label {
            "required" => Self::Required,
            "optional" => Self::Optional,
            _ => Self::Unset,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attendee {
    pub email: String,
    pub relation: AttendeeRelation,
    pub status: AttendeeStatus,
    pub attendee_type: AttendeeType,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlarmKind {
    Email,
    Alert,
    #[default]
    Unknown,
}

impl AlarmKind {
    pub fn from_method(method: &str) -> Self {
        match method {
            "email" => Self::Email,
            "alert" => Self::Alert,
            _ => Self::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Alarm {
    pub kind: AlarmKind,
    pub minutes_before: u32,
}

/// A decoded calendar event entry. Scalars stay as the wire strings they
/// were decoded from; re-encoding an entry emits them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CalendarEntry {
    pub common: EntryCommon,
    pub content: String,
    pub where_text: String,
    pub status: String,
    /// Empty for single-occurrence events; when set, `start`/`end` are empty
    /// because a recurring template has no single occurrence time.
    pub recurrence_rule: String,
    pub start: String,
    pub end: String,
    pub visibility: String,
    pub transparency: String,
    pub anyone_can_add_self: String,
    pub guests_can_invite_others: String,
    pub guests_can_modify: String,
    pub guests_can_see_guests: String,
    pub sequence: String,
    pub attendees: Vec<Attendee>,
    pub alarms: Vec<Alarm>,
}
