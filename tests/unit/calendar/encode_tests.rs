use gdata_rs::calendar::{CalendarEntry, decode_entry, encode_entry};
use gdata_rs::feed::decode_feed;
use gdata_rs::xml::Document;
use gdata_rs::NamespaceRegistry;

use crate::fixtures::CALENDAR_FEED;

#[test]
fn a_fresh_draft_encodes_to_a_valid_create_body() {
    let mut draft = CalendarEntry::default();
    draft.common.title = "Team lunch".to_string();
    draft.content = "Pizza at noon".to_string();
    draft.start = "2026-09-01T12:00:00.000Z".to_string();
    draft.end = "2026-09-01T13:00:00.000Z".to_string();

    let xml = encode_entry(&draft);
    assert!(xml.contains(
        "<category scheme=\"http://schemas.google.com/g/2005#kind\" term=\"http://schemas.google.com/g/2005#event\"/>"
    ));
    assert!(xml.contains("<title type=\"text\">Team lunch</title>"));
    assert!(xml.contains("<content type=\"text\">Pizza at noon</content>"));
    assert!(xml.contains(
        "<gd:when startTime=\"2026-09-01T12:00:00.000Z\" endTime=\"2026-09-01T13:00:00.000Z\"/>"
    ));

    // Server-assigned fields stay out of a create body.
    assert!(!xml.contains("<id>"));
    assert!(!xml.contains("rel=\"edit\""));
    assert!(!xml.contains("gd:etag"));
    assert!(!xml.contains("<published>"));
    assert!(!xml.contains("gd:eventStatus"));
    assert!(!xml.contains("gCal:sequence"));
}

#[test]
fn transparency_defaults_to_opaque() {
    let draft = CalendarEntry::default();
    let xml = encode_entry(&draft);
    assert!(xml.contains(
        "<gd:transparency value=\"http://schemas.google.com/g/2005#event.opaque\"/>"
    ));

    let mut transparent = CalendarEntry::default();
    transparent.transparency = "http://schemas.google.com/g/2005#event.transparent".to_string();
    let xml = encode_entry(&transparent);
    assert!(xml.contains(
        "<gd:transparency value=\"http://schemas.google.com/g/2005#event.transparent\"/>"
    ));
    assert!(!xml.contains("event.opaque"));
}

#[test]
fn a_recurrence_rule_replaces_the_when_element() {
    let mut draft = CalendarEntry::default();
    draft.recurrence_rule = "RRULE:FREQ=DAILY".to_string();
    draft.start = "2026-09-01T12:00:00.000Z".to_string();

    let xml = encode_entry(&draft);
    assert!(xml.contains("<gd:recurrence>RRULE:FREQ=DAILY</gd:recurrence>"));
    assert!(!xml.contains("<gd:when"));
}

#[test]
fn a_when_with_only_a_start_omits_the_end_attribute() {
    let mut draft = CalendarEntry::default();
    draft.start = "2026-09-01T12:00:00.000Z".to_string();

    let xml = encode_entry(&draft);
    assert!(xml.contains("<gd:when startTime=\"2026-09-01T12:00:00.000Z\"/>"));
    assert!(!xml.contains("endTime"));
}

#[test]
fn etag_is_escaped_into_the_root_attribute() {
    let mut entry = CalendarEntry::default();
    entry.common.etag = "\"EUIMRD9DeCp7IWA6WhVR\"".to_string();

    let xml = encode_entry(&entry);
    assert!(xml.contains("gd:etag=\"&quot;EUIMRD9DeCp7IWA6WhVR&quot;\""));
}

#[test]
fn encoded_entry_redecodes_to_the_same_scalars() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(CALENDAR_FEED).unwrap();
    let decoded: Vec<CalendarEntry> = decode_feed(&doc, &registry, 4, false).unwrap();
    let original = &decoded[0];

    let encoded = encode_entry(original);
    let reparsed = Document::parse(&encoded).unwrap();
    let roundtripped = decode_entry(&reparsed, &registry, false).unwrap();

    assert_eq!(roundtripped.common.id, original.common.id);
    assert_eq!(roundtripped.common.title, original.common.title);
    assert_eq!(roundtripped.common.etag, original.common.etag);
    assert_eq!(roundtripped.common.edit_uri, original.common.edit_uri);
    assert_eq!(roundtripped.common.published, original.common.published);
    assert_eq!(roundtripped.common.updated, original.common.updated);
    assert_eq!(roundtripped.content, original.content);
    assert_eq!(roundtripped.where_text, original.where_text);
    assert_eq!(roundtripped.status, original.status);
    assert_eq!(roundtripped.start, original.start);
    assert_eq!(roundtripped.end, original.end);
    assert_eq!(roundtripped.visibility, original.visibility);
    assert_eq!(roundtripped.transparency, original.transparency);
    assert_eq!(roundtripped.anyone_can_add_self, original.anyone_can_add_self);
    assert_eq!(roundtripped.guests_can_invite_others, original.guests_can_invite_others);
    assert_eq!(roundtripped.guests_can_modify, original.guests_can_modify);
    assert_eq!(roundtripped.guests_can_see_guests, original.guests_can_see_guests);
    assert_eq!(roundtripped.sequence, original.sequence);
    assert_eq!(roundtripped.common.deleted, original.common.deleted);

    // The minimal encoder does not carry participants or reminders.
    assert!(roundtripped.attendees.is_empty());
    assert!(roundtripped.alarms.is_empty());
}
