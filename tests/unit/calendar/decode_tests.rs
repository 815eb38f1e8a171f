use gdata_rs::calendar::{
    Alarm, AlarmKind, AttendeeRelation, AttendeeStatus, AttendeeType, CalendarEntry,
    STATUS_CANCELED, STATUS_CONFIRMED, STATUS_TENTATIVE, decode_entry,
};
use gdata_rs::feed::decode_feed;
use gdata_rs::xml::Document;
use gdata_rs::{GDataError, NamespaceRegistry};

use crate::fixtures::CALENDAR_FEED;

fn decode_fixture_feed(keep_raw: bool) -> Vec<CalendarEntry> {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(CALENDAR_FEED).unwrap();
    decode_feed(&doc, &registry, 4, keep_raw).unwrap()
}

fn decode(xml: &str) -> Result<CalendarEntry, GDataError> {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(xml).unwrap();
    decode_entry(&doc, &registry, false)
}

/// A complete standalone entry; the omission tests strip one piece at a
/// time to pin which mandatory check fires.
fn minimal_entry() -> String {
    r#"<?xml version='1.0' encoding='UTF-8'?>
<entry xmlns='http://www.w3.org/2005/Atom' xmlns:gd='http://schemas.google.com/g/2005' xmlns:gCal='http://schemas.google.com/gCal/2005' gd:etag='"Rh4_fTVSLyp7IWA9WxRVGUo."'>
  <id>http://www.google.com/calendar/feeds/default/private/full/e77</id>
  <published>2008-05-12T08:00:00.000Z</published>
  <updated>2008-05-12T08:00:10.000Z</updated>
  <title type='text'>Standup</title>
  <content type='text'>Daily standup</content>
  <link rel='edit' type='application/atom+xml' href='http://www.google.com/calendar/feeds/default/private/full/e77/63311056810'/>
  <gd:eventStatus value='http://schemas.google.com/g/2005#event.confirmed'/>
  <gd:visibility value='http://schemas.google.com/g/2005#event.default'/>
  <gd:transparency value='http://schemas.google.com/g/2005#event.opaque'/>
  <gCal:anyoneCanAddSelf value='false'/>
  <gCal:guestsCanInviteOthers value='true'/>
  <gCal:guestsCanModify value='false'/>
  <gCal:guestsCanSeeGuests value='true'/>
  <gCal:sequence value='0'/>
  <gd:when startTime='2008-05-13T09:00:00.000Z' endTime='2008-05-13T09:15:00.000Z'/>
</entry>"#
        .to_string()
}

#[test]
fn decodes_entries_in_document_order() {
    let events = decode_fixture_feed(false);
    let updated: Vec<_> = events.iter().map(|e| e.common.updated.as_str()).collect();
    assert_eq!(
        updated,
        [
            "2008-03-26T20:20:51.000Z",
            "2008-03-26T12:30:06.000Z",
            "2008-03-10T12:56:43.000Z",
            "2008-03-06T15:32:25.000Z",
        ]
    );
}

#[test]
fn decodes_a_fully_loaded_entry() {
    let events = decode_fixture_feed(false);
    let event = &events[0];

    assert_eq!(event.common.title, "Quarterly review");
    assert_eq!(
        event.common.id,
        "http://www.google.com/calendar/feeds/default/private/full/entry1"
    );
    assert_eq!(event.common.etag, "\"EUIMRD9DeCp7IWA6WhVR\"");
    assert_eq!(event.common.published, "2008-03-26T20:20:43.000Z");
    assert_eq!(event.content, "Budget review with the finance team.");
    assert_eq!(event.where_text, "Conference room 4A");
    assert_eq!(event.status, STATUS_CONFIRMED);
    assert!(!event.common.deleted);
    assert_eq!(event.start, "2008-04-01T10:00:00.000-07:00");
    assert_eq!(event.end, "2008-04-01T11:00:00.000-07:00");
    assert_eq!(event.recurrence_rule, "");
    assert_eq!(event.visibility, "http://schemas.google.com/g/2005#event.default");
    assert_eq!(event.transparency, "http://schemas.google.com/g/2005#event.opaque");
    assert_eq!(event.anyone_can_add_self, "false");
    assert_eq!(event.guests_can_invite_others, "true");
    assert_eq!(event.guests_can_modify, "false");
    assert_eq!(event.guests_can_see_guests, "true");
    assert_eq!(event.sequence, "3");
}

#[test]
fn edit_uri_is_normalized_to_the_default_user() {
    let events = decode_fixture_feed(false);
    assert_eq!(
        events[0].common.edit_uri,
        "http://www.google.com/calendar/feeds/default/private/full/entry1/63342798051"
    );
    // An edit URI without the encoded address passes through untouched.
    assert_eq!(
        events[2].common.edit_uri,
        "http://www.google.com/calendar/feeds/default/private/full/entry3/63338848603"
    );
}

#[test]
fn organizer_status_comes_from_the_event_level() {
    let events = decode_fixture_feed(false);
    let organizer = &events[0].attendees[0];
    assert_eq!(organizer.email, "jane.doe@example.com");
    assert_eq!(organizer.relation, AttendeeRelation::Organizer);
    assert_eq!(organizer.status, AttendeeStatus::Confirmed);
    assert_eq!(organizer.attendee_type, AttendeeType::Unset);
}

#[test]
fn attendee_status_comes_from_its_own_sub_element() {
    let events = decode_fixture_feed(false);
    let bob = &events[0].attendees[1];
    assert_eq!(bob.email, "bob@example.com");
    assert_eq!(bob.relation, AttendeeRelation::Attendee);
    assert_eq!(bob.status, AttendeeStatus::Declined);
    assert_eq!(bob.attendee_type, AttendeeType::Unset);
}

#[test]
fn attendee_child_scan_stops_at_the_first_qualifier() {
    let events = decode_fixture_feed(false);
    // Carol's who carries attendeeType before attendeeStatus; the scan
    // stops at the type, leaving the status unset.
    let carol = &events[0].attendees[2];
    assert_eq!(carol.attendee_type, AttendeeType::Required);
    assert_eq!(carol.status, AttendeeStatus::Unset);
}

#[test]
fn attendee_without_email_gets_a_single_space() {
    let events = decode_fixture_feed(false);
    let speaker = &events[2].attendees[0];
    assert_eq!(speaker.email, " ");
    assert_eq!(speaker.relation, AttendeeRelation::Speaker);
}

#[test]
fn rel_without_a_vocabulary_label_maps_to_unknown() {
    let events = decode_fixture_feed(false);
    // entry4's who has rel `...#organizer` without the `event.` form.
    let who = &events[3].attendees[0];
    assert_eq!(who.relation, AttendeeRelation::Unknown);
    assert_eq!(who.status, AttendeeStatus::Unset);
    assert_eq!(who.email, "mallory@example.com");
}

#[test]
fn reminders_under_when_decode_in_document_order() {
    let events = decode_fixture_feed(false);
    assert_eq!(
        events[0].alarms,
        [
            Alarm {
                kind: AlarmKind::Alert,
                minutes_before: 30
            },
            Alarm {
                kind: AlarmKind::Email,
                minutes_before: 10
            },
        ]
    );
}

#[test]
fn recurring_entry_has_rule_and_entry_level_reminders() {
    let events = decode_fixture_feed(false);
    let recurring = &events[1];
    assert_eq!(
        recurring.recurrence_rule,
        "DTSTART;TZID=America/Los_Angeles:20080326T090000 DURATION:PT1800S RRULE:FREQ=WEEKLY;BYDAY=WE;UNTIL=20090325T160000Z"
    );
    assert_eq!(recurring.start, "");
    assert_eq!(recurring.end, "");
    assert_eq!(
        recurring.alarms,
        [Alarm {
            kind: AlarmKind::Email,
            minutes_before: 25
        }]
    );
}

#[test]
fn canceled_status_marks_the_entry_deleted() {
    let events = decode_fixture_feed(false);
    assert_eq!(events[3].status, STATUS_CANCELED);
    assert!(events[3].common.deleted);
    assert_eq!(events[2].status, STATUS_TENTATIVE);
    assert!(!events[2].common.deleted);
}

#[test]
fn missing_transparency_stays_empty() {
    let events = decode_fixture_feed(false);
    assert_eq!(events[3].transparency, "");
}

#[test]
fn raw_xml_is_captured_only_on_request() {
    let without = decode_fixture_feed(false);
    assert_eq!(without[0].common.raw_xml, "");

    let with = decode_fixture_feed(true);
    assert!(with[0].common.raw_xml.starts_with("<?xml"));
    assert!(with[0].common.raw_xml.contains("<entry"));
}

#[test]
fn captured_raw_xml_redecodes_to_the_same_record() {
    let with = decode_fixture_feed(true);
    let registry = NamespaceRegistry::gdata();

    for record in &with {
        let doc = Document::parse(&record.common.raw_xml).unwrap();
        let redecoded = decode_entry(&doc, &registry, false).unwrap();

        let mut expected = record.clone();
        expected.common.raw_xml = String::new();
        assert_eq!(redecoded, expected);
    }
}

#[test]
fn decodes_a_standalone_entry_document() {
    let event = decode(&minimal_entry()).unwrap();
    assert_eq!(event.common.title, "Standup");
    assert_eq!(event.common.etag, "\"Rh4_fTVSLyp7IWA9WxRVGUo.\"");
    assert_eq!(event.start, "2008-05-13T09:00:00.000Z");
    assert_eq!(event.sequence, "0");
    assert!(event.attendees.is_empty());
    assert!(event.alarms.is_empty());
}

#[test]
fn missing_etag_is_a_concurrency_token_error() {
    let xml = minimal_entry().replace(" gd:etag='\"Rh4_fTVSLyp7IWA9WxRVGUo.\"'", "");
    assert!(matches!(
        decode(&xml),
        Err(GDataError::MissingConcurrencyToken)
    ));
}

#[test]
fn each_mandatory_field_reports_its_own_name() {
    let cases = [
        (
            "<title type='text'>Standup</title>",
            "atom:title",
        ),
        (
            "<id>http://www.google.com/calendar/feeds/default/private/full/e77</id>",
            "atom:id",
        ),
        (
            "<link rel='edit' type='application/atom+xml' href='http://www.google.com/calendar/feeds/default/private/full/e77/63311056810'/>",
            "link[@rel='edit']",
        ),
        (
            "<gd:eventStatus value='http://schemas.google.com/g/2005#event.confirmed'/>",
            "gd:eventStatus",
        ),
        ("<gCal:anyoneCanAddSelf value='false'/>", "gCal:anyoneCanAddSelf"),
        ("<gCal:sequence value='0'/>", "gCal:sequence"),
        ("<published>2008-05-12T08:00:00.000Z</published>", "atom:published"),
        ("<updated>2008-05-12T08:00:10.000Z</updated>", "atom:updated"),
        (
            "<gd:visibility value='http://schemas.google.com/g/2005#event.default'/>",
            "gd:visibility",
        ),
    ];

    for (removed, expected_name) in cases {
        let xml = minimal_entry().replace(removed, "");
        match decode(&xml) {
            Err(GDataError::MissingRequiredField(name)) => {
                assert_eq!(name, expected_name, "after removing {removed}")
            }
            other => panic!("expected missing-field error for {removed}, got {other:?}"),
        }
    }
}

#[test]
fn unparseable_reminder_minutes_default_to_zero() {
    let xml = minimal_entry().replace(
        "<gd:when startTime='2008-05-13T09:00:00.000Z' endTime='2008-05-13T09:15:00.000Z'/>",
        "<gd:when startTime='2008-05-13T09:00:00.000Z' endTime='2008-05-13T09:15:00.000Z'>\
         <gd:reminder minutes='soon' method='popup'/>\
         </gd:when>",
    );
    let event = decode(&xml).unwrap();
    assert_eq!(
        event.alarms,
        [Alarm {
            kind: AlarmKind::Unknown,
            minutes_before: 0
        }]
    );
}
