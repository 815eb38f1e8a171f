use crate::calendar::types::{
    Alarm, AlarmKind, Attendee, AttendeeRelation, AttendeeStatus, AttendeeType, CalendarEntry,
    STATUS_CANCELED,
};
use crate::common::error::GDataError;
use crate::feed::ops::{self, FromEntryNode};
use crate::xml::{Document, NamespaceRegistry, NodeId, QueryContext};

impl FromEntryNode for CalendarEntry {
    fn from_entry_node(
        feed: &Document,
        entry: NodeId,
        registry: &NamespaceRegistry,
        keep_raw: bool,
    ) -> Result<Self, GDataError> {
        let copy = feed.standalone_copy(entry);
        decode_entry(&copy, registry, keep_raw)
    }
}

/// Decode one standalone calendar entry document. Fails fast at the first
/// missing mandatory field, discarding partial state.
pub fn decode_entry(
    doc: &Document,
    registry: &NamespaceRegistry,
    keep_raw: bool,
) -> Result<CalendarEntry, GDataError> {
    let q = QueryContext::new(doc, registry);
    let mut entry = CalendarEntry::default();

    entry.common.etag = ops::entry_etag(doc)?;
    if keep_raw {
        entry.common.raw_xml = doc.to_xml();
    }
    entry.common.title = ops::require_scalar(&q, "//atom:entry/atom:title/text()", "atom:title")?;
    entry.common.id = ops::require_scalar(&q, "//atom:entry/atom:id/text()", "atom:id")?;
    entry.common.edit_uri = ops::entry_edit_uri(&q)?;

    entry.content = q.scalar("//atom:entry/atom:content/text()")?;
    entry.where_text = q.scalar_attr("//atom:entry/gd:where", "valueString")?;

    entry.status =
        ops::require_scalar_attr(&q, "//atom:entry/gd:eventStatus", "value", "gd:eventStatus")?;
    entry.common.deleted = entry.status == STATUS_CANCELED;

    entry.attendees = decode_attendees(&q)?;

    // Recurring templates carry the rule instead of a concrete occurrence
    // time, and their reminders sit directly under the entry rather than
    // under gd:when.
    entry.recurrence_rule = q.scalar("//atom:entry/gd:recurrence/text()")?;
    if entry.recurrence_rule.is_empty() {
        entry.start = q.scalar_attr("//atom:entry/gd:when", "startTime")?;
        entry.end = q.scalar_attr("//atom:entry/gd:when", "endTime")?;
        entry.alarms = decode_alarms(&q, "//atom:entry/gd:when/gd:reminder")?;
    } else {
        entry.alarms = decode_alarms(&q, "//atom:entry/gd:reminder")?;
    }

    entry.anyone_can_add_self = ops::require_scalar_attr(
        &q,
        "//atom:entry/gCal:anyoneCanAddSelf",
        "value",
        "gCal:anyoneCanAddSelf",
    )?;
    entry.guests_can_invite_others = ops::require_scalar_attr(
        &q,
        "//atom:entry/gCal:guestsCanInviteOthers",
        "value",
        "gCal:guestsCanInviteOthers",
    )?;
    entry.guests_can_modify = ops::require_scalar_attr(
        &q,
        "//atom:entry/gCal:guestsCanModify",
        "value",
        "gCal:guestsCanModify",
    )?;
    entry.guests_can_see_guests = ops::require_scalar_attr(
        &q,
        "//atom:entry/gCal:guestsCanSeeGuests",
        "value",
        "gCal:guestsCanSeeGuests",
    )?;
    entry.sequence =
        ops::require_scalar_attr(&q, "//atom:entry/gCal:sequence", "value", "gCal:sequence")?;

    ops::decode_timestamps(&q, &mut entry.common)?;
    entry.visibility =
        ops::require_scalar_attr(&q, "//atom:entry/gd:visibility", "value", "gd:visibility")?;
    entry.transparency = q.scalar_attr("//atom:entry/gd:transparency", "value")?;

    Ok(entry)
}

/// Resolve every `gd:who` participant. Organizer status lives at the event
/// level (`gd:eventStatus` on the parent), everyone else's in the who node's
/// own `gd:attendeeStatus`/`gd:attendeeType` children; the child scan stops
/// at the first of either.
fn decode_attendees(q: &QueryContext<'_>) -> Result<Vec<Attendee>, GDataError> {
    let doc = q.document();
    let nodes = q.nodes("//atom:entry/gd:who")?;
    let mut out = Vec::with_capacity(nodes.len());

    for node in nodes {
        let mut attendee = Attendee::default();
        // A single space distinguishes "attribute absent" from "no match".
        attendee.email = match doc.attr(node, "email") {
            Some(v) => v.to_string(),
            None => " ".to_string(),
        };
        let rel = doc.attr(node, "rel").unwrap_or("");
        attendee.relation = AttendeeRelation::from_label(label_after_dot(rel));

        if attendee.relation == AttendeeRelation::Organizer {
            if let Some(parent) = doc.parent(node) {
                for child in doc.child_elements(parent) {
                    if doc.local_name(child) == Some("eventStatus") {
                        let value = doc.attr(child, "value").unwrap_or("");
                        attendee.status = AttendeeStatus::from_event_label(label_after_dot(value));
                        break;
                    }
                }
            }
        } else {
            for child in doc.child_elements(node) {
                match doc.local_name(child) {
                    Some("attendeeStatus") => {
                        let value = doc.attr(child, "value").unwrap_or("");
                        attendee.status =
                            AttendeeStatus::from_attendee_label(label_after_dot(value));
                        break;
                    }
                    Some("attendeeType") => {
                        let value = doc.attr(child, "value").unwrap_or("");
                        attendee.attendee_type = AttendeeType::from_label(label_after_dot(value));
                        break;
                    }
                    _ => {}
                }
            }
        }
        out.push(attendee);
    }
    Ok(out)
}

/// Read every reminder under `path`. Zero matches just means no reminders
/// configured.
fn decode_alarms(q: &QueryContext<'_>, path: &str) -> Result<Vec<Alarm>, GDataError> {
    let doc = q.document();
    let nodes = q.nodes(path)?;
    let mut out = Vec::with_capacity(nodes.len());
    for node in nodes {
        let kind = AlarmKind::from_method(doc.attr(node, "method").unwrap_or(""));
        let minutes_before = doc
            .attr(node, "minutes")
            .and_then(|m| m.trim().parse::<u32>().ok())
            .unwrap_or(0);
        out.push(Alarm {
            kind,
            minutes_before,
        });
    }
    Ok(out)
}

/// The vocabulary label after the last `.` of a status or relation URI.
/// Values without a dot map to nothing.
fn label_after_dot(value: &str) -> &str {
    value.rsplit_once('.').map_or("", |(_, label)| label)
}
