use crate::calendar::types::{CalendarEntry, KIND_EVENT, TRANSPARENCY_OPAQUE};
use crate::feed::CATEGORY_SCHEME_KIND;
use crate::xml::{Document, NS_ATOM, NS_GCAL, NS_GDATA};

/// Serialize a calendar entry to its Atom wire form. Category, title and
/// content are always present; server-assigned fields (id, edit link, etag)
/// and extension elements appear only when the record carries them, so a
/// freshly built entry stays a valid create body. Field contents are not
/// validated.
pub fn encode_entry(entry: &CalendarEntry) -> String {
    let mut doc = Document::new();
    let root = doc.add_element(doc.root(), "entry");
    doc.set_attr(root, "xmlns", NS_ATOM);
    doc.set_attr(root, "xmlns:gd", NS_GDATA);
    doc.set_attr(root, "xmlns:gCal", NS_GCAL);
    if !entry.common.etag.is_empty() {
        doc.set_attr(root, "gd:etag", &entry.common.etag);
    }

    let category = doc.add_element(root, "category");
    doc.set_attr(category, "scheme", CATEGORY_SCHEME_KIND);
    doc.set_attr(category, "term", KIND_EVENT);

    let title = doc.add_element(root, "title");
    doc.set_attr(title, "type", "text");
    doc.add_text(title, &entry.common.title);

    let content = doc.add_element(root, "content");
    doc.set_attr(content, "type", "text");
    doc.add_text(content, &entry.content);

    if !entry.common.id.is_empty() {
        let id = doc.add_element(root, "id");
        doc.add_text(id, &entry.common.id);
    }
    if !entry.common.edit_uri.is_empty() {
        let link = doc.add_element(root, "link");
        doc.set_attr(link, "rel", "edit");
        doc.set_attr(link, "type", "application/atom+xml");
        doc.set_attr(link, "href", &entry.common.edit_uri);
    }
    if !entry.common.published.is_empty() {
        let published = doc.add_element(root, "published");
        doc.add_text(published, &entry.common.published);
    }
    if !entry.common.updated.is_empty() {
        let updated = doc.add_element(root, "updated");
        doc.add_text(updated, &entry.common.updated);
    }

    let transparency = doc.add_element(root, "gd:transparency");
    let value = if entry.transparency.is_empty() {
        TRANSPARENCY_OPAQUE
    } else {
        &entry.transparency
    };
    doc.set_attr(transparency, "value", value);

    if !entry.status.is_empty() {
        let status = doc.add_element(root, "gd:eventStatus");
        doc.set_attr(status, "value", &entry.status);
    }
    if !entry.where_text.is_empty() {
        let where_el = doc.add_element(root, "gd:where");
        doc.set_attr(where_el, "valueString", &entry.where_text);
    }
    if !entry.visibility.is_empty() {
        let visibility = doc.add_element(root, "gd:visibility");
        doc.set_attr(visibility, "value", &entry.visibility);
    }

    if !entry.recurrence_rule.is_empty() {
        let recurrence = doc.add_element(root, "gd:recurrence");
        doc.add_text(recurrence, &entry.recurrence_rule);
    } else if !entry.start.is_empty() || !entry.end.is_empty() {
        let when = doc.add_element(root, "gd:when");
        if !entry.start.is_empty() {
            doc.set_attr(when, "startTime", &entry.start);
        }
        if !entry.end.is_empty() {
            doc.set_attr(when, "endTime", &entry.end);
        }
    }

    let flags = [
        ("gCal:anyoneCanAddSelf", &entry.anyone_can_add_self),
        ("gCal:guestsCanInviteOthers", &entry.guests_can_invite_others),
        ("gCal:guestsCanModify", &entry.guests_can_modify),
        ("gCal:guestsCanSeeGuests", &entry.guests_can_see_guests),
        ("gCal:sequence", &entry.sequence),
    ];
    for (name, value) in flags {
        if !value.is_empty() {
            let el = doc.add_element(root, name);
            doc.set_attr(el, "value", value);
        }
    }

    doc.to_xml()
}
