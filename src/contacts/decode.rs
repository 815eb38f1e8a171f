use crate::common::error::GDataError;
use crate::contacts::types::{ContactEntry, ImValue, REL_PHOTO, StructuredAddress, TypedValue};
use crate::feed::ops::{self, FromEntryNode};
use crate::xml::{Document, MultiField, NamespaceRegistry, NodeId, QueryContext, ValueSource};

impl FromEntryNode for ContactEntry {
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

/// Decode one standalone contact entry document. Fails fast at the first
/// missing mandatory field.
pub fn decode_entry(
    doc: &Document,
    registry: &NamespaceRegistry,
    keep_raw: bool,
) -> Result<ContactEntry, GDataError> {
    let q = QueryContext::new(doc, registry);
    let mut entry = ContactEntry::default();

    entry.common.etag = ops::entry_etag(doc)?;
    if keep_raw {
        entry.common.raw_xml = doc.to_xml();
    }

    // A flat title and a structured name are mutually acceptable
    // alternatives; only both missing is a failure.
    entry.common.title = q.scalar("//atom:entry/atom:title/text()")?;
    let name = q.structured("//atom:entry/gd:name", None, None)?;
    entry.structured_name = name.nodes.into_iter().flat_map(|n| n.fields).collect();
    if entry.common.title.is_empty() && entry.structured_name.is_empty() {
        return Err(GDataError::MissingRequiredField("atom:title or gd:name"));
    }

    entry.common.id = ops::require_scalar(&q, "//atom:entry/atom:id/text()", "atom:id")?;
    entry.common.edit_uri = ops::entry_edit_uri(&q)?;
    entry.content = q.scalar("//atom:entry/atom:content/text()")?;

    // Inverted relative to calendar entries: the gd:deleted marker being
    // present means the contact is NOT deleted, its absence means deleted.
    let deleted_markers = q.nodes("//atom:entry/gd:deleted")?;
    entry.common.deleted = deleted_markers.is_empty();

    let emails = q.multi(
        "//atom:entry/gd:email",
        ValueSource::Attr("address"),
        Some("rel"),
        None,
        Some("primary"),
    )?;
    (entry.emails, entry.primary_email) = typed_values(emails);

    let phones = q.multi(
        "//atom:entry/gd:phoneNumber",
        ValueSource::Text,
        Some("rel"),
        None,
        Some("primary"),
    )?;
    (entry.phones, entry.primary_phone) = typed_values(phones);

    let ims = q.multi(
        "//atom:entry/gd:im",
        ValueSource::Attr("address"),
        Some("rel"),
        Some("protocol"),
        Some("primary"),
    )?;
    entry.primary_im = ims.pref_index;
    entry.ims = im_values(ims);

    let addresses = q.structured(
        "//atom:entry/gd:structuredPostalAddress",
        Some("rel"),
        Some("primary"),
    )?;
    entry.primary_address = addresses.pref_index;
    entry.addresses = addresses
        .nodes
        .into_iter()
        .map(|n| StructuredAddress {
            fields: n.fields,
            rel_type: n.rel_type,
        })
        .collect();
    entry.legacy_postal_address = q.scalar("//atom:entry/gd:postalAddress/text()")?;

    entry.group_memberships = q
        .multi(
            "//atom:entry/gContact:groupMembershipInfo",
            ValueSource::Attr("href"),
            None,
            None,
            None,
        )?
        .values;

    entry.org_name = q.scalar("//atom:entry/gd:organization/gd:orgName/text()")?;
    entry.org_title = q.scalar("//atom:entry/gd:organization/gd:orgTitle/text()")?;
    entry.occupation = q.scalar("//atom:entry/gContact:occupation/text()")?;
    entry.nickname = q.scalar("//atom:entry/gContact:nickname/text()")?;
    entry.homepage_url = q.scalar_attr("//atom:entry/gContact:website[@rel='home-page']", "href")?;
    entry.blog_url = q.scalar_attr("//atom:entry/gContact:website[@rel='blog']", "href")?;
    entry.birthday = q.scalar_attr("//atom:entry/gContact:birthday", "when")?;

    let photo_path = format!("//atom:entry/atom:link[@rel='{REL_PHOTO}']");
    entry.photo_link = q.scalar_attr(&photo_path, "href")?;
    // The photo link always exists; a photo is actually stored only once the
    // link carries its own concurrency token.
    if let [link] = q.nodes(&photo_path)?[..] {
        entry.has_photo = doc.attr(link, "etag").is_some();
    }

    ops::decode_timestamps(&q, &mut entry.common)?;

    Ok(entry)
}

fn typed_values(field: MultiField) -> (Vec<TypedValue>, Option<usize>) {
    let types = field.types.unwrap_or_default();
    let values = field
        .values
        .into_iter()
        .enumerate()
        .map(|(i, value)| TypedValue {
            value,
            rel_type: types.get(i).cloned().unwrap_or_default(),
        })
        .collect();
    (values, field.pref_index)
}

fn im_values(field: MultiField) -> Vec<ImValue> {
    let types = field.types.unwrap_or_default();
    let protocols = field.protocols.unwrap_or_default();
    field
        .values
        .into_iter()
        .enumerate()
        .map(|(i, value)| ImValue {
            value,
            rel_type: types.get(i).cloned().unwrap_or_default(),
            protocol: protocols.get(i).cloned().unwrap_or_default(),
        })
        .collect()
}
