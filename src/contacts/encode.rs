use crate::contacts::types::{ContactEntry, KIND_CONTACT};
use crate::feed::CATEGORY_SCHEME_KIND;
use crate::xml::{Document, NS_ATOM, NS_GCONTACT, NS_GDATA, NodeId};

/// Serialize a contact entry to its Atom wire form. Same conditional shape
/// as the calendar encoder: category/title/content always, server-assigned
/// and extension fields only when the record carries them.
///
/// The `gd:deleted` marker is server state and never emitted; `deleted` is
/// re-inferred at decode time, so it does not round-trip through an encode.
pub fn encode_entry(entry: &ContactEntry) -> String {
    let mut doc = Document::new();
    let root = doc.add_element(doc.root(), "entry");
    doc.set_attr(root, "xmlns", NS_ATOM);
    doc.set_attr(root, "xmlns:gd", NS_GDATA);
    doc.set_attr(root, "xmlns:gContact", NS_GCONTACT);
    if !entry.common.etag.is_empty() {
        doc.set_attr(root, "gd:etag", &entry.common.etag);
    }

    let category = doc.add_element(root, "category");
    doc.set_attr(category, "scheme", CATEGORY_SCHEME_KIND);
    doc.set_attr(category, "term", KIND_CONTACT);

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

    if !entry.structured_name.is_empty() {
        let name = doc.add_element(root, "gd:name");
        for (part, value) in &entry.structured_name {
            let child = doc.add_element(name, &format!("gd:{part}"));
            doc.add_text(child, value);
        }
    }

    for (i, email) in entry.emails.iter().enumerate() {
        let el = doc.add_element(root, "gd:email");
        doc.set_attr(el, "rel", &rel_uri(&email.rel_type));
        doc.set_attr(el, "address", &email.value);
        if entry.primary_email == Some(i) {
            doc.set_attr(el, "primary", "true");
        }
    }

    for (i, phone) in entry.phones.iter().enumerate() {
        let el = doc.add_element(root, "gd:phoneNumber");
        doc.set_attr(el, "rel", &rel_uri(&phone.rel_type));
        if entry.primary_phone == Some(i) {
            doc.set_attr(el, "primary", "true");
        }
        doc.add_text(el, &phone.value);
    }

    for (i, im) in entry.ims.iter().enumerate() {
        let el = doc.add_element(root, "gd:im");
        doc.set_attr(el, "rel", &rel_uri(&im.rel_type));
        if !im.protocol.is_empty() {
            doc.set_attr(el, "protocol", &rel_uri(&im.protocol));
        }
        doc.set_attr(el, "address", &im.value);
        if entry.primary_im == Some(i) {
            doc.set_attr(el, "primary", "true");
        }
    }

    for (i, address) in entry.addresses.iter().enumerate() {
        let el = doc.add_element(root, "gd:structuredPostalAddress");
        doc.set_attr(el, "rel", &rel_uri(&address.rel_type));
        if entry.primary_address == Some(i) {
            doc.set_attr(el, "primary", "true");
        }
        for (part, value) in &address.fields {
            let child = doc.add_element(el, &format!("gd:{part}"));
            doc.add_text(child, value);
        }
    }
    if !entry.legacy_postal_address.is_empty() {
        let el = doc.add_element(root, "gd:postalAddress");
        doc.add_text(el, &entry.legacy_postal_address);
    }

    if !entry.org_name.is_empty() || !entry.org_title.is_empty() {
        let org = doc.add_element(root, "gd:organization");
        doc.set_attr(org, "rel", &rel_uri("other"));
        if !entry.org_name.is_empty() {
            let el = doc.add_element(org, "gd:orgName");
            doc.add_text(el, &entry.org_name);
        }
        if !entry.org_title.is_empty() {
            let el = doc.add_element(org, "gd:orgTitle");
            doc.add_text(el, &entry.org_title);
        }
    }

    text_child(&mut doc, root, "gContact:nickname", &entry.nickname);
    text_child(&mut doc, root, "gContact:occupation", &entry.occupation);
    if !entry.birthday.is_empty() {
        let el = doc.add_element(root, "gContact:birthday");
        doc.set_attr(el, "when", &entry.birthday);
    }
    if !entry.homepage_url.is_empty() {
        let el = doc.add_element(root, "gContact:website");
        doc.set_attr(el, "rel", "home-page");
        doc.set_attr(el, "href", &entry.homepage_url);
    }
    if !entry.blog_url.is_empty() {
        let el = doc.add_element(root, "gContact:website");
        doc.set_attr(el, "rel", "blog");
        doc.set_attr(el, "href", &entry.blog_url);
    }
    for group in &entry.group_memberships {
        let el = doc.add_element(root, "gContact:groupMembershipInfo");
        doc.set_attr(el, "href", group);
    }

    doc.to_xml()
}

/// Relation URI for a type label, defaulting empty labels to `other`.
fn rel_uri(label: &str) -> String {
    let label = if label.is_empty() { "other" } else { label };
    format!("{NS_GDATA}#{label}")
}

fn text_child(doc: &mut Document, parent: NodeId, name: &str, value: &str) {
    if !value.is_empty() {
        let el = doc.add_element(parent, name);
        doc.add_text(el, value);
    }
}
