use crate::feed::EntryCommon;

pub const KIND_CONTACT: &str = "http://schemas.google.com/g/2005#contact";
/// Link rel of a contact's photo. Lives under the 2008 contacts rel scheme,
/// not the gContact extension namespace.
pub const REL_PHOTO: &str = "http://schemas.google.com/contacts/2008/rel#photo";

/// A value with its semantic type label (the fragment of its `rel` URI).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedValue {
    pub value: String,
    pub rel_type: String,
}

/// An instant-messaging address: typed value plus protocol label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImValue {
    pub value: String,
    pub rel_type: String,
    pub protocol: String,
}

/// A structured postal address: ordered (part name, part value) pairs plus
/// the address type label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StructuredAddress {
    pub fields: Vec<(String, String)>,
    pub rel_type: String,
}

/// A decoded contact entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactEntry {
    pub common: EntryCommon,
    pub content: String,
    /// Ordered (part name, part value) pairs of `gd:name`, e.g.
    /// `("givenName", "Ada")`. May be empty when a flat title is present.
    pub structured_name: Vec<(String, String)>,
    pub emails: Vec<TypedValue>,
    pub primary_email: Option<usize>,
    pub phones: Vec<TypedValue>,
    pub primary_phone: Option<usize>,
    pub ims: Vec<ImValue>,
    pub primary_im: Option<usize>,
    pub addresses: Vec<StructuredAddress>,
    pub primary_address: Option<usize>,
    /// Flat address of the older server API shape.
    pub legacy_postal_address: String,
    pub group_memberships: Vec<String>,
    pub org_name: String,
    pub org_title: String,
    pub occupation: String,
    pub nickname: String,
    pub homepage_url: String,
    pub blog_url: String,
    pub birthday: String,
    pub photo_link: String,
    pub has_photo: bool,
}
