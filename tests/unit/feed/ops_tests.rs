use gdata_rs::calendar::CalendarEntry;
use gdata_rs::feed::{decode_feed, entries, entry_etag, normalize_edit_uri, total_results};
use gdata_rs::xml::Document;
use gdata_rs::{GDataError, NamespaceRegistry};

use crate::fixtures::CALENDAR_FEED;

#[test]
fn total_results_reads_the_feed_header() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(CALENDAR_FEED).unwrap();
    assert_eq!(total_results(&doc, &registry).unwrap(), 4);
}

#[test]
fn total_results_requires_exactly_one_numeric_node() {
    let registry = NamespaceRegistry::gdata();

    let missing = Document::parse("<feed xmlns='http://www.w3.org/2005/Atom'/>").unwrap();
    assert!(matches!(
        total_results(&missing, &registry),
        Err(GDataError::MissingRequiredField("openSearch:totalResults"))
    ));

    let garbled = Document::parse(
        "<feed xmlns='http://www.w3.org/2005/Atom' xmlns:openSearch='http://a9.com/-/spec/opensearchrss/1.0/'>\
         <openSearch:totalResults>soon</openSearch:totalResults>\
         </feed>",
    )
    .unwrap();
    assert!(matches!(
        total_results(&garbled, &registry),
        Err(GDataError::MissingRequiredField("openSearch:totalResults"))
    ));

    let duplicated = Document::parse(
        "<feed xmlns='http://www.w3.org/2005/Atom' xmlns:openSearch='http://a9.com/-/spec/opensearchrss/1.0/'>\
         <openSearch:totalResults>1</openSearch:totalResults>\
         <openSearch:totalResults>1</openSearch:totalResults>\
         </feed>",
    )
    .unwrap();
    assert!(matches!(
        total_results(&duplicated, &registry),
        Err(GDataError::MissingRequiredField("openSearch:totalResults"))
    ));
}

#[test]
fn entries_counts_feed_and_bare_entry_documents() {
    let registry = NamespaceRegistry::gdata();

    let feed = Document::parse(CALENDAR_FEED).unwrap();
    assert_eq!(entries(&feed, &registry).unwrap().len(), 4);

    // Create and update responses are a bare entry document; the root
    // element itself must count.
    let bare =
        Document::parse("<entry xmlns='http://www.w3.org/2005/Atom'><title>t</title></entry>")
            .unwrap();
    assert_eq!(entries(&bare, &registry).unwrap().len(), 1);
}

#[test]
fn decode_feed_checks_the_expected_count_before_decoding() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(CALENDAR_FEED).unwrap();

    let decoded: Vec<CalendarEntry> = decode_feed(&doc, &registry, 4, false).unwrap();
    assert_eq!(decoded.len(), 4);

    let err = decode_feed::<CalendarEntry>(&doc, &registry, 5, false).unwrap_err();
    assert!(matches!(
        err,
        GDataError::EntryCountMismatch {
            expected: 5,
            found: 4
        }
    ));
}

#[test]
fn normalize_rewrites_the_encoded_user_to_default() {
    assert_eq!(
        normalize_edit_uri(
            "http://www.google.com/calendar/feeds/jane.doe%40example.com/private/full/entry1/63342798051"
        ),
        "http://www.google.com/calendar/feeds/default/private/full/entry1/63342798051"
    );
}

#[test]
fn normalize_is_idempotent() {
    let once = normalize_edit_uri(
        "http://www.google.com/calendar/feeds/jane.doe%40example.com/private/full/e/1",
    );
    assert_eq!(normalize_edit_uri(&once), once);
}

#[test]
fn normalize_passes_through_uris_without_the_marker() {
    let plain = "http://www.google.com/calendar/feeds/default/private/full/e/1";
    assert_eq!(normalize_edit_uri(plain), plain);

    // Contacts edit URIs carry the encoded address but no private segment.
    let contact = "http://www.google.com/m8/feeds/contacts/jane.doe%40example.com/full/c1/99";
    assert_eq!(normalize_edit_uri(contact), contact);
}

#[test]
fn entry_etag_reads_the_root_concurrency_token() {
    let doc = Document::parse(
        "<entry xmlns='http://www.w3.org/2005/Atom' xmlns:gd='http://schemas.google.com/g/2005' gd:etag='\"Rh4_fTVS\"'/>",
    )
    .unwrap();
    assert_eq!(entry_etag(&doc).unwrap(), "\"Rh4_fTVS\"");
}

#[test]
fn entry_etag_treats_missing_and_empty_as_absent() {
    let missing = Document::parse("<entry xmlns='http://www.w3.org/2005/Atom'/>").unwrap();
    assert!(matches!(
        entry_etag(&missing),
        Err(GDataError::MissingConcurrencyToken)
    ));

    let empty = Document::parse(
        "<entry xmlns='http://www.w3.org/2005/Atom' xmlns:gd='http://schemas.google.com/g/2005' gd:etag=''/>",
    )
    .unwrap();
    assert!(matches!(
        entry_etag(&empty),
        Err(GDataError::MissingConcurrencyToken)
    ));
}
