use gdata_rs::xml::{Document, QueryContext, ValueSource, uri_fragment};
use gdata_rs::NamespaceRegistry;

const SCALAR_DOC: &str = "<entry xmlns='http://www.w3.org/2005/Atom'>\
<title>One</title>\
<note>x</note><note>y</note>\
<empty/>\
</entry>";

#[test]
fn scalar_returns_the_single_matched_text_node() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(SCALAR_DOC).unwrap();
    let q = QueryContext::new(&doc, &registry);
    assert_eq!(q.scalar("//atom:entry/atom:title/text()").unwrap(), "One");
}

#[test]
fn scalar_is_empty_unless_exactly_one_text_node_matches() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(SCALAR_DOC).unwrap();
    let q = QueryContext::new(&doc, &registry);

    // Two matches.
    assert_eq!(q.scalar("//atom:entry/atom:note/text()").unwrap(), "");
    // Zero matches.
    assert_eq!(q.scalar("//atom:entry/atom:missing/text()").unwrap(), "");
    // Element with no text child.
    assert_eq!(q.scalar("//atom:entry/atom:empty/text()").unwrap(), "");
    // Single match that is an element node, not a text node.
    assert_eq!(q.scalar("//atom:entry/atom:title").unwrap(), "");
}

#[test]
fn scalar_attr_requires_a_single_match_too() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(
        "<entry xmlns='http://www.w3.org/2005/Atom'>\
         <link rel='edit' href='/e/1'/>\
         <note a='1'/><note a='2'/>\
         </entry>",
    )
    .unwrap();
    let q = QueryContext::new(&doc, &registry);

    assert_eq!(q.scalar_attr("//atom:entry/atom:link", "href").unwrap(), "/e/1");
    assert_eq!(q.scalar_attr("//atom:entry/atom:link", "absent").unwrap(), "");
    assert_eq!(q.scalar_attr("//atom:entry/atom:note", "a").unwrap(), "");
}

const MULTI_DOC: &str = "<entry xmlns='http://www.w3.org/2005/Atom' xmlns:gd='http://schemas.google.com/g/2005'>\
<gd:email rel='http://schemas.google.com/g/2005#work' address='a@example.com'/>\
<gd:email address='b@example.com' primary='TRUE'/>\
<gd:email rel='no-fragment-here' address='c@example.com' primary='true'/>\
</entry>";

#[test]
fn multi_keeps_values_and_type_fragments_aligned() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(MULTI_DOC).unwrap();
    let q = QueryContext::new(&doc, &registry);

    let field = q
        .multi(
            "//atom:entry/gd:email",
            ValueSource::Attr("address"),
            Some("rel"),
            None,
            Some("primary"),
        )
        .unwrap();

    assert_eq!(field.values, ["a@example.com", "b@example.com", "c@example.com"]);
    // Absent and fragment-less rel attributes pad with empty labels so the
    // vectors stay index-aligned.
    assert_eq!(field.types.as_deref(), Some(&["work".to_string(), String::new(), String::new()][..]));
    assert!(field.protocols.is_none());
    // Only a literal `true` marks the preferred node; `TRUE` does not.
    assert_eq!(field.pref_index, Some(2));
}

#[test]
fn multi_over_text_content_and_without_pref_attribute() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(
        "<entry xmlns='http://www.w3.org/2005/Atom' xmlns:gd='http://schemas.google.com/g/2005'>\
         <gd:phoneNumber rel='http://schemas.google.com/g/2005#mobile'>+44 1</gd:phoneNumber>\
         <gd:phoneNumber>+44 2</gd:phoneNumber>\
         </entry>",
    )
    .unwrap();
    let q = QueryContext::new(&doc, &registry);

    let field = q
        .multi("//atom:entry/gd:phoneNumber", ValueSource::Text, Some("rel"), None, None)
        .unwrap();
    assert_eq!(field.values, ["+44 1", "+44 2"]);
    assert_eq!(field.types.as_deref(), Some(&["mobile".to_string(), String::new()][..]));
    assert_eq!(field.pref_index, None);
}

#[test]
fn structured_flattens_children_and_skips_textless_ones() {
    let registry = NamespaceRegistry::gdata();
    let doc = Document::parse(
        "<entry xmlns='http://www.w3.org/2005/Atom' xmlns:gd='http://schemas.google.com/g/2005'>\
         <gd:structuredPostalAddress rel='http://schemas.google.com/g/2005#work'>\
         <gd:street>5 High St</gd:street><gd:pobox/><gd:city>Leeds</gd:city>\
         </gd:structuredPostalAddress>\
         <gd:structuredPostalAddress rel='http://schemas.google.com/g/2005#home' primary='true'>\
         <gd:city>York</gd:city>\
         </gd:structuredPostalAddress>\
         </entry>",
    )
    .unwrap();
    let q = QueryContext::new(&doc, &registry);

    let field = q
        .structured("//atom:entry/gd:structuredPostalAddress", Some("rel"), Some("primary"))
        .unwrap();

    assert_eq!(field.nodes.len(), 2);
    assert_eq!(field.nodes[0].rel_type, "work");
    assert_eq!(
        field.nodes[0].fields,
        [
            ("street".to_string(), "5 High St".to_string()),
            ("city".to_string(), "Leeds".to_string()),
        ]
    );
    assert_eq!(field.nodes[1].rel_type, "home");
    assert_eq!(field.nodes[1].fields, [("city".to_string(), "York".to_string())]);
    assert_eq!(field.pref_index, Some(1));
}

#[test]
fn uri_fragment_is_the_substring_after_the_last_hash() {
    assert_eq!(uri_fragment("http://schemas.google.com/g/2005#work"), "work");
    assert_eq!(uri_fragment("a#b#c"), "c");
    assert_eq!(uri_fragment("no-fragment"), "");
    assert_eq!(uri_fragment(""), "");
    assert_eq!(uri_fragment("trailing#"), "");
}
