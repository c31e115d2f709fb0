use super::*;

#[test]
fn name_beats_property() {
    let options = MetaOptions::new().with_name("a").with_property("b");
    let record = MetaRecord::normalize(&options);
    assert_eq!(record.keyword(), MetaKeyword::Name);
    assert_eq!(record.identifying_value(), Some("a"));
    assert_eq!(record.property(), Some("b"));
}

#[test]
fn charset_beats_everything() {
    let options = MetaOptions::new()
        .with_name("a")
        .with_property("b")
        .with_http_equiv("c")
        .with_charset("utf-8");
    assert_eq!(MetaKeyword::for_options(&options), MetaKeyword::Charset);
}

#[test]
fn property_beats_http_equiv() {
    let options = MetaOptions::new()
        .with_property("og:title")
        .with_http_equiv("refresh");
    assert_eq!(MetaKeyword::for_options(&options), MetaKeyword::Property);
}

#[test]
fn falls_back_to_http_equiv() {
    let explicit = MetaOptions::http_equiv("refresh", "5");
    assert_eq!(MetaKeyword::for_options(&explicit), MetaKeyword::HttpEquiv);

    let bare = MetaOptions::new().with_content("orphan");
    let record = MetaRecord::normalize(&bare);
    assert_eq!(record.keyword(), MetaKeyword::HttpEquiv);
    assert_eq!(record.identifying_value(), None);
    assert_eq!(record.content(), Some("orphan"));
}

#[test]
fn empty_strings_do_not_identify() {
    let options = MetaOptions::new().with_charset("").with_name("viewport");
    assert_eq!(MetaKeyword::for_options(&options), MetaKeyword::Name);
}

#[test]
fn normalize_keeps_order_and_absent_fields() {
    let records = normalize(&[
        MetaOptions::named("description", "x"),
        MetaOptions::charset("utf-8"),
    ]);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].keyword(), MetaKeyword::Name);
    assert_eq!(records[0].charset(), None);
    assert_eq!(records[0].http_equiv(), None);
    assert_eq!(records[0].property(), None);
    assert_eq!(records[1].keyword(), MetaKeyword::Charset);
    assert_eq!(records[1].content(), None);
}

#[test]
fn content_equal_records_share_structural_key() {
    let a = MetaRecord::normalize(&MetaOptions::named("description", "x"));
    let b = MetaRecord::normalize(&MetaOptions::named("description", "x"));
    let c = MetaRecord::normalize(&MetaOptions::named("description", "y"));
    assert_eq!(a, b);
    assert_eq!(a.structural_key(), b.structural_key());
    assert_ne!(a, c);
    assert_ne!(a.structural_key(), c.structural_key());
}

#[test]
fn instances_follow_identifying_value() {
    let description = MetaRecord::normalize(&MetaOptions::named("description", "x"));
    let other_description = MetaRecord::normalize(&MetaOptions::named("description", "y"));
    let keywords = MetaRecord::normalize(&MetaOptions::named("keywords", "x"));
    assert_eq!(description.instance(), other_description.instance());
    assert_ne!(description.instance(), keywords.instance());

    let utf8 = MetaRecord::normalize(&MetaOptions::charset("utf-8"));
    let latin1 = MetaRecord::normalize(&MetaOptions::charset("iso-8859-1"));
    assert_eq!(utf8.instance(), latin1.instance());
    assert_eq!(utf8.instance().value(), None);
}

#[test]
fn attributes_skip_unset_fields() {
    let record = MetaRecord::normalize(&MetaOptions::property("og:title", "Home"));
    let attributes: Vec<_> = record.attributes().collect();
    assert_eq!(attributes, vec![("property", "og:title"), ("content", "Home")]);
}
