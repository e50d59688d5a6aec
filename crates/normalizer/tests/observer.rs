use samewindow_dom::{Document, NodeId};
use samewindow_normalizer::{normalize_links, LinkObserver, NormalizeStats};

fn page() -> (Document, NodeId) {
    let mut doc = Document::new();
    let root = doc.root();
    let html = doc.append_element(root, "html", &[]).unwrap();
    let body = doc.append_element(html, "body", &[]).unwrap();
    (doc, body)
}

#[test]
fn inserted_anchor_is_retargeted() {
    let (mut doc, body) = page();
    normalize_links(&mut doc);
    let mut observer = LinkObserver::observe(&mut doc, body);

    let link = doc
        .append_element(body, "a", &[("href", "/x"), ("target", "_blank")])
        .unwrap();
    assert_eq!(doc.attribute(link, "target"), Some("_blank"));

    let stats = observer.process(&mut doc);
    assert_eq!(
        stats,
        NormalizeStats {
            scanned: 1,
            rewritten: 1
        }
    );
    assert_eq!(doc.attribute(link, "target"), Some("_self"));
}

#[test]
fn anchors_nested_in_inserted_subtree_are_retargeted() {
    let (mut doc, body) = page();
    let mut observer = LinkObserver::observe(&mut doc, body);

    // build the subtree detached, then insert it in one go
    let card = doc.create_element("div");
    let header = doc.create_element("h2");
    let deep = doc.create_element("a");
    doc.set_attribute(deep, "target", "_blank").unwrap();
    doc.append_child(header, deep).unwrap();
    doc.append_child(card, header).unwrap();
    let sibling = doc.create_element("a");
    doc.set_attribute(sibling, "target", "_parent").unwrap();
    doc.append_child(card, sibling).unwrap();
    doc.append_text(card, "caption").unwrap();

    doc.append_child(body, card).unwrap();
    let stats = observer.process(&mut doc);

    assert_eq!(stats.scanned, 2);
    assert_eq!(stats.rewritten, 1);
    assert_eq!(doc.attribute(deep, "target"), Some("_self"));
    assert_eq!(doc.attribute(sibling, "target"), Some("_parent"));
}

#[test]
fn anchors_present_before_observe_are_not_scanned() {
    let (mut doc, body) = page();
    let existing = doc
        .append_element(body, "a", &[("target", "_blank")])
        .unwrap();

    let mut observer = LinkObserver::observe(&mut doc, body);
    let stats = observer.process(&mut doc);

    assert_eq!(stats, NormalizeStats::default());
    assert_eq!(doc.attribute(existing, "target"), Some("_blank"));
}

#[test]
fn insertions_outside_the_observed_root_are_ignored() {
    let mut doc = Document::new();
    let root = doc.root();
    let html = doc.append_element(root, "html", &[]).unwrap();
    let head = doc.append_element(html, "head", &[]).unwrap();
    let body = doc.append_element(html, "body", &[]).unwrap();

    let mut observer = LinkObserver::observe(&mut doc, body);
    let outside = doc
        .append_element(head, "a", &[("target", "_blank")])
        .unwrap();
    let inside = doc
        .append_element(body, "a", &[("target", "_blank")])
        .unwrap();
    observer.process(&mut doc);

    assert_eq!(doc.attribute(outside, "target"), Some("_blank"));
    assert_eq!(doc.attribute(inside, "target"), Some("_self"));
}

#[test]
fn text_insertions_and_removals_are_harmless() {
    let (mut doc, body) = page();
    let link = doc
        .append_element(body, "a", &[("target", "_blank")])
        .unwrap();
    let mut observer = LinkObserver::observe(&mut doc, body);

    doc.append_text(body, "hello").unwrap();
    doc.remove_child(body, link).unwrap();
    let stats = observer.process(&mut doc);

    assert_eq!(stats, NormalizeStats::default());
    assert_eq!(doc.attribute(link, "target"), Some("_blank"));
}

#[test]
fn node_removed_before_processing_is_skipped() {
    let (mut doc, body) = page();
    let mut observer = LinkObserver::observe(&mut doc, body);

    let link = doc
        .append_element(body, "a", &[("target", "_blank")])
        .unwrap();
    doc.remove_child(body, link).unwrap();
    observer.process(&mut doc);

    assert_eq!(doc.attribute(link, "target"), Some("_blank"));
}

#[test]
fn stats_accumulate_until_disconnect() {
    let (mut doc, body) = page();
    let mut observer = LinkObserver::observe(&mut doc, body);

    doc.append_element(body, "a", &[("target", "_blank")])
        .unwrap();
    observer.process(&mut doc);
    doc.append_element(body, "a", &[("target", "_self")])
        .unwrap();
    observer.process(&mut doc);
    assert_eq!(
        observer.stats(),
        NormalizeStats {
            scanned: 2,
            rewritten: 1
        }
    );

    let pending = doc
        .append_element(body, "a", &[("target", "_blank")])
        .unwrap();
    let total = observer.disconnect(&mut doc);
    assert_eq!(total.rewritten, 1);
    assert!(!doc.is_recording());
    assert!(doc.take_records().is_empty());
    assert_eq!(doc.attribute(pending, "target"), Some("_blank"));
}

#[test]
fn subtree_built_in_place_is_scanned_once() {
    let (mut doc, body) = page();
    let mut observer = LinkObserver::observe(&mut doc, body);

    let card = doc.append_element(body, "div", &[]).unwrap();
    let link = doc
        .append_element(card, "a", &[("target", "_blank")])
        .unwrap();
    let stats = observer.process(&mut doc);

    assert_eq!(
        stats,
        NormalizeStats {
            scanned: 1,
            rewritten: 1
        }
    );
    assert_eq!(doc.attribute(link, "target"), Some("_self"));
}

#[test]
fn anchor_reinserted_in_one_batch_is_scanned_once() {
    let (mut doc, body) = page();
    let mut observer = LinkObserver::observe(&mut doc, body);

    let link = doc
        .append_element(body, "a", &[("target", "_blank")])
        .unwrap();
    doc.remove_child(body, link).unwrap();
    doc.append_child(body, link).unwrap();
    let stats = observer.process(&mut doc);

    assert_eq!(stats.scanned, 1);
    assert_eq!(doc.attribute(link, "target"), Some("_self"));
}
