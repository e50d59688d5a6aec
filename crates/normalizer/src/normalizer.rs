use crate::stats::NormalizeStats;
use samewindow_dom::LinkDocument;

/// Attribute holding an anchor's navigation target
pub const TARGET_ATTRIBUTE: &str = "target";

/// Target that opens a new browsing context
pub const NEW_WINDOW_TARGET: &str = "_blank";

/// Target that navigates the current browsing context
pub const SAME_WINDOW_TARGET: &str = "_self";

/// True if following `anchor` would open a new browsing context
pub fn opens_new_window<D: LinkDocument + ?Sized>(doc: &D, anchor: D::Anchor) -> bool {
    doc.attribute(anchor, TARGET_ATTRIBUTE) == Some(NEW_WINDOW_TARGET)
}

/// Anchors the normalizer would rewrite, in document order
pub fn new_window_anchors<D: LinkDocument + ?Sized>(doc: &D) -> Vec<D::Anchor> {
    doc.anchors()
        .into_iter()
        .filter(|anchor| opens_new_window(doc, *anchor))
        .collect()
}

/// Apply the rule to one anchor: `_blank` becomes `_self`, anything else
/// (including a missing attribute) is left alone.
///
/// Returns whether the anchor was rewritten.
pub fn retarget_anchor<D: LinkDocument + ?Sized>(doc: &mut D, anchor: D::Anchor) -> bool {
    if !opens_new_window(doc, anchor) {
        return false;
    }
    doc.set_attribute(anchor, TARGET_ATTRIBUTE, SAME_WINDOW_TARGET);
    log::trace!("retargeted anchor {anchor:?} to {SAME_WINDOW_TARGET}");
    true
}

/// Rewrite every anchor currently in `doc` whose target is `_blank` to `_self`.
///
/// Works on a snapshot taken at call time: anchors added afterwards are not
/// touched. See [`LinkObserver`](crate::LinkObserver) for dynamic content.
pub fn normalize_links<D: LinkDocument + ?Sized>(doc: &mut D) {
    normalize_links_with_stats(doc);
}

/// [`normalize_links`], also reporting how many anchors were scanned and rewritten
pub fn normalize_links_with_stats<D: LinkDocument + ?Sized>(doc: &mut D) -> NormalizeStats {
    let anchors = doc.anchors();
    let mut stats = NormalizeStats {
        scanned: anchors.len(),
        rewritten: 0,
    };

    for anchor in anchors {
        if retarget_anchor(doc, anchor) {
            stats.rewritten += 1;
        }
    }

    log::debug!(
        "normalized links: {} scanned, {} rewritten",
        stats.scanned,
        stats.rewritten
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use samewindow_dom::{Document, HtmlSource};

    const TARGETS: &[&str] = &[
        "_blank", "_self", "_parent", "_top", "_BLANK", " _blank", "", "frame",
    ];

    fn build(targets: &[Option<&str>]) -> Document {
        let mut doc = Document::new();
        let root = doc.root();
        let body = doc.append_element(root, "body", &[]).unwrap();
        for target in targets {
            let mut attrs = vec![("href", "#")];
            if let Some(target) = *target {
                attrs.push(("target", target));
            }
            doc.append_element(body, "a", &attrs).unwrap();
        }
        doc
    }

    fn read_targets<D: LinkDocument>(doc: &D) -> Vec<Option<String>> {
        doc.anchors()
            .into_iter()
            .map(|anchor| doc.attribute(anchor, TARGET_ATTRIBUTE).map(str::to_string))
            .collect()
    }

    fn expected(targets: &[Option<&str>]) -> Vec<Option<String>> {
        targets
            .iter()
            .map(|target| match target {
                Some(NEW_WINDOW_TARGET) => Some(SAME_WINDOW_TARGET.to_string()),
                other => other.map(str::to_string),
            })
            .collect()
    }

    fn markup(targets: &[Option<&str>]) -> String {
        targets
            .iter()
            .map(|target| match target {
                Some(target) => format!("<a href=\"#\" target=\"{target}\">x</a>\n"),
                None => "<a href=\"#\">x</a>\n".to_string(),
            })
            .collect()
    }

    #[test]
    fn retarget_reports_change() {
        let mut doc = build(&[Some("_blank"), Some("_self"), None]);
        let anchors = doc.anchors();
        assert!(retarget_anchor(&mut doc, anchors[0]));
        assert!(!retarget_anchor(&mut doc, anchors[0]));
        assert!(!retarget_anchor(&mut doc, anchors[1]));
        assert!(!retarget_anchor(&mut doc, anchors[2]));
        assert_eq!(doc.attribute(anchors[2], TARGET_ATTRIBUTE), None);
    }

    #[test]
    fn lists_new_window_anchors() {
        let mut doc = build(&[Some("_blank"), Some("_top"), None, Some("_blank")]);
        let anchors = doc.anchors();
        assert_eq!(new_window_anchors(&doc), vec![anchors[0], anchors[3]]);
        normalize_links(&mut doc);
        assert!(new_window_anchors(&doc).is_empty());
    }

    #[test]
    fn stats_count_scanned_and_rewritten() {
        let mut doc = build(&[Some("_blank"), Some("_blank"), Some("_self"), None]);
        let stats = normalize_links_with_stats(&mut doc);
        assert_eq!(
            stats,
            NormalizeStats {
                scanned: 4,
                rewritten: 2
            }
        );
        let again = normalize_links_with_stats(&mut doc);
        assert!(again.is_noop());
        assert_eq!(again.scanned, 4);
    }

    #[test]
    fn works_through_trait_objects() {
        let mut doc = HtmlSource::parse("<a target=\"_blank\">x</a>").unwrap();
        let dynamic: &mut dyn LinkDocument<Anchor = samewindow_dom::AnchorRef> = &mut doc;
        normalize_links(dynamic);
        assert_eq!(doc.render(), "<a target=\"_self\">x</a>");
    }

    proptest! {
        #[test]
        fn proptest_only_blank_is_rewritten(
            targets in prop::collection::vec(prop::option::of(prop::sample::select(TARGETS)), 0..12)
        ) {
            let mut doc = build(&targets);
            normalize_links(&mut doc);
            prop_assert_eq!(read_targets(&doc), expected(&targets));
        }

        #[test]
        fn proptest_second_run_changes_nothing(
            targets in prop::collection::vec(prop::option::of(prop::sample::select(TARGETS)), 0..12)
        ) {
            let mut doc = build(&targets);
            normalize_links(&mut doc);
            let once = doc.to_html();
            let stats = normalize_links_with_stats(&mut doc);
            prop_assert_eq!(stats.rewritten, 0);
            prop_assert_eq!(doc.to_html(), once);
        }

        #[test]
        fn proptest_markup_agrees_with_tree(
            targets in prop::collection::vec(prop::option::of(prop::sample::select(TARGETS)), 0..12)
        ) {
            let mut source = HtmlSource::parse(markup(&targets)).unwrap();
            normalize_links(&mut source);
            let reparsed = HtmlSource::parse(source.render()).unwrap();
            prop_assert_eq!(read_targets(&reparsed), expected(&targets));
        }
    }
}
