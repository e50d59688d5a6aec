//! # samewindow normalizer
//!
//! Keeps links inside a single window: every anchor whose `target` is
//! `"_blank"` is rewritten to `"_self"`. Anchors without a target, or with
//! any other target, are left untouched.
//!
//! The document is always passed in explicitly, through the
//! [`LinkDocument`](samewindow_dom::LinkDocument) trait, so the rule runs the
//! same way against an in-memory tree, a detached fragment, or HTML markup.
//!
//! ## Example
//!
//! ```rust
//! use samewindow_dom::HtmlSource;
//! use samewindow_normalizer::normalize_links;
//!
//! let mut page = HtmlSource::parse(r##"<a href="#" target="_blank">docs</a>"##).unwrap();
//! normalize_links(&mut page);
//! assert_eq!(page.render(), r##"<a href="#" target="_self">docs</a>"##);
//! ```

mod normalizer;
mod observer;
mod stats;

pub use normalizer::{
    new_window_anchors, normalize_links, normalize_links_with_stats, opens_new_window,
    retarget_anchor, NEW_WINDOW_TARGET, SAME_WINDOW_TARGET, TARGET_ATTRIBUTE,
};
pub use observer::LinkObserver;
pub use stats::NormalizeStats;
