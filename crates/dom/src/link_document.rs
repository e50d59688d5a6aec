use std::fmt;

/// Tag name of anchor elements
pub const ANCHOR_TAG: &str = "a";

/// The slice of a document the link normalizer needs: enumerate anchors and
/// read/write one string attribute on them.
///
/// Implemented by the arena [`Document`](crate::Document), by
/// [`Subtree`](crate::Subtree) views, and by [`HtmlSource`](crate::HtmlSource)
/// markup.
pub trait LinkDocument {
    /// Handle to one anchor; only valid for the document that produced it
    type Anchor: Copy + fmt::Debug;

    /// Snapshot of the anchors present now, in document order
    fn anchors(&self) -> Vec<Self::Anchor>;

    /// Attribute value, matched by ASCII case-insensitive name
    fn attribute(&self, anchor: Self::Anchor, name: &str) -> Option<&str>;

    /// Set (or add) an attribute value
    fn set_attribute(&mut self, anchor: Self::Anchor, name: &str, value: &str);
}

impl<D: LinkDocument + ?Sized> LinkDocument for &mut D {
    type Anchor = D::Anchor;

    fn anchors(&self) -> Vec<Self::Anchor> {
        (**self).anchors()
    }

    fn attribute(&self, anchor: Self::Anchor, name: &str) -> Option<&str> {
        (**self).attribute(anchor, name)
    }

    fn set_attribute(&mut self, anchor: Self::Anchor, name: &str, value: &str) {
        (**self).set_attribute(anchor, name, value);
    }
}
