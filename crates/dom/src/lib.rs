//! # samewindow DOM
//!
//! Document model consumed by the samewindow link normalizer.
//!
//! ## Architecture
//!
//! ```text
//! LinkDocument (trait: enumerate anchors, read/write one attribute)
//!     │
//!     ├──> Document    arena tree of elements and text
//!     │    ├─> structural edits (append / insert / remove)
//!     │    ├─> child-list mutation records while recording
//!     │    └─> HTML serialization
//!     │
//!     ├──> Subtree     one node and its descendants
//!     │
//!     └──> HtmlSource  markup parsed with tree-sitter
//!          └─> attribute edits rendered back into the original text
//! ```
//!
//! ## Example
//!
//! ```rust
//! use samewindow_dom::{Document, LinkDocument};
//!
//! let mut doc = Document::new();
//! let root = doc.root();
//! let link = doc.append_element(root, "a", &[("href", "#"), ("target", "_blank")]).unwrap();
//!
//! assert_eq!(doc.anchors(), vec![link]);
//! assert_eq!(doc.to_html(), r##"<a href="#" target="_blank"></a>"##);
//! ```

mod document;
mod error;
mod html;
mod link_document;
mod mutation;
mod serialize;

pub use document::{Attribute, Document, Element, NodeId, NodeKind, Subtree};
pub use error::{DomError, Result};
pub use html::{decode_character_references, AnchorRef, HtmlSource};
pub use link_document::{LinkDocument, ANCHOR_TAG};
pub use mutation::MutationRecord;
pub use serialize::escape_attribute;
