use crate::document::{Document, NodeId, NodeKind};
use crate::error::{DomError, Result};

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

/// Escape a value for use inside a double-quoted attribute
pub fn escape_attribute(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

impl Document {
    /// Serialize every attached node as HTML
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        for child in self.children(self.root()) {
            self.write_node(*child, false, &mut out);
        }
        out
    }

    /// Serialize `id` and its descendants as HTML
    pub fn outer_html(&self, id: NodeId) -> Result<String> {
        if self.kind(id).is_none() {
            return Err(DomError::InvalidNode(id));
        }
        let mut out = String::new();
        self.write_node(id, false, &mut out);
        Ok(out)
    }

    fn write_node(&self, id: NodeId, raw_text: bool, out: &mut String) {
        match self.kind(id) {
            Some(NodeKind::Root) => {
                for child in self.children(id) {
                    self.write_node(*child, false, out);
                }
            }
            Some(NodeKind::Text(text)) => {
                if raw_text {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            Some(NodeKind::Element(element)) => {
                let tag = element.tag_name();
                out.push('<');
                out.push_str(tag);
                for attr in element.attributes() {
                    out.push(' ');
                    out.push_str(&attr.name);
                    out.push_str("=\"");
                    out.push_str(&escape_attribute(&attr.value));
                    out.push('"');
                }
                out.push('>');
                if VOID_ELEMENTS.contains(&tag) {
                    return;
                }
                let raw = RAW_TEXT_ELEMENTS.contains(&tag);
                for child in self.children(id) {
                    self.write_node(*child, raw, out);
                }
                out.push_str("</");
                out.push_str(tag);
                out.push('>');
            }
            None => {}
        }
    }
}
