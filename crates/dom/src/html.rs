use crate::error::{DomError, Result};
use crate::link_document::{LinkDocument, ANCHOR_TAG};
use crate::serialize::escape_attribute;
use std::ops::Range;
use tree_sitter::{Node, Parser};

/// Handle to an anchor start tag inside an [`HtmlSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AnchorRef(usize);

impl AnchorRef {
    /// Position of the anchor in document order
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
struct SourceAttribute {
    /// Name as written in the markup
    raw_name: String,
    /// Decoded value; boolean attributes read as ""
    value: String,
    /// Whole `name="value"` span
    span: Range<usize>,
    dirty: bool,
}

#[derive(Debug, Clone)]
struct AnchorTag {
    tag_span: Range<usize>,
    /// Offset right after the last attribute (or the tag name)
    insert_at: usize,
    line: usize,
    attributes: Vec<SourceAttribute>,
    added: Vec<(String, String)>,
}

impl AnchorTag {
    fn find(&self, name: &str) -> Option<usize> {
        self.attributes
            .iter()
            .position(|attr| attr.raw_name.eq_ignore_ascii_case(name))
    }
}

/// HTML markup exposed as a [`LinkDocument`].
///
/// Anchors are the `a` start tags found by tree-sitter. Attribute writes are
/// kept as edits against the original text, so [`render`](Self::render)
/// reproduces the input byte for byte outside the touched attributes.
#[derive(Debug, Clone)]
pub struct HtmlSource {
    source: String,
    anchors: Vec<AnchorTag>,
}

impl HtmlSource {
    /// Parse markup and collect its anchor start tags
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let language: tree_sitter::Language = tree_sitter_html::LANGUAGE.into();
        let mut parser = Parser::new();
        parser
            .set_language(&language)
            .map_err(|e| DomError::tree_sitter(format!("Failed to set language: {e}")))?;

        let tree = parser
            .parse(&source, None)
            .ok_or_else(|| DomError::parse("Failed to parse HTML"))?;

        let anchors = collect_anchors(&source, tree.root_node());
        log::trace!("parsed {} bytes, {} anchors", source.len(), anchors.len());

        Ok(Self { source, anchors })
    }

    /// Original markup
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors.len()
    }

    /// 1-based line of the anchor's start tag
    pub fn anchor_line(&self, anchor: AnchorRef) -> Option<usize> {
        self.anchors.get(anchor.0).map(|tag| tag.line)
    }

    /// Start tag markup as it appears in the original text
    pub fn anchor_markup(&self, anchor: AnchorRef) -> Option<&str> {
        let tag = self.anchors.get(anchor.0)?;
        Some(&self.source[tag.tag_span.clone()])
    }

    /// True if any attribute was changed or added since parsing
    pub fn is_modified(&self) -> bool {
        self.anchors
            .iter()
            .any(|tag| !tag.added.is_empty() || tag.attributes.iter().any(|attr| attr.dirty))
    }

    /// Original markup with every attribute edit applied
    pub fn render(&self) -> String {
        let mut edits: Vec<(Range<usize>, String)> = Vec::new();
        for tag in &self.anchors {
            for attr in tag.attributes.iter().filter(|attr| attr.dirty) {
                edits.push((attr.span.clone(), format_attribute(&attr.raw_name, &attr.value)));
            }
            if !tag.added.is_empty() {
                let text: String = tag
                    .added
                    .iter()
                    .map(|(name, value)| format!(" {}", format_attribute(name, value)))
                    .collect();
                edits.push((tag.insert_at..tag.insert_at, text));
            }
        }
        if edits.is_empty() {
            return self.source.clone();
        }
        edits.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(self.source.len() + edits.len() * 8);
        let mut cursor = 0;
        for (range, text) in edits {
            out.push_str(&self.source[cursor..range.start]);
            out.push_str(&text);
            cursor = range.end;
        }
        out.push_str(&self.source[cursor..]);
        out
    }
}

impl LinkDocument for HtmlSource {
    type Anchor = AnchorRef;

    fn anchors(&self) -> Vec<AnchorRef> {
        (0..self.anchors.len()).map(AnchorRef).collect()
    }

    fn attribute(&self, anchor: AnchorRef, name: &str) -> Option<&str> {
        let tag = self.anchors.get(anchor.0)?;
        if let Some(pos) = tag.find(name) {
            return Some(tag.attributes[pos].value.as_str());
        }
        tag.added
            .iter()
            .find(|(added, _)| added.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    fn set_attribute(&mut self, anchor: AnchorRef, name: &str, value: &str) {
        let Some(tag) = self.anchors.get_mut(anchor.0) else {
            return;
        };
        if let Some(pos) = tag.find(name) {
            let attr = &mut tag.attributes[pos];
            if attr.value != value {
                attr.value = value.to_string();
                attr.dirty = true;
            }
            return;
        }
        match tag
            .added
            .iter_mut()
            .find(|(added, _)| added.eq_ignore_ascii_case(name))
        {
            Some((_, existing)) => *existing = value.to_string(),
            None => tag.added.push((name.to_string(), value.to_string())),
        }
    }
}

fn format_attribute(name: &str, value: &str) -> String {
    format!("{name}=\"{}\"", escape_attribute(value))
}

fn node_text<'s>(source: &'s str, node: Node) -> &'s str {
    &source[node.byte_range()]
}

/// Opening tag of an `element` node
fn opening_tag(element: Node) -> Option<Node> {
    let mut cursor = element.walk();
    let found = element
        .children(&mut cursor)
        .find(|child| matches!(child.kind(), "start_tag" | "self_closing_tag"));
    found
}

fn tag_name<'s, 't>(source: &'s str, tag: Node<'t>) -> Option<(&'s str, Node<'t>)> {
    let mut cursor = tag.walk();
    let found = tag
        .children(&mut cursor)
        .find(|child| child.kind() == "tag_name");
    found.map(|node| (node_text(source, node), node))
}

/// Elements whose content never produces live anchors: template content is
/// inert, textarea and title content is parsed as text.
const INERT_ELEMENTS: [&str; 3] = ["template", "textarea", "title"];

fn collect_anchors(source: &str, root: Node) -> Vec<AnchorTag> {
    let mut anchors = Vec::new();
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        match node.kind() {
            // Not part of the element tree
            "script_element" | "style_element" | "comment" => continue,
            "element" => {
                if let Some(tag) = opening_tag(node) {
                    if let Some((name, name_node)) = tag_name(source, tag) {
                        if INERT_ELEMENTS
                            .iter()
                            .any(|inert| name.eq_ignore_ascii_case(inert))
                        {
                            continue;
                        }
                        if name.eq_ignore_ascii_case(ANCHOR_TAG) {
                            anchors.push(anchor_from_tag(source, tag, name_node));
                        }
                    }
                }
            }
            _ => {}
        }

        let mut cursor = node.walk();
        let children: Vec<_> = node.children(&mut cursor).collect();
        stack.extend(children.into_iter().rev());
    }

    anchors
}

fn anchor_from_tag(source: &str, tag: Node, name_node: Node) -> AnchorTag {
    let mut attributes = Vec::new();
    let mut insert_at = name_node.end_byte();

    let mut cursor = tag.walk();
    for child in tag.children(&mut cursor) {
        if child.kind() != "attribute" {
            continue;
        }
        insert_at = child.end_byte();
        if let Some(attr) = parse_attribute(source, child) {
            attributes.push(attr);
        }
    }

    AnchorTag {
        tag_span: tag.byte_range(),
        insert_at,
        line: tag.start_position().row + 1,
        attributes,
        added: Vec::new(),
    }
}

fn parse_attribute(source: &str, attr: Node) -> Option<SourceAttribute> {
    let mut name = None;
    let mut value = String::new();

    let mut cursor = attr.walk();
    for part in attr.children(&mut cursor) {
        match part.kind() {
            "attribute_name" => name = Some(node_text(source, part).to_string()),
            "attribute_value" => value = decode_character_references(node_text(source, part)),
            "quoted_attribute_value" => {
                value = decode_character_references(strip_quotes(node_text(source, part)));
            }
            _ => {}
        }
    }

    Some(SourceAttribute {
        raw_name: name?,
        value,
        span: attr.byte_range(),
        dirty: false,
    })
}

fn strip_quotes(raw: &str) -> &str {
    let Some(quote) = raw.chars().next().filter(|c| *c == '"' || *c == '\'') else {
        return raw;
    };
    let inner = &raw[1..];
    // error recovery can leave the closing quote out
    inner.strip_suffix(quote).unwrap_or(inner)
}

/// Decode the character references that commonly appear in attribute values.
/// Unknown references are kept verbatim.
pub fn decode_character_references(raw: &str) -> String {
    if !raw.contains('&') {
        return raw.to_string();
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match tail.find(';').filter(|end| *end <= 10) {
            Some(end) => match decode_reference(&tail[1..end]) {
                Some(ch) => {
                    out.push(ch);
                    rest = &tail[end + 1..];
                }
                None => {
                    out.push('&');
                    rest = &tail[1..];
                }
            },
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

fn decode_reference(name: &str) -> Option<char> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(|c: char| c == 'x' || c == 'X') {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        return char::from_u32(code);
    }
    match name {
        "amp" => Some('&'),
        "quot" => Some('"'),
        "apos" => Some('\''),
        "lt" => Some('<'),
        "gt" => Some('>'),
        "nbsp" => Some('\u{a0}'),
        _ => None,
    }
}
