//! quick-xml event loop producing a [`RawXmlNode`] tree.

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use tracing::trace;

use crate::error::{Error, Result};
use crate::util::resolve_entity;

use super::node::RawXmlNode;

/// Element names (local part) that may legally repeat under one parent.
///
/// `img` is the embedded-image attachment (`xhtml:img`); `topics` is the
/// child-topic container inside `children`.
pub const REPEATABLE_ELEMENTS: &[&str] = &[
    "sheet",
    "topic",
    "topics",
    "marker-ref",
    "img",
    "hyperlink",
    "label",
];

/// Deepest element nesting accepted by [`parse_xml`].
///
/// Every later stage walks the tree recursively. One topic level costs three
/// elements (`topic/children/topics`), which leaves room for maps far deeper
/// than any editor produces.
pub const MAX_NESTING_DEPTH: usize = 512;

/// Whether a local element name is always stored as a sequence.
pub fn is_repeatable(local_name: &str) -> bool {
    REPEATABLE_ELEMENTS.contains(&local_name)
}

/// Element under construction plus its raw character data.
struct Frame {
    node: RawXmlNode,
    text: String,
}

impl Frame {
    fn finish(mut self) -> RawXmlNode {
        if !self.text.trim().is_empty() {
            self.node.text = Some(self.text);
        }
        self.node
    }
}

/// Parse XML text into a normalized tree rooted at the document element.
///
/// Fails on any syntax error, mismatched or unclosed tag, nesting deeper than
/// [`MAX_NESTING_DEPTH`], or a document with no (or more than one) root
/// element. No partial tree is returned.
pub fn parse_xml(content: &str) -> Result<RawXmlNode> {
    let mut reader = Reader::from_str(content);
    // Whitespace between entity references is significant in titles, so text
    // is collected untrimmed and blank runs are discarded per element.
    reader.config_mut().trim_text(false);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<RawXmlNode> = None;

    loop {
        let event = reader.read_event().map_err(|e| {
            Error::Parse(format!(
                "malformed XML at byte {}: {e}",
                reader.error_position()
            ))
        })?;

        match event {
            Event::Start(e) => {
                check_depth(stack.len() + 1, reader.buffer_position())?;
                let node = element_from_start(&e)?;
                stack.push(Frame {
                    node,
                    text: String::new(),
                });
            }
            Event::Empty(e) => {
                check_depth(stack.len() + 1, reader.buffer_position())?;
                let node = element_from_start(&e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::End(_) => {
                let frame = stack
                    .pop()
                    .ok_or_else(|| Error::Parse("unexpected closing tag".into()))?;
                attach(&mut stack, &mut root, frame.finish())?;
            }
            Event::Text(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::CData(e) => {
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&String::from_utf8_lossy(e.as_ref()));
                }
            }
            Event::GeneralRef(e) => {
                if let Some(frame) = stack.last_mut() {
                    let entity = String::from_utf8_lossy(e.as_ref());
                    match resolve_entity(&entity) {
                        Some(resolved) => frame.text.push_str(&resolved),
                        None => {
                            frame.text.push('&');
                            frame.text.push_str(&entity);
                            frame.text.push(';');
                        }
                    }
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(Error::Parse(format!(
            "unexpected end of document: <{}> is not closed",
            open.node.name
        )));
    }

    root.ok_or_else(|| Error::Parse("document has no root element".into()))
}

fn check_depth(depth: usize, position: u64) -> Result<()> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Error::Parse(format!(
            "document nesting too deep at byte {position} (limit {MAX_NESTING_DEPTH} elements)"
        )));
    }
    Ok(())
}

/// Attach a finished element to its parent, or make it the document root.
fn attach(stack: &mut [Frame], root: &mut Option<RawXmlNode>, node: RawXmlNode) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            let name = node.name.clone();
            if !parent.node.push_child(node) {
                trace!(element = %name, parent = %parent.node.name, "ignoring duplicate element");
            }
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(node);
            Ok(())
        }
        None => Err(Error::Parse(format!(
            "multiple root elements (found <{}> after the document element)",
            node.name
        ))),
    }
}

fn element_from_start(e: &BytesStart<'_>) -> Result<RawXmlNode> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut node = RawXmlNode::new(name);

    for attr in e.attributes() {
        let attr = attr
            .map_err(|err| Error::Parse(format!("malformed attribute in <{}>: {err}", node.name)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let raw = String::from_utf8_lossy(&attr.value);
        let value = match quick_xml::escape::unescape(&raw) {
            Ok(value) => value.into_owned(),
            Err(_) => raw.into_owned(),
        };
        node.attributes.insert(key, value);
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::Children;

    #[test]
    fn test_parse_simple_tree() {
        let doc = parse_xml(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<xmap-content xmlns="urn:xmind:xmap:xmlns:content:2.0">
  <sheet id="s1">
    <topic id="root"><title>Root</title></topic>
  </sheet>
</xmap-content>"#,
        )
        .unwrap();

        assert_eq!(doc.name, "xmap-content");
        let sheets = doc.sequence("sheet");
        assert_eq!(sheets.len(), 1);
        let topic = &sheets[0].sequence("topic")[0];
        assert_eq!(topic.attr("id"), Some("root"));
        assert_eq!(topic.child("title").and_then(|t| t.text()), Some("Root"));
        // Indentation inside <sheet> is not text
        assert_eq!(sheets[0].text(), None);
    }

    #[test]
    fn test_single_topic_is_sequence() {
        let doc = parse_xml("<children><topics><topic id=\"a\"/></topics></children>").unwrap();
        let topics = doc.child("topics").unwrap();
        assert!(matches!(topics.entry("topic"), Some(Children::Sequence(v)) if v.len() == 1));
    }

    #[test]
    fn test_entities_and_whitespace_preserved() {
        let doc = parse_xml("<title>  A   &lt;b&gt;  </title>").unwrap();
        assert_eq!(doc.text(), Some("  A   <b>  "));
    }

    #[test]
    fn test_numeric_entities_and_cdata() {
        let doc = parse_xml("<plain>&#x4E2D;&#25991; <![CDATA[<raw> & more]]></plain>").unwrap();
        assert_eq!(doc.text(), Some("中文 <raw> & more"));
    }

    #[test]
    fn test_attribute_unescaped() {
        let doc = parse_xml(r#"<topic xlink:href="https://a.example/?x=1&amp;y=2"/>"#).unwrap();
        assert_eq!(doc.attr("xlink:href"), Some("https://a.example/?x=1&y=2"));
    }

    #[test]
    fn test_mismatched_tag_is_error() {
        let err = parse_xml("<topic><title>x</topic>").unwrap_err();
        assert!(err.is_parse_error(), "{err}");
    }

    #[test]
    fn test_unclosed_tag_is_error() {
        let err = parse_xml("<topic><title>x</title>").unwrap_err();
        assert!(err.is_parse_error(), "{err}");
    }

    #[test]
    fn test_empty_document_is_error() {
        let err = parse_xml("   ").unwrap_err();
        assert!(err.to_string().contains("root element"));
    }

    fn nested(depth: usize, leaf: &str) -> String {
        format!("{}{leaf}{}", "<n>".repeat(depth), "</n>".repeat(depth))
    }

    #[test]
    fn test_nesting_at_limit_is_accepted() {
        assert!(parse_xml(&nested(MAX_NESTING_DEPTH, "x")).is_ok());
        assert!(parse_xml(&nested(MAX_NESTING_DEPTH - 1, "<leaf/>")).is_ok());
    }

    #[test]
    fn test_nesting_past_limit_is_error() {
        let err = parse_xml(&nested(MAX_NESTING_DEPTH + 1, "x")).unwrap_err();
        assert!(err.is_parse_error());
        assert!(err.to_string().contains("nesting too deep"), "{err}");

        // A self-closing element counts as one level too
        let err = parse_xml(&nested(MAX_NESTING_DEPTH, "<leaf/>")).unwrap_err();
        assert!(err.to_string().contains("nesting too deep"), "{err}");
    }
}
