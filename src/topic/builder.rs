//! Builds the [`Topic`] tree from a normalized XML document.
//!
//! The XMind 8 schema nests child topics one level deep
//! (`topic/children/topics/topic`), but real files vary: the `topics`
//! wrapper can be missing, doubled, or repeated (attached and detached
//! groups). Collection tolerates all of those shapes.
//!
//! Everything below the root lookup is best-effort: a missing or odd-looking
//! optional field yields an empty value, never an error.

use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

use percent_encoding::percent_decode_str;
use tracing::{debug, trace};

use crate::error::{Error, Result};
use crate::markers::MarkerResolver;
use crate::xml::RawXmlNode;

use super::{Attachment, AttachmentType, Link, Topic};

/// Title used when a topic has none.
pub const UNTITLED_TOPIC: &str = "Untitled Topic";

static NEXT_TOPIC_ID: AtomicU64 = AtomicU64::new(1);

/// Fresh process-wide id for topics that lack one.
fn next_topic_id() -> String {
    format!("topic-{}", NEXT_TOPIC_ID.fetch_add(1, Ordering::Relaxed))
}

/// One-shot builder for a single document's topic tree.
pub struct TopicBuilder<'a> {
    markers: &'a MarkerResolver,
    seen_ids: HashSet<String>,
}

impl<'a> TopicBuilder<'a> {
    pub fn new(markers: &'a MarkerResolver) -> Self {
        Self {
            markers,
            seen_ids: HashSet::new(),
        }
    }

    /// Build the tree from the document element (`xmap-content`, `sheet`, or
    /// a bare `topic`).
    pub fn build(mut self, document: &RawXmlNode) -> Result<Topic> {
        let root = find_root_topic(document)
            .ok_or_else(|| Error::Parse("no root topic found".into()))?;

        let sheets = document.sequence("sheet").len();
        if sheets > 1 {
            debug!(sheets, "document has several sheets, converting the first");
        }

        Ok(self.build_topic(root, 0, None))
    }

    fn build_topic(&mut self, node: &RawXmlNode, level: usize, parent_id: Option<&str>) -> Topic {
        let id = self.resolve_id(node);
        let title = resolve_title(node);
        trace!(%id, level, %title, "building topic");

        let children = child_topic_nodes(node)
            .into_iter()
            .filter(|child| !child.is_empty())
            .map(|child| self.build_topic(child, level + 1, Some(&id)))
            .collect();

        Topic {
            title,
            level,
            parent_id: parent_id.map(str::to_string),
            children,
            markers: extract_markers(node, self.markers),
            links: extract_links(node),
            notes: extract_notes(node),
            labels: extract_labels(node),
            attachments: extract_attachments(node),
            id,
        }
    }

    /// Source id when present and not already taken, otherwise a fresh one.
    fn resolve_id(&mut self, node: &RawXmlNode) -> String {
        let mut id = match node.attr("id").map(str::trim) {
            Some(id) if !id.is_empty() => id.to_string(),
            _ => next_topic_id(),
        };
        while self.seen_ids.contains(&id) {
            debug!(%id, "duplicate topic id, generating a new one");
            id = next_topic_id();
        }
        self.seen_ids.insert(id.clone());
        id
    }
}

fn find_root_topic(document: &RawXmlNode) -> Option<&RawXmlNode> {
    if document.local_name() == "topic" {
        return Some(document);
    }

    document
        .sequence("sheet")
        .iter()
        .find_map(|sheet| sheet.sequence("topic").first())
        .or_else(|| document.sequence("topic").first())
}

fn non_blank(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

fn resolve_title(node: &RawXmlNode) -> String {
    node.child("title")
        .and_then(RawXmlNode::text)
        .and_then(non_blank)
        .or_else(|| node.attr("title").and_then(non_blank))
        .or_else(|| node.text().and_then(non_blank))
        .unwrap_or(UNTITLED_TOPIC)
        .to_string()
}

/// Child topic elements in document order.
fn child_topic_nodes(node: &RawXmlNode) -> Vec<&RawXmlNode> {
    let mut out = Vec::new();
    if let Some(container) = node.child("children") {
        collect_topics(container, &mut out);
    }
    out
}

/// Gather `topic` elements from a wrapper, unwrapping nested wrappers.
fn collect_topics<'n>(wrapper: &'n RawXmlNode, out: &mut Vec<&'n RawXmlNode>) {
    for entry in &wrapper.children {
        match entry.name.as_str() {
            "topic" => out.extend(entry.value.as_slice()),
            "topics" | "children" => {
                for nested in entry.value.as_slice() {
                    collect_topics(nested, out);
                }
            }
            _ => {}
        }
    }
}

fn extract_markers(node: &RawXmlNode, resolver: &MarkerResolver) -> Vec<String> {
    let wrapped = node
        .child("marker-refs")
        .map(|refs| refs.sequence("marker-ref"))
        .unwrap_or(&[]);

    wrapped
        .iter()
        .chain(node.sequence("marker-ref"))
        .filter_map(|marker| {
            marker
                .attr("marker-id")
                .or_else(|| marker.attr("markerId"))
                .map(str::trim)
                .filter(|id| !id.is_empty())
        })
        .map(|id| resolver.resolve(id))
        .collect()
}

fn extract_links(node: &RawXmlNode) -> Vec<Link> {
    let mut links = Vec::new();

    if let Some(href) = node.attr("xlink:href").and_then(non_blank) {
        links.push(Link::new(href.trim(), None));
    }

    for hyperlink in node.sequence("hyperlink") {
        let Some(href) = hyperlink.attr("xlink:href").and_then(non_blank) else {
            continue;
        };
        let title = hyperlink
            .attr("title")
            .or_else(|| hyperlink.text())
            .and_then(non_blank)
            .map(|t| t.trim().to_string());
        links.push(Link::new(href.trim(), title));
    }

    links
}

fn extract_notes(node: &RawXmlNode) -> Option<String> {
    let notes = node.child("notes")?;
    notes
        .child("plain")
        .and_then(RawXmlNode::text)
        .or_else(|| notes.text())
        .and_then(non_blank)
        .map(str::to_string)
}

fn extract_labels(node: &RawXmlNode) -> Vec<String> {
    let wrapped = node
        .child("labels")
        .map(|labels| labels.sequence("label"))
        .unwrap_or(&[]);

    wrapped
        .iter()
        .chain(node.sequence("label"))
        .filter(|label| label.is_plain_text())
        .filter_map(|label| label.text().and_then(non_blank))
        .map(|text| text.trim().to_string())
        .collect()
}

fn extract_attachments(node: &RawXmlNode) -> Vec<Attachment> {
    node.sequence("img")
        .iter()
        .filter_map(|img| img.attr("xhtml:src").and_then(non_blank))
        .map(|src| {
            let path = src.trim().to_string();
            Attachment {
                filename: filename_from_path(&path),
                path,
                kind: AttachmentType::Image,
            }
        })
        .collect()
}

/// Last segment of an attachment path (`xap:attachments/a%20b.png` → `a b.png`).
fn filename_from_path(path: &str) -> String {
    let segment = path.rsplit(['/', ':']).next().unwrap_or(path);
    percent_decode_str(segment).decode_utf8_lossy().into_owned()
}
