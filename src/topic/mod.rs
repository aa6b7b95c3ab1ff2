//! Domain model for a mind map: a tree of [`Topic`]s.
//!
//! The tree is produced once by [`TopicBuilder`] and only read afterwards
//! (by the Markdown renderer and the statistics collector).

mod builder;

pub use builder::{TopicBuilder, UNTITLED_TOPIC};

/// What a hyperlink points at, inferred from the shape of its href.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkType {
    /// External web address (anything not matched below).
    Url,
    /// Another topic in the same map (`#id` or `xmind:#id`).
    Topic,
    /// A local file (`file://...` or `./...`).
    File,
}

impl LinkType {
    pub fn from_href(href: &str) -> Self {
        let href = href.trim();
        if href.starts_with('#') || href.starts_with("xmind:#") {
            LinkType::Topic
        } else if href.starts_with("file://") || href.starts_with("./") {
            LinkType::File
        } else {
            LinkType::Url
        }
    }
}

/// A hyperlink on a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub href: String,
    /// Explicit link text, if the source carried one.
    pub title: Option<String>,
    pub kind: LinkType,
}

impl Link {
    pub fn new(href: impl Into<String>, title: Option<String>) -> Self {
        let href = href.into();
        let kind = LinkType::from_href(&href);
        Self { href, title, kind }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentType {
    Image,
    File,
}

/// A file embedded in the map archive and referenced by a topic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub path: String,
    pub kind: AttachmentType,
}

/// One node of the mind map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    /// Unique within one converted document.
    pub id: String,
    pub title: String,
    /// Depth in the tree; the root is 0.
    pub level: usize,
    /// `None` only for the root.
    pub parent_id: Option<String>,
    pub children: Vec<Topic>,
    /// Resolved marker symbols.
    pub markers: Vec<String>,
    pub links: Vec<Link>,
    pub notes: Option<String>,
    pub labels: Vec<String>,
    pub attachments: Vec<Attachment>,
}

impl Topic {
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Pre-order iterator over this topic and all of its descendants.
    pub fn iter(&self) -> TopicIter<'_> {
        TopicIter { stack: vec![self] }
    }

    /// Find a topic in this subtree by id.
    pub fn find(&self, id: &str) -> Option<&Topic> {
        self.iter().find(|topic| topic.id == id)
    }
}

/// Depth-first, pre-order traversal. See [`Topic::iter`].
pub struct TopicIter<'a> {
    stack: Vec<&'a Topic>,
}

impl<'a> Iterator for TopicIter<'a> {
    type Item = &'a Topic;

    fn next(&mut self) -> Option<Self::Item> {
        let topic = self.stack.pop()?;
        self.stack.extend(topic.children.iter().rev());
        Some(topic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn topic(id: &str, children: Vec<Topic>) -> Topic {
        Topic {
            id: id.to_string(),
            title: id.to_string(),
            level: 0,
            parent_id: None,
            children,
            markers: Vec::new(),
            links: Vec::new(),
            notes: None,
            labels: Vec::new(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_link_type_inference() {
        assert_eq!(LinkType::from_href("#topic-1"), LinkType::Topic);
        assert_eq!(LinkType::from_href("xmind:#abc"), LinkType::Topic);
        assert_eq!(LinkType::from_href("file:///tmp/a.pdf"), LinkType::File);
        assert_eq!(LinkType::from_href("./notes.txt"), LinkType::File);
        assert_eq!(LinkType::from_href("https://example.com"), LinkType::Url);
        assert_eq!(LinkType::from_href("mailto:a@b.c"), LinkType::Url);
    }

    #[test]
    fn test_preorder_iteration() {
        let tree = topic(
            "a",
            vec![topic("b", vec![topic("c", vec![])]), topic("d", vec![])],
        );
        let ids: Vec<_> = tree.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c", "d"]);
        assert!(tree.find("c").is_some_and(Topic::is_leaf));
        assert!(tree.find("zz").is_none());
    }
}
