//! Normalized XML node.

use std::collections::BTreeMap;

use crate::util::local_name;

use super::parser::is_repeatable;

/// Child elements sharing one tag name under the same parent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Children {
    /// A non-repeatable element (first occurrence only).
    Single(RawXmlNode),
    /// A repeatable element, in document order.
    Sequence(Vec<RawXmlNode>),
}

impl Children {
    /// View the entry as a slice regardless of form.
    pub fn as_slice(&self) -> &[RawXmlNode] {
        match self {
            Children::Single(node) => std::slice::from_ref(node),
            Children::Sequence(nodes) => nodes,
        }
    }
}

/// Child entry keyed by the local (prefix-free) tag name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChildEntry {
    pub name: String,
    pub value: Children,
}

/// A parsed XML element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawXmlNode {
    /// Qualified tag name as written (e.g. `xhtml:img`).
    pub name: String,
    /// Attribute values, entity references resolved.
    pub attributes: BTreeMap<String, String>,
    /// Child entries in order of first appearance.
    pub children: Vec<ChildEntry>,
    /// Concatenated character data, `None` when only whitespace.
    pub text: Option<String>,
}

impl RawXmlNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Tag name without namespace prefix.
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Attach a child element, applying the repeatable-element policy.
    ///
    /// Returns `false` if the child was dropped as a duplicate of a
    /// non-repeatable element.
    pub fn push_child(&mut self, child: RawXmlNode) -> bool {
        let key = child.local_name().to_string();
        let repeatable = is_repeatable(&key);

        match self.children.iter_mut().find(|entry| entry.name == key) {
            Some(ChildEntry {
                value: Children::Sequence(nodes),
                ..
            }) => {
                nodes.push(child);
                true
            }
            Some(_) => false,
            None => {
                let value = if repeatable {
                    Children::Sequence(vec![child])
                } else {
                    Children::Single(child)
                };
                self.children.push(ChildEntry { name: key, value });
                true
            }
        }
    }

    /// Look up the entry for a tag name (namespace prefix ignored).
    pub fn entry(&self, name: &str) -> Option<&Children> {
        let key = local_name(name);
        self.children
            .iter()
            .find(|entry| entry.name == key)
            .map(|entry| &entry.value)
    }

    /// First child element with the given name.
    pub fn child(&self, name: &str) -> Option<&RawXmlNode> {
        self.entry(name).and_then(|children| children.as_slice().first())
    }

    /// All child elements with the given name; empty when absent.
    pub fn sequence(&self, name: &str) -> &[RawXmlNode] {
        self.entry(name).map(Children::as_slice).unwrap_or(&[])
    }

    /// Attribute value by exact qualified name, falling back to a local-name
    /// match so `href` finds `xlink:href` and vice versa.
    pub fn attr(&self, name: &str) -> Option<&str> {
        if let Some(value) = self.attributes.get(name) {
            return Some(value);
        }
        let key = local_name(name);
        self.attributes
            .iter()
            .find(|(attr, _)| local_name(attr) == key)
            .map(|(_, value)| value.as_str())
    }

    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// True when the element has no attributes, children, or text.
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_none()
    }

    /// True when the element is just a piece of text (no attributes or children).
    pub fn is_plain_text(&self) -> bool {
        self.attributes.is_empty() && self.children.is_empty() && self.text.is_some()
    }
}
