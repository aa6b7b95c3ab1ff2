//! Topic tree → Markdown rendering.
//!
//! Pure string building; the converter decides where the text goes.
//!
//! Rendering depth is `level + 1`. The first three depths become headings,
//! anything deeper becomes a nested bullet list:
//!
//! ```text
//! # Root              depth 1
//! ## Branch           depth 2
//! ### Sub-branch      depth 3 (blank line only when it is a leaf)
//! - Item:             depth 4, colon because it has children
//!   - Leaf            depth 5
//! ```

use crate::stats::collect_stats;
use crate::topic::{AttachmentType, LinkType, Topic};
use crate::util::timestamp_now;

use super::escape::{
    code_span, escape_link_text, link_destination, sanitize_title, strip_trailing_colon,
};

/// Configuration for Markdown rendering.
#[derive(Debug, Clone, Default)]
pub struct MarkdownConfig {
    /// Emit an HTML comment with generation time, topic count and max depth
    /// after the root heading.
    pub include_metadata: bool,
    /// Timestamp for the metadata block; the current time when `None`.
    pub generated_at: Option<String>,
}

impl MarkdownConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, include: bool) -> Self {
        self.include_metadata = include;
        self
    }

    pub fn with_generated_at(mut self, timestamp: impl Into<String>) -> Self {
        self.generated_at = Some(timestamp.into());
        self
    }
}

/// Renders a topic tree to Markdown.
#[derive(Debug, Clone, Default)]
pub struct MarkdownRenderer {
    config: MarkdownConfig,
}

impl MarkdownRenderer {
    /// Create a renderer with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a renderer with the specified configuration.
    pub fn with_config(config: MarkdownConfig) -> Self {
        Self { config }
    }

    /// Render the tree rooted at `root`.
    pub fn render(&self, root: &Topic) -> String {
        let mut ctx = RenderContext::new(&self.config, root);
        ctx.walk(root);
        ctx.output
    }
}

/// Render with default configuration.
pub fn render_markdown(root: &Topic) -> String {
    MarkdownRenderer::new().render(root)
}

/// Accumulated output for one render pass.
struct RenderContext<'a> {
    config: &'a MarkdownConfig,
    root: &'a Topic,
    output: String,
}

impl<'a> RenderContext<'a> {
    fn new(config: &'a MarkdownConfig, root: &'a Topic) -> Self {
        Self {
            config,
            root,
            output: String::new(),
        }
    }

    fn line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }

    fn blank(&mut self) {
        self.output.push('\n');
    }

    fn walk(&mut self, topic: &Topic) {
        let depth = topic.level + 1;
        let title = display_title(topic);

        match depth {
            1 => {
                self.line(&format!("# {title}"));
                self.blank();
                if self.config.include_metadata && std::ptr::eq(topic, self.root) {
                    self.write_metadata();
                }
            }
            2 => {
                self.line(&format!("## {title}"));
                self.blank();
            }
            3 => {
                self.line(&format!("### {title}"));
                if topic.is_leaf() {
                    self.blank();
                }
            }
            _ => {
                let indent = "  ".repeat(depth - 4);
                if topic.is_leaf() {
                    self.line(&format!("{indent}- {title}"));
                } else {
                    self.line(&format!("{indent}- {}:", strip_trailing_colon(&title)));
                }
            }
        }

        // Continuation lines under a bullet are indented past its marker.
        let aux_indent = if depth >= 4 {
            "  ".repeat(depth - 3)
        } else {
            String::new()
        };
        self.write_notes(topic, &aux_indent);
        self.write_labels(topic, &aux_indent);
        self.write_links(topic, &aux_indent);
        self.write_attachments(topic, &aux_indent);

        for child in &topic.children {
            self.walk(child);
        }
    }

    fn write_metadata(&mut self) {
        let stats = collect_stats(self.root);
        let timestamp = self
            .config
            .generated_at
            .clone()
            .unwrap_or_else(timestamp_now);
        self.line(&format!(
            "<!-- Generated by mindmark | {timestamp} | Topics: {} | Max depth: {} -->",
            stats.total_topics, stats.max_depth
        ));
        self.blank();
    }

    fn write_block(&mut self, indent: &str, lines: Vec<String>) {
        if lines.is_empty() {
            return;
        }
        for line in lines {
            self.line(&format!("{indent}{line}"));
        }
        self.blank();
    }

    fn write_notes(&mut self, topic: &Topic, indent: &str) {
        let Some(notes) = &topic.notes else {
            return;
        };
        let lines = notes
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| format!("> {line}"))
            .collect();
        self.write_block(indent, lines);
    }

    fn write_labels(&mut self, topic: &Topic, indent: &str) {
        if topic.labels.is_empty() {
            return;
        }
        let tags: Vec<String> = topic.labels.iter().map(|l| code_span(l)).collect();
        self.write_block(indent, vec![format!("**Tags:** {}", tags.join(" "))]);
    }

    fn write_links(&mut self, topic: &Topic, indent: &str) {
        // Intra-map anchors have no target in the Markdown output.
        let lines = topic
            .links
            .iter()
            .filter(|link| link.kind != LinkType::Topic)
            .map(|link| {
                let text = link.title.as_deref().unwrap_or(&link.href);
                format!(
                    "🔗 [{}]({})",
                    escape_link_text(text),
                    link_destination(&link.href)
                )
            })
            .collect();
        self.write_block(indent, lines);
    }

    fn write_attachments(&mut self, topic: &Topic, indent: &str) {
        let lines = topic
            .attachments
            .iter()
            .map(|attachment| {
                let name = escape_link_text(&attachment.filename);
                let dest = link_destination(&attachment.path);
                match attachment.kind {
                    AttachmentType::Image => format!("![{name}]({dest})"),
                    AttachmentType::File => format!("📎 [{name}]({dest})"),
                }
            })
            .collect();
        self.write_block(indent, lines);
    }
}

/// Sanitized title with all marker symbols in front.
fn display_title(topic: &Topic) -> String {
    let title = sanitize_title(&topic.title);
    if topic.markers.is_empty() {
        title
    } else {
        format!("{} {title}", topic.markers.join(" "))
    }
}
