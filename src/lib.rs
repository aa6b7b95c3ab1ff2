//! # mindmark
//!
//! A fast, lightweight library for converting XMind mind maps to Markdown.
//!
//! ## Features
//!
//! - Reads XMind 8 archives (`content.xml` inside a ZIP container)
//! - Headings for the first three levels, nested bullet lists below
//! - Markers rendered as emoji, with a configurable lookup table
//! - Notes, labels, hyperlinks and embedded images carried over
//! - Statistics (topic count, depth, words with CJK-aware counting)
//!
//! ## Quick Start
//!
//! ```no_run
//! use mindmark::convert_file;
//!
//! let result = convert_file("ideas.xmind");
//! assert!(result.success);
//! println!("{}", result.content);
//! println!("{} topics", result.stats.total_topics);
//! ```
//!
//! ## Pipeline
//!
//! Each stage produces a new structure and never touches the previous one:
//!
//! 1. [`archive`]: archive bytes → `content.xml` text
//! 2. [`xml`]: text → [`RawXmlNode`] tree (repeatable elements always sequences)
//! 3. [`topic`]: XML tree → [`Topic`] tree
//! 4. [`markdown`] and [`stats`]: topic tree → Markdown text and [`Stats`]
//!
//! The stages are public, so a tree can be built and rendered by hand:
//!
//! ```
//! use mindmark::markdown::render_markdown;
//! use mindmark::markers::MarkerResolver;
//! use mindmark::topic::TopicBuilder;
//! use mindmark::xml::parse_xml;
//!
//! let doc = parse_xml("<topic><title>Hello</title></topic>")?;
//! let resolver = MarkerResolver::new();
//! let root = TopicBuilder::new(&resolver).build(&doc)?;
//! assert_eq!(render_markdown(&root), "# Hello\n\n");
//! # Ok::<(), mindmark::Error>(())
//! ```

pub mod archive;
pub mod convert;
pub mod error;
pub mod markdown;
pub mod markers;
pub mod stats;
pub mod topic;
pub(crate) mod util;
pub mod xml;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Library version reported in conversion metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use convert::{
    ConversionMetadata, ConversionResult, ConvertOptions, Converter, convert_bytes, convert_file,
};
pub use error::{Error, Result};
pub use markdown::{MarkdownConfig, MarkdownRenderer, render_markdown};
pub use markers::MarkerResolver;
pub use stats::{Stats, collect_stats};
pub use topic::{Attachment, AttachmentType, Link, LinkType, Topic, TopicBuilder};
pub use xml::RawXmlNode;
