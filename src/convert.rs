//! End-to-end conversion: archive bytes → Markdown + statistics.
//!
//! [`Converter`] never returns an `Err` or panics on bad input. Every fatal
//! condition ends up in a [`ConversionResult`] with `success == false`, so a
//! batch keeps going when one document is broken.
//!
//! # Example
//!
//! ```no_run
//! use mindmark::{ConvertOptions, Converter};
//!
//! let converter = Converter::new(ConvertOptions::new().with_metadata(true));
//! let result = converter.convert_file("ideas.xmind");
//! if result.success {
//!     println!("{}", result.content);
//! } else {
//!     eprintln!("error: {}", result.error.unwrap_or_default());
//! }
//! ```

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read, Seek};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::archive::{read_content_xml, read_content_xml_from_bytes};
use crate::error::{Error, Result};
use crate::markdown::{MarkdownConfig, MarkdownRenderer};
use crate::markers::MarkerResolver;
use crate::stats::{Stats, collect_stats};
use crate::topic::TopicBuilder;
use crate::util::{now_millis, timestamp_now};
use crate::xml::parse_xml;

/// Format tag reported in every result.
pub const SOURCE_FORMAT: &str = "xmind";

/// Options for a [`Converter`].
#[derive(Debug, Clone, Default)]
pub struct ConvertOptions {
    pub markdown: MarkdownConfig,
    /// Marker id → symbol entries merged over the built-in table.
    pub marker_overrides: HashMap<String, String>,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Include the metadata comment block after the root heading.
    pub fn with_metadata(mut self, include: bool) -> Self {
        self.markdown.include_metadata = include;
        self
    }

    /// Override (or add) the symbol for a marker id.
    pub fn with_marker(mut self, id: impl Into<String>, symbol: impl Into<String>) -> Self {
        self.marker_overrides.insert(id.into(), symbol.into());
        self
    }
}

/// Where a result came from and when.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionMetadata {
    pub source_file: String,
    pub source_format: String,
    /// RFC 3339 time the conversion started.
    pub timestamp: String,
    /// Version of this library.
    pub version: String,
    pub processing_duration_ms: f64,
}

/// Outcome of converting one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionResult {
    /// Rendered Markdown; empty on failure.
    pub content: String,
    /// All zero on failure.
    pub stats: Stats,
    pub metadata: ConversionMetadata,
    pub success: bool,
    /// Present iff `success` is false.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ConversionResult {
    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Reusable converter. Holds no per-document state.
#[derive(Debug, Clone, Default)]
pub struct Converter {
    options: ConvertOptions,
    markers: MarkerResolver,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        let markers = MarkerResolver::with_overrides(options.marker_overrides.clone());
        Self { options, markers }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert an in-memory `.xmind` archive.
    pub fn convert_bytes(&self, data: &[u8], source_file: &str) -> ConversionResult {
        self.run(source_file, |timestamp| {
            let xml = read_content_xml_from_bytes(data)?;
            self.render_xml(&xml, timestamp)
        })
    }

    /// Convert an archive from any [`Read`] + [`Seek`] source.
    pub fn convert_reader<R: Read + Seek>(&self, reader: R, source_file: &str) -> ConversionResult {
        self.run(source_file, |timestamp| {
            let xml = read_content_xml(reader)?;
            self.render_xml(&xml, timestamp)
        })
    }

    /// Convert an archive on disk.
    pub fn convert_file<P: AsRef<Path>>(&self, path: P) -> ConversionResult {
        let path = path.as_ref();
        let source_file = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        self.run(&source_file, |timestamp| {
            let file = File::open(path).map_err(|e| {
                Error::File(format!("could not open {}: {e}", path.display()))
            })?;
            let xml = read_content_xml(BufReader::new(file))?;
            self.render_xml(&xml, timestamp)
        })
    }

    /// Convert an already-extracted `content.xml` payload.
    pub fn convert_xml(&self, xml: &str, source_file: &str) -> ConversionResult {
        self.run(source_file, |timestamp| self.render_xml(xml, timestamp))
    }

    /// Convert several archives one after another.
    ///
    /// Each input is independent; a failure shows up in its own result and
    /// does not stop the rest.
    pub fn convert_batch<I, S, B>(&self, inputs: I) -> Vec<ConversionResult>
    where
        I: IntoIterator<Item = (S, B)>,
        S: AsRef<str>,
        B: AsRef<[u8]>,
    {
        let results: Vec<ConversionResult> = inputs
            .into_iter()
            .map(|(name, data)| self.convert_bytes(data.as_ref(), name.as_ref()))
            .collect();

        let failed = results.iter().filter(|r| !r.success).count();
        info!(total = results.len(), failed, "batch conversion finished");
        results
    }

    /// Parse, build, render and count. The fallible core of every entry point.
    pub fn render_xml(&self, xml: &str, timestamp: &str) -> Result<(String, Stats)> {
        let document = parse_xml(xml)?;
        let root = TopicBuilder::new(&self.markers).build(&document)?;

        let mut config = self.options.markdown.clone();
        if config.generated_at.is_none() {
            config.generated_at = Some(timestamp.to_string());
        }
        let content = MarkdownRenderer::with_config(config).render(&root);
        let stats = collect_stats(&root);

        debug!(
            topics = stats.total_topics,
            max_depth = stats.max_depth,
            bytes = content.len(),
            "rendered mind map"
        );
        Ok((content, stats))
    }

    fn run<F>(&self, source_file: &str, convert: F) -> ConversionResult
    where
        F: FnOnce(&str) -> Result<(String, Stats)>,
    {
        let started = now_millis();
        let timestamp = timestamp_now();
        let outcome = convert(&timestamp);
        let processing_duration_ms = (now_millis() - started).max(0.0);

        let metadata = ConversionMetadata {
            source_file: source_file.to_string(),
            source_format: SOURCE_FORMAT.to_string(),
            timestamp,
            version: crate::VERSION.to_string(),
            processing_duration_ms,
        };

        match outcome {
            Ok((content, stats)) => {
                debug!(source = source_file, ms = processing_duration_ms, "conversion succeeded");
                ConversionResult {
                    content,
                    stats,
                    metadata,
                    success: true,
                    error: None,
                }
            }
            Err(e) => {
                warn!(source = source_file, error = %e, "conversion failed");
                ConversionResult {
                    content: String::new(),
                    stats: Stats::default(),
                    metadata,
                    success: false,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

/// Convert in-memory archive bytes with default options.
pub fn convert_bytes(data: &[u8], source_file: &str) -> ConversionResult {
    Converter::default().convert_bytes(data, source_file)
}

/// Convert an archive on disk with default options.
pub fn convert_file<P: AsRef<Path>>(path: P) -> ConversionResult {
    Converter::default().convert_file(path)
}
