//! Pure markdown generation from the topic tree.
//!
//! - [`escape`]: title sanitization and small escaping helpers
//! - [`render`]: depth-driven heading/list rendering
//!
//! The converter ([`crate::convert`]) handles I/O and packaging, calling these
//! pure functions to generate content.
//!
//! ## Design Notes
//!
//! - **Titles are sanitized, not escaped**: whitespace is collapsed and only
//!   `<`/`>` become entities. Mind-map titles routinely contain `*`, `_` or
//!   `#` meant literally as text, and the output is for reading.
//! - **Markers**: every resolved marker is shown, space-joined, in front of
//!   the title.
//! - **Topic links** (`#id`, `xmind:#id`) are not rendered; the Markdown has no
//!   anchors for them. They still count in the statistics.

mod escape;
mod render;

pub use escape::{
    calculate_inline_code_ticks, code_span, escape_angle_brackets, sanitize_title,
    strip_trailing_colon,
};
pub use render::{MarkdownConfig, MarkdownRenderer, render_markdown};
