//! Schema-agnostic XML tree with a fixed repeatable-element policy.
//!
//! XMind exports are inconsistent about whether a repeatable element shows up
//! once or many times, so the tree built here settles that question once at
//! parse time: every element name listed in [`REPEATABLE_ELEMENTS`] is stored
//! as a [`Children::Sequence`], whatever its count. Everything downstream can
//! ask for a slice and never has to check for the singular form.

mod node;
mod parser;

pub use node::{ChildEntry, Children, RawXmlNode};
pub use parser::{MAX_NESTING_DEPTH, REPEATABLE_ELEMENTS, is_repeatable, parse_xml};
