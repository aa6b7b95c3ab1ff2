//! Locating the XML payload inside an XMind archive.
//!
//! An `.xmind` file is a ZIP container. Depending on the tool that wrote it,
//! the topic tree lives at one of a handful of paths; the first one present
//! wins.

use std::io::{Cursor, Read, Seek};

use tracing::debug;
use zip::ZipArchive;

use crate::error::{Error, Result};
use crate::util::decode_text;

/// Entry paths checked for the XML payload, in priority order.
pub const CONTENT_PATHS: &[&str] = &[
    "content/content.xml",
    "content.xml",
    "src/content.xml",
    "META-INF/content.xml",
];

/// Anything that can hand back the bytes of a named entry.
pub trait EntrySource {
    /// Read an entry by name. `Ok(None)` means the entry does not exist.
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>>;
}

impl<R: Read + Seek> EntrySource for ZipArchive<R> {
    fn read_entry(&mut self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.by_name(name) {
            Ok(mut file) => {
                let mut contents = Vec::new();
                file.read_to_end(&mut contents)?;
                Ok(Some(contents))
            }
            Err(zip::result::ZipError::FileNotFound) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Find the XML payload in an entry source and decode it to text.
pub fn find_content_xml<S: EntrySource + ?Sized>(source: &mut S) -> Result<String> {
    for path in CONTENT_PATHS {
        if let Some(bytes) = source.read_entry(path)? {
            debug!(path, bytes = bytes.len(), "found content entry");
            return Ok(decode_text(&bytes).into_owned());
        }
    }

    // Newer XMind releases store JSON only; say so rather than just "missing".
    if source.read_entry("content.json")?.is_some() {
        return Err(Error::File(
            "could not find content.xml in archive (content.json-only archives are not supported)"
                .into(),
        ));
    }

    Err(Error::File("could not find content.xml in archive".into()))
}

/// Read the XML payload from any [`Read`] + [`Seek`] ZIP source.
pub fn read_content_xml<R: Read + Seek>(reader: R) -> Result<String> {
    let mut archive = ZipArchive::new(reader)?;
    find_content_xml(&mut archive)
}

/// Read the XML payload from in-memory archive bytes.
pub fn read_content_xml_from_bytes(data: &[u8]) -> Result<String> {
    read_content_xml(Cursor::new(data))
}
