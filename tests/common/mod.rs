//! Shared helpers: build `.xmind` archives in memory.

#![allow(dead_code)]

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A representative XMind 8 document exercising every extracted field.
pub const SAMPLE_CONTENT_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<xmap-content xmlns="urn:xmind:xmap:xmlns:content:2.0" xmlns:fo="http://www.w3.org/1999/XSL/Format" xmlns:svg="http://www.w3.org/2000/svg" xmlns:xhtml="http://www.w3.org/1999/xhtml" xmlns:xlink="http://www.w3.org/1999/xlink" modified-by="author" timestamp="1700000000000" version="2.0">
  <sheet id="sheet-1" timestamp="1700000000000">
    <topic id="root" structure-class="org.xmind.ui.map.unbalanced" timestamp="1700000000000">
      <title>Project Plan</title>
      <notes><plain>Quarterly goals
and milestones</plain></notes>
      <children>
        <topics type="attached">
          <topic id="research" xlink:href="https://example.com/research">
            <title>Research</title>
            <marker-refs>
              <marker-ref marker-id="priority-1"/>
              <marker-ref marker-id="task-done"/>
            </marker-refs>
            <labels><label>phase-1</label><label>team-a</label></labels>
            <children>
              <topics type="attached">
                <topic id="interviews">
                  <title>User interviews</title>
                  <children>
                    <topics type="attached">
                      <topic id="scripts">
                        <title>Scripts：</title>
                        <children>
                          <topics type="attached">
                            <topic id="draft"><title>Draft &lt;v1&gt;</title></topic>
                          </topics>
                        </children>
                      </topic>
                      <topic id="recruit"><title>Recruit   participants</title></topic>
                    </topics>
                  </children>
                </topic>
              </topics>
            </children>
          </topic>
          <topic id="build">
            <title>构建原型</title>
            <marker-refs><marker-ref marker-id="custom-rocket"/></marker-refs>
            <xhtml:img svg:height="120" svg:width="200" xhtml:src="xap:attachments/mockup%20v2.png"/>
          </topic>
        </topics>
        <topics type="detached">
          <topic id="parking"><title>Parking lot</title></topic>
        </topics>
      </children>
    </topic>
    <title>Sheet 1</title>
  </sheet>
</xmap-content>"#;

/// Zip up `(path, contents)` pairs.
pub fn build_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    for (name, data) in entries {
        zip.start_file(*name, options).expect("start zip entry");
        zip.write_all(data).expect("write zip entry");
    }
    zip.finish().expect("finish zip").into_inner()
}

/// An XMind 8 archive with `content.xml` at the root, plus the usual manifest.
pub fn xmind_archive(content_xml: &str) -> Vec<u8> {
    build_archive(&[
        ("content.xml", content_xml.as_bytes()),
        (
            "META-INF/manifest.xml",
            br#"<manifest><file-entry full-path="content.xml" media-type="text/xml"/></manifest>"#,
        ),
    ])
}

/// Wrap a root topic element in the standard document/sheet envelope.
pub fn document(root_topic: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?><xmap-content xmlns="urn:xmind:xmap:xmlns:content:2.0" xmlns:xlink="http://www.w3.org/1999/xlink"><sheet id="s">{root_topic}</sheet></xmap-content>"#
    )
}
