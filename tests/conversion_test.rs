//! End-to-end conversion tests over in-memory `.xmind` archives.

mod common;

use std::collections::BTreeMap;

use common::{SAMPLE_CONTENT_XML, build_archive, document, xmind_archive};
use mindmark::markers::MarkerResolver;
use mindmark::topic::TopicBuilder;
use mindmark::xml::parse_xml;
use mindmark::{ConvertOptions, Converter, Topic, convert_bytes};

const SAMPLE_MARKDOWN: &str = "\
# Project Plan

> Quarterly goals
> and milestones

## 1️⃣ ✅ Research

**Tags:** `phase-1` `team-a`

🔗 [https://example.com/research](https://example.com/research)

### User interviews
- Scripts:
  - Draft &lt;v1&gt;
- Recruit participants
## [custom-rocket] 构建原型

![mockup v2.png](xap:attachments/mockup%20v2.png)

## Parking lot

";

fn build_tree(xml: &str) -> Topic {
    let resolver = MarkerResolver::new();
    let doc = parse_xml(xml).expect("valid XML");
    TopicBuilder::new(&resolver).build(&doc).expect("root topic")
}

// ============================================================================
// Golden output
// ============================================================================

#[test]
fn test_sample_document_markdown() {
    let result = convert_bytes(&xmind_archive(SAMPLE_CONTENT_XML), "plan.xmind");

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.content, SAMPLE_MARKDOWN);
}

#[test]
fn test_sample_document_stats() {
    let result = convert_bytes(&xmind_archive(SAMPLE_CONTENT_XML), "plan.xmind");
    let stats = &result.stats;

    assert_eq!(stats.total_topics, 8);
    assert_eq!(stats.max_depth, 4);
    assert_eq!(stats.root_topics, 3);
    assert_eq!(stats.markers_processed, 3);
    assert_eq!(stats.links_processed, 1);
    assert_eq!(stats.attachments_processed, 1);
    assert_eq!(stats.images_processed, 1);
    assert_eq!(stats.word_count, 20);
    assert_eq!(
        stats.level_distribution,
        BTreeMap::from([(0, 1), (1, 3), (2, 1), (3, 2), (4, 1)])
    );
}

#[test]
fn test_minimal_scenario() {
    let xml = document(
        r#"<topic id="r"><title>Root</title><children><topics type="attached"><topic id="c"><title>Child</title><marker-refs><marker-ref marker-id="flag-red"/></marker-refs></topic></topics></children></topic>"#,
    );
    let result = convert_bytes(&xmind_archive(&xml), "min.xmind");

    assert!(result.success);
    assert_eq!(result.content, "# Root\n\n## 🚩 Child\n\n");
}

// ============================================================================
// Archive layout
// ============================================================================

#[test]
fn test_alternate_content_paths() {
    let xml = document(r#"<topic id="r"><title>Nested</title></topic>"#);
    for path in ["content/content.xml", "src/content.xml", "META-INF/content.xml"] {
        let data = build_archive(&[(path, xml.as_bytes())]);
        let result = convert_bytes(&data, "alt.xmind");
        assert!(result.success, "{path}: {:?}", result.error);
        assert_eq!(result.content, "# Nested\n\n", "{path}");
    }
}

#[test]
fn test_archive_without_content_xml() {
    let data = build_archive(&[("META-INF/manifest.xml", b"<manifest/>")]);
    let result = convert_bytes(&data, "empty.xmind");

    assert!(!result.success);
    assert!(result.content.is_empty());
    assert_eq!(result.stats.total_topics, 0);
    assert!(result.error.unwrap().contains("content.xml"));
}

#[test]
fn test_not_an_archive() {
    let result = convert_bytes(b"<xmap-content/>", "plain.xml");
    assert!(!result.success);
    assert!(result.error.is_some());
}

// ============================================================================
// Failure handling
// ============================================================================

#[test]
fn test_missing_root_topic() {
    let xml = r#"<xmap-content><sheet id="s"><title>Only a sheet</title></sheet></xmap-content>"#;
    let result = convert_bytes(&xmind_archive(xml), "noroot.xmind");

    assert!(!result.success);
    assert_eq!(result.content, "");
    assert!(result.error.unwrap().contains("root topic"));
}

#[test]
fn test_malformed_xml() {
    let result = convert_bytes(&xmind_archive("<xmap-content><sheet>"), "broken.xmind");
    assert!(!result.success);
    assert!(result.error.unwrap().starts_with("Parse error"));
}

#[test]
fn test_batch_continues_after_failure() {
    let good = xmind_archive(&document(r#"<topic id="r"><title>Good</title></topic>"#));
    let bad = build_archive(&[("other.txt", b"nothing here")]);

    let results = Converter::default().convert_batch([
        ("a.xmind", good.as_slice()),
        ("b.xmind", bad.as_slice()),
        ("c.xmind", good.as_slice()),
    ]);

    let outcome: Vec<_> = results
        .iter()
        .map(|r| (r.metadata.source_file.as_str(), r.success))
        .collect();
    assert_eq!(
        outcome,
        [("a.xmind", true), ("b.xmind", false), ("c.xmind", true)]
    );
}

/// A chain of `levels` topics, each the only child of the one above.
fn nested_topics(levels: usize) -> String {
    let mut xml = String::new();
    for i in 0..levels {
        xml.push_str(&format!(
            r#"<topic id="t{i}"><title>T{i}</title><children><topics type="attached">"#
        ));
    }
    for _ in 0..levels {
        xml.push_str("</topics></children></topic>");
    }
    document(&xml)
}

#[test]
fn test_deeply_nested_document_fails_cleanly() {
    let data = xmind_archive(&nested_topics(10_000));
    let results = Converter::default().convert_batch([
        ("deep.xmind", data.as_slice()),
        ("ok.xmind", xmind_archive(SAMPLE_CONTENT_XML).as_slice()),
    ]);

    assert!(!results[0].success);
    assert!(results[0].content.is_empty());
    assert!(results[0].error.as_deref().unwrap().contains("nesting too deep"));
    assert!(results[1].success);
}

#[test]
fn test_nested_document_within_limit() {
    let result = convert_bytes(&xmind_archive(&nested_topics(150)), "deep.xmind");

    assert!(result.success, "{:?}", result.error);
    assert_eq!(result.stats.total_topics, 150);
    assert_eq!(result.stats.max_depth, 149);
}

// ============================================================================
// Tree invariants
// ============================================================================

fn assert_levels(topic: &Topic) {
    for child in &topic.children {
        assert_eq!(child.level, topic.level + 1, "level of {}", child.id);
        assert_eq!(child.parent_id.as_deref(), Some(topic.id.as_str()));
        assert_levels(child);
    }
}

#[test]
fn test_levels_and_parents() {
    let root = build_tree(SAMPLE_CONTENT_XML);
    assert_eq!(root.level, 0);
    assert!(root.parent_id.is_none());
    assert_levels(&root);
}

#[test]
fn test_total_topics_matches_reference_count() {
    fn count(topic: &Topic) -> usize {
        1 + topic.children.iter().map(count).sum::<usize>()
    }

    let root = build_tree(SAMPLE_CONTENT_XML);
    let result = convert_bytes(&xmind_archive(SAMPLE_CONTENT_XML), "plan.xmind");
    assert_eq!(result.stats.total_topics, count(&root));
}

#[test]
fn test_single_child_bare_vs_sequence() {
    let bare = document(
        r#"<topic id="r"><title>R</title><children><topic id="c"><title>C</title></topic></children></topic>"#,
    );
    let sequence = document(
        r#"<topic id="r"><title>R</title><children><topics type="attached"><topic id="c"><title>C</title></topic></topics></children></topic>"#,
    );

    assert_eq!(build_tree(&bare), build_tree(&sequence));
}

#[test]
fn test_deterministic_output() {
    let data = xmind_archive(SAMPLE_CONTENT_XML);
    let converter = Converter::default();

    let first = converter.convert_bytes(&data, "plan.xmind");
    let second = converter.convert_bytes(&data, "plan.xmind");

    assert_eq!(first.content, second.content);
    assert_eq!(first.stats, second.stats);
}

#[test]
fn test_first_line_is_root_heading() {
    let result = convert_bytes(&xmind_archive(SAMPLE_CONTENT_XML), "plan.xmind");
    let headings: Vec<_> = result
        .content
        .lines()
        .filter(|line| line.starts_with("# "))
        .collect();

    assert_eq!(headings, ["# Project Plan"]);
    assert!(result.content.starts_with("# Project Plan\n"));
}

// ============================================================================
// Options
// ============================================================================

#[test]
fn test_metadata_block_option() {
    let converter = Converter::new(ConvertOptions::new().with_metadata(true));
    let result = converter.convert_bytes(&xmind_archive(SAMPLE_CONTENT_XML), "plan.xmind");

    let lines: Vec<_> = result.content.lines().collect();
    assert_eq!(lines[0], "# Project Plan");
    assert_eq!(lines[1], "");
    assert!(lines[2].starts_with("<!-- Generated by mindmark | "));
    assert!(lines[2].ends_with("| Topics: 8 | Max depth: 4 -->"));
}

#[test]
fn test_marker_overrides() {
    let converter = Converter::new(
        ConvertOptions::new()
            .with_marker("custom-rocket", "🚀")
            .with_marker("task-done", "☑️"),
    );
    let result = converter.convert_bytes(&xmind_archive(SAMPLE_CONTENT_XML), "plan.xmind");

    assert!(result.content.contains("## 1️⃣ ☑️ Research\n"));
    assert!(result.content.contains("## 🚀 构建原型\n"));
}

#[test]
fn test_multiple_sheets_uses_first() {
    let xml = r#"<xmap-content>
  <sheet id="one"><topic id="a"><title>First sheet</title></topic></sheet>
  <sheet id="two"><topic id="b"><title>Second sheet</title></topic></sheet>
</xmap-content>"#;
    let result = convert_bytes(&xmind_archive(xml), "sheets.xmind");
    assert_eq!(result.content, "# First sheet\n\n");
}
