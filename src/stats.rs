//! Aggregate counts over a topic tree.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::topic::{AttachmentType, Topic};

/// Statistics for one converted mind map. All zero for a failed conversion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_topics: usize,
    /// Deepest `Topic::level` in the tree (a lone root is depth 0).
    pub max_depth: usize,
    /// Direct children of the root.
    pub root_topics: usize,
    pub markers_processed: usize,
    pub links_processed: usize,
    pub attachments_processed: usize,
    pub images_processed: usize,
    /// Words in titles and notes; each CJK character counts as one word.
    pub word_count: usize,
    /// Characters in titles and notes.
    pub char_count: usize,
    /// Topic count per level.
    pub level_distribution: BTreeMap<usize, usize>,
}

/// Walk the tree once and accumulate [`Stats`].
pub fn collect_stats(root: &Topic) -> Stats {
    let mut stats = Stats {
        root_topics: root.children.len(),
        ..Stats::default()
    };
    visit(root, &mut stats);
    stats
}

fn visit(topic: &Topic, stats: &mut Stats) {
    stats.total_topics += 1;
    stats.max_depth = stats.max_depth.max(topic.level);
    *stats.level_distribution.entry(topic.level).or_insert(0) += 1;

    stats.markers_processed += topic.markers.len();
    stats.links_processed += topic.links.len();
    stats.attachments_processed += topic.attachments.len();
    stats.images_processed += topic
        .attachments
        .iter()
        .filter(|a| a.kind == AttachmentType::Image)
        .count();

    stats.word_count += count_words(&topic.title);
    stats.char_count += topic.title.chars().count();
    if let Some(notes) = &topic.notes {
        stats.word_count += count_words(notes);
        stats.char_count += notes.chars().count();
    }

    for child in &topic.children {
        visit(child, stats);
    }
}

/// Count words, treating every CJK character as a word of its own.
///
/// # Examples
///
/// ```
/// use mindmark::stats::count_words;
///
/// assert_eq!(count_words("hello world"), 2);
/// assert_eq!(count_words("思维导图"), 4);
/// assert_eq!(count_words("Rust 语言"), 3);
/// ```
pub fn count_words(text: &str) -> usize {
    let mut words = 0;
    let mut in_word = false;

    for c in text.chars() {
        if is_cjk(c) {
            words += 1;
            in_word = false;
        } else if c.is_whitespace() || is_cjk_punctuation(c) {
            in_word = false;
        } else if !in_word {
            words += 1;
            in_word = true;
        }
    }

    words
}

/// Han ideographs, kana, and Hangul syllables.
fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'     // CJK Unified Ideographs
        | '\u{3400}'..='\u{4DBF}'   // Extension A
        | '\u{20000}'..='\u{2A6DF}' // Extension B
        | '\u{F900}'..='\u{FAFF}'   // Compatibility Ideographs
        | '\u{3040}'..='\u{309F}'   // Hiragana
        | '\u{30A0}'..='\u{30FF}'   // Katakana
        | '\u{AC00}'..='\u{D7AF}'   // Hangul Syllables
    )
}

/// CJK and full-width punctuation, which separates words like whitespace.
fn is_cjk_punctuation(c: char) -> bool {
    matches!(c, '\u{3000}'..='\u{303F}' | '\u{FF01}'..='\u{FF0F}' | '\u{FF1A}'..='\u{FF20}')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topic::{Attachment, Link};

    fn leaf(level: usize, title: &str) -> Topic {
        Topic {
            id: format!("{title}-{level}"),
            title: title.to_string(),
            level,
            parent_id: None,
            children: Vec::new(),
            markers: Vec::new(),
            links: Vec::new(),
            notes: None,
            labels: Vec::new(),
            attachments: Vec::new(),
        }
    }

    #[test]
    fn test_count_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words("  one   two\tthree\n"), 3);
        assert_eq!(count_words("中文"), 2);
        assert_eq!(count_words("hello中文world"), 4);
        assert_eq!(count_words("你好，世界"), 4);
        assert_eq!(count_words("カタカナ と 한국어"), 8);
    }

    #[test]
    fn test_collect_stats() {
        let mut child = leaf(1, "Child topic");
        child.markers.push("🚩".into());
        child.links.push(Link::new("https://example.com", None));
        child.notes = Some("a note".into());
        child.attachments.push(Attachment {
            filename: "a.png".into(),
            path: "xap:attachments/a.png".into(),
            kind: AttachmentType::Image,
        });
        child.children.push(leaf(2, "Grandchild"));

        let mut root = leaf(0, "Root");
        root.children.push(child);
        root.children.push(leaf(1, "Other"));

        let stats = collect_stats(&root);
        assert_eq!(stats.total_topics, 4);
        assert_eq!(stats.max_depth, 2);
        assert_eq!(stats.root_topics, 2);
        assert_eq!(stats.markers_processed, 1);
        assert_eq!(stats.links_processed, 1);
        assert_eq!(stats.attachments_processed, 1);
        assert_eq!(stats.images_processed, 1);
        // Root, Child topic, a note, Grandchild, Other
        assert_eq!(stats.word_count, 1 + 2 + 2 + 1 + 1);
        assert_eq!(stats.char_count, 4 + 11 + 6 + 10 + 5);
        assert_eq!(stats.level_distribution, BTreeMap::from([(0, 1), (1, 2), (2, 1)]));
    }

    #[test]
    fn test_lone_root() {
        let stats = collect_stats(&leaf(0, "Only"));
        assert_eq!(stats.total_topics, 1);
        assert_eq!(stats.max_depth, 0);
        assert_eq!(stats.root_topics, 0);
    }

    #[test]
    fn test_serialized_field_names() {
        let json = serde_json::to_value(Stats::default()).unwrap();
        assert!(json.get("totalTopics").is_some());
        assert!(json.get("levelDistribution").is_some());
    }
}
