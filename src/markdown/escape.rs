//! Pure string helpers for Markdown output.

/// Normalize a topic title for a heading or list item.
///
/// Collapses whitespace runs (including newlines) to one space, trims both
/// ends, and escapes `<` and `>` so the text cannot open an HTML tag when the
/// Markdown is later rendered. No other Markdown characters are touched.
///
/// # Examples
///
/// ```
/// use mindmark::markdown::sanitize_title;
///
/// assert_eq!(sanitize_title("  A   <b>  "), "A &lt;b&gt;");
/// assert_eq!(sanitize_title("multi\nline"), "multi line");
/// ```
pub fn sanitize_title(title: &str) -> String {
    let collapsed = title.split_whitespace().collect::<Vec<_>>().join(" ");
    escape_angle_brackets(&collapsed)
}

/// Escape `<` and `>` as HTML entities.
pub fn escape_angle_brackets(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Remove one trailing colon, half-width (`:`) or full-width (`：`).
pub fn strip_trailing_colon(text: &str) -> &str {
    text.strip_suffix(':')
        .or_else(|| text.strip_suffix('：'))
        .unwrap_or(text)
}

/// Calculate the minimum backtick count needed for inline code.
///
/// Returns the smallest number of backticks (at least 1) that doesn't
/// appear as a run in the content.
pub fn calculate_inline_code_ticks(content: &str) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == '`' {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run + 1
}

/// Wrap text in an inline code span that survives embedded backticks.
pub fn code_span(content: &str) -> String {
    let ticks = "`".repeat(calculate_inline_code_ticks(content));
    if content.starts_with('`') || content.ends_with('`') {
        format!("{ticks} {content} {ticks}")
    } else {
        format!("{ticks}{content}{ticks}")
    }
}

/// Escape brackets in link text.
pub fn escape_link_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '[' | ']' | '\\') {
            result.push('\\');
        }
        result.push(c);
    }
    result
}

/// Link destination, angle-bracketed when it contains spaces or parentheses.
pub fn link_destination(href: &str) -> String {
    if href.contains([' ', '(', ')']) {
        format!("<{href}>")
    } else {
        href.to_string()
    }
}
