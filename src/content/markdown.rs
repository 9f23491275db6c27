//! Markdown to plain text, for excerpts and reading time

use pulldown_cmark::{Event, Options, Parser, TagEnd};

const ELLIPSIS: char = '…';

/// Flatten Markdown into whitespace-collapsed plain text.
///
/// Raw HTML (and JSX in MDX sources) is dropped; code is kept as text.
pub fn to_plain_text(markdown: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS
        | Options::ENABLE_SMART_PUNCTUATION
        | Options::ENABLE_GFM;
    let parser = Parser::new_ext(markdown, options);

    let mut text = String::new();

    for event in parser {
        match event {
            Event::Text(t) | Event::Code(t) => text.push_str(&t),
            Event::SoftBreak | Event::HardBreak => text.push(' '),
            Event::End(
                TagEnd::Paragraph
                | TagEnd::Heading(_)
                | TagEnd::Item
                | TagEnd::CodeBlock
                | TagEnd::TableCell,
            ) => text.push(' '),
            _ => {}
        }
    }

    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Drop top-level `import`/`export` statements from an MDX body.
///
/// Lines inside fenced code blocks are left alone.
pub fn strip_mdx_statements(body: &str) -> String {
    let mut in_fence = false;
    let mut kept = Vec::new();

    for line in body.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        if !in_fence && (line.starts_with("import ") || line.starts_with("export ")) {
            continue;
        }
        kept.push(line);
    }

    kept.join("\n")
}

/// Prune text to at most `max_chars` characters.
///
/// Longer text is cut at a word boundary and ends with an ellipsis, which
/// counts toward the budget.
pub fn prune_excerpt(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let budget = max_chars - 1;
    let end = text
        .char_indices()
        .nth(budget)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let head = &text[..end];

    let cut_mid_word = !text[end..].starts_with(char::is_whitespace);
    let head = match head.rfind(char::is_whitespace) {
        Some(pos) if cut_mid_word && pos > 0 => &head[..pos],
        _ => head,
    };

    format!("{}{}", head.trim_end(), ELLIPSIS)
}
