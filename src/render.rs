//! Markup helpers shared by every command.
//!
//! Everything that reaches the output goes through [`escape_html`] first;
//! commands only concatenate escaped text with fixed markup.

use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};

use crate::post::parse_date;

/// Hard cap on the body preview printed by `cat`.
pub const PREVIEW_CHARS: usize = 300;
/// Longest title-derived file name, before the `.md` suffix.
pub const FILENAME_CHARS: usize = 45;

pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(c),
        }
    }
    out
}

/// Inverse of [`escape_html`], for reading attribute values back out of
/// rendered markup.
pub fn unescape_html(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#039;", "'")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}

/// `ls -l` style date: `Dec 31 2022`, `Jan  5 2024`. Unparseable dates are
/// printed as given.
pub fn format_date(raw: &str) -> String {
    match parse_date(raw) {
        Some(date) => date.format("%b %e %Y").to_string(),
        None => escape_html(raw),
    }
}

/// File name derived from a title: `My Post: Title!` → `my-post-title.md`.
pub fn format_filename(title: &str) -> String {
    let mut name = String::new();
    let mut in_space = false;
    for c in title.to_lowercase().chars() {
        if c.is_whitespace() {
            if !in_space {
                name.push('-');
                in_space = true;
            }
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' {
            name.push(c);
            in_space = false;
        }
    }
    let name: String = name.chars().take(FILENAME_CHARS).collect();
    format!("{name}.md")
}

/// URL slug for series and tag names: lowercase, runs of whitespace and `/`
/// to `-`, so a slug is always a single path segment.
pub fn slugify(name: &str) -> String {
    name.to_lowercase()
        .split(|c: char| c.is_whitespace() || c == '/')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// First [`PREVIEW_CHARS`] characters of `text`, with `...` only when cut.
pub fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

/// Escapes `text` and wraps every occurrence of `pattern` in a match span.
pub fn highlight(text: &str, pattern: &str, case_insensitive: bool) -> String {
    if pattern.is_empty() {
        return escape_html(text);
    }
    let Ok(re) = RegexBuilder::new(&regex::escape(pattern))
        .case_insensitive(case_insensitive)
        .build()
    else {
        return escape_html(text);
    };

    let mut out = String::with_capacity(text.len());
    let mut last = 0;
    for found in re.find_iter(text) {
        out.push_str(&escape_html(&text[last..found.start()]));
        out.push_str(r#"<span class="term-grep-match">"#);
        out.push_str(&escape_html(found.as_str()));
        out.push_str("</span>");
        last = found.end();
    }
    out.push_str(&escape_html(&text[last..]));
    out
}

static ELEMENT: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<([a-zA-Z]+)\b([^>]*)>").ok());
static DATA_CMD: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#"\bdata-cmd="([^"]*)""#).ok());
static HREF: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r#"\bhref="([^"]*)""#).ok());
static BLOCK_END: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"(?i)</(div|p|pre)>|<br\s*/?>").ok());
static ANY_TAG: LazyLock<Option<Regex>> = LazyLock::new(|| Regex::new(r"<[^>]*>").ok());

/// Clickable element carrying a command line in its `data-cmd` attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddedCommand {
    pub command: String,
    /// Set for `<a href>` elements, which navigate instead of executing.
    pub href: Option<String>,
}

/// Every `data-cmd` element in document order.
pub fn embedded_commands(html: &str) -> Vec<EmbeddedCommand> {
    let (Some(tag), Some(cmd), Some(href)) = (ELEMENT.as_ref(), DATA_CMD.as_ref(), HREF.as_ref()) else {
        return Vec::new();
    };

    tag.captures_iter(html)
        .filter_map(|element| {
            let attrs = element.get(2)?.as_str();
            let command = cmd.captures(attrs)?.get(1)?.as_str();
            let is_link = element.get(1)?.as_str().eq_ignore_ascii_case("a");
            let href = is_link
                .then(|| href.captures(attrs))
                .flatten()
                .and_then(|c| c.get(1))
                .map(|m| unescape_html(m.as_str()))
                .filter(|h| !h.is_empty());
            Some(EmbeddedCommand {
                command: unescape_html(command),
                href,
            })
        })
        .collect()
}

/// Plain-text rendering of markup for line-oriented hosts: block ends become
/// line breaks, tags are dropped, entities decoded, blank lines removed.
pub fn strip_tags(html: &str) -> String {
    let (Some(block_end), Some(tag)) = (BLOCK_END.as_ref(), ANY_TAG.as_ref()) else {
        return html.to_string();
    };

    let broken = block_end.replace_all(html, "\n");
    let text = unescape_html(&tag.replace_all(&broken, ""));
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Red error line, message escaped.
pub fn error_line(message: &str) -> String {
    format!(r#"<span class="text-term-red">{}</span>"#, escape_html(message))
}

/// Dimmed hint line, message escaped.
pub fn hint_line(message: &str) -> String {
    format!(r#"<span class="text-term-fg-dark">{}</span>"#, escape_html(message))
}
