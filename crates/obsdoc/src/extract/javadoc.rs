//! Javadoc to plain description text

use regex::Regex;
use std::sync::LazyLock;

static RE_LINK_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{@(?:link|linkplain)\s+([^\s}]+)(?:\s+([^}]*))?\}").unwrap()
});
static RE_CODE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@code\s+([^}]*)\}").unwrap());
static RE_LITERAL_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{@literal\s+([^}]*)\}").unwrap());
static RE_PARAGRAPH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</?p\s*/?>").unwrap());

/// Reduce a raw `/** ... */` comment to its description text.
///
/// Comment markers and leading `*` are removed, block tags (`@since`, ...)
/// end the description, inline `{@link}` / `{@code}` tags are replaced by
/// their text and lines are joined into paragraphs.
pub fn clean(raw: &str) -> String {
    let body = raw
        .trim()
        .trim_start_matches("/**")
        .trim_start_matches("/*")
        .trim_end_matches("*/");

    let mut lines = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        let line = line.strip_prefix('*').unwrap_or(line).trim();
        if line.starts_with('@') {
            break;
        }
        lines.push(line);
    }

    let text = RE_PARAGRAPH.replace_all(&lines.join("\n"), "\n\n").into_owned();
    let text = RE_LINK_TAG.replace_all(&text, |caps: &regex::Captures| {
        match caps.get(2).map(|m| m.as_str().trim()).filter(|l| !l.is_empty()) {
            Some(label) => label.to_string(),
            None => caps[1].to_string(),
        }
    });
    let text = RE_CODE_TAG.replace_all(&text, "`$1`");
    let text = RE_LITERAL_TAG.replace_all(&text, "$1");

    text.split("\n\n")
        .map(|paragraph| paragraph.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|paragraph| !paragraph.is_empty())
        .collect::<Vec<_>>()
        .join("\n\n")
}
