// src/utils/markup.rs

use once_cell::sync::Lazy;
use regex::Regex;

/// Ordered tag substitutions. The catch-all strip rule must stay last:
/// running it earlier would eat the tags the specific rules turn into
/// markdown markers.
static TAG_RULES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"(?i)</p>", "\n\n"),
        (r"(?i)<br\s*/?>", "\n"),
        (r"(?i)</div>", "\n"),
        (r"(?i)</li>", "\n"),
        (r"(?i)</h[1-6]>", "\n\n"),
        (r"(?i)<pre[^>]*>", "\n```\n"),
        (r"(?i)</pre>", "\n```\n"),
        (r"(?i)<code[^>]*>", "`"),
        (r"(?i)</code>", "`"),
        (r"(?i)<strong[^>]*>", "**"),
        (r"(?i)</strong>", "**"),
        (r"(?i)<b[^>]*>", "**"),
        (r"(?i)</b>", "**"),
        (r"(?i)<em[^>]*>", "_"),
        (r"(?i)</em>", "_"),
        (r"(?i)<i[^>]*>", "_"),
        (r"(?i)</i>", "_"),
        (r"<[^>]*>", ""),
    ]
    .into_iter()
    .map(|(pattern, replacement)| (Regex::new(pattern).unwrap(), replacement))
    .collect()
});

/// Runs of three or more newlines, possibly with whitespace between them.
static EXCESS_NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n\s*\n\s*\n").unwrap());

/// Runs of horizontal whitespace.
static EXCESS_SPACES: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t]+").unwrap());

/// Converts an HTML fragment into the markdown-subset plain text the rest
/// of the app stores and renders. Paragraphs and headings become blank-line
/// separated blocks, `<pre>` becomes a backtick fence, inline code/bold/
/// italic become backtick/asterisk/underscore markers, every other tag is
/// dropped, and the handful of entities LeetCode emits are decoded.
pub fn html_to_text(html: &str) -> String {
    let mut text = html.to_string();
    for (re, replacement) in TAG_RULES.iter() {
        text = re.replace_all(&text, *replacement).into_owned();
    }

    let text = decode_entities(&text);

    let text = EXCESS_NEWLINES.replace_all(&text, "\n\n");
    let text = EXCESS_SPACES.replace_all(&text, " ");
    text.trim().to_string()
}

/// Decodes the named entities the importer cares about. Anything else is
/// left untouched, so decoding already-decoded text is a no-op.
pub fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
