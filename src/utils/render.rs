// src/utils/render.rs
//
// Turns stored problem text (the markdown subset produced by
// `utils::markup`) into typed display blocks for clients.

use serde::Serialize;

/// One inline span of a paragraph line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "lowercase")]
pub enum Segment {
    Plain(String),
    Bold(String),
    Code(String),
}

/// One classified line of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Block {
    Heading { text: String },
    Spacer,
    Paragraph { segments: Vec<Segment> },
}

/// Splits content on newlines and classifies each line.
///
/// * `**...**` spanning the whole line is a heading (markers stripped).
/// * A fence marker or blank line is a spacer.
/// * Everything else is a paragraph run through the inline span parser.
pub fn render(content: &str) -> Vec<Block> {
    content
        .split('\n')
        .map(|line| {
            if line.starts_with("**") && line.ends_with("**") {
                Block::Heading {
                    text: line.replace("**", ""),
                }
            } else if line.starts_with("```") || line.trim().is_empty() {
                Block::Spacer
            } else {
                Block::Paragraph {
                    segments: parse_inline(line),
                }
            }
        })
        .collect()
}

/// Scans a paragraph line left to right, emitting bold spans for `**...**`
/// pairs and code spans for `` `...` `` pairs. An unmatched marker is not an
/// error: it is emitted literally and the scan resumes past it.
pub fn parse_inline(text: &str) -> Vec<Segment> {
    let mut segments: Vec<Segment> = Vec::new();
    let mut rest = text;

    while !rest.is_empty() {
        // The nearer of the two markers opens the next span.
        let next = match (rest.find("**"), rest.find('`')) {
            (Some(b), Some(c)) if b < c => Some((b, "**")),
            (Some(_), Some(c)) => Some((c, "`")),
            (Some(b), None) => Some((b, "**")),
            (None, Some(c)) => Some((c, "`")),
            (None, None) => None,
        };

        let Some((at, marker)) = next else {
            push_plain(&mut segments, rest);
            break;
        };

        if at > 0 {
            push_plain(&mut segments, &rest[..at]);
        }

        let body_start = at + marker.len();
        match rest[body_start..].find(marker) {
            Some(close) => {
                let body = &rest[body_start..body_start + close];
                segments.push(if marker == "**" {
                    Segment::Bold(body.to_string())
                } else {
                    Segment::Code(body.to_string())
                });
                rest = &rest[body_start + close + marker.len()..];
            }
            None => {
                // No closer: the marker degrades to literal text.
                push_plain(&mut segments, marker);
                rest = &rest[body_start..];
            }
        }
    }

    segments
}

/// Appends plain text, merging into a preceding plain segment so literal
/// markers don't fragment the stream.
fn push_plain(segments: &mut Vec<Segment>, text: &str) {
    if let Some(Segment::Plain(prev)) = segments.last_mut() {
        prev.push_str(text);
    } else {
        segments.push(Segment::Plain(text.to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_bold_line_is_a_heading() {
        let blocks = render("**Example 1:**");
        assert_eq!(
            blocks,
            vec![Block::Heading {
                text: "Example 1:".to_string()
            }]
        );
    }

    #[test]
    fn fences_and_blank_lines_are_spacers() {
        assert_eq!(render("```"), vec![Block::Spacer]);
        assert_eq!(render(""), vec![Block::Spacer]);
        assert_eq!(render("   "), vec![Block::Spacer]);
    }

    #[test]
    fn paragraph_mixes_plain_bold_and_code() {
        let segments = parse_inline("Given `nums` and **target**, return indices.");
        assert_eq!(
            segments,
            vec![
                Segment::Plain("Given ".to_string()),
                Segment::Code("nums".to_string()),
                Segment::Plain(" and ".to_string()),
                Segment::Bold("target".to_string()),
                Segment::Plain(", return indices.".to_string()),
            ]
        );
    }

    #[test]
    fn unmatched_backtick_degrades_to_literal() {
        let segments = parse_inline("value`");
        assert_eq!(segments, vec![Segment::Plain("value`".to_string())]);
    }

    #[test]
    fn unmatched_bold_marker_degrades_to_literal() {
        let segments = parse_inline("2 ** 10 is 1024");
        assert_eq!(segments, vec![Segment::Plain("2 ** 10 is 1024".to_string())]);
    }

    #[test]
    fn code_before_bold_wins_when_nearer() {
        let segments = parse_inline("`a` then **b**");
        assert_eq!(
            segments,
            vec![
                Segment::Code("a".to_string()),
                Segment::Plain(" then ".to_string()),
                Segment::Bold("b".to_string()),
            ]
        );
    }

    #[test]
    fn multiline_content_classifies_per_line() {
        let blocks = render("**Title**\n\nBody with `x`.");
        assert_eq!(
            blocks,
            vec![
                Block::Heading {
                    text: "Title".to_string()
                },
                Block::Spacer,
                Block::Paragraph {
                    segments: vec![
                        Segment::Plain("Body with ".to_string()),
                        Segment::Code("x".to_string()),
                        Segment::Plain(".".to_string()),
                    ]
                },
            ]
        );
    }
}
