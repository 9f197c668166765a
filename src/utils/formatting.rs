use regex::Regex;
use std::sync::OnceLock;

/// A piece of a model answer, split for display.
#[derive(Clone, Debug, PartialEq)]
pub enum Segment {
    Text(String),
    InlineCode(String),
    CodeBlock { language: String, code: String },
}

fn fence_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"```([\w+#.-]*)[ \t]*\r?\n([\s\S]*?)\r?\n?```").ok())
        .as_ref()
}

fn inline_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"`([^`\n]+)`").ok()).as_ref()
}

/// Split an answer into prose, inline code and fenced code blocks.
///
/// An unclosed fence is left as plain text.
pub fn segments(content: &str) -> Vec<Segment> {
    let mut out = Vec::new();
    let Some(fence) = fence_pattern() else {
        out.push(Segment::Text(content.to_string()));
        return out;
    };

    let mut last = 0;
    for caps in fence.captures_iter(content) {
        let Some(whole) = caps.get(0) else { continue };
        push_prose(&mut out, &content[last..whole.start()]);
        out.push(Segment::CodeBlock {
            language: caps.get(1).map(|m| m.as_str()).unwrap_or("").to_string(),
            code: caps.get(2).map(|m| m.as_str()).unwrap_or("").to_string(),
        });
        last = whole.end();
    }
    push_prose(&mut out, &content[last..]);

    out
}

fn push_prose(out: &mut Vec<Segment>, text: &str) {
    if text.is_empty() {
        return;
    }
    let Some(inline) = inline_pattern() else {
        out.push(Segment::Text(text.to_string()));
        return;
    };

    let mut last = 0;
    for caps in inline.captures_iter(text) {
        let (Some(whole), Some(code)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        if whole.start() > last {
            out.push(Segment::Text(text[last..whole.start()].to_string()));
        }
        out.push(Segment::InlineCode(code.as_str().to_string()));
        last = whole.end();
    }
    if last < text.len() {
        out.push(Segment::Text(text[last..].to_string()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(segments("Paris."), vec![text("Paris.")]);
        assert!(segments("").is_empty());
    }

    #[test]
    fn test_code_block_with_language() {
        let answer = "Try this:\n```rust\nfn main() {}\n```\nDone.";
        assert_eq!(
            segments(answer),
            vec![
                text("Try this:\n"),
                Segment::CodeBlock {
                    language: "rust".to_string(),
                    code: "fn main() {}".to_string(),
                },
                text("\nDone."),
            ]
        );
    }

    #[test]
    fn test_several_blocks_and_inline_code() {
        let answer = "Use `ls`:\n```\nls -la\n```\nor\n```sh\nls\n```";
        let parts = segments(answer);
        assert_eq!(parts[0], text("Use "));
        assert_eq!(parts[1], Segment::InlineCode("ls".to_string()));
        assert_eq!(parts[2], text(":\n"));
        assert_eq!(
            parts[3],
            Segment::CodeBlock {
                language: String::new(),
                code: "ls -la".to_string(),
            }
        );
        assert_eq!(parts[4], text("\nor\n"));
        assert!(matches!(&parts[5], Segment::CodeBlock { language, .. } if language == "sh"));
        assert_eq!(parts.len(), 6);
    }

    #[test]
    fn test_unclosed_fence_stays_text() {
        let answer = "```python\nprint(1)";
        assert_eq!(segments(answer), vec![text(answer)]);
    }
}
