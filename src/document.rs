//! Parsed document value
//!
//! A `Document` is built once per audit and never mutated afterwards.
//! Heading detection is fence-aware so `#` lines inside code blocks are
//! not mistaken for headings.

/// One detected markdown heading
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Heading {
    /// Heading text with the `#` markers stripped
    pub text: String,
    /// Heading level, 1-6
    pub level: u8,
    /// 1-based line number
    pub line: u32,
}

/// Immutable view of the audited document
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub headings: Vec<Heading>,
    pub line_count: usize,
}

impl Document {
    pub fn parse(text: &str) -> Self {
        let mut headings = Vec::new();
        let mut in_fence = false;
        let mut line_count = 0;

        for (idx, line) in text.lines().enumerate() {
            line_count += 1;
            let trimmed = line.trim_start();

            if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                continue;
            }

            if let Some((level, rest)) = split_heading(trimmed) {
                headings.push(Heading {
                    text: rest.trim().to_string(),
                    level,
                    line: (idx + 1) as u32,
                });
            }
        }

        Self {
            text: text.to_string(),
            headings,
            line_count,
        }
    }

    /// Line span of the section opened by `headings[index]`.
    ///
    /// The section runs until the next heading of the same or higher level,
    /// or the end of the document.
    pub fn section_span(&self, index: usize) -> Option<(u32, u32)> {
        let heading = self.headings.get(index)?;
        let end = self
            .headings
            .iter()
            .skip(index + 1)
            .find(|h| h.level <= heading.level)
            .map(|h| h.line.saturating_sub(1))
            .unwrap_or(self.line_count as u32);
        Some((heading.line, end))
    }

    /// Body text of the section opened by `headings[index]`, heading excluded.
    pub fn section_body(&self, index: usize) -> Option<String> {
        let (start, end) = self.section_span(index)?;
        let body: Vec<&str> = self
            .text
            .lines()
            .skip(start as usize) // skip up to and including the heading line
            .take((end as usize).saturating_sub(start as usize))
            .collect();
        Some(body.join("\n"))
    }
}

/// Split an ATX heading line into (level, text). Returns None for non-headings.
fn split_heading(line: &str) -> Option<(u8, &str)> {
    let hashes = line.bytes().take_while(|b| *b == b'#').count();
    if hashes == 0 || hashes > 6 {
        return None;
    }
    let rest = &line[hashes..];
    // "#foo" is a tag, not a heading; "#" alone is noise
    if !rest.starts_with(' ') && !rest.starts_with('\t') {
        return None;
    }
    Some((hashes as u8, rest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_headings_with_levels() {
        let doc = Document::parse("# Title\n\ntext\n\n## Section\n\n### Sub\n");
        assert_eq!(doc.headings.len(), 3);
        assert_eq!(doc.headings[0].text, "Title");
        assert_eq!(doc.headings[0].level, 1);
        assert_eq!(doc.headings[1].text, "Section");
        assert_eq!(doc.headings[1].level, 2);
        assert_eq!(doc.headings[2].line, 7);
    }

    #[test]
    fn ignores_hashes_inside_fences() {
        let doc = Document::parse("## Commands\n```bash\n# comment\nmake build\n```\n");
        assert_eq!(doc.headings.len(), 1);
        assert_eq!(doc.headings[0].text, "Commands");
    }

    #[test]
    fn ignores_hash_without_space() {
        let doc = Document::parse("#hashtag\n# Real\n");
        assert_eq!(doc.headings.len(), 1);
        assert_eq!(doc.headings[0].text, "Real");
    }

    #[test]
    fn counts_lines() {
        let doc = Document::parse("a\nb\nc\n");
        assert_eq!(doc.line_count, 3);
        let empty = Document::parse("");
        assert_eq!(empty.line_count, 0);
    }

    #[test]
    fn section_span_runs_to_next_peer_heading() {
        let doc = Document::parse("## A\none\ntwo\n\n## B\nthree\n");
        assert_eq!(doc.section_span(0), Some((1, 4)));
        assert_eq!(doc.section_span(1), Some((5, 6)));
    }

    #[test]
    fn section_body_excludes_heading() {
        let doc = Document::parse("## A\none\ntwo\n## B\nx\n");
        assert_eq!(doc.section_body(0).unwrap(), "one\ntwo");
    }

    #[test]
    fn malformed_input_never_panics() {
        for input in ["", "######## too deep\n", "```\nunclosed", "#\n##\n", "\u{0}"] {
            let _ = Document::parse(input);
        }
    }
}
