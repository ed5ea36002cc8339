//! Numbering suffix templates for thread chunks

use crate::error::ChunkError;

/// A parsed numbering template such as `"{i}/{n}"` or `"({i} of {n})"`.
///
/// `{i}` renders the 1-based chunk position, `{n}` the total chunk
/// count. Doubled braces escape a literal brace. A template must
/// mention `{i}`; otherwise every chunk would carry the same suffix.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumberingTemplate {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Index,
    Total,
}

impl NumberingTemplate {
    /// Parse a template string.
    pub fn parse(source: &str) -> Result<Self, ChunkError> {
        fn flush(literal: &mut String, segments: &mut Vec<Segment>) {
            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(literal)));
            }
        }

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut chars = source.chars().peekable();

        while let Some(c) = chars.next() {
            match c {
                '{' => match chars.next() {
                    Some('{') => literal.push('{'),
                    Some(p @ ('i' | 'n')) if chars.peek() == Some(&'}') => {
                        chars.next();
                        flush(&mut literal, &mut segments);
                        segments.push(if p == 'i' { Segment::Index } else { Segment::Total });
                    }
                    _ => {
                        return Err(ChunkError::Template(format!(
                            "unknown placeholder in {source:?}, expected {{i}} or {{n}}"
                        )))
                    }
                },
                '}' => match chars.next() {
                    Some('}') => literal.push('}'),
                    _ => {
                        return Err(ChunkError::Template(format!(
                            "unmatched '}}' in {source:?}"
                        )))
                    }
                },
                c => literal.push(c),
            }
        }
        flush(&mut literal, &mut segments);

        if !segments.contains(&Segment::Index) {
            return Err(ChunkError::Template(format!(
                "template {source:?} must contain {{i}}"
            )));
        }
        Ok(Self { segments })
    }

    /// Render the suffix for chunk `index` (1-based) of `total`.
    pub fn render(&self, index: usize, total: usize) -> String {
        let mut out = String::new();
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Index => out.push_str(&index.to_string()),
                Segment::Total => out.push_str(&total.to_string()),
            }
        }
        out
    }

    /// Worst-case rendered width, in characters, for a thread of
    /// `total` chunks. The position never has more digits than the
    /// total, so both placeholders are costed at the total's width.
    pub fn width_for(&self, total: usize) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.chars().count(),
                Segment::Index | Segment::Total => digits(total),
            })
            .sum()
    }
}

impl Default for NumberingTemplate {
    fn default() -> Self {
        Self {
            segments: vec![
                Segment::Index,
                Segment::Literal("/".to_string()),
                Segment::Total,
            ],
        }
    }
}

impl std::str::FromStr for NumberingTemplate {
    type Err = ChunkError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        Self::parse(source)
    }
}

fn digits(mut n: usize) -> usize {
    let mut width = 1;
    while n >= 10 {
        n /= 10;
        width += 1;
    }
    width
}
