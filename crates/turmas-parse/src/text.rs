//! Grouping glyphs into words and text lines.

use crate::geometry::BBox;
use crate::interpreter::Glyph;

/// Tolerances for word and line grouping.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WordOptions {
    /// Maximum horizontal gap between glyphs of the same word.
    pub x_tolerance: f64,
    /// Maximum vertical offset between glyphs of the same word or line.
    pub y_tolerance: f64,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
        }
    }
}

/// A run of glyphs without whitespace or large gaps.
#[derive(Debug, Clone, PartialEq)]
pub struct Word {
    pub text: String,
    pub bbox: BBox,
}

/// Group glyphs into words, in drawing order.
///
/// A word ends at whitespace, at a horizontal gap wider than
/// `x_tolerance`, when the baseline moves by more than `y_tolerance`, or
/// when the pen jumps backwards.
pub fn extract_words(glyphs: &[Glyph], options: &WordOptions) -> Vec<Word> {
    let mut words = Vec::new();
    let mut current: Option<Word> = None;

    for glyph in glyphs {
        if glyph.ch.is_whitespace() {
            words.extend(current.take());
            continue;
        }

        let continues = current.as_ref().is_some_and(|w| {
            let gap = glyph.bbox.x0 - w.bbox.x1;
            gap <= options.x_tolerance
                && gap >= -options.x_tolerance
                && (glyph.bbox.top - w.bbox.top).abs() <= options.y_tolerance
        });

        match current.as_mut() {
            Some(word) if continues => {
                word.text.push(glyph.ch);
                word.bbox = word.bbox.union(&glyph.bbox);
            }
            _ => {
                words.extend(current.take());
                current = Some(Word {
                    text: glyph.ch.to_string(),
                    bbox: glyph.bbox,
                });
            }
        }
    }
    words.extend(current);
    words
}

/// Cluster words into lines (top to bottom), each sorted left to right.
pub fn group_lines<'a>(words: &'a [Word], y_tolerance: f64) -> Vec<Vec<&'a Word>> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });

    let mut lines: Vec<Vec<&Word>> = Vec::new();
    for word in sorted {
        match lines.last_mut() {
            Some(line) if (word.bbox.top - line[0].bbox.top).abs() <= y_tolerance => line.push(word),
            _ => lines.push(vec![word]),
        }
    }
    for line in &mut lines {
        line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    lines
}

/// Plain text of a set of words: spaces within a line, newlines between lines.
pub fn words_to_text(words: &[Word], options: &WordOptions) -> String {
    group_lines(words, options.y_tolerance)
        .iter()
        .map(|line| {
            line.iter()
                .map(|w| w.text.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
