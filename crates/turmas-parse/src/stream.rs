//! Stream table detection: tables inferred from text alignment alone.
//!
//! Words on a line are first merged into phrases (runs separated by a
//! normal inter-word space). Phrase left edges that line up on at least
//! `min_words_vertical` lines become column anchors. The table region runs
//! from the first to the last line with at least `min_columns` phrases, so
//! page headers and footers stay out while wrapped continuation lines
//! between records stay in.

use crate::geometry::BBox;
use crate::text::{Word, group_lines};

/// Tolerances for stream detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamSettings {
    /// Maximum gap between words of the same phrase.
    pub phrase_gap: f64,
    /// Maximum distance between left edges sharing a column anchor.
    pub text_x_tolerance: f64,
    /// Maximum vertical offset between words of the same line.
    pub text_y_tolerance: f64,
    /// Lines that must share an anchor for it to become a column.
    pub min_words_vertical: usize,
    /// Phrases a line needs to delimit the table region.
    pub min_columns: usize,
}

impl Default for StreamSettings {
    fn default() -> Self {
        Self {
            phrase_gap: 6.0,
            text_x_tolerance: 3.0,
            text_y_tolerance: 3.0,
            min_words_vertical: 3,
            min_columns: 3,
        }
    }
}

#[derive(Debug, Clone)]
struct Phrase {
    text: String,
    bbox: BBox,
}

fn line_phrases(line: &[&Word], phrase_gap: f64) -> Vec<Phrase> {
    let mut phrases: Vec<Phrase> = Vec::new();
    for word in line {
        match phrases.last_mut() {
            Some(p) if word.bbox.x0 - p.bbox.x1 <= phrase_gap => {
                p.text.push(' ');
                p.text.push_str(&word.text);
                p.bbox = p.bbox.union(&word.bbox);
            }
            _ => phrases.push(Phrase {
                text: word.text.clone(),
                bbox: word.bbox,
            }),
        }
    }
    phrases
}

/// Cluster left edges; keep cluster means with at least `min_count` members.
fn column_anchors(mut xs: Vec<f64>, tolerance: f64, min_count: usize) -> Vec<f64> {
    xs.sort_by(f64::total_cmp);
    let mut anchors = Vec::new();
    let mut start = 0;
    for i in 1..=xs.len() {
        if i == xs.len() || xs[i] - xs[start] > tolerance {
            let cluster = &xs[start..i];
            if cluster.len() >= min_count {
                anchors.push(cluster.iter().sum::<f64>() / cluster.len() as f64);
            }
            start = i;
        }
    }
    anchors
}

/// Detect at most one table among the words of a page.
///
/// Returns the table rows, every row padded to the column count, or
/// `None` when no region or no column could be found.
pub fn find_table(words: &[Word], settings: &StreamSettings) -> Option<Vec<Vec<String>>> {
    let lines: Vec<Vec<Phrase>> = group_lines(words, settings.text_y_tolerance)
        .iter()
        .map(|line| line_phrases(line, settings.phrase_gap))
        .collect();

    let first = lines.iter().position(|l| l.len() >= settings.min_columns)?;
    let last = lines.iter().rposition(|l| l.len() >= settings.min_columns)?;
    let region = &lines[first..=last];

    let lefts: Vec<f64> = region.iter().flatten().map(|p| p.bbox.x0).collect();
    let anchors = column_anchors(lefts, settings.text_x_tolerance, settings.min_words_vertical);
    if anchors.is_empty() {
        return None;
    }

    let rows = region
        .iter()
        .map(|line| {
            let mut row = vec![String::new(); anchors.len()];
            for phrase in line {
                let col = anchors
                    .iter()
                    .rposition(|&a| a <= phrase.bbox.x0 + settings.text_x_tolerance)
                    .unwrap_or(0);
                if !row[col].is_empty() {
                    row[col].push(' ');
                }
                row[col].push_str(&phrase.text);
            }
            row
        })
        .collect();
    Some(rows)
}
