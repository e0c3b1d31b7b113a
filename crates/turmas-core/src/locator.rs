//! Class ("turma") identification from page text.
//!
//! Class identifiers look like `1ºIV01-EM`: grade, ordinal indicator, a
//! two-letter shift code, a two-digit sequence and a level suffix. Reports
//! usually print them after a `Turma:` label, but the bare value also shows
//! up in page headers.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::roster::UNIDENTIFIED_CLASS;

fn labeled_typical_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Turma:\s*(\d+[ªº][A-Z]{2}\d{2}-[A-Z]+)").expect("class pattern is valid")
    })
}

fn labeled_any_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(?i)Turma:\s*([^\s,;]+(?:-[A-Z]+)?)").expect("class pattern is valid")
    })
}

fn bare_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\d+[ªº][A-Z]{2}\d{2}-[A-Z]+").expect("class pattern is valid"))
}

/// How a marker was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Preceded by a `Turma:` label.
    Labeled,
    /// The identifier pattern on its own.
    Bare,
}

/// One class identifier occurrence in a text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassMarker {
    /// Byte offset of the occurrence in the searched text.
    pub position: usize,
    pub name: String,
    pub kind: MarkerKind,
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// Find every class marker in `text`, sorted by position.
///
/// Patterns are tried from most to least specific; a match that overlaps
/// one already accepted is dropped, so a labeled identifier is reported
/// once as [`MarkerKind::Labeled`]. Distinct occurrences are all kept.
pub fn find_class_markers(text: &str) -> Vec<ClassMarker> {
    let mut accepted: Vec<(std::ops::Range<usize>, ClassMarker)> = Vec::new();

    let mut accept = |span: std::ops::Range<usize>, name: &str, kind: MarkerKind| {
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        let overlaps = accepted
            .iter()
            .any(|(other, _)| span.start < other.end && other.start < span.end);
        if !overlaps {
            accepted.push((
                span.clone(),
                ClassMarker {
                    position: span.start,
                    name: name.to_string(),
                    kind,
                },
            ));
        }
    };

    for re in [labeled_typical_re(), labeled_any_re()] {
        for caps in re.captures_iter(text) {
            if let (Some(whole), Some(value)) = (caps.get(0), caps.get(1)) {
                accept(whole.range(), value.as_str(), MarkerKind::Labeled);
            }
        }
    }

    for m in bare_re().find_iter(text) {
        let before = text[..m.start()].chars().next_back();
        let after = text[m.end()..].chars().next();
        if before.is_some_and(is_word_char) || after.is_some_and(is_word_char) {
            continue;
        }
        accept(m.range(), m.as_str(), MarkerKind::Bare);
    }

    let mut markers: Vec<ClassMarker> = accepted.into_iter().map(|(_, m)| m).collect();
    markers.sort_by_key(|m| m.position);
    markers
}

/// Index markers by page; pages without any marker are absent.
pub fn find_class_markers_by_page<S: AsRef<str>>(pages: &[S]) -> BTreeMap<usize, Vec<ClassMarker>> {
    pages
        .iter()
        .enumerate()
        .filter_map(|(idx, text)| {
            let markers = find_class_markers(text.as_ref());
            (!markers.is_empty()).then_some((idx, markers))
        })
        .collect()
}

/// The class a text belongs to: its first labeled marker, else its first
/// bare one, else [`UNIDENTIFIED_CLASS`].
pub fn class_from_text(text: &str) -> String {
    let markers = find_class_markers(text);
    markers
        .iter()
        .find(|m| m.kind == MarkerKind::Labeled)
        .or_else(|| markers.first())
        .map(|m| m.name.clone())
        .unwrap_or_else(|| UNIDENTIFIED_CLASS.to_string())
}

/// How confidently a table was bound to its class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Binding {
    /// The table's page is known and carries a marker.
    Exact,
    /// The page was guessed from the table index.
    Estimated,
    /// No marker on the page; the previous table's class was kept.
    Carried,
    /// No marker seen yet.
    Unidentified,
}

/// Result of [`class_for_table`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableClass {
    pub name: String,
    pub binding: Binding,
}

/// Where a table sits in the document, as far as the extractor knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TablePosition {
    /// Index of the table in extraction order.
    pub index: usize,
    /// Page the table was found on, if reported.
    pub page: Option<usize>,
    /// Index of the table among the tables of its page.
    pub ordinal_on_page: usize,
}

/// Bind a table to a class.
///
/// With a known page, the table takes the marker matching its ordinal on
/// that page (the last one if there are more tables than markers). Without
/// a page, the page is estimated as `min(index, page_count - 1)`. A page
/// without markers keeps `previous`; before any marker the sentinel is used.
pub fn class_for_table(
    position: TablePosition,
    markers_by_page: &BTreeMap<usize, Vec<ClassMarker>>,
    page_count: usize,
    previous: Option<&str>,
) -> TableClass {
    let (page, binding, ordinal) = match position.page {
        Some(page) => (page, Binding::Exact, position.ordinal_on_page),
        None => (
            position.index.min(page_count.saturating_sub(1)),
            Binding::Estimated,
            0,
        ),
    };

    let mut names: Vec<&str> = Vec::new();
    for marker in markers_by_page.get(&page).into_iter().flatten() {
        if names.last() != Some(&marker.name.as_str()) {
            names.push(&marker.name);
        }
    }

    if let Some(name) = names.get(ordinal).or(names.last()) {
        return TableClass {
            name: (*name).to_string(),
            binding,
        };
    }

    match previous {
        Some(name) => TableClass {
            name: name.to_string(),
            binding: Binding::Carried,
        },
        None => TableClass {
            name: UNIDENTIFIED_CLASS.to_string(),
            binding: Binding::Unidentified,
        },
    }
}
