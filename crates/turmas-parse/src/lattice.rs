//! Lattice table detection: tables delimited by ruling lines.
//!
//! Edges are snapped to common positions, collinear pieces are joined,
//! crossings become grid points, every grid rectangle with four corners
//! becomes a cell, and cells sharing a side are grouped into tables.

use std::collections::{BTreeMap, HashMap};

use crate::geometry::{BBox, Edge, Orientation};
use crate::interpreter::Glyph;
use crate::text::{WordOptions, extract_words, words_to_text};

/// A detected table cell.
#[derive(Debug, Clone, PartialEq)]
pub struct Cell {
    pub bbox: BBox,
    /// Text inside the cell, `None` if no glyph falls in it.
    pub text: Option<String>,
}

/// A detected table with its cells organized into rows.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub bbox: BBox,
    /// Top-to-bottom rows, each left-to-right.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Rows as plain strings; empty cells become `""`.
    pub fn text_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|c| c.text.clone().unwrap_or_default()).collect())
            .collect()
    }
}

/// Snap nearby parallel edges to aligned positions.
///
/// Horizontal edges are clustered by y within `snap_y_tolerance`, vertical
/// edges by x within `snap_x_tolerance`; each cluster moves to its mean.
pub fn snap_edges(edges: Vec<Edge>, snap_x_tolerance: f64, snap_y_tolerance: f64) -> Vec<Edge> {
    let (mut horizontals, mut verticals): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .partition(|e| e.orientation == Orientation::Horizontal);

    snap_group(
        &mut horizontals,
        snap_y_tolerance,
        |e| e.top,
        |e, v| {
            e.top = v;
            e.bottom = v;
        },
    );
    snap_group(
        &mut verticals,
        snap_x_tolerance,
        |e| e.x0,
        |e, v| {
            e.x0 = v;
            e.x1 = v;
        },
    );

    horizontals.extend(verticals);
    horizontals
}

fn snap_group<F, G>(edges: &mut [Edge], tolerance: f64, key: F, mut set: G)
where
    F: Fn(&Edge) -> f64,
    G: FnMut(&mut Edge, f64),
{
    if edges.is_empty() {
        return;
    }
    edges.sort_by(|a, b| key(a).total_cmp(&key(b)));

    let mut cluster_start = 0;
    for i in 1..=edges.len() {
        let end_of_cluster =
            i == edges.len() || (key(&edges[i]) - key(&edges[cluster_start])).abs() > tolerance;
        if end_of_cluster {
            let sum: f64 = (cluster_start..i).map(|j| key(&edges[j])).sum();
            let mean = sum / (i - cluster_start) as f64;
            for edge in &mut edges[cluster_start..i] {
                set(edge, mean);
            }
            cluster_start = i;
        }
    }
}

/// Merge overlapping or nearly touching collinear segments.
pub fn join_edges(edges: Vec<Edge>, join_x_tolerance: f64, join_y_tolerance: f64) -> Vec<Edge> {
    let (horizontals, verticals): (Vec<Edge>, Vec<Edge>) = edges
        .into_iter()
        .partition(|e| e.orientation == Orientation::Horizontal);

    let mut result = join_collinear(
        horizontals,
        |e| e.top,
        |e| (e.x0, e.x1),
        |proto, start, end| Edge {
            x0: start,
            x1: end,
            ..*proto
        },
        join_x_tolerance,
    );
    result.extend(join_collinear(
        verticals,
        |e| e.x0,
        |e| (e.top, e.bottom),
        |proto, start, end| Edge {
            top: start,
            bottom: end,
            ..*proto
        },
        join_y_tolerance,
    ));
    result
}

fn join_collinear<K, S, B>(mut edges: Vec<Edge>, key: K, span: S, build: B, tolerance: f64) -> Vec<Edge>
where
    K: Fn(&Edge) -> f64,
    S: Fn(&Edge) -> (f64, f64),
    B: Fn(&Edge, f64, f64) -> Edge,
{
    edges.sort_by(|a, b| {
        key(a)
            .total_cmp(&key(b))
            .then_with(|| span(a).0.total_cmp(&span(b).0))
    });

    let mut result = Vec::new();
    let mut i = 0;
    while i < edges.len() {
        let group_key = key(&edges[i]);
        let mut j = i + 1;
        while j < edges.len() && (key(&edges[j]) - group_key).abs() < 1e-9 {
            j += 1;
        }

        let (mut cur_start, mut cur_end) = span(&edges[i]);
        let mut proto_idx = i;
        for k in (i + 1)..j {
            let (s, e) = span(&edges[k]);
            if s <= cur_end + tolerance {
                cur_end = cur_end.max(e);
            } else {
                result.push(build(&edges[proto_idx], cur_start, cur_end));
                cur_start = s;
                cur_end = e;
                proto_idx = k;
            }
        }
        result.push(build(&edges[proto_idx], cur_start, cur_end));
        i = j;
    }
    result
}

/// A crossing between a horizontal and a vertical edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Intersection {
    pub x: f64,
    pub y: f64,
}

/// Find the crossings of horizontal and vertical edges, deduplicated and
/// sorted by x then y.
pub fn edges_to_intersections(edges: &[Edge], x_tolerance: f64, y_tolerance: f64) -> Vec<Intersection> {
    let horizontals = edges.iter().filter(|e| e.orientation == Orientation::Horizontal);
    let verticals: Vec<&Edge> = edges
        .iter()
        .filter(|e| e.orientation == Orientation::Vertical)
        .collect();

    let mut points = Vec::new();
    for h in horizontals {
        for v in &verticals {
            if v.x0 >= h.x0 - x_tolerance
                && v.x0 <= h.x1 + x_tolerance
                && h.top >= v.top - y_tolerance
                && h.top <= v.bottom + y_tolerance
            {
                points.push(Intersection { x: v.x0, y: h.top });
            }
        }
    }

    points.sort_by(|a, b| a.x.total_cmp(&b.x).then_with(|| a.y.total_cmp(&b.y)));
    points.dedup_by(|a, b| (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9);
    points
}

/// Build a cell for every grid rectangle whose four corners all exist.
pub fn intersections_to_cells(points: &[Intersection]) -> Vec<Cell> {
    let mut xs: Vec<f64> = Vec::new();
    let mut ys: Vec<f64> = Vec::new();
    for pt in points {
        if !xs.iter().any(|&x| (x - pt.x).abs() < 1e-9) {
            xs.push(pt.x);
        }
        if !ys.iter().any(|&y| (y - pt.y).abs() < 1e-9) {
            ys.push(pt.y);
        }
    }
    xs.sort_by(f64::total_cmp);
    ys.sort_by(f64::total_cmp);

    let has_point = |x: f64, y: f64| {
        points
            .iter()
            .any(|pt| (pt.x - x).abs() < 1e-9 && (pt.y - y).abs() < 1e-9)
    };

    let mut cells = Vec::new();
    for pair_y in ys.windows(2) {
        for pair_x in xs.windows(2) {
            let (x0, x1, top, bottom) = (pair_x[0], pair_x[1], pair_y[0], pair_y[1]);
            if has_point(x0, top) && has_point(x1, top) && has_point(x0, bottom) && has_point(x1, bottom) {
                cells.push(Cell {
                    bbox: BBox::new(x0, top, x1, bottom),
                    text: None,
                });
            }
        }
    }
    cells
}

fn cells_share_edge(a: &Cell, b: &Cell) -> bool {
    let eps = 1e-6;
    let shared_vertical = ((a.bbox.x1 - b.bbox.x0).abs() < eps || (a.bbox.x0 - b.bbox.x1).abs() < eps)
        && a.bbox.top < b.bbox.bottom + eps
        && b.bbox.top < a.bbox.bottom + eps;
    let shared_horizontal = ((a.bbox.bottom - b.bbox.top).abs() < eps
        || (a.bbox.top - b.bbox.bottom).abs() < eps)
        && a.bbox.x0 < b.bbox.x1 + eps
        && b.bbox.x0 < a.bbox.x1 + eps;
    shared_vertical || shared_horizontal
}

fn float_key(v: f64) -> i64 {
    (v * 1000.0).round() as i64
}

/// Group cells sharing a side into tables (union-find), sorted top to
/// bottom then left to right.
pub fn cells_to_tables(cells: Vec<Cell>) -> Vec<Table> {
    fn find(parent: &mut [usize], mut i: usize) -> usize {
        while parent[i] != i {
            parent[i] = parent[parent[i]];
            i = parent[i];
        }
        i
    }

    let n = cells.len();
    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in (i + 1)..n {
            if cells_share_edge(&cells[i], &cells[j]) {
                let (ri, rj) = (find(&mut parent, i), find(&mut parent, j));
                if ri != rj {
                    parent[rj] = ri;
                }
            }
        }
    }

    let mut groups: HashMap<usize, Vec<Cell>> = HashMap::new();
    for (i, cell) in cells.into_iter().enumerate() {
        let root = find(&mut parent, i);
        groups.entry(root).or_default().push(cell);
    }

    let mut tables: Vec<Table> = groups
        .into_values()
        .filter_map(|group| {
            let bbox = group
                .iter()
                .map(|c| c.bbox)
                .reduce(|acc, b| acc.union(&b))?;
            let mut row_map: BTreeMap<i64, Vec<Cell>> = BTreeMap::new();
            for cell in group {
                row_map.entry(float_key(cell.bbox.top)).or_default().push(cell);
            }
            let rows = row_map
                .into_values()
                .map(|mut row| {
                    row.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
                    row
                })
                .collect();
            Some(Table { bbox, rows })
        })
        .collect();

    tables.sort_by(|a, b| {
        a.bbox
            .top
            .total_cmp(&b.bbox.top)
            .then_with(|| a.bbox.x0.total_cmp(&b.bbox.x0))
    });
    tables
}

/// Fill each cell with the glyphs whose centre lies inside it.
///
/// Words within a line are joined with spaces, lines with newlines.
pub fn extract_text_for_cells(cells: &mut [Cell], glyphs: &[Glyph], options: &WordOptions) {
    for cell in cells.iter_mut() {
        let inside: Vec<Glyph> = glyphs
            .iter()
            .filter(|g| {
                let (cx, cy) = g.bbox.center();
                cell.bbox.contains(cx, cy)
            })
            .cloned()
            .collect();
        let words = extract_words(&inside, options);
        cell.text = if words.is_empty() {
            None
        } else {
            Some(words_to_text(&words, options))
        };
    }
}

/// Tolerances for lattice detection. All default to 3.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatticeSettings {
    pub snap_tolerance: f64,
    pub join_tolerance: f64,
    pub intersection_tolerance: f64,
    /// Edges shorter than this are ignored.
    pub edge_min_length: f64,
}

impl Default for LatticeSettings {
    fn default() -> Self {
        Self {
            snap_tolerance: 3.0,
            join_tolerance: 3.0,
            intersection_tolerance: 3.0,
            edge_min_length: 3.0,
        }
    }
}

/// Run the whole lattice pipeline over one page.
pub fn find_tables(
    edges: &[Edge],
    glyphs: &[Glyph],
    settings: &LatticeSettings,
    words: &WordOptions,
) -> Vec<Table> {
    let edges: Vec<Edge> = edges
        .iter()
        .copied()
        .filter(|e| e.length() >= settings.edge_min_length)
        .collect();
    let edges = snap_edges(edges, settings.snap_tolerance, settings.snap_tolerance);
    let edges = join_edges(edges, settings.join_tolerance, settings.join_tolerance);
    let edges: Vec<Edge> = edges
        .into_iter()
        .filter(|e| e.length() >= settings.edge_min_length)
        .collect();

    let points = edges_to_intersections(
        &edges,
        settings.intersection_tolerance,
        settings.intersection_tolerance,
    );
    let mut cells = intersections_to_cells(&points);
    extract_text_for_cells(&mut cells, glyphs, words);
    cells_to_tables(cells)
}
