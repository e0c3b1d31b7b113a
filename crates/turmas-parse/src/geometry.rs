//! Page geometry: bounding boxes, ruling edges and transformation matrices.

/// Bounding box with top-left origin coordinate system.
///
/// - `x0`: left edge
/// - `top`: top edge (distance from top of page)
/// - `x1`: right edge
/// - `bottom`: bottom edge (distance from top of page)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
}

impl BBox {
    pub fn new(x0: f64, top: f64, x1: f64, bottom: f64) -> Self {
        Self {
            x0,
            top,
            x1,
            bottom,
        }
    }

    /// Width of the bounding box.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// Height of the bounding box.
    pub fn height(&self) -> f64 {
        self.bottom - self.top
    }

    /// Compute the union of two bounding boxes.
    pub fn union(&self, other: &BBox) -> BBox {
        BBox {
            x0: self.x0.min(other.x0),
            top: self.top.min(other.top),
            x1: self.x1.max(other.x1),
            bottom: self.bottom.max(other.bottom),
        }
    }

    pub fn center(&self) -> (f64, f64) {
        ((self.x0 + self.x1) / 2.0, (self.top + self.bottom) / 2.0)
    }

    /// Inclusive point containment.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.top && y <= self.bottom
    }
}

/// Orientation of a ruling edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

/// An axis-aligned ruling segment in top-left page coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Edge {
    pub x0: f64,
    pub top: f64,
    pub x1: f64,
    pub bottom: f64,
    pub orientation: Orientation,
}

impl Edge {
    /// Build an edge from a segment; `None` if it is neither horizontal nor
    /// vertical within `tolerance`.
    pub fn from_segment(a: (f64, f64), b: (f64, f64), tolerance: f64) -> Option<Edge> {
        let (x0, x1) = (a.0.min(b.0), a.0.max(b.0));
        let (top, bottom) = (a.1.min(b.1), a.1.max(b.1));
        if bottom - top <= tolerance {
            let y = (top + bottom) / 2.0;
            Some(Edge {
                x0,
                top: y,
                x1,
                bottom: y,
                orientation: Orientation::Horizontal,
            })
        } else if x1 - x0 <= tolerance {
            let x = (x0 + x1) / 2.0;
            Some(Edge {
                x0: x,
                top,
                x1: x,
                bottom,
                orientation: Orientation::Vertical,
            })
        } else {
            None
        }
    }

    /// Length along the edge's own axis.
    pub fn length(&self) -> f64 {
        match self.orientation {
            Orientation::Horizontal => self.x1 - self.x0,
            Orientation::Vertical => self.bottom - self.top,
        }
    }
}

/// Affine transformation matrix `[a b c d e f]` as used by PDF operators.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ctm {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Ctm {
    fn default() -> Self {
        Self::identity()
    }
}

impl Ctm {
    pub fn new(a: f64, b: f64, c: f64, d: f64, e: f64, f: f64) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub fn translation(tx: f64, ty: f64) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    /// `self × other`: apply `self` first, then `other`.
    pub fn concat(&self, other: &Ctm) -> Ctm {
        Ctm {
            a: self.a * other.a + self.b * other.c,
            b: self.a * other.b + self.b * other.d,
            c: self.c * other.a + self.d * other.c,
            d: self.c * other.b + self.d * other.d,
            e: self.e * other.a + self.f * other.c + other.e,
            f: self.e * other.b + self.f * other.d + other.f,
        }
    }

    pub fn transform_point(&self, x: f64, y: f64) -> (f64, f64) {
        (
            self.a * x + self.c * y + self.e,
            self.b * x + self.d * y + self.f,
        )
    }

    /// Vertical scale factor, used to turn a font size into rendered height.
    pub fn vertical_scale(&self) -> f64 {
        (self.c * self.c + self.d * self.d).sqrt()
    }

    /// Horizontal scale factor.
    pub fn horizontal_scale(&self) -> f64 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_dimensions() {
        let bbox = BBox::new(10.0, 20.0, 50.0, 60.0);
        assert_eq!(bbox.width(), 40.0);
        assert_eq!(bbox.height(), 40.0);
        assert_eq!(bbox.center(), (30.0, 40.0));
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new(10.0, 20.0, 30.0, 40.0);
        let b = BBox::new(5.0, 25.0, 35.0, 45.0);
        assert_eq!(a.union(&b), BBox::new(5.0, 20.0, 35.0, 45.0));
    }

    #[test]
    fn test_bbox_contains_is_inclusive() {
        let bbox = BBox::new(0.0, 0.0, 10.0, 10.0);
        assert!(bbox.contains(10.0, 0.0));
        assert!(!bbox.contains(10.1, 5.0));
    }

    #[test]
    fn test_edge_from_horizontal_segment() {
        let edge = Edge::from_segment((300.0, 100.0), (100.0, 100.2), 0.5).unwrap();
        assert_eq!(edge.orientation, Orientation::Horizontal);
        assert_eq!(edge.x0, 100.0);
        assert_eq!(edge.x1, 300.0);
        assert!((edge.length() - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_edge_from_vertical_segment() {
        let edge = Edge::from_segment((50.0, 10.0), (50.0, 90.0), 0.5).unwrap();
        assert_eq!(edge.orientation, Orientation::Vertical);
        assert_eq!(edge.top, 10.0);
        assert_eq!(edge.bottom, 90.0);
    }

    #[test]
    fn test_edge_rejects_diagonal() {
        assert!(Edge::from_segment((0.0, 0.0), (10.0, 10.0), 0.5).is_none());
    }

    #[test]
    fn test_ctm_concat_translation_then_scale() {
        let t = Ctm::translation(10.0, 20.0);
        let s = Ctm::new(2.0, 0.0, 0.0, 2.0, 0.0, 0.0);
        let m = t.concat(&s);
        assert_eq!(m.transform_point(0.0, 0.0), (20.0, 40.0));
        assert_eq!(m.vertical_scale(), 2.0);
    }

    #[test]
    fn test_ctm_identity_default() {
        assert_eq!(Ctm::default(), Ctm::identity());
        assert_eq!(Ctm::identity().transform_point(3.0, 4.0), (3.0, 4.0));
    }
}
