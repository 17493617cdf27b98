//! LED layouts.
//!
//! A layout is an ordered list of 3D points; pixel `i` of every frame
//! lights the LED at `points[i]`. Layout files are JSON arrays in which
//! each entry carrying a `"point": [x, y, z]` member contributes one
//! point, in file order. Entries without `"point"` are skipped.
//!
//! ```json
//! [
//!   {"point": [0.0, 0.0, 0.0]},
//!   {"point": [0.0, 0.0, 0.1]}
//! ]
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::OpcError;

/// A position in layout space. Units are whatever the layout uses.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point3 {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

impl From<[f64; 3]> for Point3 {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// Axis-aligned bounding box of a layout.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Point3,
    pub max: Point3,
}

impl Bounds {
    /// Extent along each axis.
    pub fn size(&self) -> Point3 {
        Point3::new(
            self.max.x - self.min.x,
            self.max.y - self.min.y,
            self.max.z - self.min.z,
        )
    }
}

#[derive(Deserialize)]
struct LayoutEntry {
    #[serde(default)]
    point: Option<[f64; 3]>,
}

// ── Layout ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Layout {
    points: Vec<Point3>,
}

impl Layout {
    pub fn new(points: Vec<Point3>) -> Self {
        Self { points }
    }

    /// `count` points spaced one unit apart along the x axis, for
    /// driving a strand without a layout file.
    pub fn line(count: usize) -> Self {
        Self::new(
            (0..count)
                .map(|i| Point3::new(i as f64, 0.0, 0.0))
                .collect(),
        )
    }

    /// Parse a JSON layout document.
    pub fn from_json(json: &str) -> Result<Self, OpcError> {
        let entries: Vec<LayoutEntry> = serde_json::from_str(json)?;
        let points = entries
            .into_iter()
            .filter_map(|e| e.point.map(Point3::from))
            .collect();
        Ok(Self { points })
    }

    /// Read and parse a JSON layout file.
    pub fn load(path: &Path) -> Result<Self, OpcError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| OpcError::Layout(format!("{}: {e}", path.display())))?;
        let layout = Self::from_json(&contents)?;
        if layout.is_empty() {
            return Err(OpcError::Layout(format!(
                "{} contains no points",
                path.display()
            )));
        }
        Ok(layout)
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Per-axis minimum and maximum, or `None` for an empty layout.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.points.first()?;
        let bounds = self.points.iter().fold(
            Bounds {
                min: first,
                max: first,
            },
            |b, p| Bounds {
                min: Point3::new(b.min.x.min(p.x), b.min.y.min(p.y), b.min.z.min(p.z)),
                max: Point3::new(b.max.x.max(p.x), b.max.y.max(p.y), b.max.z.max(p.z)),
            },
        );
        Some(bounds)
    }
}

impl From<Vec<Point3>> for Layout {
    fn from(points: Vec<Point3>) -> Self {
        Self::new(points)
    }
}

// ── Tests ────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_points_in_order_and_skips_others() {
        let json = r#"[
            {"point": [1.0, 2.0, 3.0]},
            {"comment": "strand break"},
            {"point": [-1, 0.5, 10]}
        ]"#;
        let layout = Layout::from_json(json).unwrap();
        assert_eq!(
            layout.points(),
            &[Point3::new(1.0, 2.0, 3.0), Point3::new(-1.0, 0.5, 10.0)]
        );
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(matches!(
            Layout::from_json("{\"point\": [1, 2, 3]}"),
            Err(OpcError::Json(_))
        ));
        assert!(Layout::from_json(r#"[{"point": [1, 2]}]"#).is_err());
    }

    #[test]
    fn bounds_cover_all_points() {
        let layout = Layout::new(vec![
            Point3::new(0.0, 5.0, -1.0),
            Point3::new(2.0, -3.0, 4.0),
            Point3::new(1.0, 0.0, 0.0),
        ]);
        let b = layout.bounds().unwrap();
        assert_eq!(b.min, Point3::new(0.0, -3.0, -1.0));
        assert_eq!(b.max, Point3::new(2.0, 5.0, 4.0));
        assert_eq!(b.size(), Point3::new(2.0, 8.0, 5.0));
    }

    #[test]
    fn empty_layout_has_no_bounds() {
        assert!(Layout::default().bounds().is_none());
    }

    #[test]
    fn line_layout() {
        let layout = Layout::line(4);
        assert_eq!(layout.len(), 4);
        assert_eq!(layout.points()[3], Point3::new(3.0, 0.0, 0.0));
    }

    #[test]
    fn load_missing_file_is_layout_error() {
        let err = Layout::load(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(matches!(err, OpcError::Layout(_)));
        assert!(err.to_string().contains("here.json"));
    }
}
