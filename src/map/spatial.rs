use std::collections::HashMap;

use glam::DVec2;

use crate::shape::Bounds;

/// Bounding-box grid over district extents.
/// Each district index is stored in every cell its bbox overlaps, so a query
/// never misses a district; it may return extras, which callers filter with
/// an exact test.
pub struct FeatureGrid {
    cells: HashMap<(i32, i32), Vec<usize>>,
    cell_size: f64,
    /// Union of every indexed bbox; box queries are clamped to it
    extent: Option<Bounds>,
}

impl FeatureGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cells: HashMap::new(),
            cell_size,
            extent: None,
        }
    }

    #[inline(always)]
    fn to_cell(&self, p: DVec2) -> (i32, i32) {
        let c = (p / self.cell_size).floor();
        (c.x as i32, c.y as i32)
    }

    /// Build from per-feature bounds; `None` entries are not indexed
    pub fn build<'a>(bounds: impl Iterator<Item = Option<&'a Bounds>>, cell_size: f64) -> Self {
        let mut grid = Self::new(cell_size);
        for (idx, b) in bounds.enumerate() {
            let Some(b) = b else { continue };
            grid.extent = Some(grid.extent.map_or(*b, |e| e.union(*b)));
            let (min_x, min_y) = grid.to_cell(b.min);
            let (max_x, max_y) = grid.to_cell(b.max);
            for y in min_y..=max_y {
                for x in min_x..=max_x {
                    grid.cells.entry((x, y)).or_default().push(idx);
                }
            }
        }
        grid
    }

    /// Candidate features whose bbox cell contains the point, in index order
    pub fn query_point(&self, p: DVec2) -> &[usize] {
        self.cells
            .get(&self.to_cell(p))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Inclusive cell range covering the part of `b` that overlaps the
    /// indexed extent. `None` when they are disjoint.
    fn cell_range(&self, b: &Bounds) -> Option<((i32, i32), (i32, i32))> {
        let extent = self.extent?;
        let min = b.min.max(extent.min);
        let max = b.max.min(extent.max);
        if min.x > max.x || min.y > max.y {
            return None;
        }
        Some((self.to_cell(min), self.to_cell(max)))
    }

    /// Candidate features overlapping a box, sorted and deduplicated
    pub fn query_bounds(&self, b: &Bounds) -> Vec<usize> {
        let Some(((min_x, min_y), (max_x, max_y))) = self.cell_range(b) else {
            return Vec::new();
        };
        let mut results = Vec::new();
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                if let Some(indices) = self.cells.get(&(x, y)) {
                    results.extend_from_slice(indices);
                }
            }
        }
        results.sort_unstable();
        results.dedup();
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bbox(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds {
        Bounds {
            min: DVec2::new(x0, y0),
            max: DVec2::new(x1, y1),
        }
    }

    #[test]
    fn test_point_query() {
        let boxes = [Some(bbox(0.0, 0.0, 1.0, 1.0)), None, Some(bbox(0.5, 0.5, 3.0, 3.0))];
        let grid = FeatureGrid::build(boxes.iter().map(Option::as_ref), 0.5);
        assert_eq!(grid.query_point(DVec2::new(0.7, 0.7)), &[0, 2]);
        assert_eq!(grid.query_point(DVec2::new(2.7, 2.7)), &[2]);
        assert!(grid.query_point(DVec2::new(-5.0, -5.0)).is_empty());
    }

    #[test]
    fn test_bounds_query_dedups() {
        let boxes = [Some(bbox(0.0, 0.0, 4.0, 4.0))];
        let grid = FeatureGrid::build(boxes.iter().map(Option::as_ref), 1.0);
        assert_eq!(grid.query_bounds(&bbox(0.0, 0.0, 3.0, 3.0)), vec![0]);
        assert!(grid.query_bounds(&bbox(10.0, 10.0, 11.0, 11.0)).is_empty());
    }

    #[test]
    fn test_world_query_stays_within_extent() {
        // District-sized boxes on a fine grid, queried with a zoomed-out view
        let boxes = [
            Some(bbox(78.0, 11.5, 78.5, 12.0)),
            Some(bbox(77.3, 11.2, 77.8, 11.7)),
            None,
            Some(bbox(77.8, 9.8, 78.2, 10.2)),
        ];
        let grid = FeatureGrid::build(boxes.iter().map(Option::as_ref), 0.25);
        let world = bbox(-281.0, -87.0, 438.0, 89.0);

        let ((min_x, min_y), (max_x, max_y)) = grid.cell_range(&world).unwrap();
        let walked = (max_x - min_x + 1) as usize * (max_y - min_y + 1) as usize;
        assert!(walked <= 9 * 10, "walked {walked} cells");
        assert_eq!(grid.query_bounds(&world), vec![0, 1, 3]);
    }

    #[test]
    fn test_query_outside_extent_is_empty() {
        let boxes = [Some(bbox(0.0, 0.0, 1.0, 1.0))];
        let grid = FeatureGrid::build(boxes.iter().map(Option::as_ref), 0.25);
        assert!(grid.cell_range(&bbox(5.0, 5.0, 6.0, 6.0)).is_none());
        assert!(grid.query_bounds(&bbox(-3.0, 2.0, 3.0, 4.0)).is_empty());
        // Partial overlap still finds the feature
        assert_eq!(grid.query_bounds(&bbox(0.9, 0.9, 50.0, 50.0)), vec![0]);

        let empty = FeatureGrid::build(std::iter::empty::<Option<&Bounds>>(), 0.25);
        assert!(empty.query_bounds(&bbox(-180.0, -85.0, 180.0, 85.0)).is_empty());
    }
}
