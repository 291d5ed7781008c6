//! Pixel to cell mapping and placement validation.

use path_defence_core::{
    CellCoord, PlacementError, WorldPoint, GRID_COLUMNS, GRID_ROWS, GRID_SIZE,
};

use crate::path::Path;

/// Maps a point in world units onto the cell that contains it.
///
/// Division floors, so points left of or above the canvas land on negative
/// cells instead of folding onto column or row zero.
#[must_use]
pub fn to_grid_cell(pixel_x: f32, pixel_y: f32) -> CellCoord {
    let size = GRID_SIZE as f32;
    CellCoord::new(
        (pixel_x / size).floor() as i32,
        (pixel_y / size).floor() as i32,
    )
}

/// Reports whether the cell lies on the playable grid above the UI strip.
#[must_use]
pub fn is_within_bounds(cell: CellCoord) -> bool {
    (0..GRID_COLUMNS).contains(&cell.column()) && (0..GRID_ROWS).contains(&cell.row())
}

/// Reports whether any path segment crosses the cell's rectangle.
#[must_use]
pub fn cell_intersects_path(cell: CellCoord, path: &Path) -> bool {
    path.segments()
        .any(|(start, end)| cell_intersects_segment(cell, start, end))
}

/// Checks a cell against bounds, the path and existing towers, in that order.
///
/// Returns the first failed condition.
pub fn validate_placement<I>(cell: CellCoord, path: &Path, occupied: I) -> Result<(), PlacementError>
where
    I: IntoIterator<Item = CellCoord>,
{
    if !is_within_bounds(cell) {
        return Err(PlacementError::OutOfBounds);
    }

    if cell_intersects_path(cell, path) {
        return Err(PlacementError::OnPath);
    }

    if occupied.into_iter().any(|taken| taken == cell) {
        return Err(PlacementError::Occupied);
    }

    Ok(())
}

/// Boolean form of [`validate_placement`].
#[must_use]
pub fn is_valid_placement<I>(cell: CellCoord, path: &Path, occupied: I) -> bool
where
    I: IntoIterator<Item = CellCoord>,
{
    validate_placement(cell, path, occupied).is_ok()
}

// Liang-Barsky clip against the cell rectangle. The rectangle covers the
// pixels `origin..=origin + GRID_SIZE - 1` on both axes so neighbouring cells
// never share an edge.
fn cell_intersects_segment(cell: CellCoord, start: WorldPoint, end: WorldPoint) -> bool {
    let origin = cell.origin();
    let extent = (GRID_SIZE - 1) as f32;
    let (min_x, max_x) = (origin.x, origin.x + extent);
    let (min_y, max_y) = (origin.y, origin.y + extent);

    let dx = end.x - start.x;
    let dy = end.y - start.y;
    let edges = [
        (-dx, start.x - min_x),
        (dx, max_x - start.x),
        (-dy, start.y - min_y),
        (dy, max_y - start.y),
    ];

    let mut entry = 0.0_f32;
    let mut exit = 1.0_f32;
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return false;
            }
            continue;
        }

        let ratio = q / p;
        if p < 0.0 {
            if ratio > exit {
                return false;
            }
            entry = entry.max(ratio);
        } else {
            if ratio < entry {
                return false;
            }
            exit = exit.min(ratio);
        }
    }

    entry <= exit
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_pixels_with_floor_division() {
        assert_eq!(to_grid_cell(0.0, 0.0), CellCoord::new(0, 0));
        assert_eq!(to_grid_cell(39.9, 40.0), CellCoord::new(0, 1));
        assert_eq!(to_grid_cell(799.0, 599.0), CellCoord::new(19, 14));
        assert_eq!(to_grid_cell(-1.0, -41.0), CellCoord::new(-1, -2));
    }

    #[test]
    fn bounds_exclude_ui_strip() {
        assert!(is_within_bounds(CellCoord::new(0, 0)));
        assert!(is_within_bounds(CellCoord::new(19, 14)));
        assert!(!is_within_bounds(CellCoord::new(20, 0)));
        assert!(!is_within_bounds(CellCoord::new(0, 15)));
        assert!(!is_within_bounds(CellCoord::new(-1, 3)));
    }

    #[test]
    fn detects_cells_under_every_segment() {
        let path = Path::default_route();
        for cell in [
            CellCoord::new(1, 1),
            CellCoord::new(10, 1),
            CellCoord::new(18, 7),
            CellCoord::new(9, 13),
            CellCoord::new(1, 10),
            CellCoord::new(10, 7),
        ] {
            assert!(cell_intersects_path(cell, &path), "{cell:?} should be on the path");
        }
    }

    #[test]
    fn cells_beside_the_path_are_clear() {
        let path = Path::default_route();
        for cell in [
            CellCoord::new(0, 0),
            CellCoord::new(5, 2),
            CellCoord::new(17, 3),
            CellCoord::new(11, 7),
            CellCoord::new(19, 14),
        ] {
            assert!(!cell_intersects_path(cell, &path), "{cell:?} should be clear");
        }
    }

    #[test]
    fn segment_ending_on_cell_edge_counts_as_crossing() {
        let path = Path::new(vec![WorldPoint::new(0.0, 100.0), WorldPoint::new(80.0, 100.0)])
            .expect("valid path");
        assert!(cell_intersects_path(CellCoord::new(2, 2), &path));
        assert!(!cell_intersects_path(CellCoord::new(3, 2), &path));
    }

    #[test]
    fn diagonal_segment_missing_the_corner_is_clear() {
        let path = Path::new(vec![WorldPoint::new(0.0, 30.0), WorldPoint::new(30.0, 0.0)])
            .expect("valid path");
        assert!(cell_intersects_path(CellCoord::new(0, 0), &path));
        let far = Path::new(vec![WorldPoint::new(85.0, 130.0), WorldPoint::new(130.0, 85.0)])
            .expect("valid path");
        assert!(!cell_intersects_path(CellCoord::new(1, 1), &far));
    }

    #[test]
    fn validation_reports_first_failure() {
        let path = Path::default_route();
        assert_eq!(
            validate_placement(CellCoord::new(25, 1), &path, Vec::new()),
            Err(PlacementError::OutOfBounds)
        );
        assert_eq!(
            validate_placement(CellCoord::new(1, 1), &path, [CellCoord::new(1, 1)]),
            Err(PlacementError::OnPath)
        );
        assert_eq!(
            validate_placement(CellCoord::new(5, 2), &path, [CellCoord::new(5, 2)]),
            Err(PlacementError::Occupied)
        );
        assert!(is_valid_placement(CellCoord::new(5, 2), &path, [CellCoord::new(6, 2)]));
    }
}
