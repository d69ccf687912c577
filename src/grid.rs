//! Grid coordinates and cell assignment.
//!
//! Table lines collapse to one sorted, de-duplicated coordinate list per
//! axis (the mean cross-axis position of each line), with 0 prepended when
//! absent so that every element always has a defining line on its left and
//! above it. Elements are then binned by nearest-coordinate lookup on their
//! bounding-box centers.

use crate::types::{LineOrientation, Rect, Segment, TableDescription};
use serde::Serialize;
use std::collections::BTreeMap;

/// Sorted, strictly increasing grid-line positions along one axis.
/// Always contains 0 as its first element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct GridCoordinates(Vec<i32>);

impl GridCoordinates {
    /// Collapse table lines of one family to their mean positions along the
    /// perpendicular axis: y-midpoints for horizontal lines, x-midpoints for
    /// vertical ones.
    pub fn from_lines(lines: &[Segment], orientation: LineOrientation) -> Self {
        let mut coords: Vec<i32> = lines
            .iter()
            .map(|line| line.mean_coordinate(orientation))
            .collect();
        coords.push(0);
        coords.sort_unstable();
        coords.dedup();
        Self(coords)
    }

    pub fn values(&self) -> &[i32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Index of the grid line bounding `coordinate` from the left/top.
    ///
    /// The entry closest to `coordinate` by absolute signed distance wins,
    /// ties resolving to the lowest index. A non-positive signed distance
    /// (`grid value <= coordinate`) means that entry already is the
    /// enclosing boundary; a positive one means the boundary is the previous
    /// entry. The 0 sentinel guarantees a valid result for any coordinate
    /// >= 0.
    pub fn locate(&self, coordinate: i32) -> usize {
        debug_assert!(coordinate >= 0, "cell lookup for negative coordinate");
        // first entry >= coordinate
        let upper = self.0.partition_point(|&v| v < coordinate);
        let nearest = if upper == 0 {
            0
        } else if upper == self.0.len() {
            upper - 1
        } else {
            let below = coordinate - self.0[upper - 1];
            let above = self.0[upper] - coordinate;
            // on equal distance the lower index wins
            if below <= above {
                upper - 1
            } else {
                upper
            }
        };
        if self.0[nearest] <= coordinate {
            nearest
        } else {
            // nearest line lies to the right/below; its left neighbor bounds
            // the cell. The sentinel keeps this in range for coordinate >= 0.
            nearest.saturating_sub(1)
        }
    }
}

/// Grid cell key: indices into the row and column coordinate lists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

/// Place every element rectangle into the cell containing its center.
///
/// No element is dropped or assigned twice, and insertion order within a
/// cell follows the input order.
pub fn assign_cells(
    elements: &[Rect],
    row_grid: &GridCoordinates,
    col_grid: &GridCoordinates,
) -> BTreeMap<CellIndex, Vec<Rect>> {
    let mut cells: BTreeMap<CellIndex, Vec<Rect>> = BTreeMap::new();
    for rect in elements {
        let center = rect.center();
        let cell = CellIndex {
            row: row_grid.locate(center.y),
            col: col_grid.locate(center.x),
        };
        cells.entry(cell).or_default().push(*rect);
    }
    cells
}

/// Sparse cell-to-elements mapping for one page.
#[derive(Clone, Debug, Default)]
pub struct CellMap {
    cells: BTreeMap<CellIndex, Vec<Rect>>,
}

impl CellMap {
    /// Build both axis grids from a table description and assign all of its
    /// elements.
    pub fn from_description(description: &TableDescription) -> Self {
        let row_grid =
            GridCoordinates::from_lines(&description.horizontal_lines, LineOrientation::Horizontal);
        let col_grid =
            GridCoordinates::from_lines(&description.vertical_lines, LineOrientation::Vertical);
        Self {
            cells: assign_cells(&description.elements, &row_grid, &col_grid),
        }
    }

    pub fn get(&self, cell: CellIndex) -> Option<&[Rect]> {
        self.cells.get(&cell).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CellIndex, &Vec<Rect>)> {
        self.cells.iter()
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn hline(y: i32) -> Segment {
        Segment::new(Point::new(0, y), Point::new(1000, y))
    }

    fn vline(x: i32) -> Segment {
        Segment::new(Point::new(x, 0), Point::new(x, 1000))
    }

    fn rect_centered(x: i32, y: i32) -> Rect {
        Rect::from_corners(Point::new(x - 5, y - 5), Point::new(x + 5, y + 5))
    }

    #[test]
    fn grid_is_sorted_deduplicated_and_zero_anchored() {
        let lines = vec![hline(300), hline(100), hline(300), hline(100)];
        let grid = GridCoordinates::from_lines(&lines, LineOrientation::Horizontal);
        assert_eq!(grid.values(), &[0, 100, 300]);
        assert!(grid.values().windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn zero_line_is_not_duplicated() {
        let lines = vec![hline(0), hline(200)];
        let grid = GridCoordinates::from_lines(&lines, LineOrientation::Horizontal);
        assert_eq!(grid.values(), &[0, 200]);
    }

    #[test]
    fn empty_line_set_yields_the_sentinel_grid() {
        let grid = GridCoordinates::from_lines(&[], LineOrientation::Vertical);
        assert_eq!(grid.values(), &[0]);
        assert_eq!(grid.locate(9999), 0);
    }

    #[test]
    fn locate_returns_the_left_boundary() {
        let grid = GridCoordinates::from_lines(
            &[hline(100), hline(300)],
            LineOrientation::Horizontal,
        );
        // between 100 and 300, closer to 100
        assert_eq!(grid.locate(150), 1);
        // between 100 and 300, closer to 300: shifted back to the left line
        assert_eq!(grid.locate(260), 1);
        // beyond the last line
        assert_eq!(grid.locate(900), 2);
        // before the first real line
        assert_eq!(grid.locate(40), 0);
    }

    #[test]
    fn locate_invariant_grid_value_at_or_left_of_coordinate() {
        let grid = GridCoordinates::from_lines(
            &[hline(37), hline(120), hline(121), hline(500)],
            LineOrientation::Horizontal,
        );
        for c in [0, 1, 36, 37, 38, 120, 121, 200, 310, 311, 499, 500, 501] {
            let i = grid.locate(c);
            assert!(
                grid.values()[i] <= c,
                "locate({c}) = {i}, grid value {}",
                grid.values()[i]
            );
        }
    }

    #[test]
    fn exact_coincidence_keeps_the_matching_line() {
        let grid = GridCoordinates::from_lines(
            &[hline(100), hline(300)],
            LineOrientation::Horizontal,
        );
        // signed distance 0 is "<= 0": no left shift
        assert_eq!(grid.locate(100), 1);
        assert_eq!(grid.locate(300), 2);
        assert_eq!(grid.locate(0), 0);
    }

    #[test]
    fn halfway_tie_resolves_to_the_lower_index() {
        let grid = GridCoordinates::from_lines(
            &[hline(100), hline(300)],
            LineOrientation::Horizontal,
        );
        // 200 is equidistant from 100 and 300; first minimal index wins and
        // its signed distance is negative, so index 1 is returned directly
        assert_eq!(grid.locate(200), 1);
    }

    #[test]
    fn element_lands_in_the_expected_cell() {
        let rows = GridCoordinates::from_lines(
            &[hline(100), hline(300)],
            LineOrientation::Horizontal,
        );
        let cols =
            GridCoordinates::from_lines(&[vline(150), vline(400)], LineOrientation::Vertical);
        let cells = assign_cells(&[rect_centered(200, 150)], &rows, &cols);
        let (cell, rects) = cells.iter().next().unwrap();
        assert_eq!(*cell, CellIndex { row: 1, col: 1 });
        assert_eq!(rects.len(), 1);
    }

    #[test]
    fn element_on_the_grid_lines_resolves_deterministically() {
        let rows = GridCoordinates::from_lines(
            &[hline(100), hline(300)],
            LineOrientation::Horizontal,
        );
        let cols =
            GridCoordinates::from_lines(&[vline(150), vline(400)], LineOrientation::Vertical);
        // centered exactly on the lines at (150, 100): distance 0 keeps the
        // matching indices
        let cells = assign_cells(&[rect_centered(150, 100)], &rows, &cols);
        assert!(cells.contains_key(&CellIndex { row: 1, col: 1 }));
    }

    #[test]
    fn no_element_dropped_and_order_preserved_within_a_cell() {
        let rows = GridCoordinates::from_lines(&[hline(100)], LineOrientation::Horizontal);
        let cols = GridCoordinates::from_lines(&[vline(100)], LineOrientation::Vertical);
        let a = rect_centered(150, 150);
        let b = rect_centered(160, 160);
        let c = rect_centered(20, 20);
        let cells = assign_cells(&[a, b, c], &rows, &cols);
        let total: usize = cells.values().map(Vec::len).sum();
        assert_eq!(total, 3);
        assert_eq!(
            cells.get(&CellIndex { row: 1, col: 1 }).unwrap().as_slice(),
            &[a, b]
        );
        assert_eq!(
            cells.get(&CellIndex { row: 0, col: 0 }).unwrap().as_slice(),
            &[c]
        );
    }

    #[test]
    fn assignment_is_idempotent() {
        let mut description = TableDescription::from_lines(
            vec![hline(100), hline(300)],
            vec![vline(150), vline(400)],
        );
        description.elements = vec![rect_centered(200, 150), rect_centered(20, 20)];
        let first = CellMap::from_description(&description);
        let second = CellMap::from_description(&description);
        let a: Vec<_> = first.iter().collect();
        let b: Vec<_> = second.iter().collect();
        assert_eq!(a, b);
    }

    #[test]
    fn tableless_page_puts_everything_into_the_origin_cell() {
        let mut description = TableDescription::default();
        description.elements = vec![rect_centered(500, 700), rect_centered(10, 10)];
        let cells = CellMap::from_description(&description);
        assert_eq!(cells.len(), 1);
        assert_eq!(
            cells.get(CellIndex { row: 0, col: 0 }).unwrap().len(),
            2
        );
    }

    #[test]
    fn empty_elements_yield_an_empty_map() {
        let description = TableDescription::from_lines(vec![hline(100)], vec![vline(100)]);
        let cells = CellMap::from_description(&description);
        assert!(cells.is_empty());
    }
}
