//! Pure geometric helpers: rectangle filtering by side length, line-point
//! interpolation and the least-squares line fit used by the merging stage.

use crate::error::{DetectError, Result};
use crate::types::Rect;
use nalgebra::{Matrix2, SymmetricEigen};
use serde::{Deserialize, Serialize};

/// Optional per-axis side-length bounds for [`filter_rectangles`].
///
/// An unset bound applies no filtering on that side, so the default value
/// makes the filter the identity.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct RectBounds {
    pub horizontal_max: Option<i32>,
    pub horizontal_min: Option<i32>,
    pub vertical_max: Option<i32>,
    pub vertical_min: Option<i32>,
}

impl RectBounds {
    /// Keep only rectangles at least `min` pixels wide.
    pub fn horizontal_min(min: i32) -> Self {
        Self {
            horizontal_min: Some(min),
            ..Self::default()
        }
    }

    /// Keep only rectangles at least `min` pixels tall.
    pub fn vertical_min(min: i32) -> Self {
        Self {
            vertical_min: Some(min),
            ..Self::default()
        }
    }

    fn accepts(&self, rect: &Rect) -> bool {
        let w = rect.width();
        let h = rect.height();
        if self.horizontal_max.is_some_and(|b| w > b) {
            return false;
        }
        if self.horizontal_min.is_some_and(|b| w < b) {
            return false;
        }
        if self.vertical_max.is_some_and(|b| h > b) {
            return false;
        }
        if self.vertical_min.is_some_and(|b| h < b) {
            return false;
        }
        true
    }
}

/// Keep the rectangles whose horizontal and vertical extents fall within the
/// given bounds. Order is preserved; an input with no match yields an empty
/// output rather than an error.
pub fn filter_rectangles(rects: &[Rect], bounds: &RectBounds) -> Vec<Rect> {
    rects.iter().copied().filter(|r| bounds.accepts(r)).collect()
}

/// Line in slope-and-point form: direction `(dx, dy)` through `(x0, y0)`,
/// i.e. `y - y0 = (dy / dx) * (x - x0)`.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LineElement {
    pub dx: f32,
    pub dy: f32,
    pub x0: f32,
    pub y0: f32,
}

impl LineElement {
    /// Solve for y at `x`. The caller must special-case `dx == 0` (a
    /// perfectly vertical fit) before calling.
    #[inline]
    pub fn point_at_x(&self, x: f32) -> f32 {
        (self.dy / self.dx) * (x - self.x0) + self.y0
    }

    /// Solve for x at `y`. The caller must special-case `dy == 0` (a
    /// perfectly horizontal fit) before calling.
    #[inline]
    pub fn point_at_y(&self, y: f32) -> f32 {
        (self.dx / self.dy) * (y - self.y0) + self.x0
    }
}

/// Least-squares (L2) line fit through a point set.
///
/// Returns the unit principal direction of the point cloud anchored at its
/// centroid. Fails when the covariance has no finite dominant eigenvector,
/// which can only happen for empty or fully coincident point sets.
pub fn fit_line(points: &[[f32; 2]]) -> Result<LineElement> {
    if points.is_empty() {
        return Err(DetectError::LineFit { point_count: 0 });
    }

    let count = points.len() as f32;
    let mut cx = 0.0f32;
    let mut cy = 0.0f32;
    for p in points {
        cx += p[0];
        cy += p[1];
    }
    cx /= count;
    cy /= count;

    let mut cxx = 0.0f32;
    let mut cxy = 0.0f32;
    let mut cyy = 0.0f32;
    for p in points {
        let dx = p[0] - cx;
        let dy = p[1] - cy;
        cxx += dx * dx;
        cxy += dx * dy;
        cyy += dy * dy;
    }
    cxx /= count;
    cxy /= count;
    cyy /= count;

    let cov = Matrix2::new(cxx, cxy, cxy, cyy);
    let eig = SymmetricEigen::new(cov);
    let vmax = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
        eig.eigenvectors.column(0)
    } else {
        eig.eigenvectors.column(1)
    };

    let norm = (vmax[0] * vmax[0] + vmax[1] * vmax[1]).sqrt();
    if !norm.is_finite() || norm < 1e-6 {
        return Err(DetectError::LineFit {
            point_count: points.len(),
        });
    }
    let mut dx = vmax[0] / norm;
    let mut dy = vmax[1] / norm;

    // Snap near-axis fits so that the exact-zero degenerate branches in the
    // merging stage trigger for pixel-straight lines despite float noise.
    if dy.abs() < 1e-6 {
        dy = 0.0;
        dx = dx.signum();
    }
    if dx.abs() < 1e-6 {
        dx = 0.0;
        dy = dy.signum();
    }

    Ok(LineElement {
        dx,
        dy,
        x0: cx,
        y0: cy,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Point;

    fn rect(x1: i32, y1: i32, x2: i32, y2: i32) -> Rect {
        Rect::from_corners(Point::new(x1, y1), Point::new(x2, y2))
    }

    #[test]
    fn unset_bounds_are_the_identity() {
        let rects = vec![rect(0, 0, 10, 3), rect(5, 5, 5, 5), rect(-2, 1, 900, 2)];
        let kept = filter_rectangles(&rects, &RectBounds::default());
        assert_eq!(kept, rects);
    }

    #[test]
    fn bounds_filter_each_axis_independently() {
        let rects = vec![rect(0, 0, 100, 3), rect(0, 0, 30, 3), rect(0, 0, 100, 50)];
        let kept = filter_rectangles(&rects, &RectBounds::horizontal_min(50));
        assert_eq!(kept, vec![rects[0], rects[2]]);

        let bounds = RectBounds {
            horizontal_min: Some(50),
            vertical_max: Some(10),
            ..RectBounds::default()
        };
        assert_eq!(filter_rectangles(&rects, &bounds), vec![rects[0]]);
    }

    #[test]
    fn fit_recovers_a_horizontal_line_exactly() {
        let points: Vec<[f32; 2]> = (0..50).map(|x| [x as f32, 7.0]).collect();
        let line = fit_line(&points).unwrap();
        assert_eq!(line.dy, 0.0);
        assert!((line.y0 - 7.0).abs() < 1e-4);
    }

    #[test]
    fn fit_recovers_a_sloped_line() {
        let points: Vec<[f32; 2]> = (0..100).map(|x| [x as f32, 0.5 * x as f32 + 3.0]).collect();
        let line = fit_line(&points).unwrap();
        let y_at_10 = line.point_at_x(10.0);
        assert!((y_at_10 - 8.0).abs() < 1e-2, "y_at_10 = {y_at_10}");
    }

    #[test]
    fn fit_rejects_empty_input() {
        assert!(fit_line(&[]).is_err());
    }
}
