//! Built-in LSD-style raw segment extractor.
//!
//! Grows 8-connected regions of pixels whose gradient orientation agrees
//! with a seed pixel, then reduces each region to a segment along the
//! principal axis of its pixel cloud. Orientation is treated modulo pi:
//! grid lines have no meaningful direction sign.

use super::grad::{sobel_gradients, Grad};
use super::{RawSegment, SegmentDetector};
use image::GrayImage;
use nalgebra::{Matrix2, SymmetricEigen};
use serde::{Deserialize, Serialize};

const NEIGH_OFFSETS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Options controlling the gradient region-growing extractor.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct LsdOptions {
    /// Minimum gradient magnitude for seed and region pixels (Sobel units
    /// on a [0, 1] intensity scale).
    pub magnitude_threshold: f32,
    /// Orientation tolerance around the seed angle in degrees.
    pub angle_tolerance_deg: f32,
    /// Minimum accepted segment length in pixels.
    pub min_length_px: f32,
    /// Minimum number of pixels in a region before a segment is attempted.
    pub min_region_size: usize,
    /// Minimum fraction of region pixels tightly aligned with the seed.
    pub min_aligned_fraction: f32,
}

impl Default for LsdOptions {
    fn default() -> Self {
        Self {
            magnitude_threshold: 0.05,
            angle_tolerance_deg: 22.5,
            min_length_px: 4.0,
            min_region_size: 12,
            min_aligned_fraction: 0.6,
        }
    }
}

/// Sobel + orientation region growing segment detector.
#[derive(Clone, Copy, Debug, Default)]
pub struct GradientSegmentDetector {
    pub options: LsdOptions,
}

impl GradientSegmentDetector {
    pub fn new(options: LsdOptions) -> Self {
        Self { options }
    }
}

impl SegmentDetector for GradientSegmentDetector {
    fn detect(&self, image: &GrayImage, mask: Option<&GrayImage>) -> Vec<RawSegment> {
        Extractor::new(image, mask, self.options).extract()
    }
}

#[inline]
fn normalize_half_pi(angle: f32) -> f32 {
    let norm = angle.rem_euclid(std::f32::consts::PI);
    if norm >= std::f32::consts::PI - 1e-6 {
        0.0
    } else {
        norm
    }
}

#[inline]
fn angular_difference(a: f32, b: f32) -> f32 {
    let mut diff = (a - b).abs();
    if diff > std::f32::consts::PI {
        diff = diff.rem_euclid(std::f32::consts::PI);
    }
    if diff > std::f32::consts::FRAC_PI_2 {
        std::f32::consts::PI - diff
    } else {
        diff
    }
}

struct Extractor<'a> {
    grad: Grad,
    mask: Option<&'a GrayImage>,
    options: LsdOptions,
    angle_tol: f32,
    half_angle_tol: f32,
    used: Vec<u8>,
    angle_cache: Vec<f32>,
    stack: Vec<usize>,
    region: Vec<usize>,
    aligned: usize,
    segments: Vec<RawSegment>,
}

impl<'a> Extractor<'a> {
    fn new(image: &GrayImage, mask: Option<&'a GrayImage>, options: LsdOptions) -> Self {
        let grad = sobel_gradients(image);
        let n = grad.width * grad.height;
        let angle_tol = options.angle_tolerance_deg.to_radians();
        Self {
            grad,
            mask,
            options,
            angle_tol,
            half_angle_tol: angle_tol * 0.5,
            used: vec![0u8; n],
            angle_cache: vec![f32::NAN; n],
            stack: Vec::with_capacity(64),
            region: Vec::with_capacity(128),
            aligned: 0,
            segments: Vec::new(),
        }
    }

    fn extract(mut self) -> Vec<RawSegment> {
        for idx in 0..(self.grad.width * self.grad.height) {
            self.process_seed(idx);
        }
        self.segments
    }

    fn masked_out(&self, idx: usize) -> bool {
        match self.mask {
            Some(mask) => {
                let x = (idx % self.grad.width) as u32;
                let y = (idx / self.grad.width) as u32;
                mask.get_pixel(x, y).0[0] == 0
            }
            None => false,
        }
    }

    fn process_seed(&mut self, idx: usize) {
        if self.used[idx] != 0 || self.masked_out(idx) {
            return;
        }
        if self.grad.mag[idx] < self.options.magnitude_threshold {
            return;
        }

        self.region.clear();
        self.aligned = 0;
        self.stack.clear();

        let seed_angle = self.angle_at(idx);
        self.used[idx] = 1;
        self.stack.push(idx);
        self.grow_region(seed_angle);

        if let Some(segment) = self.build_segment() {
            self.segments.push(segment);
        } else {
            // release the pixels so an overlapping better seed can claim them
            for &i in &self.region {
                self.used[i] = 0;
            }
        }
    }

    fn grow_region(&mut self, seed_angle: f32) {
        while let Some(idx) = self.stack.pop() {
            let x = idx % self.grad.width;
            let y = idx / self.grad.width;
            let angle = self.angle_at(idx);
            if angular_difference(angle, seed_angle) <= self.half_angle_tol {
                self.aligned += 1;
            }
            self.region.push(idx);

            for (dx, dy) in NEIGH_OFFSETS {
                let xn = x as isize + dx;
                let yn = y as isize + dy;
                if xn < 0
                    || yn < 0
                    || xn >= self.grad.width as isize
                    || yn >= self.grad.height as isize
                {
                    continue;
                }
                let neighbor = yn as usize * self.grad.width + xn as usize;
                if self.used[neighbor] != 0 || self.masked_out(neighbor) {
                    continue;
                }
                if self.grad.mag[neighbor] < self.options.magnitude_threshold {
                    continue;
                }
                let neighbor_angle = self.angle_at(neighbor);
                if angular_difference(neighbor_angle, seed_angle) <= self.angle_tol {
                    self.used[neighbor] = 1;
                    self.stack.push(neighbor);
                }
            }
        }
    }

    fn build_segment(&self) -> Option<RawSegment> {
        if self.region.len() < self.options.min_region_size {
            return None;
        }
        let count = self.region.len() as f32;
        if (self.aligned as f32 / count) < self.options.min_aligned_fraction {
            return None;
        }

        let mut cx = 0.0f32;
        let mut cy = 0.0f32;
        for &idx in &self.region {
            cx += (idx % self.grad.width) as f32;
            cy += (idx / self.grad.width) as f32;
        }
        cx /= count;
        cy /= count;

        let mut cxx = 0.0f32;
        let mut cxy = 0.0f32;
        let mut cyy = 0.0f32;
        for &idx in &self.region {
            let dx = (idx % self.grad.width) as f32 - cx;
            let dy = (idx / self.grad.width) as f32 - cy;
            cxx += dx * dx;
            cxy += dx * dy;
            cyy += dy * dy;
        }
        let cov = Matrix2::new(cxx / count, cxy / count, cxy / count, cyy / count);
        let eig = SymmetricEigen::new(cov);
        let (vmax, lambda_max) = if eig.eigenvalues[0] >= eig.eigenvalues[1] {
            (eig.eigenvectors.column(0), eig.eigenvalues[0])
        } else {
            (eig.eigenvectors.column(1), eig.eigenvalues[1])
        };
        if !lambda_max.is_finite() || lambda_max <= 0.0 {
            return None;
        }

        let norm = (vmax[0] * vmax[0] + vmax[1] * vmax[1]).sqrt();
        if !norm.is_finite() || norm < 1e-6 {
            return None;
        }
        let tx = vmax[0] / norm;
        let ty = vmax[1] / norm;

        let mut smin = f32::INFINITY;
        let mut smax = f32::NEG_INFINITY;
        for &idx in &self.region {
            let dx = (idx % self.grad.width) as f32 - cx;
            let dy = (idx / self.grad.width) as f32 - cy;
            let s = dx * tx + dy * ty;
            smin = smin.min(s);
            smax = smax.max(s);
        }
        if !smin.is_finite() || !smax.is_finite() {
            return None;
        }
        let len = smax - smin;
        if len < self.options.min_length_px {
            return None;
        }

        Some(RawSegment::new(
            [cx + smin * tx, cy + smin * ty],
            [cx + smax * tx, cy + smax * ty],
        ))
    }

    fn angle_at(&mut self, idx: usize) -> f32 {
        let cached = self.angle_cache[idx];
        if cached.is_nan() {
            let angle = normalize_half_pi(self.grad.gy[idx].atan2(self.grad.gx[idx]));
            self.angle_cache[idx] = angle;
            angle
        } else {
            cached
        }
    }
}
