//! Sobel gradients for 8-bit grayscale pages.
//!
//! Convolves the 3x3 Sobel pair with border clamping over an intensity
//! buffer normalized to [0, 1] and keeps per-pixel `gx`, `gy` and the
//! Euclidean magnitude. O(W*H) time, three float buffers of memory.

use image::GrayImage;

type Kernel3 = [[f32; 3]; 3];

const SOBEL_KERNEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_KERNEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Per-pixel gradient buffers in row-major order, stride == width.
pub(super) struct Grad {
    pub width: usize,
    pub height: usize,
    pub gx: Vec<f32>,
    pub gy: Vec<f32>,
    pub mag: Vec<f32>,
}

pub(super) fn sobel_gradients(image: &GrayImage) -> Grad {
    let width = image.width() as usize;
    let height = image.height() as usize;
    let mut gx = vec![0.0f32; width * height];
    let mut gy = vec![0.0f32; width * height];
    let mut mag = vec![0.0f32; width * height];

    if width == 0 || height == 0 {
        return Grad {
            width,
            height,
            gx,
            gy,
            mag,
        };
    }

    let luma: Vec<f32> = image.as_raw().iter().map(|&v| v as f32 / 255.0).collect();
    let row = |y: usize| &luma[y * width..(y + 1) * width];

    for y in 0..height {
        let rows = [
            row(y.saturating_sub(1)),
            row(y),
            row((y + 1).min(height - 1)),
        ];
        for x in 0..width {
            let x_idx = [x.saturating_sub(1), x, (x + 1).min(width - 1)];
            let mut sum_x = 0.0;
            let mut sum_y = 0.0;
            for (ky, r) in rows.iter().enumerate() {
                let kx_row = &SOBEL_KERNEL_X[ky];
                let ky_row = &SOBEL_KERNEL_Y[ky];
                sum_x +=
                    r[x_idx[0]] * kx_row[0] + r[x_idx[1]] * kx_row[1] + r[x_idx[2]] * kx_row[2];
                sum_y +=
                    r[x_idx[0]] * ky_row[0] + r[x_idx[1]] * ky_row[1] + r[x_idx[2]] * ky_row[2];
            }
            let idx = y * width + x;
            gx[idx] = sum_x;
            gy[idx] = sum_y;
            mag[idx] = (sum_x * sum_x + sum_y * sum_y).sqrt();
        }
    }

    Grad {
        width,
        height,
        gx,
        gy,
        mag,
    }
}
