use image::{imageops, ImageBuffer, Luma, LumaA, Pixel, Rgb, Rgba};
use log::warn;

use crate::tensor::ImageDims;

type Matrix3 = [[f64; 3]; 3];

const IDENTITY: Matrix3 = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]];

fn matmul(a: &Matrix3, b: &Matrix3) -> Matrix3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

fn translation(rows: f64, cols: f64) -> Matrix3 {
    [[1.0, 0.0, rows], [0.0, 1.0, cols], [0.0, 0.0, 1.0]]
}

/// Output-to-input mapping in (row, col) space for a rotation by `theta`
/// degrees followed by a shift of `tx` rows and `ty` columns, centered on the image.
fn transform_matrix(theta: f32, tx: f32, ty: f32, dims: ImageDims) -> Matrix3 {
    let mut matrix = IDENTITY;

    if theta != 0.0 {
        let (sin, cos) = f64::from(theta).to_radians().sin_cos();
        let rotation = [[cos, -sin, 0.0], [sin, cos, 0.0], [0.0, 0.0, 1.0]];
        matrix = matmul(&matrix, &rotation);
    }
    if tx != 0.0 || ty != 0.0 {
        matrix = matmul(&matrix, &translation(f64::from(tx), f64::from(ty)));
    }

    let o_x = dims.height as f64 / 2.0 - 0.5;
    let o_y = dims.width as f64 / 2.0 - 0.5;
    let centered = matmul(&translation(o_x, o_y), &matrix);
    matmul(&centered, &translation(-o_x, -o_y))
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

/// Rotates and shifts one HWC image into `out`.
///
/// Every output pixel is mapped back into the source and sampled
/// bilinearly. Coordinates outside the source take the nearest edge pixel.
/// `src` and `out` must both hold `dims.num_elements()` values.
pub fn apply_affine_transform(
    src: &[f32],
    out: &mut [f32],
    dims: ImageDims,
    theta: f32,
    tx: f32,
    ty: f32,
) {
    debug_assert_eq!(src.len(), dims.num_elements());
    debug_assert_eq!(out.len(), dims.num_elements());

    if theta == 0.0 && tx == 0.0 && ty == 0.0 {
        out.copy_from_slice(src);
        return;
    }

    let m = transform_matrix(theta, tx, ty, dims);
    let ImageDims { height, width, channels } = dims;
    let max_row = (height - 1) as f64;
    let max_col = (width - 1) as f64;
    let pixel = |r: usize, c: usize, ch: usize| f64::from(src[(r * width + c) * channels + ch]);

    for r in 0..height {
        for c in 0..width {
            let (rf, cf) = (r as f64, c as f64);
            let in_r = (m[0][0] * rf + m[0][1] * cf + m[0][2]).clamp(0.0, max_row);
            let in_c = (m[1][0] * rf + m[1][1] * cf + m[1][2]).clamp(0.0, max_col);

            let r0 = in_r.floor() as usize;
            let c0 = in_c.floor() as usize;
            let r1 = (r0 + 1).min(height - 1);
            let c1 = (c0 + 1).min(width - 1);
            let fr = in_r - r0 as f64;
            let fc = in_c - c0 as f64;

            let base = (r * width + c) * channels;
            for ch in 0..channels {
                let top = lerp(pixel(r0, c0, ch), pixel(r0, c1, ch), fc);
                let bottom = lerp(pixel(r1, c0, ch), pixel(r1, c1, ch), fc);
                out[base + ch] = lerp(top, bottom, fr) as f32;
            }
        }
    }
}

#[derive(Clone, Copy)]
enum FlipAxis {
    Horizontal,
    Vertical,
}

fn flip_pixels<P: Pixel<Subpixel = f32>>(image: &mut [f32], dims: ImageDims, axis: FlipAxis) {
    let (width, height) = (dims.width as u32, dims.height as u32);
    let Some(mut buffer) = ImageBuffer::<P, &mut [f32]>::from_raw(width, height, image) else {
        warn!("flip skipped: buffer too small for {:?}", dims);
        return;
    };
    match axis {
        FlipAxis::Horizontal => imageops::flip_horizontal_in_place(&mut buffer),
        FlipAxis::Vertical => imageops::flip_vertical_in_place(&mut buffer),
    }
}

fn flip(image: &mut [f32], dims: ImageDims, axis: FlipAxis) {
    match dims.channels {
        1 => flip_pixels::<Luma<f32>>(image, dims, axis),
        2 => flip_pixels::<LumaA<f32>>(image, dims, axis),
        3 => flip_pixels::<Rgb<f32>>(image, dims, axis),
        4 => flip_pixels::<Rgba<f32>>(image, dims, axis),
        n => warn!("flip skipped: no pixel type with {} channels", n),
    }
}

/// Mirrors an HWC image left to right in place.
pub fn flip_horizontal(image: &mut [f32], dims: ImageDims) {
    flip(image, dims, FlipAxis::Horizontal);
}

/// Mirrors an HWC image top to bottom in place.
pub fn flip_vertical(image: &mut [f32], dims: ImageDims) {
    flip(image, dims, FlipAxis::Vertical);
}
