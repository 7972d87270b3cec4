//! Waveform preview of the converted audio.
//!
//! One sample is taken per pixel column at a fixed stride, so the trace is a
//! decimated view of the signal rather than a min/max envelope.

use image::{Rgba, RgbaImage};

/// Stroke colour of the trace (#25CC8C).
pub const STROKE_RGBA: [u8; 4] = [0x25, 0xCC, 0x8C, 0xFF];
pub const DEFAULT_HEIGHT: u32 = 120;

/// Exactly `width` points, one per column, `x` in `0..width`.
///
/// Columns whose sample index falls past the end of a short buffer sit on the
/// centre line.
pub fn trace_points(channel: &[f32], width: usize, height: f32) -> Vec<[f32; 2]> {
    if width == 0 {
        return Vec::new();
    }
    let step = channel.len().div_ceil(width);
    let amp = height / 2.0;

    (0..width)
        .map(|i| {
            let sample = channel.get(i * step).copied().unwrap_or(0.0);
            [i as f32, (1.0 + sample) * amp]
        })
        .collect()
}

/// Rasterises the trace onto a transparent `width` x `height` image.
pub fn render_image(channel: &[f32], width: u32, height: u32) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    let points = trace_points(channel, width as usize, height as f32);
    let stroke = Rgba(STROKE_RGBA);

    for pair in points.windows(2) {
        draw_line(&mut img, pair[0], pair[1], stroke);
    }
    if let [only] = points.as_slice() {
        draw_line(&mut img, *only, *only, stroke);
    }
    img
}

fn draw_line(img: &mut RgbaImage, from: [f32; 2], to: [f32; 2], color: Rgba<u8>) {
    let (w, h) = (img.width() as i64, img.height() as i64);
    let dx = to[0] - from[0];
    let dy = to[1] - from[1];
    let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as usize;

    for s in 0..=steps {
        let t = s as f32 / steps as f32;
        let x = (from[0] + dx * t).round() as i64;
        let y = (from[1] + dy * t).round() as i64;
        // y == height happens for full-scale positive samples
        let y = y.min(h - 1);
        if x >= 0 && x < w && y >= 0 {
            img.put_pixel(x as u32, y as u32, color);
        }
    }
}
