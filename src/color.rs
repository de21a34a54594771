use image::{Rgb, RgbImage};
use palette::Srgb;

// ---------------------------------------------------------------------------
// Pixel normalization
// ---------------------------------------------------------------------------

/// Flatten an RGB image row-major into points in the unit cube.
pub fn normalize(image: &RgbImage) -> Vec<[f32; 3]> {
    image
        .pixels()
        .map(|p| {
            let rgb: Srgb<f32> = Srgb::new(p[0], p[1], p[2]).into_format();
            [rgb.red, rgb.green, rgb.blue]
        })
        .collect()
}

/// Map a point in the unit cube back to an 8-bit pixel, clamping overshoot.
pub fn denormalize(point: [f32; 3]) -> Rgb<u8> {
    let [r, g, b] = point.map(|c| c.clamp(0.0, 1.0));
    let rgb: Srgb<u8> = Srgb::new(r, g, b).into_format();
    Rgb([rgb.red, rgb.green, rgb.blue])
}
