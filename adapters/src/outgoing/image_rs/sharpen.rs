use image::{ImageBuffer, Rgba, RgbaImage, imageops};

use domain::sharpen::{SharpenMethod, UnsharpMask};

/// Sharpens color channels only; alpha is carried over untouched so the
/// segmentation mask keeps its edges.
pub(crate) fn sharpen(image: &RgbaImage, method: SharpenMethod, mask: UnsharpMask) -> RgbaImage {
    match method {
        SharpenMethod::Sharpen => convolve_color(image, &SharpenMethod::SHARPEN_KERNEL),
        SharpenMethod::Unsharp => unsharp(image, mask),
    }
}

fn convolve_color(image: &RgbaImage, kernel: &[f32; 9]) -> RgbaImage {
    let (width, height) = image.dimensions();
    let sum: f32 = kernel.iter().sum();
    let scale = if sum.abs() < f32::EPSILON { 1.0 } else { sum };

    // Edge pixels sample their clamped neighbours.
    let sample = |x: u32, dx: i64, y: u32, dy: i64| {
        let sx = (i64::from(x) + dx).clamp(0, i64::from(width) - 1) as u32;
        let sy = (i64::from(y) + dy).clamp(0, i64::from(height) - 1) as u32;
        image.get_pixel(sx, sy)
    };

    ImageBuffer::from_fn(width, height, |x, y| {
        let mut acc = [0.0f32; 3];
        for (tap, weight) in kernel.iter().enumerate() {
            let dx = (tap % 3) as i64 - 1;
            let dy = (tap / 3) as i64 - 1;
            let Rgba(channels) = sample(x, dx, y, dy);
            for (total, channel) in acc.iter_mut().zip(channels.iter()) {
                *total += f32::from(*channel) * weight;
            }
        }

        let Rgba([_, _, _, alpha]) = *image.get_pixel(x, y);
        let [r, g, b] = acc.map(|total| (total / scale).round().clamp(0.0, 255.0) as u8);
        Rgba([r, g, b, alpha])
    })
}

fn unsharp(image: &RgbaImage, mask: UnsharpMask) -> RgbaImage {
    let blurred = imageops::blur(image, mask.radius);
    let mut sharpened = image.clone();

    for (pixel, soft) in sharpened.pixels_mut().zip(blurred.pixels()) {
        for (channel, blurred_channel) in pixel.0.iter_mut().zip(soft.0.iter()).take(3) {
            *channel = mask.apply(*channel, *blurred_channel);
        }
    }

    sharpened
}
