//! Highlight compositing
//!
//! Draws highlight rectangles as translucent fills over an already
//! rendered page raster. Owns no text logic: the input raster is never
//! mutated, pixels outside the rectangles are untouched, and nothing is
//! retained between renders.

use image::RgbaImage;

use super::geometry::HighlightRect;

/// Fill style for composited highlights.
#[derive(Debug, Clone, Copy)]
pub struct HighlightStyle {
    /// Fill color (RGB).
    pub color: [u8; 3],
    /// Fill opacity, 0.0–1.0.
    pub alpha: f32,
}

impl Default for HighlightStyle {
    fn default() -> Self {
        Self {
            color: [255, 213, 79],
            alpha: 0.4,
        }
    }
}

/// Compose highlights over a page raster.
///
/// Returns a new image with every rectangle alpha-blended in place;
/// pixels outside the rectangles are byte-identical to the input.
pub fn compose(raster: &RgbaImage, rects: &[HighlightRect], style: &HighlightStyle) -> RgbaImage {
    let mut composed = raster.clone();
    for rect in rects {
        fill_rect(&mut composed, rect, style);
    }
    composed
}

fn fill_rect(img: &mut RgbaImage, rect: &HighlightRect, style: &HighlightStyle) {
    let (img_width, img_height) = img.dimensions();
    let x0 = rect.x.max(0.0) as u32;
    let y0 = rect.y.max(0.0) as u32;
    let x1 = ((rect.x + rect.width).ceil().max(0.0) as u32).min(img_width);
    let y1 = ((rect.y + rect.height).ceil().max(0.0) as u32).min(img_height);
    let alpha = style.alpha.clamp(0.0, 1.0);

    for y in y0..y1 {
        for x in x0..x1 {
            let pixel = img.get_pixel_mut(x, y);
            for channel in 0..3 {
                let src = pixel.0[channel] as f32;
                let fill = style.color[channel] as f32;
                pixel.0[channel] = (src * (1.0 - alpha) + fill * alpha).round() as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn white_raster(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, Rgba([255, 255, 255, 255]))
    }

    #[test]
    fn test_no_rects_leaves_raster_identical() {
        let raster = white_raster(8, 8);
        let composed = compose(&raster, &[], &HighlightStyle::default());
        assert_eq!(raster.as_raw(), composed.as_raw());
    }

    #[test]
    fn test_input_raster_is_not_mutated() {
        let raster = white_raster(8, 8);
        let rect = HighlightRect {
            x: 1.0,
            y: 1.0,
            width: 4.0,
            height: 4.0,
        };
        let _ = compose(&raster, &[rect], &HighlightStyle::default());
        assert!(raster.pixels().all(|p| p.0 == [255, 255, 255, 255]));
    }

    #[test]
    fn test_pixels_outside_rect_untouched() {
        let raster = white_raster(10, 10);
        let rect = HighlightRect {
            x: 2.0,
            y: 2.0,
            width: 3.0,
            height: 3.0,
        };
        let composed = compose(&raster, &[rect], &HighlightStyle::default());
        assert_eq!(composed.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(composed.get_pixel(9, 9).0, [255, 255, 255, 255]);
        assert_ne!(composed.get_pixel(3, 3).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_blend_uses_configured_alpha() {
        let raster = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
        let style = HighlightStyle {
            color: [255, 213, 79],
            alpha: 0.4,
        };
        let rect = HighlightRect {
            x: 0.0,
            y: 0.0,
            width: 4.0,
            height: 4.0,
        };
        let composed = compose(&raster, &[rect], &style);
        // 0 * 0.6 + color * 0.4, rounded
        assert_eq!(composed.get_pixel(1, 1).0[0], 102);
        assert_eq!(composed.get_pixel(1, 1).0[1], 85);
        assert_eq!(composed.get_pixel(1, 1).0[2], 32);
    }

    #[test]
    fn test_rect_clamped_to_raster_bounds() {
        let raster = white_raster(4, 4);
        let rect = HighlightRect {
            x: -5.0,
            y: 2.0,
            width: 100.0,
            height: 100.0,
        };
        // Must not panic; out-of-bounds area is simply ignored
        let composed = compose(&raster, &[rect], &HighlightStyle::default());
        assert_ne!(composed.get_pixel(0, 3).0, [255, 255, 255, 255]);
        assert_eq!(composed.get_pixel(0, 0).0, [255, 255, 255, 255]);
    }
}
