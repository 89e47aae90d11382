//! Page rasterization
//!
//! Renders a page to an RGBA raster at a scale via MuPDF and converts
//! the pixmap into an `image::RgbaImage` the compositor can blend over.

use std::io::Cursor;

use image::{DynamicImage, RgbaImage};
use mupdf::{Colorspace, Matrix};

use super::safe::PdfDocument;
use super::{RenderError, RenderResult};

/// Minimum render scale factor.
pub const MIN_SCALE: f32 = 0.1;
/// Maximum render scale factor.
pub const MAX_SCALE: f32 = 4.0;

/// A rendered page raster plus the geometry needed downstream.
pub struct PageRaster {
    pub image: RgbaImage,
    /// The scale the raster was actually rendered at (after clamping).
    /// Highlight rectangles must be computed against this same scale.
    pub scale: f32,
    /// Unscaled page width in points.
    pub page_width: f32,
    /// Unscaled page height in points.
    pub page_height: f32,
}

/// Render one page at the given scale.
pub fn render_page(doc: &PdfDocument, page_index: usize, scale: f32) -> RenderResult<PageRaster> {
    if page_index >= doc.page_count() {
        return Err(RenderError::PageOutOfRange(page_index));
    }
    let scale = scale.clamp(MIN_SCALE, MAX_SCALE);

    doc.with_doc(|mupdf_doc| {
        let page = mupdf_doc.load_page(page_index as i32)?;
        let bounds = page.bounds()?;

        let matrix = Matrix::new_scale(scale, scale);
        let colorspace = Colorspace::device_rgb();
        let pixmap = page.to_pixmap(&matrix, &colorspace, true, true)?;
        let image = pixmap_to_rgba(&pixmap)?;

        Ok(PageRaster {
            image,
            scale,
            page_width: bounds.x1 - bounds.x0,
            page_height: bounds.y1 - bounds.y0,
        })
    })
}

/// Convert a MuPDF pixmap into an RGBA image buffer.
fn pixmap_to_rgba(pixmap: &mupdf::Pixmap) -> RenderResult<RgbaImage> {
    let width = pixmap.width() as u32;
    let height = pixmap.height() as u32;
    let samples = pixmap.samples();
    let n = pixmap.n() as usize;

    let mut rgba_buffer = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height as usize {
        for x in 0..width as usize {
            let offset = (y * width as usize + x) * n;
            let r = samples.get(offset).copied().unwrap_or(0);
            let g = samples.get(offset + 1).copied().unwrap_or(0);
            let b = samples.get(offset + 2).copied().unwrap_or(0);
            let a = if n >= 4 {
                samples.get(offset + 3).copied().unwrap_or(255)
            } else {
                255
            };
            rgba_buffer.extend_from_slice(&[r, g, b, a]);
        }
    }

    RgbaImage::from_raw(width, height, rgba_buffer)
        .ok_or_else(|| RenderError::Buffer("Failed to create image buffer".to_string()))
}

/// Encode a raster as PNG for the HTTP response.
pub fn encode_png(image: &RgbaImage) -> RenderResult<Vec<u8>> {
    let mut output = Vec::new();
    DynamicImage::ImageRgba8(image.clone())
        .write_to(&mut Cursor::new(&mut output), image::ImageFormat::Png)
        .map_err(|e| RenderError::Buffer(e.to_string()))?;
    Ok(output)
}
