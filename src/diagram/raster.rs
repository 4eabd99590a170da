//! SVG to PNG rasterization.
//!
//! The document is cropped to the bounding box of its painted content plus a
//! fixed margin, drawn onto an opaque background and encoded with a pHYs chunk
//! so viewers report the requested DPI.

use std::path::Path;
use std::sync::Arc;

use svg::Document;
use usvg::fontdb;

use super::figure::POINTS_PER_INCH;
use super::RenderError;

const METERS_PER_INCH: f64 = 0.0254;

/// Largest width or height of an output image.
pub const MAX_SIDE_PIXELS: u64 = 1 << 16;

#[derive(Debug, Clone, PartialEq)]
pub struct RasterOptions {
    pub dpi: u32,
    /// Margin kept around the content bounding box, in inches.
    pub pad_inches: f64,
    pub background: [u8; 3],
    /// Fallback family for text whose own family is not installed.
    pub font_family: String,
    /// Largest accepted `width * height` of the cropped image.
    pub max_pixels: u64,
}

impl Default for RasterOptions {
    fn default() -> Self {
        Self {
            dpi: 300,
            pad_inches: 0.1,
            background: [255, 255, 255],
            font_family: "DejaVu Sans".to_string(),
            max_pixels: 64 * 1024 * 1024,
        }
    }
}

impl RasterOptions {
    /// Device pixels per SVG point.
    fn scale(&self) -> f64 {
        f64::from(self.dpi) / POINTS_PER_INCH
    }

    /// DPI expressed as pixels per meter for the PNG pHYs chunk.
    pub fn pixels_per_meter(&self) -> u32 {
        let ppm = (f64::from(self.dpi) / METERS_PER_INCH).round();
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let ppm = ppm.clamp(0.0, f64::from(u32::MAX)) as u32;
        ppm
    }
}

/// Build the font database shared by every render: system fonts plus any
/// extra directories. Missing directories are skipped.
pub fn load_fonts<P: AsRef<Path>>(font_dirs: &[P]) -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    for dir in font_dirs {
        let dir = dir.as_ref();
        if dir.is_dir() {
            db.load_fonts_dir(dir);
        }
    }
    db
}

/// Rasterize `document` and return the encoded PNG bytes.
pub fn render_png(
    document: &Document,
    fonts: &Arc<fontdb::Database>,
    options: &RasterOptions,
) -> Result<Vec<u8>, RenderError> {
    let pixmap = render_pixmap(document, fonts, options)?;
    encode_png(&pixmap, options)
}

fn render_pixmap(
    document: &Document,
    fonts: &Arc<fontdb::Database>,
    options: &RasterOptions,
) -> Result<tiny_skia::Pixmap, RenderError> {
    let mut opt = usvg::Options::default();
    opt.fontdb = Arc::clone(fonts);
    opt.font_family.clone_from(&options.font_family);

    let tree = usvg::Tree::from_str(&document.to_string(), &opt)?;

    let pad = options.pad_inches * POINTS_PER_INCH;
    let (min_x, min_y, width, height) = {
        let bbox = tree.root().abs_stroke_bounding_box();
        let (w, h) = (f64::from(bbox.width()), f64::from(bbox.height()));
        if w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0 {
            (f64::from(bbox.x()) - pad, f64::from(bbox.y()) - pad, w + 2.0 * pad, h + 2.0 * pad)
        } else {
            let size = tree.size();
            (0.0, 0.0, f64::from(size.width()), f64::from(size.height()))
        }
    };

    let scale = options.scale();
    let (width_px, height_px) = checked_size(width * scale, height * scale, options.max_pixels)?;

    let mut pixmap = tiny_skia::Pixmap::new(width_px, height_px).ok_or(RenderError::PixmapAlloc {
        width: width_px,
        height: height_px,
    })?;

    let [r, g, b] = options.background;
    pixmap.fill(tiny_skia::Color::from_rgba8(r, g, b, 255));

    #[allow(clippy::cast_possible_truncation)]
    let transform = tiny_skia::Transform::from_row(
        scale as f32,
        0.0,
        0.0,
        scale as f32,
        (-min_x * scale) as f32,
        (-min_y * scale) as f32,
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    Ok(pixmap)
}

/// Round a device size up to whole pixels, refusing images over the limits
/// before anything is allocated.
fn checked_size(width: f64, height: f64, max_pixels: u64) -> Result<(u32, u32), RenderError> {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let to_px = |value: f64| if value.is_finite() { value.ceil().max(1.0) as u64 } else { u64::MAX };
    let (width, height) = (to_px(width), to_px(height));

    let too_large = width > MAX_SIDE_PIXELS
        || height > MAX_SIDE_PIXELS
        || width.saturating_mul(height) > max_pixels;
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) if !too_large => Ok((w, h)),
        _ => Err(RenderError::ImageTooLarge { width, height }),
    }
}

fn encode_png(pixmap: &tiny_skia::Pixmap, options: &RasterOptions) -> Result<Vec<u8>, RenderError> {
    let mut data = Vec::with_capacity(pixmap.data().len());
    for pixel in pixmap.pixels() {
        let color = pixel.demultiply();
        data.extend_from_slice(&[color.red(), color.green(), color.blue(), color.alpha()]);
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, pixmap.width(), pixmap.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let ppm = options.pixels_per_meter();
        encoder.set_pixel_dims(Some(png::PixelDimensions {
            xppu: ppm,
            yppu: ppm,
            unit: png::Unit::Meter,
        }));
        let mut writer = encoder.write_header()?;
        writer.write_image_data(&data)?;
        writer.finish()?;
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use svg::node::element::Rectangle;

    fn fonts() -> Arc<fontdb::Database> {
        Arc::new(fontdb::Database::new())
    }

    fn square_document() -> Document {
        Document::new()
            .set("width", 100)
            .set("height", 100)
            .set("viewBox", (0, 0, 100, 100))
            .add(
                Rectangle::new()
                    .set("x", 40)
                    .set("y", 40)
                    .set("width", 20)
                    .set("height", 20)
                    .set("fill", "#ff0000"),
            )
    }

    fn decode(bytes: &[u8]) -> (png::OutputInfo, Vec<u8>, Option<png::PixelDimensions>) {
        let decoder = png::Decoder::new(Cursor::new(bytes));
        let mut reader = decoder.read_info().unwrap();
        let dims = reader.info().pixel_dims;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf).unwrap();
        buf.truncate(info.buffer_size());
        (info, buf, dims)
    }

    #[test]
    fn test_png_signature_and_dpi() {
        let bytes = render_png(&square_document(), &fonts(), &RasterOptions::default()).unwrap();
        assert!(bytes.starts_with(b"\x89PNG\r\n\x1a\n"));

        let (_, _, dims) = decode(&bytes);
        let dims = dims.expect("pHYs chunk");
        assert_eq!(dims.xppu, 11811);
        assert_eq!(dims.yppu, 11811);
        assert_eq!(dims.unit, png::Unit::Meter);
    }

    #[test]
    fn test_output_is_cropped_to_content_with_padding() {
        let options = RasterOptions::default();
        let bytes = render_png(&square_document(), &fonts(), &options).unwrap();
        let (info, buf, _) = decode(&bytes);

        // 20pt square plus 7.2pt padding on each side, at 300/72 px per pt.
        let expected = ((20.0 + 2.0 * 7.2) * 300.0 / 72.0_f64).ceil() as u32;
        assert_eq!(info.width, expected);
        assert_eq!(info.height, expected);

        assert_eq!(&buf[..4], &[255, 255, 255, 255]);
        let center = ((info.height / 2 * info.width + info.width / 2) * 4) as usize;
        assert_eq!(&buf[center..center + 4], &[255, 0, 0, 255]);
    }

    #[test]
    fn test_empty_document_renders_blank_background() {
        let document = Document::new()
            .set("width", 72)
            .set("height", 36)
            .set("viewBox", (0, 0, 72, 36));
        let options = RasterOptions {
            dpi: 72,
            ..RasterOptions::default()
        };
        let bytes = render_png(&document, &fonts(), &options).unwrap();
        let (info, buf, dims) = decode(&bytes);
        assert!(info.width >= 1 && info.height >= 1);
        assert!(buf.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
        assert_eq!(dims.map(|d| d.xppu), Some(2835));
    }

    #[test]
    fn test_oversized_content_is_refused() {
        // 20000pt at 300 DPI is over 83000 px wide
        let document = Document::new()
            .set("width", 20000)
            .set("height", 100)
            .set("viewBox", (0, 0, 20000, 100))
            .add(
                Rectangle::new()
                    .set("width", 20000)
                    .set("height", 10)
                    .set("fill", "#000000"),
            );
        let err = render_png(&document, &fonts(), &RasterOptions::default()).unwrap_err();
        assert!(matches!(err, RenderError::ImageTooLarge { width, .. } if width > MAX_SIDE_PIXELS));
    }

    #[test]
    fn test_pixel_budget_is_enforced() {
        let options = RasterOptions {
            max_pixels: 100 * 100,
            ..RasterOptions::default()
        };
        let err = render_png(&square_document(), &fonts(), &options).unwrap_err();
        assert!(matches!(err, RenderError::ImageTooLarge { .. }));
    }

    #[test]
    fn test_checked_size_limits() {
        assert_eq!(checked_size(10.2, 0.0, 1000).unwrap(), (11, 1));
        assert!(checked_size(65536.0, 1.0, u64::MAX).is_ok());
        assert!(checked_size(65537.0, 1.0, u64::MAX).is_err());
        assert!(checked_size(f64::INFINITY, 1.0, u64::MAX).is_err());
        assert!(checked_size(100.0, 100.0, 9999).is_err());
    }

    #[test]
    fn test_missing_font_dirs_are_ignored() {
        let db = load_fonts(&["/nonexistent/fonts"][..]);
        let _ = db.len();
    }
}
