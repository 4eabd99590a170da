//! Three-set overlap diagrams: layout, SVG composition and PNG output.

pub mod color;
pub mod figure;
pub mod geometry;
pub mod layout;
pub mod raster;
pub mod region;
pub mod venn;

pub use color::Color;
pub use figure::{Figure, TextArtist, TextBox, Title};
pub use layout::{solve_venn3, Subsets, Venn3Layout};
pub use raster::{load_fonts, render_png, RasterOptions};
pub use region::Region;
pub use venn::{FontWeight, HAlign, Label, LineStyle, OutlineStyle, VAlign, Venn3, Venn3Circles};

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("invalid color {0}")]
    InvalidColor(String),
    #[error("failed to parse generated SVG: {0}")]
    SvgParse(#[from] usvg::Error),
    #[error("rendered image of {width}x{height} pixels exceeds the size limit")]
    ImageTooLarge { width: u64, height: u64 },
    #[error("failed to allocate {width}x{height} pixmap")]
    PixmapAlloc { width: u32, height: u32 },
    #[error("failed to encode PNG: {0}")]
    PngEncode(#[from] png::EncodingError),
}
