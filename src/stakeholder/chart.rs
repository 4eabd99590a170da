//! The stakeholder salience chart: three overlapping attribute sets with the
//! stakeholders of each region listed inside it, a category legend and a title.

use std::sync::Arc;

use usvg::fontdb;

use super::labels::region_label;
use super::payload::Categories;
use super::regions::{legend_text, CATEGORIES};
use crate::diagram::geometry::Point;
use crate::diagram::{
    render_png, Color, Figure, FontWeight, HAlign, LineStyle, OutlineStyle, RasterOptions,
    RenderError, TextArtist, TextBox, Title, VAlign, Venn3, Venn3Circles,
};

pub const SET_LABELS: [&str; 3] = ["Poder", "Legitimidad", "Urgencia"];
pub const TITLE: &str = "Análisis de Preponderancia de Stakeholders";

const SET_COLOR: &str = "#ffcccc";
const PATCH_COLOR: &str = "#ffe6e6";
const PATCH_ALPHA: f32 = 0.5;

const OUTLINE_COLOR: &str = "darkred";
const OUTLINE_WIDTH: f64 = 2.5;

const LEGEND_POSITION: Point = Point::new(1.3, 0.5);
const LEGEND_FONT_SIZE: f64 = 11.0;
const LEGEND_FACE_COLOR: &str = "wheat";
const LEGEND_EDGE_COLOR: &str = "black";
const LEGEND_ALPHA: f32 = 0.3;
const LEGEND_PAD: f64 = 0.3;

const TITLE_FONT_SIZE: f64 = 16.0;
const TITLE_PAD: f64 = 20.0;

/// Page size and output settings for one chart.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width_in: f64,
    pub height_in: f64,
    pub raster: RasterOptions,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width_in: 14.0,
            height_in: 10.0,
            raster: RasterOptions::default(),
        }
    }
}

/// Compose the chart for `categories` into a fresh figure.
pub fn build_figure(categories: &Categories, options: &ChartOptions) -> Result<Figure, RenderError> {
    let subsets = categories.subsets();
    let set_color = Color::new(SET_COLOR)?;

    let mut venn = Venn3::new(
        subsets,
        SET_LABELS,
        [set_color.clone(), set_color.clone(), set_color],
        PATCH_ALPHA,
    )?;

    let outline = Venn3Circles::new(
        subsets,
        OutlineStyle {
            color: Color::new(OUTLINE_COLOR)?,
            line_width: OUTLINE_WIDTH,
            line_style: LineStyle::Solid,
        },
    );

    for category in &CATEGORIES {
        let text = region_label(category.ordinal, categories.bucket(category.region));
        let label = venn.label_mut(category.region);
        label.set_text(text.text);
        label.set_font_size(text.font_size);
        label.set_font_weight(text.font_weight);
    }

    let patch_color = Color::new(PATCH_COLOR)?;
    for category in &CATEGORIES {
        venn.patch_mut(category.region).set_color(patch_color.clone());
    }

    let mut figure = Figure::new(options.width_in, options.height_in, &options.raster.font_family);
    figure.add_venn(venn);
    figure.add_outline(outline);
    figure.add_text(TextArtist {
        text: legend_text(),
        position: LEGEND_POSITION,
        font_size: LEGEND_FONT_SIZE,
        font_weight: FontWeight::Normal,
        h_align: HAlign::Left,
        v_align: VAlign::Center,
        text_box: Some(TextBox {
            face_color: Color::new(LEGEND_FACE_COLOR)?,
            edge_color: Color::new(LEGEND_EDGE_COLOR)?,
            edge_width: 1.0,
            alpha: LEGEND_ALPHA,
            pad: LEGEND_PAD,
        }),
    });
    figure.set_title(Title {
        text: TITLE.to_string(),
        font_size: TITLE_FONT_SIZE,
        font_weight: FontWeight::Bold,
        pad: TITLE_PAD,
    });

    Ok(figure)
}

/// Build and rasterize the chart. The figure lives only for this call.
pub fn render_chart(
    categories: &Categories,
    options: &ChartOptions,
    fonts: &Arc<fontdb::Database>,
) -> Result<Vec<u8>, RenderError> {
    let figure = build_figure(categories, options)?;
    render_png(&figure.to_svg(), fonts, &options.raster)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::Region;

    fn sample() -> Categories {
        Categories {
            inactive: vec!["A".to_string()],
            dominant: vec!["B".to_string(), "C".to_string()],
            ..Categories::default()
        }
    }

    fn label_texts(figure: &Figure) -> Vec<String> {
        figure.venns()[0]
            .labels()
            .iter()
            .map(|label| label.text().to_string())
            .collect()
    }

    #[test]
    fn test_region_labels_show_members() {
        let figure = build_figure(&sample(), &ChartOptions::default()).unwrap();
        assert_eq!(
            label_texts(&figure),
            ["1\nA", "2", "3", "4\nB\nC", "5", "6", "7"]
        );

        let venn = &figure.venns()[0];
        assert!((venn.label(Region::OnlyA).font_size() - 9.0).abs() < f64::EPSILON);
        assert!((venn.label(Region::OnlyB).font_size() - 12.0).abs() < f64::EPSILON);
        assert!(venn
            .labels()
            .iter()
            .all(|label| label.font_weight() == FontWeight::Bold));
    }

    #[test]
    fn test_labels_sit_in_their_own_regions() {
        let figure = build_figure(&sample(), &ChartOptions::default()).unwrap();
        let venn = &figure.venns()[0];
        for region in Region::ALL {
            let label = venn.label(region);
            assert_eq!(venn.layout().classify(label.position()), Some(region), "{region:?}");
        }
        assert_eq!(venn.label(Region::OnlyA).text(), "1\nA");
    }

    #[test]
    fn test_empty_input_shows_bare_ordinals() {
        let figure = build_figure(&Categories::default(), &ChartOptions::default()).unwrap();
        assert_eq!(label_texts(&figure), ["1", "2", "3", "4", "5", "6", "7"]);
        assert_eq!(figure.venns()[0].subsets(), &[0; 7]);
    }

    #[test]
    fn test_cardinalities_feed_both_layers() {
        let categories = sample();
        let figure = build_figure(&categories, &ChartOptions::default()).unwrap();
        assert_eq!(figure.venns()[0].subsets(), &[1, 0, 0, 2, 0, 0, 0]);
        assert_eq!(figure.venns()[0].layout(), figure.outlines()[0].layout());
        assert_eq!(figure.outlines()[0].style().color.to_hex(), "#8b0000");
    }

    #[test]
    fn test_patches_recolored_and_set_labels_fixed() {
        let figure = build_figure(&sample(), &ChartOptions::default()).unwrap();
        let venn = &figure.venns()[0];
        assert!(venn.patches().iter().all(|patch| patch.color().to_hex() == "#ffe6e6"));
        assert!(venn
            .patches()
            .iter()
            .all(|patch| (patch.alpha() - 0.5).abs() < f32::EPSILON));
        let set_labels: Vec<&str> = venn.set_labels().iter().map(|label| label.text()).collect();
        assert_eq!(set_labels, SET_LABELS);
    }

    #[test]
    fn test_legend_and_title() {
        let figure = build_figure(&sample(), &ChartOptions::default()).unwrap();
        let legend = &figure.texts()[0];
        assert!(legend.text.starts_with("Categorías:\n1: Inactivo - baja"));
        assert_eq!(legend.v_align, VAlign::Center);
        assert!(legend.text_box.is_some());
        assert_eq!(figure.title().map(|title| title.text.as_str()), Some(TITLE));
    }

    #[test]
    fn test_render_chart_produces_png() {
        let fonts = Arc::new(fontdb::Database::new());
        let options = ChartOptions {
            raster: RasterOptions {
                dpi: 30,
                ..RasterOptions::default()
            },
            ..ChartOptions::default()
        };
        let png = render_chart(&sample(), &options, &fonts).unwrap();
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
    }

    #[test]
    fn test_oversized_chart_is_an_error() {
        let fonts = Arc::new(fontdb::Database::new());
        let options = ChartOptions {
            width_in: 400.0,
            height_in: 400.0,
            ..ChartOptions::default()
        };
        let err = render_chart(&sample(), &options, &fonts).unwrap_err();
        assert!(matches!(err, RenderError::ImageTooLarge { .. }));
    }

    #[test]
    fn test_control_characters_in_names_still_render() {
        let fonts = Arc::new(fontdb::Database::new());
        let categories = Categories {
            inactive: vec!["Ana\u{1}Gómez".to_string(), "\u{0}\u{1f}\u{ffff}".to_string()],
            ..Categories::default()
        };
        let options = ChartOptions {
            raster: RasterOptions {
                dpi: 30,
                ..RasterOptions::default()
            },
            ..ChartOptions::default()
        };
        let png = render_chart(&categories, &options, &fonts).unwrap();
        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
    }
}
