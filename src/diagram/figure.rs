//! Request-scoped drawing context.
//!
//! A [`Figure`] collects the artists of one diagram and composes them into an SVG
//! document measured in points (1/72 in). Each request owns its own figure and
//! drops it on return, so no drawing state outlives the request that built it.

use std::borrow::Cow;

use svg::node::element as svg_element;
use svg::Document;

use super::color::Color;
use super::geometry::{Bounds, Circle, Point};
use super::venn::{FontWeight, HAlign, Label, VAlign, Venn3, Venn3Circles};

pub const POINTS_PER_INCH: f64 = 72.0;

// Default subplot box, as fractions of the figure size (bottom-up).
const AXES_LEFT: f64 = 0.125;
const AXES_RIGHT: f64 = 0.9;
const AXES_BOTTOM: f64 = 0.11;
const AXES_TOP: f64 = 0.88;

/// Extra room around the normalized `[-1, 1]` diagram box.
const DATA_MARGIN: f64 = 0.1;
const LINE_SPACING: f64 = 1.2;
/// Average glyph advance of a sans-serif face, in ems. Only used to size text boxes.
const AVG_CHAR_WIDTH_EM: f64 = 0.6;
const TEXT_COLOR: &str = "#000000";

/// Rounded box drawn behind a text block.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub face_color: Color,
    pub edge_color: Color,
    pub edge_width: f64,
    pub alpha: f32,
    /// Padding around the text, in multiples of the font size.
    pub pad: f64,
}

/// Free text placed in diagram coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct TextArtist {
    pub text: String,
    pub position: Point,
    pub font_size: f64,
    pub font_weight: FontWeight,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub text_box: Option<TextBox>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
    /// Gap between the top of the axes box and the title baseline, in points.
    pub pad: f64,
}

/// Maps normalized diagram coordinates (y up) onto figure points (y down).
#[derive(Debug, Clone, Copy)]
struct DataTransform {
    origin: Point,
    scale: f64,
}

impl DataTransform {
    fn apply(self, p: Point) -> Point {
        Point::new(
            p.x().mul_add(self.scale, self.origin.x()),
            (-p.y()).mul_add(self.scale, self.origin.y()),
        )
    }

    fn circle(self, circle: &Circle) -> Circle {
        Circle::new(self.apply(circle.center()), circle.radius() * self.scale)
    }
}

#[derive(Debug)]
pub struct Figure {
    width_in: f64,
    height_in: f64,
    font_family: String,
    venns: Vec<Venn3>,
    outlines: Vec<Venn3Circles>,
    texts: Vec<TextArtist>,
    title: Option<Title>,
}

impl Figure {
    pub fn new(width_in: f64, height_in: f64, font_family: &str) -> Self {
        Self {
            width_in,
            height_in,
            font_family: font_family.to_string(),
            venns: Vec::new(),
            outlines: Vec::new(),
            texts: Vec::new(),
            title: None,
        }
    }

    pub fn add_venn(&mut self, venn: Venn3) {
        self.venns.push(venn);
    }

    pub fn add_outline(&mut self, outline: Venn3Circles) {
        self.outlines.push(outline);
    }

    pub fn add_text(&mut self, text: TextArtist) {
        self.texts.push(text);
    }

    pub fn set_title(&mut self, title: Title) {
        self.title = Some(title);
    }

    pub fn venns(&self) -> &[Venn3] {
        &self.venns
    }

    pub fn outlines(&self) -> &[Venn3Circles] {
        &self.outlines
    }

    pub fn texts(&self) -> &[TextArtist] {
        &self.texts
    }

    pub const fn title(&self) -> Option<&Title> {
        self.title.as_ref()
    }

    fn size_pt(&self) -> (f64, f64) {
        (
            self.width_in * POINTS_PER_INCH,
            self.height_in * POINTS_PER_INCH,
        )
    }

    fn axes_bounds(&self) -> Bounds {
        let (width, height) = self.size_pt();
        Bounds::new(
            width * AXES_LEFT,
            height * (1.0 - AXES_TOP),
            width * AXES_RIGHT,
            height * (1.0 - AXES_BOTTOM),
        )
    }

    fn data_transform(&self) -> DataTransform {
        let axes = self.axes_bounds();
        let side = axes.width().min(axes.height());
        DataTransform {
            origin: axes.center(),
            scale: side / (2.0 * (1.0 + DATA_MARGIN)),
        }
    }

    /// Compose every artist into one SVG document.
    ///
    /// Layers are painted bottom-up: region patches, outlines, then all text.
    pub fn to_svg(&self) -> Document {
        let (width, height) = self.size_pt();
        let transform = self.data_transform();

        let mut defs = svg_element::Definitions::new();
        let mut patches = svg_element::Group::new().set("id", "patches");
        let mut outlines = svg_element::Group::new().set("id", "outlines");
        let mut texts = svg_element::Group::new().set("id", "texts");

        for (index, venn) in self.venns.iter().enumerate() {
            let prefix = format!("venn{index}");
            let circles = venn.layout().circles().each_ref().map(|c| transform.circle(c));
            defs = add_region_defs(defs, &prefix, &circles);
            for patch in venn.patches() {
                patches = patches.add(region_node(&prefix, patch, &circles));
            }
            for label in venn.labels().iter().chain(venn.set_labels()) {
                texts = texts.add(self.label_node(label, transform));
            }
        }

        for outline in &self.outlines {
            let style = outline.style();
            for circle in outline.layout().circles() {
                let circle = transform.circle(circle);
                let mut node = svg_element::Circle::new()
                    .set("cx", circle.center().x())
                    .set("cy", circle.center().y())
                    .set("r", circle.radius())
                    .set("fill", "none")
                    .set("stroke", &style.color)
                    .set("stroke-width", style.line_width);
                if let Some(dasharray) = style.line_style.dasharray(style.line_width) {
                    node = node.set("stroke-dasharray", dasharray);
                }
                outlines = outlines.add(node);
            }
        }

        for text in &self.texts {
            texts = texts.add(self.text_artist_node(text, transform));
        }

        if let Some(title) = &self.title {
            let axes = self.axes_bounds();
            let anchor = Point::new(axes.center().x(), axes.min_y() - title.pad);
            texts = texts.add(self.text_block(
                &title.text,
                anchor,
                title.font_size,
                title.font_weight,
                HAlign::Center,
                VAlign::Bottom,
            ));
        }

        Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (0.0, 0.0, width, height))
            .add(defs)
            .add(patches)
            .add(outlines)
            .add(texts)
    }

    fn label_node(&self, label: &Label, transform: DataTransform) -> svg_element::Group {
        self.text_block(
            label.text(),
            transform.apply(label.position()),
            label.font_size(),
            label.font_weight(),
            label.h_align(),
            label.v_align(),
        )
    }

    fn text_artist_node(&self, text: &TextArtist, transform: DataTransform) -> svg_element::Group {
        let anchor = transform.apply(text.position);
        let block = self.text_block(
            &text.text,
            anchor,
            text.font_size,
            text.font_weight,
            text.h_align,
            text.v_align,
        );

        let Some(text_box) = &text.text_box else {
            return block;
        };

        let extent = text_extent(&text.text, anchor, text.font_size, text.h_align, text.v_align);
        let pad = text_box.pad * text.font_size;
        let frame = extent.expand(pad);
        let background = svg_element::Rectangle::new()
            .set("x", frame.min_x())
            .set("y", frame.min_y())
            .set("width", frame.width())
            .set("height", frame.height())
            .set("rx", pad)
            .set("ry", pad)
            .set("fill", &text_box.face_color)
            .set("fill-opacity", text_box.alpha)
            .set("stroke", &text_box.edge_color)
            .set("stroke-opacity", text_box.alpha)
            .set("stroke-width", text_box.edge_width);

        svg_element::Group::new().add(background).add(block)
    }

    /// One `<text>` per line, stacked around `anchor` according to the alignment.
    fn text_block(
        &self,
        text: &str,
        anchor: Point,
        font_size: f64,
        font_weight: FontWeight,
        h_align: HAlign,
        v_align: VAlign,
    ) -> svg_element::Group {
        let extent = text_extent(text, anchor, font_size, h_align, v_align);
        let line_height = font_size * LINE_SPACING;

        let mut group = svg_element::Group::new()
            .set("font-family", format!("{}, sans-serif", self.font_family))
            .set("font-size", font_size)
            .set("font-weight", font_weight.as_css())
            .set("fill", TEXT_COLOR)
            .set("text-anchor", h_align.text_anchor());

        for (i, line) in text.split('\n').enumerate() {
            #[allow(clippy::cast_precision_loss)]
            let center_y = (i as f64 + 0.5).mul_add(line_height, extent.min_y());
            group = group.add(
                svg_element::Text::new(xml_text(line))
                    .set("x", anchor.x())
                    .set("y", center_y)
                    .set("dominant-baseline", "central"),
            );
        }

        group
    }
}

/// Characters XML 1.0 can carry, escaped or not.
const fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | ' '..='\u{fffd}' | '\u{10000}'..='\u{10ffff}')
}

/// Drop characters that would make the document unparseable.
fn xml_text(line: &str) -> Cow<'_, str> {
    if line.chars().all(is_xml_char) {
        Cow::Borrowed(line)
    } else {
        Cow::Owned(line.chars().filter(|&c| is_xml_char(c)).collect())
    }
}

/// Estimated box covered by a text block anchored at `anchor`.
fn text_extent(text: &str, anchor: Point, font_size: f64, h_align: HAlign, v_align: VAlign) -> Bounds {
    let lines: Vec<&str> = text.split('\n').collect();
    let longest = lines.iter().map(|line| line.chars().count()).max().unwrap_or(0);

    #[allow(clippy::cast_precision_loss)]
    let width = longest as f64 * font_size * AVG_CHAR_WIDTH_EM;
    #[allow(clippy::cast_precision_loss)]
    let height = lines.len() as f64 * font_size * LINE_SPACING;

    let min_x = match h_align {
        HAlign::Left => anchor.x(),
        HAlign::Center => anchor.x() - width / 2.0,
        HAlign::Right => anchor.x() - width,
    };
    let min_y = match v_align {
        VAlign::Top => anchor.y(),
        VAlign::Center => anchor.y() - height / 2.0,
        VAlign::Bottom => anchor.y() - height,
    };

    Bounds::new(min_x, min_y, min_x + width, min_y + height)
}

/// Clip paths (keep inside a circle) and masks (keep outside a circle) for every set.
fn add_region_defs(
    mut defs: svg_element::Definitions,
    prefix: &str,
    circles: &[Circle; 3],
) -> svg_element::Definitions {
    let [a, b, c] = circles;
    let area = a.bounds().merge(&b.bounds()).merge(&c.bounds()).expand(1.0);

    for (set, circle) in circles.iter().enumerate() {
        let clip = svg_element::ClipPath::new()
            .set("id", format!("{prefix}-clip-{set}"))
            .add(circle_node(circle));

        let mask = svg_element::Mask::new()
            .set("id", format!("{prefix}-mask-{set}"))
            .set("maskUnits", "userSpaceOnUse")
            .set("x", area.min_x())
            .set("y", area.min_y())
            .set("width", area.width())
            .set("height", area.height())
            .add(
                svg_element::Rectangle::new()
                    .set("x", area.min_x())
                    .set("y", area.min_y())
                    .set("width", area.width())
                    .set("height", area.height())
                    .set("fill", "#ffffff"),
            )
            .add(circle_node(circle).set("fill", "#000000"));

        defs = defs.add(clip).add(mask);
    }

    defs
}

/// A region is its first member circle, clipped to the other member circles and
/// masked out of the non-member ones.
fn region_node(prefix: &str, patch: &super::venn::Patch, circles: &[Circle; 3]) -> svg_element::Group {
    let region = patch.region();
    let membership = region.membership();
    let base = membership.iter().position(|inside| *inside).unwrap_or(0);

    let shape = circle_node(&circles[base])
        .set("fill", patch.color())
        .set("fill-opacity", patch.alpha())
        .set("stroke", "none");
    let mut node = svg_element::Group::new().add(shape);

    for (set, inside) in membership.iter().enumerate() {
        if set == base {
            continue;
        }
        node = if *inside {
            svg_element::Group::new()
                .set("clip-path", format!("url(#{prefix}-clip-{set})"))
                .add(node)
        } else {
            svg_element::Group::new()
                .set("mask", format!("url(#{prefix}-mask-{set})"))
                .add(node)
        };
    }

    node.set("id", format!("{prefix}-region-{}", region.id()))
}

fn circle_node(circle: &Circle) -> svg_element::Circle {
    svg_element::Circle::new()
        .set("cx", circle.center().x())
        .set("cy", circle.center().y())
        .set("r", circle.radius())
}
