//! Three-set overlap diagram model: region patches, region labels and set labels.
//!
//! `Venn3` is the fill layer and `Venn3Circles` the outline layer. Both take the
//! same subset sizes and lay them out with [`solve_venn3`], so drawing them
//! together lines up exactly.

use super::color::Color;
use super::geometry::Point;
use super::layout::{solve_venn3, Subsets, Venn3Layout};
use super::region::Region;
use super::RenderError;

const DEFAULT_LABEL_FONT_SIZE: f64 = 10.0;
const SET_LABEL_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontWeight {
    Normal,
    Bold,
}

impl FontWeight {
    pub const fn as_css(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Bold => "bold",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

impl HAlign {
    pub const fn text_anchor(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Center,
    Bottom,
}

/// Text anchored at a point in diagram coordinates. Multi-line via `'\n'`.
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    text: String,
    position: Point,
    font_size: f64,
    font_weight: FontWeight,
    h_align: HAlign,
    v_align: VAlign,
}

impl Label {
    fn new(text: String, position: Point) -> Self {
        Self {
            text,
            position,
            font_size: DEFAULT_LABEL_FONT_SIZE,
            font_weight: FontWeight::Normal,
            h_align: HAlign::Center,
            v_align: VAlign::Center,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub const fn position(&self) -> Point {
        self.position
    }

    pub const fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.font_size = size;
    }

    pub const fn font_weight(&self) -> FontWeight {
        self.font_weight
    }

    pub fn set_font_weight(&mut self, weight: FontWeight) {
        self.font_weight = weight;
    }

    pub const fn h_align(&self) -> HAlign {
        self.h_align
    }

    pub const fn v_align(&self) -> VAlign {
        self.v_align
    }
}

/// Filled area of one region.
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    region: Region,
    color: Color,
    alpha: f32,
}

impl Patch {
    pub const fn region(&self) -> Region {
        self.region
    }

    pub const fn color(&self) -> &Color {
        &self.color
    }

    pub fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    pub const fn alpha(&self) -> f32 {
        self.alpha
    }
}

/// Fill layer: one patch and one label per region plus the three set labels.
#[derive(Debug, Clone)]
pub struct Venn3 {
    subsets: Subsets,
    layout: Venn3Layout,
    patches: Vec<Patch>,
    labels: Vec<Label>,
    set_labels: Vec<Label>,
}

impl Venn3 {
    /// Lay out the diagram and create default patches and labels.
    ///
    /// Each patch is the mix of the colors of the sets it belongs to. Each
    /// region label defaults to its subset size.
    pub fn new(
        subsets: Subsets,
        set_labels: [&str; 3],
        set_colors: [Color; 3],
        alpha: f32,
    ) -> Result<Self, RenderError> {
        let layout = solve_venn3(&subsets);

        let patches = Region::ALL
            .iter()
            .map(|region| {
                let colors: Vec<Color> = set_colors
                    .iter()
                    .zip(region.membership())
                    .filter(|(_, inside)| *inside)
                    .map(|(color, _)| color.clone())
                    .collect();
                Ok(Patch {
                    region: *region,
                    color: Color::mix(&colors)?,
                    alpha,
                })
            })
            .collect::<Result<Vec<_>, RenderError>>()?;

        let labels = Region::ALL
            .iter()
            .map(|region| {
                Label::new(
                    subsets[region.index()].to_string(),
                    layout.label_position(*region),
                )
            })
            .collect();

        let set_labels = Self::place_set_labels(&layout, set_labels);

        Ok(Self {
            subsets,
            layout,
            patches,
            labels,
            set_labels,
        })
    }

    /// A above-left, B above-right, C centered below its circle.
    fn place_set_labels(layout: &Venn3Layout, texts: [&str; 3]) -> Vec<Label> {
        let [a, b, c] = layout.circles();
        let placements = [
            (
                a.center().add_point(Point::new(-a.radius() / 2.0, a.radius())),
                HAlign::Right,
                VAlign::Bottom,
            ),
            (
                b.center().add_point(Point::new(b.radius() / 2.0, b.radius())),
                HAlign::Left,
                VAlign::Bottom,
            ),
            (
                c.center().add_point(Point::new(0.0, -c.radius() * 1.1)),
                HAlign::Center,
                VAlign::Top,
            ),
        ];

        texts
            .iter()
            .zip(placements)
            .map(|(text, (position, h_align, v_align))| Label {
                text: (*text).to_string(),
                position,
                font_size: SET_LABEL_FONT_SIZE,
                font_weight: FontWeight::Normal,
                h_align,
                v_align,
            })
            .collect()
    }

    pub const fn subsets(&self) -> &Subsets {
        &self.subsets
    }

    pub const fn layout(&self) -> &Venn3Layout {
        &self.layout
    }

    pub fn patches(&self) -> &[Patch] {
        &self.patches
    }

    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    pub fn set_labels(&self) -> &[Label] {
        &self.set_labels
    }

    pub fn label(&self, region: Region) -> &Label {
        &self.labels[region.index()]
    }

    pub fn label_mut(&mut self, region: Region) -> &mut Label {
        &mut self.labels[region.index()]
    }

    pub fn patch_mut(&mut self, region: Region) -> &mut Patch {
        &mut self.patches[region.index()]
    }

    /// Look up a region label by membership id such as `"110"`.
    pub fn label_by_id(&mut self, id: &str) -> Option<&mut Label> {
        Region::from_id(id).map(|region| self.label_mut(region))
    }

    /// Look up a region patch by membership id such as `"110"`.
    pub fn patch_by_id(&mut self, id: &str) -> Option<&mut Patch> {
        Region::from_id(id).map(|region| self.patch_mut(region))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    Solid,
    Dashed,
    Dotted,
}

impl LineStyle {
    /// SVG `stroke-dasharray` scaled to `line_width`, `None` for solid lines.
    pub fn dasharray(self, line_width: f64) -> Option<String> {
        match self {
            Self::Solid => None,
            Self::Dashed => Some(format!("{} {}", line_width * 3.7, line_width * 1.6)),
            Self::Dotted => Some(format!("{} {}", line_width, line_width * 1.65)),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutlineStyle {
    pub color: Color,
    pub line_width: f64,
    pub line_style: LineStyle,
}

/// Outline layer: the three circle borders, with no fill.
#[derive(Debug, Clone)]
pub struct Venn3Circles {
    layout: Venn3Layout,
    style: OutlineStyle,
}

impl Venn3Circles {
    pub fn new(subsets: Subsets, style: OutlineStyle) -> Self {
        Self {
            layout: solve_venn3(&subsets),
            style,
        }
    }

    pub const fn layout(&self) -> &Venn3Layout {
        &self.layout
    }

    pub const fn style(&self) -> &OutlineStyle {
        &self.style
    }
}
