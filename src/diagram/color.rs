use color::{DynamicColor, Rgba8, Srgb};
use std::str::FromStr;

use super::RenderError;

/// CSS color parsed once and written back out as `#rrggbb` plus a separate opacity.
#[derive(Clone, PartialEq, Debug)]
pub struct Color {
    color: DynamicColor,
}

impl Color {
    /// Parse a CSS color string such as `"#ffcccc"`, `"darkred"` or `"wheat"`.
    pub fn new(color_str: &str) -> Result<Self, RenderError> {
        DynamicColor::from_str(color_str)
            .map(|color| Self { color })
            .map_err(|err| RenderError::InvalidColor(format!("'{color_str}': {err}")))
    }

    fn rgba8(&self) -> Rgba8 {
        self.color.to_alpha_color::<Srgb>().to_rgba8()
    }

    /// Opaque hex form used for SVG `fill`/`stroke` attributes.
    pub fn to_hex(&self) -> String {
        let Rgba8 { r, g, b, .. } = self.rgba8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Average of the given colors in sRGB.
    pub fn mix(colors: &[Self]) -> Result<Self, RenderError> {
        if colors.is_empty() {
            return Self::new("black");
        }
        let mut sum = [0u32; 3];
        for color in colors {
            let Rgba8 { r, g, b, .. } = color.rgba8();
            sum[0] += u32::from(r);
            sum[1] += u32::from(g);
            sum[2] += u32::from(b);
        }
        let count = u32::try_from(colors.len()).unwrap_or(u32::MAX);
        let [r, g, b] = sum.map(|channel| channel / count);
        Self::new(&format!("#{r:02x}{g:02x}{b:02x}"))
    }
}

impl From<&Color> for svg::node::Value {
    fn from(color: &Color) -> Self {
        Self::from(color.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_named_and_hex_colors() {
        assert_eq!(Color::new("darkred").unwrap().to_hex(), "#8b0000");
        assert_eq!(Color::new("wheat").unwrap().to_hex(), "#f5deb3");
        assert_eq!(Color::new("#FFE6E6").unwrap().to_hex(), "#ffe6e6");
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let err = Color::new("not-a-color").unwrap_err();
        assert!(matches!(err, RenderError::InvalidColor(_)));
    }

    #[test]
    fn test_mix_of_equal_colors_is_unchanged() {
        let pink = Color::new("#ffcccc").unwrap();
        let mixed = Color::mix(&[pink.clone(), pink.clone(), pink]).unwrap();
        assert_eq!(mixed.to_hex(), "#ffcccc");
    }

    #[test]
    fn test_mix_averages_channels() {
        let mixed = Color::mix(&[Color::new("#000000").unwrap(), Color::new("#ffffff").unwrap()]).unwrap();
        assert_eq!(mixed.to_hex(), "#7f7f7f");
    }
}
