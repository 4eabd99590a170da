use crate::diagram::FontWeight;

/// Names shown per region before the rest collapse into an overflow line.
pub const MAX_NAMES_SHOWN: usize = 6;

const NAMED_FONT_SIZE: f64 = 9.0;
const ORDINAL_FONT_SIZE: f64 = 12.0;

#[derive(Debug, Clone, PartialEq)]
pub struct RegionLabel {
    pub text: String,
    pub font_size: f64,
    pub font_weight: FontWeight,
}

/// One name per line, at most `max_names`, then `(+K más)` for the rest.
pub fn format_names(names: &[String], max_names: usize) -> String {
    let mut lines: Vec<String> = names.iter().take(max_names).cloned().collect();
    if names.len() > max_names {
        lines.push(format!("(+{} más)", names.len() - max_names));
    }
    lines.join("\n")
}

/// Text for a region: the ordinal alone when empty, otherwise the ordinal
/// followed by the member names in a smaller face.
pub fn region_label(ordinal: u8, names: &[String]) -> RegionLabel {
    if names.is_empty() {
        RegionLabel {
            text: ordinal.to_string(),
            font_size: ORDINAL_FONT_SIZE,
            font_weight: FontWeight::Bold,
        }
    } else {
        RegionLabel {
            text: format!("{ordinal}\n{}", format_names(names, MAX_NAMES_SHOWN)),
            font_size: NAMED_FONT_SIZE,
            font_weight: FontWeight::Bold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(count: usize) -> Vec<String> {
        (1..=count).map(|i| format!("S{i}")).collect()
    }

    #[test]
    fn test_format_names_within_limit() {
        assert_eq!(format_names(&names(0), 6), "");
        assert_eq!(format_names(&names(2), 6), "S1\nS2");
        assert_eq!(format_names(&names(6), 6), "S1\nS2\nS3\nS4\nS5\nS6");
    }

    #[test]
    fn test_format_names_overflow() {
        assert_eq!(
            format_names(&names(9), 6),
            "S1\nS2\nS3\nS4\nS5\nS6\n(+3 más)"
        );
        assert_eq!(format_names(&names(7), 6).lines().last(), Some("(+1 más)"));
    }

    #[test]
    fn test_empty_region_shows_bare_ordinal() {
        let label = region_label(5, &[]);
        assert_eq!(label.text, "5");
        assert!((label.font_size - 12.0).abs() < f64::EPSILON);
        assert_eq!(label.font_weight, FontWeight::Bold);
    }

    #[test]
    fn test_named_region_shows_ordinal_then_names() {
        let label = region_label(4, &["B".to_string(), "C".to_string()]);
        assert_eq!(label.text, "4\nB\nC");
        assert!((label.font_size - 9.0).abs() < f64::EPSILON);

        let crowded = region_label(1, &names(10));
        assert_eq!(crowded.text.lines().count(), 1 + MAX_NAMES_SHOWN + 1);
        assert!(crowded.text.ends_with("(+4 más)"));
    }
}
