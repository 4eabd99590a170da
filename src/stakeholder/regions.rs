use std::fmt;

use crate::diagram::Region;

/// Salience level printed next to each category in the legend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Low,
    Medium,
    High,
}

impl Level {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "baja",
            Self::Medium => "media",
            Self::High => "alta",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One stakeholder category and the diagram region it occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub region: Region,
    pub ordinal: u8,
    pub name: &'static str,
    pub level: Level,
}

/// Every category, in ordinal order.
pub const CATEGORIES: [Category; 7] = [
    Category {
        region: Region::OnlyA,
        ordinal: 1,
        name: "Inactivo",
        level: Level::Low,
    },
    Category {
        region: Region::OnlyB,
        ordinal: 2,
        name: "Discrecional",
        level: Level::Low,
    },
    Category {
        region: Region::OnlyC,
        ordinal: 3,
        name: "Demandante",
        level: Level::Low,
    },
    Category {
        region: Region::OnlyAB,
        ordinal: 4,
        name: "Dominante",
        level: Level::Medium,
    },
    Category {
        region: Region::OnlyAC,
        ordinal: 5,
        name: "Peligroso",
        level: Level::Medium,
    },
    Category {
        region: Region::OnlyBC,
        ordinal: 6,
        name: "Dependiente",
        level: Level::Medium,
    },
    Category {
        region: Region::AllThree,
        ordinal: 7,
        name: "Críticos",
        level: Level::High,
    },
];

/// Legend block listing every category with its ordinal and level.
pub fn legend_text() -> String {
    let mut text = String::from("Categorías:");
    for category in &CATEGORIES {
        text.push_str(&format!(
            "\n{}: {} - {}",
            category.ordinal, category.name, category.level
        ));
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_follows_region_order() {
        for (i, category) in CATEGORIES.iter().enumerate() {
            assert_eq!(category.region.index(), i);
            assert_eq!(usize::from(category.ordinal), i + 1);
        }
    }

    #[test]
    fn test_membership_ids() {
        let ids: Vec<&str> = CATEGORIES.iter().map(|c| c.region.id()).collect();
        assert_eq!(ids, ["100", "010", "001", "110", "101", "011", "111"]);
    }

    #[test]
    fn test_legend_text() {
        let expected = "Categorías:\n\
                        1: Inactivo - baja\n\
                        2: Discrecional - baja\n\
                        3: Demandante - baja\n\
                        4: Dominante - media\n\
                        5: Peligroso - media\n\
                        6: Dependiente - media\n\
                        7: Críticos - alta";
        assert_eq!(legend_text(), expected);
    }
}
