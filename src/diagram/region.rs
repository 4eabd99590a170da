/// One of the seven disjoint areas formed by three overlapping sets A, B and C.
///
/// The discriminant order is the positional order of subset sizes handed to the
/// renderer: A, B, C, A∩B, A∩C, B∩C, A∩B∩C.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    OnlyA,
    OnlyB,
    OnlyC,
    OnlyAB,
    OnlyAC,
    OnlyBC,
    AllThree,
}

impl Region {
    pub const ALL: [Self; 7] = [
        Self::OnlyA,
        Self::OnlyB,
        Self::OnlyC,
        Self::OnlyAB,
        Self::OnlyAC,
        Self::OnlyBC,
        Self::AllThree,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    /// Which of the sets (A, B, C) this region lies inside.
    pub const fn membership(self) -> [bool; 3] {
        match self {
            Self::OnlyA => [true, false, false],
            Self::OnlyB => [false, true, false],
            Self::OnlyC => [false, false, true],
            Self::OnlyAB => [true, true, false],
            Self::OnlyAC => [true, false, true],
            Self::OnlyBC => [false, true, true],
            Self::AllThree => [true, true, true],
        }
    }

    /// Membership bit string, e.g. `"110"` for A∩B.
    pub const fn id(self) -> &'static str {
        match self {
            Self::OnlyA => "100",
            Self::OnlyB => "010",
            Self::OnlyC => "001",
            Self::OnlyAB => "110",
            Self::OnlyAC => "101",
            Self::OnlyBC => "011",
            Self::AllThree => "111",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|region| region.id() == id)
    }

    pub fn from_membership(membership: [bool; 3]) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|region| region.membership() == membership)
    }
}
