use std::fmt;

/// Lowest percentage that still counts as a pass. It is both the floor of
/// grade D and the cutoff used for the class pass rate.
pub const PASS_PERCENTAGE: f64 = 40.0;

/// Letter grade derived from a percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Grade {
    APlus,
    A,
    BPlus,
    B,
    C,
    D,
    F,
}

/// Lower bounds, highest first. Anything below the last entry is an F.
static THRESHOLDS: &[(f64, Grade)] = &[
    (90.0, Grade::APlus),
    (80.0, Grade::A),
    (70.0, Grade::BPlus),
    (60.0, Grade::B),
    (50.0, Grade::C),
    (PASS_PERCENTAGE, Grade::D),
];

impl Grade {
    pub const ALL: [Grade; 7] = [
        Grade::APlus,
        Grade::A,
        Grade::BPlus,
        Grade::B,
        Grade::C,
        Grade::D,
        Grade::F,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Grade::APlus => "A+",
            Grade::A => "A",
            Grade::BPlus => "B+",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Converts a percentage (0–100) into a letter grade.
///
/// | Range       | Grade |
/// |-------------|-------|
/// | >= 90       | A+    |
/// | >= 80       | A     |
/// | >= 70       | B+    |
/// | >= 60       | B     |
/// | >= 50       | C     |
/// | >= 40       | D     |
/// | < 40        | F     |
///
/// Total over `f64`; NaN compares below every threshold and maps to F.
pub fn classify(percentage: f64) -> Grade {
    THRESHOLDS
        .iter()
        .find(|(floor, _)| percentage >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::F)
}
