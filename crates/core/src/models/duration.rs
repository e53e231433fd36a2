use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// How long the owner expects to keep a position.
///
/// The four labels are the only values the hold-duration selector offers.
/// They use an en dash (`1–3 years`), exactly as they are stored in the CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HoldDuration {
    #[serde(rename = "< 1 year")]
    UnderOneYear,
    #[serde(rename = "1–3 years")]
    OneToThreeYears,
    #[serde(rename = "3–5 years")]
    ThreeToFiveYears,
    #[serde(rename = "5+ years")]
    FivePlusYears,
}

impl HoldDuration {
    /// All choices in selector order. The first one is the fallback selection.
    pub const ALL: [HoldDuration; 4] = [
        HoldDuration::UnderOneYear,
        HoldDuration::OneToThreeYears,
        HoldDuration::ThreeToFiveYears,
        HoldDuration::FivePlusYears,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            HoldDuration::UnderOneYear => "< 1 year",
            HoldDuration::OneToThreeYears => "1–3 years",
            HoldDuration::ThreeToFiveYears => "3–5 years",
            HoldDuration::FivePlusYears => "5+ years",
        }
    }

    /// Position of this choice in [`HoldDuration::ALL`].
    pub fn index(&self) -> usize {
        Self::ALL
            .iter()
            .position(|d| d == self)
            .unwrap_or_default()
    }

    /// Exact match against a stored label. Surrounding whitespace is ignored,
    /// nothing else is normalized.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL.into_iter().find(|d| d.label() == label)
    }

    /// The choice the selector shows for a stored value: the matching
    /// label, or the first choice when the stored value is absent or unknown.
    pub fn preselect(stored: Option<&str>) -> Self {
        stored
            .and_then(Self::from_label)
            .unwrap_or(Self::ALL[0])
    }
}

impl Default for HoldDuration {
    fn default() -> Self {
        Self::ALL[0]
    }
}

impl std::fmt::Display for HoldDuration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Lenient parsing for typed input: the exact label, the label with an ASCII
/// hyphen in place of the en dash, or a 1-based choice number.
impl std::str::FromStr for HoldDuration {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<usize>() {
            return n
                .checked_sub(1)
                .and_then(|i| Self::ALL.get(i).copied())
                .ok_or_else(|| {
                    CoreError::ValidationError(format!(
                        "Hold duration choice must be 1-{}, got {n}",
                        Self::ALL.len()
                    ))
                });
        }

        let normalized = s.replace('-', "–");
        Self::from_label(&normalized).ok_or_else(|| {
            CoreError::ValidationError(format!(
                "Unknown hold duration '{s}' (expected one of: {})",
                Self::ALL
                    .iter()
                    .map(|d| d.label())
                    .collect::<Vec<_>>()
                    .join(", ")
            ))
        })
    }
}
