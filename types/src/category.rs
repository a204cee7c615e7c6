//! Proposal categories.
//!
//! A closed set with an explicit mapping table. Unknown category strings are
//! rejected at parse time instead of falling through to a default bucket.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// The funding area a proposal belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProposalCategory {
    Development,
    Community,
    Research,
    Infrastructure,
    Education,
    Events,
}

impl ProposalCategory {
    pub const ALL: [ProposalCategory; 6] = [
        Self::Development,
        Self::Community,
        Self::Research,
        Self::Infrastructure,
        Self::Education,
        Self::Events,
    ];

    /// Stable machine name, also the persisted form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Community => "community",
            Self::Research => "research",
            Self::Infrastructure => "infrastructure",
            Self::Education => "education",
            Self::Events => "events",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Community => "Community",
            Self::Research => "Research",
            Self::Infrastructure => "Infrastructure",
            Self::Education => "Education",
            Self::Events => "Events",
        }
    }
}

impl FromStr for ProposalCategory {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| TypesError::UnknownCategory(s.to_string()))
    }
}

impl fmt::Display for ProposalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
