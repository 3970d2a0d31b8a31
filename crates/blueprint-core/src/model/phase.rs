use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::task::Task;

/// The four fixed stages of the blueprint methodology.
///
/// This set is closed: no phase is ever added or removed at runtime, and a
/// blueprint always carries exactly one [`Phase`] per id, in `ALL` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PhaseId {
    Spark,
    Forge,
    Flow,
    Impact,
}

impl PhaseId {
    /// All phase ids in blueprint order.
    pub const ALL: [PhaseId; 4] = [Self::Spark, Self::Forge, Self::Flow, Self::Impact];

    /// Return the phase id as a string slice.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spark => "spark",
            Self::Forge => "forge",
            Self::Flow => "flow",
            Self::Impact => "impact",
        }
    }
}

impl fmt::Display for PhaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing a phase id from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsePhaseError {
    pub got: String,
}

impl fmt::Display for ParsePhaseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid phase id: '{}'", self.got)
    }
}

impl std::error::Error for ParsePhaseError {}

impl FromStr for PhaseId {
    type Err = ParsePhaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spark" => Ok(Self::Spark),
            "forge" => Ok(Self::Forge),
            "flow" => Ok(Self::Flow),
            "impact" => Ok(Self::Impact),
            _ => Err(ParsePhaseError { got: s.to_string() }),
        }
    }
}

/// One stage of a blueprint: display strings plus the ordered top-level
/// task list. Top-level order is meaningful (drag-reorderable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub id: PhaseId,
    pub title: String,
    pub summary: String,
    #[serde(default)]
    pub tasks: Vec<Task>,
}

impl Phase {
    #[must_use]
    pub fn new(id: PhaseId, title: &str, summary: &str, tasks: Vec<Task>) -> Self {
        Self {
            id,
            title: title.to_string(),
            summary: summary.to_string(),
            tasks,
        }
    }
}
