use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::phase::{Phase, PhaseId};
use super::task::{self, Task};

/// Schema version tag carried by every blueprint. Present but unused for
/// migration; reserved.
pub const SCHEMA_VERSION: &str = "1";

/// The full four-phase task tree belonging to one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blueprint {
    pub id: String,
    pub name: String,
    pub updated_at: DateTime<Utc>,
    #[serde(default = "default_version")]
    pub version: String,
    pub phases: Vec<Phase>,
}

fn default_version() -> String {
    SCHEMA_VERSION.to_string()
}

impl Blueprint {
    #[must_use]
    pub fn phase(&self, id: PhaseId) -> Option<&Phase> {
        self.phases.iter().find(|phase| phase.id == id)
    }

    pub fn phase_mut(&mut self, id: PhaseId) -> Option<&mut Phase> {
        self.phases.iter_mut().find(|phase| phase.id == id)
    }

    /// Find a task by id anywhere in the blueprint's forest.
    #[must_use]
    pub fn find_task(&self, id: &str) -> Option<&Task> {
        self.phases
            .iter()
            .find_map(|phase| task::find(&phase.tasks, id))
    }

    /// Find a task by id anywhere in the blueprint's forest, mutably.
    pub fn find_task_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.phases
            .iter_mut()
            .find_map(|phase| task::find_mut(&mut phase.tasks, id))
    }

    /// Completion percentages, counting every task and subtask at every
    /// depth. A phase (or blueprint) with zero tasks reports 0%.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let mut by_phase = BTreeMap::new();
        let mut done = 0;
        let mut total = 0;
        for phase in &self.phases {
            let phase_done = task::count_done(&phase.tasks);
            let phase_total = task::count_all(&phase.tasks);
            by_phase.insert(phase.id, percent(phase_done, phase_total));
            done += phase_done;
            total += phase_total;
        }
        Progress {
            overall: percent(done, total),
            by_phase,
        }
    }

    /// Stamp `updated_at`, clamped monotonic non-decreasing.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = self.updated_at.max(now);
    }
}

/// A named, independently persisted instance of a blueprint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub blueprint: Blueprint,
}

impl Project {
    /// Stamp the project and its blueprint as modified. Timestamps never go
    /// backwards, even if the wall clock does.
    pub fn touch(&mut self) {
        let now = Utc::now();
        self.updated_at = self.updated_at.max(now);
        self.blueprint.touch(now);
    }
}

/// Aggregate and per-phase completion percentages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Progress {
    pub overall: u8,
    pub by_phase: BTreeMap<PhaseId, u8>,
}

/// Integer completion percent, rounded half-up. Zero when `total` is zero.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
pub fn percent(done: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (100.0 * done as f64 / total as f64).round() as u8
}
