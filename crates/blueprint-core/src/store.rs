//! The blueprint store.
//!
//! Exclusive owner of all projects and selection state for the lifetime of
//! the process. Consumers construct a store, call [`BlueprintStore::load`]
//! once, and go through its mutators for every change; each mutator stamps
//! the owning project, bumps the revision counter, and writes the full
//! snapshot through to the backend.
//!
//! Execution is single-threaded and synchronous: every mutator runs to
//! completion before the next one starts, so tree-mutation races cannot
//! occur. Persistence failures never escape: they land in [`SaveStatus`]
//! and a log line, and the in-memory tree keeps its last consistent shape.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::config::StoreConfig;
use crate::error::LoadError;
use crate::model::blueprint::{Progress, Project, percent};
use crate::model::phase::{Phase, PhaseId};
use crate::model::task::{self, Task};
use crate::seed;
use crate::storage::StorageBackend;

/// Outcome of the most recent save attempt.
///
/// `Syncing` is the reserved slot for the remote-sync path and is never set
/// here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    Saved,
    Saving,
    Error,
    Syncing,
}

impl SaveStatus {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Saved => "saved",
            Self::Saving => "saving",
            Self::Error => "error",
            Self::Syncing => "syncing",
        }
    }
}

impl fmt::Display for SaveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The single persisted record: all projects plus the active selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub active_project_id: Option<String>,
}

/// Borrowing twin of [`Snapshot`] so saving does not clone the forest.
#[derive(Serialize)]
struct SnapshotRef<'a> {
    projects: &'a [Project],
    active_project_id: Option<&'a str>,
}

/// Per-phase roll-up returned by [`BlueprintStore::phase_summary`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSummary<'a> {
    pub phase: &'a Phase,
    /// Completion percent over every task and subtask in the phase.
    pub progress: u8,
    pub tasks_completed: usize,
    pub total_tasks: usize,
    /// Nodes (any depth) whose notes are non-empty after trimming.
    pub notes_count: usize,
}

pub struct BlueprintStore<B> {
    backend: B,
    config: StoreConfig,
    projects: Vec<Project>,
    active_project_id: Option<String>,
    save_status: SaveStatus,
    revision: u64,
    loaded: bool,
}

impl<B: StorageBackend> BlueprintStore<B> {
    #[must_use]
    pub fn new(backend: B, config: StoreConfig) -> Self {
        Self {
            backend,
            config,
            projects: Vec::new(),
            active_project_id: None,
            save_status: SaveStatus::Saved,
            revision: 0,
            loaded: false,
        }
    }

    // -----------------------------------------------------------------------
    // Load / save
    // -----------------------------------------------------------------------

    /// Restore state from the backend.
    ///
    /// Fails soft: a missing key leaves state empty, an unreadable or
    /// undecodable snapshot is logged and discarded. If no projects survive,
    /// exactly one default project is seeded so the caller always has
    /// something to render. Idempotent: calls after the first successful
    /// load are no-ops and never re-seed.
    pub fn load(&mut self) {
        if self.loaded {
            return;
        }

        match self.read_snapshot() {
            Ok(Some(snapshot)) => {
                self.projects = snapshot.projects;
                self.active_project_id = snapshot.active_project_id;
            }
            Ok(None) => {}
            Err(err) => warn!(error = %err, "discarding unreadable blueprint snapshot"),
        }

        if self.projects.is_empty() {
            // Not persisted yet: load is not a mutator, the first mutation
            // writes the seeded state through.
            let project = seed::default_project(seed::DEFAULT_PROJECT_NAME);
            self.active_project_id = Some(project.id.clone());
            self.projects.push(project);
        } else if !self.resolves_active() {
            // Repair a dangling selection left by an older snapshot.
            self.active_project_id = self.projects.first().map(|p| p.id.clone());
        }

        self.loaded = true;
        self.revision += 1;
    }

    fn read_snapshot(&self) -> Result<Option<Snapshot>, LoadError> {
        let Some(bytes) = self.backend.get(&self.config.storage_key)? else {
            return Ok(None);
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }

    /// Serialize the full state and write it through to the backend.
    ///
    /// Never propagates failure; the result is observable via
    /// [`Self::save_status`].
    pub fn save(&mut self) {
        self.save_status = SaveStatus::Saving;
        let snapshot = SnapshotRef {
            projects: &self.projects,
            active_project_id: self.active_project_id.as_deref(),
        };
        let outcome = serde_json::to_vec(&snapshot)
            .map_err(|err| err.to_string())
            .and_then(|bytes| {
                self.backend
                    .set(&self.config.storage_key, &bytes)
                    .map_err(|err| err.to_string())
            });
        match outcome {
            Ok(()) => self.save_status = SaveStatus::Saved,
            Err(error) => {
                self.save_status = SaveStatus::Error;
                warn!(error, "blueprint save failed");
            }
        }
    }

    // -----------------------------------------------------------------------
    // Project CRUD
    // -----------------------------------------------------------------------

    /// Create a project from the seed template, make it active, and return
    /// its id.
    pub fn create_project(&mut self, name: Option<&str>) -> String {
        let project = seed::default_project(name.unwrap_or(seed::DEFAULT_PROJECT_NAME));
        let id = project.id.clone();
        self.projects.push(project);
        self.active_project_id = Some(id.clone());
        self.finish_mutation();
        id
    }

    pub fn rename_project(&mut self, id: &str, name: &str) -> bool {
        let Some(project) = self.projects.iter_mut().find(|p| p.id == id) else {
            miss("rename_project", id);
            return false;
        };
        project.name = name.to_string();
        project.blueprint.name = name.to_string();
        project.touch();
        self.finish_mutation();
        true
    }

    /// Delete a project. Deleting the active project re-selects the first
    /// remaining one; deleting the last leaves no selection.
    pub fn delete_project(&mut self, id: &str) -> bool {
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() == before {
            miss("delete_project", id);
            return false;
        }
        if self.active_project_id.as_deref() == Some(id) {
            self.active_project_id = self.projects.first().map(|p| p.id.clone());
        }
        self.finish_mutation();
        true
    }

    /// Deep-clone a project under a fresh id and make the copy active.
    /// Task ids are retained in the copy (uniqueness is per-project).
    pub fn duplicate_project(&mut self, id: &str) -> Option<String> {
        let Some(source) = self.projects.iter().find(|p| p.id == id) else {
            miss("duplicate_project", id);
            return None;
        };
        let mut copy = source.clone();
        let new_id = crate::id::new_id();
        let now = chrono::Utc::now();
        copy.id = new_id.clone();
        copy.name = format!("{} (Copy)", source.name);
        copy.created_at = now;
        copy.updated_at = now;
        copy.blueprint.id = new_id.clone();
        copy.blueprint.name = copy.name.clone();
        copy.blueprint.updated_at = now;
        self.projects.push(copy);
        self.active_project_id = Some(new_id.clone());
        self.finish_mutation();
        Some(new_id)
    }

    /// Select a project. Unknown ids are ignored so the selection always
    /// resolves.
    pub fn set_active_project(&mut self, id: &str) -> bool {
        if !self.projects.iter().any(|p| p.id == id) {
            miss("set_active_project", id);
            return false;
        }
        self.active_project_id = Some(id.to_string());
        self.finish_mutation();
        true
    }

    // -----------------------------------------------------------------------
    // Task mutators (active project only)
    // -----------------------------------------------------------------------

    /// Append a new task to the end of the phase's top-level list. Returns
    /// the new id, or `None` when no project is active.
    pub fn add_task(&mut self, phase: PhaseId, title: Option<&str>) -> Option<String> {
        let result = self.mutate_active(|project| {
            let tasks = &mut project.blueprint.phase_mut(phase)?.tasks;
            let new = Task::new(title.unwrap_or(seed::NEW_TASK_TITLE));
            let id = new.id.clone();
            tasks.push(new);
            Some(id)
        });
        if result.is_none() {
            debug!(phase = %phase, "add_task: no active project");
        }
        result
    }

    /// Append a new subtask to the task found by id anywhere in the active
    /// project's forest, creating its `children` list if absent.
    pub fn add_subtask(&mut self, task_id: &str, title: Option<&str>) -> Option<String> {
        let result = self.mutate_active(|project| {
            let parent = project.blueprint.find_task_mut(task_id)?;
            let new = Task::new(title.unwrap_or(seed::NEW_SUBTASK_TITLE));
            let id = new.id.clone();
            parent.children.get_or_insert_with(Vec::new).push(new);
            Some(id)
        });
        if result.is_none() {
            miss("add_subtask", task_id);
        }
        result
    }

    pub fn rename_task(&mut self, id: &str, title: &str) -> bool {
        let renamed = self
            .mutate_active(|project| {
                let found = project.blueprint.find_task_mut(id)?;
                found.title = title.to_string();
                Some(())
            })
            .is_some();
        if !renamed {
            miss("rename_task", id);
        }
        renamed
    }

    /// Subtasks share the task shape and the same recursive lookup.
    pub fn rename_subtask(&mut self, id: &str, title: &str) -> bool {
        self.rename_task(id, title)
    }

    /// Flip one node's done-state. Never cascades: a parent's state is
    /// independent of its children's.
    pub fn toggle_task(&mut self, id: &str) -> bool {
        let toggled = self
            .mutate_active(|project| {
                let found = project.blueprint.find_task_mut(id)?;
                found.done = !found.done;
                Some(())
            })
            .is_some();
        if !toggled {
            miss("toggle_task", id);
        }
        toggled
    }

    pub fn toggle_subtask(&mut self, id: &str) -> bool {
        self.toggle_task(id)
    }

    /// Replace a node's notes verbatim. The text is opaque to the store: no
    /// validation, no length cap.
    pub fn update_notes(&mut self, id: &str, text: &str) -> bool {
        let updated = self
            .mutate_active(|project| {
                let found = project.blueprint.find_task_mut(id)?;
                found.notes = Some(text.to_string());
                Some(())
            })
            .is_some();
        if !updated {
            miss("update_notes", id);
        }
        updated
    }

    pub fn update_subtask_notes(&mut self, id: &str, text: &str) -> bool {
        self.update_notes(id, text)
    }

    /// Remove a task and its entire subtree, at any depth.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let deleted = self
            .mutate_active(|project| {
                project
                    .blueprint
                    .phases
                    .iter_mut()
                    .any(|phase| task::remove(&mut phase.tasks, id))
                    .then_some(())
            })
            .is_some();
        if !deleted {
            miss("delete_task", id);
        }
        deleted
    }

    /// Remove a child from its parent's `children`, the parent located by
    /// recursive search. Top-level tasks are out of scope here.
    pub fn delete_subtask(&mut self, id: &str) -> bool {
        let deleted = self
            .mutate_active(|project| {
                project
                    .blueprint
                    .phases
                    .iter_mut()
                    .any(|phase| task::remove_child(&mut phase.tasks, id))
                    .then_some(())
            })
            .is_some();
        if !deleted {
            miss("delete_subtask", id);
        }
        deleted
    }

    // -----------------------------------------------------------------------
    // Reordering
    // -----------------------------------------------------------------------

    /// Move `from_id` to the position of `to_id` in the phase's top-level
    /// list, shifting the elements between them by one. No-op unless both
    /// ids are present.
    pub fn reorder_tasks(&mut self, phase: PhaseId, from_id: &str, to_id: &str) -> bool {
        self.mutate_active(|project| {
            let tasks = &mut project.blueprint.phase_mut(phase)?.tasks;
            array_move(tasks, from_id, to_id).then_some(())
        })
        .is_some()
    }

    /// Same move semantics, scoped to the direct children of `task_id`.
    pub fn reorder_subtasks(&mut self, task_id: &str, from_id: &str, to_id: &str) -> bool {
        self.mutate_active(|project| {
            let parent = project.blueprint.find_task_mut(task_id)?;
            let children = parent.children.as_mut()?;
            array_move(children, from_id, to_id).then_some(())
        })
        .is_some()
    }

    // -----------------------------------------------------------------------
    // Derived queries (no mutation, no save)
    // -----------------------------------------------------------------------

    #[must_use]
    pub fn active_project(&self) -> Option<&Project> {
        let id = self.active_project_id.as_deref()?;
        self.projects.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    #[must_use]
    pub fn active_project_id(&self) -> Option<&str> {
        self.active_project_id.as_deref()
    }

    #[must_use]
    pub const fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    /// Monotonically increasing change counter. Consumers re-render when it
    /// moves instead of diffing trees.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Overall and per-phase completion for the active project. All zeros
    /// when nothing is active.
    #[must_use]
    pub fn progress(&self) -> Progress {
        self.active_project().map_or_else(
            || Progress {
                overall: 0,
                by_phase: PhaseId::ALL.iter().map(|&id| (id, 0)).collect(),
            },
            |project| project.blueprint.progress(),
        )
    }

    /// Roll-up for one phase of the active project, or `None` when nothing
    /// is active.
    #[must_use]
    pub fn phase_summary(&self, phase: PhaseId) -> Option<PhaseSummary<'_>> {
        let project = self.active_project()?;
        let found = project.blueprint.phase(phase)?;
        let total_tasks = task::count_all(&found.tasks);
        let tasks_completed = task::count_done(&found.tasks);
        Some(PhaseSummary {
            phase: found,
            progress: percent(tasks_completed, total_tasks),
            tasks_completed,
            total_tasks,
            notes_count: task::count_notes(&found.tasks),
        })
    }

    /// Hand the backend back, e.g. to reuse it for a fresh store.
    #[must_use]
    pub fn into_backend(self) -> B {
        self.backend
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    /// Run `op` against the active project; on success stamp `updated_at`,
    /// bump the revision, and save. `None` from `op` means the mutation did
    /// not apply and nothing is stamped or saved.
    fn mutate_active<T>(&mut self, op: impl FnOnce(&mut Project) -> Option<T>) -> Option<T> {
        let active_id = self.active_project_id.clone()?;
        let project = self.projects.iter_mut().find(|p| p.id == active_id)?;
        let result = op(project)?;
        project.touch();
        self.finish_mutation();
        Some(result)
    }

    fn finish_mutation(&mut self) {
        self.revision += 1;
        self.save();
    }

    fn resolves_active(&self) -> bool {
        match self.active_project_id.as_deref() {
            None => true,
            Some(id) => self.projects.iter().any(|p| p.id == id),
        }
    }
}

fn miss(op: &str, id: &str) {
    debug!(op, id, "mutator target did not resolve");
}

/// Standard array-move: indices are computed on the current list, the `from`
/// element is removed and reinserted at the `to` index. Distinct from a swap
/// for non-adjacent elements.
fn array_move(tasks: &mut Vec<Task>, from_id: &str, to_id: &str) -> bool {
    let from = tasks.iter().position(|t| t.id == from_id);
    let to = tasks.iter().position(|t| t.id == to_id);
    let (Some(from), Some(to)) = (from, to) else {
        return false;
    };
    if from != to {
        let moved = tasks.remove(from);
        tasks.insert(to, moved);
    }
    true
}
