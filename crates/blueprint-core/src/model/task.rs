use serde::{Deserialize, Serialize};

use crate::id;

/// One checklist node.
///
/// Top-level entries in a phase are "tasks" and nested entries are
/// "subtasks", but the shape is identical and nesting is structurally
/// unbounded. `id` is opaque, stable, and unique across the whole forest of
/// a project. `tips` are immutable display hints carried by seeded tasks;
/// `children` keeps sibling order (drag-reorderable).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub done: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tips: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Task>>,
}

impl Default for Task {
    fn default() -> Self {
        Self {
            id: String::new(),
            title: String::new(),
            description: None,
            done: false,
            notes: None,
            tips: None,
            children: None,
        }
    }
}

impl Task {
    /// Build a fresh, not-done task with a generated id.
    #[must_use]
    pub fn new(title: &str) -> Self {
        Self {
            id: id::new_id(),
            title: title.to_string(),
            ..Self::default()
        }
    }

    /// Whether this node carries a note that survives whitespace trimming.
    #[must_use]
    pub fn has_notes(&self) -> bool {
        self.notes
            .as_deref()
            .is_some_and(|notes| !notes.trim().is_empty())
    }
}

/// Find a task by id anywhere in the forest.
#[must_use]
pub fn find<'a>(tasks: &'a [Task], id: &str) -> Option<&'a Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(children) = task.children.as_deref() {
            if let Some(found) = find(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Find a task by id anywhere in the forest, mutably.
pub fn find_mut<'a>(tasks: &'a mut [Task], id: &str) -> Option<&'a mut Task> {
    for task in tasks {
        if task.id == id {
            return Some(task);
        }
        if let Some(children) = task.children.as_deref_mut() {
            if let Some(found) = find_mut(children, id) {
                return Some(found);
            }
        }
    }
    None
}

/// Remove the task with the given id at any depth, dropping its entire
/// subtree. Sibling order of the remaining nodes is preserved. Returns
/// whether anything was removed.
pub fn remove(tasks: &mut Vec<Task>, id: &str) -> bool {
    let before = tasks.len();
    tasks.retain(|task| task.id != id);
    if tasks.len() != before {
        return true;
    }
    for task in tasks.iter_mut() {
        if let Some(children) = task.children.as_mut() {
            if remove(children, id) {
                return true;
            }
        }
    }
    false
}

/// Remove a child with the given id from its parent's `children` list, the
/// parent being located by recursive search. Unlike [`remove`], this never
/// touches the top-level list it is handed.
pub fn remove_child(tasks: &mut [Task], id: &str) -> bool {
    for task in tasks.iter_mut() {
        if let Some(children) = task.children.as_mut() {
            if remove(children, id) {
                return true;
            }
        }
    }
    false
}

/// Count every node at every depth.
#[must_use]
pub fn count_all(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .map(|task| 1 + task.children.as_deref().map_or(0, count_all))
        .sum()
}

/// Count done nodes at every depth.
#[must_use]
pub fn count_done(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .map(|task| {
            usize::from(task.done) + task.children.as_deref().map_or(0, count_done)
        })
        .sum()
}

/// Count nodes at every depth whose notes are non-empty after trimming.
#[must_use]
pub fn count_notes(tasks: &[Task]) -> usize {
    tasks
        .iter()
        .map(|task| {
            usize::from(task.has_notes()) + task.children.as_deref().map_or(0, count_notes)
        })
        .sum()
}

/// Collect every id in the forest, depth-first in sibling order.
pub fn collect_ids(tasks: &[Task], out: &mut Vec<String>) {
    for task in tasks {
        out.push(task.id.clone());
        if let Some(children) = task.children.as_deref() {
            collect_ids(children, out);
        }
    }
}
