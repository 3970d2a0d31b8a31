//! Markdown rendering.
//!
//! One `#` heading for the blueprint, one `##` section per phase with a
//! checklist line per task (`- [x]` / `- [ ]`), children indented two spaces
//! per depth, and a trailing progress summary computed exactly like the
//! store's progress query.

use blueprint_core::model::task::{self, Task};
use blueprint_core::{Blueprint, Phase};

/// Render a blueprint as Markdown.
#[must_use]
pub fn render_markdown(blueprint: &Blueprint) -> String {
    let mut out = String::new();
    out.push_str(&format!("# {}\n", blueprint.name));

    for phase in &blueprint.phases {
        out.push('\n');
        render_phase(&mut out, phase);
    }

    out.push('\n');
    render_summary(&mut out, blueprint);
    out
}

fn render_phase(out: &mut String, phase: &Phase) {
    out.push_str(&format!("## {}\n", phase.title));
    if !phase.summary.is_empty() {
        out.push_str(&format!("\n{}\n", phase.summary));
    }
    if !phase.tasks.is_empty() {
        out.push('\n');
        for task in &phase.tasks {
            render_task(out, task, 0);
        }
    }
}

fn render_task(out: &mut String, task: &Task, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if task.done { "x" } else { " " };
    out.push_str(&format!("{indent}- [{marker}] {}\n", task.title));

    if let Some(description) = task.description.as_deref() {
        out.push_str(&format!("{indent}  *{description}*\n"));
    }
    if task.has_notes() {
        if let Some(notes) = task.notes.as_deref() {
            for line in notes.lines() {
                out.push_str(&format!("{indent}  > {line}\n"));
            }
        }
    }
    if let Some(children) = task.children.as_deref() {
        for child in children {
            render_task(out, child, depth + 1);
        }
    }
}

fn render_summary(out: &mut String, blueprint: &Blueprint) {
    let progress = blueprint.progress();
    let mut done = 0;
    let mut total = 0;
    for phase in &blueprint.phases {
        done += task::count_done(&phase.tasks);
        total += task::count_all(&phase.tasks);
    }

    out.push_str("## Progress\n\n");
    out.push_str(&format!("- Overall: {done}/{total} ({}%)\n", progress.overall));
    for phase in &blueprint.phases {
        let phase_done = task::count_done(&phase.tasks);
        let phase_total = task::count_all(&phase.tasks);
        let percent = progress.by_phase.get(&phase.id).copied().unwrap_or(0);
        out.push_str(&format!(
            "- {}: {phase_done}/{phase_total} ({percent}%)\n",
            phase.title
        ));
    }
}
