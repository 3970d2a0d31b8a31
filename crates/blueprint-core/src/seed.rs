//! The static methodology template.
//!
//! First-run seeding and `create_project` both instantiate this template.
//! Instantiation generates fresh ids; every task starts not-done with empty
//! notes.

use chrono::Utc;

use crate::id;
use crate::model::blueprint::{Blueprint, Project, SCHEMA_VERSION};
use crate::model::phase::{Phase, PhaseId};
use crate::model::task::Task;

/// Name used when seeding a project on first run.
pub const DEFAULT_PROJECT_NAME: &str = "My Blueprint";

/// Title given to tasks added without one.
pub const NEW_TASK_TITLE: &str = "New task";

/// Title given to subtasks added without one.
pub const NEW_SUBTASK_TITLE: &str = "New subtask";

/// Instantiate a project from the template.
#[must_use]
pub fn default_project(name: &str) -> Project {
    let now = Utc::now();
    let project_id = id::new_id();
    Project {
        id: project_id.clone(),
        name: name.to_string(),
        created_at: now,
        updated_at: now,
        blueprint: Blueprint {
            id: project_id,
            name: name.to_string(),
            updated_at: now,
            version: SCHEMA_VERSION.to_string(),
            phases: PhaseId::ALL.into_iter().map(phase_template).collect(),
        },
    }
}

fn phase_template(id: PhaseId) -> Phase {
    match id {
        PhaseId::Spark => Phase::new(
            id,
            "Spark",
            "Find the problem worth solving and prove somebody wants it solved.",
            vec![
                task(
                    "Define the problem",
                    Some("Write the problem down in one sentence a stranger would understand."),
                    &[
                        "If the sentence needs the word 'and', it is two problems.",
                        "Name the person who has this problem, not the market.",
                    ],
                    vec![
                        subtask("Describe who hurts and when"),
                        subtask("List the workarounds people use today"),
                    ],
                ),
                task(
                    "Talk to ten people",
                    Some("Interviews before prototypes. Listen for money already spent."),
                    &["Ask about the last time it happened, not about the future."],
                    vec![],
                ),
                task(
                    "Pick the sharpest wedge",
                    Some("Choose the smallest slice of the problem you can own completely."),
                    &[],
                    vec![],
                ),
                task(
                    "Write the one-page pitch",
                    None,
                    &["Problem, person, promise. Nothing else fits on the page."],
                    vec![],
                ),
            ],
        ),
        PhaseId::Forge => Phase::new(
            id,
            "Forge",
            "Build the first working version with the least machinery that holds.",
            vec![
                task(
                    "Choose a boring stack",
                    Some("Tools you already know beat tools you want to learn."),
                    &[],
                    vec![],
                ),
                task(
                    "Build the core loop",
                    Some("The single flow a user repeats. Everything else waits."),
                    &["Cut every screen that is not on the path to the core loop."],
                    vec![
                        subtask("Sketch the happy path end to end"),
                        subtask("Ship it behind a private link"),
                    ],
                ),
                task(
                    "Put it in front of three users",
                    Some("Watch silently. Write down where they stall."),
                    &[],
                    vec![],
                ),
            ],
        ),
        PhaseId::Flow => Phase::new(
            id,
            "Flow",
            "Launch, then trade polish for feedback on a weekly rhythm.",
            vec![
                task(
                    "Prepare the launch kit",
                    Some("Screenshots, a demo clip, and one paragraph of copy."),
                    &["Write the copy about the reader's problem, not your feature list."],
                    vec![],
                ),
                task("Launch where your people already are", None, &[], vec![]),
                task(
                    "Close the feedback loop",
                    Some("Every piece of feedback gets an answer and a decision."),
                    &[],
                    vec![
                        subtask("Set up one inbox for every channel"),
                        subtask("Review and tag feedback every Friday"),
                    ],
                ),
                task("Ship something visible every week", None, &[], vec![]),
            ],
        ),
        PhaseId::Impact => Phase::new(
            id,
            "Impact",
            "Grow what works, automate what repeats, and decide the next bet.",
            vec![
                task(
                    "Pick the one metric that matters",
                    Some("A single number that moves when users get value."),
                    &["Revenue lags. Usage of the core loop leads."],
                    vec![],
                ),
                task(
                    "Double down on the working channel",
                    Some("Kill the channels that flatter and feed the one that converts."),
                    &[],
                    vec![],
                ),
                task(
                    "Automate the grind",
                    None,
                    &["If you did it three times by hand, script the fourth."],
                    vec![],
                ),
                task("Write down the next bet", None, &[], vec![]),
            ],
        ),
    }
}

fn task(title: &str, description: Option<&str>, tips: &[&str], children: Vec<Task>) -> Task {
    Task {
        description: description.map(str::to_string),
        tips: (!tips.is_empty()).then(|| tips.iter().map(|tip| (*tip).to_string()).collect()),
        children: (!children.is_empty()).then_some(children),
        ..Task::new(title)
    }
}

fn subtask(title: &str) -> Task {
    Task::new(title)
}
