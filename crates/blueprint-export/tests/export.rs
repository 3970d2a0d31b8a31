//! Export contract tests: Markdown structure (validated by parsing it back)
//! and PDF envelope checks.

use blueprint_core::{Blueprint, Phase, PhaseId, SCHEMA_VERSION, Task};
use blueprint_export::{render_markdown, render_pdf};
use pulldown_cmark::{Event, Options, Parser, TagEnd};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

fn leaf(id: &str, title: &str, done: bool) -> Task {
    Task {
        id: id.to_string(),
        title: title.to_string(),
        done,
        ..Task::default()
    }
}

fn fixture() -> Blueprint {
    let define = Task {
        description: Some("One sentence a stranger would understand.".to_string()),
        notes: Some("talked to four founders\nall hit the same wall".to_string()),
        children: Some(vec![
            leaf("sub-1", "Describe who hurts", true),
            leaf("sub-2", "List the workarounds", false),
        ]),
        ..leaf("task-1", "Define the problem", true)
    };
    let pitch = leaf("task-2", "Write the pitch", false);

    Blueprint {
        id: "bp-1".to_string(),
        name: "Launch Plan".to_string(),
        updated_at: chrono::Utc::now(),
        version: SCHEMA_VERSION.to_string(),
        phases: vec![
            Phase::new(PhaseId::Spark, "Spark", "Find the problem.", vec![define, pitch]),
            Phase::new(PhaseId::Forge, "Forge", "Build it.", vec![leaf("task-3", "Build the core loop", true)]),
            Phase::new(PhaseId::Flow, "Flow", "Launch it.", vec![]),
            Phase::new(PhaseId::Impact, "Impact", "Grow it.", vec![leaf("task-4", "Pick the metric", false)]),
        ],
    }
}

// ---------------------------------------------------------------------------
// Markdown
// ---------------------------------------------------------------------------

#[test]
fn markdown_has_heading_checklist_and_summary() {
    let markdown = render_markdown(&fixture());

    assert!(markdown.starts_with("# Launch Plan\n"));
    assert!(markdown.contains("## Spark\n"));
    assert!(markdown.contains("- [x] Define the problem\n"));
    assert!(markdown.contains("  *One sentence a stranger would understand.*\n"));
    assert!(markdown.contains("  > talked to four founders\n"));
    assert!(markdown.contains("  > all hit the same wall\n"));
    // Children indent two spaces per depth.
    assert!(markdown.contains("  - [x] Describe who hurts\n"));
    assert!(markdown.contains("  - [ ] List the workarounds\n"));
    assert!(markdown.contains("- [ ] Write the pitch\n"));
}

#[test]
fn markdown_summary_matches_store_progress_math() {
    let markdown = render_markdown(&fixture());

    // 6 nodes, 3 done => 50% overall; Spark: 4 nodes, 2 done.
    assert!(markdown.contains("## Progress\n"));
    assert!(markdown.contains("- Overall: 3/6 (50%)\n"));
    assert!(markdown.contains("- Spark: 2/4 (50%)\n"));
    assert!(markdown.contains("- Forge: 1/1 (100%)\n"));
    assert!(markdown.contains("- Flow: 0/0 (0%)\n"));
    assert!(markdown.contains("- Impact: 0/1 (0%)\n"));
}

#[test]
fn markdown_phases_appear_in_blueprint_order() {
    let markdown = render_markdown(&fixture());
    let spark = markdown.find("## Spark").expect("spark section");
    let forge = markdown.find("## Forge").expect("forge section");
    let flow = markdown.find("## Flow").expect("flow section");
    let impact = markdown.find("## Impact").expect("impact section");
    assert!(spark < forge && forge < flow && flow < impact);
}

#[test]
fn markdown_parses_back_to_the_expected_task_list() {
    let markdown = render_markdown(&fixture());
    let parser = Parser::new_ext(&markdown, Options::ENABLE_TASKLISTS);

    let mut checked = 0;
    let mut unchecked = 0;
    let mut headings = 0;
    for event in parser {
        match event {
            Event::TaskListMarker(true) => checked += 1,
            Event::TaskListMarker(false) => unchecked += 1,
            Event::End(TagEnd::Heading(_)) => headings += 1,
            _ => {}
        }
    }

    assert_eq!(checked, 3);
    assert_eq!(unchecked, 3);
    // One title, four phases, one progress section.
    assert_eq!(headings, 6);
}

#[test]
fn whitespace_notes_render_no_blockquote() {
    let mut blueprint = fixture();
    blueprint.phases[0].tasks[1].notes = Some("   ".to_string());
    let markdown = render_markdown(&blueprint);
    let pitch_line = markdown
        .lines()
        .position(|line| line == "- [ ] Write the pitch")
        .expect("pitch task present");
    let next = markdown.lines().nth(pitch_line + 1).unwrap_or("");
    assert!(!next.trim_start().starts_with('>'));
}

// ---------------------------------------------------------------------------
// PDF
// ---------------------------------------------------------------------------

#[test]
fn pdf_renders_a_nonempty_document() {
    let bytes = render_pdf(&fixture()).expect("pdf renders");
    assert!(bytes.starts_with(b"%PDF"));
    assert!(bytes.len() > 1_000);
}

#[test]
fn pdf_handles_a_blueprint_with_empty_phases() {
    let mut blueprint = fixture();
    for phase in &mut blueprint.phases {
        phase.tasks.clear();
    }
    let bytes = render_pdf(&blueprint).expect("pdf renders");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn pdf_grows_with_the_task_count() {
    let small = render_pdf(&fixture()).expect("pdf renders");

    let mut blueprint = fixture();
    let tasks: Vec<Task> = (0..200)
        .map(|i| leaf(&format!("gen-{i}"), &format!("Generated task {i}"), i % 2 == 0))
        .collect();
    blueprint.phases[2].tasks = tasks;
    let large = render_pdf(&blueprint).expect("pdf renders");

    assert!(large.len() > small.len());
}
