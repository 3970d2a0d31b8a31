//! PDF rendering.
//!
//! Paginated A4 document: a title page with aggregate counts and a phase
//! index, then one page-group per phase listing tasks depth-first with
//! checkbox markers and a short notes preview. Layout is a simple y-cursor
//! over builtin Helvetica faces; pagination happens whenever a line would
//! cross the bottom margin.

use printpdf::{
    BuiltinFont, IndirectFontRef, Mm, PdfDocument, PdfDocumentReference, PdfLayerReference,
};
use thiserror::Error;

use blueprint_core::model::blueprint::percent;
use blueprint_core::model::task::{self, Task};
use blueprint_core::{Blueprint, Phase};

const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;
const MARGIN_MM: f64 = 18.0;
const LINE_HEIGHT_MM: f64 = 6.0;
const INDENT_STEP_MM: f64 = 6.0;

const TITLE_SIZE: f64 = 24.0;
const HEADING_SIZE: f64 = 16.0;
const BODY_SIZE: f64 = 10.0;
const SMALL_SIZE: f64 = 9.0;

/// How many lines of a task's notes make it onto the page.
const NOTES_PREVIEW_LINES: usize = 3;

/// Failure while producing an export artifact. Propagated to the caller;
/// store state is never involved.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("pdf generation failed: {0}")]
    Pdf(String),
}

fn pdf_err(err: impl std::fmt::Display) -> ExportError {
    ExportError::Pdf(err.to_string())
}

struct Fonts {
    regular: IndirectFontRef,
    bold: IndirectFontRef,
    italic: IndirectFontRef,
}

struct PageCursor<'a> {
    doc: &'a PdfDocumentReference,
    layer: PdfLayerReference,
    y: f64,
}

impl PageCursor<'_> {
    fn new_page(&mut self) {
        let (page, layer) =
            self.doc
                .add_page(Mm(PAGE_WIDTH_MM as f32), Mm(PAGE_HEIGHT_MM as f32), "content");
        self.layer = self.doc.get_page(page).get_layer(layer);
        self.y = PAGE_HEIGHT_MM - MARGIN_MM;
    }

    fn line(&mut self, text: &str, size: f64, font: &IndirectFontRef, indent: f64) {
        if self.y < MARGIN_MM + LINE_HEIGHT_MM {
            self.new_page();
        }
        self.layer
            .use_text(
                text,
                size as f32,
                Mm((MARGIN_MM + indent) as f32),
                Mm(self.y as f32),
                font,
            );
        self.y -= LINE_HEIGHT_MM;
    }

    fn gap(&mut self, mm: f64) {
        self.y -= mm;
    }
}

/// Render a blueprint as a paginated PDF.
///
/// # Errors
///
/// Returns [`ExportError`] when the underlying document writer fails; the
/// blueprint itself cannot make this fail.
pub fn render_pdf(blueprint: &Blueprint) -> Result<Vec<u8>, ExportError> {
    let (doc, first_page, first_layer) = PdfDocument::new(
        blueprint.name.clone(),
        Mm(PAGE_WIDTH_MM as f32),
        Mm(PAGE_HEIGHT_MM as f32),
        "content",
    );
    let fonts = Fonts {
        regular: doc.add_builtin_font(BuiltinFont::Helvetica).map_err(pdf_err)?,
        bold: doc.add_builtin_font(BuiltinFont::HelveticaBold).map_err(pdf_err)?,
        italic: doc
            .add_builtin_font(BuiltinFont::HelveticaOblique)
            .map_err(pdf_err)?,
    };
    let mut cursor = PageCursor {
        layer: doc.get_page(first_page).get_layer(first_layer),
        y: PAGE_HEIGHT_MM - MARGIN_MM,
        doc: &doc,
    };

    render_title_page(&mut cursor, &fonts, blueprint);
    for phase in &blueprint.phases {
        cursor.new_page();
        render_phase(&mut cursor, &fonts, phase);
    }

    doc.save_to_bytes().map_err(pdf_err)
}

fn render_title_page(cursor: &mut PageCursor<'_>, fonts: &Fonts, blueprint: &Blueprint) {
    let mut done = 0;
    let mut total = 0;
    for phase in &blueprint.phases {
        done += task::count_done(&phase.tasks);
        total += task::count_all(&phase.tasks);
    }

    cursor.gap(24.0);
    cursor.line(&blueprint.name, TITLE_SIZE, &fonts.bold, 0.0);
    cursor.gap(6.0);
    cursor.line(
        &format!("{done} of {total} tasks complete ({}%)", percent(done, total)),
        BODY_SIZE,
        &fonts.regular,
        0.0,
    );
    cursor.line(
        &format!("Updated {}", blueprint.updated_at.format("%Y-%m-%d")),
        SMALL_SIZE,
        &fonts.italic,
        0.0,
    );

    cursor.gap(12.0);
    cursor.line("Phases", HEADING_SIZE, &fonts.bold, 0.0);
    cursor.gap(2.0);
    for phase in &blueprint.phases {
        let phase_done = task::count_done(&phase.tasks);
        let phase_total = task::count_all(&phase.tasks);
        cursor.line(
            &format!(
                "{}: {phase_done}/{phase_total} ({}%)",
                phase.title,
                percent(phase_done, phase_total)
            ),
            BODY_SIZE,
            &fonts.regular,
            4.0,
        );
    }
}

fn render_phase(cursor: &mut PageCursor<'_>, fonts: &Fonts, phase: &Phase) {
    cursor.line(&phase.title, HEADING_SIZE, &fonts.bold, 0.0);
    if !phase.summary.is_empty() {
        cursor.line(&phase.summary, SMALL_SIZE, &fonts.italic, 0.0);
    }
    cursor.gap(4.0);
    for task in &phase.tasks {
        render_task(cursor, fonts, task, 0);
    }
}

#[allow(clippy::cast_precision_loss)]
fn render_task(cursor: &mut PageCursor<'_>, fonts: &Fonts, task: &Task, depth: usize) {
    let indent = depth as f64 * INDENT_STEP_MM;
    let marker = if task.done { "[x]" } else { "[ ]" };
    cursor.line(
        &format!("{marker} {}", task.title),
        BODY_SIZE,
        &fonts.regular,
        indent,
    );

    if let Some(description) = task.description.as_deref() {
        cursor.line(description, SMALL_SIZE, &fonts.italic, indent + 5.0);
    }
    if task.has_notes() {
        if let Some(notes) = task.notes.as_deref() {
            for line in notes.lines().take(NOTES_PREVIEW_LINES) {
                cursor.line(line, SMALL_SIZE, &fonts.regular, indent + 5.0);
            }
        }
    }
    if let Some(children) = task.children.as_deref() {
        for child in children {
            render_task(cursor, fonts, child, depth + 1);
        }
    }
}
