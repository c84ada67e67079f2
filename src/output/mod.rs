use std::time::Duration;

use colored::Colorize;
use itertools::Itertools;
use tokio::time::Instant;

use crate::editor::Editor;
use crate::model::{Exercise, ExerciseId, Vocabulary};
use crate::utils;

const NAME_WIDTH: usize = 32;

#[derive(Clone, Debug)]
pub struct PageView<'a> {
    pub rows: Vec<&'a Exercise>,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub filtered_len: usize,
    pub store_len: usize,
    pub filters: Option<String>,
    pub pending: Option<(ExerciseId, Duration)>,
}

impl<'a> PageView<'a> {
    pub fn from_editor(editor: &'a Editor, now: Instant) -> Self {
        let filtered_len = editor.filtered().len();
        Self {
            rows: editor.visible(),
            page: editor.page(),
            total_pages: editor.total_pages(),
            page_size: editor.page_size(),
            filtered_len,
            store_len: editor.records().len(),
            filters: editor.criteria().summary(),
            pending: editor
                .pending_delete()
                .map(|p| (p.id, p.remaining(now))),
        }
    }
}

pub fn format_kv_line(label: &str, value: &str) -> String {
    format!(":: {:<10}: {}", label, value)
}

// Whole seconds, rounded up, so the countdown never shows 0 while still pending.
pub fn countdown_secs(remaining: Duration) -> u64 {
    let millis = remaining.as_millis() as u64;
    millis.div_ceil(1000)
}

pub fn render_page(view: &PageView<'_>) -> String {
    let mut out = String::new();
    if view.store_len == 0 {
        out.push_str(&format!("{}\n", "No exercises loaded.".bold()));
        out.push_str("Use 'load PATH' to open a file or 'add' to create one.\n");
        return out;
    }
    if view.filtered_len == 0 {
        out.push_str(&format!("{}\n", "No exercises found.".bold()));
        out.push_str("Try adjusting your search or filters.\n");
        return out;
    }

    for ex in &view.rows {
        let pending = view.pending.filter(|(id, _)| *id == ex.id);
        out.push_str(&render_row(ex, pending.map(|(_, left)| left)));
        out.push('\n');
    }

    out.push('\n');
    let mut footer = format!(
        "Page {} of {} :: {} of {} exercises :: {} per page",
        view.page, view.total_pages, view.filtered_len, view.store_len, view.page_size
    );
    if let Some(filters) = view.filters.as_deref() {
        footer.push_str(&format!(" :: {filters}"));
    }
    out.push_str(&footer.dimmed().to_string());
    out.push('\n');
    out
}

fn render_row(ex: &Exercise, pending: Option<Duration>) -> String {
    let id = format!("#{:<6}", ex.id);
    let name = format!(
        "{:<width$}",
        utils::truncate_chars(ex.display_name(), NAME_WIDTH),
        width = NAME_WIDTH
    );
    let localized = if ex.name.is_empty() || ex.name == ex.display_name() {
        String::new()
    } else {
        format!(" ({})", ex.name)
    };
    let meta = format!(
        "{} | {} | {}",
        ex.category,
        list_or_dash(&ex.equipment),
        list_or_dash(&ex.primary_muscles)
    );
    match pending {
        Some(left) => format!(
            "{} {}{} {}",
            id.red(),
            name.red().strikethrough(),
            localized.red(),
            format!("deleting in {}s, type 'undo' to restore", countdown_secs(left))
                .yellow()
                .bold()
        ),
        None => format!(
            "{} {}{}  {}",
            id.bold().white(),
            name.bold().blue(),
            localized,
            meta.dimmed()
        ),
    }
}

fn list_or_dash(values: &[String]) -> String {
    if values.is_empty() {
        "-".to_string()
    } else {
        values.iter().join(", ")
    }
}

pub fn render_detail(ex: &Exercise, pending: Option<Duration>) -> String {
    let mut lines: Vec<String> = Vec::new();
    let title = format!("#{} {}", ex.id, ex.display_name());
    lines.push(title.bold().blue().to_string());
    if let Some(left) = pending {
        lines.push(
            format!("pending delete, {}s left", countdown_secs(left))
                .red()
                .to_string(),
        );
    }
    lines.push(format_kv_line("name", &ex.name));
    lines.push(format_kv_line("name_en", &ex.name_en));
    lines.push(format_kv_line("category", &ex.category));
    lines.push(format_kv_line("equipment", &list_or_dash(&ex.equipment)));
    lines.push(format_kv_line("primary", &list_or_dash(&ex.primary_muscles)));
    lines.push(format_kv_line("secondary", &list_or_dash(&ex.secondary_muscles)));
    lines.push(format_kv_line("video", ex.video.as_deref().unwrap_or("-")));
    if !ex.description.is_empty() {
        lines.push(format_kv_line("desc", &ex.description));
    }
    if !ex.description_fa.is_empty() {
        lines.push(format_kv_line("desc_fa", &ex.description_fa));
    }
    push_numbered(&mut lines, "instructions", &ex.instructions);
    push_numbered(&mut lines, "instructions_fa", &ex.instructions_fa);
    for (label, values) in [
        ("images", &ex.images),
        ("aliases", &ex.aliases),
        ("tips", &ex.tips),
        ("variation", &ex.variation_on),
    ] {
        if !values.is_empty() {
            lines.push(format_kv_line(label, &values.iter().join(" | ")));
        }
    }
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

fn push_numbered(lines: &mut Vec<String>, label: &str, steps: &[String]) {
    if steps.is_empty() {
        return;
    }
    lines.push(format!(":: {label}"));
    for (i, step) in steps.iter().enumerate() {
        lines.push(format!("   {}. {}", i + 1, step));
    }
}

pub fn render_vocabulary(vocab: Vocabulary) -> String {
    format!(
        "{}: {}\n",
        vocab.label().bold(),
        vocab.values().iter().join(", ")
    )
}
