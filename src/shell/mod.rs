use std::path::{Path, PathBuf};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use tokio::time::{Duration, Instant};

use crate::cli::commands::{self, Command, Payload, TranslateScope};
use crate::config;
use crate::editor::Editor;
use crate::form::ExerciseDraft;
use crate::model::{ExerciseId, Vocabulary};
use crate::output::{self, PageView};
use crate::translate::{FieldFailure, TranslateError, Translator, TranslatorConfig};

pub struct Shell {
    editor: Editor,
    config_path: Option<PathBuf>,
    api_key: Option<String>,
    translator: TranslatorConfig,
}

pub async fn sleep_until_deadline(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

pub fn error_notice(message: &str) -> String {
    format!("{} {}", "error:".red().bold(), message)
}

fn deleted_notice(id: ExerciseId) -> String {
    format!("{} #{id}", "deleted".red().bold())
}

fn redraws(command: &Command) -> bool {
    matches!(
        command,
        Command::List
            | Command::Next
            | Command::Prev
            | Command::Page(_)
            | Command::Size(_)
            | Command::Search(_)
            | Command::Filter { .. }
            | Command::Clear
            | Command::Delete(_)
            | Command::Undo
            | Command::Load(_)
    )
}

fn translation_spinner(id: ExerciseId) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    spinner.set_draw_target(ProgressDrawTarget::stderr());
    spinner.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.set_message(format!("translating #{id} (ctrl-c to cancel)"));
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

async fn run_translation(
    translator: &Translator,
    draft: &mut ExerciseDraft,
    scope: &TranslateScope,
) -> Result<Vec<FieldFailure>, TranslateError> {
    match scope {
        TranslateScope::All => translator.translate_all(draft).await.map(|()| Vec::new()),
        TranslateScope::Fields(fields) => Ok(translator.translate_fields(draft, fields).await),
    }
}

async fn read_payload(payload: Payload) -> Result<String, String> {
    match payload {
        Payload::Inline(raw) => Ok(raw),
        Payload::File(path) => {
            let path = config::expand_tilde(&path);
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| format!("failed to read '{}': {e}", path.display()))
        }
    }
}

impl Shell {
    pub fn new(
        editor: Editor,
        config_path: Option<PathBuf>,
        api_key: Option<String>,
        translator: TranslatorConfig,
    ) -> Self {
        Self {
            editor,
            config_path,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            translator,
        }
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.editor.next_deadline()
    }

    pub fn listing(&self, now: Instant) -> String {
        output::render_page(&PageView::from_editor(&self.editor, now))
    }

    // None means the user asked to quit.
    pub async fn handle_line(&mut self, line: &str) -> Option<String> {
        let command = match commands::parse_command(line) {
            Ok(command) => command,
            Err(e) => return Some(format!("{}\n", error_notice(&e))),
        };
        if command == Command::Quit {
            return None;
        }
        let redraw = redraws(&command);
        let mut out = match self.execute(command).await {
            Ok(message) => message,
            Err(e) => return Some(format!("{}\n", error_notice(&e))),
        };
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }
        if redraw {
            out.push_str(&self.listing(Instant::now()));
        }
        Some(out)
    }

    pub fn fire_due(&mut self, now: Instant) -> Option<String> {
        let id = self.editor.fire_due(now)?;
        Some(format!("{}\n{}", deleted_notice(id), self.listing(now)))
    }

    pub fn teardown(&mut self) -> Option<String> {
        let id = self.editor.shutdown()?;
        tracing::info!(id, "pending delete cancelled on exit");
        Some(format!("pending delete of #{id} cancelled"))
    }

    pub async fn load(&mut self, path: &Path) -> Result<String, String> {
        let count = self
            .editor
            .load_file(path)
            .await
            .map_err(|e| e.to_string())?;
        Ok(format!("loaded {count} exercises from {}", path.display()))
    }

    pub async fn execute(&mut self, command: Command) -> Result<String, String> {
        match command {
            Command::List | Command::Quit => Ok(String::new()),
            Command::Next => {
                if self.editor.next_page() {
                    Ok(String::new())
                } else {
                    Ok("already on the last page".to_string())
                }
            }
            Command::Prev => {
                if self.editor.prev_page() {
                    Ok(String::new())
                } else {
                    Ok("already on the first page".to_string())
                }
            }
            Command::Page(page) => {
                self.editor.go_to_page(page).map_err(|e| e.to_string())?;
                Ok(String::new())
            }
            Command::Size(size) => {
                self.editor.set_page_size(size).map_err(|e| e.to_string())?;
                Ok(String::new())
            }
            Command::Search(text) => {
                self.editor.set_search(&text);
                Ok(String::new())
            }
            Command::Filter {
                vocabulary,
                selection,
            } => {
                match vocabulary {
                    Vocabulary::Category => self.editor.set_category(selection),
                    Vocabulary::Equipment => self.editor.set_equipment(selection),
                    Vocabulary::Muscle => self.editor.set_muscle(selection),
                }
                Ok(String::new())
            }
            Command::Clear => {
                self.editor.clear_filters();
                Ok(String::new())
            }
            Command::Show(id) => {
                let record = self
                    .editor
                    .record(id)
                    .ok_or_else(|| format!("no exercise with id {id}"))?;
                let now = Instant::now();
                let pending = self
                    .editor
                    .pending_delete()
                    .filter(|p| p.id == id)
                    .map(|p| p.remaining(now));
                Ok(output::render_detail(record, pending))
            }
            Command::Add(payload) => {
                let raw = read_payload(payload).await?;
                let draft = ExerciseDraft::from_json(&raw).map_err(|e| e.to_string())?;
                let id = self.editor.add(draft);
                Ok(format!("added #{id}"))
            }
            Command::Edit(id, payload) => {
                if self.editor.record(id).is_none() {
                    return Err(format!("no exercise with id {id}"));
                }
                let raw = read_payload(payload).await?;
                let draft = ExerciseDraft::from_json(&raw).map_err(|e| e.to_string())?;
                self.editor.update(id, draft).map_err(|e| e.to_string())?;
                Ok(format!("updated #{id}"))
            }
            Command::Set { id, field, value } => {
                let mut draft = self.draft_of(id)?;
                draft.set_field(field, &value).map_err(|e| e.to_string())?;
                self.editor.update(id, draft).map_err(|e| e.to_string())?;
                Ok(format!("updated #{id} {}", field.key()))
            }
            Command::Toggle { id, field, value } => {
                let mut draft = self.draft_of(id)?;
                let added = draft.toggle(field, &value).map_err(|e| e.to_string())?;
                self.editor.update(id, draft).map_err(|e| e.to_string())?;
                let verb = if added { "added to" } else { "removed from" };
                Ok(format!("'{}' {verb} #{id} {}", value.trim(), field.key()))
            }
            Command::Delete(id) => {
                let request = self
                    .editor
                    .request_delete(id, Instant::now())
                    .map_err(|e| e.to_string())?;
                let mut out = String::new();
                if let Some(previous) = request.committed {
                    out.push_str(&deleted_notice(previous));
                    out.push('\n');
                }
                out.push_str(&format!(
                    "#{id} will be deleted in {}s, type 'undo' to restore",
                    output::countdown_secs(self.editor.delete_window())
                ));
                Ok(out)
            }
            Command::Undo => match self.editor.undo_delete() {
                Some(id) => Ok(format!("{} #{id}", "restored".green().bold())),
                None => Ok("nothing to undo".to_string()),
            },
            Command::Load(path) => self.load(&config::expand_tilde(&path)).await,
            Command::Save(path) => {
                let path = path.map(|p| config::expand_tilde(&p));
                let target = self
                    .editor
                    .save_file(path.as_deref())
                    .await
                    .map_err(|e| e.to_string())?;
                Ok(format!(
                    "saved {} exercises to {}",
                    self.editor.records().len(),
                    target.display()
                ))
            }
            Command::Translate { id, scope } => self.translate(id, scope).await,
            Command::Key(value) => self.store_api_key(&value),
            Command::Vocab(Some(vocabulary)) => Ok(output::render_vocabulary(vocabulary)),
            Command::Vocab(None) => Ok(Vocabulary::ALL
                .into_iter()
                .map(output::render_vocabulary)
                .collect()),
            Command::Help => Ok(commands::help_text().to_string()),
        }
    }

    fn draft_of(&self, id: ExerciseId) -> Result<ExerciseDraft, String> {
        self.editor
            .record(id)
            .map(ExerciseDraft::from)
            .ok_or_else(|| format!("no exercise with id {id}"))
    }

    fn store_api_key(&mut self, value: &str) -> Result<String, String> {
        let value = value.trim();
        self.api_key = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        let verb = if value.is_empty() { "removed" } else { "saved" };
        match self.config_path.as_deref() {
            Some(path) => {
                config::save_api_key(path, value)?;
                Ok(format!("API key {verb} to {}", path.display()))
            }
            None => Ok(format!("API key {verb} for this session only")),
        }
    }

    async fn translate(&mut self, id: ExerciseId, scope: TranslateScope) -> Result<String, String> {
        let mut draft = self.draft_of(id)?;
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| "no API key configured, use 'key VALUE' first".to_string())?;
        let translator = Translator::new(self.translator.clone(), key).map_err(|e| e.to_string())?;

        let spinner = translation_spinner(id);
        let outcome = {
            let work = run_translation(&translator, &mut draft, &scope);
            tokio::pin!(work);
            loop {
                let deadline = self.editor.next_deadline();
                tokio::select! {
                    result = &mut work => break Some(result),
                    _ = tokio::signal::ctrl_c() => break None,
                    _ = sleep_until_deadline(deadline) => {
                        if let Some(fired) = self.editor.fire_due(Instant::now()) {
                            spinner.println(deleted_notice(fired));
                        }
                    }
                }
            }
        };
        spinner.finish_and_clear();

        let Some(result) = outcome else {
            return Ok(format!("translation of #{id} cancelled"));
        };
        let failures = result.map_err(|e| e.to_string())?;
        let attempted = match &scope {
            TranslateScope::All => 1,
            TranslateScope::Fields(fields) => fields.len(),
        };
        if !failures.is_empty() && failures.len() == attempted {
            let reasons: Vec<String> = failures
                .iter()
                .map(|f| format!("{}: {}", f.field.label(), f.error))
                .collect();
            return Err(format!("translation failed ({})", reasons.join("; ")));
        }

        self.editor
            .update(id, draft)
            .map_err(|e| format!("#{id} changed during translation: {e}"))?;
        let mut out = format!("translated #{id}");
        for failure in &failures {
            out.push('\n');
            out.push_str(&error_notice(&format!(
                "{} not translated: {}",
                failure.field.label(),
                failure.error
            )));
        }
        Ok(out)
    }
}
