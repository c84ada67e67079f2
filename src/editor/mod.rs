use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;

use crate::filter::{self, FilterCriteria, Selection};
use crate::form::ExerciseDraft;
use crate::model::{Exercise, ExerciseId};
use crate::pagination;
use crate::sanitizer;
use crate::scheduler::{DeleteRequest, DeleteScheduler, DeleteTarget, PendingDelete};
use crate::store::{RecordStore, StoreError};

pub const DEFAULT_FILE_NAME: &str = "exercises.json";

#[derive(Clone, Debug)]
pub struct EditorOptions {
    pub page_size: usize,
    pub delete_window: Duration,
    pub file_name: String,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self {
            page_size: pagination::DEFAULT_PAGE_SIZE,
            delete_window: crate::scheduler::DEFAULT_DELETE_WINDOW,
            file_name: DEFAULT_FILE_NAME.to_string(),
        }
    }
}

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("invalid page size {value}, expected one of 10, 20, 50, 100")]
    InvalidPageSize { value: usize },

    #[error("page {page} is out of range (1-{total})")]
    PageOutOfRange { page: usize, total: usize },

    #[error("failed to parse JSON: {source}")]
    InvalidJson {
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write {path}: {source}")]
    FileWrite {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize exercises: {source}")]
    Serialize {
        #[source]
        source: serde_json::Error,
    },

    #[error("nothing to save, no exercises loaded")]
    NothingToSave,

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Debug)]
struct Dataset {
    store: RecordStore,
    criteria: FilterCriteria,
    page: usize,
    page_size: usize,
}

impl Dataset {
    fn filtered(&self) -> Vec<&Exercise> {
        filter::filter_exercises(self.store.records(), &self.criteria)
    }

    fn total_pages(&self) -> usize {
        pagination::total_pages(self.filtered().len(), self.page_size)
    }
}

impl DeleteTarget for Dataset {
    fn commit_delete(&mut self, id: ExerciseId) {
        if self.store.remove(id).is_none() {
            tracing::debug!(id, "pending delete target already gone");
        }
        let total = self.total_pages();
        if self.page > total {
            self.page = pagination::clamp_page(self.page, total);
        }
    }
}

#[derive(Debug)]
pub struct Editor {
    data: Dataset,
    scheduler: DeleteScheduler,
    file_name: String,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl Editor {
    pub fn new(options: EditorOptions) -> Self {
        let page_size = if pagination::is_valid_page_size(options.page_size) {
            options.page_size
        } else {
            pagination::DEFAULT_PAGE_SIZE
        };
        Self {
            data: Dataset {
                store: RecordStore::new(),
                criteria: FilterCriteria::default(),
                page: 1,
                page_size,
            },
            scheduler: DeleteScheduler::new(options.delete_window),
            file_name: options.file_name,
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn records(&self) -> &[Exercise] {
        self.data.store.records()
    }

    pub fn record(&self, id: ExerciseId) -> Option<&Exercise> {
        self.data.store.get(id)
    }

    pub fn is_empty(&self) -> bool {
        self.data.store.is_empty()
    }

    // Loading

    pub fn load_str(&mut self, raw: &str, file_name: Option<&str>) -> Result<usize, EditorError> {
        let value: serde_json::Value =
            serde_json::from_str(raw).map_err(|source| EditorError::InvalidJson { source })?;
        let records = sanitizer::sanitize_exercises(&value);
        let count = records.len();

        if let Some(id) = self.scheduler.shutdown() {
            tracing::info!(id, "pending delete cancelled by load");
        }
        self.data.store.replace_all(records);
        self.data.page = 1;
        if let Some(name) = file_name {
            self.file_name = name.to_string();
        }
        tracing::info!(count, file = %self.file_name, "exercises loaded");
        Ok(count)
    }

    pub async fn load_file(&mut self, path: &Path) -> Result<usize, EditorError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| EditorError::FileRead {
                path: path.display().to_string(),
                source,
            })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string());
        self.load_str(&raw, name.as_deref())
    }

    // Saving

    pub fn to_json(&self) -> Result<String, EditorError> {
        if self.data.store.is_empty() {
            return Err(EditorError::NothingToSave);
        }
        serde_json::to_string_pretty(self.data.store.records())
            .map_err(|source| EditorError::Serialize { source })
    }

    pub async fn save_file(&self, path: Option<&Path>) -> Result<PathBuf, EditorError> {
        let body = self.to_json()?;
        let target = path
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from(&self.file_name));
        tokio::fs::write(&target, body)
            .await
            .map_err(|source| EditorError::FileWrite {
                path: target.display().to_string(),
                source,
            })?;
        tracing::info!(path = %target.display(), count = self.data.store.len(), "exercises saved");
        Ok(target)
    }

    // Filtering and paging

    pub fn criteria(&self) -> &FilterCriteria {
        &self.data.criteria
    }

    pub fn set_search(&mut self, search: &str) {
        self.data.criteria.search = search.to_string();
        self.data.page = 1;
    }

    pub fn set_category(&mut self, selection: Selection) {
        self.data.criteria.category = selection;
        self.data.page = 1;
    }

    pub fn set_equipment(&mut self, selection: Selection) {
        self.data.criteria.equipment = selection;
        self.data.page = 1;
    }

    pub fn set_muscle(&mut self, selection: Selection) {
        self.data.criteria.muscle = selection;
        self.data.page = 1;
    }

    pub fn clear_filters(&mut self) {
        self.data.criteria = FilterCriteria::default();
        self.data.page = 1;
    }

    pub fn filtered(&self) -> Vec<&Exercise> {
        self.data.filtered()
    }

    pub fn visible(&self) -> Vec<&Exercise> {
        let filtered = self.data.filtered();
        pagination::page_slice(&filtered, self.data.page_size, self.data.page).to_vec()
    }

    pub fn page(&self) -> usize {
        self.data.page
    }

    pub fn page_size(&self) -> usize {
        self.data.page_size
    }

    pub fn total_pages(&self) -> usize {
        self.data.total_pages()
    }

    pub fn set_page_size(&mut self, page_size: usize) -> Result<(), EditorError> {
        if !pagination::is_valid_page_size(page_size) {
            return Err(EditorError::InvalidPageSize { value: page_size });
        }
        self.data.page_size = page_size;
        self.data.page = 1;
        Ok(())
    }

    pub fn go_to_page(&mut self, page: usize) -> Result<(), EditorError> {
        let total = self.total_pages();
        if page < 1 || page > total {
            return Err(EditorError::PageOutOfRange { page, total });
        }
        self.data.page = page;
        Ok(())
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.data.page + 1).is_ok()
    }

    pub fn prev_page(&mut self) -> bool {
        match self.data.page.checked_sub(1) {
            Some(page) => self.go_to_page(page).is_ok(),
            None => false,
        }
    }

    // Form actions

    pub fn add(&mut self, draft: ExerciseDraft) -> ExerciseId {
        let id = self.data.store.insert_new(draft.finalize(0));
        tracing::info!(id, "exercise added");
        id
    }

    pub fn update(&mut self, id: ExerciseId, draft: ExerciseDraft) -> Result<(), EditorError> {
        self.data.store.replace(draft.finalize(id))?;
        tracing::info!(id, "exercise updated");
        Ok(())
    }

    // Deletion

    pub fn request_delete(
        &mut self,
        id: ExerciseId,
        now: Instant,
    ) -> Result<DeleteRequest, EditorError> {
        if !self.data.store.contains(id) {
            return Err(StoreError::NotFound { id }.into());
        }
        Ok(self.scheduler.request(id, now, &mut self.data))
    }

    pub fn undo_delete(&mut self) -> Option<ExerciseId> {
        self.scheduler.undo()
    }

    pub fn fire_due(&mut self, now: Instant) -> Option<ExerciseId> {
        let id = self.scheduler.fire_due(now, &mut self.data)?;
        tracing::info!(id, "exercise deleted");
        Some(id)
    }

    pub fn pending_delete(&self) -> Option<PendingDelete> {
        self.scheduler.pending()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.deadline()
    }

    pub fn is_pending(&self, id: ExerciseId) -> bool {
        self.scheduler.is_pending(id)
    }

    pub fn delete_window(&self) -> Duration {
        self.scheduler.window()
    }

    pub fn shutdown(&mut self) -> Option<ExerciseId> {
        self.scheduler.shutdown()
    }
}
