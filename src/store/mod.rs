use std::collections::HashSet;

use thiserror::Error;

use crate::model::{Exercise, ExerciseId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("exercise {id} not found")]
    NotFound { id: ExerciseId },
}

#[derive(Clone, Debug, Default)]
pub struct RecordStore {
    records: Vec<Exercise>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: Vec<Exercise>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[Exercise] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: ExerciseId) -> Option<&Exercise> {
        self.records.iter().find(|ex| ex.id == id)
    }

    pub fn contains(&self, id: ExerciseId) -> bool {
        self.get(id).is_some()
    }

    pub fn next_id(&self) -> ExerciseId {
        let Some(max) = self.records.iter().map(|ex| ex.id).max() else {
            return 1;
        };
        if let Some(next) = max.checked_add(1) {
            return next;
        }
        // max is i64::MAX: fall back to the smallest free positive id
        let used: HashSet<ExerciseId> = self.records.iter().map(|ex| ex.id).collect();
        (1..ExerciseId::MAX)
            .find(|id| !used.contains(id))
            .unwrap_or(ExerciseId::MIN)
    }

    pub fn insert_new(&mut self, mut record: Exercise) -> ExerciseId {
        let id = self.next_id();
        record.id = id;
        self.records.push(record);
        id
    }

    pub fn replace(&mut self, record: Exercise) -> Result<(), StoreError> {
        let slot = self
            .records
            .iter_mut()
            .find(|ex| ex.id == record.id)
            .ok_or(StoreError::NotFound { id: record.id })?;
        *slot = record;
        Ok(())
    }

    pub fn remove(&mut self, id: ExerciseId) -> Option<Exercise> {
        let idx = self.records.iter().position(|ex| ex.id == id)?;
        Some(self.records.remove(idx))
    }

    pub fn replace_all(&mut self, records: Vec<Exercise>) {
        self.records = records;
    }
}
