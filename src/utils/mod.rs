use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::model::ExerciseId;

pub fn now_millis() -> ExerciseId {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as ExerciseId)
        .unwrap_or(0)
}

pub fn parse_csv_list(value: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();
    for part in value.split(',') {
        let item = part.trim();
        if item.is_empty() {
            continue;
        }
        if seen.insert(item.to_string()) {
            out.push(item.to_string());
        }
    }
    out
}

// Free-text lists keep duplicates and blank entries; the form strips blanks on save.
pub fn parse_pipe_list(value: &str) -> Vec<String> {
    if value.trim().is_empty() {
        return Vec::new();
    }
    value.split('|').map(|s| s.trim().to_string()).collect()
}

pub fn parse_id(value: &str) -> Result<ExerciseId, String> {
    value
        .trim()
        .parse::<ExerciseId>()
        .map_err(|_| format!("invalid exercise id '{}'", value.trim()))
}

pub fn truncate_chars(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}
