use std::collections::HashSet;

use serde_json::Map;
use serde_json::Value;

use crate::model::{Exercise, ExerciseId, DEFAULT_CATEGORY};
use crate::utils;

pub fn sanitize_exercises(data: &Value) -> Vec<Exercise> {
    sanitize_with_base(data, utils::now_millis())
}

// `id_base` is the lowest id a synthesized id may take; ids synthesized in one
// load are `base + index`, with base lifted above every numeric id in the load.
pub fn sanitize_with_base(data: &Value, id_base: ExerciseId) -> Vec<Exercise> {
    let items = match data.as_array() {
        Some(items) => items,
        None => {
            tracing::warn!(
                kind = value_kind(data),
                "loaded data is not an array, returning no exercises"
            );
            return Vec::new();
        }
    };

    let mut used: HashSet<ExerciseId> = items
        .iter()
        .filter_map(|item| item.get("id").and_then(numeric_id))
        .collect();
    // None when the numeric ids already reach the top of the range
    let base = match used.iter().max() {
        Some(max) => max.checked_add(1).map(|next| id_base.max(next)),
        None => Some(id_base),
    };
    let mut fallback = ExerciseId::MAX;

    let empty = Map::new();
    let mut synthesized = 0usize;
    let out: Vec<Exercise> = items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let obj = item.as_object().unwrap_or(&empty);
            let id = match obj.get("id").and_then(numeric_id) {
                Some(id) => id,
                None => {
                    synthesized += 1;
                    let preferred = base
                        .and_then(|base| base.checked_add(index as ExerciseId))
                        .filter(|id| !used.contains(id));
                    let id = preferred.unwrap_or_else(|| free_id_below(&used, &mut fallback));
                    used.insert(id);
                    id
                }
            };
            Exercise {
                id,
                name: string_field(obj, "name"),
                name_en: string_field(obj, "name_en"),
                category: obj
                    .get("category")
                    .and_then(Value::as_str)
                    .unwrap_or(DEFAULT_CATEGORY)
                    .to_string(),
                equipment: list_field(obj, "equipment"),
                primary_muscles: list_field(obj, "primary_muscles"),
                secondary_muscles: list_field(obj, "secondary_muscles"),
                description: string_field(obj, "description"),
                description_fa: string_field(obj, "description_fa"),
                instructions: list_field(obj, "instructions"),
                instructions_fa: list_field(obj, "instructions_fa"),
                video: obj.get("video").and_then(Value::as_str).map(str::to_string),
                images: list_field(obj, "images"),
                aliases: list_field(obj, "aliases"),
                tips: list_field(obj, "tips"),
                variation_on: list_field(obj, "variation_on"),
            }
        })
        .collect();

    if synthesized > 0 {
        tracing::debug!(
            synthesized,
            base,
            "assigned ids to exercises without a numeric id"
        );
    }
    out
}

// Walks down from `cursor` to the first id nobody holds yet.
fn free_id_below(used: &HashSet<ExerciseId>, cursor: &mut ExerciseId) -> ExerciseId {
    while used.contains(cursor) {
        *cursor -= 1;
    }
    let id = *cursor;
    *cursor -= 1;
    id
}

fn numeric_id(value: &Value) -> Option<ExerciseId> {
    if let Some(id) = value.as_i64() {
        return Some(id);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        return Some(f as ExerciseId);
    }
    None
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_field(obj: &Map<String, Value>, key: &str) -> String {
    obj.get(key).and_then(scalar_text).unwrap_or_default()
}

fn list_field(obj: &Map<String, Value>, key: &str) -> Vec<String> {
    match obj.get(key) {
        Some(Value::Array(items)) => items.iter().filter_map(scalar_text).collect(),
        _ => Vec::new(),
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
