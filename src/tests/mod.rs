use std::time::Duration;

use tokio::time::Instant;

use crate::editor::{Editor, EditorOptions};
use crate::filter::Selection;
use crate::form::ExerciseDraft;

fn draft(name_en: &str) -> ExerciseDraft {
    ExerciseDraft {
        name_en: name_en.to_string(),
        ..Default::default()
    }
}

#[test]
fn delete_last_filtered_record_leaves_empty_first_page() {
    let mut editor = Editor::default();
    editor
        .load_str(
            r#"[{"id": 1, "name": "Squat", "category": "strength"}]"#,
            None,
        )
        .unwrap();
    editor.set_category(Selection::Only("strength".to_string()));
    assert_eq!(editor.filtered().len(), 1);

    let now = Instant::now();
    editor.request_delete(1, now).unwrap();
    assert_eq!(editor.records().len(), 1);

    let fired = editor.fire_due(now + Duration::from_millis(5001));
    assert_eq!(fired, Some(1));
    assert!(editor.records().is_empty());
    assert!(editor.filtered().is_empty());
    assert_eq!(editor.page(), 1);
    assert_eq!(editor.total_pages(), 0);
}

#[test]
fn ids_start_at_one_and_increase() {
    let mut editor = Editor::default();
    assert_eq!(editor.add(draft("A")), 1);
    assert_eq!(editor.add(draft("B")), 2);
    let ids: Vec<i64> = editor.records().iter().map(|e| e.id).collect();
    assert_eq!(ids, vec![1, 2]);
}

#[test]
fn undo_within_window_changes_nothing() {
    let mut editor = Editor::default();
    editor.add(draft("A"));
    editor.add(draft("B"));
    let before = editor.records().to_vec();

    let now = Instant::now();
    editor.request_delete(2, now).unwrap();
    assert_eq!(editor.undo_delete(), Some(2));
    assert_eq!(editor.fire_due(now + Duration::from_secs(10)), None);
    assert_eq!(editor.records(), before.as_slice());
    assert!(editor.pending_delete().is_none());
}

#[test]
fn at_most_one_delete_is_pending() {
    let mut editor = Editor::default();
    for name in ["A", "B", "C"] {
        editor.add(draft(name));
    }
    let now = Instant::now();
    editor.request_delete(1, now).unwrap();
    let second = editor.request_delete(2, now + Duration::from_secs(1)).unwrap();
    assert_eq!(second.committed, Some(1));
    assert!(editor.record(1).is_none());
    assert_eq!(editor.pending_delete().map(|p| p.id), Some(2));

    // the second deadline runs from its own request time
    assert_eq!(editor.fire_due(now + Duration::from_secs(5)), None);
    assert_eq!(editor.fire_due(now + Duration::from_secs(6)), Some(2));
    assert_eq!(editor.records().len(), 1);
}

#[test]
fn messy_input_is_sanitized_on_load() {
    let mut editor = Editor::default();
    let count = editor
        .load_str(
            r#"[
                {"id": 7, "name_en": "Row", "equipment": ["cable", 3, null]},
                {"name": "بدون شناسه", "category": null},
                {"id": "x", "name_en": 42, "video": 5}
            ]"#,
            None,
        )
        .unwrap();
    assert_eq!(count, 3);

    let records = editor.records();
    assert_eq!(records[0].id, 7);
    assert_eq!(records[0].equipment, vec!["cable".to_string(), "3".to_string()]);
    assert_eq!(records[1].category, "strength");
    assert!(records[1].id > 7);
    assert!(records[2].id > 7);
    assert_ne!(records[1].id, records[2].id);
    assert_eq!(records[2].name_en, "42");
    assert_eq!(records[2].video, None);
}

#[test]
fn non_array_document_loads_nothing() {
    let mut editor = Editor::default();
    editor.add(draft("A"));
    assert_eq!(editor.load_str(r#"{"id": 1}"#, None).unwrap(), 0);
    assert!(editor.records().is_empty());
}

#[test]
fn search_narrows_pages_and_resets_to_first() {
    let mut editor = Editor::new(EditorOptions {
        page_size: 10,
        ..Default::default()
    });
    for i in 0..35 {
        let name = if i % 5 == 0 { format!("Curl {i}") } else { format!("Press {i}") };
        editor.add(draft(&name));
    }
    assert_eq!(editor.total_pages(), 4);
    editor.go_to_page(4).unwrap();
    assert_eq!(editor.visible().len(), 5);

    editor.set_search("CURL");
    assert_eq!(editor.page(), 1);
    assert_eq!(editor.filtered().len(), 7);
    assert_eq!(editor.total_pages(), 1);
}

#[tokio::test]
async fn saved_file_loads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.json");

    let mut editor = Editor::default();
    let id = editor.add(ExerciseDraft {
        name_en: "Deadlift".to_string(),
        equipment: vec!["barbell".to_string()],
        instructions: vec!["Hinge".to_string(), " ".to_string(), "Stand".to_string()],
        ..Default::default()
    });
    let written = editor.save_file(Some(&path)).await.unwrap();
    assert_eq!(written, path);

    let raw = tokio::fs::read_to_string(&path).await.unwrap();
    assert!(raw.contains("\n  {"));

    let mut reloaded = Editor::default();
    assert_eq!(reloaded.load_file(&path).await.unwrap(), 1);
    assert_eq!(reloaded.records(), editor.records());
    assert_eq!(reloaded.record(id).unwrap().instructions.len(), 2);
    assert_eq!(reloaded.file_name(), "out.json");
}

#[tokio::test]
async fn missing_file_is_reported_and_store_kept() {
    let dir = tempfile::tempdir().unwrap();
    let mut editor = Editor::default();
    editor.add(draft("A"));
    let err = editor
        .load_file(&dir.path().join("missing.json"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("missing.json"));
    assert_eq!(editor.records().len(), 1);
}
