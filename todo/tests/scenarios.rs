//! End-to-end scenarios: events in, rendered view and saved value out.

use std::sync::Arc;
use tasklist_core::environment::{Clock, KeyValueStore};
use tasklist_runtime::StoreConfig;
use tasklist_testing::{
    test_clock, FailingKeyValueStore, InMemoryKeyValueStore, SequentialIdGenerator,
};
use todo::surface::to_text;
use todo::{App, FileStore, Key, TodoEnvironment, TodoId, TodoRepository, UiEvent, STORAGE_KEY};

fn app_over(store: Arc<dyn KeyValueStore>) -> App {
    let environment = TodoEnvironment::new(
        Arc::new(test_clock()),
        Arc::new(SequentialIdGenerator::new()),
        TodoRepository::new(store),
    );
    App::new(environment, StoreConfig::default())
}

fn add(app: &mut App, text: &str) {
    app.dispatch(UiEvent::NewTaskKey {
        key: Key::Enter,
        value: text.to_string(),
    })
    .unwrap();
}

fn click_toggle(app: &mut App, id: &str) {
    app.dispatch(UiEvent::ToggleClicked { id: TodoId::new(id) })
        .unwrap();
}

fn click_filter(app: &mut App, filter: &str) {
    app.dispatch(UiEvent::FilterClicked {
        filter: filter.to_string(),
    })
    .unwrap();
}

fn texts(app: &App) -> Vec<String> {
    app.view()
        .find_all(|e| e.has_class("todo-text"))
        .into_iter()
        .map(todo::view::Element::text_content)
        .collect()
}

#[test]
fn buy_milk() {
    let mut app = app_over(Arc::new(InMemoryKeyValueStore::new()));

    add(&mut app, "Buy milk");

    assert_eq!(app.state(|s| s.count()), 1);
    assert_eq!(app.state(|s| s.todos[0].text.clone()), "Buy milk");
    assert!(!app.state(|s| s.todos[0].completed));
    assert!(to_text(&app.view()).contains("1 item left"));

    add(&mut app, "  ");

    assert_eq!(app.state(|s| s.count()), 1);
}

#[test]
fn toggle_then_filter() {
    let mut app = app_over(Arc::new(InMemoryKeyValueStore::new()));
    add(&mut app, "A");
    add(&mut app, "B");

    click_toggle(&mut app, "todo-1");

    click_filter(&mut app, "active");
    assert_eq!(texts(&app), ["B"]);

    click_filter(&mut app, "completed");
    assert_eq!(texts(&app), ["A"]);

    click_filter(&mut app, "nonsense");
    assert_eq!(texts(&app), ["A", "B"]);
}

#[test]
fn toggle_then_clear_completed() {
    let mut app = app_over(Arc::new(InMemoryKeyValueStore::new()));
    add(&mut app, "A");
    add(&mut app, "B");

    click_toggle(&mut app, "todo-2");
    app.dispatch(UiEvent::ClearCompletedClicked).unwrap();

    assert_eq!(texts(&app), ["A"]);
    assert!(
        app.view()
            .find_all(|e| e.has_class("clear-completed-btn"))
            .is_empty()
    );
}

#[test]
fn corrupt_saved_value_starts_empty() {
    let store = Arc::new(InMemoryKeyValueStore::with_entry(STORAGE_KEY, "not-json!!!"));

    let app = app_over(store);

    assert_eq!(app.state(|s| s.count()), 0);
    assert!(to_text(&app.view()).starts_with("Nothing to do yet."));
}

#[test]
fn saves_only_when_list_changes() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let mut app = app_over(store.clone());

    add(&mut app, "   ");
    click_toggle(&mut app, "missing");
    click_filter(&mut app, "completed");
    assert!(store.is_empty());

    add(&mut app, "A");
    let saved = store.raw(STORAGE_KEY).unwrap();
    let value: serde_json::Value = serde_json::from_str(&saved).unwrap();
    assert_eq!(value[0]["id"], "todo-1");
    assert_eq!(value[0]["text"], "A");
    assert_eq!(value[0]["completed"], false);
    assert_eq!(value[0]["createdAt"], test_clock().now().timestamp_millis());
}

#[test]
fn storage_failures_do_not_interrupt() {
    let store = Arc::new(FailingKeyValueStore::new());
    let mut app = app_over(store.clone());

    add(&mut app, "A");
    click_toggle(&mut app, "todo-1");

    assert_eq!(app.state(|s| s.count()), 1);
    assert!(app.state(|s| s.todos[0].completed));
    // One failed load, two failed saves
    assert_eq!(store.attempts(), 3);
}

#[test]
fn reload_picks_up_changes_from_another_session() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let mut first = app_over(store.clone());
    let mut second = app_over(store.clone());

    add(&mut first, "Written by first");
    second
        .dispatch(UiEvent::StorageChanged {
            key: STORAGE_KEY.to_string(),
        })
        .unwrap();

    assert_eq!(texts(&second), ["Written by first"]);
}

#[test]
fn reload_from_unreadable_storage_keeps_the_list() {
    let store = Arc::new(InMemoryKeyValueStore::new());
    let mut app = app_over(store.clone());
    add(&mut app, "A");
    add(&mut app, "B");

    store.fail_reads(true);
    app.dispatch(UiEvent::StorageChanged {
        key: STORAGE_KEY.to_string(),
    })
    .unwrap();

    assert_eq!(texts(&app), ["A", "B"]);

    store.fail_reads(false);
    add(&mut app, "C");

    let saved: serde_json::Value = serde_json::from_str(&store.raw(STORAGE_KEY).unwrap()).unwrap();
    let saved_texts: Vec<&str> = saved
        .as_array()
        .unwrap()
        .iter()
        .map(|record| record["text"].as_str().unwrap())
        .collect();
    assert_eq!(saved_texts, ["A", "B", "C"]);
}

#[test]
fn list_survives_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("storage.json");

    {
        let mut app = app_over(Arc::new(FileStore::new(&path)));
        add(&mut app, "Persisted");
        click_toggle(&mut app, "todo-1");
    }

    let app = app_over(Arc::new(FileStore::new(&path)));
    assert_eq!(texts(&app), ["Persisted"]);
    assert!(app.state(|s| s.todos[0].completed));
}
