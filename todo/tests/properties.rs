//! Property tests for the list operations and the saved format.

use proptest::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use tasklist_core::DateTime;
use tasklist_testing::properties::{blank_text, task_text};
use tasklist_testing::{test_clock, InMemoryKeyValueStore, SequentialIdGenerator};
use todo::domain;
use todo::{Filter, Todo, TodoId, TodoList, TodoRepository};

/// Lists of up to 12 tasks with distinct ids and a mix of states
fn arb_list() -> impl Strategy<Value = TodoList> {
    prop::collection::vec(
        (task_text(), any::<bool>(), prop::option::of(0_i64..4_102_444_800_000)),
        0..12,
    )
    .prop_map(|entries| {
        entries
            .into_iter()
            .enumerate()
            .map(|(index, (text, completed, created_ms))| Todo {
                completed,
                ..Todo::new(
                    TodoId::new(format!("id-{index}")),
                    &text,
                    created_ms.and_then(DateTime::from_timestamp_millis),
                )
            })
            .collect()
    })
}

/// A list together with the index of one of its entries
fn arb_list_and_index() -> impl Strategy<Value = (TodoList, usize)> {
    arb_list()
        .prop_filter("needs an entry", |list| !list.is_empty())
        .prop_flat_map(|list| {
            let len = list.len();
            (Just(list), 0..len)
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Adding text grows the list by one, with the trimmed text last
    #[test]
    fn prop_add_appends_trimmed(list in arb_list(), text in task_text()) {
        let ids = SequentialIdGenerator::new();

        let next = domain::add(&list, &text, &ids, &test_clock());

        prop_assert_eq!(next.len(), list.len() + 1);
        prop_assert_eq!(next[list.len()].text.as_str(), text.trim());
        prop_assert!(!next[list.len()].completed);
    }

    /// Adding blank text hands back the same list
    #[test]
    fn prop_add_blank_is_identity(list in arb_list(), text in blank_text()) {
        let ids = SequentialIdGenerator::new();

        prop_assert!(domain::add(&list, &text, &ids, &test_clock()).ptr_eq(&list));
    }

    /// Removing what was just added restores the original content
    #[test]
    fn prop_remove_after_add_round_trips(list in arb_list(), text in task_text()) {
        let ids = SequentialIdGenerator::new();

        let added = domain::add(&list, &text, &ids, &test_clock());
        let id = added[added.len() - 1].id.clone();

        prop_assert_eq!(domain::remove(&added, &id), list);
    }

    /// Toggling twice restores the original content
    #[test]
    fn prop_toggle_is_involution((list, index) in arb_list_and_index()) {
        let id = list[index].id.clone();

        let twice = domain::toggle(&domain::toggle(&list, &id), &id);

        prop_assert_eq!(twice, list);
    }

    /// Toggling touches exactly one entry
    #[test]
    fn prop_toggle_shares_other_entries((list, index) in arb_list_and_index()) {
        let next = domain::toggle(&list, &list[index].id);

        for (position, (before, after)) in list.iter().zip(next.iter()).enumerate() {
            if position == index {
                prop_assert_eq!(after.completed, !before.completed);
            } else {
                prop_assert!(Arc::ptr_eq(before, after));
            }
        }
    }

    /// Clearing completed tasks twice equals clearing once
    #[test]
    fn prop_clear_completed_is_idempotent(list in arb_list()) {
        let once = domain::clear_completed(&list);
        let twice = domain::clear_completed(&once);

        prop_assert!(twice.ptr_eq(&once));
        prop_assert!(once.iter().all(|todo| !todo.completed));
    }

    /// Active and completed partition the list
    #[test]
    fn prop_filters_partition(list in arb_list()) {
        let active = domain::filter(&list, Filter::Active);
        let completed = domain::filter(&list, Filter::Completed);

        let active_ids: HashSet<TodoId> = active.iter().map(|todo| todo.id.clone()).collect();
        let completed_ids: HashSet<TodoId> =
            completed.iter().map(|todo| todo.id.clone()).collect();
        let all_ids: HashSet<TodoId> = list.iter().map(|todo| todo.id.clone()).collect();

        prop_assert!(active_ids.is_disjoint(&completed_ids));
        prop_assert_eq!(&active_ids | &completed_ids, all_ids);
        prop_assert_eq!(active.len() + completed.len(), list.len());
        prop_assert!(active.iter().all(|todo| !todo.completed));
        prop_assert!(completed.iter().all(|todo| todo.completed));
        prop_assert_eq!(domain::filter(&list, Filter::All).len(), list.len());
        prop_assert_eq!(domain::count_active(&list), active.len());
    }

    /// Editing with blank text never changes the list
    #[test]
    fn prop_blank_edit_is_identity((list, index) in arb_list_and_index(), text in blank_text()) {
        prop_assert!(domain::edit(&list, &list[index].id, &text).ptr_eq(&list));
    }

    /// A saved list loads back equal
    #[test]
    fn prop_save_load_round_trip(list in arb_list()) {
        let repository = TodoRepository::new(Arc::new(InMemoryKeyValueStore::new()));

        repository.save(&list);

        prop_assert_eq!(repository.load(), list);
    }
}
