//! Pure functions from task-list state to a [`View`].
//!
//! Class names and `data-*` attributes are the contract with the event layer:
//! rows carry `data-id`, controls carry `data-action` or `data-filter`.

use super::{Element, Node, View};
use crate::domain;
use crate::types::{Filter, Todo, TodoId, TodoList};
use std::sync::Arc;

/// Shown in place of the list when there are no tasks at all
pub const EMPTY_MESSAGE: &str = "Nothing to do yet. Add a task above!";

/// One row of the list
///
/// The row in edit mode gets class `editing` and an `input.edit` holding the
/// current text.
#[must_use]
pub fn render_todo_item(todo: &Todo, editing: bool) -> Node {
    let mut class = String::from("todo-item");
    if todo.completed {
        class.push_str(" completed");
    }
    if editing {
        class.push_str(" editing");
    }

    let row = Element::new("li")
        .with_attr("class", class)
        .with_attr("data-id", todo.id.as_str())
        .with_child(
            Element::new("input")
                .with_attr("type", "checkbox")
                .with_attr("class", "toggle")
                .with_attr("data-action", "toggle")
                .with_flag_if("checked", todo.completed),
        )
        .with_child(
            Element::new("span")
                .with_attr("class", "todo-text")
                .with_attr("data-action", "edit")
                .with_text(todo.text.as_str()),
        )
        .with_child(
            Element::new("button")
                .with_attr("class", "delete-btn")
                .with_attr("aria-label", "Delete")
                .with_attr("data-action", "delete")
                .with_text("\u{d7}"),
        );

    if editing {
        row.with_child(
            Element::new("input")
                .with_attr("type", "text")
                .with_attr("class", "edit")
                .with_attr("value", todo.text.as_str()),
        )
        .into()
    } else {
        row.into()
    }
}

/// The list element for the visible tasks
#[must_use]
pub fn render_todo_list(visible: &[Arc<Todo>], editing: Option<&TodoId>) -> Node {
    Element::new("ul")
        .with_attr("class", "todo-list")
        .with_children(
            visible
                .iter()
                .map(|todo| render_todo_item(todo, editing == Some(&todo.id))),
        )
        .into()
}

/// The main region: placeholder for an empty list, else the filtered rows
///
/// A non-empty list whose filter hides every task renders an empty list
/// element, not the placeholder.
#[must_use]
pub fn render_main(todos: &TodoList, filter: Filter, editing: Option<&TodoId>) -> Node {
    if todos.is_empty() {
        return Element::new("p")
            .with_attr("class", "empty-message")
            .with_text(EMPTY_MESSAGE)
            .into();
    }

    render_todo_list(&domain::filter(todos, filter), editing)
}

/// Counter, filter controls, and the clear-completed button
#[must_use]
pub fn render_footer(active: usize, completed: usize, filter: Filter) -> Node {
    let noun = if active == 1 { "item" } else { "items" };

    let filters = Filter::ALL.into_iter().map(|candidate| {
        let current = candidate == filter;
        Element::new("button")
            .with_attr(
                "class",
                if current { "filter-btn active" } else { "filter-btn" },
            )
            .with_attr("data-filter", candidate.as_str())
            .with_attr("aria-pressed", if current { "true" } else { "false" })
            .with_text(candidate.label())
    });

    let footer = Element::new("footer")
        .with_attr("class", "footer")
        .with_child(
            Element::new("span")
                .with_attr("class", "count")
                .with_text(format!("{active} {noun} left")),
        )
        .with_child(
            Element::new("div")
                .with_attr("class", "filters")
                .with_children(filters),
        );

    if completed > 0 {
        footer
            .with_child(
                Element::new("button")
                    .with_attr("class", "clear-completed-btn")
                    .with_attr("data-action", "clear-completed")
                    .with_text("Clear completed"),
            )
            .into()
    } else {
        footer.into()
    }
}

/// Renders the whole app
#[must_use]
pub fn render_app(todos: &TodoList, filter: Filter, editing: Option<&TodoId>) -> View {
    View {
        main: render_main(todos, filter, editing),
        footer: render_footer(
            domain::count_active(todos),
            domain::count_completed(todos),
            filter,
        ),
    }
}
