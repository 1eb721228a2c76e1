//! Declarative view tree.
//!
//! Rendering produces a [`View`]: plain data describing what should be on
//! screen. Turning it into HTML or terminal text is the job of a
//! [`crate::surface::Surface`]. Text is carried raw; escaping happens when a
//! surface serializes it.

mod render;

pub use render::{
    render_app, render_footer, render_main, render_todo_item, render_todo_list, EMPTY_MESSAGE,
};

/// A node in the view tree
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children
    Element(Element),
    /// A run of text
    Text(String),
}

impl Node {
    /// Text node
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text(text.into())
    }

    /// The element, if this node is one
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) => None,
        }
    }

    /// Concatenated text of this node and its descendants
    #[must_use]
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Self::Text(text) => out.push_str(text),
            Self::Element(element) => {
                for child in &element.children {
                    child.collect_text(out);
                }
            },
        }
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

/// An element: tag, ordered attributes, children
///
/// An attribute with no value is a boolean flag such as `checked`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    /// Tag name
    pub tag: &'static str,
    /// Attributes in output order
    pub attributes: Vec<(&'static str, Option<String>)>,
    /// Child nodes
    pub children: Vec<Node>,
}

impl Element {
    /// Creates an element with no attributes or children
    #[must_use]
    pub const fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    // ========== Builders ==========

    /// Adds a valued attribute
    #[must_use]
    pub fn with_attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, Some(value.into())));
        self
    }

    /// Adds a boolean attribute
    #[must_use]
    pub fn with_flag(mut self, name: &'static str) -> Self {
        self.attributes.push((name, None));
        self
    }

    /// Adds a boolean attribute when `on` holds
    #[must_use]
    pub fn with_flag_if(self, name: &'static str, on: bool) -> Self {
        if on { self.with_flag(name) } else { self }
    }

    /// Appends a child
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    /// Appends several children
    #[must_use]
    pub fn with_children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Node>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    /// Appends a text child
    #[must_use]
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(Node::text(text))
    }

    // ========== Queries ==========

    /// Value of attribute `name`; flags read as the empty string
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_deref().unwrap_or(""))
    }

    /// Whether attribute `name` is present
    #[must_use]
    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.iter().any(|(key, _)| *key == name)
    }

    /// Whether the `class` attribute lists `class`
    #[must_use]
    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
    }

    /// Every descendant element matching `predicate`, in document order
    ///
    /// The element itself is included when it matches.
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        let mut found = Vec::new();
        self.walk(&predicate, &mut found);
        found
    }

    /// First descendant element matching `predicate`
    pub fn find<F>(&self, predicate: F) -> Option<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        self.find_all(predicate).into_iter().next()
    }

    /// Concatenated text of the descendants
    #[must_use]
    pub fn text_content(&self) -> String {
        self.children.iter().map(Node::text_content).collect()
    }

    fn walk<'a, F>(&'a self, predicate: &F, found: &mut Vec<&'a Element>)
    where
        F: Fn(&Element) -> bool,
    {
        if predicate(self) {
            found.push(self);
        }
        for child in &self.children {
            if let Node::Element(element) = child {
                element.walk(predicate, found);
            }
        }
    }
}

/// Everything the app draws
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct View {
    /// The task list or the empty-state placeholder
    pub main: Node,
    /// Counter, filter controls and bulk actions
    pub footer: Node,
}

impl View {
    /// Elements of both regions matching `predicate`, in document order
    pub fn find_all<F>(&self, predicate: F) -> Vec<&Element>
    where
        F: Fn(&Element) -> bool,
    {
        [&self.main, &self.footer]
            .into_iter()
            .filter_map(Node::as_element)
            .flat_map(|element| element.find_all(&predicate))
            .collect()
    }

    /// Ids of the rendered rows, top to bottom
    #[must_use]
    pub fn row_ids(&self) -> Vec<String> {
        self.find_all(|element| element.has_class("todo-item"))
            .into_iter()
            .filter_map(|row| row.attr("data-id"))
            .map(str::to_string)
            .collect()
    }
}
