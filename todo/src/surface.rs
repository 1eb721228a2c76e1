//! Surfaces that put a [`View`] in front of the user.
//!
//! Every surface redraws from scratch on each call; there is no diffing.

use crate::error::AppError;
use crate::storage::write_atomically;
use crate::view::{Element, Node, View};
use std::fmt::Write as _;
use std::io::Write;
use std::path::PathBuf;

/// Something a [`View`] can be presented on
pub trait Surface {
    /// Replaces whatever is shown with `view`
    ///
    /// # Errors
    ///
    /// Returns [`AppError`] if the output cannot be written.
    fn present(&mut self, view: &View) -> Result<(), AppError>;
}

// ========== HTML ==========

/// Elements that never have children or a closing tag
const VOID_ELEMENTS: [&str; 2] = ["input", "br"];

/// Escapes text for use in HTML content and quoted attribute values
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Serializes a node tree to HTML
#[must_use]
pub fn node_to_html(node: &Node) -> String {
    let mut out = String::new();
    write_html(node, &mut out);
    out
}

/// Serializes both regions of a view, main first
#[must_use]
pub fn to_html(view: &View) -> String {
    let mut out = node_to_html(&view.main);
    out.push_str(&node_to_html(&view.footer));
    out
}

fn write_html(node: &Node, out: &mut String) {
    match node {
        Node::Text(text) => out.push_str(&escape_html(text)),
        Node::Element(element) => {
            out.push('<');
            out.push_str(element.tag);
            for (name, value) in &element.attributes {
                match value {
                    Some(value) => {
                        let _ = write!(out, " {name}=\"{}\"", escape_html(value));
                    },
                    None => {
                        let _ = write!(out, " {name}");
                    },
                }
            }
            out.push('>');

            if VOID_ELEMENTS.contains(&element.tag) {
                return;
            }

            for child in &element.children {
                write_html(child, out);
            }
            let _ = write!(out, "</{}>", element.tag);
        },
    }
}

/// Wraps the rendered regions in a standalone page
#[must_use]
pub fn html_document(view: &View) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <title>Todo</title>\n\
         </head>\n\
         <body>\n\
         <section class=\"todoapp\">\n\
         <h1>Todo</h1>\n\
         <input id=\"todo-input\" class=\"new-todo\" placeholder=\"What needs to be done?\">\n\
         <div id=\"list-container\">{}</div>\n\
         <div id=\"footer-container\">{}</div>\n\
         </section>\n\
         </body>\n\
         </html>\n",
        node_to_html(&view.main),
        node_to_html(&view.footer),
    )
}

/// Rewrites an HTML file with the whole page on every presentation
///
/// The page is replaced atomically, so a browser reloading it never sees a
/// partial document.
#[derive(Debug, Clone)]
pub struct HtmlFileSurface {
    path: PathBuf,
}

impl HtmlFileSurface {
    /// Surface writing to `path`
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl Surface for HtmlFileSurface {
    fn present(&mut self, view: &View) -> Result<(), AppError> {
        write_atomically(&self.path, &html_document(view)).map_err(|source| AppError::Surface {
            path: self.path.clone(),
            source,
        })?;
        tracing::trace!(path = %self.path.display(), "Wrote HTML view");
        Ok(())
    }
}

// ========== Terminal ==========

/// Renders a view as plain text
///
/// Rows are numbered from 1 so they can be referred to by position.
/// Checkboxes read `[x]`/`[ ]`, buttons `[Label]`, and the pressed filter
/// `[*Label*]`.
#[must_use]
pub fn to_text(view: &View) -> String {
    let mut out = String::new();
    write_block(&view.main, &mut out);
    write_block(&view.footer, &mut out);
    out
}

fn write_block(node: &Node, out: &mut String) {
    match node {
        Node::Element(element) if element.tag == "ul" => {
            let rows = element.children.iter().filter_map(Node::as_element);
            for (index, row) in rows.enumerate() {
                let _ = writeln!(out, "{:>3}. {}", index + 1, inline(row).join(" "));
            }
        },
        node => {
            let _ = writeln!(out, "{}", inline_node(node).join(" "));
        },
    }
}

fn inline_node(node: &Node) -> Vec<String> {
    match node {
        Node::Text(text) => vec![text.clone()],
        Node::Element(element) => inline(element),
    }
}

fn inline(element: &Element) -> Vec<String> {
    match element.tag {
        "input" if element.attr("type") == Some("checkbox") => {
            let mark = if element.has_attr("checked") { "[x]" } else { "[ ]" };
            vec![mark.to_string()]
        },
        "input" => vec![format!("> {}", element.attr("value").unwrap_or_default())],
        "button" => {
            let label = element.text_content();
            let label = if label.trim().is_empty() {
                element.attr("aria-label").unwrap_or_default().to_string()
            } else {
                label
            };
            if element.attr("aria-pressed") == Some("true") {
                vec![format!("[*{label}*]")]
            } else {
                vec![format!("[{label}]")]
            }
        },
        _ => element.children.iter().flat_map(inline_node).collect(),
    }
}

/// Prints the text rendering to a writer, typically stdout
#[derive(Debug)]
pub struct TerminalSurface<W: Write> {
    out: W,
}

impl<W: Write> TerminalSurface<W> {
    /// Surface printing to `out`
    pub const fn new(out: W) -> Self {
        Self { out }
    }

    /// Consumes the surface, returning the writer
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Surface for TerminalSurface<W> {
    fn present(&mut self, view: &View) -> Result<(), AppError> {
        self.out.write_all(to_text(view).as_bytes())?;
        self.out.flush()?;
        Ok(())
    }
}
