//! Headless document model.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::Surface;

/// A change made to a [`Document`], recorded in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    ClassAdded(String),
    ClassRemoved(String),
    ThemeColor(String),
    StylesheetInstalled,
}

/// An in-memory stand-in for a page: the root container's class list, an
/// optional theme-color meta element, and installed stylesheets.
///
/// Clones share state, so a host can hand one clone to the controller and
/// inspect another. Every effective change is recorded as a [`SurfaceEvent`].
#[derive(Debug, Clone, Default)]
pub struct Document {
    inner: Rc<RefCell<DocumentState>>,
}

#[derive(Debug, Default)]
struct DocumentState {
    classes: Vec<String>,
    // `None` when the page has no theme-color meta element.
    theme_color: Option<String>,
    stylesheets: Vec<String>,
    events: Vec<SurfaceEvent>,
}

impl Document {
    /// A document without a theme-color meta element; color hints are skipped.
    pub fn new() -> Self {
        Self::default()
    }

    /// A document whose theme-color meta element starts with `content`.
    pub fn with_theme_meta(content: &str) -> Self {
        let doc = Self::default();
        doc.inner.borrow_mut().theme_color = Some(content.to_string());
        doc
    }

    pub fn classes(&self) -> Vec<String> {
        self.inner.borrow().classes.clone()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.inner.borrow().classes.iter().any(|c| c == class)
    }

    pub fn theme_color(&self) -> Option<String> {
        self.inner.borrow().theme_color.clone()
    }

    pub fn stylesheets(&self) -> Vec<String> {
        self.inner.borrow().stylesheets.clone()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.inner.borrow().events.clone()
    }

    /// Drains the recorded events.
    pub fn take_events(&self) -> Vec<SurfaceEvent> {
        std::mem::take(&mut self.inner.borrow_mut().events)
    }
}

impl Surface for Document {
    fn add_class(&mut self, class: &str) {
        let mut state = self.inner.borrow_mut();
        if !state.classes.iter().any(|c| c == class) {
            state.classes.push(class.to_string());
            state.events.push(SurfaceEvent::ClassAdded(class.to_string()));
        }
    }

    fn remove_class(&mut self, class: &str) {
        let mut state = self.inner.borrow_mut();
        let before = state.classes.len();
        state.classes.retain(|c| c != class);
        if state.classes.len() != before {
            state.events.push(SurfaceEvent::ClassRemoved(class.to_string()));
        }
    }

    fn has_class(&self, class: &str) -> bool {
        Document::has_class(self, class)
    }

    fn set_theme_color(&mut self, color: &str) {
        let mut state = self.inner.borrow_mut();
        if let Some(current) = state.theme_color.as_mut() {
            *current = color.to_string();
            state.events.push(SurfaceEvent::ThemeColor(color.to_string()));
        }
    }

    fn install_stylesheet(&mut self, css: &str) {
        let mut state = self.inner.borrow_mut();
        state.stylesheets.push(css.to_string());
        state.events.push(SurfaceEvent::StylesheetInstalled);
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        write!(f, "class=\"{}\"", state.classes.join(" "))?;
        if let Some(color) = &state.theme_color {
            write!(f, " theme-color=\"{}\"", color)?;
        }
        Ok(())
    }
}
