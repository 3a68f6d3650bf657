//! In-memory collaborators for tests and demos.

use std::cell::RefCell;
use std::collections::HashMap;

use crate::env::{Logger, StyleSink};

pub use crate::env::ManualClock as MockClock;

/// One recorded style write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleWrite {
    pub element: String,
    pub property: String,
    pub value: String,
}

/// Inline styles keyed by element name.
///
/// Any element type that can be viewed as a string works as a key.
#[derive(Debug, Default)]
pub struct MockStyleSheet {
    styles: RefCell<HashMap<(String, String), String>>,
    writes: RefCell<Vec<StyleWrite>>,
}

impl MockStyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a value without recording a write.
    pub fn set(&self, element: &str, property: &str, value: &str) {
        self.styles
            .borrow_mut()
            .insert((element.to_string(), property.to_string()), value.to_string());
    }

    /// Current value, or an empty string when unset.
    pub fn get(&self, element: &str, property: &str) -> String {
        self.styles
            .borrow()
            .get(&(element.to_string(), property.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    pub fn writes(&self) -> Vec<StyleWrite> {
        self.writes.borrow().clone()
    }

    /// Values written to one property, oldest first.
    pub fn history(&self, element: &str, property: &str) -> Vec<String> {
        self.writes
            .borrow()
            .iter()
            .filter(|write| write.element == element && write.property == property)
            .map(|write| write.value.clone())
            .collect()
    }

    pub fn clear_writes(&self) {
        self.writes.borrow_mut().clear();
    }
}

impl<E: AsRef<str> + ?Sized> StyleSink<E> for MockStyleSheet {
    fn read_style(&self, element: &E, property: &str) -> String {
        self.get(element.as_ref(), property)
    }

    fn write_style(&self, element: &E, property: &str, value: &str) {
        self.set(element.as_ref(), property, value);
        self.writes.borrow_mut().push(StyleWrite {
            element: element.as_ref().to_string(),
            property: property.to_string(),
            value: value.to_string(),
        });
    }
}

/// Logger that keeps every message.
#[derive(Debug, Default)]
pub struct RecordingLogger {
    warnings: RefCell<Vec<String>>,
    messages: RefCell<Vec<String>>,
}

impl RecordingLogger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }
}

impl Logger for RecordingLogger {
    fn warn(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn log(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}
