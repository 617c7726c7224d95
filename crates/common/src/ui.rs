//! User interface implementations

use std::sync::{Arc, Mutex, PoisonError};

use console::style;

use cm_runtime::deps::{MessageStyle, UserInterface};

/// Production UI implementation writing to the terminal
pub struct RealUserInterface;

impl UserInterface for RealUserInterface {
    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn print_styled(&self, message: &str, msg_style: MessageStyle) {
        let styled = match msg_style {
            MessageStyle::Warning => style(message).yellow().bold(),
        };
        println!("{styled}");
    }
}

// Test implementations for mocking

/// Test UI implementation that captures output
#[derive(Default)]
pub struct TestUserInterface {
    /// Everything printed to stdout, styled or not
    pub output: Arc<Mutex<Vec<String>>>,
    /// Styled messages with their style
    pub styled_output: Arc<Mutex<Vec<(String, MessageStyle)>>>,
}

impl TestUserInterface {
    /// Create an empty capturing UI
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured stdout lines
    pub fn get_output(&self) -> Vec<String> {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Captured styled lines
    pub fn get_styled_output(&self) -> Vec<(String, MessageStyle)> {
        self.styled_output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl UserInterface for TestUserInterface {
    fn print(&self, message: &str) {
        self.output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }

    fn print_styled(&self, message: &str, style: MessageStyle) {
        // Add to both styled output and regular output for easier testing
        self.styled_output
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((message.to_string(), style));
        self.print(message);
    }
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
