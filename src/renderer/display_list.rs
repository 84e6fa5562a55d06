//! Recording canvas
//!
//! Keeps every command of a frame in order. Used by the headless driver and
//! by tests to inspect what a render pass drew.

use super::command::{Canvas, DrawCommand};

#[derive(Debug, Clone, Default)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Forget the previous frame
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Text of every label, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DisplayList {
    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
