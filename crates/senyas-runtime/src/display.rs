//! Display list and audio cues
//!
//! Scenes describe a frame as data. The embedding application owns the
//! window, the fonts, the decoded video and the mixer; it walks the list and
//! draws each command in order.

use std::time::Duration;

use senyas_recognition::Confetti;

/// Role of a text line, for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    Title,
    Body,
    /// Editable text with a caret
    Input,
    /// Recognition feedback under the camera feed
    Verdict,
    /// Debug overlay
    Debug,
    /// Error banner, e.g. a failed save
    Notice,
}

/// One draw command
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A video clip at a playback position
    Clip {
        key: String,
        position: Duration,
        looping: bool,
    },
    /// A still image, e.g. the sign to copy
    Image { key: String },
    /// The live camera feed
    CameraFeed,
    Text { role: TextRole, text: String },
    Button { name: String, hovered: bool },
    Confetti(Vec<Confetti>),
    /// The on-screen keyboard widget
    Keyboard,
}

/// Ordered draw commands for one frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn text(&mut self, role: TextRole, text: impl Into<String>) {
        self.commands.push(DrawCommand::Text {
            role,
            text: text.into(),
        });
    }

    pub fn button(&mut self, name: impl Into<String>, hovered: bool) {
        self.commands.push(DrawCommand::Button {
            name: name.into(),
            hovered,
        });
    }

    pub fn clear(&mut self) {
        self.commands.clear();
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

    /// Text lines with the given role
    pub fn texts(&self, role: TextRole) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(move |c| match c {
            DrawCommand::Text { role: r, text } if *r == role => Some(text.as_str()),
            _ => None,
        })
    }

    pub fn has_text(&self, role: TextRole, text: &str) -> bool {
        self.texts(role).any(|t| t == text)
    }

    pub fn has_button(&self, name: &str) -> bool {
        self.commands
            .iter()
            .any(|c| matches!(c, DrawCommand::Button { name: n, .. } if n == name))
    }

    pub fn confetti_count(&self) -> usize {
        self.commands
            .iter()
            .map(|c| match c {
                DrawCommand::Confetti(particles) => particles.len(),
                _ => 0,
            })
            .sum()
    }
}

/// Sound request for the embedding mixer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCue {
    /// One-shot effect or narration
    Play(String),
    /// Stop the narration started by the current scene
    StopNarration,
}

/// Well-known sound keys
pub mod sounds {
    pub const HOVER: &str = "cursor_on_top";
    pub const CLICK: &str = "mouse_click";
    pub const CELEBRATION: &str = "confetti";
}
