//! Input events
//!
//! Events arrive already resolved to semantic actions. Hit-testing a click
//! against button geometry is the embedding application's job; the engine
//! only sees the name of the button that was activated.

/// Semantic input event delivered to the active scene
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InputEvent {
    /// Pointer is over the named button, or over no button
    Hover(Option<String>),
    /// The named button was clicked or tapped
    Activate(String),
    /// Printable character typed on a physical or on-screen keyboard
    Char(char),
    Backspace,
    Submit,
    /// Skip the current clip
    Skip,
    /// Toggle the recognition debug overlay
    ToggleDebug,
    /// Request to close the player
    Quit,
}

impl InputEvent {
    pub fn activate(button: &str) -> Self {
        InputEvent::Activate(button.to_string())
    }

    pub fn hover(button: &str) -> Self {
        InputEvent::Hover(Some(button.to_string()))
    }

    /// Name of the activated button, if this is an activation
    pub fn activated(&self) -> Option<&str> {
        match self {
            InputEvent::Activate(name) => Some(name),
            _ => None,
        }
    }
}

/// Well-known button names shared by scene descriptors
pub mod buttons {
    pub const BACK: &str = "back";
    pub const NEXT: &str = "next";
    pub const PREVIOUS: &str = "previous";
    pub const DONE: &str = "done";
    pub const EDIT: &str = "edit";
    pub const LOAD: &str = "load";
    pub const DELETE: &str = "delete";
    /// Prefix for profile rows in the loader: `select:<name>`
    pub const SELECT_PREFIX: &str = "select:";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activated() {
        assert_eq!(InputEvent::activate(buttons::NEXT).activated(), Some("next"));
        assert_eq!(InputEvent::Char('a').activated(), None);
    }
}
