//! Keyboard mapping

/// What a key press means to the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Jump,
    Slide,
    Pause,
    Settings,
}

impl Action {
    /// Map a `KeyboardEvent.key` value
    pub fn from_key(key: &str) -> Option<Self> {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" | " " => Some(Action::Jump),
            "s" | "arrowdown" => Some(Action::Slide),
            "p" => Some(Action::Pause),
            "escape" => Some(Action::Settings),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_mapping() {
        assert_eq!(Action::from_key("w"), Some(Action::Jump));
        assert_eq!(Action::from_key("W"), Some(Action::Jump));
        assert_eq!(Action::from_key("ArrowUp"), Some(Action::Jump));
        assert_eq!(Action::from_key("s"), Some(Action::Slide));
        assert_eq!(Action::from_key("ArrowDown"), Some(Action::Slide));
        assert_eq!(Action::from_key("Escape"), Some(Action::Settings));
        assert_eq!(Action::from_key("q"), None);
    }
}
