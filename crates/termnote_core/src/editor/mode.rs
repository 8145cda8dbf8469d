//! Editor modes

/// Interpretation of the single input buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditorMode {
    /// Buffer mirrors the current note's content.
    #[default]
    Edit,
    /// Buffer holds a `:`-prefixed command.
    Command,
}

impl EditorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::Edit => "EDIT",
            EditorMode::Command => "COMMAND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_strings() {
        assert_eq!(EditorMode::default(), EditorMode::Edit);
        assert_eq!(EditorMode::Edit.as_str(), "EDIT");
        assert_eq!(EditorMode::Command.as_str(), "COMMAND");
    }
}
