//! Semantic color palette for terminal output.

use owo_colors::{OwoColorize, Style};

/// Trait extension to apply semantic styles.
pub trait SemanticStyle: Sized {
    /// Green bold.
    fn success(&self) -> String;
    /// Red bold.
    fn error(&self) -> String;
    /// Yellow.
    fn warning(&self) -> String;
    /// Dimmed.
    fn muted(&self) -> String;
    /// Bold.
    fn header(&self) -> String;
}

fn styled(value: &impl std::fmt::Display, style: Style) -> String {
    if super::no_color() {
        value.to_string()
    } else {
        value.style(style).to_string()
    }
}

impl<T: std::fmt::Display> SemanticStyle for T {
    fn success(&self) -> String {
        styled(self, Style::new().green().bold())
    }

    fn error(&self) -> String {
        styled(self, Style::new().red().bold())
    }

    fn warning(&self) -> String {
        styled(self, Style::new().yellow())
    }

    fn muted(&self) -> String {
        styled(self, Style::new().dimmed())
    }

    fn header(&self) -> String {
        styled(self, Style::new().bold())
    }
}
