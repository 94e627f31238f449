use crate::error::{ErrorContext, KioskError};
use colored::{Color, Colorize};

/// Plain rendering of an error with its details and suggestion.
pub fn format_error_chain(error: &KioskError) -> String {
    ErrorContext::new(error).to_string()
}

/// Renders an error for a terminal. Headings and suggestions are colored when
/// `use_color` is set.
pub fn format_error_with_color(error: &KioskError, use_color: bool) -> String {
    let paint = |text: String, color: Color, bold: bool| {
        if !use_color {
            return text;
        }
        let colored = if bold {
            text.color(color).bold()
        } else {
            text.color(color)
        };
        colored.to_string()
    };

    let context = ErrorContext::new(error);
    let mut lines = vec![format!(
        "{} {error}",
        paint("Error:".to_string(), Color::Red, true)
    )];

    if let Some(details) = &context.details {
        lines.push(String::new());
        lines.push(details.clone());
    }

    if let Some(suggestion) = &context.suggestion {
        lines.push(String::new());
        lines.push(paint("Suggestions:".to_string(), Color::Yellow, true));
        lines.extend(
            suggestion
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| paint(format!("• {line}"), Color::Cyan, false)),
        );
    }

    lines.join("\n")
}
