//! Terminal capability detection and status colouring

use owo_colors::{colors::css, OwoColorize};
use travel_desk::{domain::AssetStatus, BatchStatus, RequestStatus};

/// Detects whether colored output should be enabled
pub fn supports_color() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

/// Detects terminal width, returning None if not available
pub fn terminal_width() -> Option<u16> {
    terminal_size::terminal_size().map(|(w, _)| w.0)
}

/// Check if terminal is narrow (< 80 columns)
pub fn is_narrow() -> bool {
    terminal_width().is_some_and(|w| w < 80)
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
    /// Bold the text
    fn strong(&self) -> String;
}

impl Colorize for str {
    fn success(&self) -> String {
        if supports_color() {
            self.fg::<css::Green>().to_string()
        } else {
            self.to_string()
        }
    }

    fn warning(&self) -> String {
        if supports_color() {
            self.fg::<css::Orange>().to_string()
        } else {
            self.to_string()
        }
    }

    fn info(&self) -> String {
        if supports_color() {
            self.fg::<css::LightBlue>().to_string()
        } else {
            self.to_string()
        }
    }

    fn dim(&self) -> String {
        if supports_color() {
            self.dimmed().to_string()
        } else {
            self.to_string()
        }
    }

    fn strong(&self) -> String {
        if supports_color() {
            self.bold().to_string()
        } else {
            self.to_string()
        }
    }
}

impl Colorize for String {
    fn success(&self) -> String {
        self.as_str().success()
    }

    fn warning(&self) -> String {
        self.as_str().warning()
    }

    fn info(&self) -> String {
        self.as_str().info()
    }

    fn dim(&self) -> String {
        self.as_str().dim()
    }

    fn strong(&self) -> String {
        self.as_str().strong()
    }
}

/// The label of a batch status padded to at least `width`, coloured like the
/// dashboard badges.
pub fn batch_badge(status: BatchStatus, width: usize) -> String {
    let label = format!("{:<width$}", status.label());
    match status {
        BatchStatus::Planning => label.warning(),
        BatchStatus::Confirmed => label.success(),
        BatchStatus::InProgress => label.info(),
        BatchStatus::Completed => label.dim(),
    }
}

/// The label of a request status padded to at least `width`, coloured like the
/// dashboard badges.
pub fn request_badge(status: RequestStatus, width: usize) -> String {
    let label = format!("{:<width$}", status.label());
    match status {
        RequestStatus::Draft => label.dim(),
        RequestStatus::Sent => label.info(),
        RequestStatus::Validated => label.success(),
    }
}

/// The label of an asset status, coloured like the dashboard badges.
pub fn asset_badge(status: AssetStatus) -> String {
    let label = status.label();
    match status {
        AssetStatus::Assigned => label.info(),
        AssetStatus::Available => label.dim(),
        AssetStatus::Maintenance => label.warning(),
    }
}

/// Pads `text` to `width` characters, truncating with an ellipsis if needed.
///
/// Width is counted in characters, so accented names line up.
pub fn fit(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        format!("{text}{}", " ".repeat(width - count))
    } else {
        let mut truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        truncated.push('…');
        truncated
    }
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::{asset_badge, fit, AssetStatus};

    #[test_case("Paris", 8, "Paris   "; "padded")]
    #[test_case("Défense", 7, "Défense"; "exact with accent")]
    #[test_case("Salon Tech Paris", 8, "Salon T…"; "truncated")]
    fn fit_pads_and_truncates(text: &str, width: usize, expected: &str) {
        assert_eq!(fit(text, width), expected);
    }

    #[test_case(AssetStatus::Assigned, "Assigné")]
    #[test_case(AssetStatus::Available, "Disponible")]
    #[test_case(AssetStatus::Maintenance, "Maintenance")]
    fn asset_badges_carry_the_label(status: AssetStatus, label: &str) {
        assert!(asset_badge(status).contains(label));
    }
}
