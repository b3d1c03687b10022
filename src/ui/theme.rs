use crate::status::Status;
use owo_colors::Style;
use std::sync::OnceLock;

static THEME: OnceLock<Theme> = OnceLock::new();

#[derive(Debug, Clone)]
pub struct Theme {
    pub colored: bool,
    pub header: Style,
    pub success: Style,
    pub error: Style,
    pub warn: Style,
    pub dim: Style,
    pub muted: Style,
}

impl Theme {
    pub fn detect() -> Self {
        if !console::Term::stdout().is_term() {
            return Self::plain();
        }
        Self::colored()
    }

    pub fn colored() -> Self {
        Self {
            colored: true,
            header: Style::new().cyan().bold(),
            success: Style::new().green().bold(),
            error: Style::new().red().bold(),
            warn: Style::new().yellow().bold(),
            dim: Style::new().white().dimmed(),
            muted: Style::new().bright_black(),
        }
    }

    pub fn plain() -> Self {
        Self {
            colored: false,
            header: Style::new(),
            success: Style::new(),
            error: Style::new(),
            warn: Style::new(),
            dim: Style::new(),
            muted: Style::new(),
        }
    }

    /// Style in the status' own color
    pub fn status(&self, status: Status) -> Style {
        if !self.colored {
            return Style::new();
        }
        match hex_rgb(status.color()) {
            Some((r, g, b)) => Style::new().truecolor(r, g, b).bold(),
            None => Style::new().bold(),
        }
    }
}

/// `#rrggbb` to its components
fn hex_rgb(hex: &str) -> Option<(u8, u8, u8)> {
    let hex = hex.strip_prefix('#')?;
    if hex.len() != 6 {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    Some((channel(0)?, channel(2)?, channel(4)?))
}

pub fn theme() -> &'static Theme {
    THEME.get_or_init(Theme::detect)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_colors_parse() {
        for status in Status::all() {
            assert!(hex_rgb(status.color()).is_some(), "{:?}", status);
        }
        assert_eq!(hex_rgb("#30d158"), Some((0x30, 0xd1, 0x58)));
        assert_eq!(hex_rgb("30d158"), None);
    }
}
