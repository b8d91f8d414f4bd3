//! Colour palettes for the light and dark themes

use ratatui::style::{Color, Modifier, Style};

use crate::domain::Theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub bg: Color,
    pub fg: Color,
    pub muted: Color,
    pub border: Color,
    pub accent: Color,
    pub key: Color,
    pub ok: Color,
    pub warn: Color,
    pub error: Color,
}

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Light => Self {
                bg: Color::White,
                fg: Color::Black,
                muted: Color::DarkGray,
                border: Color::Gray,
                accent: Color::Blue,
                key: Color::Magenta,
                ok: Color::Green,
                warn: Color::Rgb(180, 120, 0),
                error: Color::Red,
            },
            Theme::Dark => Self {
                bg: Color::Reset,
                fg: Color::White,
                muted: Color::DarkGray,
                border: Color::DarkGray,
                accent: Color::Cyan,
                key: Color::Yellow,
                ok: Color::LightGreen,
                warn: Color::LightYellow,
                error: Color::LightRed,
            },
        }
    }

    pub fn base(&self) -> Style {
        Style::default().fg(self.fg).bg(self.bg)
    }

    pub fn muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn border(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn title(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    pub fn key(&self) -> Style {
        Style::default().fg(self.key)
    }

    pub fn selected(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_differ() {
        assert_ne!(Palette::for_theme(Theme::Light), Palette::for_theme(Theme::Dark));
        assert_eq!(Palette::for_theme(Theme::Light).bg, Color::White);
    }
}
