//! Daily token trend rendered as a labelled sparkline

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Widget,
};

use crate::projection::DailyTokens;

const BAR_CHARS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// One column per day: a bar scaled to the busiest day with its weekday
/// label underneath when there is room for a second row.
pub struct TrendSparkline<'a> {
    days: &'a [DailyTokens],
    style: Style,
    label_style: Style,
}

impl<'a> TrendSparkline<'a> {
    pub fn new(days: &'a [DailyTokens]) -> Self {
        Self {
            days,
            style: Style::default().fg(Color::Cyan),
            label_style: Style::default().fg(Color::DarkGray),
        }
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn label_style(mut self, style: Style) -> Self {
        self.label_style = style;
        self
    }
}

impl<'a> Widget for TrendSparkline<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 || self.days.is_empty() {
            return;
        }

        let slot = (area.width as usize / self.days.len()).clamp(1, 6);
        let max = self.days.iter().map(|d| d.tokens).max().unwrap_or(0);
        let bar_row = if area.height >= 2 {
            area.y + area.height - 2
        } else {
            area.y
        };

        for (i, day) in self.days.iter().enumerate() {
            let x = area.x + (i * slot) as u16;
            if x >= area.x + area.width {
                break;
            }
            if day.tokens > 0 {
                let ch = BAR_CHARS[bar_level(day.tokens, max)];
                let width = slot.saturating_sub(1).max(1) as u16;
                for dx in 0..width.min(area.x + area.width - x) {
                    buf.get_mut(x + dx, bar_row).set_char(ch).set_style(self.style);
                }
            }
            if area.height >= 2 {
                let room = (area.x + area.width - x) as usize;
                let label: String = day.label.chars().take(slot.min(room)).collect();
                buf.set_string(x, bar_row + 1, label, self.label_style);
            }
        }
    }
}

/// Index into the bar glyphs, 0..=7, scaled against `max`.
fn bar_level(value: u64, max: u64) -> usize {
    if max == 0 {
        return 0;
    }
    let scaled = ((value as f64 / max as f64) * 7.0).round() as usize;
    scaled.min(7)
}

/// The trend as a plain string, newest day last
pub fn sparkline_text(days: &[DailyTokens]) -> String {
    let max = days.iter().map(|d| d.tokens).max().unwrap_or(0);
    days.iter()
        .map(|d| {
            if d.tokens == 0 {
                ' '
            } else {
                BAR_CHARS[bar_level(d.tokens, max)]
            }
        })
        .collect()
}
