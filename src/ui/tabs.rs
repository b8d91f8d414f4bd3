//! View tab bar

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs as RataTabs;
use ratatui::Frame;

use crate::state::ViewId;
use crate::ui::theme::Palette;

/// Draw the view tabs with their number shortcuts
pub fn draw_tab_bar(f: &mut Frame, area: Rect, current: ViewId, palette: &Palette) {
    let titles: Vec<Line> = ViewId::ALL
        .iter()
        .map(|view| {
            Line::from(vec![
                Span::styled(format!("{}:", view.shortcut()), palette.muted()),
                Span::raw(view.title()),
            ])
        })
        .collect();

    let selected = ViewId::ALL.iter().position(|v| *v == current).unwrap_or(0);

    let tabs = RataTabs::new(titles)
        .select(selected)
        .style(palette.base())
        .highlight_style(
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        )
        .divider(" │ ");

    f.render_widget(tabs, area);
}
