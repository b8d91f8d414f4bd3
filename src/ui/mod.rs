use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

pub mod layout;
pub mod tabs;
pub mod theme;
pub mod views;
pub mod widgets;

use crate::app::{
    App, ConnectionField, ConnectionForm, InputMode, Modal, PoolField, PoolForm, StatusLevel,
};
use crate::state::ViewId;
use theme::Palette;

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();
    let palette = Palette::for_theme(app.controller.theme());
    let areas = layout::areas(size);

    f.render_widget(Block::default().style(palette.base()), size);

    draw_header(f, areas.header, app, &palette);
    tabs::draw_tab_bar(f, areas.tabs, app.current_view(), &palette);

    match app.current_view() {
        ViewId::Dashboard => views::draw_dashboard(f, areas.main, app, &palette),
        ViewId::Connections => views::draw_connections(f, areas.main, app, &palette),
        ViewId::Pools => views::draw_pools(f, areas.main, app, &palette),
        ViewId::Usage => views::draw_usage(f, areas.main, app, &palette),
        ViewId::Chat => views::draw_chat(f, areas.main, app, &palette),
        ViewId::Settings => views::draw_settings(f, areas.main, app, &palette),
    }

    draw_status_line(f, areas.status_line, app, &palette);
    draw_command_line(f, areas.command_line, app, &palette);

    if let Some(modal) = app.modal.as_ref() {
        draw_modal(f, areas.size, modal, &palette);
    }
    if app.help_open {
        draw_help_popup(f, areas.size, app, &palette);
    }
}

fn draw_header(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let dashboard = &app.controller.displays().dashboard;
    let title = Line::from(vec![
        Span::styled(
            "AI Router",
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("Welcome back, ", palette.muted()),
        Span::styled(dashboard.user_name.clone(), Style::default().fg(palette.fg)),
    ]);
    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL).border_style(palette.border()))
        .alignment(Alignment::Left);

    let state = app.controller.state();
    let mut right_spans = vec![
        Span::styled("Model ", palette.muted()),
        Span::raw(format!("{}  ", state.routing_target)),
        Span::styled("Theme ", palette.muted()),
        Span::raw(state.theme.as_str()),
    ];
    if app.controller.is_loading() {
        right_spans.push(Span::styled("  ⟳ working", Style::default().fg(palette.warn)));
    }
    let right = Paragraph::new(Line::from(right_spans))
        .block(Block::default().borders(Borders::ALL).border_style(palette.border()))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let state = app.controller.state();
    let mut spans = vec![
        Span::styled("View ", palette.muted()),
        Span::raw(format!("{}  ", app.current_view().title())),
        Span::styled("Connections ", palette.muted()),
        Span::raw(format!("{}  ", state.connections.len())),
        Span::styled("Pools ", palette.muted()),
        Span::raw(format!("{}  ", state.pools.len())),
    ];
    if !app.controller.activity_updates_running() {
        spans.push(Span::styled("Live updates off", palette.muted()));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().fg(palette.fg))
        .alignment(Alignment::Left);
    f.render_widget(paragraph, area);
}

/// Get command hint for autocompletion
fn command_hint(input: &str) -> Option<&'static str> {
    let input = input.trim().to_lowercase();
    if input.is_empty() {
        return None;
    }

    let commands = [
        ("view", "view <dashboard|connections|pools|usage|chat|settings>"),
        ("add", "add <provider> <label> <key>"),
        ("test", "test <connection-id>"),
        ("delete", "delete <connection-id>"),
        ("pool", "pool <name> [token-limit] [cost-limit]"),
        ("leave", "leave <pool-id>"),
        ("send", "send <message>"),
        ("model", "model <auto|model-name>"),
        ("period", "period <7d|30d|90d>"),
        ("theme", "Toggle light/dark theme"),
        ("help", "Show key bindings"),
        ("quit", "Quit"),
    ];

    let word = input.split_whitespace().next().unwrap_or("");
    commands
        .iter()
        .find(|(cmd, _)| cmd.starts_with(word))
        .map(|(_, desc)| *desc)
}

fn draw_command_line(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let content = match app.input_mode {
        InputMode::Command => {
            let hint = command_hint(&app.command.input).unwrap_or("Enter=run Esc=cancel");
            Line::from(vec![
                Span::styled(": ", palette.key()),
                Span::raw(app.command.input.clone()),
                Span::styled(format!("  {hint}"), palette.muted()),
            ])
        }
        InputMode::Chat => Line::from(Span::styled(
            "Enter=send  Tab=model  Esc=done",
            palette.muted(),
        )),
        InputMode::Normal => {
            if let Some((text, level)) = app.status_text() {
                let color = match level {
                    StatusLevel::Info => palette.ok,
                    StatusLevel::Warn => palette.warn,
                    StatusLevel::Error => palette.error,
                };
                Line::from(vec![
                    Span::styled("msg: ", palette.muted()),
                    Span::styled(text.to_string(), Style::default().fg(color)),
                ])
            } else {
                action_hints(app.current_view(), palette)
            }
        }
    };

    let paragraph = Paragraph::new(content).style(Style::default().fg(palette.fg));
    f.render_widget(paragraph, area);
}

fn action_hints(view: ViewId, palette: &Palette) -> Line<'static> {
    let pairs: &[(&str, &str)] = match view {
        ViewId::Dashboard => &[("1-6", "views"), ("t", "theme"), (":", "command")],
        ViewId::Connections => &[("a", "add"), ("x", "test"), ("d", "delete"), ("j/k", "select")],
        ViewId::Pools => &[("n", "new pool"), ("d", "leave"), ("j/k", "select")],
        ViewId::Usage => &[("p", "period")],
        ViewId::Chat => &[("i", "type"), ("m", "model")],
        ViewId::Settings => &[("h/l", "change"), ("s", "save"), ("j/k", "select")],
    };
    let mut spans = Vec::new();
    for (key, label) in pairs.iter().chain(&[("?", "help"), ("q", "quit")]) {
        spans.push(Span::styled(key.to_string(), palette.key()));
        spans.push(Span::styled(format!(" {label}  "), palette.muted()));
    }
    Line::from(spans)
}

fn draw_help_popup(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let popup_area = centered_rect(64, 70, area);
    f.render_widget(Clear, popup_area);

    let lines = vec![
        Line::from(Span::styled("Navigation", palette.title())),
        Line::from("  1-6        Dashboard, Connections, Pools, Usage, Chat, Settings"),
        Line::from("  Tab        Next view"),
        Line::from("  j / k      Move selection"),
        Line::from("  Esc        Close / clear message"),
        Line::from(""),
        Line::from(Span::styled("Actions", palette.title())),
        Line::from("  a          Add API connection"),
        Line::from("  x          Test connection (Connections)"),
        Line::from("  d          Delete connection / leave pool"),
        Line::from("  n          Create pool"),
        Line::from("  i          Type a chat message"),
        Line::from("  m          Cycle chat model (Chat)"),
        Line::from("  p          Cycle usage period (Usage)"),
        Line::from("  h / l      Change setting (Settings)"),
        Line::from("  s          Save settings (Settings)"),
        Line::from("  t          Toggle theme"),
        Line::from("  :          Command mode"),
        Line::from("  ?          Toggle help"),
        Line::from("  q          Quit"),
        Line::from(""),
        Line::from("Command examples:"),
        Line::from("  :add openai \"Personal\" sk-..."),
        Line::from("  :pool \"Night Owls\" 50000 25"),
        Line::from("  :model gpt-4"),
        Line::from(""),
        Line::from(format!("Current view: {}", app.current_view().title())),
    ];

    let paragraph = Paragraph::new(Text::from(lines))
        .style(palette.base())
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(palette.border()),
        )
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

fn draw_modal(f: &mut Frame, area: Rect, modal: &Modal, palette: &Palette) {
    match modal {
        Modal::AddConnection(form) => draw_connection_form(f, area, form, palette),
        Modal::CreatePool(form) => draw_pool_form(f, area, form, palette),
        Modal::Confirm(action) => {
            let lines = vec![
                Line::from(""),
                Line::from(format!(" {}", action.prompt())),
                Line::from(""),
                Line::from(vec![
                    Span::styled(" y", palette.key()),
                    Span::raw(" yes   "),
                    Span::styled("n", palette.key()),
                    Span::raw(" no"),
                ]),
            ];
            draw_popup(f, centered_rect(50, 25, area), "Confirm", lines, palette);
        }
        Modal::Alert { message, .. } => {
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" {message}"),
                    Style::default().fg(palette.error),
                )),
                Line::from(""),
                Line::from(Span::styled(" Enter to close", palette.muted())),
            ];
            draw_popup(f, centered_rect(50, 25, area), "Alert", lines, palette);
        }
    }
}

fn draw_connection_form(f: &mut Frame, area: Rect, form: &ConnectionForm, palette: &Palette) {
    let masked = "•".repeat(form.key.chars().count());
    let lines = vec![
        Line::from(""),
        form_line(
            "Provider",
            format!("◂ {} ▸", form.provider()),
            form.field == ConnectionField::Provider,
            palette,
        ),
        form_line("Label", form.label.clone(), form.field == ConnectionField::Label, palette),
        form_line("API key", masked, form.field == ConnectionField::Key, palette),
        Line::from(""),
        Line::from(Span::styled(
            " Tab=next field  ←/→=provider  Enter=add  Esc=cancel",
            palette.muted(),
        )),
    ];
    draw_popup(f, centered_rect(60, 40, area), "Add API Connection", lines, palette);
}

fn draw_pool_form(f: &mut Frame, area: Rect, form: &PoolForm, palette: &Palette) {
    let lines = vec![
        Line::from(""),
        form_line("Name", form.name.clone(), form.field == PoolField::Name, palette),
        form_line(
            "Description",
            form.description.clone(),
            form.field == PoolField::Description,
            palette,
        ),
        form_line(
            "Token limit",
            form.token_limit.clone(),
            form.field == PoolField::TokenLimit,
            palette,
        ),
        form_line(
            "Cost limit $",
            form.cost_limit.clone(),
            form.field == PoolField::CostLimit,
            palette,
        ),
        Line::from(""),
        Line::from(Span::styled(
            " Tab=next field  Enter=create  Esc=cancel",
            palette.muted(),
        )),
    ];
    draw_popup(f, centered_rect(60, 45, area), "Create Pool", lines, palette);
}

fn form_line(label: &str, value: String, active: bool, palette: &Palette) -> Line<'static> {
    let marker = if active { "▸" } else { " " };
    let value_style = if active {
        Style::default()
            .fg(palette.fg)
            .add_modifier(Modifier::UNDERLINED)
    } else {
        Style::default().fg(palette.fg)
    };
    Line::from(vec![
        Span::styled(format!("{marker} {label:<13}"), palette.muted()),
        Span::styled(value, value_style),
    ])
}

fn draw_popup(f: &mut Frame, area: Rect, title: &str, lines: Vec<Line>, palette: &Palette) {
    f.render_widget(Clear, area);
    let paragraph = Paragraph::new(Text::from(lines))
        .style(palette.base())
        .block(
            Block::default()
                .title(Span::styled(title.to_string(), palette.title()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.accent)),
        )
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
