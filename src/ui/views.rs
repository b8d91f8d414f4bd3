//! One drawing function per dashboard view
//!
//! Everything drawn here comes from the controller's projected displays;
//! the only session state read from `App` is selection and input text.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    BarChart, Block, Borders, Cell, Gauge, List, ListItem, ListState, Paragraph, Row, Table,
    TableState, Wrap,
};
use ratatui::Frame;

use crate::app::{App, InputMode, SettingField};
use crate::domain::{ActivityKind, ChatRole, ConnectionStatus, PoolRole};
use crate::projection::{format, ActivityDisplay, Utilization};
use crate::ui::layout::columns;
use crate::ui::theme::Palette;
use crate::ui::widgets::TrendSparkline;

fn panel<'a>(title: &'a str, palette: &Palette) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(palette.border())
        .title(Span::styled(title, palette.title()))
}

fn stat_box(f: &mut Frame, area: Rect, title: &str, value: String, palette: &Palette) {
    let lines = vec![
        Line::from(Span::styled(
            value,
            Style::default().fg(palette.fg).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(title.to_string(), palette.muted())),
    ];
    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border()),
    );
    f.render_widget(paragraph, area);
}

// === Dashboard ===

pub fn draw_dashboard(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let display = &app.controller.displays().dashboard;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(8),
            Constraint::Min(4),
        ])
        .split(area);

    let stats = columns(chunks[0], 4);
    stat_box(
        f,
        stats[0],
        "Active connections",
        display.active_connections.to_string(),
        palette,
    );
    stat_box(
        f,
        stats[1],
        "Pool memberships",
        display.pool_memberships.to_string(),
        palette,
    );
    stat_box(f, stats[2], "Monthly cost", display.monthly_cost.clone(), palette);
    stat_box(f, stats[3], "Tokens used", display.tokens_used.clone(), palette);

    let charts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let trend_block = panel("USAGE TREND", palette);
    let inner = trend_block.inner(charts[0]);
    f.render_widget(trend_block, charts[0]);
    f.render_widget(
        TrendSparkline::new(&display.usage_trend)
            .style(Style::default().fg(palette.accent))
            .label_style(palette.muted()),
        inner,
    );

    let bars: Vec<(&str, u64)> = display
        .provider_split
        .iter()
        .map(|share| (share.provider.as_str(), share.tokens))
        .collect();
    let chart = BarChart::default()
        .block(panel("BY PROVIDER", palette))
        .data(&bars)
        .bar_width(9)
        .bar_gap(2)
        .bar_style(Style::default().fg(palette.accent))
        .value_style(Style::default().fg(palette.bg).bg(palette.accent))
        .label_style(palette.muted());
    f.render_widget(chart, charts[1]);

    draw_activity(f, chunks[2], &app.controller.displays().activity, palette);
}

fn draw_activity(f: &mut Frame, area: Rect, display: &ActivityDisplay, palette: &Palette) {
    let items: Vec<ListItem> = display
        .rows
        .iter()
        .map(|row| {
            let color = match row.kind {
                ActivityKind::Error => palette.error,
                ActivityKind::Usage => palette.warn,
                _ => palette.accent,
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", row.icon), Style::default().fg(color)),
                Span::styled(row.message.clone(), Style::default().fg(palette.fg)),
                Span::styled(format!("  {}", row.time), palette.muted()),
            ]))
        })
        .collect();

    let list = if items.is_empty() {
        List::new(vec![ListItem::new(Span::styled(
            " No recent activity",
            palette.muted(),
        ))])
    } else {
        List::new(items)
    };
    f.render_widget(list.block(panel("RECENT ACTIVITY", palette)), area);
}

// === Connections ===

pub fn draw_connections(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let display = &app.controller.displays().connections;

    if display.cards.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(" No connections yet", palette.muted())),
            Line::from(vec![
                Span::raw(" Press "),
                Span::styled("a", palette.key()),
                Span::raw(" to add your first API key"),
            ]),
        ];
        f.render_widget(
            Paragraph::new(lines).block(panel("API CONNECTIONS", palette)),
            area,
        );
        return;
    }

    let header = Row::new(["Label", "Provider", "Status", "Tokens", "Cost", "Last tested"])
        .style(palette.muted());
    let rows: Vec<Row> = display
        .cards
        .iter()
        .map(|card| {
            let status_color = match card.status {
                ConnectionStatus::Active => palette.ok,
                ConnectionStatus::Error => palette.error,
            };
            Row::new(vec![
                Cell::from(card.label.clone()),
                Cell::from(card.provider.clone()),
                Cell::from(Span::styled(
                    format!("● {}", card.status.as_str()),
                    Style::default().fg(status_color),
                )),
                Cell::from(card.tokens.clone()),
                Cell::from(card.cost.clone()),
                Cell::from(card.last_tested.clone()),
            ])
        })
        .collect();

    let widths = [
        Constraint::Percentage(24),
        Constraint::Percentage(14),
        Constraint::Percentage(12),
        Constraint::Percentage(14),
        Constraint::Percentage(12),
        Constraint::Percentage(24),
    ];
    let loading = if app.controller.is_loading() {
        "API CONNECTIONS (testing…)"
    } else {
        "API CONNECTIONS"
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(panel(loading, palette))
        .style(Style::default().fg(palette.fg))
        .highlight_style(palette.selected())
        .highlight_symbol("▸ ");

    let mut state = TableState::default().with_selected(Some(app.selected_connection));
    f.render_stateful_widget(table, area, &mut state);
}

// === Pools ===

pub fn draw_pools(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let display = &app.controller.displays().pools;

    if display.cards.is_empty() {
        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(" You are not in any pool", palette.muted())),
            Line::from(vec![
                Span::raw(" Press "),
                Span::styled("n", palette.key()),
                Span::raw(" to create one"),
            ]),
        ];
        f.render_widget(Paragraph::new(lines).block(panel("POOLS", palette)), area);
        return;
    }

    const CARD_HEIGHT: u16 = 8;
    let mut constraints: Vec<Constraint> = display
        .cards
        .iter()
        .map(|_| Constraint::Length(CARD_HEIGHT))
        .collect();
    constraints.push(Constraint::Min(0));
    let slots = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, card) in display.cards.iter().enumerate() {
        let slot = slots[i];
        if slot.height < 3 {
            break;
        }
        let selected = i == app.selected_pool;
        let role_style = match card.role {
            PoolRole::Admin => Style::default().fg(palette.key),
            PoolRole::Member => palette.muted(),
        };
        let title = Line::from(vec![
            Span::styled(
                if selected { "▸ " } else { "  " },
                Style::default().fg(palette.accent),
            ),
            Span::styled(card.name.clone(), palette.title()),
            Span::raw(" "),
            Span::styled(format!("[{}]", card.role.as_str()), role_style),
        ]);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(if selected {
                Style::default().fg(palette.accent)
            } else {
                palette.border()
            })
            .title(title);
        let inner = block.inner(slot);
        f.render_widget(block, slot);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(2),
            ])
            .split(inner);

        let description = if card.description.is_empty() {
            Span::styled("No description", palette.muted())
        } else {
            Span::raw(card.description.clone())
        };
        f.render_widget(Paragraph::new(Line::from(description)), rows[0]);

        let mut meta = vec![
            Span::styled(format!("{} members", card.members), palette.muted()),
            Span::raw("  "),
            Span::styled(format!("{} tokens", card.tokens), palette.muted()),
        ];
        if card.can_manage {
            meta.push(Span::raw("  "));
            meta.push(Span::styled("manage", palette.key()));
        }
        f.render_widget(Paragraph::new(Line::from(meta)), rows[1]);

        draw_utilization(f, rows[2], "Tokens", &card.token_usage, palette);
        draw_utilization(f, rows[3], "Cost", &card.cost_usage, palette);
    }
}

fn draw_utilization(
    f: &mut Frame,
    area: Rect,
    title: &str,
    usage: &Utilization,
    palette: &Palette,
) {
    let color = if usage.warning { palette.warn } else { palette.ok };
    let gauge = Gauge::default()
        .block(Block::default().title(Span::styled(title.to_string(), palette.muted())))
        .gauge_style(Style::default().fg(color))
        .ratio(usage.bar_ratio())
        .label(usage.label());
    f.render_widget(gauge, area);
}

// === Usage ===

pub fn draw_usage(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let display = &app.controller.displays().usage;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(display.pools.len() as u16 + 2),
            Constraint::Min(4),
        ])
        .split(area);

    let personal = &display.personal;
    let stats = columns(chunks[0], 3);
    let calls = if personal.calls_placeholder {
        format!("{} (est.)", format::thousands(personal.calls))
    } else {
        format::thousands(personal.calls)
    };
    stat_box(f, stats[0], "API calls", calls, palette);
    stat_box(f, stats[1], "Tokens", personal.tokens_label.clone(), palette);
    stat_box(f, stats[2], "Cost", personal.cost_label.clone(), palette);

    let contributions: Vec<Line> = display
        .pools
        .iter()
        .map(|pool| {
            let marker = if pool.contribution_placeholder { " (est.)" } else { "" };
            Line::from(vec![
                Span::styled(format!(" {}", pool.name), Style::default().fg(palette.fg)),
                Span::styled(format!(" [{}]", pool.role.as_str()), palette.muted()),
                Span::raw("  "),
                Span::styled(
                    format!("{}{marker}", pool.contribution_label()),
                    Style::default().fg(palette.accent),
                ),
                Span::styled(
                    format!("  of {} tokens, {}", pool.tokens, pool.cost),
                    palette.muted(),
                ),
            ])
        })
        .collect();
    f.render_widget(
        Paragraph::new(contributions).block(panel("POOL CONTRIBUTION", palette)),
        chunks[1],
    );

    let header =
        Row::new(["Date", "Provider", "Model", "Tokens", "Cost", "Latency"]).style(palette.muted());
    let rows: Vec<Row> = display
        .rows
        .iter()
        .map(|row| {
            Row::new(vec![
                row.date.clone(),
                row.provider.clone(),
                row.model.clone(),
                row.tokens.clone(),
                row.cost.clone(),
                row.latency.clone(),
            ])
        })
        .collect();
    let widths = [
        Constraint::Percentage(16),
        Constraint::Percentage(16),
        Constraint::Percentage(22),
        Constraint::Percentage(16),
        Constraint::Percentage(14),
        Constraint::Percentage(16),
    ];
    let title = format!("USAGE HISTORY · {} (p to change)", display.period.label());
    let table = Table::new(rows, widths)
        .header(header)
        .style(Style::default().fg(palette.fg))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border())
                .title(Span::styled(title, palette.title())),
        );
    f.render_widget(table, chunks[2]);
}

// === Chat ===

pub fn draw_chat(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let display = &app.controller.displays().chat;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let mut lines: Vec<Line> = Vec::new();
    for line in &display.lines {
        let (name, color) = match line.role {
            ChatRole::User => ("You", palette.key),
            ChatRole::Assistant => ("Assistant", palette.accent),
        };
        let mut header = vec![
            Span::styled(format!("{} ", line.avatar), Style::default().fg(color)),
            Span::styled(
                name,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            ),
        ];
        if let Some(via) = line.via.as_ref() {
            header.push(Span::styled(format!(" {via}"), palette.muted()));
        }
        header.push(Span::styled(format!("  {}", line.time), palette.muted()));
        lines.push(Line::from(header));
        lines.push(Line::from(Span::styled(
            format!("   {}", line.content),
            Style::default().fg(palette.fg),
        )));
        lines.push(Line::from(""));
    }
    if app.controller.is_loading() {
        lines.push(Line::from(Span::styled(
            " Assistant is thinking…",
            palette.muted(),
        )));
    }

    // Keep the newest messages in view; wrapped lines may still push
    // the tail slightly past the bottom on narrow terminals.
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let title = format!("CHAT · model: {} (m to change)", display.routing_target);
    let transcript = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(palette.border())
                .title(Span::styled(title, palette.title())),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));
    f.render_widget(transcript, chunks[0]);

    let typing = app.input_mode == InputMode::Chat;
    let input = if app.chat_input.is_empty() && !typing {
        Line::from(vec![
            Span::styled(" Press ", palette.muted()),
            Span::styled("i", palette.key()),
            Span::styled(" to type a message", palette.muted()),
        ])
    } else {
        Line::from(vec![
            Span::styled("> ", palette.key()),
            Span::raw(app.chat_input.clone()),
            Span::styled(if typing { "▏" } else { "" }, palette.key()),
        ])
    };
    let border = if typing {
        Style::default().fg(palette.accent)
    } else {
        palette.border()
    };
    f.render_widget(
        Paragraph::new(input).block(Block::default().borders(Borders::ALL).border_style(border)),
        chunks[1],
    );
}

// === Settings ===

pub fn draw_settings(f: &mut Frame, area: Rect, app: &App, palette: &Palette) {
    let display = &app.controller.displays().settings;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(4), Constraint::Min(6)])
        .split(area);

    let profile = vec![
        Line::from(vec![
            Span::styled(" Name  ", palette.muted()),
            Span::raw(display.user_name.clone()),
        ]),
        Line::from(vec![
            Span::styled(" Email ", palette.muted()),
            Span::raw(display.user_email.clone()),
        ]),
    ];
    f.render_widget(
        Paragraph::new(profile).block(panel("PROFILE", palette)),
        chunks[0],
    );

    let draft = &app.settings_draft;
    let items: Vec<ListItem> = SettingField::ALL
        .iter()
        .map(|field| {
            let value = match field {
                SettingField::Theme => display.theme.as_str().to_string(),
                SettingField::Strategy => draft.routing_strategy.title().to_string(),
                SettingField::RetryAttempts => draft.retry_attempts.to_string(),
                SettingField::DailyTokenLimit => format::thousands(draft.daily_token_limit),
                SettingField::MonthlyCostLimit => format::dollars(draft.monthly_cost_limit),
                SettingField::UsageAlerts => on_off(draft.usage_alerts),
                SettingField::ErrorNotifications => on_off(draft.error_notifications),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {:<22}", field.title()), palette.muted()),
                Span::styled(value, Style::default().fg(palette.fg)),
            ]))
        })
        .collect();

    let dirty = *draft != display.settings;
    let title = if dirty {
        "ROUTER SETTINGS (unsaved, s to save)"
    } else {
        "ROUTER SETTINGS"
    };
    let list = List::new(items)
        .block(panel(title, palette))
        .highlight_style(palette.selected())
        .highlight_symbol("▸");
    let mut state = ListState::default().with_selected(Some(app.selected_setting));
    f.render_stateful_widget(list, chunks[1], &mut state);
}

fn on_off(value: bool) -> String {
    let label = if value { "on" } else { "off" };
    label.to_string()
}
