use chrono::{Local, Utc};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

pub mod format;
pub mod layout;
pub mod widgets;

use crate::app::{App, Focus, InputState, StatusLevel};
use format::{abbreviate, format_balance, group_digits, network_label, short_address, time_ago};
use widgets::{band_color, LatencySparkline};

pub fn draw(f: &mut Frame, app: &App) {
    let areas = layout::areas(f.size());

    draw_header(f, areas.header, app);
    draw_input(f, areas.input, app);
    draw_result(f, areas.result, app);
    draw_quick_queries(f, areas.quick, app);
    draw_latency(f, areas.latency, app);
    draw_status_line(f, areas.status_line, app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let title = Line::from(vec![
        Span::styled(
            "taraq",
            Style::default()
                .fg(Color::LightCyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled("RPC", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ", app.endpoint)),
        Span::styled("Chain", Style::default().fg(Color::DarkGray)),
        Span::raw(format!(" {} ({})", app.network_name, app.chain_id)),
    ]);
    let left = Paragraph::new(title)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    let (network, color, height) = match app.chain.as_ref() {
        None => ("connecting…".to_string(), Color::DarkGray, "--".to_string()),
        Some(status) => {
            let (text, band) = network_label(status);
            let height = if status.block_height > 0 {
                group_digits(status.block_height)
            } else {
                "--".to_string()
            };
            (text, band_color(band), height)
        }
    };
    let right_line = Line::from(vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(format!("{network}  "), Style::default().fg(color)),
        Span::styled("Block ", Style::default().fg(Color::DarkGray)),
        Span::raw(height),
    ]);
    let right = Paragraph::new(right_line)
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Left);

    f.render_widget(left, chunks[0]);
    f.render_widget(right, chunks[1]);
}

fn draw_input(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Input;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let mut spans = vec![Span::raw(app.input.as_str())];
    match app.input_state {
        InputState::Empty => spans.push(Span::styled(
            "0x…",
            Style::default().fg(Color::DarkGray),
        )),
        InputState::Valid => {
            spans.push(Span::styled("  ✓", Style::default().fg(Color::LightGreen)))
        }
        InputState::Invalid => {
            spans.push(Span::styled("  ✗", Style::default().fg(Color::LightRed)));
            spans.push(Span::styled(
                "  expected 0x + 40 hex digits",
                Style::default().fg(Color::DarkGray),
            ));
        }
    }
    if app.in_flight > 0 {
        spans.push(Span::styled(
            format!("  querying… ({})", app.in_flight),
            Style::default().fg(Color::LightYellow),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Address")
            .border_style(border_style),
    );
    f.render_widget(paragraph, area);

    if focused {
        let width = area.width.saturating_sub(2);
        let offset = (app.input.chars().count() as u16).min(width.saturating_sub(1));
        f.set_cursor(area.x + 1 + offset, area.y + 1);
    }
}

fn draw_result(f: &mut Frame, area: Rect, app: &App) {
    let lines = match app.last_result.as_ref() {
        None => vec![Line::from(Span::styled(
            "Type an address and press Enter",
            Style::default().fg(Color::DarkGray),
        ))],
        Some(result) => {
            let height = app
                .chain
                .filter(|status| status.block_height > 0)
                .map(|status| group_digits(status.block_height))
                .unwrap_or_else(|| "--".to_string());
            vec![
                field_line("Address", result.address.to_string()),
                Line::from(vec![
                    Span::styled("Balance   ", Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("{} TARA", format_balance(result.balance_decimal, 6)),
                        Style::default()
                            .fg(Color::LightCyan)
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  ({})", abbreviate(result.balance_decimal)),
                        Style::default().fg(Color::DarkGray),
                    ),
                ]),
                field_line("Wei", result.balance_wei.to_string()),
                field_line(
                    "Queried",
                    result
                        .queried_at
                        .with_timezone(&Local)
                        .format("%Y-%m-%d %H:%M:%S")
                        .to_string(),
                ),
                field_line("Latency", format!("{} ms", result.latency_ms)),
                field_line("Block", height),
            ]
        }
    };

    let paragraph = Paragraph::new(Text::from(lines))
        .block(Block::default().borders(Borders::ALL).title("Result"))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

fn field_line(label: &str, value: String) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(Color::DarkGray)),
        Span::raw(value),
    ])
}

fn draw_quick_queries(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::History;
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let now = Utc::now();
    let items: Vec<ListItem> = app
        .quick_entries()
        .iter()
        .map(|entry| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<10} ", time_ago(entry.queried_at, now)),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(short_address(&entry.address, 6)),
                Span::styled(
                    format!("  {} TARA", format_balance(entry.balance_decimal, 4)),
                    Style::default().fg(Color::LightCyan),
                ),
            ]))
        })
        .collect();

    if items.is_empty() {
        let empty = Paragraph::new(Span::styled(
            "No queries yet",
            Style::default().fg(Color::DarkGray),
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Quick queries")
                .border_style(border_style),
        );
        f.render_widget(empty, area);
        return;
    }

    let highlight_style = if focused {
        Style::default()
            .fg(Color::Black)
            .bg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Quick queries")
                .border_style(border_style),
        )
        .highlight_style(highlight_style)
        .highlight_symbol(">> ");

    let mut state = ListState::default();
    if focused {
        state.select(Some(app.selected_history));
    }
    f.render_stateful_widget(list, area, &mut state);
}

fn draw_latency(f: &mut Frame, area: Rect, app: &App) {
    let title = match app.latencies.last() {
        Some(ms) => format!("Latency {ms} ms"),
        None => "Latency".to_string(),
    };
    let block = Block::default().borders(Borders::ALL).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);
    f.render_widget(LatencySparkline::new(&app.latencies), inner);
}

fn draw_status_line(f: &mut Frame, area: Rect, app: &App) {
    let line = if let Some((text, level)) = app.status_text() {
        let color = match level {
            StatusLevel::Info => Color::White,
            StatusLevel::Success => Color::LightGreen,
            StatusLevel::Warn => Color::LightYellow,
            StatusLevel::Error => Color::LightRed,
        };
        Line::from(vec![
            Span::styled("msg: ", Style::default().fg(Color::DarkGray)),
            Span::styled(text, Style::default().fg(color)),
        ])
    } else {
        action_hints()
    };

    f.render_widget(Paragraph::new(line), area);
}

fn action_hints() -> Line<'static> {
    let keys = [
        ("Enter", "query"),
        ("Tab", "focus"),
        ("↑↓", "select"),
        ("^Y", "copy"),
        ("^R", "refresh"),
        ("^D", "clear"),
        ("^E", "export"),
        ("Esc", "quit"),
    ];
    let mut spans = Vec::new();
    for (key, action) in keys {
        spans.push(Span::styled(key, Style::default().fg(Color::LightCyan)));
        spans.push(Span::styled(
            format!(" {action}  "),
            Style::default().fg(Color::DarkGray),
        ));
    }
    Line::from(spans)
}
