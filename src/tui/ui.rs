use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Tabs, Wrap},
    Frame,
};

use crate::leaderboard::exporter::COLUMN_HEADERS;
use crate::models::{medal_marker, ordinal_label, WinnerRecord};
use crate::tui::app::{App, Screen};

pub fn draw(frame: &mut Frame, app: &App) {
    match app.current_screen {
        Screen::Leaderboard => draw_leaderboard_screen(frame, app),
        Screen::Loading => draw_loading_screen(frame, app),
    }
}

fn draw_leaderboard_screen(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(7),
            Constraint::Min(6),
            Constraint::Length(3),
        ])
        .split(frame.size());

    let fetched = app
        .view
        .as_ref()
        .map(|v| v.fetched_at.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| "not loaded".to_string());
    let title = Paragraph::new(format!(
        "🏆 CodeChef Leaderboard: {} | {} | fetched {}",
        app.contest_name,
        app.scheme.description(),
        fetched
    ))
    .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    if !app.has_data() {
        let empty = Paragraph::new(format!("No results available for {}", app.contest_name))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL));
        let area = Rect {
            height: chunks[1].height + chunks[2].height + chunks[3].height + chunks[4].height,
            ..chunks[1]
        };
        frame.render_widget(empty, area);
        draw_help(frame, app, chunks[5]);
        return;
    }

    let groups = Tabs::new(app.group_keys())
        .select(app.selected_group)
        .block(Block::default().borders(Borders::ALL).title("Groups (←/→)"))
        .highlight_style(Style::default().fg(Color::White).bg(Color::Rgb(255, 165, 0)).add_modifier(Modifier::BOLD));
    frame.render_widget(groups, chunks[1]);

    let buckets = Tabs::new(app.bucket_keys())
        .select(app.selected_bucket)
        .block(Block::default().borders(Borders::ALL).title("Categories (Tab/Shift-Tab)"))
        .highlight_style(Style::default().fg(Color::White).bg(Color::Rgb(255, 165, 0)).add_modifier(Modifier::BOLD));
    frame.render_widget(buckets, chunks[2]);

    draw_podium(frame, app.podium(), chunks[3]);
    draw_table(frame, app.current_records(), chunks[4]);
    draw_help(frame, app, chunks[5]);
}

fn draw_podium(frame: &mut Frame, podium: &[WinnerRecord], area: Rect) {
    if podium.is_empty() {
        return;
    }

    let share = 100 / podium.len() as u16;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(share); podium.len()])
        .split(area);

    for (index, winner) in podium.iter().enumerate() {
        let position = index as u64 + 1;
        let lines = vec![
            Line::from(Span::styled(
                format!("{} {}", medal_marker(position), ordinal_label(position)),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                winner.username.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} - {}",
                winner.branch.as_deref().unwrap_or("-"),
                winner.section.as_deref().unwrap_or("-")
            )),
            Line::from(winner.codechef_id.clone().unwrap_or_default()),
            Line::from(format!("{} ★", winner.star_value())),
        ];

        let card = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(card, columns[index]);
    }
}

fn draw_table(frame: &mut Frame, records: &[WinnerRecord], area: Rect) {
    let header = Row::new(COLUMN_HEADERS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = records
        .iter()
        .enumerate()
        .map(|(index, winner)| {
            Row::new(vec![
                Cell::from(ordinal_label(index as u64 + 1)),
                Cell::from(winner.username.clone()),
                Cell::from(winner.year_of_study.clone().unwrap_or_default()),
                Cell::from(winner.branch.clone().unwrap_or_default()),
                Cell::from(winner.section.clone().unwrap_or_default()),
                Cell::from(winner.codechef_id.clone().unwrap_or_default()),
                Cell::from(winner.star_rating.clone().unwrap_or_default()),
                Cell::from(
                    winner
                        .contest_global_rank
                        .map(|r| r.to_string())
                        .unwrap_or_else(|| "-".to_string()),
                ),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(6),
        Constraint::Min(16),
        Constraint::Length(6),
        Constraint::Length(8),
        Constraint::Length(8),
        Constraint::Min(14),
        Constraint::Length(6),
        Constraint::Length(8),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Results"));
    frame.render_widget(table, area);
}

fn draw_help(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![
        Span::styled("s", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" scheme | "),
        Span::styled("e", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" export | "),
        Span::styled("r", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)),
        Span::raw(" reload | "),
        Span::styled("q", Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)),
        Span::raw(" quit"),
    ];

    if let Some(status) = &app.status {
        let color = if status.is_error { Color::Red } else { Color::Green };
        spans.push(Span::raw("   "));
        spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
    }

    let help = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(help, area);
}

fn draw_loading_screen(frame: &mut Frame, app: &App) {
    let area = centered_rect(60, 20, frame.size());

    let loading_text = app.loading_message.as_deref().unwrap_or("Loading...");

    let loading = Paragraph::new(loading_text)
        .style(Style::default().fg(Color::Cyan))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("⏳ Fetching"));

    frame.render_widget(Clear, area);
    frame.render_widget(loading, area);
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
