use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::ErrorDialog;

/// Outer frame shared by every screen.
pub fn outer_block(f: &mut Frame, title: &str) -> Rect {
    let area = f.area();
    let block = Block::default()
        .title(Span::styled(
            title.to_string(),
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    f.render_widget(block, area);
    inner
}

pub fn footer(f: &mut Frame, area: Rect, text: &str) {
    let para = Paragraph::new(text.to_string())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(para, area);
}

/// A centered box sized as a percentage of the frame.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}

/// Blocking error overlay. The game does not move until it is dismissed
/// or the failed call is retried.
pub fn render_error_dialog(f: &mut Frame, dialog: &ErrorDialog) {
    let area = centered_rect(60, 30, f.area());
    f.render_widget(Clear, area);

    let hint = if dialog.retry.is_some() {
        "r retry  |  Esc dismiss"
    } else {
        "Esc dismiss"
    };
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            dialog.message.clone(),
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(Span::styled(hint, Style::default().fg(Color::Gray))),
    ];
    let para = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(Span::styled(
                    "Transmission failed",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        );
    f.render_widget(para, area);
}

/// Small floating marker while a backend call is in flight.
pub fn render_pending(f: &mut Frame, label: &str) {
    let area = centered_rect(40, 15, f.area());
    f.render_widget(Clear, area);
    let para = Paragraph::new(format!("Working: {label}..."))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Yellow))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        );
    f.render_widget(para, area);
}
