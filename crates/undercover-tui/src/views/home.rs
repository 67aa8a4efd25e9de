use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, BackendStatus};
use crate::views::common;

const TITLE: &str = r#"
 _   _ _   _ ____  _____ ____   ____ _____     _______ ____
| | | | \ | |  _ \| ____|  _ \ / ___/ _ \ \   / / ____|  _ \
| | | |  \| | | | |  _| | |_) | |  | | | \ \ / /|  _| | |_) |
| |_| | |\  | |_| | |___|  _ <| |__| |_| |\ V / | |___|  _ <
 \___/|_| \_|____/|_____|_| \_\\____\___/  \_/  |_____|_| \_\
"#;

pub fn render(f: &mut Frame, app: &App) {
    let inner = common::outer_block(f, "Main Menu");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(8),
            Constraint::Length(3),
            Constraint::Min(4),
            Constraint::Length(2),
        ])
        .split(inner);

    let title = Paragraph::new(Text::from(TITLE))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    let (status, style) = match app.backend {
        BackendStatus::Probing => ("Contacting headquarters...", Style::default().fg(Color::Yellow)),
        BackendStatus::Online => ("Headquarters online", Style::default().fg(Color::Green)),
        BackendStatus::Offline => (
            "Headquarters unreachable (p to retry)",
            Style::default().fg(Color::Red),
        ),
    };
    let status = Paragraph::new(status).style(style).alignment(Alignment::Center);
    f.render_widget(status, chunks[1]);

    let options = ["New mission", "Quit"];
    let items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, label)| {
            let style = if i == app.home_cursor {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if i == app.home_cursor { "> " } else { "  " };
            ListItem::new(Line::from(Span::styled(format!("{marker}{label}"), style)))
        })
        .collect();
    let menu = List::new(items);
    let menu_area = common::centered_rect(30, 100, chunks[2]);
    f.render_widget(menu, menu_area);

    common::footer(f, chunks[3], "Up/Down select  |  Enter confirm  |  q quit");
}
