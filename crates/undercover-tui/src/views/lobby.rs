use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use undercover_core::flow::GameFlow;

use crate::views::common;

pub fn render(f: &mut Frame, flow: &GameFlow) {
    let session = flow.session();
    let inner = common::outer_block(f, "Briefing Room");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(inner);

    let category = session
        .category
        .as_ref()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "Unknown".to_string());
    let info = vec![
        Line::from(vec![
            Span::styled("Mission ", Style::default().fg(Color::Gray)),
            Span::styled(
                format!("#{}", session.id),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  |  {}  |  {}", session.game_mode, category),
                Style::default().fg(Color::White),
            ),
        ]),
        Line::from(Span::styled(
            format!(
                "Round {} of {}",
                session.current_round + 1,
                session.number_of_rounds
            ),
            Style::default().fg(Color::White),
        )),
    ];
    let info = Paragraph::new(info)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(info, chunks[0]);

    let items: Vec<ListItem> = session
        .players
        .iter()
        .map(|p| {
            let style = if p.is_eliminated {
                Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(p.name.clone(), style),
                Span::styled(
                    format!("  {} pts", p.score),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();
    let roster = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Agents"));
    f.render_widget(roster, chunks[1]);

    common::footer(f, chunks[2], "Enter start round  |  Esc abandon mission");
}
