use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use undercover_core::flow::{GameResult, Winners};

use crate::views::common;

pub fn render(f: &mut Frame, result: &GameResult) {
    let inner = common::outer_block(f, "Mission Complete");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(inner);

    let (banner, style) = match &result.winners {
        Winners::Agents => (
            "THE AGENTS WIN".to_string(),
            Style::default().fg(Color::Green),
        ),
        Winners::Spies => (
            "THE OPERATIVES WIN".to_string(),
            Style::default().fg(Color::Red),
        ),
        Winners::TopScorers(ids) => {
            let names: Vec<String> = result
                .leaderboard
                .iter()
                .filter(|p| ids.contains(&p.id))
                .map(|p| p.name.clone())
                .collect();
            (
                format!("TOP AGENT{}: {}", if names.len() == 1 { "" } else { "S" }, names.join(", ")),
                Style::default().fg(Color::Yellow),
            )
        }
    };
    let head = Paragraph::new(vec![
        Line::from(Span::styled(banner, style.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(
            result.message.clone(),
            Style::default().fg(Color::White),
        )),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(head, chunks[0]);

    let items: Vec<ListItem> = result
        .leaderboard
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let medal = match i {
                0 => "1. ",
                1 => "2. ",
                2 => "3. ",
                _ => "   ",
            };
            let style = if i == 0 {
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{medal}{:<20}", p.name), style),
                Span::styled(format!("{} pts", p.score), Style::default().fg(Color::Gray)),
            ]))
        })
        .collect();
    let board = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Leaderboard"));
    f.render_widget(board, chunks[1]);

    common::footer(f, chunks[2], "Enter back to main menu");
}
