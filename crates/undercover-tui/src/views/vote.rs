use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use undercover_core::flow::GameFlow;
use undercover_core::sequence::VotingWalk;

use crate::views::common;

pub fn render(f: &mut Frame, _flow: &GameFlow, walk: &VotingWalk, cursor: usize) {
    let inner = common::outer_block(f, "Accusation");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(inner);

    let (index, total) = walk.position();
    let voter = walk
        .current_voter()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let header = Paragraph::new(Span::styled(
        format!("{voter}, who is the spy? (ballot {} of {total})", index + 1),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, chunks[0]);

    let items: Vec<ListItem> = walk
        .candidates()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let selectable = walk.can_vote_for(p.id);
            let style = if i == cursor && selectable {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else if i == cursor {
                Style::default().fg(Color::DarkGray).bg(Color::Gray)
            } else if selectable {
                Style::default().fg(Color::White)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let marker = if i == cursor { "> " } else { "  " };
            let note = if !selectable { "  (not allowed)" } else { "" };
            ListItem::new(Line::from(Span::styled(
                format!("{marker}{}{note}", p.name),
                style,
            )))
        })
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Suspects"));
    f.render_widget(list, chunks[1]);

    let hint = if walk.current_voter().is_none() {
        "All ballots cast  |  Enter close the round  |  Esc abandon"
    } else {
        "Up/Down select  |  Enter cast ballot  |  Esc abandon"
    };
    common::footer(f, chunks[2], hint);
}
