use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Gauge, Paragraph},
    Frame,
};

use undercover_core::flow::GameFlow;
use undercover_core::sequence::DiscussionWalk;

use crate::views::common;

pub fn render(f: &mut Frame, flow: &GameFlow, walk: &DiscussionWalk) {
    let inner = common::outer_block(f, "Discussion");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(5),
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(inner);

    let question = flow
        .round()
        .map(|r| r.question.text.clone())
        .unwrap_or_default();
    let question = Paragraph::new(question)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL).title("Question"));
    f.render_widget(question, chunks[0]);

    let (index, total) = walk.position();
    let speaker = walk
        .current()
        .map(|p| p.name.clone())
        .unwrap_or_default();
    let speaker = Paragraph::new(Span::styled(
        format!("{speaker} is speaking ({} of {total})", index + 1),
        Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(speaker, chunks[1]);

    let remaining = walk.remaining();
    let ratio = f64::from(remaining) / f64::from(walk.per_player().max(1));
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL))
        .gauge_style(Style::default().fg(if remaining <= 5 {
            Color::Red
        } else {
            Color::Green
        }))
        .ratio(ratio.clamp(0.0, 1.0))
        .label(format!("{remaining}s"));
    f.render_widget(gauge, chunks[2]);

    common::footer(f, chunks[4], "s skip speaker");
}
