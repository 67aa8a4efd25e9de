use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use undercover_core::flow::GameFlow;
use undercover_core::sequence::RevealWalk;

use crate::views::common;

/// One player at a time peeks at their card; everyone else looks away.
pub fn render(f: &mut Frame, flow: &GameFlow, walk: &RevealWalk) {
    let inner = common::outer_block(f, "Role Reveal");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(7),
            Constraint::Length(2),
        ])
        .split(inner);

    let (index, total) = walk.position();
    let progress = Paragraph::new(format!("Agent {} of {}", index + 1, total))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray));
    f.render_widget(progress, chunks[0]);

    let Some(player) = walk.current() else {
        return;
    };
    let card_area = common::centered_rect(70, 80, chunks[1]);

    let lines = if walk.revealed() {
        let is_spy = flow
            .resolution()
            .map(|r| r.contains(player.id))
            .unwrap_or(false);
        let question = flow.round().map(|r| &r.question);
        if is_spy {
            let prompt = question
                .and_then(|q| q.alt_text.clone())
                .unwrap_or_else(|| "Blend in. You do not know the question.".to_string());
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "YOU ARE UNDERCOVER",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(prompt, Style::default().fg(Color::White))),
            ]
        } else {
            let prompt = question
                .map(|q| q.text.clone())
                .unwrap_or_default();
            vec![
                Line::from(""),
                Line::from(Span::styled(
                    "You are a loyal agent",
                    Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                Line::from(Span::styled(prompt, Style::default().fg(Color::White))),
            ]
        }
    } else {
        vec![
            Line::from(""),
            Line::from(Span::styled(
                format!("Pass the device to {}", player.name),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter when nobody else is looking",
                Style::default().fg(Color::Gray),
            )),
        ]
    };
    let card = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Magenta))
                .title(player.name.clone()),
        );
    f.render_widget(card, card_area);

    let hint = if walk.revealed() {
        "Enter hide and pass on"
    } else {
        "Enter reveal your role"
    };
    common::footer(f, chunks[2], hint);
}
