use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use undercover_core::flow::{EliminationBoard, GameFlow};

use crate::views::common;

pub fn render(f: &mut Frame, flow: &GameFlow, board: &EliminationBoard, cursor: usize) {
    let inner = common::outer_block(f, "Elimination");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),
            Constraint::Length(4),
            Constraint::Min(5),
            Constraint::Length(2),
        ])
        .split(inner);

    let mut standing_lines = vec![Line::from(vec![
        Span::styled(
            format!("{} operatives", board.standing.remaining_spies),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::styled(" vs ", Style::default().fg(Color::Gray)),
        Span::styled(
            format!("{} agents", board.standing.remaining_agents),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
    ])];
    if board.resolution.is_malformed() {
        standing_lines.push(Line::from(Span::styled(
            "Spy roster garbled; playing with a single known operative",
            Style::default().fg(Color::Yellow),
        )));
    }
    let standing = Paragraph::new(standing_lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Standing"));
    f.render_widget(standing, chunks[0]);

    let last = match &board.last {
        Some(record) => {
            let (verdict, style) = if record.was_spy {
                ("was an operative!", Style::default().fg(Color::Red))
            } else {
                ("was a loyal agent", Style::default().fg(Color::Green))
            };
            Line::from(vec![
                Span::styled(
                    record.player.name.clone(),
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
                ),
                Span::raw(" "),
                Span::styled(verdict, style.add_modifier(Modifier::BOLD)),
            ])
        }
        None => Line::from(Span::styled(
            "Nobody eliminated yet this round",
            Style::default().fg(Color::Gray),
        )),
    };
    let last = Paragraph::new(last)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Last elimination"));
    f.render_widget(last, chunks[1]);

    let items: Vec<ListItem> = flow
        .session()
        .active_players()
        .iter()
        .enumerate()
        .map(|(i, p)| {
            let style = if i == cursor {
                Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            let marker = if i == cursor { "> " } else { "  " };
            ListItem::new(Line::from(Span::styled(format!("{marker}{}", p.name), style)))
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Vote someone off"),
    );
    f.render_widget(list, chunks[2]);

    let hint = if board.last.is_some() {
        "Enter eliminate  |  n next round"
    } else {
        "Up/Down select  |  Enter eliminate"
    };
    common::footer(f, chunks[3], hint);
}
