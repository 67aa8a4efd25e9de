use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use undercover_core::flow::{GameFlow, RoundReport};
use undercover_core::tally::RoundVerdict;

use crate::views::common;

pub fn render(f: &mut Frame, flow: &GameFlow, report: &RoundReport) {
    let session = flow.session();
    let inner = common::outer_block(f, "Round Debrief");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(inner);

    let (headline, style) = match &report.verdict {
        RoundVerdict::NoVotes => (
            "No ballots were cast this round".to_string(),
            Style::default().fg(Color::Yellow),
        ),
        RoundVerdict::SpyCaught { spy } => (
            format!("{} was the spy. Caught!", session.player_name(*spy)),
            Style::default().fg(Color::Green),
        ),
        RoundVerdict::SpyEscaped { accused } => {
            let names: Vec<String> = accused
                .iter()
                .map(|id| session.player_name(*id))
                .collect();
            (
                format!("The spy slipped away (accused: {})", names.join(", ")),
                Style::default().fg(Color::Red),
            )
        }
    };
    let spy_line = format!("Undercover this round: {}", report.spy_names.join(", "));
    let head = Paragraph::new(vec![
        Line::from(Span::styled(headline, style.add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(Span::styled(spy_line, Style::default().fg(Color::White))),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(head, chunks[0]);

    let mut items: Vec<ListItem> = report
        .tally
        .counts()
        .iter()
        .map(|(id, count)| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<20}", session.player_name(*id)),
                    Style::default().fg(Color::White),
                ),
                Span::styled(
                    format!("{count} vote{}", if *count == 1 { "" } else { "s" }),
                    Style::default().fg(Color::Yellow),
                ),
            ]))
        })
        .collect();
    if items.is_empty() {
        items.push(ListItem::new(Line::from(Span::styled(
            "No votes recorded",
            Style::default().fg(Color::Gray),
        ))));
    }
    let tally = List::new(items)
        .block(Block::default().borders(Borders::ALL).title("Ballots"));
    f.render_widget(tally, chunks[1]);

    let question = Paragraph::new(report.question.clone())
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title("The question was"));
    f.render_widget(question, chunks[2]);

    let hint = if session.rounds_exhausted() {
        "Enter see final results"
    } else {
        "Enter next round"
    };
    common::footer(f, chunks[3], hint);
}
