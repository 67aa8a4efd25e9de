use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use undercover_core::model::GameMode;
use undercover_core::setup::MIN_PLAYERS;

use crate::app::{App, SetupField};
use crate::views::common;

fn field_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::White)
    }
}

fn value_row(f: &mut Frame, area: Rect, label: &str, value: String, focused: bool, dimmed: bool) {
    let style = if dimmed {
        Style::default().fg(Color::DarkGray)
    } else {
        field_style(focused)
    };
    let arrows = if focused && !dimmed { "< > " } else { "    " };
    let para = Paragraph::new(Line::from(vec![
        Span::styled(format!("{label:<12}"), Style::default().fg(Color::Gray)),
        Span::styled(format!("{arrows}{value}"), style),
    ]));
    f.render_widget(para, area);
}

pub fn render(f: &mut Frame, app: &App) {
    let form = &app.form;
    let inner = common::outer_block(f, "Mission Setup");
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(3),
            Constraint::Length(2),
        ])
        .split(inner);

    // Name input
    let input_title = format!("Agent name ({} on the roster)", form.names.len());
    let input = Paragraph::new(form.input.clone())
        .style(field_style(form.field == SetupField::Name))
        .block(Block::default().borders(Borders::ALL).title(input_title));
    f.render_widget(input, chunks[0]);

    // Roster
    let items: Vec<ListItem> = form
        .names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("{}. ", i + 1), Style::default().fg(Color::Gray)),
                Span::styled(name.clone(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();
    let roster_title = if form.names.len() < MIN_PLAYERS {
        format!("Roster (needs at least {MIN_PLAYERS})")
    } else {
        "Roster".to_string()
    };
    let roster = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(roster_title));
    f.render_widget(roster, chunks[1]);

    // Settings rows
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(chunks[2]);
    let settings = Block::default().borders(Borders::ALL).title("Settings");
    f.render_widget(settings, chunks[2]);

    let category = form
        .category()
        .map(|c| c.name.clone())
        .unwrap_or_else(|| "-".to_string());
    value_row(f, rows[0], "Category", category, form.field == SetupField::Category, false);
    value_row(
        f,
        rows[1],
        "Rounds",
        form.rounds.to_string(),
        form.field == SetupField::Rounds,
        false,
    );
    value_row(
        f,
        rows[2],
        "Mode",
        form.mode.to_string(),
        form.field == SetupField::Mode,
        false,
    );
    let spies_dimmed = form.mode == GameMode::Classic;
    let spies_value = if spies_dimmed {
        "1 (fixed)".to_string()
    } else {
        format!("{} (max {})", form.spies, form.max_spies())
    };
    value_row(f, rows[3], "Spies", spies_value, form.field == SetupField::Spies, spies_dimmed);

    // Start button
    let start = Paragraph::new("[ Begin mission ]")
        .alignment(Alignment::Center)
        .style(field_style(form.field == SetupField::Start));
    f.render_widget(start, chunks[3]);

    common::footer(
        f,
        chunks[4],
        "Tab/Up/Down field  |  Left/Right adjust  |  Enter add name / start  |  Esc back",
    );
}
