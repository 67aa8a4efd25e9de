mod common;
mod completed;
mod discussion;
mod elimination;
mod home;
mod lobby;
mod reveal;
mod setup;
mod summary;
mod vote;

use ratatui::Frame;

use undercover_core::flow::Phase;

use crate::app::{App, Screen};

pub fn render(f: &mut Frame, app: &App) {
    match app.screen {
        Screen::Home => home::render(f, app),
        Screen::Setup => setup::render(f, app),
        Screen::Game => render_game(f, app),
    }
    if let Some(dialog) = &app.error {
        common::render_error_dialog(f, dialog);
    } else if let Some(label) = app.pending {
        common::render_pending(f, label);
    }
}

fn render_game(f: &mut Frame, app: &App) {
    let Some(flow) = &app.flow else {
        return;
    };
    match flow.phase() {
        Phase::Lobby => lobby::render(f, flow),
        Phase::RoleReveal(walk) => reveal::render(f, flow, walk),
        Phase::Discussion(walk) => discussion::render(f, flow, walk),
        Phase::Voting(walk) => vote::render(f, flow, walk, app.cursor),
        Phase::Elimination(board) => elimination::render(f, flow, board, app.cursor),
        Phase::RoundSummary(report) => summary::render(f, flow, report),
        Phase::GameCompleted(result) => completed::render(f, result),
    }
}
