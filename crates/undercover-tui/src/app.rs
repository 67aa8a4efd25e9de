//! Application state and the event loop.
//!
//! One loop drives everything: keyboard events, a one-second timer tick
//! for the discussion countdown, and backend outcomes arriving over the
//! dispatcher channel. Network calls never block the loop; the screen
//! shows a pending marker until the matching outcome lands.

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{backend::Backend, Terminal};
use tokio::sync::mpsc;
use tracing::{info, warn};

use undercover_app::{fallback_categories, Action, BackgroundMusic, Dispatcher, Outcome};
use undercover_core::elimination::EliminationVerdict;
use undercover_core::flow::{EliminationApplied, GameFlow, Phase, RoundStarted, VotesFetched};
use undercover_core::model::{Category, GameMode, SessionConfig, SessionId};
use undercover_core::sequence::WalkStep;
use undercover_core::setup;

use crate::views;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Setup,
    Game,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendStatus {
    Probing,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupField {
    Name,
    Category,
    Rounds,
    Mode,
    Spies,
    Start,
}

impl SetupField {
    fn next(self) -> Self {
        match self {
            SetupField::Name => SetupField::Category,
            SetupField::Category => SetupField::Rounds,
            SetupField::Rounds => SetupField::Mode,
            SetupField::Mode => SetupField::Spies,
            SetupField::Spies => SetupField::Start,
            SetupField::Start => SetupField::Name,
        }
    }

    fn prev(self) -> Self {
        match self {
            SetupField::Name => SetupField::Start,
            SetupField::Category => SetupField::Name,
            SetupField::Rounds => SetupField::Category,
            SetupField::Mode => SetupField::Rounds,
            SetupField::Spies => SetupField::Mode,
            SetupField::Start => SetupField::Spies,
        }
    }
}

/// The mission-setup form. Pure state; committing it goes through the
/// dispatcher, which runs the roster validation before any network call.
pub struct SetupForm {
    pub names: Vec<String>,
    pub input: String,
    pub field: SetupField,
    pub categories: Vec<Category>,
    pub category_index: usize,
    pub rounds: u32,
    pub mode: GameMode,
    pub spies: u32,
}

impl SetupForm {
    pub fn new() -> Self {
        Self {
            names: Vec::new(),
            input: String::new(),
            field: SetupField::Name,
            categories: fallback_categories(),
            category_index: 0,
            rounds: 3,
            mode: GameMode::Classic,
            spies: 1,
        }
    }

    pub fn category(&self) -> Option<&Category> {
        self.categories.get(self.category_index)
    }

    pub fn max_spies(&self) -> u32 {
        setup::max_spies(self.names.len())
    }

    /// Commits the typed name onto the roster. Trimming and duplicate
    /// rejection stay with the roster validation; the form only refuses
    /// blank input.
    pub fn commit_name(&mut self) {
        let name = self.input.trim();
        if !name.is_empty() {
            self.names.push(name.to_string());
            self.spies = self.spies.min(self.max_spies());
        }
        self.input.clear();
    }

    pub fn remove_last_name(&mut self) {
        self.names.pop();
        self.spies = self.spies.min(self.max_spies());
    }

    /// Left/right adjustment of the focused field.
    pub fn adjust(&mut self, delta: i64) {
        match self.field {
            SetupField::Category => {
                if !self.categories.is_empty() {
                    let len = self.categories.len() as i64;
                    let next = (self.category_index as i64 + delta).rem_euclid(len);
                    self.category_index = next as usize;
                }
            }
            SetupField::Rounds => {
                self.rounds = (self.rounds as i64 + delta).clamp(1, 10) as u32;
            }
            SetupField::Mode => {
                self.mode = match self.mode {
                    GameMode::Classic => GameMode::MultiSpy,
                    GameMode::MultiSpy => GameMode::Classic,
                };
                if self.mode == GameMode::MultiSpy {
                    self.spies = setup::recommended_spies(self.names.len()).min(self.max_spies());
                }
            }
            SetupField::Spies => {
                let max = self.max_spies() as i64;
                self.spies = (self.spies as i64 + delta).clamp(1, max.max(1)) as u32;
            }
            SetupField::Name | SetupField::Start => {}
        }
    }

    pub fn config(&self) -> SessionConfig {
        let category_id = self.category().map(|c| c.id).unwrap_or(1);
        match self.mode {
            GameMode::Classic => SessionConfig::classic(category_id, self.rounds),
            GameMode::MultiSpy => SessionConfig::multi_spy(category_id, self.rounds, self.spies),
        }
    }
}

/// Work a game-screen key press leaves for after the phase borrow ends.
enum AfterKey {
    Nothing,
    Dispatch(Action),
    DispatchAndLeave(Action),
    CompleteReveal,
    FinishDiscussion,
    EndGame(SessionId),
    Leave,
}

pub struct ErrorDialog {
    pub message: String,
    pub retry: Option<Action>,
}

pub struct App {
    dispatcher: Dispatcher,
    rx: mpsc::UnboundedReceiver<Outcome>,
    pub screen: Screen,
    pub backend: BackendStatus,
    pub form: SetupForm,
    pub flow: Option<GameFlow>,
    pub error: Option<ErrorDialog>,
    pub pending: Option<&'static str>,
    pub home_cursor: usize,
    pub cursor: usize,
    speaking_ticks: u32,
    music: Option<BackgroundMusic>,
    last_action: Option<Action>,
    votes_needed: Option<usize>,
    votes_acked: usize,
    should_quit: bool,
}

impl App {
    pub fn new(
        dispatcher: Dispatcher,
        rx: mpsc::UnboundedReceiver<Outcome>,
        speaking_secs: u32,
    ) -> Self {
        Self {
            dispatcher,
            rx,
            screen: Screen::Home,
            backend: BackendStatus::Probing,
            form: SetupForm::new(),
            flow: None,
            error: None,
            pending: None,
            home_cursor: 0,
            cursor: 0,
            speaking_ticks: speaking_secs.max(1),
            music: None,
            last_action: None,
            votes_needed: None,
            votes_acked: 0,
            should_quit: false,
        }
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        self.send(Action::Probe);
        self.send(Action::LoadCategories);

        let tick = Duration::from_secs(1);
        let mut last_tick = Instant::now();
        while !self.should_quit {
            while let Ok(outcome) = self.rx.try_recv() {
                self.apply_outcome(outcome);
            }
            terminal.draw(|f| views::render(f, self))?;

            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key);
                    }
                }
            }
            if last_tick.elapsed() >= tick {
                self.on_tick();
                last_tick = Instant::now();
            }
        }
        Ok(())
    }

    /// Remembers the action so a failure dialog can offer a retry, then
    /// hands it to the dispatcher.
    fn send(&mut self, action: Action) {
        if !matches!(action, Action::Probe | Action::LoadCategories) {
            self.pending = Some(action.label());
        }
        self.last_action = Some(action.clone());
        self.dispatcher.dispatch(action);
    }

    fn on_tick(&mut self) {
        let Some(flow) = self.flow.as_mut() else {
            return;
        };
        let step = match flow.phase_mut() {
            Phase::Discussion(walk) => walk.tick(),
            _ => None,
        };
        if step == Some(WalkStep::Complete) {
            self.finish_discussion();
        }
    }

    fn finish_discussion(&mut self) {
        if let Some(flow) = self.flow.as_mut() {
            if let Err(err) = flow.complete_discussion() {
                warn!(%err, "discussion transition rejected");
            }
        }
        self.cursor = 0;
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if self.error.is_some() {
            match key.code {
                KeyCode::Char('r') => {
                    if let Some(dialog) = self.error.take() {
                        if let Some(action) = dialog.retry {
                            self.send(action);
                        }
                    }
                }
                KeyCode::Esc | KeyCode::Enter => {
                    self.error = None;
                }
                _ => {}
            }
            return;
        }
        match self.screen {
            Screen::Home => self.handle_home_key(key),
            Screen::Setup => self.handle_setup_key(key),
            Screen::Game => self.handle_game_key(key),
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.home_cursor = self.home_cursor.saturating_sub(1),
            KeyCode::Down => self.home_cursor = (self.home_cursor + 1).min(1),
            KeyCode::Enter => {
                if self.home_cursor == 0 {
                    self.form = SetupForm::new();
                    self.send(Action::LoadCategories);
                    self.screen = Screen::Setup;
                } else {
                    self.should_quit = true;
                }
            }
            KeyCode::Char('p') => {
                self.backend = BackendStatus::Probing;
                self.send(Action::Probe);
            }
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            _ => {}
        }
    }

    fn handle_setup_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.screen = Screen::Home,
            KeyCode::Down | KeyCode::Tab => self.form.field = self.form.field.next(),
            KeyCode::Up | KeyCode::BackTab => self.form.field = self.form.field.prev(),
            KeyCode::Left => self.form.adjust(-1),
            KeyCode::Right => self.form.adjust(1),
            KeyCode::Enter => match self.form.field {
                SetupField::Name => self.form.commit_name(),
                SetupField::Start => self.start_game(),
                _ => self.form.field = self.form.field.next(),
            },
            KeyCode::Backspace => {
                if self.form.field == SetupField::Name {
                    if self.form.input.is_empty() {
                        self.form.remove_last_name();
                    } else {
                        self.form.input.pop();
                    }
                }
            }
            KeyCode::Char(c) => {
                if self.form.field == SetupField::Name {
                    self.form.input.push(c);
                }
            }
            _ => {}
        }
    }

    fn start_game(&mut self) {
        let names = self.form.names.clone();
        let config = self.form.config();
        self.send(Action::CreateSession { names, config });
    }

    fn handle_game_key(&mut self, key: KeyEvent) {
        if self.pending.is_some() {
            return;
        }
        // Esc always backs out of an unfinished phase, so a failed call
        // can never strand the round without an exit.
        if key.code == KeyCode::Esc {
            let session_id = match self.flow.as_ref() {
                Some(flow) if !matches!(flow.phase(), Phase::GameCompleted(_)) => {
                    Some(flow.session().id)
                }
                _ => None,
            };
            if let Some(session_id) = session_id {
                self.send(Action::FinishSession { session_id });
                self.leave_game();
                return;
            }
        }
        // Mutate the walks within the borrow, defer anything that needs
        // the whole controller or the dispatcher.
        let after = {
            let Some(flow) = self.flow.as_mut() else {
                return;
            };
            let session_id = flow.session().id;
            let round_id = flow.round().map(|r| r.id);
            let roster = flow.session().active_players();
            let exhausted = flow.session().rounds_exhausted();

            match flow.phase_mut() {
                Phase::Lobby => match key.code {
                    KeyCode::Enter | KeyCode::Char('s') => {
                        AfterKey::Dispatch(Action::StartRound { session_id })
                    }
                    KeyCode::Char('q') => {
                        AfterKey::DispatchAndLeave(Action::FinishSession { session_id })
                    }
                    _ => AfterKey::Nothing,
                },
                Phase::RoleReveal(walk) => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char(' ')) {
                        if walk.revealed() {
                            if walk.advance() == WalkStep::Complete {
                                AfterKey::CompleteReveal
                            } else {
                                AfterKey::Nothing
                            }
                        } else {
                            walk.reveal();
                            AfterKey::Nothing
                        }
                    } else {
                        AfterKey::Nothing
                    }
                }
                Phase::Discussion(walk) => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Char('s'))
                        && walk.skip() == WalkStep::Complete
                    {
                        AfterKey::FinishDiscussion
                    } else {
                        AfterKey::Nothing
                    }
                }
                Phase::Voting(walk) => {
                    let count = walk.candidates().len();
                    match key.code {
                        KeyCode::Up => {
                            self.cursor = self.cursor.saturating_sub(1);
                            AfterKey::Nothing
                        }
                        KeyCode::Down => {
                            self.cursor = (self.cursor + 1).min(count.saturating_sub(1));
                            AfterKey::Nothing
                        }
                        KeyCode::Enter if walk.current_voter().is_none() => {
                            // Every ballot is in; re-offer closing the
                            // round in case the automatic close failed.
                            self.votes_needed = None;
                            match round_id {
                                Some(round_id) => {
                                    AfterKey::Dispatch(Action::FinishRound { round_id })
                                }
                                None => AfterKey::Nothing,
                            }
                        }
                        KeyCode::Enter => {
                            let target = walk.candidates().get(self.cursor).map(|p| p.id);
                            let voter = walk.current_voter().map(|p| p.id);
                            match (target, voter, round_id) {
                                (Some(target), Some(voter), Some(round_id))
                                    if walk.can_vote_for(target) =>
                                {
                                    match walk.record(target) {
                                        Ok(step) => {
                                            if step == WalkStep::Complete {
                                                self.votes_needed = Some(walk.ballots().len());
                                            }
                                            AfterKey::Dispatch(Action::CastVote {
                                                round_id,
                                                voter,
                                                target,
                                            })
                                        }
                                        Err(err) => {
                                            warn!(%err, "ballot rejected");
                                            AfterKey::Nothing
                                        }
                                    }
                                }
                                _ => AfterKey::Nothing,
                            }
                        }
                        _ => AfterKey::Nothing,
                    }
                }
                Phase::Elimination(board) => match key.code {
                    KeyCode::Up => {
                        self.cursor = self.cursor.saturating_sub(1);
                        AfterKey::Nothing
                    }
                    KeyCode::Down => {
                        self.cursor = (self.cursor + 1).min(roster.len().saturating_sub(1));
                        AfterKey::Nothing
                    }
                    KeyCode::Enter => {
                        match (round_id, roster.get(self.cursor).map(|p| p.id)) {
                            (Some(round_id), Some(player)) => {
                                AfterKey::Dispatch(Action::Eliminate { round_id, player })
                            }
                            _ => AfterKey::Nothing,
                        }
                    }
                    KeyCode::Char('n') => match round_id {
                        Some(round_id) if board.last.is_some() => {
                            AfterKey::Dispatch(Action::NextRound {
                                session_id,
                                round_id,
                            })
                        }
                        _ => AfterKey::Nothing,
                    },
                    _ => AfterKey::Nothing,
                },
                Phase::RoundSummary(_) => match key.code {
                    KeyCode::Enter if exhausted => AfterKey::EndGame(session_id),
                    KeyCode::Enter => match round_id {
                        Some(round_id) => AfterKey::Dispatch(Action::NextRound {
                            session_id,
                            round_id,
                        }),
                        None => AfterKey::Nothing,
                    },
                    _ => AfterKey::Nothing,
                },
                Phase::GameCompleted(_) => {
                    if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char('q')) {
                        AfterKey::Leave
                    } else {
                        AfterKey::Nothing
                    }
                }
            }
        };

        match after {
            AfterKey::Nothing => {}
            AfterKey::Dispatch(action) => self.send(action),
            AfterKey::DispatchAndLeave(action) => {
                self.send(action);
                self.leave_game();
            }
            AfterKey::CompleteReveal => {
                if let Some(flow) = self.flow.as_mut() {
                    if let Err(err) = flow.complete_reveal() {
                        warn!(%err, "reveal transition rejected");
                    }
                }
            }
            AfterKey::FinishDiscussion => self.finish_discussion(),
            AfterKey::EndGame(session_id) => {
                if let Some(flow) = self.flow.as_mut() {
                    if let Err(err) = flow.complete_game() {
                        warn!(%err, "endgame transition rejected");
                    }
                }
                self.send(Action::FinishSession { session_id });
            }
            AfterKey::Leave => self.leave_game(),
        }
    }

    fn leave_game(&mut self) {
        self.flow = None;
        self.music = None;
        self.pending = None;
        self.votes_needed = None;
        self.votes_acked = 0;
        self.cursor = 0;
        self.screen = Screen::Home;
    }

    fn apply_outcome(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::ProbeFinished(reachable) => {
                self.backend = if reachable {
                    BackendStatus::Online
                } else {
                    BackendStatus::Offline
                };
            }
            Outcome::CategoriesLoaded(list) => {
                self.form.category_index = 0;
                self.form.categories = list;
            }
            Outcome::SessionCreated(session) => {
                self.pending = None;
                let flow = GameFlow::new(session).with_speaking_ticks(self.speaking_ticks);
                info!(session_id = flow.session().id, "session created");
                self.flow = Some(flow);
                self.music = Some(BackgroundMusic::start("mission-theme"));
                self.screen = Screen::Game;
            }
            Outcome::StatusFetched(snapshot) => {
                if let Some(flow) = &mut self.flow {
                    flow.refresh_session(snapshot);
                }
            }
            Outcome::RoundStarted(round) | Outcome::NextRoundStarted(round) => {
                self.pending = None;
                self.cursor = 0;
                self.votes_needed = None;
                self.votes_acked = 0;
                if let Some(flow) = &mut self.flow {
                    if let Err(err) = flow.begin_round(RoundStarted { round }) {
                        warn!(%err, "stale round ignored");
                    }
                }
            }
            Outcome::VoteCast { voter, .. } => {
                self.pending = None;
                self.votes_acked += 1;
                info!(voter, "vote acknowledged");
                // All ballots in and acknowledged; close the round out.
                let round_id = self.flow.as_ref().and_then(|f| f.round()).map(|r| r.id);
                if let Some(needed) = self.votes_needed {
                    if self.votes_acked >= needed {
                        self.votes_needed = None;
                        if let Some(round_id) = round_id {
                            self.send(Action::FinishRound { round_id });
                        }
                    }
                }
            }
            Outcome::RoundFinished(round_id) => {
                self.send(Action::FetchVotes { round_id });
            }
            Outcome::VotesFetched(votes) => {
                self.pending = None;
                if let Some(flow) = &mut self.flow {
                    if let Err(err) = flow.complete_voting(VotesFetched { votes }) {
                        warn!(%err, "stale votes ignored");
                    }
                }
            }
            Outcome::Eliminated(result) => {
                self.pending = None;
                self.cursor = 0;
                let mut finish: Option<SessionId> = None;
                if let Some(flow) = &mut self.flow {
                    match flow.apply_elimination(EliminationApplied { result }) {
                        Ok(EliminationVerdict::Continue) => {}
                        Ok(_) => finish = Some(flow.session().id),
                        Err(err) => warn!(%err, "stale elimination ignored"),
                    }
                }
                if let Some(session_id) = finish {
                    self.send(Action::FinishSession { session_id });
                }
            }
            Outcome::SessionFinished(session_id) => {
                self.pending = None;
                info!(session_id, "session closed");
            }
            Outcome::Failed { action, error } => {
                self.pending = None;
                let retry = self
                    .last_action
                    .take()
                    .filter(|a| a.label() == action);
                self.error = Some(ErrorDialog {
                    message: format!("Could not {action}: {error}"),
                    retry,
                });
            }
        }
    }
}
