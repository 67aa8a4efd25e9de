//! Asynchronous action dispatch between the UI loop and the backend.
//!
//! The UI fires an [`Action`]; the dispatcher runs it on a spawned task
//! and reports an [`Outcome`] over an unbounded channel. Calls are never
//! cancelled: a screen that moved on simply ignores the stale outcome
//! when it arrives. Nothing retries on its own; every failed action is
//! re-dispatched by the user.

use std::sync::Arc;

use once_cell::sync::Lazy;
use tokio::sync::mpsc;
use tracing::{info, warn};

use undercover_core::api::GameApi;
use undercover_core::error::GameError;
use undercover_core::model::{
    Category, EliminationResult, PlayerId, Round, RoundId, Session, SessionConfig, SessionId, Vote,
};
use undercover_core::setup;

/// Categories shown when the backend cannot be asked, matching the
/// server's seeded set.
static FALLBACK_CATEGORIES: Lazy<Vec<Category>> = Lazy::new(|| {
    ["Locations", "Dates", "Movies", "Food"]
        .iter()
        .enumerate()
        .map(|(i, name)| Category {
            id: i as i64 + 1,
            name: (*name).to_string(),
            logo_url: None,
        })
        .collect()
});

pub fn fallback_categories() -> Vec<Category> {
    FALLBACK_CATEGORIES.clone()
}

/// Player names used by the connectivity probe.
const PROBE_NAMES: [&str; 3] = ["Test1", "Test2", "Test3"];

/// One server-gated user intention.
#[derive(Debug, Clone)]
pub enum Action {
    /// Validates locally first; an invalid setup produces a failure
    /// outcome without any network call.
    CreateSession {
        names: Vec<String>,
        config: SessionConfig,
    },
    FetchStatus {
        session_id: SessionId,
    },
    StartRound {
        session_id: SessionId,
    },
    CastVote {
        round_id: RoundId,
        voter: PlayerId,
        target: PlayerId,
    },
    FinishRound {
        round_id: RoundId,
    },
    FetchVotes {
        round_id: RoundId,
    },
    Eliminate {
        round_id: RoundId,
        player: PlayerId,
    },
    NextRound {
        session_id: SessionId,
        round_id: RoundId,
    },
    FinishSession {
        session_id: SessionId,
    },
    LoadCategories,
    /// Fires a throwaway create-session request and discards the result.
    Probe,
}

impl Action {
    /// Short label used in error dialogs and logs.
    pub fn label(&self) -> &'static str {
        match self {
            Action::CreateSession { .. } => "create session",
            Action::FetchStatus { .. } => "load session status",
            Action::StartRound { .. } => "start round",
            Action::CastVote { .. } => "cast vote",
            Action::FinishRound { .. } => "finish round",
            Action::FetchVotes { .. } => "load votes",
            Action::Eliminate { .. } => "eliminate player",
            Action::NextRound { .. } => "start next round",
            Action::FinishSession { .. } => "finish session",
            Action::LoadCategories => "load categories",
            Action::Probe => "probe backend",
        }
    }
}

/// What came back from the backend for one [`Action`].
#[derive(Debug)]
pub enum Outcome {
    SessionCreated(Session),
    StatusFetched(Session),
    RoundStarted(Round),
    VoteCast { voter: PlayerId, vote: Vote },
    RoundFinished(RoundId),
    VotesFetched(Vec<Vote>),
    Eliminated(EliminationResult),
    NextRoundStarted(Round),
    SessionFinished(SessionId),
    CategoriesLoaded(Vec<Category>),
    ProbeFinished(bool),
    Failed {
        action: &'static str,
        error: GameError,
    },
}

/// Fans user actions out to tokio tasks and funnels outcomes back to the
/// single UI consumer.
#[derive(Clone)]
pub struct Dispatcher {
    api: Arc<dyn GameApi>,
    tx: mpsc::UnboundedSender<Outcome>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn GameApi>) -> (Self, mpsc::UnboundedReceiver<Outcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { api, tx }, rx)
    }

    /// Fire-and-forget: the outcome arrives on the channel whenever the
    /// backend answers. The send can only fail when the UI is gone, in
    /// which case there is nobody left to care.
    pub fn dispatch(&self, action: Action) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = run(api.as_ref(), action).await;
            let _ = tx.send(outcome);
        });
    }
}

async fn run(api: &dyn GameApi, action: Action) -> Outcome {
    let label = action.label();
    let result = match action {
        Action::CreateSession { names, config } => match setup::session_setup(&names, &config) {
            Ok(roster) => api
                .create_session(&roster, &config)
                .await
                .map(Outcome::SessionCreated),
            Err(err) => Err(err.into()),
        },
        Action::FetchStatus { session_id } => api
            .session_status(session_id)
            .await
            .map(Outcome::StatusFetched),
        Action::StartRound { session_id } => {
            api.start_round(session_id).await.map(Outcome::RoundStarted)
        }
        Action::CastVote {
            round_id,
            voter,
            target,
        } => api
            .cast_vote(round_id, voter, target)
            .await
            .map(|vote| Outcome::VoteCast { voter, vote }),
        Action::FinishRound { round_id } => api
            .finish_round(round_id)
            .await
            .map(|_| Outcome::RoundFinished(round_id)),
        Action::FetchVotes { round_id } => api
            .votes_for_round(round_id)
            .await
            .map(Outcome::VotesFetched),
        Action::Eliminate { round_id, player } => api
            .eliminate_player(round_id, player)
            .await
            .map(Outcome::Eliminated),
        Action::NextRound {
            session_id,
            round_id,
        } => api
            .next_round(session_id, round_id)
            .await
            .map(Outcome::NextRoundStarted),
        Action::FinishSession { session_id } => api
            .finish_session(session_id)
            .await
            .map(|_| Outcome::SessionFinished(session_id)),
        Action::LoadCategories => match api.categories().await {
            Ok(list) if !list.is_empty() => Ok(Outcome::CategoriesLoaded(list)),
            Ok(_) => Ok(Outcome::CategoriesLoaded(fallback_categories())),
            Err(err) => {
                warn!(%err, "categories unavailable, using built-in list");
                Ok(Outcome::CategoriesLoaded(fallback_categories()))
            }
        },
        Action::Probe => {
            let names: Vec<String> = PROBE_NAMES.iter().map(|s| s.to_string()).collect();
            let config = SessionConfig::classic(1, 3);
            let reachable = api.create_session(&names, &config).await.is_ok();
            info!(reachable, "backend probe finished");
            Ok(Outcome::ProbeFinished(reachable))
        }
    };

    match result {
        Ok(outcome) => outcome,
        Err(error) => {
            warn!(action = label, %error, "action failed");
            Outcome::Failed {
                action: label,
                error,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use undercover_core::error::Result;
    use undercover_core::model::{GameMode, Player, Question};

    /// In-memory fake that counts every call it receives.
    #[derive(Default)]
    struct FakeApi {
        calls: AtomicUsize,
        fail_votes: bool,
    }

    impl FakeApi {
        fn bump(&self) {
            self.calls.fetch_add(1, Ordering::SeqCst);
        }

        fn session() -> Session {
            Session {
                id: 1,
                current_round: 0,
                finished: false,
                number_of_rounds: 3,
                game_mode: GameMode::Classic,
                spies_count: 1,
                category: None,
                players: vec![],
            }
        }

        fn round() -> Round {
            Round {
                id: 10,
                round_number: 1,
                completed: false,
                question: Question {
                    id: 1,
                    text: "q".into(),
                    alt_text: None,
                    locale: None,
                    category: None,
                },
                spy: None,
                spy_data: None,
            }
        }
    }

    #[async_trait]
    impl GameApi for FakeApi {
        async fn create_session(&self, _: &[String], _: &SessionConfig) -> Result<Session> {
            self.bump();
            Ok(Self::session())
        }
        async fn start_round(&self, _: SessionId) -> Result<Round> {
            self.bump();
            Ok(Self::round())
        }
        async fn session_status(&self, _: SessionId) -> Result<Session> {
            self.bump();
            Ok(Self::session())
        }
        async fn finish_round(&self, _: RoundId) -> Result<()> {
            self.bump();
            Ok(())
        }
        async fn next_round(&self, _: SessionId, _: RoundId) -> Result<Round> {
            self.bump();
            Ok(Self::round())
        }
        async fn finish_session(&self, _: SessionId) -> Result<()> {
            self.bump();
            Ok(())
        }
        async fn cast_vote(&self, _: RoundId, voter: PlayerId, target: PlayerId) -> Result<Vote> {
            self.bump();
            Ok(Vote {
                id: 1,
                voter: Some(Player {
                    id: voter,
                    name: "v".into(),
                    score: 0,
                    is_eliminated: false,
                    eliminated_in_round_id: None,
                }),
                voted_for: Some(Player {
                    id: target,
                    name: "t".into(),
                    score: 0,
                    is_eliminated: false,
                    eliminated_in_round_id: None,
                }),
            })
        }
        async fn votes_for_round(&self, _: RoundId) -> Result<Vec<Vote>> {
            self.bump();
            if self.fail_votes {
                Err(GameError::invalid_data("votes endpoint returned a non-list"))
            } else {
                Ok(vec![])
            }
        }
        async fn player_vote(&self, _: RoundId, _: PlayerId) -> Result<Option<Vote>> {
            self.bump();
            Ok(None)
        }
        async fn vote_count(&self, _: RoundId) -> Result<u32> {
            self.bump();
            Ok(0)
        }
        async fn eliminate_player(&self, _: RoundId, player: PlayerId) -> Result<EliminationResult> {
            self.bump();
            Ok(EliminationResult {
                player: Player {
                    id: player,
                    name: "p".into(),
                    score: 0,
                    is_eliminated: true,
                    eliminated_in_round_id: None,
                },
                session: None,
            })
        }
        async fn categories(&self) -> Result<Vec<Category>> {
            self.bump();
            Err(GameError::transport("offline"))
        }
        async fn random_question(&self) -> Result<Question> {
            self.bump();
            Err(GameError::transport("offline"))
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn invalid_setup_makes_zero_network_calls() {
        let api = FakeApi::default();
        let outcome = run(
            &api,
            Action::CreateSession {
                names: names(&["Ada", "Ada", "Bob"]),
                config: SessionConfig::classic(1, 3),
            },
        )
        .await;
        match outcome {
            Outcome::Failed { error, .. } => assert!(error.is_setup()),
            other => panic!("expected Failed, got {other:?}"),
        }
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn too_few_players_makes_zero_network_calls() {
        let api = FakeApi::default();
        let outcome = run(
            &api,
            Action::CreateSession {
                names: names(&["Ada", "Bob"]),
                config: SessionConfig::classic(1, 3),
            },
        )
        .await;
        assert!(matches!(outcome, Outcome::Failed { .. }));
        assert_eq!(api.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn valid_setup_reaches_the_backend() {
        let api = FakeApi::default();
        let outcome = run(
            &api,
            Action::CreateSession {
                names: names(&["Ada", "Bob", "Cyd"]),
                config: SessionConfig::classic(1, 3),
            },
        )
        .await;
        assert!(matches!(outcome, Outcome::SessionCreated(_)));
        assert_eq!(api.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn categories_fall_back_when_offline() {
        let api = FakeApi::default();
        let outcome = run(&api, Action::LoadCategories).await;
        match outcome {
            Outcome::CategoriesLoaded(list) => {
                assert_eq!(list.len(), 4);
                assert_eq!(list[0].name, "Locations");
            }
            other => panic!("expected CategoriesLoaded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn invalid_votes_payload_surfaces_as_invalid_data() {
        let api = FakeApi {
            fail_votes: true,
            ..Default::default()
        };
        let outcome = run(&api, Action::FetchVotes { round_id: 10 }).await;
        match outcome {
            Outcome::Failed { action, error } => {
                assert_eq!(action, "load votes");
                assert!(error.is_invalid_data());
            }
            other => panic!("expected Failed, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn dispatcher_delivers_outcomes_over_the_channel() {
        let api = Arc::new(FakeApi::default());
        let (dispatcher, mut rx) = Dispatcher::new(api);
        dispatcher.dispatch(Action::StartRound { session_id: 1 });
        let outcome = rx.recv().await.unwrap();
        assert!(matches!(outcome, Outcome::RoundStarted(_)));
    }
}
