//! Menu / playing / game-over flow
//!
//! The frame loop owns the playing phase. Once a session ends, the host either
//! retries directly or resolves the game over: submit (if a name is set), then
//! refresh the leaderboard on success or fall back to a local entry on failure,
//! and return to the menu.
//!
//! Network calls are split from state changes so that a browser host can await
//! them without holding a borrow of the session.

use crate::leaderboard::Leaderboard;
use crate::report::{RemoteEntry, ReportError, ScoreReporter};
use crate::sim::{GamePhase, GameState};

/// A finished session ready to be reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub name: String,
    pub score: u64,
    pub cash: u64,
}

impl Submission {
    /// None when the trimmed name is empty
    pub fn new(name: &str, score: u64, cash: u64) -> Option<Self> {
        let name = name.trim();
        if name.is_empty() {
            return None;
        }
        Some(Self {
            name: name.to_string(),
            score,
            cash,
        })
    }
}

/// Result of talking to the reporter at game over
#[derive(Debug)]
pub enum ReportOutcome {
    /// No name, nothing sent
    Skipped,
    /// Server accepted the score; carries the follow-up fetch
    Acknowledged {
        leaderboard: Result<Vec<RemoteEntry>, ReportError>,
    },
    /// Submission failed
    Failed(ReportError),
}

/// Submit a finished session and, on success, fetch the leaderboard once
pub async fn report_score<R: ScoreReporter>(
    reporter: &R,
    submission: Option<&Submission>,
) -> ReportOutcome {
    let Some(submission) = submission else {
        return ReportOutcome::Skipped;
    };
    match reporter
        .submit_score(&submission.name, submission.score)
        .await
    {
        Ok(_ack) => ReportOutcome::Acknowledged {
            leaderboard: reporter.fetch_leaderboard().await,
        },
        Err(e) => {
            log::warn!("Score submission failed: {}", e);
            ReportOutcome::Failed(e)
        }
    }
}

/// One player's run of sessions plus the displayed leaderboard
#[derive(Debug, Clone)]
pub struct Session {
    pub game: GameState,
    pub leaderboard: Leaderboard,
    pub player_name: String,
}

impl Default for Session {
    fn default() -> Self {
        Self::new("")
    }
}

impl Session {
    pub fn new(player_name: &str) -> Self {
        Self {
            game: GameState::new(0),
            leaderboard: Leaderboard::new(),
            player_name: player_name.to_string(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.game.phase
    }

    /// Menu -> playing. Returns false if a session is already running.
    pub fn start(&mut self, seed: u64) -> bool {
        if self.game.phase == GamePhase::Playing {
            return false;
        }
        self.game.start(seed);
        true
    }

    /// Game over -> playing, without submitting
    pub fn retry(&mut self, seed: u64) -> bool {
        if self.game.phase != GamePhase::GameOver {
            return false;
        }
        self.game.start(seed);
        true
    }

    /// End a running session where it stands
    pub fn abandon(&mut self) {
        if self.game.phase == GamePhase::Playing {
            log::info!(
                "Session abandoned (score {}, cash {})",
                self.game.score,
                self.game.cash
            );
            self.game.phase = GamePhase::GameOver;
        }
    }

    pub fn return_to_menu(&mut self) {
        self.game.phase = GamePhase::Menu;
    }

    /// The submission to send for the session that just ended, if any
    pub fn pending_submission(&self) -> Option<Submission> {
        if self.game.phase != GamePhase::GameOver {
            return None;
        }
        Submission::new(&self.player_name, self.game.score, self.game.cash)
    }

    /// Show a fetched leaderboard. A failed fetch clears the board, except
    /// for a malformed body which leaves it as it was.
    pub fn apply_leaderboard(&mut self, result: Result<Vec<RemoteEntry>, ReportError>) {
        match result {
            Ok(entries) => self.leaderboard.replace_with_remote(entries),
            Err(ReportError::UnexpectedBody) => {
                log::warn!("Ignoring malformed leaderboard response");
            }
            Err(e) => {
                log::warn!("Leaderboard fetch failed: {}", e);
                self.leaderboard.clear();
            }
        }
    }

    /// Apply the reporter outcome and go back to the menu
    pub fn resolve_game_over(&mut self, outcome: ReportOutcome) {
        match outcome {
            ReportOutcome::Skipped => {}
            ReportOutcome::Acknowledged { leaderboard } => self.apply_leaderboard(leaderboard),
            ReportOutcome::Failed(_) => {
                if let Some(sub) = self.pending_submission() {
                    self.leaderboard.insert_local(&sub.name, sub.score, sub.cash);
                }
            }
        }
        self.return_to_menu();
    }

    pub async fn refresh_leaderboard<R: ScoreReporter>(&mut self, reporter: &R) {
        let result = reporter.fetch_leaderboard().await;
        self.apply_leaderboard(result);
    }

    /// Resolve a game over end to end ("Back to Menu")
    pub async fn finish<R: ScoreReporter>(&mut self, reporter: &R) {
        let submission = self.pending_submission();
        let outcome = report_score(reporter, submission.as_ref()).await;
        self.resolve_game_over(outcome);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::Acknowledgement;
    use std::cell::{Cell, RefCell};

    /// In-memory reporter that counts calls
    #[derive(Default)]
    struct FakeReporter {
        submits: Cell<usize>,
        fetches: Cell<usize>,
        fail_submit: bool,
        fail_fetch: bool,
        board: RefCell<Vec<RemoteEntry>>,
    }

    impl ScoreReporter for FakeReporter {
        async fn submit_score(&self, name: &str, score: u64) -> Result<Acknowledgement, ReportError> {
            self.submits.set(self.submits.get() + 1);
            if self.fail_submit {
                return Err(ReportError::Status(503));
            }
            self.board.borrow_mut().push(RemoteEntry::new(name, score));
            Ok(Acknowledgement::default())
        }

        async fn fetch_leaderboard(&self) -> Result<Vec<RemoteEntry>, ReportError> {
            self.fetches.set(self.fetches.get() + 1);
            if self.fail_fetch {
                return Err(ReportError::Status(500));
            }
            Ok(self.board.borrow().clone())
        }
    }

    fn ended(name: &str, score: u64) -> Session {
        let mut session = Session::new(name);
        session.start(1);
        session.game.score = score;
        session.game.cash = score;
        session.game.phase = GamePhase::GameOver;
        session
    }

    #[test]
    fn test_submission_needs_trimmed_name() {
        assert_eq!(Submission::new("   ", 10, 10), None);
        let sub = Submission::new("  ada ", 10, 12).unwrap();
        assert_eq!(sub.name, "ada");
        assert_eq!(sub.cash, 12);
    }

    #[test]
    fn test_phase_transitions() {
        let mut session = Session::new("ada");
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(!session.retry(1));
        assert!(session.start(1));
        assert!(!session.start(2));
        assert_eq!(session.pending_submission(), None);
        session.game.score = 40;
        session.game.phase = GamePhase::GameOver;
        assert!(session.retry(3));
        assert_eq!(session.phase(), GamePhase::Playing);
        assert_eq!(session.game.score, 0);
        assert_eq!(session.game.cash, 0);

        session.game.score = 15;
        session.abandon();
        assert_eq!(session.phase(), GamePhase::GameOver);
        assert_eq!(session.pending_submission().map(|s| s.score), Some(15));
        session.return_to_menu();
        session.abandon();
        assert_eq!(session.phase(), GamePhase::Menu);
    }

    #[tokio::test]
    async fn test_successful_submit_fetches_once() {
        let reporter = FakeReporter::default();
        let mut session = ended("ada", 120);
        session.refresh_leaderboard(&reporter).await;
        assert_eq!(reporter.fetches.get(), 1);

        session.finish(&reporter).await;

        assert_eq!(reporter.submits.get(), 1);
        assert_eq!(reporter.fetches.get(), 2);
        assert_eq!(session.phase(), GamePhase::Menu);
        assert_eq!(session.leaderboard.len(), 1);
        assert_eq!(session.leaderboard.entries()[0].name, "ada");
        assert_eq!(session.leaderboard.entries()[0].cash, 120);
    }

    #[tokio::test]
    async fn test_failed_submit_falls_back_locally() {
        let reporter = FakeReporter {
            fail_submit: true,
            ..FakeReporter::default()
        };
        reporter
            .board
            .borrow_mut()
            .extend([RemoteEntry::new("top", 500), RemoteEntry::new("low", 10)]);
        let mut session = ended("ada", 120);
        session.refresh_leaderboard(&reporter).await;

        session.finish(&reporter).await;

        assert_eq!(reporter.submits.get(), 1);
        assert_eq!(reporter.fetches.get(), 1);
        assert_eq!(session.phase(), GamePhase::Menu);
        let rows: Vec<(&str, u64, usize)> = session
            .leaderboard
            .entries()
            .iter()
            .map(|e| (e.name.as_str(), e.score, e.rank))
            .collect();
        assert_eq!(rows, vec![("top", 500, 1), ("ada", 120, 2), ("low", 10, 3)]);
    }

    #[tokio::test]
    async fn test_empty_name_skips_submission() {
        let reporter = FakeReporter::default();
        let mut session = ended("  ", 120);
        session.finish(&reporter).await;
        assert_eq!(reporter.submits.get(), 0);
        assert_eq!(reporter.fetches.get(), 0);
        assert_eq!(session.phase(), GamePhase::Menu);
        assert!(session.leaderboard.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_clears_board() {
        let mut reporter = FakeReporter::default();
        reporter.board.borrow_mut().push(RemoteEntry::new("a", 5));
        let mut session = Session::new("ada");
        session.refresh_leaderboard(&reporter).await;
        assert_eq!(session.leaderboard.len(), 1);

        reporter.fail_fetch = true;
        session.refresh_leaderboard(&reporter).await;
        assert!(session.leaderboard.is_empty());
    }

    #[test]
    fn test_malformed_body_keeps_board() {
        let mut session = Session::new("ada");
        session.apply_leaderboard(Ok(vec![RemoteEntry::new("a", 5)]));
        session.apply_leaderboard(Err(ReportError::UnexpectedBody));
        assert_eq!(session.leaderboard.len(), 1);
    }

    #[tokio::test]
    async fn test_report_score_outcomes() {
        let reporter = FakeReporter::default();
        assert!(matches!(
            report_score(&reporter, None).await,
            ReportOutcome::Skipped
        ));
        let sub = Submission::new("ada", 1, 1);
        assert!(matches!(
            report_score(&reporter, sub.as_ref()).await,
            ReportOutcome::Acknowledged { leaderboard: Ok(_) }
        ));
        let failing = FakeReporter {
            fail_submit: true,
            ..FakeReporter::default()
        };
        assert!(matches!(
            report_score(&failing, sub.as_ref()).await,
            ReportOutcome::Failed(ReportError::Status(503))
        ));
        assert_eq!(failing.fetches.get(), 0);
    }
}
