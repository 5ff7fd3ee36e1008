//! High score leaderboard
//!
//! Two boards (all time, last 24 hours) fetched from a `ScoreStore`, a
//! username availability check, and a submit-once-per-run guard. Remote
//! failures are logged and leave the previous boards in place.

pub mod remote;
pub mod store;

pub use remote::{RemoteConfig, ScoreQuery};
pub use store::{MemoryStore, ScoreStore};

#[cfg(target_arch = "wasm32")]
pub use remote::RestStore;

use serde::{Deserialize, Serialize};

use crate::consts::{DAILY_WINDOW_MS, LEADERBOARD_LIMIT, MIN_USERNAME_LEN};
use crate::error::HighScoreError;
use crate::platform::time;

/// A leaderboard row as the backend stores it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRow {
    pub username: String,
    pub score: u64,
    /// ISO-8601 UTC, set by the backend
    #[serde(default)]
    pub created_at: String,
}

/// Insert payload; the backend fills in `created_at`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewScore {
    pub username: String,
    pub score: u64,
}

/// Both boards from a single refresh
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Boards {
    pub all_time: Vec<ScoreRow>,
    pub daily: Vec<ScoreRow>,
}

/// What `submit` did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Submitted,
    /// This run's score is already on the board
    AlreadySubmitted,
    /// Zero scores are never submitted
    NothingToSubmit,
}

/// What to do with a finished run's score
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pending {
    /// Insert this row, then report it with `mark_submitted(run, ..)`
    Insert { row: NewScore, run: u64 },
    /// Nothing to send
    Skip(SubmitOutcome),
}

/// Start of the "today" window for a wall-clock time, as the backend compares it
pub fn daily_cutoff(now_unix_ms: f64) -> String {
    time::iso8601(now_unix_ms - DAILY_WINDOW_MS)
}

/// Fetch both boards
pub async fn fetch_boards<S: ScoreStore>(
    store: &S,
    now_unix_ms: f64,
) -> Result<Boards, HighScoreError> {
    let all_time = store.top_scores(None, LEADERBOARD_LIMIT).await?;
    let cutoff = daily_cutoff(now_unix_ms);
    let daily = store.top_scores(Some(&cutoff), LEADERBOARD_LIMIT).await?;
    Ok(Boards { all_time, daily })
}

/// Whether `username` may be used: long enough and not on the board yet
pub async fn username_available<S: ScoreStore>(
    store: &S,
    username: &str,
) -> Result<bool, HighScoreError> {
    if username.chars().count() < MIN_USERNAME_LEN {
        return Ok(false);
    }
    let taken = store.rows_for_username(username).await?;
    Ok(taken.is_empty())
}

/// Insert a row, then refetch the boards.
///
/// Only a failed insert is an error; a failed refetch after it yields `None`.
pub async fn insert_score<S: ScoreStore>(
    store: &S,
    row: &NewScore,
    now_unix_ms: f64,
) -> Result<Option<Boards>, HighScoreError> {
    if let Err(err) = store.insert(row).await {
        log::error!("Error submitting score: {}", err);
        return Err(err);
    }
    log::info!("Submitted {} for {}", row.score, row.username);

    match fetch_boards(store, now_unix_ms).await {
        Ok(boards) => Ok(Some(boards)),
        Err(err) => {
            log::error!("Error fetching scores: {}", err);
            Ok(None)
        }
    }
}

/// Leaderboard view plus the player's submission state
#[derive(Debug, Clone, Default)]
pub struct HighScores {
    pub all_time: Vec<ScoreRow>,
    pub daily: Vec<ScoreRow>,
    /// Top all-time score, shown in the HUD
    pub high_score: u64,
    /// Username that passed the availability check
    username: Option<String>,
    /// The current run's score has been stored
    submitted: bool,
    /// Bumped by `begin_run`, so a late insert cannot mark a newer run
    run: u64,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace both boards
    pub fn apply(&mut self, boards: Boards) {
        if let Some(top) = boards.all_time.first() {
            self.high_score = top.score;
        }
        self.all_time = boards.all_time;
        self.daily = boards.daily;
    }

    /// Refetch both boards; on failure keep the old ones
    pub async fn refresh<S: ScoreStore>(&mut self, store: &S, now_unix_ms: f64) -> bool {
        match fetch_boards(store, now_unix_ms).await {
            Ok(boards) => {
                log::info!(
                    "Leaderboard refreshed ({} all time, {} today)",
                    boards.all_time.len(),
                    boards.daily.len()
                );
                self.apply(boards);
                true
            }
            Err(err) => {
                log::error!("Error fetching scores: {}", err);
                false
            }
        }
    }

    /// Check a username and remember it if available. Errors count as unavailable.
    pub async fn check_username<S: ScoreStore>(&mut self, store: &S, username: &str) -> bool {
        let available = match username_available(store, username).await {
            Ok(available) => available,
            Err(err) => {
                log::error!("Error checking username: {}", err);
                false
            }
        };
        self.set_username_check(username, available);
        available
    }

    /// Record the result of an availability check
    pub fn set_username_check(&mut self, username: &str, available: bool) {
        self.username = available.then(|| username.to_string());
    }

    pub fn verified_username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// A new run can be submitted again
    pub fn begin_run(&mut self) {
        self.submitted = false;
        self.run += 1;
    }

    /// Decide what submitting `score` for the current run involves
    pub fn pending(&self, score: u64) -> Result<Pending, HighScoreError> {
        if self.submitted {
            return Ok(Pending::Skip(SubmitOutcome::AlreadySubmitted));
        }
        if score == 0 {
            return Ok(Pending::Skip(SubmitOutcome::NothingToSubmit));
        }
        let username = self.username.clone().ok_or(HighScoreError::UsernameRequired)?;
        Ok(Pending::Insert {
            row: NewScore { username, score },
            run: self.run,
        })
    }

    /// Record a finished insert. Returns false if `run` is no longer current.
    pub fn mark_submitted(&mut self, run: u64, boards: Option<Boards>) -> bool {
        if let Some(boards) = boards {
            self.apply(boards);
        }
        if run != self.run {
            return false;
        }
        self.submitted = true;
        true
    }

    /// Store this run's score once, then refresh the boards.
    ///
    /// A failed insert leaves the run unsubmitted so it can be retried.
    pub async fn submit<S: ScoreStore>(
        &mut self,
        store: &S,
        score: u64,
        now_unix_ms: f64,
    ) -> Result<SubmitOutcome, HighScoreError> {
        let (row, run) = match self.pending(score)? {
            Pending::Insert { row, run } => (row, run),
            Pending::Skip(outcome) => return Ok(outcome),
        };
        let boards = insert_score(store, &row, now_unix_ms).await?;
        self.mark_submitted(run, boards);
        Ok(SubmitOutcome::Submitted)
    }

    /// Check if a score would make the all-time board
    pub fn qualifies(&self, score: u64) -> bool {
        if score == 0 {
            return false;
        }
        if self.all_time.len() < LEADERBOARD_LIMIT {
            return true;
        }
        // Check if score beats the lowest entry
        self.all_time.last().map(|e| score > e.score).unwrap_or(true)
    }

    /// Get the rank a score would achieve (1-indexed, None if doesn't qualify)
    pub fn potential_rank(&self, score: u64) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let rank = self.all_time.iter().position(|e| score > e.score);
        Some(rank.unwrap_or(self.all_time.len()) + 1)
    }
}
