//! Score storage seam
//!
//! The leaderboard only ever needs three queries. `MemoryStore` answers them
//! in process for tests; the browser build talks to the hosted table
//! through `RestStore`.

use std::cell::{Cell, RefCell};

use super::{NewScore, ScoreRow};
use crate::error::HighScoreError;
use crate::platform::time;

/// Backend for leaderboard rows
#[allow(async_fn_in_trait)]
pub trait ScoreStore {
    /// Highest scores first, optionally only rows created at or after `since` (ISO-8601)
    async fn top_scores(
        &self,
        since: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoreRow>, HighScoreError>;

    /// Every row with exactly this username
    async fn rows_for_username(&self, username: &str) -> Result<Vec<ScoreRow>, HighScoreError>;

    async fn insert(&self, score: &NewScore) -> Result<(), HighScoreError>;
}

/// In-process store with an injectable clock and failure switch
#[derive(Debug, Default)]
pub struct MemoryStore {
    rows: RefCell<Vec<ScoreRow>>,
    now_unix_ms: Cell<f64>,
    failing: Cell<bool>,
}

impl MemoryStore {
    pub fn new(now_unix_ms: f64) -> Self {
        Self {
            rows: RefCell::new(Vec::new()),
            now_unix_ms: Cell::new(now_unix_ms),
            failing: Cell::new(false),
        }
    }

    /// Add a row created at `at_unix_ms`
    pub fn seed(&self, username: &str, score: u64, at_unix_ms: f64) {
        self.rows.borrow_mut().push(ScoreRow {
            username: username.to_string(),
            score,
            created_at: time::iso8601(at_unix_ms),
        });
    }

    /// Clock used to stamp inserted rows
    pub fn set_now(&self, now_unix_ms: f64) {
        self.now_unix_ms.set(now_unix_ms);
    }

    /// Make every call fail until switched back
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    pub fn rows(&self) -> Vec<ScoreRow> {
        self.rows.borrow().clone()
    }

    fn check(&self) -> Result<(), HighScoreError> {
        if self.failing.get() {
            Err(HighScoreError::Request("store unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl ScoreStore for MemoryStore {
    async fn top_scores(
        &self,
        since: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ScoreRow>, HighScoreError> {
        self.check()?;
        let cutoff = since.and_then(time::parse_iso8601);
        let mut rows: Vec<ScoreRow> = self
            .rows
            .borrow()
            .iter()
            .filter(|row| match cutoff {
                Some(cutoff) => time::parse_iso8601(&row.created_at).is_some_and(|at| at >= cutoff),
                None => true,
            })
            .cloned()
            .collect();
        // Stable: equal scores keep insertion order
        rows.sort_by(|a, b| b.score.cmp(&a.score));
        rows.truncate(limit);
        Ok(rows)
    }

    async fn rows_for_username(&self, username: &str) -> Result<Vec<ScoreRow>, HighScoreError> {
        self.check()?;
        Ok(self
            .rows
            .borrow()
            .iter()
            .filter(|row| row.username == username)
            .cloned()
            .collect())
    }

    async fn insert(&self, score: &NewScore) -> Result<(), HighScoreError> {
        self.check()?;
        self.seed(&score.username, score.score, self.now_unix_ms.get());
        Ok(())
    }
}
