//! Error types
//!
//! Gameplay itself never fails; these cover the start gate and the remote
//! leaderboard.

use thiserror::Error;

use crate::sim::GamePhase;

/// Why a run could not be started
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StartError {
    #[error("cannot start a run while {0:?}")]
    Busy(GamePhase),
    #[error("no character selected")]
    NoCharacter,
    #[error("username has not been verified")]
    UsernameUnverified,
}

/// Leaderboard failures (always logged, never fatal)
#[derive(Debug, Error)]
pub enum HighScoreError {
    #[error("leaderboard is not configured")]
    NotConfigured,
    #[error("a verified username is required to submit")]
    UsernameRequired,
    #[error("leaderboard request failed: {0}")]
    Request(String),
    #[error("leaderboard returned HTTP {0}")]
    Status(u16),
    #[error("malformed leaderboard payload: {0}")]
    Decode(#[from] serde_json::Error),
}
