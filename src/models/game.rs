//! Seed round match (game), Score, and RoundType.

use crate::models::team::TeamId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a match.
pub type MatchId = Uuid;

/// Final score of a match, from team A's and team B's side.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub struct Score {
    pub team_a: u32,
    pub team_b: u32,
}

impl Score {
    pub fn new(team_a: u32, team_b: u32) -> Self {
        Self { team_a, team_b }
    }

    pub fn is_tie(&self) -> bool {
        self.team_a == self.team_b
    }

    /// Which side won, or None on a tie.
    pub fn winning_slot(&self) -> Option<Slot> {
        match self.team_a.cmp(&self.team_b) {
            std::cmp::Ordering::Greater => Some(Slot::A),
            std::cmp::Ordering::Less => Some(Slot::B),
            std::cmp::Ordering::Equal => None,
        }
    }
}

/// Team A or team B position in a match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Slot {
    A,
    B,
}

impl Slot {
    /// Slot in the next-round match fed by the match with this number: even feeds A, odd feeds B.
    pub fn fed_by(match_number: u32) -> Self {
        if match_number % 2 == 0 {
            Slot::A
        } else {
            Slot::B
        }
    }
}

/// Phase of the tournament this match belongs to. Playoff games are `BracketMatch` records.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundType {
    #[default]
    Seed,
}

/// A seed round match between two teams.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct GameMatch {
    pub id: MatchId,
    pub team_a: TeamId,
    pub team_b: TeamId,
    pub round: RoundType,
    /// Court number while the match is on a court.
    pub scheduled_court: Option<u32>,
    pub started_at: Option<DateTime<Utc>>,
    /// None if not yet played.
    pub score: Option<Score>,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GameMatch {
    pub fn new(team_a: TeamId, team_b: TeamId, round: RoundType) -> Self {
        Self {
            id: Uuid::new_v4(),
            team_a,
            team_b,
            round,
            scheduled_court: None,
            started_at: None,
            score: None,
            completed_at: None,
            created_at: Utc::now(),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.score.is_some() && self.completed_at.is_some()
    }

    /// On a court and not yet completed.
    pub fn is_active(&self) -> bool {
        self.scheduled_court.is_some() && !self.is_completed()
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_a == team || self.team_b == team
    }

    /// Record the final score. Completion always releases the court.
    pub fn complete(&mut self, score: Score) {
        self.score = Some(score);
        self.completed_at = Some(Utc::now());
        self.scheduled_court = None;
        self.started_at = None;
    }
}
