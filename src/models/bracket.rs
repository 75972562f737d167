//! Single-elimination bracket: BracketMatch records keyed by a deterministic id.

use crate::models::game::{Score, Slot};
use crate::models::team::TeamId;
use crate::models::tournament::TournamentId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Deterministic id of a bracket match: (tournament, round, match number).
///
/// Ordering is round-major, so iterating a `BTreeMap` keyed by it walks the
/// bracket from round 1 to the final.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct BracketMatchId {
    pub tournament_id: TournamentId,
    /// 1 = first round.
    pub round: u32,
    /// 0-indexed within the round.
    pub match_number: u32,
}

impl BracketMatchId {
    pub fn new(tournament_id: TournamentId, round: u32, match_number: u32) -> Self {
        Self {
            tournament_id,
            round,
            match_number,
        }
    }

    /// Id of the match the winner of this one feeds into.
    pub fn next(&self) -> Self {
        Self::new(self.tournament_id, self.round + 1, self.match_number / 2)
    }
}

impl fmt::Display for BracketMatchId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.tournament_id, self.round, self.match_number)
    }
}

/// One match of the bracket. Empty slots are TBD (or a bye in round 1).
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketMatch {
    pub id: BracketMatchId,
    pub round: u32,
    pub match_number: u32,
    pub team_a: Option<TeamId>,
    pub team_b: Option<TeamId>,
    pub score: Option<Score>,
    pub scheduled_court: Option<u32>,
    pub started_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    /// None only for the final.
    pub winner_advances_to: Option<BracketMatchId>,
}

impl BracketMatch {
    pub fn new(id: BracketMatchId) -> Self {
        Self {
            id,
            round: id.round,
            match_number: id.match_number,
            team_a: None,
            team_b: None,
            score: None,
            scheduled_court: None,
            started_at: None,
            completed_at: None,
            winner_advances_to: None,
        }
    }

    pub fn team(&self, slot: Slot) -> Option<TeamId> {
        match slot {
            Slot::A => self.team_a,
            Slot::B => self.team_b,
        }
    }

    pub fn set_team(&mut self, slot: Slot, team: TeamId) {
        match slot {
            Slot::A => self.team_a = Some(team),
            Slot::B => self.team_b = Some(team),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.score.is_some() && self.completed_at.is_some()
    }

    pub fn is_active(&self) -> bool {
        self.scheduled_court.is_some() && !self.is_completed()
    }

    /// Both slots filled: the match can be put on a court and scored.
    pub fn is_ready(&self) -> bool {
        self.team_a.is_some() && self.team_b.is_some()
    }

    /// Round-1 match with exactly one team.
    pub fn is_bye(&self) -> bool {
        self.round == 1 && self.team_a.is_some() != self.team_b.is_some()
    }

    /// The lone team of a bye match.
    pub fn bye_team(&self) -> Option<TeamId> {
        if self.is_bye() {
            self.team_a.or(self.team_b)
        } else {
            None
        }
    }

    pub fn involves(&self, team: TeamId) -> bool {
        self.team_a == Some(team) || self.team_b == Some(team)
    }

    /// Winner of a completed match.
    pub fn winner(&self) -> Option<TeamId> {
        if !self.is_completed() {
            return None;
        }
        self.score
            .and_then(|s| s.winning_slot())
            .and_then(|slot| self.team(slot))
    }
}

/// Shape of a generated bracket.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BracketSummary {
    pub teams_advancing: usize,
    pub bracket_size: usize,
    pub rounds: u32,
    pub bye_count: usize,
}

/// Arena of bracket matches for one tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Bracket {
    pub tournament_id: TournamentId,
    pub summary: BracketSummary,
    /// Serialized as a list; the id is repeated inside each match.
    #[serde(with = "match_list")]
    pub matches: BTreeMap<BracketMatchId, BracketMatch>,
}

impl Bracket {
    pub fn get(&self, id: &BracketMatchId) -> Option<&BracketMatch> {
        self.matches.get(id)
    }

    pub fn get_mut(&mut self, id: &BracketMatchId) -> Option<&mut BracketMatch> {
        self.matches.get_mut(id)
    }

    /// Matches of one round in match-number order.
    pub fn round(&self, round: u32) -> impl Iterator<Item = &BracketMatch> {
        self.matches.values().filter(move |m| m.round == round)
    }

    pub fn final_match(&self) -> Option<&BracketMatch> {
        self.matches
            .get(&BracketMatchId::new(self.tournament_id, self.summary.rounds, 0))
    }

    /// Winner of the final, once it has been played.
    pub fn champion(&self) -> Option<TeamId> {
        self.final_match().and_then(BracketMatch::winner)
    }
}

mod match_list {
    use super::{BracketMatch, BracketMatchId};
    use serde::{Deserialize, Deserializer, Serializer};
    use std::collections::BTreeMap;

    pub fn serialize<S: Serializer>(
        matches: &BTreeMap<BracketMatchId, BracketMatch>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(matches.values())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<BTreeMap<BracketMatchId, BracketMatch>, D::Error> {
        let list = Vec::<BracketMatch>::deserialize(deserializer)?;
        Ok(list.into_iter().map(|m| (m.id, m)).collect())
    }
}
