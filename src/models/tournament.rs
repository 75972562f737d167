//! Tournament, MatchRef and TournamentError.

use crate::models::bracket::{Bracket, BracketMatch, BracketMatchId};
use crate::models::court::{Court, CourtId};
use crate::models::game::{GameMatch, MatchId, RoundType};
use crate::models::team::{Player, Team, TeamId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Seed matches each team plays when the organizer doesn't say otherwise.
pub const DEFAULT_SEED_MATCHES_PER_TEAM: u32 = 3;

/// Courts created with a new tournament when the organizer doesn't say otherwise.
pub const DEFAULT_TOTAL_COURTS: u32 = 6;

/// Errors that can occur during tournament operations. Messages are shown to the organizer as-is.
#[derive(Clone, Debug, Eq, PartialEq, Error)]
pub enum TournamentError {
    #[error("Tournament not found")]
    TournamentNotFound(TournamentId),
    #[error("Team not found")]
    TeamNotFound(TeamId),
    #[error("Match not found")]
    MatchNotFound(MatchRef),
    #[error("Court not found")]
    CourtNotFound(CourtId),
    #[error("No bracket has been generated")]
    NoBracket,
    #[error("Team name cannot be empty")]
    EmptyTeamName,
    /// Names are unique, case-insensitive.
    #[error("A team with this name already exists")]
    DuplicateTeamName,
    #[error("This team cannot be deleted because it is scheduled for {count} match(es)")]
    TeamInMatches { team: TeamId, count: usize },
    #[error("Matches per team must be at least 1")]
    InvalidMatchesPerTeam,
    #[error("Need at least 2 teams to generate bracket")]
    TooFewTeamsToAdvance { requested: usize },
    #[error("Only {qualified} teams have completed matches. Cannot advance {requested} teams.")]
    NotEnoughQualifiedTeams { requested: usize, qualified: usize },
    #[error("A tournament needs at least one court")]
    NoCourts,
    #[error("Cannot remove the last court")]
    LastCourt,
    #[error("Court {0} is currently in use and cannot be removed")]
    CourtInUse(u32),
    #[error("Court {court} does not exist (courts are 1-{total_courts})")]
    CourtOutOfRange { court: u32, total_courts: u32 },
    #[error("Court {0} is already occupied by another match")]
    CourtOccupied(u32),
    #[error("A team in this match is already playing on court {court}")]
    TeamBusy { team: TeamId, court: u32 },
    #[error("Match is already completed")]
    MatchCompleted,
    #[error("Both teams must be decided before this match can be played")]
    MatchNotReady,
    #[error("Bracket matches cannot end in a tie")]
    TiedScore,
    #[error("Tournament data is unavailable (lock error)")]
    LockPoisoned,
}

impl TournamentError {
    /// The request referenced something that doesn't exist (as opposed to a rejected input).
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            TournamentError::TournamentNotFound(_)
                | TournamentError::TeamNotFound(_)
                | TournamentError::MatchNotFound(_)
                | TournamentError::CourtNotFound(_)
                | TournamentError::NoBracket
        )
    }
}

/// Unique identifier for a tournament.
pub type TournamentId = Uuid;

/// A match the court scheduler can place: a seed match or a bracket match.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum MatchRef {
    Seed(MatchId),
    Bracket(BracketMatchId),
}

impl fmt::Display for MatchRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchRef::Seed(id) => write!(f, "seed match {id}"),
            MatchRef::Bracket(id) => write!(f, "bracket match {id}"),
        }
    }
}

/// Full tournament state: teams, courts, seed matches and bracket.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Tournament {
    pub id: TournamentId,
    pub name: String,
    pub seed_matches_per_team: u32,
    /// Last value used to generate the bracket.
    pub teams_to_advance: Option<usize>,
    pub teams: Vec<Team>,
    /// Always numbered 1..=courts.len(), kept sorted by number.
    pub courts: Vec<Court>,
    /// Seed round matches.
    pub matches: Vec<GameMatch>,
    pub bracket: Option<Bracket>,
    pub created_at: DateTime<Utc>,
}

impl Tournament {
    /// Create a tournament with courts 1..=total_courts and no teams.
    pub fn new(
        name: impl Into<String>,
        seed_matches_per_team: u32,
        total_courts: u32,
    ) -> Result<Self, TournamentError> {
        if seed_matches_per_team == 0 {
            return Err(TournamentError::InvalidMatchesPerTeam);
        }
        if total_courts == 0 {
            return Err(TournamentError::NoCourts);
        }
        Ok(Self::build(name.into(), seed_matches_per_team, total_courts))
    }

    /// Tournament with the default seed quota and court count.
    pub fn with_defaults(name: impl Into<String>) -> Self {
        Self::build(name.into(), DEFAULT_SEED_MATCHES_PER_TEAM, DEFAULT_TOTAL_COURTS)
    }

    fn build(name: String, seed_matches_per_team: u32, total_courts: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            seed_matches_per_team,
            teams_to_advance: None,
            teams: Vec::new(),
            courts: (1..=total_courts).map(Court::new).collect(),
            matches: Vec::new(),
            bracket: None,
            created_at: Utc::now(),
        }
    }

    pub fn total_courts(&self) -> u32 {
        self.courts.len() as u32
    }

    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }

    pub fn team_ids(&self) -> Vec<TeamId> {
        self.teams.iter().map(|t| t.id).collect()
    }

    pub fn seed_match(&self, id: MatchId) -> Option<&GameMatch> {
        self.matches.iter().find(|m| m.id == id)
    }

    pub fn seed_match_mut(&mut self, id: MatchId) -> Option<&mut GameMatch> {
        self.matches.iter_mut().find(|m| m.id == id)
    }

    pub fn bracket_match(&self, id: &BracketMatchId) -> Option<&BracketMatch> {
        self.bracket.as_ref().and_then(|b| b.get(id))
    }

    /// Register a team. Names must be unique (case-insensitive); team numbers are sequential.
    pub fn add_team(
        &mut self,
        name: impl Into<String>,
        players: [Player; 2],
    ) -> Result<&Team, TournamentError> {
        let name = self.validate_team_name(name.into(), None)?;
        let team_number = self.teams.iter().map(|t| t.team_number).max().unwrap_or(0) + 1;
        self.teams.push(Team::new(name, team_number, players));
        let team = &self.teams[self.teams.len() - 1];
        log::debug!("Registered team #{} {}", team.team_number, team.name);
        Ok(team)
    }

    /// Administrative edit: rename a team and replace its players.
    pub fn update_team(
        &mut self,
        team_id: TeamId,
        name: impl Into<String>,
        players: [Player; 2],
    ) -> Result<&Team, TournamentError> {
        let name = self.validate_team_name(name.into(), Some(team_id))?;
        let team = self
            .teams
            .iter_mut()
            .find(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        team.name = name;
        team.players = players;
        Ok(&*team)
    }

    /// Remove a team that no match references.
    pub fn remove_team(&mut self, team_id: TeamId) -> Result<Team, TournamentError> {
        let idx = self
            .teams
            .iter()
            .position(|t| t.id == team_id)
            .ok_or(TournamentError::TeamNotFound(team_id))?;
        let seed_count = self.matches.iter().filter(|m| m.involves(team_id)).count();
        let bracket_count = self
            .bracket
            .as_ref()
            .map(|b| b.matches.values().filter(|m| m.involves(team_id)).count())
            .unwrap_or(0);
        let count = seed_count + bracket_count;
        if count > 0 {
            return Err(TournamentError::TeamInMatches {
                team: team_id,
                count,
            });
        }
        Ok(self.teams.remove(idx))
    }

    /// Matches of the seed round.
    pub fn seed_matches(&self) -> impl Iterator<Item = &GameMatch> {
        self.matches.iter().filter(|m| m.round == RoundType::Seed)
    }

    fn validate_team_name(
        &self,
        name: String,
        editing: Option<TeamId>,
    ) -> Result<String, TournamentError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(TournamentError::EmptyTeamName);
        }
        let is_duplicate = self
            .teams
            .iter()
            .filter(|t| Some(t.id) != editing)
            .any(|t| t.name.eq_ignore_ascii_case(trimmed));
        if is_duplicate {
            return Err(TournamentError::DuplicateTeamName);
        }
        Ok(trimmed.to_string())
    }
}
