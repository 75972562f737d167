//! Data structures for the tournament: teams, courts, matches, bracket, tournament state.

mod bracket;
mod court;
mod game;
mod team;
mod tournament;

pub use bracket::{Bracket, BracketMatch, BracketMatchId, BracketSummary};
pub use court::{Court, CourtId};
pub use game::{GameMatch, MatchId, RoundType, Score, Slot};
pub use team::{Player, Team, TeamId};
pub use tournament::{
    MatchRef, Tournament, TournamentError, TournamentId, DEFAULT_SEED_MATCHES_PER_TEAM,
    DEFAULT_TOTAL_COURTS,
};
