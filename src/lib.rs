//! Pickleball tournament organizer: library with models, scheduling and bracket logic.

pub mod logic;
pub mod models;
pub mod store;

pub use logic::{
    add_court, assign_court, available_courts, bracket_positions, build_bracket, clear_bracket,
    clear_seed_matches, compute_standings, court_statuses, generate_bracket, generate_seed_matches,
    generate_seed_pairings, leaderboard, next_power_of_two, occupancy, occupant, qualified_seeds,
    remove_court, rename_court, report_bracket_result, report_bracket_score, report_score,
    report_seed_score, unassign_court, waiting_matches, CourtStatus, SeedPairing, SeedSchedule,
    Standing, PAIR_ATTEMPTS,
};
pub use models::{
    Bracket, BracketMatch, BracketMatchId, BracketSummary, Court, CourtId, GameMatch, MatchId,
    MatchRef, Player, RoundType, Score, Slot, Team, TeamId, Tournament, TournamentError,
    TournamentId, DEFAULT_SEED_MATCHES_PER_TEAM, DEFAULT_TOTAL_COURTS,
};
pub use store::TournamentStore;
