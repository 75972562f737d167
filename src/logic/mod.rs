//! Tournament business logic: seed round, ranking, bracket, court scheduling.

mod bracket;
mod courts;
mod ranking;
mod seed_round;

pub use bracket::{
    bracket_positions, build_bracket, clear_bracket, generate_bracket, next_power_of_two,
    report_bracket_score,
};
pub use courts::{
    add_court, assign_court, available_courts, court_statuses, occupancy, occupant, remove_court,
    rename_court, report_bracket_result, report_score, report_seed_score, unassign_court,
    waiting_matches, CourtStatus,
};
pub use ranking::{compute_standings, leaderboard, qualified_seeds, Standing};
pub use seed_round::{
    clear_seed_matches, generate_seed_matches, generate_seed_pairings, SeedPairing, SeedSchedule,
    PAIR_ATTEMPTS,
};
