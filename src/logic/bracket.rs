//! Elimination bracket: seeded construction, bye resolution, and winner advancement.

use crate::logic::ranking::{leaderboard, qualified_seeds};
use crate::models::{
    Bracket, BracketMatch, BracketMatchId, BracketSummary, MatchRef, Score, Slot, TeamId,
    Tournament, TournamentError, TournamentId,
};
use chrono::Utc;
use std::collections::BTreeMap;

/// Smallest power of two that is >= n (1 for n <= 1).
pub fn next_power_of_two(n: usize) -> usize {
    n.max(1).next_power_of_two()
}

/// Round-1 pairings of 1-based seed positions for a bracket of `bracket_size` (a power of two),
/// in match-number order.
///
/// Built by mirroring: each seed `s` of the half-size bracket is split into `s` and its
/// complement `size + 1 - s`. For 8 this gives (1,8) (4,5) (2,7) (3,6): seed `k` always meets
/// `size + 1 - k` first, and the top two seeds sit in opposite halves.
pub fn bracket_positions(bracket_size: usize) -> Vec<(usize, usize)> {
    seed_order(bracket_size)
        .chunks_exact(2)
        .map(|pair| (pair[0], pair[1]))
        .collect()
}

fn seed_order(size: usize) -> Vec<usize> {
    if size <= 1 {
        return vec![1];
    }
    seed_order(size / 2)
        .into_iter()
        .flat_map(|s| [s, size + 1 - s])
        .collect()
}

/// Build a single-elimination bracket from teams in rank order.
///
/// The top `teams_to_advance` teams are seeded into a bracket of the next power of two; the
/// empty seed positions are byes, and every bye team is placed into its round-2 match before
/// this returns.
pub fn build_bracket(
    tournament_id: TournamentId,
    ranked: &[TeamId],
    teams_to_advance: usize,
) -> Result<Bracket, TournamentError> {
    if teams_to_advance < 2 {
        return Err(TournamentError::TooFewTeamsToAdvance {
            requested: teams_to_advance,
        });
    }
    if teams_to_advance > ranked.len() {
        return Err(TournamentError::NotEnoughQualifiedTeams {
            requested: teams_to_advance,
            qualified: ranked.len(),
        });
    }

    let bracket_size = next_power_of_two(teams_to_advance);
    let rounds = bracket_size.trailing_zeros();
    let summary = BracketSummary {
        teams_advancing: teams_to_advance,
        bracket_size,
        rounds,
        bye_count: bracket_size - teams_to_advance,
    };

    let seeds: Vec<Option<TeamId>> = (0..bracket_size)
        .map(|i| ranked.get(i).copied().filter(|_| i < teams_to_advance))
        .collect();

    let mut matches = BTreeMap::new();
    let positions = bracket_positions(bracket_size);
    for round in 1..=rounds {
        let matches_in_round = (bracket_size >> round) as u32;
        for match_number in 0..matches_in_round {
            let id = BracketMatchId::new(tournament_id, round, match_number);
            let mut m = BracketMatch::new(id);
            if round == 1 {
                let (top, bottom) = positions[match_number as usize];
                m.team_a = seeds[top - 1];
                m.team_b = seeds[bottom - 1];
            }
            if round < rounds {
                m.winner_advances_to = Some(id.next());
            }
            matches.insert(id, m);
        }
    }

    let mut bracket = Bracket {
        tournament_id,
        summary,
        matches,
    };
    resolve_byes(&mut bracket);
    Ok(bracket)
}

/// Move every round-1 bye team into its next-round slot.
fn resolve_byes(bracket: &mut Bracket) {
    let byes: Vec<(BracketMatch, TeamId)> = bracket
        .round(1)
        .filter_map(|m| m.bye_team().map(|team| (m.clone(), team)))
        .collect();
    for (m, team) in byes {
        advance_winner(bracket, &m, team);
        log::debug!("Seed bye: team {} advances from match {}", team, m.id);
    }
}

/// Write `winner` into the match `source` feeds, in the slot fixed by the source's match number.
fn advance_winner(bracket: &mut Bracket, source: &BracketMatch, winner: TeamId) {
    let Some(next_id) = source.winner_advances_to else {
        return;
    };
    if let Some(next) = bracket.get_mut(&next_id) {
        next.set_team(Slot::fed_by(source.match_number), winner);
    }
}

/// Record a bracket result and advance the winner.
///
/// Rejected if the match is already completed, doesn't have both teams yet, or the score is a
/// tie. On success the court is released and the winner is in the next match before this returns.
pub fn report_bracket_score(
    bracket: &mut Bracket,
    match_id: &BracketMatchId,
    score: Score,
) -> Result<BracketMatch, TournamentError> {
    let m = bracket
        .get(match_id)
        .ok_or(TournamentError::MatchNotFound(MatchRef::Bracket(*match_id)))?;
    if m.is_completed() {
        return Err(TournamentError::MatchCompleted);
    }
    if !m.is_ready() {
        return Err(TournamentError::MatchNotReady);
    }
    if score.is_tie() {
        return Err(TournamentError::TiedScore);
    }
    let winner = score
        .winning_slot()
        .and_then(|slot| m.team(slot))
        .ok_or(TournamentError::MatchNotReady)?;
    if let Some(next_id) = m.winner_advances_to {
        if bracket.get(&next_id).is_none() {
            return Err(TournamentError::MatchNotFound(MatchRef::Bracket(next_id)));
        }
    }

    let Some(m) = bracket.get_mut(match_id) else {
        return Err(TournamentError::MatchNotFound(MatchRef::Bracket(*match_id)));
    };
    m.score = Some(score);
    m.completed_at = Some(Utc::now());
    m.scheduled_court = None;
    m.started_at = None;
    let updated = m.clone();

    advance_winner(bracket, &updated, winner);
    match updated.winner_advances_to {
        Some(next_id) => log::info!(
            "Team {} wins match {} and advances to {}",
            winner,
            updated.id,
            next_id
        ),
        None => log::info!("Team {} wins the final", winner),
    }
    Ok(updated)
}

/// Regenerate the bracket from the current seed round standings.
///
/// `teams_to_advance` defaults to every team with a completed seed match. Any existing bracket
/// (including its court assignments) is replaced.
pub fn generate_bracket(
    tournament: &mut Tournament,
    teams_to_advance: Option<usize>,
) -> Result<BracketSummary, TournamentError> {
    let seeds = qualified_seeds(&leaderboard(tournament));
    let teams_to_advance = teams_to_advance.unwrap_or(seeds.len());
    let bracket = build_bracket(tournament.id, &seeds, teams_to_advance)?;
    let summary = bracket.summary;

    tournament.bracket = Some(bracket);
    tournament.teams_to_advance = Some(teams_to_advance);
    log::info!(
        "Generated bracket for tournament {}: {} teams, size {}, {} rounds, {} byes",
        tournament.id,
        summary.teams_advancing,
        summary.bracket_size,
        summary.rounds,
        summary.bye_count
    );
    Ok(summary)
}

/// Delete the bracket.
pub fn clear_bracket(tournament: &mut Tournament) {
    if tournament.bracket.take().is_some() {
        log::info!("Cleared bracket for tournament {}", tournament.id);
    }
}
