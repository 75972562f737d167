//! Seed round: pairing generation and match materialization.

use crate::models::{GameMatch, RoundType, TeamId, Tournament, TournamentError};
use rand::Rng;
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Random draws per pairing before a round gives up on finding an unused pair.
pub const PAIR_ATTEMPTS: usize = 100;

/// One generated seed pairing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SeedPairing {
    pub team_a: TeamId,
    pub team_b: TeamId,
}

/// Output of the seed generator: the pairings plus how close each team got to its quota.
#[derive(Clone, Debug, Serialize)]
pub struct SeedSchedule {
    /// Round-major.
    pub pairings: Vec<SeedPairing>,
    pub requested_per_team: u32,
    /// Matches scheduled per team (every input team appears, possibly with 0).
    pub scheduled: HashMap<TeamId, u32>,
}

impl SeedSchedule {
    /// Teams scheduled for fewer matches than requested.
    pub fn short_teams(&self) -> Vec<(TeamId, u32)> {
        let mut short: Vec<_> = self
            .scheduled
            .iter()
            .filter(|(_, n)| **n < self.requested_per_team)
            .map(|(&id, &n)| (id, n))
            .collect();
        short.sort();
        short
    }

    pub fn is_complete(&self) -> bool {
        self.short_teams().is_empty()
    }
}

fn pair_key(a: TeamId, b: TeamId) -> (TeamId, TeamId) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Generate seed pairings: `matches_per_team` rounds, each team plays at most once per round,
/// no unordered pair is ever repeated.
///
/// Each round pairs random teams from the pool of teams still under quota. A draw that hits an
/// already-used pair is retried up to [`PAIR_ATTEMPTS`] times; when that budget runs out (or fewer
/// than two teams remain) the round ends early. Generation stops once no two teams under quota
/// can still meet. Teams can therefore finish under quota, which is reported through
/// [`SeedSchedule::short_teams`] rather than as an error.
pub fn generate_seed_pairings<R: Rng + ?Sized>(
    teams: &[TeamId],
    matches_per_team: u32,
    rng: &mut R,
) -> SeedSchedule {
    let mut order: Vec<TeamId> = Vec::with_capacity(teams.len());
    let mut seen = HashSet::new();
    for &id in teams {
        if seen.insert(id) {
            order.push(id);
        }
    }

    let mut scheduled: HashMap<TeamId, u32> = order.iter().map(|&id| (id, 0)).collect();
    let mut used_pairs: HashSet<(TeamId, TeamId)> = HashSet::new();
    let mut pairings = Vec::new();

    for _ in 0..matches_per_team {
        let mut pool: Vec<TeamId> = order
            .iter()
            .copied()
            .filter(|id| scheduled[id] < matches_per_team)
            .collect();
        // Pools only shrink and used pairs only grow: an exhausted pool stays exhausted.
        if !has_unused_pair(&pool, &used_pairs) {
            break;
        }

        while pool.len() >= 2 {
            let Some((i, j)) = draw_unused_pair(&pool, &used_pairs, rng) else {
                break;
            };
            let (team_a, team_b) = (pool[i], pool[j]);
            used_pairs.insert(pair_key(team_a, team_b));
            pairings.push(SeedPairing { team_a, team_b });
            *scheduled.entry(team_a).or_default() += 1;
            *scheduled.entry(team_b).or_default() += 1;

            // Remove the higher index first so the lower one stays valid.
            let (hi, lo) = if i > j { (i, j) } else { (j, i) };
            pool.swap_remove(hi);
            pool.swap_remove(lo);
        }
    }

    SeedSchedule {
        pairings,
        requested_per_team: matches_per_team,
        scheduled,
    }
}

fn has_unused_pair(pool: &[TeamId], used_pairs: &HashSet<(TeamId, TeamId)>) -> bool {
    pool.iter().enumerate().any(|(i, &a)| {
        pool[i + 1..]
            .iter()
            .any(|&b| !used_pairs.contains(&pair_key(a, b)))
    })
}

/// Indices of two distinct pool teams that haven't met yet, or None when the budget runs out.
fn draw_unused_pair<R: Rng + ?Sized>(
    pool: &[TeamId],
    used_pairs: &HashSet<(TeamId, TeamId)>,
    rng: &mut R,
) -> Option<(usize, usize)> {
    for _ in 0..PAIR_ATTEMPTS {
        let i = rng.gen_range(0..pool.len());
        let mut j = rng.gen_range(0..pool.len() - 1);
        if j >= i {
            j += 1;
        }
        if !used_pairs.contains(&pair_key(pool[i], pool[j])) {
            return Some((i, j));
        }
    }
    None
}

/// Regenerate the seed round: delete every seed match, then create new ones from fresh pairings.
///
/// `matches_per_team` overrides (and updates) the tournament's stored quota. Court assignments of
/// the deleted matches disappear with them.
pub fn generate_seed_matches<R: Rng + ?Sized>(
    tournament: &mut Tournament,
    matches_per_team: Option<u32>,
    rng: &mut R,
) -> Result<SeedSchedule, TournamentError> {
    let matches_per_team = matches_per_team.unwrap_or(tournament.seed_matches_per_team);
    if matches_per_team == 0 {
        return Err(TournamentError::InvalidMatchesPerTeam);
    }

    let schedule = generate_seed_pairings(&tournament.team_ids(), matches_per_team, rng);

    tournament.seed_matches_per_team = matches_per_team;
    tournament.matches.retain(|m| m.round != RoundType::Seed);
    tournament.matches.extend(
        schedule
            .pairings
            .iter()
            .map(|p| GameMatch::new(p.team_a, p.team_b, RoundType::Seed)),
    );

    log::info!(
        "Generated {} seed matches for {} teams ({} per team) in tournament {}",
        schedule.pairings.len(),
        tournament.teams.len(),
        matches_per_team,
        tournament.id
    );
    let short = schedule.short_teams();
    if !short.is_empty() {
        log::warn!(
            "{} team(s) got fewer than {} seed matches: pairing space exhausted",
            short.len(),
            matches_per_team
        );
    }

    Ok(schedule)
}

/// Delete every seed match (and with them their court assignments).
pub fn clear_seed_matches(tournament: &mut Tournament) {
    let before = tournament.matches.len();
    tournament.matches.retain(|m| m.round != RoundType::Seed);
    log::info!(
        "Cleared {} seed matches in tournament {}",
        before - tournament.matches.len(),
        tournament.id
    );
}
