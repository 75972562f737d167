//! Leaderboard: point differential from completed seed matches.

use crate::models::{GameMatch, Team, TeamId, Tournament};
use serde::Serialize;
use std::collections::HashMap;

/// One leaderboard row. Derived, never stored.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Standing {
    pub team_id: TeamId,
    pub team_name: String,
    pub matches_played: u32,
    pub points_for: u64,
    pub points_against: u64,
    pub point_differential: i64,
}

impl Standing {
    fn new(team: &Team) -> Self {
        Self {
            team_id: team.id,
            team_name: team.name.clone(),
            matches_played: 0,
            points_for: 0,
            points_against: 0,
            point_differential: 0,
        }
    }

    fn record(&mut self, scored: u32, conceded: u32) {
        self.matches_played += 1;
        self.points_for += u64::from(scored);
        self.points_against += u64::from(conceded);
        self.point_differential += i64::from(scored) - i64::from(conceded);
    }
}

/// Standings for every team, best point differential first.
///
/// Only completed matches count. Ties keep registration order. Matches naming a team that is no
/// longer registered are skipped.
pub fn compute_standings<'a>(
    teams: &[Team],
    matches: impl IntoIterator<Item = &'a GameMatch>,
) -> Vec<Standing> {
    let mut standings: Vec<Standing> = teams.iter().map(Standing::new).collect();
    let index: HashMap<TeamId, usize> = teams.iter().enumerate().map(|(i, t)| (t.id, i)).collect();

    for m in matches {
        let Some(score) = m.score.filter(|_| m.is_completed()) else {
            continue;
        };
        let (Some(&a), Some(&b)) = (index.get(&m.team_a), index.get(&m.team_b)) else {
            continue;
        };
        standings[a].record(score.team_a, score.team_b);
        standings[b].record(score.team_b, score.team_a);
    }

    standings.sort_by(|x, y| y.point_differential.cmp(&x.point_differential));
    standings
}

/// Bracket seeds in rank order: teams with at least one completed match.
pub fn qualified_seeds(standings: &[Standing]) -> Vec<TeamId> {
    standings
        .iter()
        .filter(|s| s.matches_played > 0)
        .map(|s| s.team_id)
        .collect()
}

/// Leaderboard of a tournament's seed round.
pub fn leaderboard(tournament: &Tournament) -> Vec<Standing> {
    compute_standings(&tournament.teams, tournament.seed_matches())
}
