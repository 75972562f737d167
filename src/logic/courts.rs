//! Court scheduling: putting matches on courts, releasing them, and growing/shrinking the pool.
//!
//! At any time each court holds at most one active match, each team plays in at most one active
//! match, and every court referenced by an active match exists.

use crate::logic::bracket::report_bracket_score;
use crate::models::{
    BracketMatch, BracketMatchId, Court, CourtId, GameMatch, MatchId, MatchRef, Score, TeamId,
    Tournament, TournamentError,
};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Scheduling-relevant view of either kind of match.
#[derive(Clone, Copy, Debug)]
struct Placement {
    court: Option<u32>,
    completed: bool,
    ready: bool,
    teams: [Option<TeamId>; 2],
}

impl Placement {
    fn active_court(&self) -> Option<u32> {
        self.court.filter(|_| !self.completed)
    }
}

impl From<&GameMatch> for Placement {
    fn from(m: &GameMatch) -> Self {
        Self {
            court: m.scheduled_court,
            completed: m.is_completed(),
            ready: true,
            teams: [Some(m.team_a), Some(m.team_b)],
        }
    }
}

impl From<&BracketMatch> for Placement {
    fn from(m: &BracketMatch) -> Self {
        Self {
            court: m.scheduled_court,
            completed: m.is_completed(),
            ready: m.is_ready(),
            teams: [m.team_a, m.team_b],
        }
    }
}

fn placements(tournament: &Tournament) -> impl Iterator<Item = (MatchRef, Placement)> + '_ {
    let seed = tournament
        .matches
        .iter()
        .map(|m| (MatchRef::Seed(m.id), Placement::from(m)));
    let bracket = tournament
        .bracket
        .iter()
        .flat_map(|b| b.matches.values())
        .map(|m| (MatchRef::Bracket(m.id), Placement::from(m)));
    seed.chain(bracket)
}

fn placement(tournament: &Tournament, match_ref: MatchRef) -> Result<Placement, TournamentError> {
    let found = match match_ref {
        MatchRef::Seed(id) => tournament.seed_match(id).map(Placement::from),
        MatchRef::Bracket(id) => tournament.bracket_match(&id).map(Placement::from),
    };
    found.ok_or(TournamentError::MatchNotFound(match_ref))
}

/// Write court and start time onto a match that is known to exist.
fn set_court(
    tournament: &mut Tournament,
    match_ref: MatchRef,
    court: Option<u32>,
    started_at: Option<DateTime<Utc>>,
) -> Result<(), TournamentError> {
    match match_ref {
        MatchRef::Seed(id) => {
            let m = tournament
                .seed_match_mut(id)
                .ok_or(TournamentError::MatchNotFound(match_ref))?;
            m.scheduled_court = court;
            m.started_at = started_at;
        }
        MatchRef::Bracket(id) => {
            let m = tournament
                .bracket
                .as_mut()
                .and_then(|b| b.get_mut(&id))
                .ok_or(TournamentError::MatchNotFound(match_ref))?;
            m.scheduled_court = court;
            m.started_at = started_at;
        }
    }
    Ok(())
}

/// Active match on a court, if any.
pub fn occupant(tournament: &Tournament, court: u32) -> Option<MatchRef> {
    placements(tournament)
        .find(|(_, p)| p.active_court() == Some(court))
        .map(|(r, _)| r)
}

/// Every (court, active match) pair, ordered by court number.
pub fn occupancy(tournament: &Tournament) -> Vec<(u32, MatchRef)> {
    let mut pairs: Vec<_> = placements(tournament)
        .filter_map(|(r, p)| p.active_court().map(|c| (c, r)))
        .collect();
    pairs.sort_by_key(|(c, _)| *c);
    pairs
}

/// Put a match on a court.
///
/// Fails if the court doesn't exist, the match is completed or still waiting on a team, another
/// active match holds the court, or one of its teams is playing elsewhere. Assigning an active
/// match to a different free court moves it.
pub fn assign_court(
    tournament: &mut Tournament,
    match_ref: MatchRef,
    court: u32,
) -> Result<(), TournamentError> {
    let total_courts = tournament.total_courts();
    if court == 0 || court > total_courts {
        return Err(TournamentError::CourtOutOfRange {
            court,
            total_courts,
        });
    }
    let target = placement(tournament, match_ref)?;
    if target.completed {
        return Err(TournamentError::MatchCompleted);
    }
    if !target.ready {
        return Err(TournamentError::MatchNotReady);
    }
    for (other_ref, other) in placements(tournament) {
        if other_ref == match_ref {
            continue;
        }
        let Some(other_court) = other.active_court() else {
            continue;
        };
        if other_court == court {
            return Err(TournamentError::CourtOccupied(court));
        }
        if let Some(team) = target
            .teams
            .iter()
            .flatten()
            .find(|t| other.teams.contains(&Some(**t)))
        {
            return Err(TournamentError::TeamBusy {
                team: *team,
                court: other_court,
            });
        }
    }

    set_court(tournament, match_ref, Some(court), Some(Utc::now()))?;
    log::debug!("Assigned {} to court {}", match_ref, court);
    Ok(())
}

/// Take a match off its court. A no-op for matches that aren't on one.
pub fn unassign_court(
    tournament: &mut Tournament,
    match_ref: MatchRef,
) -> Result<(), TournamentError> {
    let current = placement(tournament, match_ref)?;
    set_court(tournament, match_ref, None, None)?;
    if let Some(court) = current.court {
        log::debug!("Released court {} from {}", court, match_ref);
    }
    Ok(())
}

/// Record a seed match score. Completion releases the court; reporting again corrects the score.
pub fn report_seed_score(
    tournament: &mut Tournament,
    match_id: MatchId,
    score: Score,
) -> Result<GameMatch, TournamentError> {
    let m = tournament
        .seed_match_mut(match_id)
        .ok_or(TournamentError::MatchNotFound(MatchRef::Seed(match_id)))?;
    if m.is_completed() {
        log::info!("Correcting score of seed match {}", match_id);
    }
    m.complete(score);
    Ok(m.clone())
}

/// Record a bracket match score, releasing its court and advancing the winner.
pub fn report_bracket_result(
    tournament: &mut Tournament,
    match_id: &BracketMatchId,
    score: Score,
) -> Result<BracketMatch, TournamentError> {
    let bracket = tournament.bracket.as_mut().ok_or(TournamentError::NoBracket)?;
    report_bracket_score(bracket, match_id, score)
}

/// Record a score for either kind of match. The match is completed and off its court afterwards.
pub fn report_score(
    tournament: &mut Tournament,
    match_ref: MatchRef,
    team_a_score: u32,
    team_b_score: u32,
) -> Result<(), TournamentError> {
    let score = Score::new(team_a_score, team_b_score);
    match match_ref {
        MatchRef::Seed(id) => report_seed_score(tournament, id, score).map(|_| ()),
        MatchRef::Bracket(id) => report_bracket_result(tournament, &id, score).map(|_| ()),
    }
}

/// Append a court numbered one past the current highest.
pub fn add_court(tournament: &mut Tournament) -> &Court {
    let number = tournament.total_courts() + 1;
    tournament.courts.push(Court::new(number));
    log::info!("Added court {} to tournament {}", number, tournament.id);
    &tournament.courts[tournament.courts.len() - 1]
}

/// Remove the highest-numbered court. It must be free and must not be the last one.
pub fn remove_court(tournament: &mut Tournament) -> Result<Court, TournamentError> {
    let highest = tournament.total_courts();
    if highest <= 1 {
        return Err(TournamentError::LastCourt);
    }
    if occupant(tournament, highest).is_some() {
        return Err(TournamentError::CourtInUse(highest));
    }
    let court = tournament.courts.pop().ok_or(TournamentError::LastCourt)?;
    log::info!("Removed court {} from tournament {}", court.number, tournament.id);
    Ok(court)
}

/// Set or clear a court's display name.
pub fn rename_court(
    tournament: &mut Tournament,
    court_id: CourtId,
    name: Option<String>,
) -> Result<&Court, TournamentError> {
    let court = tournament
        .courts
        .iter_mut()
        .find(|c| c.id == court_id)
        .ok_or(TournamentError::CourtNotFound(court_id))?;
    court.name = name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty());
    Ok(&*court)
}

/// Dashboard row for one court.
#[derive(Clone, Debug, Serialize)]
pub struct CourtStatus {
    pub court_id: CourtId,
    pub number: u32,
    pub label: String,
    pub occupant: Option<MatchRef>,
}

/// Every court in number order with the match currently on it.
pub fn court_statuses(tournament: &Tournament) -> Vec<CourtStatus> {
    let occupied = occupancy(tournament);
    tournament
        .courts
        .iter()
        .map(|c| CourtStatus {
            court_id: c.id,
            number: c.number,
            label: c.label(),
            occupant: occupied
                .iter()
                .find(|(n, _)| *n == c.number)
                .map(|(_, r)| *r),
        })
        .collect()
}

/// Court numbers with no active match.
pub fn available_courts(tournament: &Tournament) -> Vec<u32> {
    court_statuses(tournament)
        .into_iter()
        .filter(|s| s.occupant.is_none())
        .map(|s| s.number)
        .collect()
}

/// Playable matches that are neither on a court nor completed: seed matches first, then the
/// bracket in round order.
pub fn waiting_matches(tournament: &Tournament) -> Vec<MatchRef> {
    placements(tournament)
        .filter(|(_, p)| p.court.is_none() && !p.completed && p.ready)
        .map(|(r, _)| r)
        .collect()
}
