//! Integration tests for the elimination bracket: seeding, byes, and advancement.

use pickleball_tournament::{
    bracket_positions, build_bracket, clear_bracket, generate_bracket, next_power_of_two,
    report_bracket_score, report_seed_score, Bracket, BracketMatchId, GameMatch, Player,
    RoundType, Score, TeamId, Tournament, TournamentError,
};
use uuid::Uuid;

fn ranked(n: usize) -> Vec<TeamId> {
    (0..n).map(|_| Uuid::new_v4()).collect()
}

fn id(bracket: &Bracket, round: u32, match_number: u32) -> BracketMatchId {
    BracketMatchId::new(bracket.tournament_id, round, match_number)
}

#[test]
fn next_power_of_two_rounds_up() {
    assert_eq!(next_power_of_two(2), 2);
    assert_eq!(next_power_of_two(3), 4);
    assert_eq!(next_power_of_two(5), 8);
    assert_eq!(next_power_of_two(8), 8);
    assert_eq!(next_power_of_two(9), 16);
}

#[test]
fn positions_for_eight_are_standard_seeding() {
    assert_eq!(bracket_positions(8), vec![(1, 8), (4, 5), (2, 7), (3, 6)]);
    assert_eq!(bracket_positions(4), vec![(1, 4), (2, 3)]);
    assert_eq!(bracket_positions(2), vec![(1, 2)]);
}

#[test]
fn positions_for_sixteen_pair_complements_and_split_top_seeds() {
    let positions = bracket_positions(16);
    assert_eq!(positions.len(), 8);
    for (a, b) in &positions {
        assert_eq!(a + b, 17);
    }
    assert_eq!(positions[0], (1, 16));
    assert_eq!(positions[1], (8, 9));
    // Seeds 1 and 2 are in different halves, so they can only meet in the final.
    let half_of = |seed: usize| positions.iter().position(|&(a, _)| a == seed).unwrap() / 4;
    assert_ne!(half_of(1), half_of(2));
}

#[test]
fn eight_teams_round_one_pairings() {
    let teams = ranked(8);
    let bracket = build_bracket(Uuid::new_v4(), &teams, 8).unwrap();
    assert_eq!(bracket.summary.bye_count, 0);

    let round_one: Vec<_> = bracket.round(1).map(|m| (m.team_a, m.team_b)).collect();
    let seed = |k: usize| Some(teams[k - 1]);
    assert_eq!(
        round_one,
        vec![
            (seed(1), seed(8)),
            (seed(4), seed(5)),
            (seed(2), seed(7)),
            (seed(3), seed(6)),
        ]
    );
    assert!(bracket.round(2).all(|m| m.team_a.is_none() && m.team_b.is_none()));
}

#[test]
fn bye_count_and_byes_are_pre_advanced() {
    for n in 3..=16 {
        let teams = ranked(n);
        let bracket = build_bracket(Uuid::new_v4(), &teams, n).unwrap();
        let size = next_power_of_two(n);
        assert_eq!(bracket.summary.bracket_size, size);
        assert_eq!(bracket.summary.bye_count, size - n);

        let byes: Vec<_> = bracket.round(1).filter(|m| m.is_bye()).collect();
        assert_eq!(byes.len(), size - n, "n={n}");
        for m in bracket.round(1) {
            assert!(m.team_a.is_some() || m.team_b.is_some(), "empty round-1 match for n={n}");
        }
        for m in byes {
            let team = m.bye_team().unwrap();
            let next = bracket.get(&m.winner_advances_to.unwrap()).unwrap();
            let expected = if m.match_number % 2 == 0 { next.team_a } else { next.team_b };
            assert_eq!(expected, Some(team), "n={n}");
        }
    }
}

#[test]
fn every_match_feeds_the_next_round_and_the_final_feeds_nothing() {
    let teams = ranked(12);
    let bracket = build_bracket(Uuid::new_v4(), &teams, 12).unwrap();
    assert_eq!(bracket.summary.rounds, 4);
    assert_eq!(bracket.matches.len(), 15);

    for round in 1..=4 {
        assert_eq!(bracket.round(round).count(), 16 >> round);
    }
    for m in bracket.matches.values() {
        if m.round == 4 {
            assert!(m.winner_advances_to.is_none());
        } else {
            assert_eq!(m.winner_advances_to, Some(id(&bracket, m.round + 1, m.match_number / 2)));
        }
    }
    assert_eq!(bracket.final_match().unwrap().round, 4);
}

#[test]
fn five_teams_end_to_end() {
    let teams = ranked(5);
    let mut bracket = build_bracket(Uuid::new_v4(), &teams, 5).unwrap();
    let s = bracket.summary;
    assert_eq!((s.bracket_size, s.rounds, s.bye_count), (8, 3, 3));
    assert_eq!(bracket.round(1).count(), 4);
    assert_eq!(bracket.round(1).filter(|m| m.is_bye()).count(), 3);

    let played = bracket.get(&id(&bracket, 1, 1)).unwrap().clone();
    assert_eq!((played.team_a, played.team_b), (Some(teams[3]), Some(teams[4])));

    let filled: usize = bracket
        .round(2)
        .map(|m| m.team_a.is_some() as usize + m.team_b.is_some() as usize)
        .sum();
    assert_eq!(filled, 3);
    let r2m0 = bracket.get(&id(&bracket, 2, 0)).unwrap();
    assert_eq!((r2m0.team_a, r2m0.team_b), (Some(teams[0]), None));
    let r2m1 = bracket.get(&id(&bracket, 2, 1)).unwrap();
    assert_eq!((r2m1.team_a, r2m1.team_b), (Some(teams[1]), Some(teams[2])));

    // Seed 5 upsets seed 4 and fills the last round-2 slot.
    report_bracket_score(&mut bracket, &played.id, Score::new(8, 11)).unwrap();
    let r2m0 = bracket.get(&id(&bracket, 2, 0)).unwrap();
    assert_eq!((r2m0.team_a, r2m0.team_b), (Some(teams[0]), Some(teams[4])));

    let (semi_0, semi_1) = (id(&bracket, 2, 0), id(&bracket, 2, 1));
    report_bracket_score(&mut bracket, &semi_0, Score::new(11, 3)).unwrap();
    report_bracket_score(&mut bracket, &semi_1, Score::new(6, 11)).unwrap();
    let final_match = bracket.final_match().unwrap();
    assert_eq!((final_match.team_a, final_match.team_b), (Some(teams[0]), Some(teams[2])));
    assert_eq!(bracket.champion(), None);

    let final_id = final_match.id;
    let updated = report_bracket_score(&mut bracket, &final_id, Score::new(11, 9)).unwrap();
    assert!(updated.is_completed());
    assert_eq!(bracket.champion(), Some(teams[0]));
}

#[test]
fn two_teams_make_a_single_final() {
    let teams = ranked(2);
    let bracket = build_bracket(Uuid::new_v4(), &teams, 2).unwrap();
    assert_eq!(bracket.matches.len(), 1);
    let m = bracket.final_match().unwrap();
    assert_eq!((m.team_a, m.team_b), (Some(teams[0]), Some(teams[1])));
    assert!(m.winner_advances_to.is_none());
}

#[test]
fn only_the_top_teams_advance() {
    let teams = ranked(10);
    let bracket = build_bracket(Uuid::new_v4(), &teams, 4).unwrap();
    for m in bracket.matches.values() {
        for t in [m.team_a, m.team_b].into_iter().flatten() {
            assert!(teams[..4].contains(&t));
        }
    }
}

#[test]
fn teams_to_advance_out_of_range_is_rejected() {
    let teams = ranked(4);
    assert_eq!(
        build_bracket(Uuid::new_v4(), &teams, 1).unwrap_err(),
        TournamentError::TooFewTeamsToAdvance { requested: 1 }
    );
    assert_eq!(
        build_bracket(Uuid::new_v4(), &teams, 5).unwrap_err(),
        TournamentError::NotEnoughQualifiedTeams {
            requested: 5,
            qualified: 4
        }
    );
}

#[test]
fn tie_is_rejected_without_changes() {
    let teams = ranked(4);
    let mut bracket = build_bracket(Uuid::new_v4(), &teams, 4).unwrap();
    let first = id(&bracket, 1, 0);
    assert!(Score::new(11, 11).is_tie() && !Score::new(11, 9).is_tie());
    assert_eq!(
        report_bracket_score(&mut bracket, &first, Score::new(11, 11)).unwrap_err(),
        TournamentError::TiedScore
    );
    let m = bracket.get(&first).unwrap();
    assert!(m.score.is_none() && m.completed_at.is_none());
    assert!(bracket.get(&id(&bracket, 2, 0)).unwrap().team_a.is_none());
}

#[test]
fn second_report_is_rejected_and_advancement_kept() {
    let teams = ranked(4);
    let mut bracket = build_bracket(Uuid::new_v4(), &teams, 4).unwrap();
    let first = id(&bracket, 1, 0);
    report_bracket_score(&mut bracket, &first, Score::new(11, 4)).unwrap();
    assert_eq!(
        report_bracket_score(&mut bracket, &first, Score::new(2, 11)).unwrap_err(),
        TournamentError::MatchCompleted
    );
    assert_eq!(bracket.get(&first).unwrap().score, Some(Score::new(11, 4)));
    assert_eq!(bracket.get(&id(&bracket, 2, 0)).unwrap().team_a, Some(teams[0]));
}

#[test]
fn odd_match_numbers_feed_slot_b() {
    let teams = ranked(4);
    let mut bracket = build_bracket(Uuid::new_v4(), &teams, 4).unwrap();
    // Match 1 is seed 2 vs seed 3.
    let second = id(&bracket, 1, 1);
    report_bracket_score(&mut bracket, &second, Score::new(5, 11)).unwrap();
    let final_match = bracket.final_match().unwrap();
    assert_eq!(final_match.team_a, None);
    assert_eq!(final_match.team_b, Some(teams[2]));
}

#[test]
fn matches_missing_a_team_cannot_be_scored() {
    let teams = ranked(3);
    let mut bracket = build_bracket(Uuid::new_v4(), &teams, 3).unwrap();
    // Round 1 match 0 is seed 1's bye; the final still waits on match 1.
    let bye = id(&bracket, 1, 0);
    assert_eq!(
        report_bracket_score(&mut bracket, &bye, Score::new(11, 0)).unwrap_err(),
        TournamentError::MatchNotReady
    );
    let final_id = id(&bracket, 2, 0);
    assert_eq!(
        report_bracket_score(&mut bracket, &final_id, Score::new(11, 0)).unwrap_err(),
        TournamentError::MatchNotReady
    );
}

#[test]
fn unknown_match_is_not_found() {
    let teams = ranked(4);
    let mut bracket = build_bracket(Uuid::new_v4(), &teams, 4).unwrap();
    let missing = id(&bracket, 5, 0);
    let err = report_bracket_score(&mut bracket, &missing, Score::new(11, 0)).unwrap_err();
    assert!(err.is_not_found());
}

fn tournament_after_seed_round(n: usize) -> Tournament {
    let mut t = Tournament::with_defaults("Test");
    for i in 0..n {
        t.add_team(
            format!("Team {i}"),
            [Player::new(format!("A{i}")), Player::new(format!("B{i}"))],
        )
        .unwrap();
    }
    // Team i beats team i+1 by (n - i) points, so the leaderboard keeps registration order.
    for i in 0..n - 1 {
        let m = GameMatch::new(t.teams[i].id, t.teams[i + 1].id, RoundType::Seed);
        let match_id = m.id;
        t.matches.push(m);
        report_seed_score(&mut t, match_id, Score::new(11 + (n - i) as u32, 11)).unwrap();
    }
    t
}

#[test]
fn generate_bracket_seeds_from_the_leaderboard() {
    let mut t = tournament_after_seed_round(6);
    let summary = generate_bracket(&mut t, None).unwrap();
    assert_eq!(summary.teams_advancing, 6);
    assert_eq!(summary.bye_count, 2);
    assert_eq!(t.teams_to_advance, Some(6));

    let bracket = t.bracket.as_ref().unwrap();
    let first = bracket.get(&id(bracket, 1, 0)).unwrap();
    assert_eq!(first.team_a, Some(t.teams[0].id));
    assert!(first.is_bye());
}

#[test]
fn generate_bracket_rejects_more_teams_than_qualified() {
    let mut t = tournament_after_seed_round(3);
    let err = generate_bracket(&mut t, Some(4)).unwrap_err();
    assert_eq!(err.to_string(), "Only 3 teams have completed matches. Cannot advance 4 teams.");
    assert!(t.bracket.is_none());
}

#[test]
fn regenerating_replaces_the_bracket() {
    let mut t = tournament_after_seed_round(8);
    generate_bracket(&mut t, Some(8)).unwrap();
    generate_bracket(&mut t, Some(4)).unwrap();
    let bracket = t.bracket.as_ref().unwrap();
    assert_eq!(bracket.summary.bracket_size, 4);
    assert_eq!(bracket.matches.len(), 3);

    clear_bracket(&mut t);
    assert!(t.bracket.is_none());
}
