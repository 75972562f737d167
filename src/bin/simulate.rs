//! Run a whole tournament from a roster file with simulated scores.
//! Run with: cargo run --bin simulate -- teams.csv
//!
//! The roster is a CSV with a header row: team, player_one, player_two.
//! Every option can also be set from the environment (ROSTER, MATCHES_PER_TEAM, TOTAL_COURTS,
//! TEAMS_TO_ADVANCE, RNG_SEED). Log level via RUST_LOG (default info).

use clap::Parser;
use pickleball_tournament::{
    assign_court, available_courts, generate_bracket, generate_seed_matches, leaderboard,
    occupancy, report_score, waiting_matches, Player, SeedSchedule, Standing, TeamId,
    Tournament, TournamentError, TournamentId, TournamentStore, DEFAULT_SEED_MATCHES_PER_TEAM,
    DEFAULT_TOTAL_COURTS,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Pickleball tournament simulator
///
/// Registers the roster, plays the seed round on the available courts, seeds the bracket by
/// point differential and plays it out.
#[derive(Parser, Debug)]
#[command(about = "Simulate a pickleball tournament from a team roster")]
struct Args {
    /// Team roster CSV (team, player_one, player_two)
    #[arg(env = "ROSTER")]
    roster: PathBuf,

    /// Tournament name
    #[arg(long, env = "TOURNAMENT_NAME", default_value = "Pickleball Tournament")]
    name: String,

    /// Seed round matches per team
    #[arg(long, env = "MATCHES_PER_TEAM", default_value_t = DEFAULT_SEED_MATCHES_PER_TEAM)]
    matches_per_team: u32,

    /// Number of courts
    #[arg(long, env = "TOTAL_COURTS", default_value_t = DEFAULT_TOTAL_COURTS)]
    courts: u32,

    /// Teams advancing to the bracket (default: every team that played)
    #[arg(long, env = "TEAMS_TO_ADVANCE")]
    teams_to_advance: Option<usize>,

    /// Seed for the random number generator, for repeatable runs
    #[arg(long, env = "RNG_SEED")]
    seed: Option<u64>,

    /// Print the final state as JSON instead of tables
    #[arg(long)]
    json: bool,
}

#[derive(Deserialize)]
struct RosterRow {
    team: String,
    player_one: String,
    player_two: String,
}

#[derive(Serialize)]
struct Report<'a> {
    tournament: &'a Tournament,
    seed_schedule: &'a SeedSchedule,
    standings: &'a [Standing],
    champion: Option<TeamId>,
}

fn read_roster(path: &Path) -> Result<Vec<RosterRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_path(path)?;
    reader.deserialize().collect()
}

/// Pickleball game to 11: the winner gets 11, the loser 0-9.
fn simulated_score<R: Rng>(rng: &mut R) -> (u32, u32) {
    let loser = rng.gen_range(0..=9);
    if rng.gen_bool(0.5) {
        (11, loser)
    } else {
        (loser, 11)
    }
}

/// Fill free courts with waiting matches and finish one match at a time until nothing is left.
fn play_out<R: Rng>(
    store: &TournamentStore,
    id: TournamentId,
    rng: &mut R,
) -> Result<usize, TournamentError> {
    let mut played = 0;
    loop {
        let snapshot = store.get(id)?;
        let mut free = available_courts(&snapshot);
        for match_ref in waiting_matches(&snapshot) {
            let Some(&court) = free.first() else {
                break;
            };
            match store.update(id, |t| assign_court(t, match_ref, court)) {
                Ok(()) => {
                    free.remove(0);
                }
                // A team of this match is still on another court.
                Err(TournamentError::TeamBusy { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        let active = occupancy(&store.get(id)?);
        if active.is_empty() {
            return Ok(played);
        }
        let (court, match_ref) = active[rng.gen_range(0..active.len())];
        let (a, b) = simulated_score(rng);
        store.update(id, |t| report_score(t, match_ref, a, b))?;
        log::debug!("Court {} finished {}: {}-{}", court, match_ref, a, b);
        played += 1;
    }
}

fn team_name(tournament: &Tournament, id: Option<TeamId>) -> String {
    id.and_then(|id| tournament.team(id))
        .map(|t| t.name.clone())
        .unwrap_or_else(|| "TBD".to_string())
}

fn print_standings(standings: &[Standing]) {
    println!("{:>4}  {:<28} {:>3} {:>5} {:>5} {:>6}", "#", "Team", "MP", "PF", "PA", "Diff");
    for (rank, s) in standings.iter().enumerate() {
        println!(
            "{:>4}  {:<28} {:>3} {:>5} {:>5} {:>+6}",
            rank + 1,
            s.team_name,
            s.matches_played,
            s.points_for,
            s.points_against,
            s.point_differential
        );
    }
}

fn print_bracket(tournament: &Tournament) {
    let Some(bracket) = &tournament.bracket else {
        return;
    };
    for round in 1..=bracket.summary.rounds {
        println!("Round {round}");
        for m in bracket.round(round) {
            let score = m
                .score
                .map(|s| format!("{}-{}", s.team_a, s.team_b))
                .unwrap_or_else(|| if m.is_bye() { "bye".to_string() } else { "-".to_string() });
            println!(
                "  M{:<3} {:<28} vs {:<28} {}",
                m.match_number,
                team_name(tournament, m.team_a),
                team_name(tournament, m.team_b),
                score
            );
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let store = TournamentStore::new();
    let id = store.insert(Tournament::new(&args.name, args.matches_per_team, args.courts)?)?;

    let roster = read_roster(&args.roster)?;
    log::info!("Loaded {} teams from {}", roster.len(), args.roster.display());
    for row in roster {
        let players = [Player::new(row.player_one), Player::new(row.player_two)];
        store.update(id, |t| t.add_team(&row.team, players).map(|team| team.id))?;
    }

    let schedule = store.update(id, |t| generate_seed_matches(t, None, &mut rng))?;
    let played = play_out(&store, id, &mut rng)?;
    log::info!("Seed round finished: {} matches played", played);

    let standings = leaderboard(&store.get(id)?);
    let summary = store.update(id, |t| generate_bracket(t, args.teams_to_advance))?;
    let played = play_out(&store, id, &mut rng)?;
    log::info!(
        "Bracket finished: {} matches played ({} byes)",
        played,
        summary.bye_count
    );

    let tournament = store.get(id)?;
    let champion = tournament.bracket.as_ref().and_then(|b| b.champion());

    if args.json {
        let report = Report {
            tournament: &tournament,
            seed_schedule: &schedule,
            standings: &standings,
            champion,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{}", tournament.name);
    println!();
    print_standings(&standings);
    println!();
    print_bracket(&tournament);
    println!();
    println!("Champion: {}", team_name(&tournament, champion));
    Ok(())
}
