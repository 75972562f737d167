//! Team and Player data structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a team (used in matches, rankings and the bracket).
pub type TeamId = Uuid;

/// One of the two players on a team.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    #[serde(default)]
    pub email: Option<String>,
}

impl Player {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: None,
        }
    }
}

/// A doubles team registered in a tournament.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    /// Registration order within the tournament, starting at 1.
    pub team_number: u32,
    pub players: [Player; 2],
    pub created_at: DateTime<Utc>,
}

impl Team {
    pub fn new(name: impl Into<String>, team_number: u32, players: [Player; 2]) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            team_number,
            players,
            created_at: Utc::now(),
        }
    }

    /// "Alice & Bob"
    pub fn player_names(&self) -> String {
        format!("{} & {}", self.players[0].name, self.players[1].name)
    }
}
