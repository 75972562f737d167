//! Court data structure.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a court.
pub type CourtId = Uuid;

/// A physical court. Numbers within a tournament always form the dense range 1..=N.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Court {
    pub id: CourtId,
    pub number: u32,
    /// Optional human label (e.g. "Center Court").
    pub name: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Court {
    pub fn new(number: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            number,
            name: None,
            created_at: Utc::now(),
        }
    }

    /// Display label: the custom name if set, otherwise "Court N".
    pub fn label(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Court {}", self.number),
        }
    }
}
