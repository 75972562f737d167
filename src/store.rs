//! In-memory tournament store shared between concurrent callers.

use crate::models::{Tournament, TournamentError, TournamentId};
use std::collections::HashMap;
use std::sync::RwLock;

/// Tournaments by id behind one lock.
///
/// [`TournamentStore::update`] holds the write lock for the whole read-modify-write, so two
/// callers can never both see a court as free and both take it.
#[derive(Debug, Default)]
pub struct TournamentStore {
    tournaments: RwLock<HashMap<TournamentId, Tournament>>,
}

impl TournamentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a tournament, replacing any with the same id. Returns its id.
    pub fn insert(&self, tournament: Tournament) -> Result<TournamentId, TournamentError> {
        let id = tournament.id;
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| TournamentError::LockPoisoned)?;
        g.insert(id, tournament);
        Ok(id)
    }

    /// Snapshot of a tournament.
    pub fn get(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let g = self
            .tournaments
            .read()
            .map_err(|_| TournamentError::LockPoisoned)?;
        g.get(&id)
            .cloned()
            .ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Snapshots of every tournament, newest first.
    pub fn list(&self) -> Result<Vec<Tournament>, TournamentError> {
        let g = self
            .tournaments
            .read()
            .map_err(|_| TournamentError::LockPoisoned)?;
        let mut all: Vec<Tournament> = g.values().cloned().collect();
        all.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(all)
    }

    pub fn remove(&self, id: TournamentId) -> Result<Tournament, TournamentError> {
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| TournamentError::LockPoisoned)?;
        g.remove(&id).ok_or(TournamentError::TournamentNotFound(id))
    }

    /// Run `f` against a tournament atomically.
    ///
    /// `f` works on a copy; the copy replaces the stored tournament only if `f` returns `Ok`, so a
    /// failed operation never leaves partial writes behind.
    pub fn update<T, F>(&self, id: TournamentId, f: F) -> Result<T, TournamentError>
    where
        F: FnOnce(&mut Tournament) -> Result<T, TournamentError>,
    {
        let mut g = self
            .tournaments
            .write()
            .map_err(|_| TournamentError::LockPoisoned)?;
        let entry = g
            .get_mut(&id)
            .ok_or(TournamentError::TournamentNotFound(id))?;
        let mut working = entry.clone();
        let result = f(&mut working)?;
        *entry = working;
        Ok(result)
    }
}
