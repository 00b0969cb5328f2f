use crate::filter::filter_by_category;
use crate::models::{CategoryFilter, GameRecord};

/// Ordered in-memory catalog, most recently added first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    games: Vec<GameRecord>,
}

impl Catalog {
    /// Builds a catalog from backend order, keeping the first record of any
    /// duplicated id.
    pub fn from_records(records: Vec<GameRecord>) -> Self {
        let mut games: Vec<GameRecord> = Vec::with_capacity(records.len());
        for record in records {
            if !games.iter().any(|existing| existing.id == record.id) {
                games.push(record);
            }
        }
        Self { games }
    }

    pub fn records(&self) -> &[GameRecord] {
        &self.games
    }

    pub fn len(&self) -> usize {
        self.games.len()
    }

    pub fn is_empty(&self) -> bool {
        self.games.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&GameRecord> {
        self.games.iter().find(|game| game.id == id)
    }

    pub fn filtered(&self, selected: CategoryFilter) -> Vec<&GameRecord> {
        filter_by_category(&self.games, selected)
    }

    pub fn total_downloads(&self) -> u64 {
        self.games
            .iter()
            .fold(0u64, |sum, game| sum.saturating_add(game.clicks))
    }

    /// Puts `record` at the front. A record already holding the same id is
    /// dropped so ids stay unique.
    pub fn prepend(&mut self, record: GameRecord) {
        self.games.retain(|game| game.id != record.id);
        self.games.insert(0, record);
    }

    /// Replaces the record with the same id in place. Returns false when no
    /// record matches.
    pub fn replace(&mut self, record: GameRecord) -> bool {
        match self.games.iter_mut().find(|game| game.id == record.id) {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, id: &str) -> Option<GameRecord> {
        let index = self.games.iter().position(|game| game.id == id)?;
        Some(self.games.remove(index))
    }

    /// Adds one download to the record and returns its new count.
    pub fn increment_clicks(&mut self, id: &str) -> Option<u64> {
        let game = self.games.iter_mut().find(|game| game.id == id)?;
        game.clicks = game.clicks.saturating_add(1);
        Some(game.clicks)
    }
}
