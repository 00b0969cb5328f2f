use crate::models::{ActivityEntry, GameRecord, StatsSummary, TopGame};
use chrono::{DateTime, Utc};
use std::collections::VecDeque;

/// Entries kept by [`ActivityLog`].
pub const RECENT_ACTIVITY_LIMIT: usize = 3;

/// Rows shown in the leaderboard and recent-games panels.
pub const PANEL_SIZE: usize = 5;

pub fn aggregate(records: &[GameRecord]) -> StatsSummary {
    let mut total_downloads = 0u64;
    let mut top: Option<&GameRecord> = None;

    for record in records {
        total_downloads = total_downloads.saturating_add(record.clicks);
        // strict comparison keeps the first of equal counts
        if top.is_none_or(|best| record.clicks > best.clicks) {
            top = Some(record);
        }
    }

    StatsSummary {
        total_games: records.len() as u64,
        total_downloads,
        top_game: top.map(TopGame::from).unwrap_or_else(TopGame::sentinel),
        recent_activity: Vec::new(),
    }
}

pub fn aggregate_with_activity(records: &[GameRecord], activity: &ActivityLog) -> StatsSummary {
    StatsSummary {
        recent_activity: activity.entries(),
        ..aggregate(records)
    }
}

/// Most downloaded records, descending; equal counts keep catalog order.
pub fn top_games(records: &[GameRecord], limit: usize) -> Vec<&GameRecord> {
    let mut ranked: Vec<&GameRecord> = records.iter().collect();
    ranked.sort_by(|a, b| b.clicks.cmp(&a.clicks));
    ranked.truncate(limit);
    ranked
}

/// The catalog is kept newest first, so this is a prefix.
pub fn recent_games(records: &[GameRecord], limit: usize) -> Vec<&GameRecord> {
    records.iter().take(limit).collect()
}

/// Bounded, most-recent-first record of download events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
}

impl ActivityLog {
    pub fn record(&mut self, game_title: &str) {
        self.record_at(game_title, Utc::now());
    }

    pub fn record_at(&mut self, game_title: &str, timestamp: DateTime<Utc>) {
        self.entries.push_front(ActivityEntry {
            game_title: game_title.to_string(),
            clicks_delta: 1,
            timestamp,
        });
        self.entries.truncate(RECENT_ACTIVITY_LIMIT);
    }

    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::{Duration, TimeZone};

    fn record(id: &str, clicks: u64) -> GameRecord {
        GameRecord {
            id: id.to_string(),
            title: format!("Game {id}"),
            description: "desc".into(),
            image: "https://example.com/i.jpg".into(),
            download_link: "https://example.com/d".into(),
            category: Category::Fps,
            clicks,
            date_added: Utc::now(),
        }
    }

    #[test]
    fn aggregate_sums_and_picks_top() {
        let catalog = vec![record("1", 5), record("2", 9)];
        let stats = aggregate(&catalog);
        assert_eq!(stats.total_games, 2);
        assert_eq!(stats.total_downloads, 14);
        assert_eq!(stats.top_game.id.as_deref(), Some("2"));
        assert_eq!(stats.top_game.clicks, 9);
    }

    #[test]
    fn aggregate_of_empty_catalog_reports_sentinel() {
        let stats = aggregate(&[]);
        assert_eq!(stats.total_games, 0);
        assert_eq!(stats.total_downloads, 0);
        assert_eq!(stats.top_game.title, "N/A");
        assert_eq!(stats.top_game.clicks, 0);
        assert!(stats.top_game.id.is_none());
        assert_eq!(stats, StatsSummary::default());
    }

    #[test]
    fn aggregate_tie_goes_to_first_record() {
        let catalog = vec![record("a", 3), record("b", 7), record("c", 7)];
        assert_eq!(aggregate(&catalog).top_game.id.as_deref(), Some("b"));

        let zeros = vec![record("x", 0), record("y", 0)];
        assert_eq!(aggregate(&zeros).top_game.id.as_deref(), Some("x"));
    }

    #[test]
    fn aggregate_is_idempotent() {
        let catalog = vec![record("1", 4), record("2", 4), record("3", 1)];
        assert_eq!(aggregate(&catalog), aggregate(&catalog));
    }

    #[test]
    fn total_downloads_matches_sum_of_clicks() {
        let catalog: Vec<GameRecord> = (0..20).map(|i| record(&i.to_string(), i * 3)).collect();
        let expected: u64 = catalog.iter().map(|game| game.clicks).sum();
        assert_eq!(aggregate(&catalog).total_downloads, expected);
    }

    #[test]
    fn activity_log_keeps_three_most_recent() {
        let start = Utc.with_ymd_and_hms(2024, 2, 15, 12, 0, 0).unwrap();
        let mut log = ActivityLog::default();
        for (offset, title) in ["A", "B", "C", "D"].iter().enumerate() {
            log.record_at(title, start + Duration::minutes(offset as i64));
        }

        let entries = log.entries();
        assert_eq!(log.len(), RECENT_ACTIVITY_LIMIT);
        let titles: Vec<&str> = entries.iter().map(|entry| entry.game_title.as_str()).collect();
        assert_eq!(titles, vec!["D", "C", "B"]);
        assert!(entries.iter().all(|entry| entry.clicks_delta == 1));

        let stats = aggregate_with_activity(&[record("1", 1)], &log);
        assert_eq!(stats.recent_activity, entries);
        assert_eq!(stats.total_downloads, 1);
    }

    #[test]
    fn leaderboard_orders_by_clicks_and_keeps_ties_stable() {
        let catalog = vec![
            record("1", 10),
            record("2", 30),
            record("3", 10),
            record("4", 50),
            record("5", 1),
            record("6", 20),
        ];
        let ids: Vec<&str> = top_games(&catalog, PANEL_SIZE)
            .iter()
            .map(|game| game.id.as_str())
            .collect();
        assert_eq!(ids, vec!["4", "2", "6", "1", "3"]);

        let recent: Vec<&str> = recent_games(&catalog, 2).iter().map(|game| game.id.as_str()).collect();
        assert_eq!(recent, vec!["1", "2"]);
    }
}
